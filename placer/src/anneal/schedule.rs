use sa_common::error::{PlaceError, Result};

/// Temperature update applied after every annealing step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CoolingSchedule {
    /// `t <- t * rate`, with `0 < rate <= 1`.
    Geometric { rate: f64 },
    /// `t <- max(t - step, 0)`.
    Linear { step: f64 },
}

impl CoolingSchedule {
    pub fn from_name(name: &str, rate: f64) -> Result<Self> {
        match name {
            "geometric" => {
                if !(rate > 0.0 && rate <= 1.0) {
                    return Err(PlaceError::InvalidConfig(format!(
                        "geometric cooling rate must be in (0, 1], got {}",
                        rate
                    )));
                }
                Ok(Self::Geometric { rate })
            }
            "linear" => {
                if !(rate >= 0.0 && rate.is_finite()) {
                    return Err(PlaceError::InvalidConfig(format!(
                        "linear cooling step must be a non-negative number, got {}",
                        rate
                    )));
                }
                Ok(Self::Linear { step: rate })
            }
            other => Err(PlaceError::InvalidConfig(format!(
                "unknown cooling schedule '{}'",
                other
            ))),
        }
    }

    /// Next temperature; never above `temperature` and never negative.
    pub fn cool(&self, temperature: f64) -> f64 {
        let next = match *self {
            Self::Geometric { rate } => temperature * rate,
            Self::Linear { step } => temperature - step,
        };
        next.clamp(0.0, temperature.max(0.0))
    }
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        Self::Geometric { rate: 0.995 }
    }
}

use super::controller::{AnnealingController, PlacementPhase, StepOutcome};
use sa_common::error::Result;
use sa_common::util::config::AnnealingConfig;

/// External stopping rule layered over the open-ended controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StopPolicy {
    pub max_moves: usize,
    pub min_temperature: f64,
}

impl StopPolicy {
    pub fn from_config(config: &AnnealingConfig) -> Self {
        Self {
            max_moves: config.max_moves,
            min_temperature: config.min_temperature,
        }
    }

    pub fn should_stop(&self, controller: &AnnealingController) -> bool {
        controller.steps() >= self.max_moves || controller.temperature() < self.min_temperature
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Cost after calibration, then after every annealing step.
    pub cost_history: Vec<u64>,
    pub initial_temperature: f64,
    pub final_temperature: f64,
    pub steps: usize,
    pub accepted: usize,
}

impl RunSummary {
    pub fn initial_cost(&self) -> u64 {
        self.cost_history.first().copied().unwrap_or(0)
    }
    pub fn final_cost(&self) -> u64 {
        self.cost_history.last().copied().unwrap_or(0)
    }
    pub fn acceptance_rate(&self) -> f64 {
        if self.steps == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.steps as f64
    }
}

/// Advances the controller until `policy` says stop.
pub fn run_to_completion(
    controller: &mut AnnealingController,
    policy: &StopPolicy,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    while controller.phase() != PlacementPhase::Iterating {
        if let StepOutcome::Calibrated { temperature, cost } = controller.advance()? {
            summary.initial_temperature = temperature;
            summary.cost_history.push(cost);
        }
    }
    if summary.cost_history.is_empty() {
        summary.initial_temperature = controller.temperature();
        summary.cost_history.push(controller.cost());
    }

    let start_steps = controller.steps();
    let start_accepted = controller.accepted();

    while !policy.should_stop(controller) {
        if let StepOutcome::Annealed { cost, .. } = controller.advance()? {
            summary.cost_history.push(cost);
        }

        let done = controller.steps() - start_steps;
        if done % 1000 == 0 {
            log::info!(
                "Iter {}: cost={} T={:.4} accept={:.1}%",
                done,
                controller.cost(),
                controller.temperature(),
                100.0 * (controller.accepted() - start_accepted) as f64 / done as f64
            );
        }
    }

    summary.steps = controller.steps() - start_steps;
    summary.accepted = controller.accepted() - start_accepted;
    summary.final_temperature = controller.temperature();

    if summary.steps >= policy.max_moves {
        log::info!("Stopped after move budget of {} steps", policy.max_moves);
    } else {
        log::info!(
            "Stopped at T={:.4} (floor {}) after {} steps",
            summary.final_temperature,
            policy.min_temperature,
            summary.steps
        );
    }
    Ok(summary)
}

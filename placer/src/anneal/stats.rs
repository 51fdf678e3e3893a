use sa_common::error::{PlaceError, Result};

/// Sample standard deviation (n - 1 denominator). A single value gives 0.
pub fn std_deviation(sample: &[u64]) -> Result<f64> {
    if sample.is_empty() {
        return Err(PlaceError::EmptySample);
    }
    if sample.len() == 1 {
        return Ok(0.0);
    }

    let n = sample.len() as f64;
    let mean = sample.iter().map(|&v| v as f64).sum::<f64>() / n;
    let sum_sq = sample
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>();
    Ok((sum_sq / (n - 1.0)).sqrt())
}

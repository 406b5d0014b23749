//! Shared numeric helpers for the engines.
//!
//! Standard deviation here is the **population** form (n divisor): the
//! sales history is treated as the whole demand record for the window, not
//! a sample drawn from it.

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}

/// Population standard deviation, deterministic.
///
/// Fewer than 2 points carry no spread information and yield 0.0.
pub fn stddev_population(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    let var = xs
        .iter()
        .map(|x| {
            let d = x - m;
            d * d
        })
        .sum::<f64>()
        / (xs.len() as f64);
    var.sqrt()
}

/// Coefficient of variation (population standard deviation / mean).
///
/// `None` when the series is too short or the mean is zero, so callers
/// choose the fallback instead of inheriting a NaN.
pub fn coefficient_of_variation(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    let m = mean(xs);
    if m <= f64::EPSILON {
        return None;
    }
    Some(stddev_population(xs) / m)
}

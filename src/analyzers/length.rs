use crate::analyzers::types::RouteLengthClass;
use crate::error::PipelineError;

/// Linear-interpolation quantile of `values` at fraction `q`.
///
/// Sorts a copy, locates the fractional rank `(n - 1) * q` and interpolates
/// between the two neighbouring order statistics.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] when `q` is outside `[0, 1]`
/// and [`PipelineError::EmptyBatch`] for empty input.
pub fn quantile(values: &[usize], q: f64) -> Result<f64, PipelineError> {
    if !(0.0..=1.0).contains(&q) {
        return Err(PipelineError::InvalidConfig(format!(
            "quantile fraction must be within [0, 1], got {q}"
        )));
    }
    if values.is_empty() {
        return Err(PipelineError::EmptyBatch);
    }

    let mut sorted: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    sorted.sort_by(f64::total_cmp);

    let rank = (sorted.len() - 1) as f64 * q;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// `Long` only when strictly above the threshold; ties are `Short`.
pub fn classify_length(stop_count: usize, threshold: f64) -> RouteLengthClass {
    if stop_count as f64 > threshold {
        RouteLengthClass::Long
    } else {
        RouteLengthClass::Short
    }
}

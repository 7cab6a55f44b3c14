//! Percentile-based rescaling of feature traces.

use ndarray::{Array, ArrayBase, Data, Dimension};
use tracklab_core::{Error, Result};

pub const DEFAULT_MIN_PERCENTILE: f64 = 5.0;
pub const DEFAULT_MAX_PERCENTILE: f64 = 95.0;

/// Rescaled values with the bounds they were scaled by
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileScaled<D: Dimension> {
    pub scaled: Array<f64, D>,
    pub min: f64,
    pub max: f64,
}

/// `q`-th percentile of the non-NaN values, linearly interpolated between
/// closest ranks. NaN when every value is NaN.
pub fn nan_percentile<'a, I>(values: I, q: f64) -> Result<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    if !(0.0..=100.0).contains(&q) {
        return Err(Error::InvalidInput(format!(
            "percentile must be within [0, 100], got {}",
            q
        )));
    }

    let mut sorted: Vec<f64> = values.into_iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return Ok(f64::NAN);
    }
    sorted.sort_by(f64::total_cmp);

    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64))
}

/// `(x - p_min) / (p_max - p_min)` over all elements of `x`
pub fn quantile_scaling<S, D>(x: &ArrayBase<S, D>, min_per: f64, max_per: f64) -> Result<QuantileScaled<D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if min_per >= max_per {
        return Err(Error::InvalidInput(format!(
            "lower percentile {} must be below upper percentile {}",
            min_per, max_per
        )));
    }

    let min = nan_percentile(x.iter(), min_per)?;
    let max = nan_percentile(x.iter(), max_per)?;
    let range = max - min;

    Ok(QuantileScaled {
        scaled: x.mapv(|v| (v - min) / range),
        min,
        max,
    })
}

/// [`quantile_scaling`] with the 5th and 95th percentiles
pub fn quantile_scaling_default<S, D>(x: &ArrayBase<S, D>) -> Result<QuantileScaled<D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    quantile_scaling(x, DEFAULT_MIN_PERCENTILE, DEFAULT_MAX_PERCENTILE)
}

//! Differencing of a series and the inverse (re-integration).

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};

/// Apply the discrete first-difference operator `order` times.
///
/// Each application drops the first element, so the result has length
/// `series.len() - order`. `order == 0` is the identity.
///
/// # Errors
/// `InvalidOrder` if `order >= series.len()` (the result would be empty).
pub fn difference(series: &[f64], order: usize) -> Result<Vec<f64>> {
    if order > 0 && order >= series.len() {
        return Err(ForecastError::InvalidOrder(format!(
            "differencing order {} for series of length {}",
            order,
            series.len()
        )));
    }

    let mut result = series.to_vec();
    for _ in 0..order {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    Ok(result)
}

/// Difference a [`TimeSeries`], dropping the first `order` timestamps.
///
/// Pure: the input series is untouched; the same input and order always
/// yield the same output.
pub fn difference_series(series: &TimeSeries, order: usize) -> Result<TimeSeries> {
    let values = difference(series.values(), order)?;
    let timestamps = series.timestamps()[order..].to_vec();
    TimeSeries::new(timestamps, values)
}

/// Integrate (reverse differencing) a differenced continuation.
///
/// `differenced` is a sequence that continues the `order`-times differenced
/// version of `original`; the result continues `original` itself. Used by
/// the forecaster to map predictions back to the price scale.
pub fn integrate(differenced: &[f64], original: &[f64], order: usize) -> Vec<f64> {
    if order == 0 || differenced.is_empty() {
        return differenced.to_vec();
    }

    let mut result = differenced.to_vec();

    for level in (0..order).rev() {
        // Last value of the original at this differencing depth seeds the
        // cumulative sum.
        let init_value = if level == 0 {
            original.last().copied().unwrap_or(0.0)
        } else {
            difference(original, level)
                .ok()
                .and_then(|d| d.last().copied())
                .unwrap_or(0.0)
        };

        let mut cumsum = init_value;
        for x in result.iter_mut() {
            cumsum += *x;
            *x = cumsum;
        }
    }

    result
}

//! Augmented Dickey-Fuller stationarity test.

use crate::error::{ForecastError, Result};
use crate::utils::ols::least_squares;
use statrs::distribution::{ContinuousCDF, Normal};

/// Default significance threshold for the stationarity verdict.
pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;

/// Minimum observations for a meaningful test.
const MIN_OBSERVATIONS: usize = 20;

/// Critical values of the Dickey-Fuller distribution (constant, no trend).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriticalValues {
    /// Critical value at 1% significance.
    pub cv_1pct: f64,
    /// Critical value at 5% significance.
    pub cv_5pct: f64,
    /// Critical value at 10% significance.
    pub cv_10pct: f64,
}

/// Result of the augmented Dickey-Fuller test.
#[derive(Debug, Clone, PartialEq)]
pub struct StationarityReport {
    /// t-ratio of the lagged-level coefficient.
    pub statistic: f64,
    /// p-value against the Dickey-Fuller distribution.
    pub p_value: f64,
    /// Number of lagged differences included in the regression.
    pub lags: usize,
    /// Observations the test was run on.
    pub n_obs: usize,
    /// Whether the unit-root null is rejected at the chosen significance.
    pub is_stationary: bool,
    /// Dickey-Fuller critical values for reference.
    pub critical_values: CriticalValues,
}

/// Augmented Dickey-Fuller test for a unit root.
///
/// Regresses the first difference on the lagged level and lagged
/// differences, with a constant:
///
/// ```text
/// Δy_t = α + β·y_{t-1} + Σ γ_i·Δy_{t-i} + ε_t
/// ```
///
/// The null hypothesis is a unit root (non-stationarity); rejection implies
/// stationarity. The t-ratio of β is compared against the Dickey-Fuller
/// distribution via the MacKinnon (1994) response surface, not an ordinary
/// t-distribution.
///
/// `max_lags` pins the lag order when `Some`; otherwise the order is chosen
/// by AIC up to `12·(n/100)^{1/4}` lags (Schwert's rule). No side effects;
/// pure function of its input.
pub fn adf_test(
    values: &[f64],
    max_lags: Option<usize>,
    significance: f64,
) -> Result<StationarityReport> {
    let n = values.len();
    if n < MIN_OBSERVATIONS {
        return Err(ForecastError::InsufficientData {
            needed: MIN_OBSERVATIONS,
            got: n,
        });
    }

    let diff: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let lags = match max_lags {
        Some(lags) => {
            // Regression needs lags + 2 parameters and positive dof.
            let usable = diff.len().saturating_sub(lags);
            if usable <= lags + 3 {
                return Err(ForecastError::InsufficientData {
                    needed: 2 * lags + 5,
                    got: diff.len(),
                });
            }
            lags
        }
        None => {
            let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).floor() as usize;
            let cap = (diff.len() / 2).saturating_sub(2);
            select_lag_aic(values, &diff, schwert.min(cap))
        }
    };

    let fit = least_squares(&design_rows(values, &diff, lags, lags), &diff[lags..])?;
    let t_stat = fit.t_ratio(1);

    if !t_stat.is_finite() {
        return Err(ForecastError::DegenerateInput(
            "Dickey-Fuller regression produced a non-finite statistic".to_string(),
        ));
    }

    let p_value = mackinnon_p_value(t_stat);

    Ok(StationarityReport {
        statistic: t_stat,
        p_value,
        lags,
        n_obs: n,
        is_stationary: p_value < significance,
        critical_values: CriticalValues {
            cv_1pct: -3.43,
            cv_5pct: -2.86,
            cv_10pct: -2.57,
        },
    })
}

/// Design rows for the ADF regression with `lags` lagged differences,
/// starting at difference index `start`.
///
/// Row for observation `t`: `[1, y_{t-1}, Δy_{t-1}, …, Δy_{t-lags}]`.
fn design_rows(values: &[f64], diff: &[f64], lags: usize, start: usize) -> Vec<Vec<f64>> {
    (start..diff.len())
        .map(|t| {
            let mut row = Vec::with_capacity(lags + 2);
            row.push(1.0);
            row.push(values[t]);
            for i in 1..=lags {
                row.push(diff[t - i]);
            }
            row
        })
        .collect()
}

/// Choose the lag order by AIC over `0..=max_lags`, holding the sample
/// start fixed at `max_lags` so every candidate sees the same observations.
fn select_lag_aic(values: &[f64], diff: &[f64], max_lags: usize) -> usize {
    let mut best_lag = 0;
    let mut best_aic = f64::INFINITY;

    for lag in 0..=max_lags {
        let rows = design_rows(values, diff, lag, max_lags);
        let n_eff = rows.len();
        let Ok(fit) = least_squares(&rows, &diff[max_lags..]) else {
            continue;
        };
        if fit.rss <= 0.0 {
            continue;
        }

        let k = lag + 2;
        let aic = n_eff as f64 * (fit.rss / n_eff as f64).ln() + 2.0 * k as f64;
        if aic < best_aic {
            best_aic = aic;
            best_lag = lag;
        }
    }

    best_lag
}

/// MacKinnon (1994) approximate p-value for the ADF t-statistic
/// (constant-only regression, one I(1) variable).
fn mackinnon_p_value(t_stat: f64) -> f64 {
    const TAU_MAX: f64 = 2.74;
    const TAU_MIN: f64 = -18.83;
    const TAU_STAR: f64 = -1.61;
    // Response-surface polynomials: small-p below TAU_STAR, large-p above.
    const SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
    const LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

    if t_stat > TAU_MAX {
        return 1.0;
    }
    if t_stat < TAU_MIN {
        return 0.0;
    }

    let z = if t_stat <= TAU_STAR {
        SMALL_P
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * t_stat + c)
    } else {
        LARGE_P
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * t_stat + c)
    };

    Normal::new(0.0, 1.0).unwrap().cdf(z)
}

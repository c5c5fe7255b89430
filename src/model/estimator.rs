//! Maximum-likelihood ARIMA estimation.

use tracing::debug;

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::model::fitted::FittedModel;
use crate::model::kalman;
use crate::model::order::ModelOrder;
use crate::model::params;
use crate::model::state_space::StateSpace;
use crate::transform::diff::difference;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::{autocorrelations, mean, partial_autocorrelations};

/// Budget and tolerance for the likelihood optimization.
///
/// The iteration cap bounds the only potentially long-running operation in
/// the crate; exhausting it surfaces as a `Convergence` error rather than a
/// silently degraded fit.
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    /// Maximum optimizer iterations.
    pub max_iterations: usize,
    /// Convergence tolerance on the log-likelihood spread.
    pub tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            tolerance: 1e-8,
        }
    }
}

/// Fits an ARIMA(p,d,q) model to a series by exact maximum likelihood.
///
/// The series is differenced `d` times internally, centered, and the
/// ARMA(p,q) coefficients of the result are found by maximizing the
/// Gaussian log-likelihood evaluated with a Kalman filter over the
/// companion-form state space. The optimizer works in an unconstrained
/// space mapped through the PACF parametrization, so every candidate is
/// stationary and invertible.
#[derive(Debug, Clone)]
pub struct ArimaEstimator {
    order: ModelOrder,
    options: FitOptions,
}

impl ArimaEstimator {
    /// Create an estimator for a fixed order.
    pub fn new(order: ModelOrder) -> Self {
        Self {
            order,
            options: FitOptions::default(),
        }
    }

    /// Override the optimization budget.
    pub fn with_options(mut self, options: FitOptions) -> Self {
        self.options = options;
        self
    }

    /// The order this estimator fits.
    pub fn order(&self) -> ModelOrder {
        self.order
    }

    /// Fit the model. The input series is not mutated; the original
    /// (undifferenced) values are consumed and differencing happens here,
    /// governed by `order.d`.
    pub fn fit(&self, series: &TimeSeries) -> Result<FittedModel> {
        let values = series.values();
        if values.is_empty() {
            return Err(ForecastError::NoData);
        }

        let (p, d, q) = (self.order.p(), self.order.d(), self.order.q());

        let needed = d + p.max(q).max(1) + 4;
        if values.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: values.len(),
            });
        }

        let differenced = difference(values, d)?;

        let spread = differenced
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });
        if (spread.1 - spread.0).abs() < f64::EPSILON {
            return Err(ForecastError::DegenerateInput(
                "series is constant after differencing".to_string(),
            ));
        }

        let center = mean(&differenced);
        let centered: Vec<f64> = differenced.iter().map(|x| x - center).collect();

        let (ar, ma, output) = if p == 0 && q == 0 {
            // Pure differencing: the centered series is modeled as white
            // noise, no optimization needed.
            let output = kalman::filter(&StateSpace::new(&[], &[]), &centered)?;
            (vec![], vec![], output)
        } else {
            let initial = initial_parameters(&centered, p, q);

            let cost = |candidate: &[f64]| {
                let (alpha, beta) = candidate.split_at(p);
                let ar = params::to_coefficients(alpha);
                let ma = params::to_coefficients(beta);
                match kalman::concentrated_log_likelihood(&StateSpace::new(&ar, &ma), &centered)
                {
                    Some(ll) if ll.is_finite() => -ll,
                    _ => f64::MAX,
                }
            };

            let config = NelderMeadConfig {
                max_iter: self.options.max_iterations,
                tolerance: self.options.tolerance,
                ..Default::default()
            };
            let result = nelder_mead(cost, &initial, config);

            if !result.converged {
                return Err(ForecastError::Convergence {
                    iterations: result.iterations,
                });
            }

            let (alpha, beta) = result.optimal_point.split_at(p);
            let ar = params::to_coefficients(alpha);
            let ma = params::to_coefficients(beta);

            let output = kalman::filter(&StateSpace::new(&ar, &ma), &centered)?;
            debug!(
                iterations = result.iterations,
                log_likelihood = output.log_likelihood,
                "likelihood optimization converged"
            );
            (ar, ma, output)
        };

        if !output.sigma2.is_finite() || output.sigma2 <= 0.0 {
            return Err(ForecastError::DegenerateInput(
                "non-positive innovation variance".to_string(),
            ));
        }

        Ok(FittedModel {
            order: self.order,
            ar,
            ma,
            mean: center,
            sigma2: output.sigma2,
            log_likelihood: output.log_likelihood,
            n: values.len(),
            original: values.to_vec(),
            differenced,
            residuals: output.residuals,
            last_timestamp: series
                .last_timestamp()
                .expect("non-empty series has a last timestamp"),
            step: series.inferred_step(),
        })
    }
}

/// Closed-form starting point for the optimizer: Yule-Walker partial
/// autocorrelations (Durbin-Levinson on the sample ACF) for the AR block,
/// zeros for the MA block.
fn initial_parameters(centered: &[f64], p: usize, q: usize) -> Vec<f64> {
    let mut initial = Vec::with_capacity(p + q);
    if p > 0 {
        let acf = autocorrelations(centered, p);
        let pacf = partial_autocorrelations(&acf);
        initial.extend(params::from_pacf(&pacf));
    }
    initial.extend(std::iter::repeat(0.0).take(q));
    initial
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn daily(values: Vec<f64>) -> TimeSeries {
        TimeSeries::daily(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), values).unwrap()
    }

    fn deterministic_shocks(seed: u64, n: usize) -> Vec<f64> {
        // splitmix64 high bits mapped to [-1, 1]: fixed, statistically white
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
                let mut z = state;
                z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
                z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
                z ^= z >> 31;
                (z >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
            })
            .collect()
    }

    #[test]
    fn rejects_empty_series() {
        let series = TimeSeries::new(vec![], vec![]).unwrap();
        let estimator = ArimaEstimator::new(ModelOrder::new(1, 1, 1).unwrap());
        assert!(matches!(estimator.fit(&series), Err(ForecastError::NoData)));
    }

    #[test]
    fn rejects_short_series() {
        let series = daily(vec![1.0, 2.0, 3.0]);
        let estimator = ArimaEstimator::new(ModelOrder::new(2, 1, 1).unwrap());
        assert!(matches!(
            estimator.fit(&series),
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn rejects_constant_after_differencing() {
        // Linear trend: first difference is exactly constant
        let series = daily((0..30).map(|i| 5.0 + 2.0 * i as f64).collect());
        let estimator = ArimaEstimator::new(ModelOrder::new(1, 1, 0).unwrap());
        assert!(matches!(
            estimator.fit(&series),
            Err(ForecastError::DegenerateInput(_))
        ));
    }

    #[test]
    fn ar1_coefficient_recovery() {
        let phi = 0.7;
        let shocks = deterministic_shocks(9, 400);
        let mut values = vec![0.0];
        for t in 1..400 {
            values.push(phi * values[t - 1] + shocks[t]);
        }

        let estimator = ArimaEstimator::new(ModelOrder::new(1, 0, 0).unwrap());
        let model = estimator.fit(&daily(values)).unwrap();

        assert_eq!(model.ar().len(), 1);
        assert!(
            (model.ar()[0] - phi).abs() < 0.15,
            "phi: expected ~{}, got {}",
            phi,
            model.ar()[0]
        );
        assert!(model.sigma2() > 0.0);
        assert!(model.log_likelihood().is_finite());
    }

    #[test]
    fn ma1_coefficient_recovery() {
        let theta = 0.5;
        let shocks = deterministic_shocks(9, 400);
        let values: Vec<f64> = (0..400)
            .map(|t| shocks[t] + if t > 0 { theta * shocks[t - 1] } else { 0.0 })
            .collect();

        let estimator = ArimaEstimator::new(ModelOrder::new(0, 0, 1).unwrap());
        let model = estimator.fit(&daily(values)).unwrap();

        assert_eq!(model.ma().len(), 1);
        assert!(
            (model.ma()[0] - theta).abs() < 0.2,
            "theta: expected ~{}, got {}",
            theta,
            model.ma()[0]
        );
    }

    #[test]
    fn white_noise_fast_path_for_pure_differencing() {
        let shocks = deterministic_shocks(3, 100);
        let mut values = vec![50.0];
        for t in 1..100 {
            values.push(values[t - 1] + shocks[t]);
        }

        let estimator = ArimaEstimator::new(ModelOrder::new(0, 1, 0).unwrap());
        let model = estimator.fit(&daily(values)).unwrap();

        assert!(model.ar().is_empty());
        assert!(model.ma().is_empty());
        assert_eq!(model.residuals().len(), 99);
    }

    #[test]
    fn fitting_is_deterministic() {
        let shocks = deterministic_shocks(55, 150);
        let mut values = vec![100.0];
        for t in 1..150 {
            values.push(values[t - 1] + 0.4 * shocks[t]);
        }
        let series = daily(values);

        let estimator = ArimaEstimator::new(ModelOrder::new(1, 1, 1).unwrap());
        let first = estimator.fit(&series).unwrap();
        let second = estimator.fit(&series).unwrap();

        assert_relative_eq!(first.ar()[0], second.ar()[0], epsilon = 1e-12);
        assert_relative_eq!(first.ma()[0], second.ma()[0], epsilon = 1e-12);
        assert_relative_eq!(
            first.log_likelihood(),
            second.log_likelihood(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn tiny_iteration_budget_fails_with_convergence_error() {
        let shocks = deterministic_shocks(17, 120);
        let mut values = vec![10.0];
        for t in 1..120 {
            values.push(0.6 * values[t - 1] + shocks[t]);
        }

        let estimator = ArimaEstimator::new(ModelOrder::new(1, 0, 1).unwrap()).with_options(
            FitOptions {
                max_iterations: 2,
                tolerance: 1e-12,
            },
        );

        assert!(matches!(
            estimator.fit(&daily(values)),
            Err(ForecastError::Convergence { iterations: 2 })
        ));
    }

    #[test]
    fn stored_context_matches_input_frame() {
        let shocks = deterministic_shocks(2, 60);
        let mut values = vec![20.0];
        for t in 1..60 {
            values.push(values[t - 1] + shocks[t]);
        }
        let series = daily(values.clone());

        let estimator = ArimaEstimator::new(ModelOrder::new(1, 1, 0).unwrap());
        let model = estimator.fit(&series).unwrap();

        assert_eq!(model.n_observations(), 60);
        assert_eq!(model.order().d(), 1);
        assert_eq!(
            model.last_timestamp,
            series.last_timestamp().unwrap()
        );
        // Input untouched
        assert_eq!(series.values(), &values[..]);
    }
}

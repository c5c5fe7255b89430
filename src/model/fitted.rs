//! Fitted ARIMA model and forecasting from it.

use chrono::{DateTime, Duration, Utc};

use crate::core::ForecastResult;
use crate::error::{ForecastError, Result};
use crate::model::order::ModelOrder;
use crate::transform::diff::integrate;
use crate::utils::stats::quantile_normal;

/// A fitted ARIMA(p,d,q) model.
///
/// Produced by [`ArimaEstimator::fit`](crate::model::ArimaEstimator::fit);
/// immutable once produced. Holds the estimated coefficients together with
/// the fit context needed to project forward (the differenced series, the
/// one-step innovations, and the timestamp frame of the input).
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub(crate) order: ModelOrder,
    pub(crate) ar: Vec<f64>,
    pub(crate) ma: Vec<f64>,
    pub(crate) mean: f64,
    pub(crate) sigma2: f64,
    pub(crate) log_likelihood: f64,
    pub(crate) n: usize,
    pub(crate) original: Vec<f64>,
    pub(crate) differenced: Vec<f64>,
    pub(crate) residuals: Vec<f64>,
    pub(crate) last_timestamp: DateTime<Utc>,
    pub(crate) step: Duration,
}

impl FittedModel {
    /// The (p, d, q) order this model was fit with.
    pub fn order(&self) -> ModelOrder {
        self.order
    }

    /// AR coefficients (`phi`).
    pub fn ar(&self) -> &[f64] {
        &self.ar
    }

    /// MA coefficients (`theta`).
    pub fn ma(&self) -> &[f64] {
        &self.ma
    }

    /// Mean of the differenced series (the intercept term).
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Innovation variance estimate.
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Maximized Gaussian log-likelihood.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Length of the series the model was fit on.
    pub fn n_observations(&self) -> usize {
        self.n
    }

    /// One-step-ahead prediction errors on the differenced scale.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Akaike Information Criterion.
    pub fn aic(&self) -> f64 {
        2.0 * self.order.num_params() as f64 - 2.0 * self.log_likelihood
    }

    /// Bayesian Information Criterion.
    pub fn bic(&self) -> f64 {
        let n_eff = self.differenced.len().max(1) as f64;
        self.order.num_params() as f64 * n_eff.ln() - 2.0 * self.log_likelihood
    }

    /// Project the model `horizon` steps forward.
    ///
    /// Each step applies the AR coefficients to the most recent (actual or
    /// previously forecast) differenced values and the MA coefficients to
    /// stored innovations; future innovations are zero-mean and drop out, so
    /// MA influence decays past the model's memory. The differenced
    /// trajectory is then re-integrated through the `d` differencing steps
    /// back to the price scale. Timestamps continue the fit series' step,
    /// starting one step after the last observation.
    ///
    /// Deterministic point forecasts; `horizon == 0` is a caller error.
    pub fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        let diff_forecast = self.forecast_differenced(horizon)?;
        let values = integrate(&diff_forecast, &self.original, self.order.d());

        Ok(ForecastResult::new(self.future_timestamps(horizon), values))
    }

    /// Like [`forecast`](Self::forecast), with symmetric normal-quantile
    /// prediction intervals at confidence `level` (e.g. 0.95). Interval
    /// width grows with the square root of cumulative variance.
    pub fn forecast_with_intervals(&self, horizon: usize, level: f64) -> Result<ForecastResult> {
        if !(0.0..1.0).contains(&level) {
            return Err(ForecastError::InvalidOrder(format!(
                "confidence level {} outside (0, 1)",
                level
            )));
        }

        let point = self.forecast(horizon)?;
        let z = quantile_normal((1.0 + level) / 2.0);

        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (h, &value) in point.values().iter().enumerate() {
            let se = (self.sigma2 * (h + 1) as f64).sqrt();
            lower.push(value - z * se);
            upper.push(value + z * se);
        }

        Ok(ForecastResult::with_intervals(
            point.timestamps().to_vec(),
            point.values().to_vec(),
            lower,
            upper,
        ))
    }

    fn forecast_differenced(&self, horizon: usize) -> Result<Vec<f64>> {
        if horizon == 0 {
            return Err(ForecastError::InvalidHorizon);
        }

        let p = self.order.p();
        let q = self.order.q();

        let mut extended = self.differenced.clone();
        let mut shocks = self.residuals.clone();

        for _ in 0..horizon {
            let t = extended.len();
            let mut pred = self.mean;
            for i in 0..p {
                if t > i {
                    pred += self.ar[i] * (extended[t - 1 - i] - self.mean);
                }
            }
            for j in 0..q {
                if t > j {
                    pred += self.ma[j] * shocks[t - 1 - j];
                }
            }
            extended.push(pred);
            shocks.push(0.0);
        }

        Ok(extended[self.differenced.len()..].to_vec())
    }

    fn future_timestamps(&self, horizon: usize) -> Vec<DateTime<Utc>> {
        (1..=horizon)
            .map(|k| self.last_timestamp + self.step * k as i32)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn make_model(order: ModelOrder, ar: Vec<f64>, ma: Vec<f64>) -> FittedModel {
        let original = vec![10.0, 11.0, 12.5, 12.0, 13.5, 14.0];
        let differenced: Vec<f64> = original.windows(2).map(|w| w[1] - w[0]).collect();
        let n_diff = differenced.len();
        FittedModel {
            order,
            ar,
            ma,
            mean: 0.8,
            sigma2: 0.25,
            log_likelihood: -10.0,
            n: original.len(),
            original,
            differenced,
            residuals: vec![0.1; n_diff],
            last_timestamp: Utc.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).unwrap(),
            step: Duration::days(1),
        }
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let model = make_model(ModelOrder::new(1, 1, 1).unwrap(), vec![0.5], vec![0.2]);
        assert!(matches!(
            model.forecast(0),
            Err(ForecastError::InvalidHorizon)
        ));
    }

    #[test]
    fn horizon_and_timestamps_are_exact() {
        let model = make_model(ModelOrder::new(1, 1, 1).unwrap(), vec![0.5], vec![0.2]);
        let forecast = model.forecast(7).unwrap();

        assert_eq!(forecast.horizon(), 7);
        let timestamps = forecast.timestamps();
        assert_eq!(
            timestamps[0],
            Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap()
        );
        for w in timestamps.windows(2) {
            assert_eq!(w[1] - w[0], Duration::days(1));
        }
    }

    #[test]
    fn first_step_follows_difference_equation() {
        let model = make_model(ModelOrder::new(1, 1, 1).unwrap(), vec![0.5], vec![0.2]);
        let forecast = model.forecast(1).unwrap();

        // z_hat = mean + phi*(last_diff - mean) + theta*last_shock
        let last_diff = *model.differenced.last().unwrap();
        let z_hat = 0.8 + 0.5 * (last_diff - 0.8) + 0.2 * 0.1;
        let expected = model.original.last().unwrap() + z_hat;

        assert_relative_eq!(forecast.values()[0], expected, epsilon = 1e-12);
    }

    #[test]
    fn ma_influence_decays_to_mean_growth() {
        // Pure MA(1) on differences: beyond one step the forecast increment
        // is exactly the mean
        let model = make_model(ModelOrder::new(0, 1, 1).unwrap(), vec![], vec![0.4]);
        let forecast = model.forecast(4).unwrap();

        let values = forecast.values();
        for w in values.windows(2).skip(1) {
            assert_relative_eq!(w[1] - w[0], model.mean, epsilon = 1e-12);
        }
    }

    #[test]
    fn intervals_bracket_point_forecasts_and_widen() {
        let model = make_model(ModelOrder::new(1, 1, 1).unwrap(), vec![0.5], vec![0.2]);
        let forecast = model.forecast_with_intervals(5, 0.95).unwrap();

        let values = forecast.values();
        let lower = forecast.lower().unwrap();
        let upper = forecast.upper().unwrap();

        let mut last_width = 0.0;
        for i in 0..5 {
            assert!(lower[i] < values[i] && values[i] < upper[i]);
            let width = upper[i] - lower[i];
            assert!(width > last_width);
            last_width = width;
        }
    }

    #[test]
    fn invalid_confidence_level_is_rejected() {
        let model = make_model(ModelOrder::new(1, 1, 1).unwrap(), vec![0.5], vec![0.2]);
        assert!(model.forecast_with_intervals(3, 1.5).is_err());
    }

    #[test]
    fn information_criteria_use_likelihood() {
        let model = make_model(ModelOrder::new(1, 1, 1).unwrap(), vec![0.5], vec![0.2]);
        // k = p + q + 2 = 4; AIC = 2*4 - 2*(-10) = 28
        assert_relative_eq!(model.aic(), 28.0, epsilon = 1e-12);
        assert!(model.bic() > model.aic() - 8.0);
    }
}

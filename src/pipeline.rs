//! The forecasting pipeline: stationarity diagnostics, fit, forecast.

use tracing::{debug, info};

use crate::core::{ForecastResult, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::model::{ArimaEstimator, FitOptions, FittedModel, ModelOrder};
use crate::transform::difference_series;
use crate::validation::residual_tests::{ljung_box, LjungBoxResult};
use crate::validation::stationarity::{adf_test, StationarityReport, DEFAULT_SIGNIFICANCE};

/// Everything a pipeline run produces.
///
/// Both stationarity reports are diagnostic: the differenced re-test is run
/// on a throwaway differenced copy, while the model is fit on the ORIGINAL
/// series and differences internally per its order. The two paths are
/// deliberately independent (see the design notes in DESIGN.md).
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// ADF test on the raw series.
    pub raw_stationarity: StationarityReport,
    /// ADF test after diagnostic differencing.
    pub differenced_stationarity: StationarityReport,
    /// The fitted model.
    pub model: FittedModel,
    /// Ljung-Box whiteness check of the fit residuals.
    pub residual_whiteness: LjungBoxResult,
    /// The forecast trajectory.
    pub forecast: ForecastResult,
}

/// Sequences the components: test, difference (diagnostic re-test), fit,
/// forecast. Component failures propagate unchanged; there is no retry.
#[derive(Debug, Clone)]
pub struct Pipeline {
    order: ModelOrder,
    significance: f64,
    options: FitOptions,
}

impl Pipeline {
    /// Pipeline for a fixed model order, with the default stationarity
    /// significance threshold and fit options.
    pub fn new(order: ModelOrder) -> Self {
        Self {
            order,
            significance: DEFAULT_SIGNIFICANCE,
            options: FitOptions::default(),
        }
    }

    /// Override the significance threshold for the stationarity verdicts.
    pub fn with_significance(mut self, significance: f64) -> Self {
        self.significance = significance;
        self
    }

    /// Override the optimizer budget.
    pub fn with_fit_options(mut self, options: FitOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the full pipeline on a series.
    pub fn run(&self, series: &TimeSeries, horizon: usize) -> Result<PipelineResult> {
        if series.is_empty() {
            return Err(ForecastError::NoData);
        }

        let raw_stationarity = adf_test(series.values(), None, self.significance)?;
        info!(
            statistic = raw_stationarity.statistic,
            p_value = raw_stationarity.p_value,
            stationary = raw_stationarity.is_stationary,
            "Dickey-Fuller test on raw series"
        );

        // Diagnostic only: the estimator differences internally; this copy
        // exists to report how differencing changes the verdict.
        let diagnostic_order = self.order.d().max(1);
        let differenced = difference_series(series, diagnostic_order)?;
        let differenced_stationarity =
            adf_test(differenced.values(), None, self.significance)?;
        info!(
            statistic = differenced_stationarity.statistic,
            p_value = differenced_stationarity.p_value,
            stationary = differenced_stationarity.is_stationary,
            order = diagnostic_order,
            "Dickey-Fuller test on differenced series"
        );

        let estimator = ArimaEstimator::new(self.order).with_options(self.options);
        let model = estimator.fit(series)?;
        debug!(
            ar = ?model.ar(),
            ma = ?model.ma(),
            sigma2 = model.sigma2(),
            log_likelihood = model.log_likelihood(),
            aic = model.aic(),
            "model fitted"
        );

        let residual_whiteness = ljung_box(
            model.residuals(),
            None,
            self.order.p() + self.order.q(),
        );
        debug!(
            statistic = residual_whiteness.statistic,
            p_value = residual_whiteness.p_value,
            white = residual_whiteness.is_white_noise(self.significance),
            "Ljung-Box residual check"
        );

        let forecast = model.forecast(horizon)?;
        info!(horizon = forecast.horizon(), "forecast complete");

        Ok(PipelineResult {
            raw_stationarity,
            differenced_stationarity,
            model,
            residual_whiteness,
            forecast,
        })
    }
}

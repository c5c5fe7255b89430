//! # pricecast
//!
//! Univariate ARIMA forecasting pipeline for daily price series.
//!
//! Given a chronologically ordered series of price observations, the
//! pipeline tests stationarity (augmented Dickey-Fuller), fits an
//! ARIMA(p,d,q) model by exact maximum likelihood over a Kalman-filter
//! state-space representation, and projects future values.
//!
//! ```
//! use chrono::NaiveDate;
//! use pricecast::prelude::*;
//!
//! # fn main() -> pricecast::Result<()> {
//! let mut prices = vec![100.0];
//! for i in 1..120 {
//!     let shock = ((i * 37 + 11) % 101) as f64 / 50.0 - 1.0;
//!     prices.push(prices[i - 1] + shock);
//! }
//! let series = TimeSeries::daily(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), prices)?;
//!
//! let pipeline = Pipeline::new(ModelOrder::new(1, 1, 1)?);
//! let result = pipeline.run(&series, 30)?;
//!
//! assert_eq!(result.forecast.horizon(), 30);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod transform;
pub mod utils;
pub mod validation;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{ForecastResult, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::model::{ArimaEstimator, FitOptions, FittedModel, ModelOrder};
    pub use crate::pipeline::{Pipeline, PipelineResult};
    pub use crate::validation::{adf_test, StationarityReport};
}

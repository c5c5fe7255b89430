//! Statistical diagnostics: stationarity testing and residual checks.

pub mod stationarity;

pub use residual_tests::{ljung_box, LjungBoxResult};
pub use stationarity::{
    adf_test, CriticalValues, StationarityReport, DEFAULT_SIGNIFICANCE,
};

//! Numeric utilities shared by the estimator and the stationarity test.

pub mod ols;
pub mod optimization;
pub mod stats;

pub use ols::{least_squares, LeastSquaresFit};
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use stats::{autocorrelations, mean, partial_autocorrelations, quantile_normal, variance};

//! Series transformations.
//!
//! Differencing removes trend to induce stationarity; integration reverses
//! it so forecasts come back on the original scale.

pub mod diff;

pub use diff::{difference, difference_series, integrate};

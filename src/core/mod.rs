//! Core data structures shared by every pipeline component.

mod forecast;
mod time_series;

pub use forecast::ForecastResult;
pub use time_series::TimeSeries;

//! TimeSeries data structure for representing an ordered price series.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;

/// A univariate time series with strictly increasing timestamps.
///
/// Construction validates the two invariants every component relies on:
/// timestamps are strictly increasing (no duplicates) and all values are
/// finite. The series is never mutated in place; differencing and fitting
/// produce new artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a new series from matching timestamp and value vectors.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::Timestamp(format!(
                "{} timestamps for {} values",
                timestamps.len(),
                values.len()
            )));
        }

        for w in timestamps.windows(2) {
            if w[1] <= w[0] {
                return Err(ForecastError::Timestamp(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::NonFinite);
        }

        Ok(Self { timestamps, values })
    }

    /// Create a daily series starting at midnight UTC of `start`.
    pub fn daily(start: NaiveDate, values: Vec<f64>) -> Result<Self> {
        let base = start
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| ForecastError::Timestamp("invalid start date".to_string()))?
            .and_utc();
        let timestamps = (0..values.len())
            .map(|i| base + Duration::days(i as i64))
            .collect();
        Self::new(timestamps, values)
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Observation timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Observation values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Timestamp of the last observation.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Infer the sampling step as the modal spacing between observations.
    ///
    /// Falls back to one day (the expected frequency for close-price data)
    /// when the series is too short to carry spacing information.
    pub fn inferred_step(&self) -> Duration {
        if self.len() < 2 {
            return Duration::days(1);
        }

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for w in self.timestamps.windows(2) {
            *counts.entry((w[1] - w[0]).num_seconds()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .max_by_key(|&(_, count)| count)
            .map(|(secs, _)| Duration::seconds(secs))
            .unwrap_or_else(|| Duration::days(1))
    }
}

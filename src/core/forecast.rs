//! Forecast result structure for holding projected values.

use chrono::{DateTime, Utc};

/// A forecast: future timestamps with point estimates and optional
/// prediction intervals.
///
/// The `(timestamp, value)` pairing and its ordering are a stable contract
/// for persistence collaborators (tabular export uses exactly these two
/// field names).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastResult {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
}

impl ForecastResult {
    /// Create a point forecast.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        Self {
            timestamps,
            values,
            lower: None,
            upper: None,
        }
    }

    /// Create a forecast with symmetric prediction intervals.
    pub fn with_intervals(
        timestamps: Vec<DateTime<Utc>>,
        values: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        debug_assert_eq!(lower.len(), values.len());
        debug_assert_eq!(upper.len(), values.len());
        Self {
            timestamps,
            values,
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    /// Whether the forecast holds no steps.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Future timestamps, in forecast order.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Point estimates, in forecast order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Lower interval bounds, if intervals were requested.
    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    /// Upper interval bounds, if intervals were requested.
    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }

    /// Iterate over `(timestamp, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn make_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    #[test]
    fn point_forecast_has_no_intervals() {
        let forecast = ForecastResult::new(make_timestamps(3), vec![1.0, 2.0, 3.0]);

        assert_eq!(forecast.horizon(), 3);
        assert!(!forecast.is_empty());
        assert_eq!(forecast.values(), &[1.0, 2.0, 3.0]);
        assert!(forecast.lower().is_none());
        assert!(forecast.upper().is_none());
    }

    #[test]
    fn interval_forecast_exposes_bounds() {
        let forecast = ForecastResult::with_intervals(
            make_timestamps(2),
            vec![2.0, 3.0],
            vec![1.0, 1.5],
            vec![3.0, 4.5],
        );

        assert_eq!(forecast.lower().unwrap(), &[1.0, 1.5]);
        assert_eq!(forecast.upper().unwrap(), &[3.0, 4.5]);
    }

    #[test]
    fn iter_pairs_timestamps_with_values() {
        let timestamps = make_timestamps(3);
        let forecast = ForecastResult::new(timestamps.clone(), vec![5.0, 6.0, 7.0]);

        let pairs: Vec<_> = forecast.iter().collect();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], (timestamps[0], 5.0));
        assert_eq!(pairs[2], (timestamps[2], 7.0));
    }

    #[test]
    fn default_is_empty() {
        let forecast = ForecastResult::default();
        assert!(forecast.is_empty());
        assert_eq!(forecast.horizon(), 0);
    }
}

//! Statistical utility functions.

/// Mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n-1 denominator).
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Sample autocorrelations at lags `1..=max_lag`.
pub fn autocorrelations(values: &[f64], max_lag: usize) -> Vec<f64> {
    let n = values.len();
    let m = mean(values);
    let denominator: f64 = values.iter().map(|x| (x - m).powi(2)).sum();

    (1..=max_lag)
        .map(|lag| {
            if lag >= n || denominator == 0.0 {
                return 0.0;
            }
            let numerator: f64 = values
                .iter()
                .skip(lag)
                .zip(values.iter())
                .map(|(a, b)| (a - m) * (b - m))
                .sum();
            numerator / denominator
        })
        .collect()
}

/// Partial autocorrelations from sample autocorrelations, via the
/// Durbin-Levinson recursion.
///
/// `acf` holds autocorrelations at lags `1..=m`; the result holds the
/// partial autocorrelations at the same lags.
pub fn partial_autocorrelations(acf: &[f64]) -> Vec<f64> {
    let m = acf.len();
    if m == 0 {
        return vec![];
    }

    let mut pacf = Vec::with_capacity(m);
    let mut phi = vec![0.0; m];
    let mut prev = vec![0.0; m];

    phi[0] = acf[0];
    pacf.push(acf[0]);

    for k in 1..m {
        prev[..k].copy_from_slice(&phi[..k]);

        let num = acf[k] - (0..k).map(|j| prev[j] * acf[k - 1 - j]).sum::<f64>();
        let den = 1.0 - (0..k).map(|j| prev[j] * acf[j]).sum::<f64>();

        let phi_kk = if den.abs() < 1e-12 { 0.0 } else { num / den };
        phi[k] = phi_kk;
        for j in 0..k {
            phi[j] = prev[j] - phi_kk * prev[k - 1 - j];
        }
        pacf.push(phi_kk);
    }

    pacf
}

/// Approximate quantile function for the standard normal distribution.
///
/// Abramowitz and Stegun formula 26.2.23; enough precision for interval
/// construction.
pub fn quantile_normal(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    let t = if p < 0.5 {
        (-2.0 * p.ln()).sqrt()
    } else {
        (-2.0 * (1.0 - p).ln()).sqrt()
    };

    let c0 = 2.515517;
    let c1 = 0.802853;
    let c2 = 0.010328;
    let d1 = 1.432788;
    let d2 = 0.189269;
    let d3 = 0.001308;

    let result = t - (c0 + c1 * t + c2 * t * t) / (1.0 + d1 * t + d2 * t * t + d3 * t * t * t);

    if p < 0.5 {
        -result
    } else {
        result
    }
}

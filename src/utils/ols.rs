//! Ordinary least squares with coefficient standard errors.
//!
//! Backs the augmented Dickey-Fuller regression, which needs the t-ratio of
//! one coefficient from a multi-regressor fit.

use crate::error::{ForecastError, Result};

/// A least-squares fit with per-coefficient standard errors.
#[derive(Debug, Clone)]
pub struct LeastSquaresFit {
    /// Estimated coefficients, one per design column.
    pub coefficients: Vec<f64>,
    /// Standard errors of the coefficients.
    pub std_errors: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Residual variance, `rss / (n - k)`.
    pub sigma2: f64,
    /// Number of observations.
    pub n: usize,
}

impl LeastSquaresFit {
    /// t-ratio of the coefficient at `index`.
    pub fn t_ratio(&self, index: usize) -> f64 {
        self.coefficients[index] / self.std_errors[index]
    }
}

/// Fit `y = X beta` by solving the normal equations via Cholesky.
///
/// `rows` holds one design row per observation (the caller supplies the
/// intercept column). Requires more observations than columns.
pub fn least_squares(rows: &[Vec<f64>], y: &[f64]) -> Result<LeastSquaresFit> {
    let n = y.len();
    let k = rows.first().map(|r| r.len()).unwrap_or(0);

    if n == 0 || k == 0 {
        return Err(ForecastError::InsufficientData {
            needed: 1,
            got: n,
        });
    }
    if rows.len() != n {
        return Err(ForecastError::DegenerateInput(format!(
            "{} design rows for {} responses",
            rows.len(),
            n
        )));
    }
    if n <= k {
        return Err(ForecastError::InsufficientData {
            needed: k + 1,
            got: n,
        });
    }

    // Normal equations: X'X beta = X'y
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, &y_obs) in rows.iter().zip(y) {
        for i in 0..k {
            xty[i] += row[i] * y_obs;
            for j in 0..=i {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..k {
        for j in (i + 1)..k {
            xtx[i][j] = xtx[j][i];
        }
    }

    let chol = cholesky(&xtx).ok_or_else(|| {
        ForecastError::DegenerateInput("singular regression design".to_string())
    })?;

    let coefficients = chol.solve(&xty);

    let mut rss = 0.0;
    for (row, &y_obs) in rows.iter().zip(y) {
        let fitted: f64 = row.iter().zip(&coefficients).map(|(x, b)| x * b).sum();
        rss += (y_obs - fitted).powi(2);
    }

    let sigma2 = rss / (n - k) as f64;

    // se_j = sqrt(sigma2 * (X'X)^-1_jj); the inverse diagonal comes from
    // solving against unit vectors with the stored factor.
    let mut std_errors = Vec::with_capacity(k);
    for j in 0..k {
        let mut unit = vec![0.0; k];
        unit[j] = 1.0;
        let column = chol.solve(&unit);
        std_errors.push((sigma2 * column[j]).sqrt());
    }

    Ok(LeastSquaresFit {
        coefficients,
        std_errors,
        rss,
        sigma2,
        n,
    })
}

/// Lower-triangular Cholesky factor of a symmetric positive definite matrix.
struct Cholesky {
    l: Vec<Vec<f64>>,
}

fn cholesky(a: &[Vec<f64>]) -> Option<Cholesky> {
    let n = a.len();
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for m in 0..j {
                sum -= l[i][m] * l[j][m];
            }
            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    Some(Cholesky { l })
}

impl Cholesky {
    /// Solve `A x = b` given `A = L L'`.
    fn solve(&self, b: &[f64]) -> Vec<f64> {
        let n = b.len();
        let l = &self.l;

        let mut y = vec![0.0; n];
        for i in 0..n {
            let mut sum = b[i];
            for j in 0..i {
                sum -= l[i][j] * y[j];
            }
            y[i] = sum / l[i][i];
        }

        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut sum = y[i];
            for j in (i + 1)..n {
                sum -= l[j][i] * x[j];
            }
            x[i] = sum / l[i][i];
        }

        x
    }
}

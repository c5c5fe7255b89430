//! Coefficient parametrization for unconstrained optimization.
//!
//! The optimizer searches an unconstrained space; coefficients reach the
//! likelihood through a transform that keeps the AR polynomial stationary
//! and the MA polynomial invertible (Jones 1980 PACF parametrization).

/// Map unconstrained parameters to polynomial coefficients.
///
/// Step 1: `tanh` squashes each parameter into (-1, 1), giving a valid
/// partial autocorrelation sequence. Step 2: the Levinson-Durbin recursion
/// converts partial autocorrelations to polynomial coefficients. The same
/// transform serves the AR and MA blocks.
pub(crate) fn to_coefficients(unconstrained: &[f64]) -> Vec<f64> {
    let m = unconstrained.len();
    if m == 0 {
        return Vec::new();
    }

    let pacf: Vec<f64> = unconstrained.iter().map(|a| a.tanh()).collect();

    let mut coeffs = vec![0.0; m];
    let mut prev = vec![0.0; m];

    coeffs[0] = pacf[0];
    for k in 1..m {
        prev[..m].copy_from_slice(&coeffs[..m]);
        coeffs[k] = pacf[k];
        for j in 0..k {
            coeffs[j] = prev[j] - pacf[k] * prev[k - 1 - j];
        }
    }

    coeffs
}

/// Map a partial autocorrelation sequence to unconstrained parameters:
/// the inverse of the `tanh` squashing, with clamping away from ±1.
///
/// Used to seed the optimizer from closed-form (Yule-Walker) estimates.
pub(crate) fn from_pacf(pacf: &[f64]) -> Vec<f64> {
    pacf.iter()
        .map(|&r| r.clamp(-0.97, 0.97).atanh())
        .collect()
}

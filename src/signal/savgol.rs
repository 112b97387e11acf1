//! Savitzky-Golay smoothing filter.
//!
//! Each output sample is the value at the window center of a least-squares
//! polynomial fitted to the surrounding window. For a fixed window the
//! center fit reduces to a convolution, so the interior is a single dot
//! product per sample; the half-window at each end is filled by evaluating
//! the polynomial fitted to the first (respectively last) full window.

use nalgebra::{DMatrix, DVector};

use super::SignalError;

/// Smooth `y` with a Savitzky-Golay filter.
///
/// `window_length` must be odd and larger than `poly_order`; `y` must hold
/// at least one full window. The output has the same length as the input.
pub fn savgol_filter(
    y: &[f64],
    window_length: usize,
    poly_order: usize,
) -> Result<Vec<f64>, SignalError> {
    if window_length == 0 || window_length % 2 == 0 {
        return Err(SignalError::InvalidWindow(window_length));
    }
    if poly_order >= window_length {
        return Err(SignalError::OrderTooHigh {
            poly_order,
            window_length,
        });
    }
    let n = y.len();
    if n < window_length {
        return Err(SignalError::InsufficientData {
            len: n,
            window_length,
        });
    }

    let half = window_length / 2;
    let weights = center_weights(window_length, poly_order)?;

    let mut smoothed = vec![0.0; n];
    for i in half..n - half {
        let window = &y[i - half..=i + half];
        smoothed[i] = weights.iter().zip(window).map(|(w, v)| w * v).sum();
    }

    // Leading and trailing half-windows: evaluate the polynomial fitted to
    // the first/last full window at the uncovered sample positions.
    let head = fit_polynomial(&y[..window_length], poly_order)?;
    for (i, out) in smoothed.iter_mut().take(half).enumerate() {
        *out = eval_polynomial(&head, i as f64);
    }
    let tail = fit_polynomial(&y[n - window_length..], poly_order)?;
    for i in 0..half {
        smoothed[n - half + i] = eval_polynomial(&tail, (half + 1 + i) as f64);
    }

    Ok(smoothed)
}

/// Vandermonde design matrix with rows `(x0 + i)^j`.
fn design_matrix(len: usize, poly_order: usize, x0: f64) -> DMatrix<f64> {
    DMatrix::from_fn(len, poly_order + 1, |i, j| (x0 + i as f64).powi(j as i32))
}

/// Convolution weights for the fitted value at the window center.
fn center_weights(window_length: usize, poly_order: usize) -> Result<Vec<f64>, SignalError> {
    let half = (window_length / 2) as f64;
    let a = design_matrix(window_length, poly_order, -half);
    let ata = a.transpose() * &a;

    // The center value of the fit is the constant coefficient, so the
    // weight vector is A · (AᵀA)⁻¹ e₀.
    let mut e0 = DVector::zeros(poly_order + 1);
    e0[0] = 1.0;
    let c = ata.lu().solve(&e0).ok_or(SignalError::SingularFit)?;
    Ok((a * c).iter().copied().collect())
}

/// Least-squares polynomial coefficients (ascending powers) over
/// `x = 0..window.len()`.
fn fit_polynomial(window: &[f64], poly_order: usize) -> Result<DVector<f64>, SignalError> {
    let a = design_matrix(window.len(), poly_order, 0.0);
    let yv = DVector::from_column_slice(window);
    let ata = a.transpose() * &a;
    let aty = a.transpose() * yv;
    ata.lu().solve(&aty).ok_or(SignalError::SingularFit)
}

fn eval_polynomial(coeffs: &DVector<f64>, x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_preserved() {
        let y = vec![4.2; 50];
        let smooth = savgol_filter(&y, 25, 3).unwrap();
        assert_eq!(smooth.len(), y.len());
        for v in smooth {
            assert!((v - 4.2).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cubic_reproduced_exactly() {
        // An order-3 fit reproduces any cubic, at the edges included.
        let y: Vec<f64> = (0..40)
            .map(|i| {
                let x = i as f64;
                0.5 * x * x * x - 2.0 * x * x + 3.0 * x - 1.0
            })
            .collect();
        let smooth = savgol_filter(&y, 7, 3).unwrap();
        for (a, b) in smooth.iter().zip(&y) {
            assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
        }
    }

    #[test]
    fn test_noise_reduction() {
        // Alternating noise around a constant should shrink a lot.
        let y: Vec<f64> = (0..100)
            .map(|i| 1.0 + if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();
        let smooth = savgol_filter(&y, 25, 3).unwrap();
        let max_dev = smooth[12..88]
            .iter()
            .map(|v| (v - 1.0).abs())
            .fold(0.0, f64::max);
        assert!(max_dev < 0.05);
    }

    #[test]
    fn test_rejects_even_window() {
        assert!(matches!(
            savgol_filter(&[0.0; 30], 24, 3),
            Err(SignalError::InvalidWindow(24))
        ));
    }

    #[test]
    fn test_rejects_order_not_below_window() {
        assert!(matches!(
            savgol_filter(&[0.0; 30], 5, 5),
            Err(SignalError::OrderTooHigh { .. })
        ));
    }

    #[test]
    fn test_rejects_short_input() {
        let err = savgol_filter(&[0.0; 10], 25, 3).unwrap_err();
        assert!(matches!(
            err,
            SignalError::InsufficientData {
                len: 10,
                window_length: 25
            }
        ));
    }
}

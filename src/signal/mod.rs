//! # Spectral Signal Processing
//!
//! Building blocks for the band-gap extractor: Savitzky-Golay smoothing,
//! a discrete gradient, and local-maxima detection. The routines operate on
//! plain `f64` slices and carry no unit semantics; callers decide what the
//! samples mean.
//!
//! ## Example
//!
//! ```rust
//! use labnorm::signal::{savgol_filter, gradient, find_peaks};
//!
//! let noisy: Vec<f64> = (0..100).map(|i| (i as f64 / 10.0).sin()).collect();
//! let smooth = savgol_filter(&noisy, 25, 3)?;
//! let slope = gradient(&smooth);
//! let peaks = find_peaks(&slope, 0.05);
//! # assert!(peaks.len() <= 2);
//! # Ok::<(), labnorm::signal::SignalError>(())
//! ```

mod peaks;
mod savgol;

pub use peaks::find_peaks;
pub use savgol::savgol_filter;

/// Errors from the signal-processing routines.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Window length must be odd and nonzero.
    #[error("window length must be odd and nonzero, got {0}")]
    InvalidWindow(usize),

    /// Polynomial order must be smaller than the window.
    #[error("polynomial order {poly_order} must be less than window length {window_length}")]
    OrderTooHigh {
        /// Requested polynomial order.
        poly_order: usize,
        /// Requested window length.
        window_length: usize,
    },

    /// Input has fewer samples than one filter window.
    #[error("input length {len} is shorter than window length {window_length}")]
    InsufficientData {
        /// Number of input samples.
        len: usize,
        /// Requested window length.
        window_length: usize,
    },

    /// The least-squares system could not be solved.
    #[error("least-squares fit is singular")]
    SingularFit,
}

/// Discrete first derivative with unit sample spacing.
///
/// Central differences in the interior, one-sided differences at the two
/// ends. Inputs shorter than two samples have no slope and yield zeros.
pub fn gradient(y: &[f64]) -> Vec<f64> {
    let n = y.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let mut grad = vec![0.0; n];
    grad[0] = y[1] - y[0];
    grad[n - 1] = y[n - 1] - y[n - 2];
    for i in 1..n - 1 {
        grad[i] = (y[i + 1] - y[i - 1]) / 2.0;
    }
    grad
}

//! # Optical Band-Gap Extraction
//!
//! Derives a band-gap energy from a UV-Vis absorbance spectrum. The
//! absorption edge, the wavelength where absorbance falls off sharply,
//! shows up as a maximum in the negated derivative of the smoothed
//! absorbance curve; its wavelength converts to a photon energy via
//! E = h·c/λ.
//!
//! The extraction is deliberately strict: exactly one edge must stand out
//! above the detection threshold. Zero or multiple candidate edges are
//! classified failures the caller can report per sample, not panics.
//!
//! ## Example
//!
//! ```rust
//! use labnorm::bandgap::extract_band_gap;
//! use labnorm::spectrum::Spectrum;
//!
//! // A sharp absorption edge at 500 nm.
//! let wavelength: Vec<f64> = (0..500).map(|i| 450.0 + 0.2 * i as f64).collect();
//! let absorbance: Vec<f64> = wavelength
//!     .iter()
//!     .map(|&x| 1.0 / (((x - 500.0) / 1.0).exp() + 1.0))
//!     .collect();
//! let spectrum = Spectrum::new(wavelength, absorbance).unwrap();
//!
//! let band_gap = extract_band_gap(&spectrum)?;
//! assert!((band_gap.magnitude - 2.48).abs() < 0.05);
//! # Ok::<(), labnorm::bandgap::ExtractError>(())
//! ```

use log::debug;

use crate::constants::HC_EV_NM;
use crate::quantity::Quantity;
use crate::signal::{find_peaks, gradient, savgol_filter, SignalError};
use crate::spectrum::Spectrum;

/// Tuning parameters for the extractor.
///
/// The defaults are the reference values the instrument pipeline was
/// calibrated with; override them only for instruments with a different
/// sampling density or noise floor.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Savitzky-Golay window length in samples (odd).
    pub window_length: usize,
    /// Savitzky-Golay polynomial order.
    pub poly_order: usize,
    /// Minimum edge-strength a candidate absorption edge must reach, in the
    /// negated-derivative signal's native units. A fixed constant, not
    /// derived from the data.
    pub peak_height: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            window_length: 25,
            poly_order: 3,
            peak_height: 0.015,
        }
    }
}

/// Errors raised by the band-gap extractor.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The spectrum holds fewer samples than one smoothing window
    #[error("spectrum has {len} samples, fewer than the smoothing window of {window_length}")]
    InsufficientData {
        /// Number of spectrum samples.
        len: usize,
        /// Configured smoothing window length.
        window_length: usize,
    },

    /// No candidate edge reached the detection threshold
    #[error("no absorption edge found above edge-strength threshold {threshold}")]
    NoAbsorptionEdge {
        /// Threshold the edge-strength signal was screened against.
        threshold: f64,
    },

    /// More than one candidate edge reached the detection threshold
    #[error("absorption edge is ambiguous: {count} candidate edges above threshold")]
    AmbiguousAbsorptionEdge {
        /// Number of qualifying edges.
        count: usize,
    },

    /// The smoothing configuration is unusable
    #[error("signal processing error: {0}")]
    Signal(#[from] SignalError),
}

/// Extract the band-gap energy from `spectrum` with the default
/// configuration (window 25, order 3, threshold 0.015).
pub fn extract_band_gap(spectrum: &Spectrum) -> Result<Quantity, ExtractError> {
    extract_band_gap_with_config(spectrum, &ExtractorConfig::default())
}

/// Extract the band-gap energy from `spectrum`.
///
/// Wavelengths are interpreted in nanometers and the result is expressed in
/// electronvolts. Pure computation over the input; deterministic for
/// deterministic input.
pub fn extract_band_gap_with_config(
    spectrum: &Spectrum,
    config: &ExtractorConfig,
) -> Result<Quantity, ExtractError> {
    let len = spectrum.len();
    if len < config.window_length {
        return Err(ExtractError::InsufficientData {
            len,
            window_length: config.window_length,
        });
    }

    // Denoise, then locate inflection points of the absorbance curve as
    // maxima of the negated first derivative.
    let smoothed = savgol_filter(spectrum.absorbance(), config.window_length, config.poly_order)?;
    let edge_strength: Vec<f64> = gradient(&smoothed).iter().map(|g| -g).collect();

    let peaks = find_peaks(&edge_strength, config.peak_height);
    let peak = match peaks.as_slice() {
        [] => {
            return Err(ExtractError::NoAbsorptionEdge {
                threshold: config.peak_height,
            })
        }
        [single] => *single,
        multiple => {
            return Err(ExtractError::AmbiguousAbsorptionEdge {
                count: multiple.len(),
            })
        }
    };

    let peak_wavelength = spectrum.wavelength()[peak];
    let energy = HC_EV_NM / peak_wavelength;
    debug!(
        "absorption edge at {:.2} nm (edge strength {:.4}) -> {:.4} eV",
        peak_wavelength, edge_strength[peak], energy
    );

    Ok(Quantity::electronvolts(energy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logistic_spectrum(center: f64) -> Spectrum {
        let wavelength: Vec<f64> = (0..500).map(|i| 450.0 + 100.0 * i as f64 / 499.0).collect();
        let absorbance: Vec<f64> = wavelength
            .iter()
            .map(|&x| 1.0 / (((x - center) / 1.0).exp() + 1.0))
            .collect();
        Spectrum::new(wavelength, absorbance).unwrap()
    }

    #[test]
    fn test_single_edge() {
        let spectrum = logistic_spectrum(500.0);
        let energy = extract_band_gap(&spectrum).unwrap();
        // E = hc / 500 nm = 2.4797 eV; allow a little smoothing shift.
        assert!(
            (energy.magnitude - 2.4797).abs() < 0.025,
            "got {}",
            energy
        );
    }

    #[test]
    fn test_flat_spectrum_has_no_edge() {
        let wavelength: Vec<f64> = (0..100).map(|i| 400.0 + i as f64).collect();
        let absorbance = vec![0.5; 100];
        let spectrum = Spectrum::new(wavelength, absorbance).unwrap();
        let err = extract_band_gap(&spectrum).unwrap_err();
        assert!(matches!(err, ExtractError::NoAbsorptionEdge { .. }));
    }

    #[test]
    fn test_gentle_slope_below_threshold() {
        // Monotonic decay shallower than the threshold: no edge.
        let wavelength: Vec<f64> = (0..200).map(|i| 400.0 + i as f64).collect();
        let absorbance: Vec<f64> = (0..200).map(|i| 1.0 - 0.001 * i as f64).collect();
        let spectrum = Spectrum::new(wavelength, absorbance).unwrap();
        let err = extract_band_gap(&spectrum).unwrap_err();
        assert!(matches!(err, ExtractError::NoAbsorptionEdge { .. }));
    }

    #[test]
    fn test_two_edges_are_ambiguous() {
        let wavelength: Vec<f64> = (0..500).map(|i| 450.0 + 100.0 * i as f64 / 499.0).collect();
        let absorbance: Vec<f64> = wavelength
            .iter()
            .map(|&x| {
                1.0 / (((x - 470.0) / 1.0).exp() + 1.0) + 1.0 / (((x - 530.0) / 1.0).exp() + 1.0)
            })
            .collect();
        let spectrum = Spectrum::new(wavelength, absorbance).unwrap();
        let err = extract_band_gap(&spectrum).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::AmbiguousAbsorptionEdge { count: 2 }
        ));
    }

    #[test]
    fn test_insufficient_data() {
        let wavelength: Vec<f64> = (0..10).map(|i| 450.0 + i as f64).collect();
        let absorbance = vec![0.5; 10];
        let spectrum = Spectrum::new(wavelength, absorbance).unwrap();
        let err = extract_band_gap(&spectrum).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::InsufficientData {
                len: 10,
                window_length: 25
            }
        ));
    }

    #[test]
    fn test_bad_config_is_a_signal_error() {
        let spectrum = logistic_spectrum(500.0);
        let config = ExtractorConfig {
            window_length: 24,
            ..ExtractorConfig::default()
        };
        let err = extract_band_gap_with_config(&spectrum, &config).unwrap_err();
        assert!(matches!(err, ExtractError::Signal(_)));
    }
}

//! # Absorbance Spectrum Input
//!
//! Parsing and contract checks for optical absorbance spectra, the raw
//! output of a UV-Vis measurement. The on-disk form is a delimited text
//! table with exactly two numeric columns: wavelength (ascending, in
//! nanometers) and absorbance (arbitrary units).
//!
//! ## Example
//!
//! ```rust
//! use labnorm::spectrum::Spectrum;
//!
//! let table = "450.0,0.98\n500.0,0.50\n550.0,0.02\n";
//! let spectrum = Spectrum::from_reader(table.as_bytes())?;
//! assert_eq!(spectrum.len(), 3);
//! # Ok::<(), labnorm::spectrum::SpectrumError>(())
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Errors raised while reading a spectrum table.
#[derive(Debug, thiserror::Error)]
pub enum SpectrumError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row did not have exactly two columns
    #[error("row {row}: expected 2 columns (wavelength, absorbance), found {found}")]
    ColumnCount {
        /// 1-based row number.
        row: usize,
        /// Number of columns found.
        found: usize,
    },

    /// A cell did not parse as a number
    #[error("row {row}: '{value}' is not a number")]
    NumericField {
        /// 1-based row number.
        row: usize,
        /// Offending cell contents.
        value: String,
    },

    /// A parsed value was NaN or infinite
    #[error("row {row}: non-finite value")]
    NonFinite {
        /// 1-based row number.
        row: usize,
    },

    /// Wavelengths must be strictly increasing
    #[error("row {row}: wavelength does not increase over the previous row")]
    NotAscending {
        /// 1-based row number.
        row: usize,
    },

    /// The table held no data rows
    #[error("spectrum table is empty")]
    Empty,

    /// Constructor arrays disagree in length
    #[error("wavelength ({wavelengths}) and absorbance ({absorbances}) lengths differ")]
    LengthMismatch {
        /// Number of wavelength samples.
        wavelengths: usize,
        /// Number of absorbance samples.
        absorbances: usize,
    },
}

/// An ordered absorbance-vs-wavelength spectrum.
///
/// Wavelengths are strictly increasing and every sample is finite; both are
/// enforced at construction, so downstream numerics never re-check.
#[derive(Debug, Clone)]
pub struct Spectrum {
    wavelength: Vec<f64>,
    absorbance: Vec<f64>,
}

impl Spectrum {
    /// Build a spectrum from aligned wavelength/absorbance arrays.
    pub fn new(wavelength: Vec<f64>, absorbance: Vec<f64>) -> Result<Self, SpectrumError> {
        if wavelength.len() != absorbance.len() {
            return Err(SpectrumError::LengthMismatch {
                wavelengths: wavelength.len(),
                absorbances: absorbance.len(),
            });
        }
        if wavelength.is_empty() {
            return Err(SpectrumError::Empty);
        }
        for (i, (&w, &a)) in wavelength.iter().zip(&absorbance).enumerate() {
            if !w.is_finite() || !a.is_finite() {
                return Err(SpectrumError::NonFinite { row: i + 1 });
            }
            if i > 0 && w <= wavelength[i - 1] {
                return Err(SpectrumError::NotAscending { row: i + 1 });
            }
        }
        Ok(Self {
            wavelength,
            absorbance,
        })
    }

    /// Read a spectrum from a two-column delimited file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SpectrumError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read a spectrum from any delimited-table reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SpectrumError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut wavelength = Vec::new();
        let mut absorbance = Vec::new();

        for (i, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = i + 1;
            if record.len() != 2 {
                return Err(SpectrumError::ColumnCount {
                    row,
                    found: record.len(),
                });
            }
            wavelength.push(parse_cell(&record[0], row)?);
            absorbance.push(parse_cell(&record[1], row)?);
        }

        Self::new(wavelength, absorbance)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.wavelength.len()
    }

    /// True when the spectrum holds no samples. `new` rejects this, so a
    /// constructed spectrum always returns false.
    pub fn is_empty(&self) -> bool {
        self.wavelength.is_empty()
    }

    /// Wavelength samples, strictly increasing, in nanometers.
    pub fn wavelength(&self) -> &[f64] {
        &self.wavelength
    }

    /// Absorbance samples aligned with [`Self::wavelength`].
    pub fn absorbance(&self) -> &[f64] {
        &self.absorbance
    }
}

fn parse_cell(cell: &str, row: usize) -> Result<f64, SpectrumError> {
    cell.parse::<f64>()
        .map_err(|_| SpectrumError::NumericField {
            row,
            value: cell.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_columns() {
        let s = Spectrum::from_reader("450,1.0\n451,0.9\n452,0.8\n".as_bytes()).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.wavelength(), &[450.0, 451.0, 452.0]);
        assert_eq!(s.absorbance(), &[1.0, 0.9, 0.8]);
    }

    #[test]
    fn test_whitespace_trimmed() {
        let s = Spectrum::from_reader(" 450 , 1.0 \n451,0.9\n".as_bytes()).unwrap();
        assert_eq!(s.wavelength()[0], 450.0);
    }

    #[test]
    fn test_column_count() {
        let err = Spectrum::from_reader("450,1.0,9\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SpectrumError::ColumnCount { row: 1, found: 3 }));
    }

    #[test]
    fn test_non_numeric() {
        let err = Spectrum::from_reader("450,abc\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SpectrumError::NumericField { row: 1, .. }));
    }

    #[test]
    fn test_not_ascending() {
        let err = Spectrum::from_reader("450,1.0\n450,0.9\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SpectrumError::NotAscending { row: 2 }));
    }

    #[test]
    fn test_non_finite() {
        let err = Spectrum::from_reader("450,NaN\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SpectrumError::NonFinite { row: 1 }));
    }

    #[test]
    fn test_empty_table() {
        let err = Spectrum::from_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, SpectrumError::Empty));
    }

    #[test]
    fn test_length_mismatch() {
        let err = Spectrum::new(vec![1.0, 2.0], vec![0.5]).unwrap_err();
        assert!(matches!(
            err,
            SpectrumError::LengthMismatch {
                wavelengths: 2,
                absorbances: 1
            }
        ));
    }
}

//! # Elemental Composition Input
//!
//! Parsing for elemental-composition tables, e.g. from X-ray fluorescence.
//! The first column holds element symbols; any further columns (fractions,
//! uncertainties, instrument diagnostics) are ignored. Symbols that are not
//! chemical elements are kept in place but logged, so a typo in a raw file
//! shows up in the normalization log instead of vanishing.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::warn;

use crate::chemistry;

/// Errors raised while reading a composition table.
#[derive(Debug, thiserror::Error)]
pub enum CompositionError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row had an empty first column
    #[error("row {row}: empty element symbol")]
    EmptySymbol {
        /// 1-based row number.
        row: usize,
    },

    /// The table held no data rows
    #[error("composition table is empty")]
    Empty,
}

/// Ordered element symbols extracted from a composition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRecord {
    elements: Vec<String>,
}

impl CompositionRecord {
    /// Read a composition record from a delimited file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CompositionError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read a composition record from any delimited-table reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CompositionError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut elements = Vec::new();
        for (i, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = i + 1;
            let symbol = record
                .get(0)
                .unwrap_or("")
                .to_string();
            if symbol.is_empty() {
                return Err(CompositionError::EmptySymbol { row });
            }
            if !chemistry::is_element_symbol(&symbol) {
                warn!("composition row {}: '{}' is not an element symbol", row, symbol);
            }
            elements.push(symbol);
        }

        if elements.is_empty() {
            return Err(CompositionError::Empty);
        }
        Ok(Self { elements })
    }

    /// Element symbols in file order.
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// Consume the record, yielding the symbols in file order.
    pub fn into_elements(self) -> Vec<String> {
        self.elements
    }
}

//! Unit-carrying scalar values.
//!
//! Derived properties are stored with an explicit unit so downstream
//! consumers never have to guess what a bare float means. Only the units the
//! crate actually produces are modeled; this is not a general units system.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical unit of a [`Quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Energy in electronvolts.
    Electronvolt,
    /// Length in nanometers.
    Nanometer,
}

impl Unit {
    /// Conventional short symbol for the unit.
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Electronvolt => "eV",
            Unit::Nanometer => "nm",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A scalar magnitude together with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// Numeric magnitude in `unit`.
    pub magnitude: f64,
    /// Unit of `magnitude`.
    pub unit: Unit,
}

impl Quantity {
    /// An energy in electronvolts.
    pub fn electronvolts(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: Unit::Electronvolt,
        }
    }

    /// A length in nanometers.
    pub fn nanometers(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: Unit::Nanometer,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit)
    }
}

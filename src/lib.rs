//! # labnorm - Laboratory Sample Normalization
//!
//! `labnorm` turns raw instrument output attached to a laboratory sample -
//! an elemental-composition table and a UV-Vis absorbance spectrum - into
//! structured, queryable scientific properties: the set of chemical
//! elements, and an optical band-gap energy. Derived values are written
//! into a statically-typed, schema-defined archive tree addressed by
//! dotted paths, so downstream consumers read them uniformly no matter
//! which instrument produced them.
//!
//! ## Key Pieces
//!
//! - **Band-gap extraction**: a noisy absorbance spectrum is smoothed with
//!   a Savitzky-Golay filter, differentiated, and scanned for exactly one
//!   absorption edge above a fixed threshold; the edge wavelength converts
//!   to energy via E = h·c/λ. Zero or several candidate edges are
//!   classified, recoverable errors, never panics.
//!
//! - **Typed path resolution**: archive sections are created lazily along
//!   dotted paths, driven purely by schema metadata (slot cardinality and
//!   child type). Resolution is idempotent and refuses to guess when a
//!   repeated slot already holds several children.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use labnorm::archive::standard_schema;
//! use labnorm::bandgap::ExtractorConfig;
//! use labnorm::normalize::{normalize, SampleRecord};
//!
//! let mut record = SampleRecord::new();
//! record.composition_file = Some("x_ray_fluorescence.csv".into());
//! record.band_gap_file = Some("uv_vis_spectrum.csv".into());
//!
//! let schema = standard_schema();
//! let report = normalize(&mut record, &schema, &ExtractorConfig::default())?;
//!
//! println!("elements: {:?}", report.elements);
//! println!("band gap: {:?}", report.band_gap);
//! println!("{}", serde_json::to_string_pretty(&record)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`spectrum`] / [`composition`]: delimited instrument-table parsing
//! - [`signal`]: smoothing, gradient, and peak detection primitives
//! - [`bandgap`]: the band-gap extractor built on [`signal`]
//! - [`archive`]: the typed result tree, its schema, and path resolution
//! - [`normalize`]: the per-sample orchestration step
//! - [`validator`]: conformance reports for serialized archives
//! - [`config`]: TOML tuning files for the CLI
//!
//! ## Input Formats
//!
//! | File | Columns | Consumed as |
//! |------|---------|-------------|
//! | composition | element symbol, rest ignored | ordered symbol list |
//! | spectrum | wavelength (nm, ascending), absorbance | aligned float arrays |
//!
//! Both are plain delimited text straight off the instrument; no header
//! rows are expected.

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod archive;
pub mod bandgap;
pub mod chemistry;
pub mod composition;
pub mod config;
pub mod constants;
pub mod normalize;
pub mod quantity;
pub mod signal;
pub mod spectrum;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::archive::{
        resolve, resolve_assign, standard_schema, Cardinality, ResolveError, Schema, Section,
        SectionDef, SlotDecl, Value, ValueKind,
    };
    pub use crate::bandgap::{extract_band_gap, ExtractError, ExtractorConfig};
    pub use crate::composition::{CompositionError, CompositionRecord};
    pub use crate::normalize::{normalize, NormalizeError, NormalizeReport, SampleRecord};
    pub use crate::quantity::{Quantity, Unit};
    pub use crate::spectrum::{Spectrum, SpectrumError};
    pub use crate::validator::{validate_archive, validate_archive_file, ValidationReport};
}

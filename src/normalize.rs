//! # Sample Normalization
//!
//! The normalization step runs whenever a sample record is processed: it
//! fills in missing sample metadata, reads whichever raw instrument files
//! are attached, derives structured properties from them, and writes the
//! results into the sample's archive tree.
//!
//! Derivation failures are per-property: a spectrum with no usable
//! absorption edge is recorded in the [`NormalizeReport`] and logged, and
//! the remaining properties still run, so one bad file never aborts a
//! batch. Archive resolution failures do propagate: they mean the schema
//! and the write paths disagree, which no amount of skipping repairs.
//!
//! ## Example
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
//! if let Some(gap) = report.band_gap {
//!     println!("band gap: {}", gap);
//! }
//! # Ok::<(), labnorm::normalize::NormalizeError>(())
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::archive::{paths, resolve_assign, section_types, ResolveError, Schema, Section, Value};
use crate::bandgap::{extract_band_gap_with_config, ExtractError, ExtractorConfig};
use crate::composition::{CompositionError, CompositionRecord};
use crate::quantity::Quantity;
use crate::spectrum::{Spectrum, SpectrumError};

/// Institute recorded when a sample does not name one.
pub const DEFAULT_INSTITUTE: &str = "Unknown institute";

/// A laboratory sample record: identifying metadata, attached raw files,
/// and the archive tree derived values are written into.
#[derive(Debug, Serialize)]
pub struct SampleRecord {
    /// Unique sample identifier; generated during normalization if unset.
    pub sample_id: Option<Uuid>,
    /// Human-readable sample name.
    pub name: Option<String>,
    /// Record creation time; defaulted during normalization if unset.
    pub datetime: Option<DateTime<Utc>>,
    /// Institute the sample belongs to; defaulted during normalization.
    pub institute: Option<String>,
    /// Attached elemental-composition table, if any.
    pub composition_file: Option<PathBuf>,
    /// Attached absorbance spectrum table, if any.
    pub band_gap_file: Option<PathBuf>,
    /// Derived-results tree, rooted at a `Sample` section.
    pub archive: Section,
}

impl SampleRecord {
    /// An empty record with no metadata, no raw files, and a bare archive.
    pub fn new() -> Self {
        Self {
            sample_id: None,
            name: None,
            datetime: None,
            institute: None,
            composition_file: None,
            band_gap_file: None,
            archive: Section::new(section_types::SAMPLE),
        }
    }
}

impl Default for SampleRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Which derived property a report entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedProperty {
    /// Element list from the composition file.
    Composition,
    /// Band-gap energy from the absorbance spectrum.
    BandGap,
}

impl fmt::Display for DerivedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivedProperty::Composition => f.write_str("composition"),
            DerivedProperty::BandGap => f.write_str("band gap"),
        }
    }
}

/// Why a derived property was skipped.
#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    /// Composition table unreadable
    #[error(transparent)]
    Composition(#[from] CompositionError),

    /// Spectrum table unreadable
    #[error(transparent)]
    Spectrum(#[from] SpectrumError),

    /// Band-gap extraction failed
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// One property that could not be derived, with its classified cause.
#[derive(Debug)]
pub struct SkippedProperty {
    /// The property that was skipped.
    pub property: DerivedProperty,
    /// What went wrong.
    pub error: PropertyError,
}

/// Outcome of one normalization run.
#[derive(Debug, Default)]
pub struct NormalizeReport {
    /// Elements written to the archive, in file order.
    pub elements: Option<Vec<String>>,
    /// Band-gap energy written to the archive.
    pub band_gap: Option<Quantity>,
    /// Properties that could not be derived this run.
    pub skipped: Vec<SkippedProperty>,
}

/// Errors that abort normalization outright.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// The archive tree rejected a write path
    #[error("archive resolution failed: {0}")]
    Resolve(#[from] ResolveError),
}

/// Normalize `record`: default its metadata, derive properties from the
/// attached raw files, and write them into the archive.
pub fn normalize(
    record: &mut SampleRecord,
    schema: &Schema,
    config: &ExtractorConfig,
) -> Result<NormalizeReport, NormalizeError> {
    apply_metadata_defaults(record);

    let mut report = NormalizeReport::default();

    if let Some(path) = record.composition_file.clone() {
        match read_composition(&path) {
            Ok(elements) => {
                resolve_assign(
                    schema,
                    &mut record.archive,
                    paths::MATERIAL_ELEMENTS,
                    Value::StrList(elements.clone()),
                )?;
                info!(
                    "recorded {} element(s) from {}",
                    elements.len(),
                    path.display()
                );
                report.elements = Some(elements);
            }
            Err(error) => {
                warn!("skipping composition from {}: {}", path.display(), error);
                report.skipped.push(SkippedProperty {
                    property: DerivedProperty::Composition,
                    error,
                });
            }
        }
    }

    if let Some(path) = record.band_gap_file.clone() {
        match read_band_gap(&path, config) {
            Ok(energy) => {
                resolve_assign(
                    schema,
                    &mut record.archive,
                    paths::BAND_GAP_VALUE,
                    Value::Energy(energy),
                )?;
                info!("recorded band gap {} from {}", energy, path.display());
                report.band_gap = Some(energy);
            }
            Err(error) => {
                warn!("skipping band gap from {}: {}", path.display(), error);
                report.skipped.push(SkippedProperty {
                    property: DerivedProperty::BandGap,
                    error,
                });
            }
        }
    }

    Ok(report)
}

fn apply_metadata_defaults(record: &mut SampleRecord) {
    if record.sample_id.is_none() {
        record.sample_id = Some(Uuid::new_v4());
    }
    if record.datetime.is_none() {
        record.datetime = Some(Utc::now());
    }
    if record.institute.is_none() {
        record.institute = Some(DEFAULT_INSTITUTE.to_string());
    }
}

fn read_composition(path: &Path) -> Result<Vec<String>, PropertyError> {
    let composition = CompositionRecord::from_file(path)?;
    Ok(composition.into_elements())
}

fn read_band_gap(path: &Path, config: &ExtractorConfig) -> Result<Quantity, PropertyError> {
    let spectrum = Spectrum::from_file(path)?;
    Ok(extract_band_gap_with_config(&spectrum, config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::standard_schema;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn logistic_csv() -> String {
        let mut out = String::new();
        for i in 0..500 {
            let x = 450.0 + 100.0 * i as f64 / 499.0;
            let y = 1.0 / (((x - 500.0) / 1.0).exp() + 1.0);
            out.push_str(&format!("{x},{y}\n"));
        }
        out
    }

    #[test]
    fn test_metadata_defaults_applied() {
        let mut record = SampleRecord::new();
        let schema = standard_schema();
        normalize(&mut record, &schema, &ExtractorConfig::default()).unwrap();

        assert!(record.sample_id.is_some());
        assert!(record.datetime.is_some());
        assert_eq!(record.institute.as_deref(), Some(DEFAULT_INSTITUTE));
    }

    #[test]
    fn test_existing_metadata_untouched() {
        let mut record = SampleRecord::new();
        record.institute = Some("MPI".to_string());
        let schema = standard_schema();
        normalize(&mut record, &schema, &ExtractorConfig::default()).unwrap();
        assert_eq!(record.institute.as_deref(), Some("MPI"));
    }

    #[test]
    fn test_both_properties_derived() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = SampleRecord::new();
        record.composition_file = Some(write_file(&dir, "xrf.csv", "Si,0.33\nO,0.67\n"));
        record.band_gap_file = Some(write_file(&dir, "uvvis.csv", &logistic_csv()));

        let schema = standard_schema();
        let report = normalize(&mut record, &schema, &ExtractorConfig::default()).unwrap();

        assert_eq!(
            report.elements.as_deref(),
            Some(&["Si".to_string(), "O".to_string()][..])
        );
        let gap = report.band_gap.unwrap();
        assert!((gap.magnitude - 2.48).abs() < 0.05, "got {gap}");
        assert!(report.skipped.is_empty());

        // The values landed in the archive.
        let material = record.archive.find("results.material").unwrap();
        assert!(material.field("elements").is_some());
        let band_gap = record
            .archive
            .find("results.properties.electronic.band_structure_electronic.band_gap")
            .unwrap();
        assert!(band_gap.field("value").is_some());
    }

    #[test]
    fn test_bad_spectrum_skips_only_band_gap() {
        let dir = tempfile::tempdir().unwrap();
        let mut flat = String::new();
        for i in 0..100 {
            flat.push_str(&format!("{},0.5\n", 400.0 + i as f64));
        }
        let mut record = SampleRecord::new();
        record.composition_file = Some(write_file(&dir, "xrf.csv", "Ga\nAs\n"));
        record.band_gap_file = Some(write_file(&dir, "uvvis.csv", &flat));

        let schema = standard_schema();
        let report = normalize(&mut record, &schema, &ExtractorConfig::default()).unwrap();

        assert!(report.elements.is_some());
        assert!(report.band_gap.is_none());
        assert_eq!(report.skipped.len(), 1);
        let skipped = &report.skipped[0];
        assert_eq!(skipped.property, DerivedProperty::BandGap);
        assert!(matches!(
            skipped.error,
            PropertyError::Extract(ExtractError::NoAbsorptionEdge { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_recorded() {
        let mut record = SampleRecord::new();
        record.composition_file = Some(PathBuf::from("/nonexistent/xrf.csv"));
        let schema = standard_schema();
        let report = normalize(&mut record, &schema, &ExtractorConfig::default()).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(
            report.skipped[0].error,
            PropertyError::Composition(CompositionError::Io(_))
        ));
    }

    #[test]
    fn test_renormalization_does_not_duplicate_sections() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = SampleRecord::new();
        record.band_gap_file = Some(write_file(&dir, "uvvis.csv", &logistic_csv()));

        let schema = standard_schema();
        normalize(&mut record, &schema, &ExtractorConfig::default()).unwrap();
        let count_after_first = record.archive.node_count();
        normalize(&mut record, &schema, &ExtractorConfig::default()).unwrap();
        assert_eq!(record.archive.node_count(), count_after_first);
    }
}

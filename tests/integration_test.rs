//! Integration tests for labnorm
//!
//! These tests run the full pipeline: raw instrument files on disk, sample
//! normalization, archive JSON output, and validation of that output.

use std::fs;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::tempdir;

use labnorm::archive::{section_types, standard_schema};
use labnorm::bandgap::ExtractorConfig;
use labnorm::normalize::{normalize, SampleRecord};
use labnorm::validator::{validate_archive, validate_archive_file};

/// A 500-point spectrum over 450-550 nm: logistic absorbance step centered
/// at 500 nm with small additive noise, the shape a UV-Vis instrument
/// produces for a material with a 2.48 eV gap.
fn noisy_logistic_csv(seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::new();
    for i in 0..500 {
        let x = 450.0 + 100.0 * i as f64 / 499.0;
        let y = 1.0 / (((x - 500.0) / 1.0).exp() + 1.0) + 0.02 * rng.gen::<f64>();
        out.push_str(&format!("{x},{y}\n"));
    }
    out
}

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Full cycle: raw files -> normalize -> archive JSON -> validate.
#[test]
fn test_normalize_validate_cycle() {
    let dir = tempdir().unwrap();
    let composition = write_file(&dir, "x_ray_fluorescence.csv", "Si,0.33\nO,0.67\n");
    let spectrum = write_file(&dir, "uv_vis_spectrum.csv", &noisy_logistic_csv(7));

    let mut record = SampleRecord::new();
    record.name = Some("sample-001".to_string());
    record.composition_file = Some(composition);
    record.band_gap_file = Some(spectrum);

    let schema = standard_schema();
    let report = normalize(&mut record, &schema, &ExtractorConfig::default()).unwrap();

    // Elements come out in file order.
    assert_eq!(
        report.elements.as_deref(),
        Some(&["Si".to_string(), "O".to_string()][..])
    );

    // E = hc / 500 nm = 2.4797 eV, within a few percent given smoothing
    // and the synthetic noise.
    let band_gap = report.band_gap.expect("band gap should be derived");
    assert!(
        (band_gap.magnitude - 2.4797).abs() / 2.4797 < 0.03,
        "band gap off: {band_gap}"
    );
    assert!(report.skipped.is_empty());

    // Metadata defaults were applied.
    assert!(record.sample_id.is_some());
    assert!(record.datetime.is_some());
    assert!(record.institute.is_some());

    // Write the record out and validate the file the way the CLI does.
    let archive_path = dir.path().join("archive.json");
    fs::write(
        &archive_path,
        serde_json::to_string_pretty(&record).unwrap(),
    )
    .unwrap();

    let validation = validate_archive_file(&archive_path, &schema).unwrap();
    assert!(!validation.has_failures(), "{validation}");
    assert!(!validation.has_warnings(), "{validation}");
}

/// Normalizing the same record twice must not duplicate archive structure.
#[test]
fn test_renormalization_is_idempotent() {
    let dir = tempdir().unwrap();
    let spectrum = write_file(&dir, "uv_vis_spectrum.csv", &noisy_logistic_csv(11));

    let mut record = SampleRecord::new();
    record.band_gap_file = Some(spectrum);

    let schema = standard_schema();
    normalize(&mut record, &schema, &ExtractorConfig::default()).unwrap();
    let node_count = record.archive.node_count();
    let first_gap = record
        .archive
        .find("results.properties.electronic.band_structure_electronic.band_gap")
        .unwrap()
        .field("value")
        .cloned();

    normalize(&mut record, &schema, &ExtractorConfig::default()).unwrap();
    assert_eq!(record.archive.node_count(), node_count);
    let second_gap = record
        .archive
        .find("results.properties.electronic.band_structure_electronic.band_gap")
        .unwrap()
        .field("value")
        .cloned();
    assert_eq!(first_gap, second_gap);
}

/// A spectrum with two well-separated edges is refused, and the archive
/// stays free of a half-written band gap.
#[test]
fn test_ambiguous_spectrum_leaves_archive_clean() {
    let dir = tempdir().unwrap();
    let mut table = String::new();
    for i in 0..500 {
        let x = 450.0 + 100.0 * i as f64 / 499.0;
        let y = 1.0 / (((x - 470.0) / 1.0).exp() + 1.0) + 1.0 / (((x - 530.0) / 1.0).exp() + 1.0);
        table.push_str(&format!("{x},{y}\n"));
    }
    let spectrum = write_file(&dir, "uv_vis_spectrum.csv", &table);

    let mut record = SampleRecord::new();
    record.band_gap_file = Some(spectrum);

    let schema = standard_schema();
    let report = normalize(&mut record, &schema, &ExtractorConfig::default()).unwrap();

    assert!(report.band_gap.is_none());
    assert_eq!(report.skipped.len(), 1);
    // No partial band-gap sections were created.
    assert!(record.archive.find("results.properties").is_none());
}

/// The serialized archive of a record with no derived properties is still
/// a valid (if empty) document.
#[test]
fn test_empty_record_serializes_and_validates() {
    let mut record = SampleRecord::new();
    let schema = standard_schema();
    normalize(&mut record, &schema, &ExtractorConfig::default()).unwrap();

    let json = serde_json::to_value(&record).unwrap();
    let validation = validate_archive(
        &json["archive"],
        &schema,
        section_types::SAMPLE,
        "in-memory",
    );
    assert!(!validation.has_failures());
}

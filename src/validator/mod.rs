//! # Archive Validation
//!
//! Conformance checking for serialized archives. A normalized sample can be
//! written out as JSON and picked up by downstream tooling; this module
//! verifies such a document still matches the schema it was produced
//! against before anything consumes it.
//!
//! ## Validation Checklist
//!
//! 1. **Schema consistency**: the schema itself is well-formed
//! 2. **Archive structure**: every key is a declared slot or field
//! 3. **Slot cardinality**: singleton slots hold at most one child
//! 4. **Field value kinds**: leaf values match their declarations
//! 5. **Data sanity**: semantic checks on the derived values
//!
//! ## Usage
//!
//! ```rust,no_run
//! use labnorm::archive::standard_schema;
//! use labnorm::validator::validate_archive_file;
//! use std::path::Path;
//!
//! let report = validate_archive_file(Path::new("archive.json"), &standard_schema())?;
//! println!("{}", report);
//! # Ok::<(), labnorm::validator::ValidatorError>(())
//! ```

mod report;

pub use report::{CheckStatus, ValidationCheck, ValidationReport};

use std::path::Path;

use serde_json::Value as JsonValue;

use crate::archive::{section_types, Cardinality, Schema, ValueKind};
use crate::chemistry;

/// Errors raised before validation can run at all.
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validate a serialized archive file against `schema`.
///
/// Accepts either a bare archive object or a full sample-record document
/// with an `archive` key, the form `labnorm normalize` writes.
pub fn validate_archive_file(
    path: &Path,
    schema: &Schema,
) -> Result<ValidationReport, ValidatorError> {
    let content = std::fs::read_to_string(path)?;
    let document: JsonValue = serde_json::from_str(&content)?;
    let archive = document.get("archive").unwrap_or(&document);
    Ok(validate_archive(
        archive,
        schema,
        section_types::SAMPLE,
        path.display().to_string(),
    ))
}

/// Validate an archive JSON value rooted at a section of type `root_type`.
pub fn validate_archive(
    archive: &JsonValue,
    schema: &Schema,
    root_type: &str,
    source: impl Into<String>,
) -> ValidationReport {
    let mut report = ValidationReport::new(source);

    match schema.validate() {
        Ok(()) => report.add_check(ValidationCheck::ok("schema consistency")),
        Err(err) => {
            report.add_check(ValidationCheck::failed("schema consistency", err.to_string()));
            // Walking an inconsistent schema would only produce noise.
            return report;
        }
    }

    let mut issues = Issues::default();
    walk(archive, root_type, "", schema, &mut issues);

    report.add_check(category_check("archive structure", &issues.structure));
    report.add_check(category_check("slot cardinality", &issues.cardinality));
    report.add_check(category_check("field value kinds", &issues.kinds));

    if !issues.sanity_failures.is_empty() {
        report.add_check(ValidationCheck::failed(
            "data sanity",
            issues.sanity_failures.join("; "),
        ));
    } else if !issues.sanity_warnings.is_empty() {
        report.add_check(ValidationCheck::warning(
            "data sanity",
            issues.sanity_warnings.join("; "),
        ));
    } else {
        report.add_check(ValidationCheck::ok("data sanity"));
    }

    report
}

#[derive(Default)]
struct Issues {
    structure: Vec<String>,
    cardinality: Vec<String>,
    kinds: Vec<String>,
    sanity_failures: Vec<String>,
    sanity_warnings: Vec<String>,
}

fn category_check(name: &str, issues: &[String]) -> ValidationCheck {
    if issues.is_empty() {
        ValidationCheck::ok(name)
    } else {
        ValidationCheck::failed(name, issues.join("; "))
    }
}

fn walk(json: &JsonValue, type_name: &str, path: &str, schema: &Schema, issues: &mut Issues) {
    let def = match schema.section(type_name) {
        Some(def) => def,
        None => {
            issues.structure.push(format!(
                "{}: section type '{}' is not defined",
                display_path(path),
                type_name
            ));
            return;
        }
    };
    let object = match json.as_object() {
        Some(object) => object,
        None => {
            issues.structure.push(format!(
                "{}: expected an object for '{}'",
                display_path(path),
                type_name
            ));
            return;
        }
    };

    for (key, value) in object {
        let child_path = join_path(path, key);
        if let Some(slot) = def.slot(key) {
            match slot.cardinality {
                Cardinality::Singleton => {
                    if let Some(children) = value.as_array() {
                        issues.cardinality.push(format!(
                            "{child_path}: singleton slot holds {} children",
                            children.len()
                        ));
                    } else {
                        walk(value, &slot.child_type, &child_path, schema, issues);
                    }
                }
                Cardinality::Repeated => match value.as_array() {
                    Some(children) => {
                        for (i, child) in children.iter().enumerate() {
                            let indexed = format!("{child_path}[{i}]");
                            walk(child, &slot.child_type, &indexed, schema, issues);
                        }
                    }
                    None => issues
                        .structure
                        .push(format!("{child_path}: repeated slot must be an array")),
                },
            }
        } else if let Some(field) = def.field_decl(key) {
            check_field(field.kind, key, value, &child_path, issues);
        } else {
            issues.structure.push(format!(
                "{child_path}: '{key}' is not declared on '{type_name}'"
            ));
        }
    }
}

fn check_field(kind: ValueKind, name: &str, value: &JsonValue, path: &str, issues: &mut Issues) {
    match kind {
        ValueKind::Float => {
            if !value.is_number() {
                issues.kinds.push(format!("{path}: expected a number"));
            }
        }
        ValueKind::Str => {
            if !value.is_string() {
                issues.kinds.push(format!("{path}: expected a string"));
            }
        }
        ValueKind::StrList => match value.as_array() {
            Some(items) if items.iter().all(JsonValue::is_string) => {
                if name == "elements" {
                    let unknown: Vec<&str> = items
                        .iter()
                        .filter_map(JsonValue::as_str)
                        .filter(|s| !chemistry::is_element_symbol(s))
                        .collect();
                    if !unknown.is_empty() {
                        issues.sanity_warnings.push(format!(
                            "{path}: not element symbols: {}",
                            unknown.join(", ")
                        ));
                    }
                }
            }
            _ => issues
                .kinds
                .push(format!("{path}: expected an array of strings")),
        },
        ValueKind::Energy => {
            let magnitude = value.get("magnitude").and_then(JsonValue::as_f64);
            let unit = value.get("unit").and_then(JsonValue::as_str);
            match (magnitude, unit) {
                (Some(magnitude), Some("electronvolt")) => {
                    if !magnitude.is_finite() || magnitude <= 0.0 {
                        issues
                            .sanity_failures
                            .push(format!("{path}: band-gap energy must be positive"));
                    } else if !(0.1..=20.0).contains(&magnitude) {
                        issues.sanity_warnings.push(format!(
                            "{path}: {magnitude} eV is outside the plausible band-gap range"
                        ));
                    }
                }
                (Some(_), Some(unit)) => issues
                    .kinds
                    .push(format!("{path}: '{unit}' is not an energy unit")),
                _ => issues.kinds.push(format!(
                    "{path}: expected an object with numeric magnitude and unit"
                )),
            }
        }
    }
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}

//! Dotted-path resolution over the archive tree.
//!
//! [`resolve`] walks a dot-delimited slot path from a root section,
//! materializing missing sections as it goes, and returns the section at
//! the end of the path. [`resolve_assign`] does the same for all but the
//! last segment, then writes a value to the named leaf field on the final
//! section.
//!
//! Resolution is idempotent: a second walk of the same path over an
//! unmodified tree descends through the sections the first walk created
//! and creates nothing new. It is also strict: a repeated slot holding
//! more than one child fails with [`ResolveError::AmbiguousPath`] rather
//! than guessing which sibling the caller means, and a segment the schema
//! does not declare fails with [`ResolveError::UnknownSlot`].

use super::schema::{Schema, ValueKind};
use super::section::{Section, Value};

/// Errors raised during path resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// A path segment is not declared on the section type it was applied to
    #[error("path '{path}': '{segment}' is not declared on section type '{section_type}'")]
    UnknownSlot {
        /// Full path being resolved.
        path: String,
        /// Offending segment.
        segment: String,
        /// Section type the segment was looked up on.
        section_type: String,
    },

    /// A repeated slot along the path holds several children
    #[error("path '{path}': slot '{segment}' holds {count} children; refusing to choose")]
    AmbiguousPath {
        /// Full path being resolved.
        path: String,
        /// Slot with several children.
        segment: String,
        /// Number of children present.
        count: usize,
    },

    /// The assigned value does not match the field's declared kind
    #[error(
        "path '{path}': field '{field}' on '{section_type}' expects {expected:?}, got {actual:?}"
    )]
    ValueKind {
        /// Full path being resolved.
        path: String,
        /// Field being assigned.
        field: String,
        /// Section type carrying the field.
        section_type: String,
        /// Declared kind.
        expected: ValueKind,
        /// Kind of the supplied value.
        actual: ValueKind,
    },

    /// The path string is empty or contains an empty segment
    #[error("'{path}' is not a valid dotted path")]
    InvalidPath {
        /// Offending path string.
        path: String,
    },
}

/// Return the section at the end of `path`, creating any missing sections
/// along the way (get-or-create mode).
pub fn resolve<'a>(
    schema: &Schema,
    root: &'a mut Section,
    path: &str,
) -> Result<&'a mut Section, ResolveError> {
    let segments = split_path(path)?;
    descend(schema, root, path, &segments)
}

/// Resolve all but the last segment of `path`, then assign `value` to the
/// leaf field the last segment names (get-or-create-and-set mode).
///
/// The terminal step is a plain field write: no section is created for
/// it, and the field must be declared with a matching value kind.
pub fn resolve_assign(
    schema: &Schema,
    root: &mut Section,
    path: &str,
    value: Value,
) -> Result<(), ResolveError> {
    let segments = split_path(path)?;
    let (field, parents) = match segments.split_last() {
        Some(split) => split,
        None => return Err(ResolveError::InvalidPath { path: path.into() }),
    };

    let node = descend(schema, root, path, parents)?;

    let decl = schema
        .field(node.section_type(), field)
        .ok_or_else(|| ResolveError::UnknownSlot {
            path: path.into(),
            segment: (*field).to_string(),
            section_type: node.section_type().to_string(),
        })?;
    if decl.kind != value.kind() {
        return Err(ResolveError::ValueKind {
            path: path.into(),
            field: (*field).to_string(),
            section_type: node.section_type().to_string(),
            expected: decl.kind,
            actual: value.kind(),
        });
    }

    node.set_field(*field, value);
    Ok(())
}

fn split_path<'p>(path: &'p str) -> Result<Vec<&'p str>, ResolveError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ResolveError::InvalidPath { path: path.into() });
    }
    Ok(segments)
}

fn descend<'a>(
    schema: &Schema,
    root: &'a mut Section,
    path: &str,
    segments: &[&str],
) -> Result<&'a mut Section, ResolveError> {
    let mut node = root;
    for segment in segments {
        let decl = schema
            .child_slot(node.section_type(), segment)
            .ok_or_else(|| ResolveError::UnknownSlot {
                path: path.into(),
                segment: (*segment).to_string(),
                section_type: node.section_type().to_string(),
            })?;

        node = node
            .get_or_create_child(segment, decl)
            .map_err(|ambiguous| ResolveError::AmbiguousPath {
                path: path.into(),
                segment: ambiguous.slot,
                count: ambiguous.count,
            })?;
    }
    Ok(node)
}

//! # Typed Archive Tree
//!
//! The archive is the statically-typed, hierarchical result record derived
//! properties are written into. Three layers:
//!
//! - [`schema`]: declarations: which child slots and leaf fields each
//!   section type carries, with slot cardinality (singleton or repeated)
//!   and declared child/value types. A pure lookup table; nothing here
//!   inspects values at runtime.
//! - [`section`]: the tree itself: every [`Section`] owns its children
//!   and its leaf values.
//! - [`resolver`]: dotted-path navigation that materializes missing
//!   sections along the way and refuses to guess when a repeated slot
//!   already holds more than one child.
//!
//! ## Example
//!
//! ```rust
//! use labnorm::archive::{resolve_assign, standard_schema, paths, Section, Value};
//! use labnorm::quantity::Quantity;
//!
//! let schema = standard_schema();
//! let mut root = Section::new("Sample");
//! resolve_assign(
//!     &schema,
//!     &mut root,
//!     paths::BAND_GAP_VALUE,
//!     Value::Energy(Quantity::electronvolts(2.48)),
//! )?;
//! # Ok::<(), labnorm::archive::ResolveError>(())
//! ```

pub mod resolver;
pub mod schema;
pub mod section;

pub use resolver::{resolve, resolve_assign, ResolveError};
pub use schema::{
    paths, section_types, standard_schema, Cardinality, FieldDecl, Schema, SchemaError,
    SectionDef, SlotDecl, ValueKind,
};
pub use section::{AmbiguousSlot, OccupiedSingleton, Section, Value};

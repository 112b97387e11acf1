//! The archive tree itself: sections, slots, and leaf values.
//!
//! A [`Section`] owns its children outright; there are no shared or weak
//! edges. Slot contents mirror the declared cardinality: a singleton slot
//! stores its child directly, a repeated slot stores an ordered `Vec`. A
//! slot is absent from the map until first populated, which is what lets
//! the resolver's create-iff-absent step be a single atomic operation.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::quantity::Quantity;

use super::schema::{Cardinality, SlotDecl, ValueKind};

/// A leaf value stored on a section field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A unit-carrying energy.
    Energy(Quantity),
    /// A bare float.
    Float(f64),
    /// A string.
    Str(String),
    /// An ordered list of strings.
    StrList(Vec<String>),
}

impl Value {
    /// The kind this value belongs to, for checks against a [`ValueKind`]
    /// declaration.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Energy(_) => ValueKind::Energy,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::StrList(_) => ValueKind::StrList,
        }
    }
}

/// A repeated or singleton slot already populated with children.
#[derive(Debug, Clone)]
enum SlotChildren {
    Singleton(Box<Section>),
    Repeated(Vec<Section>),
}

impl SlotChildren {
    fn as_slice(&self) -> &[Section] {
        match self {
            SlotChildren::Singleton(child) => std::slice::from_ref(child),
            SlotChildren::Repeated(children) => children,
        }
    }

    /// The sole child, or the number of children when there is not
    /// exactly one.
    fn sole_mut(&mut self) -> Result<&mut Section, usize> {
        match self {
            SlotChildren::Singleton(child) => Ok(child),
            SlotChildren::Repeated(children) => {
                let count = children.len();
                if count == 1 {
                    Ok(&mut children[0])
                } else {
                    Err(count)
                }
            }
        }
    }
}

/// A repeated slot held several children where navigation needs exactly one.
#[derive(Debug, thiserror::Error)]
#[error("slot '{slot}' holds {count} children; navigation needs exactly one")]
pub struct AmbiguousSlot {
    /// Slot name.
    pub slot: String,
    /// Number of children present.
    pub count: usize,
}

/// An attach was attempted on a singleton slot that already has its child.
#[derive(Debug, thiserror::Error)]
#[error("singleton slot '{slot}' already holds a child")]
pub struct OccupiedSingleton {
    /// Slot name.
    pub slot: String,
}

/// One node of the archive tree.
#[derive(Debug, Clone)]
pub struct Section {
    section_type: String,
    slots: BTreeMap<String, SlotChildren>,
    fields: BTreeMap<String, Value>,
}

impl Section {
    /// A new, empty section of the given type.
    pub fn new(section_type: impl Into<String>) -> Self {
        Self {
            section_type: section_type.into(),
            slots: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    /// Schema type name of this section.
    pub fn section_type(&self) -> &str {
        &self.section_type
    }

    /// Children currently stored under `slot`, empty when unpopulated.
    pub fn children(&self, slot: &str) -> &[Section] {
        self.slots.get(slot).map_or(&[], SlotChildren::as_slice)
    }

    /// Value of the named leaf field, if set.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Write a leaf field. A plain overwrite; schema conformance is the
    /// resolver's job.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Navigate into `slot`, materializing a default child of the declared
    /// type iff the slot is empty.
    ///
    /// This is the atomic step path resolution is built from: an empty slot
    /// gains exactly one child (set directly for a singleton, appended as
    /// the sole element for a repeated slot); a slot with exactly one child
    /// descends into it; a repeated slot with several children is refused.
    pub fn get_or_create_child(
        &mut self,
        slot: &str,
        decl: &SlotDecl,
    ) -> Result<&mut Section, AmbiguousSlot> {
        let children = match self.slots.entry(slot.to_string()) {
            Entry::Vacant(vacant) => {
                let child = Section::new(decl.child_type.clone());
                vacant.insert(match decl.cardinality {
                    Cardinality::Singleton => SlotChildren::Singleton(Box::new(child)),
                    Cardinality::Repeated => SlotChildren::Repeated(vec![child]),
                })
            }
            Entry::Occupied(occupied) => occupied.into_mut(),
        };

        children.sole_mut().map_err(|count| AmbiguousSlot {
            slot: slot.to_string(),
            count,
        })
    }

    /// Attach `child` under `slot`.
    ///
    /// Repeated slots append; a singleton slot accepts a child only while
    /// empty; a second attach is refused, never overwrites.
    pub fn attach_child(
        &mut self,
        slot: &str,
        decl: &SlotDecl,
        child: Section,
    ) -> Result<(), OccupiedSingleton> {
        match self.slots.entry(slot.to_string()) {
            Entry::Vacant(vacant) => {
                vacant.insert(match decl.cardinality {
                    Cardinality::Singleton => SlotChildren::Singleton(Box::new(child)),
                    Cardinality::Repeated => SlotChildren::Repeated(vec![child]),
                });
                Ok(())
            }
            Entry::Occupied(mut occupied) => match occupied.get_mut() {
                SlotChildren::Singleton(_) => Err(OccupiedSingleton {
                    slot: slot.to_string(),
                }),
                SlotChildren::Repeated(children) => {
                    children.push(child);
                    Ok(())
                }
            },
        }
    }

    /// Follow `path` without creating anything. Returns `None` when a
    /// segment is missing or a repeated slot does not hold exactly one
    /// child.
    pub fn find(&self, path: &str) -> Option<&Section> {
        let mut node = self;
        for segment in path.split('.') {
            let children = node.children(segment);
            match children {
                [sole] => node = sole,
                _ => return None,
            }
        }
        Some(node)
    }

    /// Total number of sections in this subtree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self
            .slots
            .values()
            .flat_map(|children| children.as_slice())
            .map(Section::node_count)
            .sum::<usize>()
    }
}

impl Serialize for Section {
    /// Serializes as a plain JSON object: leaf fields inline, singleton
    /// children as nested objects, repeated children as arrays. The section
    /// type is not written; readers recover it from the schema, the same
    /// way the resolver does.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + self.slots.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        for (name, children) in &self.slots {
            match children {
                SlotChildren::Singleton(child) => map.serialize_entry(name, child)?,
                SlotChildren::Repeated(list) => map.serialize_entry(name, list)?,
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::schema::{section_types, standard_schema};

    fn results_decl() -> SlotDecl {
        SlotDecl {
            cardinality: Cardinality::Singleton,
            child_type: section_types::RESULTS.to_string(),
        }
    }

    fn band_gap_decl() -> SlotDecl {
        SlotDecl {
            cardinality: Cardinality::Repeated,
            child_type: section_types::BAND_GAP.to_string(),
        }
    }

    #[test]
    fn test_get_or_create_materializes_once() {
        let mut root = Section::new(section_types::SAMPLE);
        assert_eq!(root.node_count(), 1);

        root.get_or_create_child("results", &results_decl()).unwrap();
        assert_eq!(root.node_count(), 2);

        // Second access descends instead of recreating.
        root.get_or_create_child("results", &results_decl()).unwrap();
        assert_eq!(root.node_count(), 2);
    }

    #[test]
    fn test_repeated_slot_ambiguity() {
        let mut parent = Section::new(section_types::BAND_STRUCTURE_ELECTRONIC);
        let decl = band_gap_decl();
        parent
            .attach_child("band_gap", &decl, Section::new(section_types::BAND_GAP))
            .unwrap();
        parent
            .attach_child("band_gap", &decl, Section::new(section_types::BAND_GAP))
            .unwrap();

        let err = parent.get_or_create_child("band_gap", &decl).unwrap_err();
        assert_eq!(err.count, 2);
        assert_eq!(err.slot, "band_gap");
    }

    #[test]
    fn test_singleton_attach_refused_when_occupied() {
        let mut root = Section::new(section_types::SAMPLE);
        let decl = results_decl();
        root.attach_child("results", &decl, Section::new(section_types::RESULTS))
            .unwrap();
        let err = root
            .attach_child("results", &decl, Section::new(section_types::RESULTS))
            .unwrap_err();
        assert_eq!(err.slot, "results");
        // The original child is untouched.
        assert_eq!(root.children("results").len(), 1);
    }

    #[test]
    fn test_fields() {
        let mut section = Section::new(section_types::MATERIAL);
        assert!(section.field("elements").is_none());
        section.set_field(
            "elements",
            Value::StrList(vec!["Si".to_string(), "O".to_string()]),
        );
        let value = section.field("elements").unwrap();
        assert_eq!(value.kind(), ValueKind::StrList);
    }

    #[test]
    fn test_json_shape() {
        let schema = standard_schema();
        let mut root = Section::new(section_types::SAMPLE);
        crate::archive::resolve_assign(
            &schema,
            &mut root,
            crate::archive::paths::MATERIAL_ELEMENTS,
            Value::StrList(vec!["Si".to_string()]),
        )
        .unwrap();
        crate::archive::resolve_assign(
            &schema,
            &mut root,
            crate::archive::paths::BAND_GAP_VALUE,
            Value::Energy(Quantity::electronvolts(2.48)),
        )
        .unwrap();

        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json["results"]["material"]["elements"][0], "Si");
        // Repeated slots serialize as arrays.
        let gap = &json["results"]["properties"]["electronic"]["band_structure_electronic"][0]
            ["band_gap"][0]["value"];
        assert_eq!(gap["magnitude"], 2.48);
        assert_eq!(gap["unit"], "electronvolt");
    }

    #[test]
    fn test_find_does_not_create() {
        let mut root = Section::new(section_types::SAMPLE);
        assert!(root.find("results.material").is_none());
        root.get_or_create_child("results", &results_decl()).unwrap();
        assert!(root.find("results").is_some());
        assert!(root.find("results.material").is_none());
        assert_eq!(root.node_count(), 2);
    }
}

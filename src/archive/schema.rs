//! Schema declarations for the archive tree.
//!
//! A [`Schema`] maps section type names to their [`SectionDef`]: the named
//! child slots (with cardinality and child type) and the named leaf fields
//! (with a value kind). The resolver is purely mechanical over this
//! metadata: it consults the schema, never defines it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How many children a slot may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// At most one child, stored directly.
    Singleton,
    /// An ordered collection of children.
    Repeated,
}

/// Kind of value a leaf field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// A unit-carrying energy.
    Energy,
    /// A bare float.
    Float,
    /// A string.
    Str,
    /// An ordered list of strings.
    StrList,
}

/// Declaration of one child slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDecl {
    /// Whether the slot holds one child or a collection.
    pub cardinality: Cardinality,
    /// Section type instantiated when the slot is materialized.
    pub child_type: String,
}

/// Declaration of one leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDecl {
    /// Value kind the field accepts.
    pub kind: ValueKind,
}

/// Declared slots and fields of one section type.
#[derive(Debug, Clone)]
pub struct SectionDef {
    name: String,
    slots: BTreeMap<String, SlotDecl>,
    fields: BTreeMap<String, FieldDecl>,
}

impl SectionDef {
    /// Start an empty definition for the named section type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    /// Declare a singleton child slot.
    pub fn singleton(mut self, slot: impl Into<String>, child_type: impl Into<String>) -> Self {
        self.slots.insert(
            slot.into(),
            SlotDecl {
                cardinality: Cardinality::Singleton,
                child_type: child_type.into(),
            },
        );
        self
    }

    /// Declare a repeated child slot.
    pub fn repeated(mut self, slot: impl Into<String>, child_type: impl Into<String>) -> Self {
        self.slots.insert(
            slot.into(),
            SlotDecl {
                cardinality: Cardinality::Repeated,
                child_type: child_type.into(),
            },
        );
        self
    }

    /// Declare a leaf field.
    pub fn field(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.fields.insert(name.into(), FieldDecl { kind });
        self
    }

    /// Section type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declaration of the named slot, if declared.
    pub fn slot(&self, name: &str) -> Option<&SlotDecl> {
        self.slots.get(name)
    }

    /// Declaration of the named field, if declared.
    pub fn field_decl(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.get(name)
    }

    /// Iterate declared slots in name order.
    pub fn slots(&self) -> impl Iterator<Item = (&str, &SlotDecl)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate declared fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDecl)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Inconsistencies in a schema definition.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A slot points at a section type the schema never defines
    #[error("section '{section}' slot '{slot}' references undefined type '{child_type}'")]
    UndefinedChildType {
        /// Section type carrying the slot.
        section: String,
        /// Slot name.
        slot: String,
        /// Missing child type.
        child_type: String,
    },

    /// The same name is declared both as a slot and as a field
    #[error("section '{section}' declares '{name}' as both a slot and a field")]
    SlotFieldClash {
        /// Section type with the clash.
        section: String,
        /// Clashing name.
        name: String,
    },
}

/// A registry of section type definitions.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    sections: BTreeMap<String, SectionDef>,
}

impl Schema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section definition, replacing any previous one of the same name.
    pub fn with_section(mut self, def: SectionDef) -> Self {
        self.sections.insert(def.name.clone(), def);
        self
    }

    /// Definition of the named section type.
    pub fn section(&self, type_name: &str) -> Option<&SectionDef> {
        self.sections.get(type_name)
    }

    /// Declared child slot `slot` of section type `type_name`.
    pub fn child_slot(&self, type_name: &str, slot: &str) -> Option<&SlotDecl> {
        self.sections.get(type_name)?.slot(slot)
    }

    /// Declared leaf field `field` of section type `type_name`.
    pub fn field(&self, type_name: &str, field: &str) -> Option<&FieldDecl> {
        self.sections.get(type_name)?.field_decl(field)
    }

    /// Check internal consistency: every slot's child type is defined and
    /// no name doubles as both slot and field.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for def in self.sections.values() {
            for (slot, decl) in def.slots() {
                if !self.sections.contains_key(&decl.child_type) {
                    return Err(SchemaError::UndefinedChildType {
                        section: def.name.clone(),
                        slot: slot.to_string(),
                        child_type: decl.child_type.clone(),
                    });
                }
                if def.field_decl(slot).is_some() {
                    return Err(SchemaError::SlotFieldClash {
                        section: def.name.clone(),
                        name: slot.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Section type names of the standard results schema.
pub mod section_types {
    /// Root sample record.
    pub const SAMPLE: &str = "Sample";
    /// Derived-results container.
    pub const RESULTS: &str = "Results";
    /// Material description.
    pub const MATERIAL: &str = "Material";
    /// Physical-property container.
    pub const PROPERTIES: &str = "Properties";
    /// Electronic-property container.
    pub const ELECTRONIC: &str = "ElectronicProperties";
    /// One electronic band structure measurement or calculation.
    pub const BAND_STRUCTURE_ELECTRONIC: &str = "BandStructureElectronic";
    /// One band-gap entry.
    pub const BAND_GAP: &str = "BandGap";
}

/// Well-known dotted paths into the standard results schema.
pub mod paths {
    /// Element list on the material section.
    pub const MATERIAL_ELEMENTS: &str = "results.material.elements";
    /// Band-gap energy value.
    pub const BAND_GAP_VALUE: &str =
        "results.properties.electronic.band_structure_electronic.band_gap.value";
}

/// The standard results schema shared by all samples.
///
/// Mirrors the hierarchy downstream consumers query:
/// `results.material` for composition and
/// `results.properties.electronic.band_structure_electronic.band_gap` for
/// the gap energy. Band-structure entries and their gaps are repeated
/// slots; a sample may legitimately accumulate several measurements, at
/// which point path resolution into them becomes ambiguous by design.
pub fn standard_schema() -> Schema {
    use section_types::*;

    Schema::new()
        .with_section(SectionDef::new(SAMPLE).singleton("results", RESULTS))
        .with_section(
            SectionDef::new(RESULTS)
                .singleton("material", MATERIAL)
                .singleton("properties", PROPERTIES),
        )
        .with_section(SectionDef::new(MATERIAL).field("elements", ValueKind::StrList))
        .with_section(SectionDef::new(PROPERTIES).singleton("electronic", ELECTRONIC))
        .with_section(
            SectionDef::new(ELECTRONIC)
                .repeated("band_structure_electronic", BAND_STRUCTURE_ELECTRONIC),
        )
        .with_section(
            SectionDef::new(BAND_STRUCTURE_ELECTRONIC).repeated("band_gap", BAND_GAP),
        )
        .with_section(SectionDef::new(BAND_GAP).field("value", ValueKind::Energy))
}

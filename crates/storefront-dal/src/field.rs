// File: storefront-dal/src/field.rs
// Purpose: Field descriptors and their capability flags

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Capability tag carried by a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFlag {
    /// Part of the entity's primary key
    PrimaryKey,
    /// Must be present when the record is written
    Required,
    /// A child record may omit it and resolve it from its parent
    Inherited,
    /// Only writable in system scope
    WriteProtected,
}

/// Ordered set of flags on a field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFlags(BTreeSet<FieldFlag>);

impl FieldFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, flag: FieldFlag) -> Self {
        self.0.insert(flag);
        self
    }

    pub fn contains(&self, flag: FieldFlag) -> bool {
        self.0.contains(&flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = FieldFlag> + '_ {
        self.0.iter().copied()
    }
}

impl<const N: usize> From<[FieldFlag; N]> for FieldFlags {
    fn from(flags: [FieldFlag; N]) -> Self {
        Self(flags.into_iter().collect())
    }
}

/// Storage and association shape of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Primary key id (32 hex chars)
    Id,
    /// Foreign key id referencing another entity
    FkId { reference: String },
    String {
        max_length: Option<usize>,
        allow_empty: bool,
    },
    Int {
        min: Option<i64>,
        max: Option<i64>,
    },
    Bool,
    /// RFC 3339 timestamp
    DateTime,
    /// Association resolved through `storage_field`; never written directly
    ManyToOne {
        storage_field: String,
        reference: String,
    },
}

/// Metadata descriptor for one entity attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub property_name: String,
    pub kind: FieldKind,
    pub flags: FieldFlags,
}

impl Field {
    pub fn new(property_name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            property_name: property_name.into(),
            kind,
            flags: FieldFlags::new(),
        }
    }

    pub fn id(property_name: impl Into<String>) -> Self {
        Self::new(property_name, FieldKind::Id)
            .flag(FieldFlag::PrimaryKey)
            .flag(FieldFlag::Required)
    }

    pub fn fk(property_name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::new(
            property_name,
            FieldKind::FkId {
                reference: reference.into(),
            },
        )
    }

    pub fn string(property_name: impl Into<String>, max_length: Option<usize>) -> Self {
        Self::new(
            property_name,
            FieldKind::String {
                max_length,
                allow_empty: false,
            },
        )
    }

    pub fn int(property_name: impl Into<String>, min: Option<i64>, max: Option<i64>) -> Self {
        Self::new(property_name, FieldKind::Int { min, max })
    }

    pub fn bool(property_name: impl Into<String>) -> Self {
        Self::new(property_name, FieldKind::Bool)
    }

    pub fn date_time(property_name: impl Into<String>) -> Self {
        Self::new(property_name, FieldKind::DateTime)
    }

    pub fn many_to_one(
        property_name: impl Into<String>,
        storage_field: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self::new(
            property_name,
            FieldKind::ManyToOne {
                storage_field: storage_field.into(),
                reference: reference.into(),
            },
        )
    }

    /// Add a flag (builder style)
    pub fn flag(mut self, flag: FieldFlag) -> Self {
        self.flags = self.flags.with(flag);
        self
    }

    pub fn is(&self, flag: FieldFlag) -> bool {
        self.flags.contains(flag)
    }

    /// True for fields that hold a stored value (everything but associations)
    pub fn is_storage(&self) -> bool {
        !self.is_association()
    }

    pub fn is_association(&self) -> bool {
        matches!(self.kind, FieldKind::ManyToOne { .. })
    }

    /// Entity referenced by a foreign key or association field
    pub fn reference(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::FkId { reference } | FieldKind::ManyToOne { reference, .. } => {
                Some(reference)
            }
            _ => None,
        }
    }
}

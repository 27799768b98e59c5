//! Typed field schema for the serialization layer
//!
//! The wire encoding belongs to the serializer. This module only declares
//! which fields a physical object exposes and what shape each one has.

use serde::{Deserialize, Serialize};

/// Shape of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// 16-bit signed integer
    Int16,
    /// Composite of three floats
    Vec3,
    /// Composite of four floats (w, x, y, z)
    Quat,
}

impl FieldKind {
    /// Number of scalar components in the field
    pub fn components(&self) -> usize {
        match self {
            FieldKind::Int16 => 1,
            FieldKind::Vec3 => 3,
            FieldKind::Quat => 4,
        }
    }
}

/// A named field in the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetField {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Field schema of a networked physical object
#[derive(Debug, Clone, Copy)]
pub struct NetScheme;

impl NetScheme {
    /// Fields in declaration order
    pub const FIELDS: &'static [NetField] = &[
        NetField {
            name: "playerId",
            kind: FieldKind::Int16,
        },
        NetField {
            name: "position",
            kind: FieldKind::Vec3,
        },
        NetField {
            name: "orientation",
            kind: FieldKind::Quat,
        },
        NetField {
            name: "velocity",
            kind: FieldKind::Vec3,
        },
        NetField {
            name: "angularVelocity",
            kind: FieldKind::Vec3,
        },
    ];

    /// Look up a field by wire name
    pub fn field(name: &str) -> Option<&'static NetField> {
        Self::FIELDS.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_fields() {
        assert_eq!(NetScheme::FIELDS.len(), 5);
        assert_eq!(NetScheme::field("playerId").map(|f| f.kind), Some(FieldKind::Int16));
        assert_eq!(NetScheme::field("orientation").map(|f| f.kind), Some(FieldKind::Quat));
        assert!(NetScheme::field("mass").is_none());
    }

    #[test]
    fn test_component_counts() {
        let total: usize = NetScheme::FIELDS.iter().map(|f| f.kind.components()).sum();
        assert_eq!(total, 1 + 3 + 4 + 3 + 3);
    }
}

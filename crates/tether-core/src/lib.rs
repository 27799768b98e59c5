//! Tether Core - State types and numeric conventions for networked physical objects
//!
//! This crate provides the shared foundation used by the history and netcode crates:
//! - Kinematic state (`StateVector`) and immutable captures (`Snapshot`)
//! - Pinned vector/quaternion conventions (`math`)
//! - Object identity (`ObjectId`, `PlayerId`, `Identity`)
//! - The typed field schema exposed to serializers (`NetScheme`)
//! - Injected diagnostics (`DiagnosticSink`)
//! - Object configuration (`ObjectConfig`, `BendingConfig`)
//!
//! Vector and quaternion arithmetic comes from `glam`; this crate only fixes
//! the conventions built on top of it.

mod config;
mod diagnostics;
mod error;
mod identity;
pub mod math;
mod schema;
mod state;

pub use config::{BendingConfig, ObjectConfig, DEFAULT_HISTORY_CAPACITY};
pub use diagnostics::{Diagnostic, DiagnosticSink, NullSink, RecordingSink, TracingSink};
pub use error::{Error, Result};
pub use identity::{Identity, ObjectId, PlayerId};
pub use schema::{FieldKind, NetField, NetScheme};
pub use state::{Snapshot, StateVector};

// Re-export the numeric types so downstream crates agree on one version
pub use glam::{Quat, Vec3};

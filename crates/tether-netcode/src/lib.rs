//! Tether Netcode - Reconciliation and sync for networked physical objects
//!
//! This crate keeps a locally simulated body in step with an authoritative
//! peer:
//!
//! - **Bending**: snap to an authoritative state, then correct back toward
//!   the prediction over several ticks so the jump is not visible
//! - **Snapshot history**: record the pose every tick and answer
//!   interpolated queries for rendering
//! - **Physics bridge**: keep the physics engine's body and the object's
//!   state vector from diverging
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       PhysicalObject                         │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐  │
//! │  │ Authoritative│──▶│   Bending    │──▶│   StateVector    │  │
//! │  │    queue     │   │    Engine    │   │                  │  │
//! │  └──────────────┘   └──────────────┘   └──────────────────┘  │
//! │                                          │            │      │
//! │                                          ▼            ▼      │
//! │                              ┌──────────────┐ ┌────────────┐ │
//! │                              │PhysicsBridge │ │  Snapshot  │ │
//! │                              │  push/pull   │ │  History   │ │
//! │                              └──────────────┘ └────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use tether_core::{Identity, ObjectId, PlayerId, Quat, StateVector, Vec3};
//! use tether_netcode::PhysicalObject;
//!
//! let mut object = PhysicalObject::with_defaults(Identity::new(ObjectId::new(1), PlayerId(3)));
//!
//! // Server update arrives between ticks
//! let server = StateVector::at_rest(Vec3::new(0.0, 0.0, 2.0), Quat::IDENTITY);
//! object.queue_authoritative(server);
//!
//! // Simulation loop
//! for tick in 0..10 {
//!     object.tick(tick as f64).unwrap();
//! }
//!
//! // Render between recorded ticks
//! let pose = object.query(4.5);
//! assert!(pose.position().z < 2.0);
//! ```

mod bending;
mod bridge;
mod error;
mod object;

pub use bending::{BendingEngine, BendingPlan};
pub use bridge::PhysicsBridge;
pub use error::{Error, Result};
pub use object::PhysicalObject;

// Re-export history types for convenience
pub use tether_history::{QueryResult, SnapshotHistory};

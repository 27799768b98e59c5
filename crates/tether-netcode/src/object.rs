//! Networked physical object
//!
//! Ties the pieces together for one simulated body: identity, the live
//! [`StateVector`], a [`BendingEngine`], a [`SnapshotHistory`], and an
//! optional [`PhysicsBridge`] to the physics engine.
//!
//! Per-tick order is fixed by [`PhysicalObject::tick`]:
//!
//! ```text
//! buffered reconciliation → bending increment → push to physics → record snapshot
//! ```

use crate::{BendingEngine, BendingPlan, Error, PhysicsBridge, Result};
use std::fmt;
use tether_core::{
    BendingConfig, Diagnostic, DiagnosticSink, Identity, ObjectConfig, Snapshot, StateVector,
    TracingSink,
};
use tether_history::{QueryResult, SnapshotHistory};

/// Authoritative state waiting for the next tick boundary
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingCorrection {
    authoritative: StateVector,
    bending: BendingConfig,
}

/// A physical object kept in sync with an authoritative peer
pub struct PhysicalObject {
    identity: Identity,
    state: StateVector,
    bending: BendingEngine,
    history: SnapshotHistory,
    pending: Option<PendingCorrection>,
    bridge: Option<Box<dyn PhysicsBridge>>,
    sink: Box<dyn DiagnosticSink>,
    config: ObjectConfig,
}

impl PhysicalObject {
    /// Create an object at rest at the origin
    pub fn new(identity: Identity, config: ObjectConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(identity, config))
    }

    /// Create an object with the default configuration
    pub fn with_defaults(identity: Identity) -> Self {
        Self::from_valid_config(identity, ObjectConfig::default())
    }

    fn from_valid_config(identity: Identity, config: ObjectConfig) -> Self {
        Self {
            identity,
            state: StateVector::IDENTITY,
            bending: BendingEngine::new(),
            history: SnapshotHistory::with_capacity(config.history_capacity),
            pending: None,
            bridge: None,
            sink: Box::new(TracingSink),
            config,
        }
    }

    /// Replace the diagnostic sink (defaults to [`TracingSink`])
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Builder-style initial state
    pub fn with_state(mut self, state: StateVector) -> Self {
        self.state = state.normalized();
        self
    }

    /// Attach a physics body and push the current state into it
    pub fn attach_bridge(&mut self, bridge: impl PhysicsBridge + 'static) {
        let mut bridge: Box<dyn PhysicsBridge> = Box::new(bridge);
        bridge.push(&self.state);
        self.bridge = Some(bridge);
    }

    /// Detach the physics body, returning it
    pub fn detach_bridge(&mut self) -> Option<Box<dyn PhysicsBridge>> {
        self.bridge.take()
    }

    pub fn has_bridge(&self) -> bool {
        self.bridge.is_some()
    }

    fn push_to_physics(&mut self) {
        if let Some(bridge) = self.bridge.as_mut() {
            bridge.push(&self.state);
        }
    }

    /// Copy the physics body's state into the live state
    ///
    /// Called by the simulation loop after the physics step.
    pub fn refresh_from_physics(&mut self) {
        if let Some(bridge) = self.bridge.as_mut() {
            bridge.pull(&mut self.state);
            self.state.normalize();
        }
    }

    /// Reconcile now with the configured bending defaults
    pub fn bend_to(&mut self, authoritative: &StateVector) -> Result<BendingPlan> {
        let bending = self.config.bending;
        self.bend_to_with(authoritative, bending)
    }

    /// Reconcile now with explicit bending parameters
    ///
    /// The current live state is taken as the prediction. On success the
    /// live state is the authoritative one and has been pushed to physics.
    pub fn bend_to_with(
        &mut self,
        authoritative: &StateVector,
        bending: BendingConfig,
    ) -> Result<BendingPlan> {
        let remaining = self.bending.remaining_increments();
        let predicted = self.state;

        let plan = *self.bending.begin(
            &mut self.state,
            &predicted,
            authoritative,
            bending.amount,
            bending.increments,
            bending.keep_velocities,
        )?;

        if remaining > 0 {
            self.sink.report(&Diagnostic::BendingSuperseded {
                remaining_increments: remaining,
            });
        }
        self.push_to_physics();
        Ok(plan)
    }

    /// Buffer an authoritative state until the next tick boundary
    ///
    /// A later call before the tick replaces the buffered state.
    pub fn queue_authoritative(&mut self, authoritative: StateVector) {
        self.pending = Some(PendingCorrection {
            authoritative,
            bending: self.config.bending,
        });
    }

    /// Buffer an authoritative state with explicit bending parameters
    pub fn queue_authoritative_with(
        &mut self,
        authoritative: StateVector,
        bending: BendingConfig,
    ) -> Result<()> {
        if bending.increments == 0 {
            return Err(Error::InvalidArgument {
                name: "bending.increments",
                reason: "must be greater than 0".to_string(),
            });
        }
        self.pending = Some(PendingCorrection {
            authoritative,
            bending,
        });
        Ok(())
    }

    /// Whether an authoritative state is waiting for the next tick
    pub fn has_pending_correction(&self) -> bool {
        self.pending.is_some()
    }

    /// Per-tick hook
    ///
    /// Applies any buffered reconciliation, then one bending increment,
    /// pushes the result to physics, and records a snapshot at `time`.
    pub fn tick(&mut self, time: f64) -> Result<()> {
        if let Some(pending) = self.pending.take() {
            self.bend_to_with(&pending.authoritative, pending.bending)?;
        }

        self.bending.apply_increment(&mut self.state);
        self.push_to_physics();
        self.history.record(time, self.state.position, self.state.orientation);
        Ok(())
    }

    /// Pose at `time` for rendering
    ///
    /// Falls back to the live pose when nothing has been recorded yet.
    pub fn query(&self, time: f64) -> Snapshot {
        self.query_result(time).unwrap_or(self.state.snapshot(time))
    }

    /// Pose at `time` along with how it was obtained
    pub fn query_result(&self, time: f64) -> QueryResult {
        self.history.query(time, &*self.sink)
    }

    /// Copy identity fields and kinematics from another object
    pub fn sync_to(&mut self, other: &PhysicalObject) {
        self.identity.sync_from(&other.identity);
        self.state.copy_from(&other.state);
        self.push_to_physics();
    }

    /// Overwrite the live state directly
    pub fn set_state(&mut self, state: StateVector) {
        self.state = state.normalized();
        self.push_to_physics();
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn state(&self) -> &StateVector {
        &self.state
    }

    pub fn bending(&self) -> &BendingEngine {
        &self.bending
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn config(&self) -> &ObjectConfig {
        &self.config
    }
}

impl fmt::Debug for PhysicalObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicalObject")
            .field("identity", &self.identity)
            .field("state", &self.state)
            .field("bending", &self.bending)
            .field("history_len", &self.history.len())
            .field("pending", &self.pending)
            .field("has_bridge", &self.bridge.is_some())
            .finish()
    }
}

impl fmt::Display for PhysicalObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhysicalObject[{}] {}", self.identity, self.state)?;
        if let Some(plan) = self.bending.plan() {
            write!(f, "\n  {plan}")?;
        }
        Ok(())
    }
}

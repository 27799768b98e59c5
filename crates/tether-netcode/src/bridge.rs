//! Physics engine adapter
//!
//! The physics engine owns the simulated body; the object owns a
//! [`StateVector`] mirror of it. Users implement [`PhysicsBridge`] for their
//! engine of choice so the two can be kept in step.

use tether_core::StateVector;

/// Pull/push adapter between a `StateVector` and a live physics body
pub trait PhysicsBridge {
    /// Copy the body's position, orientation, velocity, and angular
    /// velocity into `state`.
    fn pull(&mut self, state: &mut StateVector);

    /// Copy `state` into the body.
    ///
    /// Called after every externally visible write so the body never lags
    /// the state by more than one tick.
    fn push(&mut self, state: &StateVector);
}

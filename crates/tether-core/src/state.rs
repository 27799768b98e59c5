//! Kinematic state of a networked physical object
//!
//! `StateVector` is the mutable per-tick state; `Snapshot` is an immutable
//! timestamped capture of the part of it that rendering needs.

use crate::math;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position, orientation, and velocities of a physical object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    pub position: Vec3,
    /// Unit quaternion
    pub orientation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl StateVector {
    /// A state at rest at the origin
    pub const IDENTITY: StateVector = StateVector {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
        velocity: Vec3::ZERO,
        angular_velocity: Vec3::ZERO,
    };

    /// Create a state at rest with the given pose
    pub fn at_rest(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation: math::ensure_unit(orientation),
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }

    /// Builder-style velocity setter
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder-style angular velocity setter
    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Copy pose and velocities from another state
    ///
    /// The copied orientation is renormalized if it has drifted.
    pub fn copy_from(&mut self, other: &StateVector) {
        *self = *other;
        self.normalize();
    }

    /// Copy only position and orientation, leaving velocities alone
    pub fn copy_pose_from(&mut self, other: &StateVector) {
        self.position = other.position;
        self.orientation = math::ensure_unit(other.orientation);
    }

    /// Renormalize a drifted orientation in place
    pub fn normalize(&mut self) {
        self.orientation = math::ensure_unit(self.orientation);
    }

    /// This state with its orientation renormalized
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Capture the pose as a snapshot at the given time
    pub fn snapshot(&self, time: f64) -> Snapshot {
        Snapshot::new(time, self.position, self.orientation)
    }

    /// Check that the orientation has not drifted from unit length
    pub fn is_normalized(&self) -> bool {
        math::is_unit(self.orientation)
    }
}

impl Default for StateVector {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let q = self.orientation;
        write!(
            f,
            "pos[{:.3} {:.3} {:.3}] quat[{:.3} {:.3} {:.3} {:.3}] vel[{:.3} {:.3} {:.3}] angvel[{:.3} {:.3} {:.3}]",
            self.position.x,
            self.position.y,
            self.position.z,
            q.w,
            q.x,
            q.y,
            q.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
            self.angular_velocity.x,
            self.angular_velocity.y,
            self.angular_velocity.z,
        )
    }
}

/// Immutable timestamped capture of position and orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    time: f64,
    position: Vec3,
    orientation: Quat,
}

impl Snapshot {
    pub fn new(time: f64, position: Vec3, orientation: Quat) -> Self {
        Self {
            time,
            position,
            orientation,
        }
    }

    /// Time (or tick index) at which this snapshot was captured
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Interpolate toward a later snapshot.
    ///
    /// Position is blended linearly, orientation spherically. The result is
    /// stamped with `time`.
    pub fn interpolate(&self, later: &Snapshot, time: f64, percent: f32) -> Snapshot {
        Snapshot {
            time,
            position: math::lerp_vec3(self.position, later.position, percent),
            orientation: math::slerp(self.orientation, later.orientation, percent),
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let q = self.orientation;
        write!(
            f,
            "t={:.3} pos[{:.3} {:.3} {:.3}] quat[{:.3} {:.3} {:.3} {:.3}]",
            self.time, self.position.x, self.position.y, self.position.z, q.w, q.x, q.y, q.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_pose_keeps_velocities() {
        let mut state = StateVector::IDENTITY.with_velocity(Vec3::X);
        let other = StateVector::at_rest(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_y(0.5));

        state.copy_pose_from(&other);

        assert_eq!(state.position, other.position);
        assert_eq!(state.orientation, other.orientation);
        assert_eq!(state.velocity, Vec3::X);
    }

    #[test]
    fn test_copies_renormalize_orientation() {
        let drifted = StateVector {
            orientation: Quat::from_xyzw(0.0, 0.0, 0.0, 1.2),
            ..StateVector::IDENTITY
        };
        assert!(!drifted.is_normalized());

        let mut full = StateVector::IDENTITY;
        full.copy_from(&drifted);
        assert!(full.is_normalized());
        assert!(full.orientation.abs_diff_eq(Quat::IDENTITY, 1e-6));

        let mut pose = StateVector::IDENTITY;
        pose.copy_pose_from(&drifted);
        assert!(pose.is_normalized());

        assert!(drifted.normalized().is_normalized());
    }

    #[test]
    fn test_snapshot_from_state() {
        let state = StateVector::at_rest(Vec3::new(4.0, 0.0, 0.0), Quat::from_rotation_x(1.0));
        let snap = state.snapshot(2.5);

        assert_eq!(snap.time(), 2.5);
        assert_eq!(snap.position(), state.position);
        assert_eq!(snap.orientation(), state.orientation);
    }

    #[test]
    fn test_interpolate_midpoint() {
        let a = Snapshot::new(0.0, Vec3::ZERO, Quat::IDENTITY);
        let b = Snapshot::new(1.0, Vec3::new(2.0, 0.0, 0.0), Quat::from_rotation_z(1.0));

        let mid = a.interpolate(&b, 0.5, 0.5);

        assert_eq!(mid.time(), 0.5);
        assert!(mid.position().abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));
        assert!(mid.orientation().angle_between(Quat::from_rotation_z(0.5)) < 1e-3);
    }

    #[test]
    fn test_display_dump() {
        let text = StateVector::IDENTITY.to_string();
        assert!(text.starts_with("pos[0.000 0.000 0.000] quat[1.000 0.000 0.000 0.000]"));
        assert!(text.contains("angvel["));
    }
}

//! Bending: gradual correction toward an authoritative state
//!
//! When an authoritative state arrives for an object the client has been
//! predicting, the object snaps to it and then bends back over several ticks
//! toward where the prediction had it, by `total_bending_amount` of the gap.
//! The snap makes the simulation correct immediately; the bend hides the
//! visible jump.
//!
//! Position moves by a constant delta per tick. Orientation is spherically
//! interpolated toward the fixed pre-correction target by a constant
//! fraction per tick, so the angular gap shrinks geometrically.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tether_core::{math, Quat, StateVector, Vec3};

/// A multi-tick correction computed by [`BendingEngine::begin`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BendingPlan {
    /// `total_bending_amount / increment_count`
    pub increment_scale: f32,
    /// Added to the live position on each increment
    pub position_delta: Vec3,
    /// Per-increment rotation derived through axis-angle
    ///
    /// Kept for diagnostics and for [`BendingPlan::axis_angle_step`]; the
    /// default increment does not use it.
    pub quaternion_delta: Quat,
    /// Predicted state from before the correction
    pub target: StateVector,
    pub remaining_increments: u32,
    pub increment_count: u32,
    pub total_bending_amount: f32,
}

impl BendingPlan {
    /// Compute a plan bending from `authoritative` back toward `predicted`.
    ///
    /// Fails with `InvalidArgument` when `increment_count` is zero.
    pub fn compute(
        predicted: &StateVector,
        authoritative: &StateVector,
        total_bending_amount: f32,
        increment_count: u32,
    ) -> Result<Self> {
        if increment_count == 0 {
            return Err(Error::InvalidArgument {
                name: "increment_count",
                reason: "must be greater than 0".to_string(),
            });
        }

        let increment_scale = total_bending_amount / increment_count as f32;
        let position_delta = (predicted.position - authoritative.position) * increment_scale;
        let relative = math::rotation_delta(
            math::ensure_unit(predicted.orientation),
            math::ensure_unit(authoritative.orientation),
        );
        let quaternion_delta = math::scale_rotation(relative, increment_scale);

        Ok(Self {
            increment_scale,
            position_delta,
            quaternion_delta,
            target: predicted.normalized(),
            remaining_increments: increment_count,
            increment_count,
            total_bending_amount,
        })
    }

    /// Whether any increments are left to apply
    pub fn is_active(&self) -> bool {
        self.remaining_increments > 0
    }

    /// Rejected alternative orientation step: left-multiply by `quaternion_delta`.
    ///
    /// Reaches the target exactly after `increment_count` steps for modest
    /// corrections, but the axis-angle conversion behind `quaternion_delta`
    /// misbehaves near half-turn and larger corrections (the scaled angle can
    /// take the long way round). Never used by [`BendingEngine::apply_increment`];
    /// kept so the two approaches can be compared.
    pub fn axis_angle_step(&self, orientation: Quat) -> Quat {
        math::ensure_unit(self.quaternion_delta * orientation)
    }
}

impl fmt::Display for BendingPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.position_delta;
        let q = self.quaternion_delta;
        write!(
            f,
            "bending {}/{} increments left (amount {:.3}, scale {:.3}) dpos[{:.3} {:.3} {:.3}] dquat[{:.3} {:.3} {:.3} {:.3}]",
            self.remaining_increments,
            self.increment_count,
            self.total_bending_amount,
            self.increment_scale,
            d.x,
            d.y,
            d.z,
            q.w,
            q.x,
            q.y,
            q.z,
        )
    }
}

/// Holds at most one bending plan and applies it one increment at a time
#[derive(Debug, Clone, Default)]
pub struct BendingEngine {
    plan: Option<BendingPlan>,
}

impl BendingEngine {
    pub fn new() -> Self {
        Self { plan: None }
    }

    /// Start a correction and snap `live` to `authoritative`.
    ///
    /// Any plan in flight is discarded. Velocities are copied from
    /// `authoritative` unless `keep_velocities` is set. On error nothing is
    /// modified, including the current plan.
    pub fn begin(
        &mut self,
        live: &mut StateVector,
        predicted: &StateVector,
        authoritative: &StateVector,
        total_bending_amount: f32,
        increment_count: u32,
        keep_velocities: bool,
    ) -> Result<&BendingPlan> {
        let plan = BendingPlan::compute(
            predicted,
            authoritative,
            total_bending_amount,
            increment_count,
        )?;

        if let Some(old) = self.plan.as_ref().filter(|p| p.is_active()) {
            tracing::debug!(
                remaining = old.remaining_increments,
                "discarding unfinished bending plan"
            );
        }

        if keep_velocities {
            live.copy_pose_from(authoritative);
        } else {
            live.copy_from(authoritative);
        }

        tracing::debug!(
            increments = increment_count,
            scale = plan.increment_scale,
            "bending started"
        );
        Ok(self.plan.insert(plan))
    }

    /// Apply one increment of the active plan to `live`.
    ///
    /// Returns `false` without touching `live` when no increments remain.
    pub fn apply_increment(&mut self, live: &mut StateVector) -> bool {
        let Some(plan) = self.plan.as_mut().filter(|p| p.is_active()) else {
            return false;
        };

        live.position += plan.position_delta;
        live.orientation = math::slerp(
            live.orientation,
            plan.target.orientation,
            plan.increment_scale,
        );
        plan.remaining_increments -= 1;

        if !plan.is_active() {
            self.plan = None;
        }
        true
    }

    /// The plan in flight, if any
    pub fn plan(&self) -> Option<&BendingPlan> {
        self.plan.as_ref()
    }

    pub fn is_bending(&self) -> bool {
        self.plan.is_some()
    }

    pub fn remaining_increments(&self) -> u32 {
        self.plan.map_or(0, |p| p.remaining_increments)
    }

    /// Drop the plan in flight
    pub fn cancel(&mut self) {
        self.plan = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-4;

    fn predicted() -> StateVector {
        StateVector::at_rest(Vec3::new(10.0, 4.0, -2.0), Quat::from_rotation_y(0.8))
            .with_velocity(Vec3::new(1.0, 0.0, 0.0))
            .with_angular_velocity(Vec3::new(0.0, 0.5, 0.0))
    }

    fn authoritative() -> StateVector {
        StateVector::at_rest(Vec3::new(6.0, 4.0, 2.0), Quat::from_rotation_y(0.2))
            .with_velocity(Vec3::new(0.0, 0.0, 3.0))
            .with_angular_velocity(Vec3::new(0.0, -1.0, 0.0))
    }

    #[test]
    fn test_compute_plan() {
        let plan = BendingPlan::compute(&predicted(), &authoritative(), 0.5, 4).unwrap();

        assert_eq!(plan.increment_scale, 0.125);
        assert!(plan
            .position_delta
            .abs_diff_eq(Vec3::new(0.5, 0.0, -0.5), EPS));
        assert_eq!(plan.target, predicted());
        assert_eq!(plan.remaining_increments, 4);

        // 0.6 rad gap about y, scaled by 1/8
        assert!(plan
            .quaternion_delta
            .abs_diff_eq(Quat::from_rotation_y(0.6 * 0.125), EPS));
    }

    #[test]
    fn test_begin_snaps_to_authoritative() {
        let mut engine = BendingEngine::new();
        let mut live = predicted();

        engine
            .begin(&mut live, &predicted(), &authoritative(), 1.0, 5, false)
            .unwrap();

        assert_eq!(live, authoritative());
        assert_eq!(engine.remaining_increments(), 5);
    }

    #[test]
    fn test_snap_renormalizes_drifted_orientation() {
        let drifted = StateVector {
            orientation: Quat::from_xyzw(0.0, 0.0, 0.0, 1.2),
            ..authoritative()
        };

        for keep_velocities in [false, true] {
            let mut engine = BendingEngine::new();
            let mut live = predicted();
            engine
                .begin(&mut live, &predicted(), &drifted, 1.0, 4, keep_velocities)
                .unwrap();

            assert!(live.is_normalized());
            assert!(live.orientation.abs_diff_eq(Quat::IDENTITY, 1e-6));
            while engine.apply_increment(&mut live) {
                assert!(live.is_normalized());
            }
        }
    }

    #[test]
    fn test_keep_velocities() {
        let mut engine = BendingEngine::new();
        let mut live = predicted();

        engine
            .begin(&mut live, &predicted(), &authoritative(), 1.0, 5, true)
            .unwrap();

        assert_eq!(live.position, authoritative().position);
        assert_eq!(live.orientation, authoritative().orientation);
        assert_eq!(live.velocity, predicted().velocity);
        assert_eq!(live.angular_velocity, predicted().angular_velocity);
    }

    #[test]
    fn test_zero_increments_rejected() {
        let mut engine = BendingEngine::new();
        let mut live = predicted();
        engine
            .begin(&mut live, &predicted(), &authoritative(), 1.0, 3, false)
            .unwrap();
        engine.apply_increment(&mut live);

        let before = live;
        let plan_before = engine.plan().copied();

        let err = engine
            .begin(&mut live, &before, &StateVector::IDENTITY, 1.0, 0, false)
            .unwrap_err();

        assert!(matches!(
            err,
            Error::InvalidArgument {
                name: "increment_count",
                ..
            }
        ));
        assert_eq!(live, before);
        assert_eq!(engine.plan().copied(), plan_before);
    }

    #[test]
    fn test_increments_converge_on_target() {
        let mut engine = BendingEngine::new();
        let mut live = predicted();
        let count = 8;

        engine
            .begin(&mut live, &predicted(), &authoritative(), 1.0, count, false)
            .unwrap();

        for _ in 0..count {
            assert!(engine.apply_increment(&mut live));
            assert!(live.is_normalized());
        }

        // Full bend restores the predicted position
        assert!(live.position.abs_diff_eq(predicted().position, EPS));

        // Orientation gap shrinks by (1 - scale) per increment
        let initial_gap = authoritative()
            .orientation
            .angle_between(predicted().orientation);
        let expected_gap = initial_gap * (1.0 - 1.0 / count as f32).powi(count as i32);
        let gap = live.orientation.angle_between(predicted().orientation);
        assert!((gap - expected_gap).abs() < 1e-3);
        assert!(gap < initial_gap);

        assert!(!engine.is_bending());
        assert!(!engine.apply_increment(&mut live));
    }

    #[test]
    fn test_partial_bend_amount() {
        let mut engine = BendingEngine::new();
        let mut live = predicted();

        engine
            .begin(&mut live, &predicted(), &authoritative(), 0.25, 5, false)
            .unwrap();
        while engine.apply_increment(&mut live) {}

        let expected =
            authoritative().position + (predicted().position - authoritative().position) * 0.25;
        assert!(live.position.abs_diff_eq(expected, EPS));
    }

    #[test]
    fn test_single_increment_reaches_target_orientation() {
        let mut engine = BendingEngine::new();
        let mut live = predicted();

        engine
            .begin(&mut live, &predicted(), &authoritative(), 1.0, 1, false)
            .unwrap();
        engine.apply_increment(&mut live);

        assert!(live.orientation.abs_diff_eq(predicted().orientation, EPS));
    }

    #[test]
    fn test_new_begin_supersedes_plan() {
        let mut engine = BendingEngine::new();
        let mut live = predicted();

        engine
            .begin(&mut live, &predicted(), &authoritative(), 1.0, 10, false)
            .unwrap();
        engine.apply_increment(&mut live);

        let second = StateVector::at_rest(Vec3::ZERO, Quat::IDENTITY);
        let predicted_now = live;
        let plan = *engine
            .begin(&mut live, &predicted_now, &second, 1.0, 2, false)
            .unwrap();

        assert_eq!(plan.remaining_increments, 2);
        assert_eq!(plan.target, predicted_now);
        assert_eq!(engine.remaining_increments(), 2);
        assert_eq!(live, second);
    }

    #[test]
    fn test_noop_without_plan() {
        let mut engine = BendingEngine::new();
        let mut live = predicted();

        assert!(!engine.apply_increment(&mut live));
        assert_eq!(live, predicted());
    }

    #[test]
    fn test_axis_angle_alternative_is_not_default() {
        let from = StateVector::at_rest(Vec3::ZERO, Quat::IDENTITY);
        let to = StateVector::at_rest(Vec3::ZERO, Quat::from_rotation_z(FRAC_PI_2));
        let count = 4;

        let mut engine = BendingEngine::new();
        let mut live = to;
        let plan = *engine.begin(&mut live, &to, &from, 1.0, count, false).unwrap();

        // Stepping with the axis-angle delta lands exactly on the target...
        let mut stepped = from.orientation;
        for _ in 0..count {
            stepped = plan.axis_angle_step(stepped);
        }
        assert!(stepped.abs_diff_eq(to.orientation, EPS));

        // ...while the default slerp increment only closes the gap geometrically
        while engine.apply_increment(&mut live) {}
        assert!(live.orientation.angle_between(to.orientation) > 0.1);
    }

    #[test]
    fn test_plan_display() {
        let plan = BendingPlan::compute(&predicted(), &authoritative(), 1.0, 4).unwrap();
        let text = plan.to_string();
        assert!(text.starts_with("bending 4/4 increments left"));
        assert!(text.contains("dpos[1.000 0.000 -1.000]"));
    }
}

//! Numeric conventions layered on `glam`
//!
//! Quaternion libraries disagree on multiplication order and on how a
//! "difference" between two rotations is expressed. Everything in this
//! workspace goes through the helpers below so the conventions live in one
//! place and are pinned by tests:
//!
//! - Hamilton product: `i * j = k`
//! - `a * b` applies `b` first, then `a`
//! - rotation delta = `current * conjugate(reference)`, so `delta * reference == current`
//! - spherical interpolation takes the shortest arc

use glam::{Quat, Vec3};

/// Maximum deviation of `|q|^2` from one before a quaternion is renormalized
pub const UNIT_NORM_TOLERANCE: f32 = 1e-4;

/// Rotation taking `reference` to `current`.
pub fn rotation_delta(current: Quat, reference: Quat) -> Quat {
    current * reference.conjugate()
}

/// Scale the angle of a rotation, keeping its axis.
///
/// Goes through axis-angle form; angles come back in `[0, 2π]`, so scaling a
/// rotation larger than a half turn takes the long way round.
pub fn scale_rotation(rotation: Quat, scale: f32) -> Quat {
    let (axis, angle) = rotation.to_axis_angle();
    Quat::from_axis_angle(axis, angle * scale)
}

/// Linear interpolation of two positions.
pub fn lerp_vec3(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    from.lerp(to, t)
}

/// Shortest-arc spherical interpolation, renormalized.
pub fn slerp(from: Quat, to: Quat, t: f32) -> Quat {
    ensure_unit(from.slerp(to, t))
}

/// Renormalize a quaternion that has drifted away from unit length.
///
/// Quaternions already within tolerance are returned bit-for-bit.
pub fn ensure_unit(q: Quat) -> Quat {
    if (q.length_squared() - 1.0).abs() > UNIT_NORM_TOLERANCE {
        q.normalize()
    } else {
        q
    }
}

/// Whether a quaternion is close enough to unit length
pub fn is_unit(q: Quat) -> bool {
    (q.length_squared() - 1.0).abs() <= UNIT_NORM_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPS: f32 = 1e-5;

    #[test]
    fn test_hamilton_product() {
        let i = Quat::from_xyzw(1.0, 0.0, 0.0, 0.0);
        let j = Quat::from_xyzw(0.0, 1.0, 0.0, 0.0);
        let k = Quat::from_xyzw(0.0, 0.0, 1.0, 0.0);

        assert!((i * j).abs_diff_eq(k, EPS));
        assert!((j * i).abs_diff_eq(-k, EPS));
    }

    #[test]
    fn test_right_operand_applies_first() {
        let about_z = Quat::from_rotation_z(FRAC_PI_2);
        let about_x = Quat::from_rotation_x(FRAC_PI_2);

        // X is fixed by the x-rotation, then carried to Y by the z-rotation
        let v = (about_z * about_x) * Vec3::X;
        assert!(v.abs_diff_eq(Vec3::Y, EPS));

        // The other order carries X to Y first, then Y to Z
        let v = (about_x * about_z) * Vec3::X;
        assert!(v.abs_diff_eq(Vec3::Z, EPS));
    }

    #[test]
    fn test_rotation_delta_recovers_current() {
        let reference = Quat::from_rotation_y(0.3);
        let current = Quat::from_rotation_x(1.1) * Quat::from_rotation_z(-0.4);

        let delta = rotation_delta(current, reference);
        assert!((delta * reference).abs_diff_eq(current, EPS));
    }

    #[test]
    fn test_scale_rotation_halves_angle() {
        let half = scale_rotation(Quat::from_rotation_z(FRAC_PI_2), 0.5);
        assert!(half.abs_diff_eq(Quat::from_rotation_z(FRAC_PI_4), EPS));

        let none = scale_rotation(Quat::IDENTITY, 0.5);
        assert!(none.abs_diff_eq(Quat::IDENTITY, EPS));
    }

    #[test]
    fn test_slerp_takes_shortest_arc() {
        let from = Quat::IDENTITY;
        // Same rotation as +90° about z, written with the opposite sign
        let to = -Quat::from_rotation_z(FRAC_PI_2);

        let mid = slerp(from, to, 0.5);
        assert!((mid.angle_between(Quat::from_rotation_z(FRAC_PI_4))).abs() < 1e-3);
    }

    #[test]
    fn test_slerp_endpoints() {
        let from = Quat::from_rotation_x(0.2);
        let to = Quat::from_rotation_y(PI / 3.0);

        assert!(slerp(from, to, 0.0).abs_diff_eq(from, EPS));
        assert!(slerp(from, to, 1.0).abs_diff_eq(to, EPS));
    }

    #[test]
    fn test_ensure_unit() {
        let q = Quat::from_rotation_y(0.7);
        assert_eq!(ensure_unit(q), q);

        let drifted = Quat::from_xyzw(0.0, 0.0, 0.0, 2.0);
        let fixed = ensure_unit(drifted);
        assert!(is_unit(fixed));
        assert!(fixed.abs_diff_eq(Quat::IDENTITY, EPS));
    }

    #[test]
    fn test_lerp_vec3() {
        let mid = lerp_vec3(Vec3::ZERO, Vec3::new(2.0, 4.0, -6.0), 0.5);
        assert!(mid.abs_diff_eq(Vec3::new(1.0, 2.0, -3.0), EPS));
    }
}

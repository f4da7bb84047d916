//! Character root transform and the rest baseline captured at attach time.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Transform of the character root, as read by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    /// Unit quaternion (x, y, z, w).
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

/// Rest pose captured once; every "return to rest" references it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub position_y: f32,
    pub orientation: Quat,
}

impl Baseline {
    /// Place a character at `position`, turn its +Z axis towards `viewpoint`,
    /// then pitch it about its own X axis by `pitch_deg`.
    pub fn capture(position: Vec3, viewpoint: Vec3, pitch_deg: f32) -> Self {
        let facing = face_towards(position, viewpoint, Vec3::Y);
        let orientation = (facing * Quat::from_rotation_x(pitch_deg.to_radians())).normalize();
        Self {
            position_y: position.y,
            orientation,
        }
    }
}

/// Rotation whose local +Z points from `eye` to `target`, keeping `up` as the
/// vertical reference. Degenerate inputs are nudged instead of producing NaN.
pub fn face_towards(eye: Vec3, target: Vec3, up: Vec3) -> Quat {
    let mut z = target - eye;
    if z.length_squared() == 0.0 {
        z = Vec3::Z;
    }
    z = z.normalize();

    let mut x = up.cross(z);
    if x.length_squared() == 0.0 {
        // up and z are parallel
        if up.z.abs() == 1.0 {
            z.x += 1e-4;
        } else {
            z.z += 1e-4;
        }
        z = z.normalize();
        x = up.cross(z);
    }
    x = x.normalize();
    let y = z.cross(x);

    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn facing_positive_z_is_identity() {
        let q = face_towards(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), Vec3::Y);
        assert_abs_diff_eq!(q.dot(Quat::IDENTITY).abs(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn facing_maps_forward_onto_target_direction() {
        let eye = Vec3::new(0.0, -6.0, 0.0);
        let target = Vec3::new(3.0, -6.77, 20.0);
        let q = face_towards(eye, target, Vec3::Y);
        let fwd = q * Vec3::Z;
        let want = (target - eye).normalize();
        assert_abs_diff_eq!(fwd.dot(want), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn straight_up_does_not_produce_nan() {
        let q = face_towards(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        assert!(q.is_finite());
        assert!(q.is_normalized());
    }

    #[test]
    fn coincident_points_do_not_produce_nan() {
        let q = face_towards(Vec3::ONE, Vec3::ONE, Vec3::Y);
        assert!(q.is_finite());
    }

    #[test]
    fn baseline_applies_pitch_after_facing() {
        let b = Baseline::capture(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 15.0);
        assert_eq!(b.position_y, 0.0);
        let want = Quat::from_rotation_x(15f32.to_radians());
        assert_abs_diff_eq!(b.orientation.dot(want).abs(), 1.0, epsilon = 1e-5);
    }
}

//! Shared Utility Functions
//!
//! Small geometry helpers used by multiple combat modules and by input
//! collaborators.

use bevy::prelude::*;

use super::constants::FACING_CONE;

/// The direction a character is looking, in the ground plane.
pub fn forward_vector(transform: &Transform) -> Vec3 {
    transform.rotation * Vec3::NEG_Z
}

/// Whether `caster` is looking at `target_pos` within the facing cone.
///
/// A target on top of the caster always counts as faced.
pub fn is_facing(caster: &Transform, target_pos: Vec3) -> bool {
    let to_target = target_pos - caster.translation;
    if to_target.length_squared() < 1e-6 {
        return true;
    }
    forward_vector(caster).angle_between(to_target) < FACING_CONE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform_faces_negative_z() {
        let transform = Transform::IDENTITY;
        let forward = forward_vector(&transform);
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_facing_target_straight_ahead() {
        let caster = Transform::from_xyz(0.0, 0.0, 0.0);
        assert!(is_facing(&caster, Vec3::new(0.0, 0.0, -10.0)));
    }

    #[test]
    fn test_not_facing_target_behind() {
        let caster = Transform::from_xyz(0.0, 0.0, 0.0);
        assert!(!is_facing(&caster, Vec3::new(0.0, 0.0, 10.0)));
    }

    #[test]
    fn test_cone_edge_excludes_wide_angles() {
        let caster = Transform::from_xyz(0.0, 0.0, 0.0);
        // 45 degrees off-axis is outside the 30 degree cone
        assert!(!is_facing(&caster, Vec3::new(10.0, 0.0, -10.0)));
        // 15 degrees off-axis is inside it
        let inside = Vec3::new((15f32).to_radians().tan() * 10.0, 0.0, -10.0);
        assert!(is_facing(&caster, inside));
    }

    #[test]
    fn test_overlapping_target_counts_as_faced() {
        let caster = Transform::from_xyz(1.0, 0.0, 1.0);
        assert!(is_facing(&caster, Vec3::new(1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_rotated_caster_faces_rotated_direction() {
        // Yaw 90 degrees: -Z rotates onto -X
        let caster =
            Transform::from_xyz(0.0, 0.0, 0.0).with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        assert!(is_facing(&caster, Vec3::new(-10.0, 0.0, 0.0)));
        assert!(!is_facing(&caster, Vec3::new(0.0, 0.0, -10.0)));
    }
}

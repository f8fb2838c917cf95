//! Transform for positioning objects in 3D space.

use glam::{Mat4, Quat, Vec3};

/// Position, rotation and scale, composed into a model matrix.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn from_position_scale(position: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            scale,
            ..Default::default()
        }
    }

    /// Get the model matrix for this transform
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Translate by an offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Rotate around an axis
    pub fn rotate_axis(&mut self, axis: Vec3, angle: f32) {
        let delta = Quat::from_axis_angle(axis, angle);
        self.rotation = delta * self.rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_matrix_applies_scale_then_rotation_then_translation() {
        let mut transform =
            Transform::from_position_scale(Vec3::new(10.0, 0.0, 0.0), Vec3::splat(2.0));
        transform.rotate_axis(Vec3::Y, std::f32::consts::FRAC_PI_2);

        // A point at local +X: scaled to 2, rotated onto -Z, then moved to x=10.
        let point = transform.matrix() * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!((point - Vec4::new(10.0, 0.0, -2.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_default_is_identity() {
        let transform = Transform::new();
        assert_eq!(transform.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_from_position_only_translates() {
        let transform = Transform::from_position(Vec3::new(0.0, 3.0, 0.0));
        let point = transform.matrix() * Vec4::new(1.0, 1.0, 1.0, 1.0);
        assert!((point - Vec4::new(1.0, 4.0, 1.0, 1.0)).length() < 1e-6);
    }
}

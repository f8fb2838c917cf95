//! Camera and perspective projection.

use glam::{Mat4, Vec3};

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: std::f32::consts::FRAC_PI_4, // 45 degrees
            aspect: 800.0 / 600.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Projection {
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }
}

/// Camera for viewing the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: Projection,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Projection::default(),
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            projection: Projection::default(),
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    /// Get the forward direction
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Get the right direction
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize()
    }

    /// Update aspect ratio after a window resize
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.projection.set_aspect(width / height);
        }
    }

    /// Current vertical field of view in degrees (for UI readouts).
    pub fn fov_degrees(&self) -> f32 {
        self.projection.fov_y.to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_default_camera_looks_down_negative_z() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 3.0));
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-6);
        assert!((camera.right() - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_new_camera_faces_its_target() {
        let camera = Camera::new(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO);
        assert!((camera.forward() - Vec3::NEG_X).length() < 1e-6);
        assert_eq!(camera.up, Vec3::Y);
        // Projection comes in at the defaults.
        assert!((camera.fov_degrees() - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_view_matrix_moves_target_onto_view_axis() {
        let camera = Camera::default();
        let view = camera.view_matrix();

        // The target sits straight ahead of the camera, 3 units down -Z in
        // view space.
        let target_view = view * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((target_view - Vec4::new(0.0, 0.0, -3.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_set_aspect_ignores_degenerate_height() {
        let mut camera = Camera::default();
        camera.set_aspect(1920.0, 1080.0);
        assert!((camera.projection.aspect - 1920.0 / 1080.0).abs() < 1e-6);

        camera.set_aspect(1920.0, 0.0);
        assert!((camera.projection.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }
}

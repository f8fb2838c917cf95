//! Fly camera controller.
//!
//! WASD movement relative to the view direction, mouse look while the look
//! button is held, and scroll-wheel zoom that narrows the projection's field
//! of view.

use glam::{Vec2, Vec3};

use super::Camera;

/// Input state for the camera, collected by the event loop.
#[derive(Debug, Clone, Default)]
pub struct CameraInput {
    /// Movement keys (WASD plus up/down)
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,

    /// Mouse delta since last frame (in pixels)
    pub mouse_delta: Vec2,

    /// Mouse scroll delta (positive = scroll up)
    pub scroll_delta: f32,

    /// Whether mouse look is active (e.g., right mouse button held)
    pub mouse_look_active: bool,
}

impl CameraInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset per-frame deltas (call after update)
    pub fn reset_deltas(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }
}

/// Free-flying FPS-style camera controller.
pub struct FlyController {
    /// Current yaw angle (radians)
    pub yaw: f32,
    /// Current pitch angle (radians)
    pub pitch: f32,
    /// Movement speed (units per second)
    pub move_speed: f32,
    /// Mouse sensitivity (radians per pixel)
    pub mouse_sensitivity: f32,
    /// Field-of-view change per scroll unit (degrees)
    pub zoom_step: f32,
    /// Zoom range bounds (degrees)
    pub min_fov: f32,
    pub max_fov: f32,
}

impl Default for FlyController {
    fn default() -> Self {
        Self {
            // Facing -Z, matching the default camera.
            yaw: -std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
            move_speed: 2.5,
            mouse_sensitivity: 0.002,
            zoom_step: 1.0,
            min_fov: 1.0,
            max_fov: 45.0,
        }
    }
}

impl FlyController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = sensitivity;
        self
    }

    /// Derive yaw and pitch from the camera's current orientation.
    pub fn sync_with_camera(&mut self, camera: &Camera) {
        let forward = camera.forward();
        self.yaw = forward.z.atan2(forward.x);
        self.pitch = (-forward.y).asin();
    }

    fn forward_direction(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            -self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    fn right_direction(&self) -> Vec3 {
        self.forward_direction().cross(Vec3::Y).normalize()
    }

    /// Advance the camera one frame.
    pub fn update(&mut self, camera: &mut Camera, input: &CameraInput, dt: f32) {
        // Scroll narrows or widens the field of view.
        if input.scroll_delta != 0.0 {
            let fov = camera.fov_degrees() - input.scroll_delta * self.zoom_step;
            camera.projection.fov_y = fov.clamp(self.min_fov, self.max_fov).to_radians();
        }

        // Mouse look
        if input.mouse_look_active && input.mouse_delta != Vec2::ZERO {
            self.yaw += input.mouse_delta.x * self.mouse_sensitivity;
            self.pitch += input.mouse_delta.y * self.mouse_sensitivity;

            // Clamp pitch to avoid gimbal lock
            let max_pitch = std::f32::consts::FRAC_PI_2 - 0.01;
            self.pitch = self.pitch.clamp(-max_pitch, max_pitch);

            // Wrap yaw
            self.yaw %= std::f32::consts::TAU;
        }

        let forward = self.forward_direction();
        let right = self.right_direction();

        let mut velocity = Vec3::ZERO;
        if input.forward {
            velocity += forward;
        }
        if input.backward {
            velocity -= forward;
        }
        if input.right {
            velocity += right;
        }
        if input.left {
            velocity -= right;
        }
        if input.up {
            velocity += Vec3::Y;
        }
        if input.down {
            velocity -= Vec3::Y;
        }

        if velocity.length_squared() > 0.0 {
            velocity = velocity.normalize() * self.move_speed;
        }

        camera.position += velocity * dt;
        camera.target = camera.position + forward;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_input_moves_along_view_direction() {
        let mut camera = Camera::default();
        let mut controller = FlyController::default();
        controller.sync_with_camera(&camera);

        let input = CameraInput {
            forward: true,
            ..Default::default()
        };
        controller.update(&mut camera, &input, 1.0);

        // Default view faces -Z at 2.5 units per second.
        assert!((camera.position - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-5);
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_diagonal_movement_is_not_faster() {
        let mut camera = Camera::default();
        let mut controller = FlyController::default();
        controller.sync_with_camera(&camera);

        let start = camera.position;
        let input = CameraInput {
            forward: true,
            right: true,
            ..Default::default()
        };
        controller.update(&mut camera, &input, 1.0);

        let moved = (camera.position - start).length();
        assert!((moved - controller.move_speed).abs() < 1e-4);
    }

    #[test]
    fn test_with_speed_scales_movement() {
        let mut camera = Camera::default();
        let mut controller = FlyController::new().with_speed(5.0);
        controller.sync_with_camera(&camera);

        let input = CameraInput {
            forward: true,
            ..Default::default()
        };
        controller.update(&mut camera, &input, 1.0);

        // (0, 0, 3) advanced 5 units along -Z.
        assert!((camera.position - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_scroll_zoom_clamps_to_fov_range() {
        let mut camera = Camera::default();
        let mut controller = FlyController::default();
        controller.sync_with_camera(&camera);

        // Scrolling up (positive) zooms in by narrowing the field of view.
        let input = CameraInput {
            scroll_delta: 5.0,
            ..Default::default()
        };
        controller.update(&mut camera, &input, 0.016);
        assert!((camera.fov_degrees() - 40.0).abs() < 1e-4);

        // A huge scroll never leaves the clamp range.
        let input = CameraInput {
            scroll_delta: 1000.0,
            ..Default::default()
        };
        controller.update(&mut camera, &input, 0.016);
        assert!((camera.fov_degrees() - controller.min_fov).abs() < 1e-4);

        let input = CameraInput {
            scroll_delta: -1000.0,
            ..Default::default()
        };
        controller.update(&mut camera, &input, 0.016);
        assert!((camera.fov_degrees() - controller.max_fov).abs() < 1e-4);
    }

    #[test]
    fn test_pitch_clamps_short_of_vertical() {
        let mut camera = Camera::default();
        let mut controller = FlyController::default();
        controller.sync_with_camera(&camera);

        let input = CameraInput {
            mouse_look_active: true,
            mouse_delta: Vec2::new(0.0, 1e6),
            ..Default::default()
        };
        controller.update(&mut camera, &input, 0.016);

        let max_pitch = std::f32::consts::FRAC_PI_2 - 0.01;
        assert!((controller.pitch - max_pitch).abs() < 1e-6);
        // The view direction still has a horizontal component.
        let forward = camera.forward();
        assert!(Vec2::new(forward.x, forward.z).length() > 0.0);
    }

    #[test]
    fn test_mouse_look_ignored_when_inactive() {
        let mut camera = Camera::default();
        let mut controller = FlyController::default();
        controller.sync_with_camera(&camera);

        let input = CameraInput {
            mouse_look_active: false,
            mouse_delta: Vec2::new(500.0, 500.0),
            ..Default::default()
        };
        controller.update(&mut camera, &input, 0.016);

        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_with_sensitivity_scales_look() {
        let mut camera = Camera::default();
        let mut controller = FlyController::new().with_sensitivity(0.01);
        controller.sync_with_camera(&camera);
        let yaw_before = controller.yaw;

        let input = CameraInput {
            mouse_look_active: true,
            mouse_delta: Vec2::new(100.0, 0.0),
            ..Default::default()
        };
        controller.update(&mut camera, &input, 0.016);

        // 100 px at 0.01 rad/px turns the view a full radian.
        assert!((controller.yaw - (yaw_before + 1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_reset_deltas_keeps_key_state() {
        let mut input = CameraInput {
            forward: true,
            mouse_delta: Vec2::new(3.0, 4.0),
            scroll_delta: 2.0,
            ..Default::default()
        };
        input.reset_deltas();

        assert!(input.forward);
        assert_eq!(input.mouse_delta, Vec2::ZERO);
        assert_eq!(input.scroll_delta, 0.0);
    }
}

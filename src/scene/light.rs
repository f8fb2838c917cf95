//! Light types for the scene.
//!
//! Each light is a plain parameter block with the classic Phong
//! ambient/diffuse/specular split, plus an `apply` method that writes the
//! block into shader uniforms under a caller-chosen name.

use glam::Vec3;

use crate::shader::Shader;

/// Directional light (like the sun)
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-0.2, -1.0, -0.3),
            ambient: Vec3::splat(0.05),
            diffuse: Vec3::splat(0.4),
            specular: Vec3::splat(0.5),
        }
    }
}

impl DirectionalLight {
    pub fn new(direction: Vec3) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            ..Default::default()
        }
    }

    /// Write this light as `<name>.direction`, `<name>.ambient`, ...
    pub fn apply(&self, shader: &Shader, name: &str) {
        shader.set_vec3(&format!("{}.direction", name), self.direction);
        shader.set_vec3(&format!("{}.ambient", name), self.ambient);
        shader.set_vec3(&format!("{}.diffuse", name), self.diffuse);
        shader.set_vec3(&format!("{}.specular", name), self.specular);
    }
}

/// Point light with distance attenuation
#[derive(Debug, Clone)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    /// Attenuation terms: 1 / (constant + linear*d + quadratic*d^2)
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(1.2, 1.0, 2.0),
            ambient: Vec3::splat(0.05),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::ONE,
            // Covers roughly a 50 unit radius.
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

impl PointLight {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Write this light as `<name>.position`, `<name>.ambient`, ...
    pub fn apply(&self, shader: &Shader, name: &str) {
        shader.set_vec3(&format!("{}.position", name), self.position);
        shader.set_vec3(&format!("{}.ambient", name), self.ambient);
        shader.set_vec3(&format!("{}.diffuse", name), self.diffuse);
        shader.set_vec3(&format!("{}.specular", name), self.specular);
        shader.set_float(&format!("{}.constant", name), self.constant);
        shader.set_float(&format!("{}.linear", name), self.linear);
        shader.set_float(&format!("{}.quadratic", name), self.quadratic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional_new_normalizes_direction() {
        let light = DirectionalLight::new(Vec3::new(0.0, -10.0, 0.0));
        assert!((light.direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(light.direction, Vec3::NEG_Y);
    }

    #[test]
    fn test_point_light_new_places_light_and_keeps_defaults() {
        let light = PointLight::new(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(light.position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(light.diffuse, PointLight::default().diffuse);
        assert_eq!(light.constant, 1.0);
    }

    #[test]
    fn test_point_light_default_attenuation() {
        let light = PointLight::default();
        assert_eq!(light.constant, 1.0);
        assert!((light.linear - 0.09).abs() < 1e-6);
        assert!((light.quadratic - 0.032).abs() < 1e-6);
        // Brightness falls off with distance.
        let at = |d: f32| 1.0 / (light.constant + light.linear * d + light.quadratic * d * d);
        assert!(at(1.0) > at(10.0));
    }
}

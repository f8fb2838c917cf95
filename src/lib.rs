//! meshview - an OpenGL model viewer library
//!
//! Loads Wavefront OBJ models into GPU meshes and draws them with a Phong
//! shader, with an egui overlay for poking at the scene.
//!
//! # Features
//! - OBJ import with normal and tangent generation
//! - Path-keyed texture cache so meshes share GPU textures
//! - Fixed vertex layout with skinning slots reserved for animated models
//! - Fly camera, directional + point lighting, egui debug UI

pub mod egui_integration;
pub mod error;
pub mod resources;
pub mod scene;
pub mod shader;
pub mod window;

pub use egui_integration::GlowEguiIntegration;
pub use error::{RenderError, RenderResult};
pub use resources::{Mesh, Model, Texture, TextureData, TextureKind, Vertex};
pub use shader::Shader;
pub use window::GlWindow;

/// Configuration for opening the viewer window
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Window title
    pub title: String,
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
    /// Enable vsync
    pub vsync: bool,
    /// Multisample count for the default framebuffer (0 disables MSAA)
    pub msaa_samples: u8,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Model Viewer".to_string(),
            width: 800,
            height: 600,
            vsync: true,
            msaa_samples: 4,
        }
    }
}

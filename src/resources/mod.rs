//! GPU resources and the import pipeline
//!
//! Vertices, meshes, textures and models, plus the OBJ import stage that
//! produces them.

mod mesh;
mod model;
pub mod obj;
mod texture;
mod vertex;

pub use mesh::*;
pub use model::*;
pub use texture::*;
pub use vertex::*;

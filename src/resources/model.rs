//! Models: ordered mesh collections loaded from disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::RenderResult;
use crate::resources::mesh::Mesh;
use crate::resources::obj::{self, MeshSource};
use crate::resources::texture::{Texture, TextureData, TextureKind};
use crate::shader::Shader;

/// The meshes one import produced, sharing one model space.
///
/// Textures are de-duplicated across the whole model: each unique file path
/// is decoded and uploaded once, and every mesh referencing it holds the same
/// `Arc`.
pub struct Model {
    meshes: Vec<Mesh>,
    name: String,
}

impl Model {
    /// Import an OBJ file and upload everything it references.
    pub fn load_obj<P: AsRef<Path>>(gl: &Arc<glow::Context>, path: P) -> RenderResult<Self> {
        let path = path.as_ref();
        let sources = obj::load_meshes(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();

        Self::from_sources(gl, sources, name)
    }

    /// Upload already-imported mesh sources.
    pub fn from_sources(
        gl: &Arc<glow::Context>,
        sources: Vec<MeshSource>,
        name: impl Into<String>,
    ) -> RenderResult<Self> {
        let mut cache: HashMap<PathBuf, Arc<Texture>> = HashMap::new();
        let mut meshes = Vec::with_capacity(sources.len());

        for source in sources {
            let mut textures = Vec::with_capacity(source.textures.len());
            for (kind, path) in source.textures {
                textures.push(cached_texture(gl, &mut cache, kind, path)?);
            }

            let mesh =
                Mesh::new(gl, source.vertices, source.indices, textures)?.with_name(source.name);
            meshes.push(mesh);
        }

        let name = name.into();
        log::info!(
            "Model '{}' ready: {} meshes, {} unique textures",
            name,
            meshes.len(),
            cache.len()
        );

        Ok(Self { meshes, name })
    }

    /// Wrap already-uploaded meshes into a model.
    pub fn from_meshes(meshes: Vec<Mesh>, name: impl Into<String>) -> Self {
        Self {
            meshes,
            name: name.into(),
        }
    }

    /// Draw every mesh, in import order, with the given (already active)
    /// shader program.
    pub fn draw(&self, shader: &Shader) {
        for mesh in &self.meshes {
            mesh.draw(shader);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertex_count()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangle_count()).sum()
    }
}

/// Look up or upload the texture for `path`.
///
/// Identity is the path alone; if two materials reference one file under
/// different kinds, the first load decides the kind. A file that cannot be
/// read or decoded degrades to a warning and a flat white placeholder so the
/// mesh still draws with valid bindings.
fn cached_texture(
    gl: &Arc<glow::Context>,
    cache: &mut HashMap<PathBuf, Arc<Texture>>,
    kind: TextureKind,
    path: PathBuf,
) -> RenderResult<Arc<Texture>> {
    if let Some(texture) = cache.get(&path) {
        return Ok(Arc::clone(texture));
    }

    let data = match TextureData::from_file(&path) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("{}; substituting flat white", e);
            TextureData::white()
        }
    };

    let texture = Arc::new(Texture::create(gl, &data, kind, path.clone())?);
    cache.insert(path, Arc::clone(&texture));
    Ok(texture)
}

//! GPU meshes and the draw protocol.
//!
//! A [`Mesh`] owns its geometry (vertices and triangle indices), a list of
//! shared texture references, and exactly one VAO/VBO/EBO triple. Buffers are
//! allocated and filled once at construction; after that the mesh is immutable
//! and drawing only mutates GL binding state.
//!
//! Drawing follows a fixed texture protocol: the Nth texture in the list is
//! bound to texture unit N, and the sampler uniform it feeds is named after
//! the texture's kind with a 1-based counter per kind
//! (`material.texture_diffuse1`, `material.texture_diffuse2`,
//! `material.texture_specular1`, ...). The shader side has to spell its
//! sampler names the same way; nothing validates the pairing at runtime.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use glow::HasContext as _;

use crate::error::{RenderError, RenderResult};
use crate::resources::texture::{Texture, TextureKind};
use crate::resources::vertex::{AttributeKind, Vertex, VERTEX_ATTRIBUTES, VERTEX_STRIDE};
use crate::shader::Shader;

/// Smallest number of texture units GL 3.3 guarantees per stage. A mesh
/// binding more than this cannot draw correctly anywhere.
pub const MAX_TEXTURE_UNITS: usize = 16;

/// A drawable mesh: owned geometry plus shared textures, resident on the GPU.
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    textures: Vec<Arc<Texture>>,
    name: String,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
    gl: Arc<glow::Context>,
}

impl Mesh {
    /// Take ownership of the geometry and texture list and upload the
    /// geometry to the GPU. The mesh is drawable as soon as this returns.
    ///
    /// Empty vertex or index lists are allowed and produce a mesh whose draw
    /// is a zero-triangle no-op.
    pub fn new(
        gl: &Arc<glow::Context>,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        textures: Vec<Arc<Texture>>,
    ) -> RenderResult<Self> {
        debug_assert!(
            indices.len() % 3 == 0,
            "index list length {} does not form whole triangles",
            indices.len()
        );
        debug_assert!(
            indices.iter().all(|&i| (i as usize) < vertices.len()),
            "index out of range of the vertex list"
        );
        debug_assert!(
            textures.len() <= MAX_TEXTURE_UNITS,
            "{} textures exceed the {} guaranteed texture units",
            textures.len(),
            MAX_TEXTURE_UNITS
        );

        let (vao, vbo, ebo) = unsafe { upload_geometry(gl, &vertices, &indices)? };

        Ok(Self {
            vertices,
            indices,
            textures,
            name: String::new(),
            vao,
            vbo,
            ebo,
            gl: Arc::clone(gl),
        })
    }

    /// Attach a debug name (shows up in logs and the UI).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn textures(&self) -> &[Arc<Texture>] {
        &self.textures
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bind this mesh's textures and draw its triangles.
    ///
    /// The shader program must already be in use; this only assigns its
    /// sampler uniforms. Texture unit `i` gets the `i`th texture of the list,
    /// one unit per entry with no de-duplication. After the bind loop the
    /// active unit is reset to the first one, the VAO is bound for one indexed
    /// draw over the full index range, then unbound. Binding state touched
    /// here is left as described, not restored to what the caller had.
    pub fn draw(&self, shader: &Shader) {
        let names = material_uniform_names(self.textures.iter().map(|t| t.kind));

        unsafe {
            for (unit, (texture, name)) in self.textures.iter().zip(&names).enumerate() {
                self.gl.active_texture(glow::TEXTURE0 + unit as u32);
                shader.set_int(name, unit as i32);
                self.gl.bind_texture(glow::TEXTURE_2D, Some(texture.handle()));
            }
            self.gl.active_texture(glow::TEXTURE0);

            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.draw_elements(
                glow::TRIANGLES,
                self.indices.len() as i32,
                glow::UNSIGNED_INT,
                0,
            );
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_vertex_array(self.vao);
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_buffer(self.ebo);
        }
    }
}

/// Create the VAO/VBO/EBO triple, upload both slices and declare the vertex
/// attribute pointers from the shared attribute table.
unsafe fn upload_geometry(
    gl: &glow::Context,
    vertices: &[Vertex],
    indices: &[u32],
) -> RenderResult<(glow::VertexArray, glow::Buffer, glow::Buffer)> {
    let vao = gl
        .create_vertex_array()
        .map_err(RenderError::ResourceAllocation)?;
    let vbo = gl.create_buffer().map_err(RenderError::ResourceAllocation)?;
    let ebo = gl.create_buffer().map_err(RenderError::ResourceAllocation)?;

    gl.bind_vertex_array(Some(vao));

    gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
    gl.buffer_data_u8_slice(
        glow::ARRAY_BUFFER,
        bytemuck::cast_slice(vertices),
        glow::STATIC_DRAW,
    );

    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
    gl.buffer_data_u8_slice(
        glow::ELEMENT_ARRAY_BUFFER,
        bytemuck::cast_slice(indices),
        glow::STATIC_DRAW,
    );

    for attr in &VERTEX_ATTRIBUTES {
        gl.enable_vertex_attrib_array(attr.location);
        match attr.kind {
            AttributeKind::Float => gl.vertex_attrib_pointer_f32(
                attr.location,
                attr.components,
                glow::FLOAT,
                false,
                VERTEX_STRIDE,
                attr.offset,
            ),
            // Bone ids stay integers; the float pointer call would convert.
            AttributeKind::Int => gl.vertex_attrib_pointer_i32(
                attr.location,
                attr.components,
                glow::INT,
                VERTEX_STRIDE,
                attr.offset,
            ),
        }
    }

    gl.bind_vertex_array(None);

    Ok((vao, vbo, ebo))
}

/// Sampler uniform names for a texture list, in list order.
///
/// The Jth texture of kind K gets `material.<kind prefix>J`, with J counted
/// 1-based and independently per kind. Pure function so the naming contract
/// is testable without a GL context.
pub fn material_uniform_names<I>(kinds: I) -> Vec<String>
where
    I: IntoIterator<Item = TextureKind>,
{
    let mut diffuse = 0u32;
    let mut specular = 0u32;
    let mut normal = 0u32;
    let mut height = 0u32;

    kinds
        .into_iter()
        .map(|kind| {
            let count = match kind {
                TextureKind::Diffuse => {
                    diffuse += 1;
                    diffuse
                }
                TextureKind::Specular => {
                    specular += 1;
                    specular
                }
                TextureKind::Normal => {
                    normal += 1;
                    normal
                }
                TextureKind::Height => {
                    height += 1;
                    height
                }
            };
            format!("material.{}{}", kind.uniform_prefix(), count)
        })
        .collect()
}

/// Unit cube centered at the origin, 24 vertices with per-face normals,
/// UVs and a consistent tangent basis. The viewer falls back to this when no
/// model file is given.
pub fn cube_geometry() -> (Vec<Vertex>, Vec<u32>) {
    let faces = [
        // Front
        (Vec3::new(-0.5, -0.5, 0.5), Vec3::Z, Vec2::new(0.0, 1.0)),
        (Vec3::new(0.5, -0.5, 0.5), Vec3::Z, Vec2::new(1.0, 1.0)),
        (Vec3::new(0.5, 0.5, 0.5), Vec3::Z, Vec2::new(1.0, 0.0)),
        (Vec3::new(-0.5, 0.5, 0.5), Vec3::Z, Vec2::new(0.0, 0.0)),
        // Back
        (Vec3::new(0.5, -0.5, -0.5), -Vec3::Z, Vec2::new(0.0, 1.0)),
        (Vec3::new(-0.5, -0.5, -0.5), -Vec3::Z, Vec2::new(1.0, 1.0)),
        (Vec3::new(-0.5, 0.5, -0.5), -Vec3::Z, Vec2::new(1.0, 0.0)),
        (Vec3::new(0.5, 0.5, -0.5), -Vec3::Z, Vec2::new(0.0, 0.0)),
        // Right
        (Vec3::new(0.5, -0.5, 0.5), Vec3::X, Vec2::new(0.0, 1.0)),
        (Vec3::new(0.5, -0.5, -0.5), Vec3::X, Vec2::new(1.0, 1.0)),
        (Vec3::new(0.5, 0.5, -0.5), Vec3::X, Vec2::new(1.0, 0.0)),
        (Vec3::new(0.5, 0.5, 0.5), Vec3::X, Vec2::new(0.0, 0.0)),
        // Left
        (Vec3::new(-0.5, -0.5, -0.5), -Vec3::X, Vec2::new(0.0, 1.0)),
        (Vec3::new(-0.5, -0.5, 0.5), -Vec3::X, Vec2::new(1.0, 1.0)),
        (Vec3::new(-0.5, 0.5, 0.5), -Vec3::X, Vec2::new(1.0, 0.0)),
        (Vec3::new(-0.5, 0.5, -0.5), -Vec3::X, Vec2::new(0.0, 0.0)),
        // Top
        (Vec3::new(-0.5, 0.5, 0.5), Vec3::Y, Vec2::new(0.0, 1.0)),
        (Vec3::new(0.5, 0.5, 0.5), Vec3::Y, Vec2::new(1.0, 1.0)),
        (Vec3::new(0.5, 0.5, -0.5), Vec3::Y, Vec2::new(1.0, 0.0)),
        (Vec3::new(-0.5, 0.5, -0.5), Vec3::Y, Vec2::new(0.0, 0.0)),
        // Bottom
        (Vec3::new(-0.5, -0.5, -0.5), -Vec3::Y, Vec2::new(0.0, 1.0)),
        (Vec3::new(0.5, -0.5, -0.5), -Vec3::Y, Vec2::new(1.0, 1.0)),
        (Vec3::new(0.5, -0.5, 0.5), -Vec3::Y, Vec2::new(1.0, 0.0)),
        (Vec3::new(-0.5, -0.5, 0.5), -Vec3::Y, Vec2::new(0.0, 0.0)),
    ];

    let mut vertices = Vec::with_capacity(faces.len());
    for (position, normal, uv) in faces {
        let tangent = if normal.abs().y > 0.9 {
            Vec3::X
        } else {
            Vec3::Y.cross(normal).normalize()
        };

        let mut vertex = Vertex::new(position, normal, uv);
        vertex.tangent = tangent;
        vertex.bitangent = normal.cross(tangent);
        vertices.push(vertex);
    }

    let mut indices = Vec::with_capacity(36);
    for face in 0..6u32 {
        let base = face * 4;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_names_count_per_kind() {
        let names = material_uniform_names([
            TextureKind::Diffuse,
            TextureKind::Diffuse,
            TextureKind::Specular,
        ]);
        assert_eq!(
            names,
            vec![
                "material.texture_diffuse1",
                "material.texture_diffuse2",
                "material.texture_specular1",
            ]
        );
    }

    #[test]
    fn test_uniform_names_interleaved_kinds() {
        let names = material_uniform_names([
            TextureKind::Specular,
            TextureKind::Diffuse,
            TextureKind::Height,
            TextureKind::Diffuse,
            TextureKind::Normal,
            TextureKind::Specular,
        ]);
        assert_eq!(
            names,
            vec![
                "material.texture_specular1",
                "material.texture_diffuse1",
                "material.texture_height1",
                "material.texture_diffuse2",
                "material.texture_normal1",
                "material.texture_specular2",
            ]
        );
    }

    #[test]
    fn test_uniform_names_empty_and_deterministic() {
        assert!(material_uniform_names([]).is_empty());

        let kinds = [
            TextureKind::Diffuse,
            TextureKind::Normal,
            TextureKind::Diffuse,
        ];
        assert_eq!(material_uniform_names(kinds), material_uniform_names(kinds));
    }

    #[test]
    fn test_one_name_per_texture_unit() {
        // The draw loop assigns unit i to the ith list entry; the name list
        // must line up one to one with that assignment.
        let kinds = vec![TextureKind::Diffuse; 5];
        let names = material_uniform_names(kinds.clone());
        assert_eq!(names.len(), kinds.len());
        for (i, name) in names.iter().enumerate() {
            assert_eq!(name, &format!("material.texture_diffuse{}", i + 1));
        }
    }

    #[test]
    fn test_cube_geometry_is_well_formed() {
        let (vertices, indices) = cube_geometry();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        assert_eq!(indices.len() % 3, 0);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));

        for vertex in &vertices {
            assert!((vertex.normal.length() - 1.0).abs() < 1e-5);
            assert!((vertex.tangent.length() - 1.0).abs() < 1e-5);
            assert!(vertex.normal.dot(vertex.tangent).abs() < 1e-5);
            let expected_bitangent = vertex.normal.cross(vertex.tangent);
            assert!((vertex.bitangent - expected_bitangent).length() < 1e-5);
        }
    }
}

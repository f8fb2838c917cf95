//! OBJ import: the CPU half of model loading.
//!
//! Parsing, vertex assembly and tangent generation happen here without
//! touching the GPU, so the whole stage is testable headless. The output is
//! per-mesh geometry plus texture references resolved to file paths; upload
//! and texture de-duplication happen in [`crate::resources::model`].

use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};

use crate::error::{RenderError, RenderResult};
use crate::resources::texture::TextureKind;
use crate::resources::vertex::Vertex;

/// One mesh worth of import output.
#[derive(Debug)]
pub struct MeshSource {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Texture files the mesh's material references, in bind order.
    pub textures: Vec<(TextureKind, PathBuf)>,
}

/// Parse an OBJ file (triangulated, single-index) into mesh sources.
///
/// A missing or broken MTL file downgrades to a warning; the geometry still
/// loads, just untextured. Texture paths resolve relative to the OBJ's
/// directory.
pub fn load_meshes<P: AsRef<Path>>(path: P) -> RenderResult<Vec<MeshSource>> {
    let path = path.as_ref();

    let (models, materials) =
        tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS).map_err(|e| RenderError::ObjLoad {
            path: path.to_path_buf(),
            source: e,
        })?;

    let materials = materials.unwrap_or_else(|e| {
        log::warn!("No usable material library for '{}': {}", path.display(), e);
        Vec::new()
    });

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let sources: Vec<MeshSource> = models
        .into_iter()
        .map(|model| mesh_source_from_obj(model, &materials, base_dir))
        .collect();

    log::info!(
        "Imported OBJ '{}': {} meshes, {} materials",
        path.display(),
        sources.len(),
        materials.len()
    );

    Ok(sources)
}

fn mesh_source_from_obj(
    model: tobj::Model,
    materials: &[tobj::Material],
    base_dir: &Path,
) -> MeshSource {
    let mesh = model.mesh;

    let mut vertices = assemble_vertices(&mesh.positions, &mesh.normals, &mesh.texcoords);
    let indices = mesh.indices;

    if mesh.normals.is_empty() {
        generate_normals(&mut vertices, &indices);
    }
    generate_tangents(&mut vertices, &indices);

    let textures = mesh
        .material_id
        .and_then(|id| materials.get(id))
        .map(|material| material_textures(material, base_dir))
        .unwrap_or_default();

    MeshSource {
        name: model.name,
        vertices,
        indices,
        textures,
    }
}

/// Interleave tobj's flat attribute arrays into vertex records.
///
/// Normals and texcoords may be absent; missing ones are zeroed (normals get
/// regenerated from faces afterwards).
fn assemble_vertices(positions: &[f32], normals: &[f32], texcoords: &[f32]) -> Vec<Vertex> {
    let count = positions.len() / 3;
    let mut vertices = Vec::with_capacity(count);

    for i in 0..count {
        let position = Vec3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]);
        let normal = if normals.len() >= (i + 1) * 3 {
            Vec3::new(normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2])
        } else {
            Vec3::ZERO
        };
        let uv = if texcoords.len() >= (i + 1) * 2 {
            Vec2::new(texcoords[i * 2], texcoords[i * 2 + 1])
        } else {
            Vec2::ZERO
        };

        vertices.push(Vertex::new(position, normal, uv));
    }

    vertices
}

/// Rebuild per-vertex normals from face geometry, area-weighted.
fn generate_normals(vertices: &mut [Vertex], indices: &[u32]) {
    for vertex in vertices.iter_mut() {
        vertex.normal = Vec3::ZERO;
    }

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let e1 = vertices[b].position - vertices[a].position;
        let e2 = vertices[c].position - vertices[a].position;
        // Cross product length is twice the triangle area, so summing the
        // unnormalized normals weights by area.
        let face_normal = e1.cross(e2);

        vertices[a].normal += face_normal;
        vertices[b].normal += face_normal;
        vertices[c].normal += face_normal;
    }

    for vertex in vertices.iter_mut() {
        vertex.normal = vertex.normal.try_normalize().unwrap_or(Vec3::Y);
    }
}

/// Accumulate per-triangle tangents/bitangents from position and UV deltas,
/// then orthonormalize against the vertex normal, keeping the accumulated
/// handedness.
fn generate_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);

        let e1 = vertices[b].position - vertices[a].position;
        let e2 = vertices[c].position - vertices[a].position;
        let duv1 = vertices[b].uv - vertices[a].uv;
        let duv2 = vertices[c].uv - vertices[a].uv;

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < 1e-8 {
            // Degenerate UVs carry no tangent direction.
            continue;
        }
        let r = 1.0 / det;

        let tangent = (e1 * duv2.y - e2 * duv1.y) * r;
        let bitangent = (e2 * duv1.x - e1 * duv2.x) * r;

        for &i in &[a, b, c] {
            vertices[i].tangent += tangent;
            vertices[i].bitangent += bitangent;
        }
    }

    for vertex in vertices.iter_mut() {
        let n = vertex.normal;
        let projected = vertex.tangent - n * n.dot(vertex.tangent);
        vertex.tangent = projected.try_normalize().unwrap_or_else(|| {
            if n.abs().y > 0.9 {
                Vec3::X
            } else {
                Vec3::Y.cross(n).try_normalize().unwrap_or(Vec3::X)
            }
        });

        let b = n.cross(vertex.tangent);
        vertex.bitangent = if b.dot(vertex.bitangent) < 0.0 { -b } else { b };
    }
}

/// Map MTL entries onto texture kinds, in a fixed order.
///
/// `map_Kd` is diffuse, `map_Ks` specular, `map_Bump`/`bump` the normal map.
/// MTL has no first-class displacement key tobj models as a field, so `disp`
/// comes from the unparsed parameter list.
fn material_textures(material: &tobj::Material, base_dir: &Path) -> Vec<(TextureKind, PathBuf)> {
    let mut textures = Vec::new();

    let mut push = |kind: TextureKind, file: Option<&String>| {
        if let Some(file) = file {
            if !file.is_empty() {
                textures.push((kind, base_dir.join(file)));
            }
        }
    };

    push(TextureKind::Diffuse, material.diffuse_texture.as_ref());
    push(TextureKind::Specular, material.specular_texture.as_ref());
    push(TextureKind::Normal, material.normal_texture.as_ref());

    let disp = material
        .unknown_param
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("disp"))
        .map(|(_, value)| value);
    push(TextureKind::Height, disp);

    textures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_interleaves_flat_arrays() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let normals = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
        let texcoords = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0];

        let vertices = assemble_vertices(&positions, &normals, &texcoords);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(vertices[1].normal, Vec3::Z);
        assert_eq!(vertices[2].uv, Vec2::new(0.0, 1.0));
        // Bone slots come in unused.
        assert_eq!(vertices[0].bone_ids, [-1, -1, -1, -1]);
        assert_eq!(vertices[0].bone_weights, [0.0; 4]);
    }

    #[test]
    fn test_assemble_tolerates_missing_attributes() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let vertices = assemble_vertices(&positions, &[], &[]);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[0].normal, Vec3::ZERO);
        assert_eq!(vertices[0].uv, Vec2::ZERO);
    }

    #[test]
    fn test_generated_normals_face_out_of_ccw_triangle() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let mut vertices = assemble_vertices(&positions, &[], &[]);
        let indices = [0, 1, 2];

        generate_normals(&mut vertices, &indices);
        for vertex in &vertices {
            assert!((vertex.normal - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_tangents_follow_uv_axes_on_quad() {
        // Unit quad in the XY plane with UVs aligned to X/Y: the tangent must
        // come out along +X and the bitangent along +Y.
        let positions = [
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0,
        ];
        let normals = [0.0, 0.0, 1.0].repeat(4);
        let texcoords = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        let indices = [0, 1, 2, 0, 2, 3];

        let mut vertices = assemble_vertices(&positions, &normals, &texcoords);
        generate_tangents(&mut vertices, &indices);

        for vertex in &vertices {
            assert!((vertex.tangent - Vec3::X).length() < 1e-5);
            assert!((vertex.bitangent - Vec3::Y).length() < 1e-5);
        }
    }

    #[test]
    fn test_tangents_stay_orthonormal_without_uvs() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let normals = [0.0, 0.0, 1.0].repeat(3);
        let mut vertices = assemble_vertices(&positions, &normals, &[]);
        let indices = [0, 1, 2];

        generate_tangents(&mut vertices, &indices);
        for vertex in &vertices {
            assert!((vertex.tangent.length() - 1.0).abs() < 1e-5);
            assert!(vertex.normal.dot(vertex.tangent).abs() < 1e-5);
            assert!((vertex.bitangent.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_material_texture_mapping_and_path_resolution() {
        let mut material = tobj::Material::default();
        material.diffuse_texture = Some("albedo.png".to_string());
        material.specular_texture = Some("spec.png".to_string());
        material.normal_texture = Some("bump.png".to_string());
        material
            .unknown_param
            .insert("disp".to_string(), "disp.png".to_string());

        let textures = material_textures(&material, Path::new("assets/models"));
        assert_eq!(
            textures,
            vec![
                (TextureKind::Diffuse, PathBuf::from("assets/models/albedo.png")),
                (TextureKind::Specular, PathBuf::from("assets/models/spec.png")),
                (TextureKind::Normal, PathBuf::from("assets/models/bump.png")),
                (TextureKind::Height, PathBuf::from("assets/models/disp.png")),
            ]
        );
    }

    #[test]
    fn test_material_without_textures_maps_to_nothing() {
        let material = tobj::Material::default();
        assert!(material_textures(&material, Path::new(".")).is_empty());
    }
}

//! Vertex definition and attribute layout.
//!
//! All meshes share a single interleaved vertex format. The attribute table
//! below is the one source of truth for how that format maps to shader input
//! locations: buffer setup walks it when declaring attribute pointers, and any
//! shader used for drawing must declare its inputs at the same locations. The
//! offsets are derived from the struct itself, so the table can never drift
//! from the actual memory layout.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Maximum number of bones that can influence a single vertex.
pub const MAX_BONE_INFLUENCE: usize = 4;

/// Bone id stored in slots no bone influences.
pub const UNUSED_BONE_ID: i32 = -1;

/// One interleaved vertex: 18 floats and 4 ints, 88 bytes, no padding.
///
/// The bone id/weight arrays are parallel and fixed-length; unused slots hold
/// id `-1` and weight `0.0`. Static meshes carry the slots anyway so skinned
/// and unskinned geometry share one buffer layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub bone_ids: [i32; MAX_BONE_INFLUENCE],
    pub bone_weights: [f32; MAX_BONE_INFLUENCE],
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            uv: Vec2::ZERO,
            tangent: Vec3::ZERO,
            bitangent: Vec3::ZERO,
            bone_ids: [UNUSED_BONE_ID; MAX_BONE_INFLUENCE],
            bone_weights: [0.0; MAX_BONE_INFLUENCE],
        }
    }
}

impl Vertex {
    /// Create a vertex from the geometric attributes; tangent space is zeroed
    /// (filled in later by tangent generation) and every bone slot is unused.
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
            ..Default::default()
        }
    }
}

/// Component type of a vertex attribute.
///
/// Distinguishes the two pointer declarations GL needs: float attributes and
/// integer attributes (the bone ids, which must not be converted to float).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Float,
    Int,
}

/// A single entry of the vertex attribute table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location this attribute is bound to.
    pub location: u32,
    /// Number of components (1-4).
    pub components: i32,
    /// Component type.
    pub kind: AttributeKind,
    /// Byte offset within [`Vertex`].
    pub offset: i32,
}

/// Stride between consecutive vertices in the buffer.
pub const VERTEX_STRIDE: i32 = std::mem::size_of::<Vertex>() as i32;

/// The full attribute table, in location order.
///
/// Locations 0-6: position, normal, uv, tangent, bitangent, bone ids (integer
/// attribute), bone weights.
pub const VERTEX_ATTRIBUTES: [VertexAttribute; 7] = [
    VertexAttribute {
        location: 0,
        components: 3,
        kind: AttributeKind::Float,
        offset: std::mem::offset_of!(Vertex, position) as i32,
    },
    VertexAttribute {
        location: 1,
        components: 3,
        kind: AttributeKind::Float,
        offset: std::mem::offset_of!(Vertex, normal) as i32,
    },
    VertexAttribute {
        location: 2,
        components: 2,
        kind: AttributeKind::Float,
        offset: std::mem::offset_of!(Vertex, uv) as i32,
    },
    VertexAttribute {
        location: 3,
        components: 3,
        kind: AttributeKind::Float,
        offset: std::mem::offset_of!(Vertex, tangent) as i32,
    },
    VertexAttribute {
        location: 4,
        components: 3,
        kind: AttributeKind::Float,
        offset: std::mem::offset_of!(Vertex, bitangent) as i32,
    },
    VertexAttribute {
        location: 5,
        components: 4,
        kind: AttributeKind::Int,
        offset: std::mem::offset_of!(Vertex, bone_ids) as i32,
    },
    VertexAttribute {
        location: 6,
        components: 4,
        kind: AttributeKind::Float,
        offset: std::mem::offset_of!(Vertex, bone_weights) as i32,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_size_and_offsets() {
        // 18 floats + 4 ints, tightly packed.
        assert_eq!(std::mem::size_of::<Vertex>(), 88);
        assert_eq!(VERTEX_STRIDE, 88);

        let offsets: Vec<i32> = VERTEX_ATTRIBUTES.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24, 32, 44, 56, 72]);
    }

    #[test]
    fn test_attribute_table_covers_locations_in_order() {
        for (i, attr) in VERTEX_ATTRIBUTES.iter().enumerate() {
            assert_eq!(attr.location, i as u32);
        }

        // Attributes tile the struct exactly: each one ends where the next
        // begins, and the last one ends at the stride.
        for pair in VERTEX_ATTRIBUTES.windows(2) {
            let end = pair[0].offset + pair[0].components * 4;
            assert_eq!(end, pair[1].offset);
        }
        let last = VERTEX_ATTRIBUTES.last().unwrap();
        assert_eq!(last.offset + last.components * 4, VERTEX_STRIDE);
    }

    #[test]
    fn test_only_bone_ids_are_integer_typed() {
        for attr in &VERTEX_ATTRIBUTES {
            if attr.location == 5 {
                assert_eq!(attr.kind, AttributeKind::Int);
            } else {
                assert_eq!(attr.kind, AttributeKind::Float);
            }
        }
    }

    #[test]
    fn test_attribute_offsets_round_trip_through_bytes() {
        let vertex = Vertex {
            position: Vec3::new(1.0, 2.0, 3.0),
            normal: Vec3::new(0.0, 1.0, 0.0),
            uv: Vec2::new(0.25, 0.75),
            tangent: Vec3::new(1.0, 0.0, 0.0),
            bitangent: Vec3::new(0.0, 0.0, 1.0),
            bone_ids: [7, 3, -1, -1],
            bone_weights: [0.6, 0.4, 0.0, 0.0],
        };
        let bytes = bytemuck::bytes_of(&vertex);

        let read_f32s = |offset: i32, count: i32| -> Vec<f32> {
            (0..count)
                .map(|i| {
                    let at = (offset + i * 4) as usize;
                    bytemuck::pod_read_unaligned::<f32>(&bytes[at..at + 4])
                })
                .collect()
        };

        let a = &VERTEX_ATTRIBUTES[0];
        assert_eq!(read_f32s(a.offset, a.components), vec![1.0, 2.0, 3.0]);
        let a = &VERTEX_ATTRIBUTES[2];
        assert_eq!(read_f32s(a.offset, a.components), vec![0.25, 0.75]);
        let a = &VERTEX_ATTRIBUTES[4];
        assert_eq!(read_f32s(a.offset, a.components), vec![0.0, 0.0, 1.0]);
        let a = &VERTEX_ATTRIBUTES[6];
        assert_eq!(read_f32s(a.offset, a.components), vec![0.6, 0.4, 0.0, 0.0]);

        let a = &VERTEX_ATTRIBUTES[5];
        let ids: Vec<i32> = (0..a.components)
            .map(|i| {
                let at = (a.offset + i * 4) as usize;
                bytemuck::pod_read_unaligned::<i32>(&bytes[at..at + 4])
            })
            .collect();
        assert_eq!(ids, vec![7, 3, -1, -1]);
    }

    #[test]
    fn test_default_vertex_has_unused_bone_slots() {
        let vertex = Vertex::new(Vec3::ONE, Vec3::Y, Vec2::ZERO);
        assert_eq!(vertex.bone_ids, [UNUSED_BONE_ID; MAX_BONE_INFLUENCE]);
        assert_eq!(vertex.bone_weights, [0.0; MAX_BONE_INFLUENCE]);
        assert_eq!(vertex.tangent, Vec3::ZERO);
    }
}

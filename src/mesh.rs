//! Render buffers for fragments
//!
//! Converts fragment surfaces into engine-agnostic vertex data.

use glam::DVec3;

use crate::geometry::face_normal;

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - Godot: Convert to `ArrayMesh`
/// - wgpu: Use directly as vertex buffers
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions (3D coordinates)
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals (face normal of the owning triangle)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Empty buffers sized for `vertices` vertices
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(vertices),
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append a triangle with its own three vertices, all carrying the face normal
    pub fn push_flat_triangle(&mut self, corners: [DVec3; 3]) {
        let base_idx = self.positions.len() as u32;
        let normal = face_normal(corners[0], corners[1], corners[2]).normalize_or_zero();
        let normal = normal.as_vec3().to_array();

        for corner in corners {
            self.positions.push(corner.as_vec3().to_array());
            self.normals.push(normal);
        }
        self.indices.extend_from_slice(&[base_idx, base_idx + 1, base_idx + 2]);
    }
}

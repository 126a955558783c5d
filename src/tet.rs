//! Tetrahedral mesh input
//!
//! The tetrahedral mesh is produced by an external tetrahedralization step;
//! this module only validates it and derives what the partitioning pass needs
//! from it: the edge graph and the exterior faces.

use glam::DVec3;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{FractureError, Result};
use crate::geometry::{signed_tetrahedron_volume, tetrahedron_volume};
use crate::graph::{VertexId, WeightedGraph};

/// Four vertex ids of one tetrahedron
pub type Tetrahedron = [VertexId; 4];

/// Corner pairs of the six tetrahedron edges
pub const TET_EDGES: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];

/// Corner triples of the four tetrahedron faces; face `i` omits corner `3 - i`
pub const TET_FACES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];

/// Vertex positions plus tetrahedra indexing into them
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct TetMesh {
    vertices: Vec<DVec3>,
    tetrahedra: Vec<Tetrahedron>,
}

impl TetMesh {
    /// Create a mesh, checking that every tetrahedron indexes valid, distinct vertices
    ///
    /// # Errors
    ///
    /// Returns `VertexOutOfRange` for an index past the vertex list and
    /// `InvalidMesh` for a tetrahedron that repeats a vertex.
    pub fn new(vertices: Vec<DVec3>, tetrahedra: Vec<Tetrahedron>) -> Result<Self> {
        let count = vertices.len();
        if count > VertexId::MAX as usize {
            return Err(FractureError::InvalidMesh(format!(
                "too many vertices ({})",
                count
            )));
        }

        for (index, tet) in tetrahedra.iter().enumerate() {
            if let Some(&vertex) = tet.iter().find(|&&v| v as usize >= count) {
                return Err(FractureError::VertexOutOfRange { vertex, count });
            }
            for &(a, b) in TET_EDGES.iter() {
                if tet[a] == tet[b] {
                    return Err(FractureError::InvalidMesh(format!(
                        "tetrahedron {} repeats vertex {}",
                        index, tet[a]
                    )));
                }
            }
        }

        Ok(Self {
            vertices,
            tetrahedra,
        })
    }

    /// Build a block of `n × n × n` cubes, each cut into six tetrahedra
    ///
    /// Every cube uses the same diagonal from its minimum to its maximum
    /// corner, so neighboring cubes share faces exactly.
    pub fn grid(cells_per_axis: usize, spacing: f64) -> Self {
        let n = cells_per_axis;
        let side = n + 1;
        let index = |x: usize, y: usize, z: usize| (x + side * (y + side * z)) as VertexId;

        let mut vertices = Vec::with_capacity(side * side * side);
        for z in 0..side {
            for y in 0..side {
                for x in 0..side {
                    vertices.push(DVec3::new(x as f64, y as f64, z as f64) * spacing);
                }
            }
        }

        // Monotone lattice paths from corner 0 to corner 7 of the unit cube
        const PATHS: [[usize; 4]; 6] = [
            [0, 1, 3, 7],
            [0, 1, 5, 7],
            [0, 2, 3, 7],
            [0, 2, 6, 7],
            [0, 4, 5, 7],
            [0, 4, 6, 7],
        ];

        let mut tetrahedra = Vec::with_capacity(n * n * n * 6);
        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    let corner =
                        |bits: usize| index(x + (bits & 1), y + ((bits >> 1) & 1), z + ((bits >> 2) & 1));
                    for path in PATHS.iter() {
                        tetrahedra.push([
                            corner(path[0]),
                            corner(path[1]),
                            corner(path[2]),
                            corner(path[3]),
                        ]);
                    }
                }
            }
        }

        Self {
            vertices,
            tetrahedra,
        }
    }

    /// Vertex positions
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Tetrahedra
    #[inline]
    pub fn tetrahedra(&self) -> &[Tetrahedron] {
        &self.tetrahedra
    }

    /// Number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of tetrahedra
    #[inline]
    pub fn tetrahedron_count(&self) -> usize {
        self.tetrahedra.len()
    }

    /// Position of a vertex, if it exists
    #[inline]
    pub fn position(&self, id: VertexId) -> Option<DVec3> {
        self.vertices.get(id as usize).copied()
    }

    /// Corner positions of a tetrahedron
    pub fn corners(&self, tet: &Tetrahedron) -> [DVec3; 4] {
        tet.map(|v| self.vertices[v as usize])
    }

    /// Volume of a tetrahedron of this mesh
    pub fn tetrahedron_volume(&self, tet: &Tetrahedron) -> f64 {
        let [a, b, c, d] = self.corners(tet);
        tetrahedron_volume(a, b, c, d)
    }

    /// Total volume of all tetrahedra
    pub fn volume(&self) -> f64 {
        self.tetrahedra
            .iter()
            .map(|tet| self.tetrahedron_volume(tet))
            .sum()
    }

    /// Build the undirected edge graph of the mesh
    ///
    /// Every vertex is added (isolated ones included), and every tetrahedron
    /// edge becomes a link with weight 0 and the displacement between its
    /// endpoints.
    pub fn to_graph(&self) -> WeightedGraph {
        let mut graph = WeightedGraph::undirected();
        for id in 0..self.vertices.len() {
            graph.add_vertex(id as VertexId);
        }
        for tet in &self.tetrahedra {
            for &(a, b) in TET_EDGES.iter() {
                let (from, to) = (tet[a], tet[b]);
                let displacement = self.vertices[to as usize] - self.vertices[from as usize];
                graph.add_link(from, to, displacement, 0.0);
            }
        }
        graph
    }

    /// Faces that belong to exactly one tetrahedron, wound outward
    ///
    /// Returns `(tetrahedron index, face corners)` pairs in tetrahedron order.
    pub fn boundary_faces(&self) -> Vec<(usize, [VertexId; 3])> {
        let mut counts: HashMap<[VertexId; 3], usize> = HashMap::new();
        for tet in &self.tetrahedra {
            for face in TET_FACES.iter() {
                *counts.entry(sorted_face(face.map(|c| tet[c]))).or_insert(0) += 1;
            }
        }

        let mut faces = Vec::new();
        for (index, tet) in self.tetrahedra.iter().enumerate() {
            for (face_index, face) in TET_FACES.iter().enumerate() {
                let ids = face.map(|c| tet[c]);
                if counts[&sorted_face(ids)] != 1 {
                    continue;
                }
                let opposite = self.vertices[tet[3 - face_index] as usize];
                let [a, b, c] = ids.map(|v| self.vertices[v as usize]);
                // Outward means the opposite corner lies behind the face
                if signed_tetrahedron_volume(a, b, c, opposite) > 0.0 {
                    faces.push((index, [ids[0], ids[2], ids[1]]));
                } else {
                    faces.push((index, ids));
                }
            }
        }
        faces
    }
}

/// Vertex triple sorted ascending, used as an orientation-free face key
#[inline]
pub fn sorted_face(mut face: [VertexId; 3]) -> [VertexId; 3] {
    face.sort_unstable();
    face
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_tet() -> TetMesh {
        TetMesh::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
            vec![[0, 1, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        let result = TetMesh::new(vec![DVec3::ZERO; 3], vec![[0, 1, 2, 3]]);
        assert_eq!(
            result.unwrap_err(),
            FractureError::VertexOutOfRange { vertex: 3, count: 3 }
        );
    }

    #[test]
    fn test_new_rejects_repeated_vertex() {
        let result = TetMesh::new(vec![DVec3::ZERO; 4], vec![[0, 1, 1, 3]]);
        assert!(matches!(result, Err(FractureError::InvalidMesh(_))));
    }

    #[test]
    fn test_face_table_omits_one_corner_each() {
        for (i, face) in TET_FACES.iter().enumerate() {
            assert!(!face.contains(&(3 - i)));
        }
    }

    #[test]
    fn test_to_graph_links_every_edge() {
        let mesh = unit_tet();
        let graph = mesh.to_graph();
        assert_eq!(graph.size(), 4);
        assert_eq!(graph.link_count(), 12);
        let link = graph.get_link(0, 3).unwrap();
        assert_eq!(link.displacement, DVec3::Z);
        assert_eq!(link.weight, 0.0);
    }

    #[test]
    fn test_grid_volume_and_counts() {
        let mesh = TetMesh::grid(2, 0.5);
        assert_eq!(mesh.vertex_count(), 27);
        assert_eq!(mesh.tetrahedron_count(), 48);
        assert_relative_eq!(mesh.volume(), 1.0, epsilon = 1e-12);
        for tet in mesh.tetrahedra() {
            assert!(mesh.tetrahedron_volume(tet) > 0.0);
        }
    }

    #[test]
    fn test_boundary_faces_of_single_tet_point_outward() {
        let mesh = unit_tet();
        let faces = mesh.boundary_faces();
        assert_eq!(faces.len(), 4);

        let center = DVec3::splat(0.25);
        for (_, face) in faces {
            let [a, b, c] = face.map(|v| mesh.vertices()[v as usize]);
            let normal = (b - a).cross(c - a);
            assert!(normal.dot(center - a) < 0.0);
        }
    }

    #[test]
    fn test_grid_boundary_faces_cover_surface() {
        let mesh = TetMesh::grid(2, 1.0);
        // 6 sides, 4 unit squares each, 2 triangles per square
        assert_eq!(mesh.boundary_faces().len(), 48);
    }
}

//! Fragment surface assembly
//!
//! A fragment is the union of the tetrahedra (and sub-tetrahedra) of one
//! region. Its surface is built by emitting every face of every piece with
//! outward winding and cancelling faces emitted twice: a face shared by two
//! pieces of the same region is interior to the fragment.
//!
//! Winding comes from corner order rather than from the final positions.
//! A piece squashed by a split point near one of its corners keeps the
//! winding it has in the midpoint placement, so its faces still cancel
//! against its neighbors'.

use glam::DVec3;
use parry3d::math::Point;
use parry3d::transformation;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{centroid, is_degenerate_face, weld_key, weld_neighborhood, WELD_EPSILON};
use crate::mesh::MeshData;

/// Closed (or nearly closed) surface of one region
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentMesh {
    /// Unique vertex positions
    pub positions: Vec<DVec3>,
    /// Triangles indexing `positions`, counter-clockwise seen from outside
    pub triangles: Vec<[u32; 3]>,
}

impl FragmentMesh {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check if the fragment has no surface
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Enclosed volume, by the divergence theorem over the triangles
    ///
    /// Exact for closed, consistently wound surfaces.
    pub fn volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.map(|i| self.positions[i as usize]);
                a.dot(b.cross(c)) / 6.0
            })
            .sum()
    }

    /// Whether every edge is walked once in each direction by the triangles
    ///
    /// Holds for a closed, consistently wound surface.
    pub fn is_closed(&self) -> bool {
        let mut balance: HashMap<(u32, u32), i32> = HashMap::new();
        for &[a, b, c] in &self.triangles {
            for (from, to) in [(a, b), (b, c), (c, a)] {
                let (edge, step) = if from < to { ((from, to), 1) } else { ((to, from), -1) };
                *balance.entry(edge).or_default() += step;
            }
        }
        balance.values().all(|&n| n == 0)
    }

    /// Mean of the vertex positions
    pub fn center(&self) -> Option<DVec3> {
        (!self.positions.is_empty()).then(|| centroid(&self.positions))
    }

    /// Flat-shaded render buffers
    ///
    /// Every triangle gets its own three vertices so that each can carry the
    /// face normal.
    pub fn to_mesh_data(&self) -> MeshData {
        let mut mesh = MeshData::with_capacity(self.triangles.len() * 3);
        for triangle in &self.triangles {
            let corners = triangle.map(|i| self.positions[i as usize]);
            mesh.push_flat_triangle(corners);
        }
        mesh
    }

    /// Convex hull of the fragment for use as a collision shape
    ///
    /// Returns hull vertices and triangles in single precision, or `None` if
    /// the fragment has fewer than four vertices.
    pub fn collision_hull(&self) -> Option<(Vec<Point<f32>>, Vec<[u32; 3]>)> {
        if self.positions.len() < 4 {
            return None;
        }
        let points: Vec<Point<f32>> = self
            .positions
            .iter()
            .map(|p| Point::new(p.x as f32, p.y as f32, p.z as f32))
            .collect();
        let (vertices, triangles) = transformation::convex_hull(&points);
        (!triangles.is_empty()).then_some((vertices, triangles))
    }
}

/// Outward faces of a positively oriented tetrahedron, as corner indices
const OUTWARD_FACES: [[usize; 3]; 4] = [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];

/// Accumulates welded vertices and cancelling faces for one fragment
#[derive(Debug, Default)]
pub(crate) struct FragmentBuilder {
    positions: Vec<DVec3>,
    welded: HashMap<[i64; 3], Vec<u32>>,
    faces: Vec<Option<[u32; 3]>>,
    open: HashMap<[u32; 3], usize>,
}

impl FragmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit the four faces of a tetrahedron
    ///
    /// Corners must be in positive order, i.e. `signed_tetrahedron_volume`
    /// of the piece is positive when split points sit at their edge
    /// midpoints. Faces with (near) zero area are left out.
    pub fn add_tetrahedron(&mut self, corners: [DVec3; 4]) {
        let indices = corners.map(|p| self.weld(p));
        for [i, j, k] in OUTWARD_FACES {
            if is_degenerate_face(corners[i], corners[j], corners[k]) {
                continue;
            }
            self.emit([indices[i], indices[j], indices[k]]);
        }
    }

    /// Add a face, or cancel it if the same face is already open
    fn emit(&mut self, face: [u32; 3]) {
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return;
        }
        let mut key = face;
        key.sort_unstable();

        if let Some(slot) = self.open.remove(&key) {
            self.faces[slot] = None;
        } else {
            self.open.insert(key, self.faces.len());
            self.faces.push(Some(face));
        }
    }

    /// Index of the stored vertex within [`WELD_EPSILON`], adding one if none
    fn weld(&mut self, position: DVec3) -> u32 {
        let key = weld_key(position);
        let existing = weld_neighborhood(key)
            .filter_map(|cell| self.welded.get(&cell))
            .flatten()
            .copied()
            .find(|&i| self.positions[i as usize].distance(position) <= WELD_EPSILON);
        if let Some(index) = existing {
            return index;
        }

        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.welded.entry(key).or_default().push(index);
        index
    }

    /// Drop cancelled faces and vertices no remaining face uses
    pub fn build(self) -> FragmentMesh {
        let faces: Vec<[u32; 3]> = self.faces.into_iter().flatten().collect();

        let mut remap = vec![u32::MAX; self.positions.len()];
        let mut positions = Vec::new();
        let mut triangles = Vec::with_capacity(faces.len());
        for face in faces {
            triangles.push(face.map(|i| {
                let slot = &mut remap[i as usize];
                if *slot == u32::MAX {
                    *slot = positions.len() as u32;
                    positions.push(self.positions[i as usize]);
                }
                *slot
            }));
        }

        FragmentMesh {
            positions,
            triangles,
        }
    }
}

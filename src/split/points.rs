//! Split points on cut edges
//!
//! A cut edge joins two corners owned by different regions. Each cut edge
//! gets exactly one split point, keyed by its sorted endpoint ids, so every
//! tetrahedron sharing the edge refers to the same new vertex.

use glam::DVec3;
use rayon::prelude::*;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::ExecutionStrategy;
use crate::distance::DistanceField;
use crate::geometry::{DEGENERATE_EPSILON, SPLIT_MARGIN};
use crate::graph::VertexId;
use crate::tet::TetMesh;

/// Which distance to a source positions a split point along its edge
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMetric {
    /// Straight-line distance from each corner to its own source
    #[default]
    Euclidean,
    /// Corrected geodesic distance from the distance field
    Corrected,
}

/// Blend weight of the split point on `p1 → p2`; the point lies `1 - weight` of the way from `p1`
///
/// `d1` and `d2` are the distances of each endpoint to its own source. The
/// split point sits where both sides would reach it at the same distance.
/// Degenerate edges split at the midpoint; otherwise the result is clamped to
/// `[SPLIT_MARGIN, 1 - SPLIT_MARGIN]` so the point stays strictly inside the
/// edge.
pub fn split_weight(p1: DVec3, p2: DVec3, d1: f64, d2: f64) -> f64 {
    let length = p1.distance(p2);
    if length < DEGENERATE_EPSILON {
        return 0.5;
    }
    let weight = ((d1 + d2 + length) / 2.0 - d2) / length;
    if weight.is_finite() {
        weight.clamp(SPLIT_MARGIN, 1.0 - SPLIT_MARGIN)
    } else {
        0.5
    }
}

/// Position of the split point on `p1 → p2`
#[inline]
pub fn split_position(p1: DVec3, p2: DVec3, d1: f64, d2: f64) -> DVec3 {
    p1 + (p2 - p1) * (1.0 - split_weight(p1, p2, d1, d2))
}

/// Split point ids and positions for every cut edge of a pass
#[derive(Debug, Clone, Default)]
pub(crate) struct SplitPointTable {
    base: VertexId,
    ids: HashMap<(VertexId, VertexId), VertexId>,
    positions: Vec<DVec3>,
    midpoints: Vec<DVec3>,
}

impl SplitPointTable {
    /// Allocate split points for `edges` in ascending edge order
    ///
    /// Every endpoint must have an entry in `field`.
    pub fn build(
        mesh: &TetMesh,
        field: &DistanceField,
        mut edges: Vec<(VertexId, VertexId)>,
        metric: SplitMetric,
        strategy: ExecutionStrategy,
    ) -> Self {
        for edge in edges.iter_mut() {
            *edge = canonical(edge.0, edge.1);
        }
        edges.sort_unstable();
        edges.dedup();

        let vertices = mesh.vertices();
        let distance_to_source = |v: VertexId| -> f64 {
            let Some(entry) = field.get(v) else {
                return 0.0;
            };
            match metric {
                SplitMetric::Corrected => entry.distance,
                SplitMetric::Euclidean => vertices
                    .get(entry.source as usize)
                    .map_or(0.0, |source| vertices[v as usize].distance(*source)),
            }
        };
        let place = |&(a, b): &(VertexId, VertexId)| {
            split_position(
                vertices[a as usize],
                vertices[b as usize],
                distance_to_source(a),
                distance_to_source(b),
            )
        };

        let positions: Vec<DVec3> = match strategy {
            ExecutionStrategy::Sequential => edges.iter().map(place).collect(),
            ExecutionStrategy::Parallel => edges.par_iter().map(place).collect(),
        };

        let midpoints = edges
            .iter()
            .map(|&(a, b)| vertices[a as usize].lerp(vertices[b as usize], 0.5))
            .collect();

        let base = mesh.vertex_count() as VertexId;
        let ids = edges
            .into_iter()
            .enumerate()
            .map(|(i, edge)| (edge, base + i as VertexId))
            .collect();

        Self {
            base,
            ids,
            positions,
            midpoints,
        }
    }

    /// Id of the split point on edge `a - b`
    ///
    /// Only valid for edges passed to [`SplitPointTable::build`].
    pub fn id(&self, a: VertexId, b: VertexId) -> VertexId {
        self.ids[&canonical(a, b)]
    }

    /// Position of the split point with id `id`
    pub fn position(&self, id: VertexId) -> DVec3 {
        self.positions[(id - self.base) as usize]
    }

    /// Midpoint of the edge the split point with id `id` lies on
    ///
    /// Pieces are oriented against this placement, where every
    /// decomposition is a proper triangulation of its tetrahedron.
    pub fn midpoint(&self, id: VertexId) -> DVec3 {
        self.midpoints[(id - self.base) as usize]
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn into_positions(self) -> Vec<DVec3> {
        self.positions
    }
}

#[inline]
fn canonical(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

//! Tetrahedron splitting along region boundaries
//!
//! Every vertex belongs to the region of its source in the distance field.
//! Tetrahedra whose corners span several regions are cut through split
//! points on their cut edges, and the pieces of each region are assembled
//! into one fragment surface.
//!
//! # Pipeline
//!
//! 1. Map each tetrahedron corner to a region (skipping tetrahedra with an
//!    unreached corner)
//! 2. Allocate one split point per cut edge, ids following the mesh vertices
//! 3. Subdivide each cut tetrahedron (read-only, parallel) and orient the
//!    pieces with split points at their edge midpoints
//! 4. Assemble each region's pieces into a fragment (one region per task)

mod fragment;
mod points;
mod tetra;

pub use fragment::FragmentMesh;
pub use points::{split_position, split_weight, SplitMetric};
pub use tetra::{classify, cut_edges, subdivide, SplitCase, SubTetrahedron};

use glam::DVec3;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::ExecutionStrategy;
use crate::distance::{seed_lookup, DistanceField};
use crate::error::{FractureError, Result};
use crate::geometry::{signed_tetrahedron_volume, tetrahedron_volume, DEGENERATE_EPSILON};
use crate::graph::VertexId;
use crate::tet::{Tetrahedron, TetMesh};
use fragment::FragmentBuilder;
use points::SplitPointTable;

/// Options for [`split_mesh_with_options`]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplitOptions {
    /// How per-tetrahedron and per-region work is scheduled
    pub strategy: ExecutionStrategy,
    /// Distance used to place split points
    pub metric: SplitMetric,
    /// Also emit single-region tetrahedra, so each fragment is a closed surface
    ///
    /// When off, only pieces of cut tetrahedra contribute faces.
    pub close_fragments: bool,
}

/// Output of a splitting pass
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitResult {
    /// One fragment per seed, in seed order
    pub fragments: Vec<FragmentMesh>,
    /// Positions of the split points; point `i` has vertex id `vertex_count + i`
    pub split_points: Vec<DVec3>,
    /// Pieces of every cut tetrahedron, in tetrahedron order
    ///
    /// Corners are ordered for positive volume with every split point at its
    /// edge midpoint. Pieces of a flat tetrahedron are dropped.
    pub sub_tetrahedra: Vec<SubTetrahedron>,
    /// Tetrahedra left out because a corner has no usable region
    pub skipped_tetrahedra: usize,
}

impl SplitResult {
    /// Position of a mesh vertex or split point
    pub fn position(&self, mesh: &TetMesh, id: VertexId) -> Option<DVec3> {
        let count = mesh.vertex_count();
        if (id as usize) < count {
            mesh.position(id)
        } else {
            self.split_points.get(id as usize - count).copied()
        }
    }

    /// Volume of a sub-tetrahedron
    pub fn sub_tetrahedron_volume(&self, mesh: &TetMesh, sub: &SubTetrahedron) -> f64 {
        let corners = sub.corners.map(|id| self.position(mesh, id).unwrap_or_default());
        tetrahedron_volume(corners[0], corners[1], corners[2], corners[3])
    }

    /// Total number of fragment triangles
    pub fn triangle_count(&self) -> usize {
        self.fragments.iter().map(FragmentMesh::triangle_count).sum()
    }
}

/// Split `mesh` along the regions of `field` with default options
///
/// Region `i` is the set of vertices whose source is `seeds[i]`.
///
/// # Example
///
/// ```rust
/// use voronoi_fracture::*;
///
/// let mesh = TetMesh::grid(2, 1.0);
/// let seeds = [0, 26];
/// let field = compute_distances(&mesh.to_graph(), &seeds, 3);
///
/// let result = split_mesh(&mesh, &field, &seeds).unwrap();
/// assert_eq!(result.fragments.len(), 2);
/// assert!(!result.split_points.is_empty());
/// ```
pub fn split_mesh(mesh: &TetMesh, field: &DistanceField, seeds: &[VertexId]) -> Result<SplitResult> {
    split_mesh_with_options(mesh, field, seeds, SplitOptions::default())
}

/// Split `mesh` along the regions of `field`
///
/// # Errors
///
/// `EmptySeedSet` without seeds, `DuplicateSeed` for a repeated seed.
pub fn split_mesh_with_options(
    mesh: &TetMesh,
    field: &DistanceField,
    seeds: &[VertexId],
    options: SplitOptions,
) -> Result<SplitResult> {
    if seeds.is_empty() {
        return Err(FractureError::EmptySeedSet);
    }
    let mut unique = HashSet::with_capacity(seeds.len());
    if let Some(&seed) = seeds.iter().find(|&&s| !unique.insert(s)) {
        return Err(FractureError::DuplicateSeed(seed));
    }

    let start = Instant::now();
    let tetrahedra = mesh.tetrahedra();
    let lookup = seed_lookup(seeds);
    let corner_regions = |tet: &Tetrahedron| -> Option<[usize; 4]> {
        let mut regions = [0; 4];
        for (slot, &vertex) in regions.iter_mut().zip(tet.iter()) {
            *slot = field.source(vertex).and_then(&lookup)?;
        }
        Some(regions)
    };

    let regions: Vec<Option<[usize; 4]>> = match options.strategy {
        ExecutionStrategy::Sequential => tetrahedra.iter().map(corner_regions).collect(),
        ExecutionStrategy::Parallel => tetrahedra.par_iter().map(corner_regions).collect(),
    };

    let mut skipped = 0;
    let mut cut = Vec::new();
    for (index, (tet, tet_regions)) in tetrahedra.iter().zip(&regions).enumerate() {
        match tet_regions {
            Some(r) => cut.extend(cut_edges(tet, r)),
            None => {
                debug!("Skipping tetrahedron {} {:?}: corner without region", index, tet);
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        warn!(
            "Skipped {} of {} tetrahedra with unreached or unseeded corners",
            skipped,
            tetrahedra.len()
        );
    }

    let table = SplitPointTable::build(mesh, field, cut, options.metric, options.strategy);
    debug!("Allocated {} split points", table.len());

    let vertex_count = mesh.vertex_count();
    let midpoint_position = |id: VertexId| {
        if (id as usize) < vertex_count {
            mesh.vertices()[id as usize]
        } else {
            table.midpoint(id)
        }
    };
    let cut_one = |(tet, tet_regions): (&Tetrahedron, &Option<[usize; 4]>)| match tet_regions {
        Some(r) => subdivide(tet, r, |a, b| table.id(a, b))
            .into_iter()
            .filter_map(|mut piece| {
                piece.corners = orient(piece.corners, midpoint_position)?;
                Some(piece)
            })
            .collect(),
        None => Vec::new(),
    };
    let pieces: Vec<Vec<SubTetrahedron>> = match options.strategy {
        ExecutionStrategy::Sequential => tetrahedra.iter().zip(&regions).map(cut_one).collect(),
        ExecutionStrategy::Parallel => tetrahedra
            .par_iter()
            .zip(regions.par_iter())
            .map(cut_one)
            .collect(),
    };

    let position = |id: VertexId| {
        if (id as usize) < vertex_count {
            mesh.vertices()[id as usize]
        } else {
            table.position(id)
        }
    };

    let mut buckets: Vec<Vec<[DVec3; 4]>> = vec![Vec::new(); seeds.len()];
    for ((tet, tet_regions), tet_pieces) in tetrahedra.iter().zip(&regions).zip(&pieces) {
        match tet_regions {
            Some(r) if options.close_fragments && classify(r) == SplitCase::Whole => {
                if let Some(corners) = orient(*tet, midpoint_position) {
                    buckets[r[0]].push(corners.map(position));
                }
            }
            _ => {
                for piece in tet_pieces {
                    buckets[piece.region].push(piece.corners.map(position));
                }
            }
        }
    }

    let assemble = |pieces: Vec<[DVec3; 4]>| {
        let mut builder = FragmentBuilder::new();
        for corners in pieces {
            builder.add_tetrahedron(corners);
        }
        builder.build()
    };
    let fragments: Vec<FragmentMesh> = match options.strategy {
        ExecutionStrategy::Sequential => buckets.into_iter().map(assemble).collect(),
        ExecutionStrategy::Parallel => buckets.into_par_iter().map(assemble).collect(),
    };

    let result = SplitResult {
        fragments,
        split_points: table.into_positions(),
        sub_tetrahedra: pieces.into_iter().flatten().collect(),
        skipped_tetrahedra: skipped,
    };

    info!(
        "Split {} tetrahedra into {} fragments: {} pieces, {} split points, {} triangles, {:?}",
        tetrahedra.len(),
        seeds.len(),
        result.sub_tetrahedra.len(),
        result.split_points.len(),
        result.triangle_count(),
        start.elapsed()
    );
    Ok(result)
}

/// Reorder `corners` so the tetrahedron has positive volume at `position`
///
/// `None` for a tetrahedron that is flat there.
fn orient(corners: [VertexId; 4], position: impl Fn(VertexId) -> DVec3) -> Option<[VertexId; 4]> {
    let [a, b, c, d] = corners;
    let volume = signed_tetrahedron_volume(position(a), position(b), position(c), position(d));
    if volume.abs() <= DEGENERATE_EPSILON {
        None
    } else if volume > 0.0 {
        Some(corners)
    } else {
        Some([a, c, b, d])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{compute_distances_with_options, DistanceEntry, DistanceOptions};
    use approx::assert_relative_eq;

    const STRATEGIES: [ExecutionStrategy; 2] =
        [ExecutionStrategy::Sequential, ExecutionStrategy::Parallel];

    fn entry(source: VertexId, distance: f64) -> Option<DistanceEntry> {
        Some(DistanceEntry { distance, source })
    }

    /// One tetrahedron (vertices 0-3) with corners 0, 1 near source 4 and
    /// corners 2, 3 near source 5, mirrored across the plane x = 0
    fn two_two_setup() -> (TetMesh, DistanceField) {
        let mesh = TetMesh::new(
            vec![
                DVec3::new(-1.0, 0.0, 1.0),
                DVec3::new(-1.0, 0.0, -1.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(1.0, -1.0, 0.0),
                DVec3::new(-10.0, 0.0, 0.0),
                DVec3::new(10.0, 0.0, 0.0),
            ],
            vec![[0, 1, 2, 3]],
        )
        .unwrap();
        let field = DistanceField::from_entries(vec![
            entry(4, 9.0),
            entry(4, 9.0),
            entry(5, 9.0),
            entry(5, 9.0),
            entry(4, 0.0),
            entry(5, 0.0),
        ]);
        (mesh, field)
    }

    fn options(strategy: ExecutionStrategy, close_fragments: bool) -> SplitOptions {
        SplitOptions {
            strategy,
            close_fragments,
            ..Default::default()
        }
    }

    fn sorted_keys(fragment: &FragmentMesh) -> Vec<[u32; 3]> {
        let mut keys: Vec<[u32; 3]> = fragment
            .triangles
            .iter()
            .map(|t| {
                let mut k = *t;
                k.sort_unstable();
                k
            })
            .collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn test_two_pair_tetrahedron() {
        let (mesh, field) = two_two_setup();
        for metric in [SplitMetric::Euclidean, SplitMetric::Corrected] {
            for strategy in STRATEGIES {
                let result = split_mesh_with_options(
                    &mesh,
                    &field,
                    &[4, 5],
                    SplitOptions {
                        strategy,
                        metric,
                        close_fragments: false,
                    },
                )
                .unwrap();

                assert_eq!(result.sub_tetrahedra.len(), 6);
                let in_region = |r| result.sub_tetrahedra.iter().filter(|s| s.region == r).count();
                assert_eq!((in_region(0), in_region(1)), (3, 3));

                // Each split point lies strictly inside its edge (x = ±1 at the ends)
                assert_eq!(result.split_points.len(), 4);
                for p in &result.split_points {
                    assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
                }

                let total: f64 = result
                    .sub_tetrahedra
                    .iter()
                    .map(|s| result.sub_tetrahedron_volume(&mesh, s))
                    .sum();
                assert_relative_eq!(total, mesh.volume(), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_single_source_tetrahedron_emits_nothing() {
        let mesh = TetMesh::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
            vec![[0, 1, 2, 3]],
        )
        .unwrap();
        let field = DistanceField::from_entries(vec![
            entry(0, 0.0),
            entry(0, 1.0),
            entry(0, 1.0),
            entry(0, 1.0),
        ]);

        let result = split_mesh(&mesh, &field, &[0]).unwrap();
        assert!(result.sub_tetrahedra.is_empty());
        assert!(result.split_points.is_empty());
        assert_eq!(result.triangle_count(), 0);
        assert_eq!(result.skipped_tetrahedra, 0);

        // Closing fragments emits the tetrahedron whole
        let closed =
            split_mesh_with_options(&mesh, &field, &[0], options(ExecutionStrategy::Parallel, true))
                .unwrap();
        assert!(closed.sub_tetrahedra.is_empty());
        assert_eq!(closed.fragments[0].triangle_count(), 4);
        assert_relative_eq!(closed.fragments[0].volume(), 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unreached_corner_is_skipped() {
        let mesh = TetMesh::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z, DVec3::ONE],
            vec![[0, 1, 2, 3], [1, 2, 3, 4]],
        )
        .unwrap();
        let field = DistanceField::from_entries(vec![
            entry(0, 0.0),
            entry(0, 1.0),
            entry(3, 1.0),
            entry(3, 0.0),
            None,
        ]);

        let result = split_mesh(&mesh, &field, &[0, 3]).unwrap();
        assert_eq!(result.skipped_tetrahedra, 1);
        assert_eq!(result.sub_tetrahedra.len(), 6);
        // Only the first tetrahedron's cut edges get split points
        assert_eq!(result.split_points.len(), 4);
    }

    #[test]
    fn test_source_outside_seed_set_is_skipped() {
        let (mesh, field) = two_two_setup();
        let result = split_mesh(&mesh, &field, &[4]).unwrap();
        assert_eq!(result.skipped_tetrahedra, 1);
        assert!(result.sub_tetrahedra.is_empty());
    }

    #[test]
    fn test_invalid_seeds() {
        let (mesh, field) = two_two_setup();
        assert_eq!(split_mesh(&mesh, &field, &[]), Err(FractureError::EmptySeedSet));
        assert_eq!(
            split_mesh(&mesh, &field, &[4, 5, 4]),
            Err(FractureError::DuplicateSeed(4))
        );
    }

    #[test]
    fn test_grid_split_preserves_volume() {
        let mesh = TetMesh::grid(3, 1.0);
        let graph = mesh.to_graph();
        let seeds = [0, 3, 12, 63];

        for path_window in [0, 3] {
            let field = compute_distances_with_options(
                &graph,
                &seeds,
                DistanceOptions {
                    path_window,
                    strategy: ExecutionStrategy::Sequential,
                },
            );

            let mut results = Vec::new();
            for strategy in STRATEGIES {
                let result =
                    split_mesh_with_options(&mesh, &field, &seeds, options(strategy, true)).unwrap();
                assert_eq!(result.skipped_tetrahedra, 0);
                assert_eq!(result.fragments.len(), 4);
                assert!(!result.sub_tetrahedra.is_empty());

                let total: f64 = result.fragments.iter().map(FragmentMesh::volume).sum();
                assert_relative_eq!(total, mesh.volume(), epsilon = 1e-9);

                for fragment in &result.fragments {
                    assert!(fragment.volume() > 0.0);
                    assert!(fragment.is_closed());
                    let keys = sorted_keys(fragment);
                    let mut unique = keys.clone();
                    unique.dedup();
                    assert_eq!(keys.len(), unique.len());
                }
                results.push(result);
            }
            assert_eq!(results[0], results[1]);
        }
    }

    #[test]
    fn test_split_points_never_land_on_corners() {
        // Graph regions that disagree with Euclidean nearness push the
        // weights past the ends of their edges
        let mesh = TetMesh::grid(3, 1.0);
        let field = compute_distances_with_options(
            &mesh.to_graph(),
            &[0, 3, 12, 63],
            DistanceOptions {
                path_window: 0,
                strategy: ExecutionStrategy::Sequential,
            },
        );
        let result = split_mesh_with_options(
            &mesh,
            &field,
            &[0, 3, 12, 63],
            options(ExecutionStrategy::Sequential, true),
        )
        .unwrap();

        for p in &result.split_points {
            assert!(mesh.vertices().iter().all(|v| v.distance(*p) > 1e-9));
        }
        for sub in &result.sub_tetrahedra {
            assert!(result.sub_tetrahedron_volume(&mesh, sub) > 0.0);
        }
    }

    #[test]
    fn test_cut_pieces_cover_cut_tetrahedra() {
        let mesh = TetMesh::grid(3, 1.0);
        let seeds = [0, 21, 42, 63];
        let field = compute_distances_with_options(
            &mesh.to_graph(),
            &seeds,
            DistanceOptions {
                path_window: 0,
                strategy: ExecutionStrategy::Parallel,
            },
        );
        let result = split_mesh(&mesh, &field, &seeds).unwrap();

        let lookup = seed_lookup(&seeds);
        let cut_volume: f64 = mesh
            .tetrahedra()
            .iter()
            .filter(|tet| {
                let regions = tet.map(|v| lookup(field.source(v).unwrap()).unwrap());
                classify(&regions) != SplitCase::Whole
            })
            .map(|tet| mesh.tetrahedron_volume(tet))
            .sum();
        let piece_volume: f64 = result
            .sub_tetrahedra
            .iter()
            .map(|s| result.sub_tetrahedron_volume(&mesh, s))
            .sum();

        assert!(cut_volume > 0.0);
        assert_relative_eq!(piece_volume, cut_volume, epsilon = 1e-9);
    }
}

//! Lloyd's Relaxation (centroidal Voronoi tessellation) over mesh vertices
//!
//! Lloyd's Relaxation iteratively improves seed placement by moving each seed
//! to the mesh vertex nearest the centroid of its cell. Cells are Euclidean
//! nearest-seed regions of the vertex cloud; seeds always stay on vertices.

use glam::DVec3;
use log::{debug, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::time::Instant;

use crate::config::ExecutionStrategy;
use crate::error::{FractureError, Result};
use crate::graph::VertexId;
use crate::spatial::SpatialIndex;

/// Vertices per accumulation shard when summing cell centroids
///
/// Shards are fixed-size and reduced in order, so the sums (and therefore
/// the chosen seeds) do not depend on how shards are scheduled.
const CENTROID_SHARD: usize = 1024;

/// Options for Lloyd's relaxation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LloydOptions {
    /// Maximum number of iterations to run
    ///
    /// Relaxation stops as soon as the seeds stop changing; the cap only
    /// matters for inputs that oscillate between configurations.
    pub max_iterations: usize,
    /// How per-vertex and per-region work is scheduled
    pub strategy: ExecutionStrategy,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 64,
            strategy: ExecutionStrategy::default(),
        }
    }
}

/// Outcome of a relaxation run
#[derive(Debug, Clone, PartialEq)]
pub struct Relaxation {
    /// Final seed vertices, one per region
    pub seeds: Vec<VertexId>,
    /// Region (index into `seeds`) of every vertex
    pub regions: Vec<usize>,
    /// Number of centroid/reseed iterations performed
    pub iterations: usize,
    /// Whether the seeds reached a fixed point before the cap
    pub converged: bool,
}

impl Relaxation {
    /// Number of vertices in each region
    pub fn region_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.seeds.len()];
        for &region in &self.regions {
            sizes[region] += 1;
        }
        sizes
    }
}

/// Relax vertex seeds with default options
///
/// # Example
///
/// ```rust
/// use voronoi_fracture::*;
/// use glam::DVec3;
///
/// let points = vec![
///     DVec3::new(0.0, 0.0, 0.0),
///     DVec3::new(1.0, 0.0, 0.0),
///     DVec3::new(1.0, 1.0, 0.0),
///     DVec3::new(0.0, 1.0, 0.0),
/// ];
/// let relaxed = relax_seeds(&points, &[0, 1]).unwrap();
/// assert!(relaxed.converged);
/// assert_eq!(relaxed.region_sizes(), vec![2, 2]);
/// ```
pub fn relax_seeds(points: &[DVec3], initial_seeds: &[VertexId]) -> Result<Relaxation> {
    relax_seeds_with_options(points, initial_seeds, LloydOptions::default())
}

/// Relax vertex seeds
///
/// Each iteration assigns every vertex to its nearest seed, averages each
/// cell, and moves the seed to the cell member nearest that average. A cell
/// left without members keeps its seed. Stops when an iteration leaves the
/// seeds unchanged or after `max_iterations`.
///
/// # Errors
///
/// `EmptySeedSet` without seeds, `VertexOutOfRange` for a seed past the
/// point cloud, `DuplicateSeed` for a repeated seed.
pub fn relax_seeds_with_options(
    points: &[DVec3],
    initial_seeds: &[VertexId],
    options: LloydOptions,
) -> Result<Relaxation> {
    validate_seeds(points.len(), initial_seeds)?;

    let seeds = initial_seeds.to_vec();
    let regions = assign_regions(points, &seed_positions(points, &seeds), options.strategy);
    Ok(run(points, seeds, regions, 0, options))
}

/// Relax seeds given as free points
///
/// The first assignment uses the points themselves; the first reseed snaps
/// every cell to a vertex, after which relaxation proceeds as for vertex
/// seeds. A point whose cell is empty snaps to its nearest vertex.
///
/// # Errors
///
/// `EmptySeedSet` without seed points, `NotEnoughVertices` for an empty point
/// cloud, `DuplicateSeed` if two seed points snap to the same vertex.
pub fn relax_seed_points(
    points: &[DVec3],
    seed_points: &[DVec3],
    options: LloydOptions,
) -> Result<Relaxation> {
    if seed_points.is_empty() {
        return Err(FractureError::EmptySeedSet);
    }
    if points.is_empty() {
        return Err(FractureError::NotEnoughVertices {
            requested: seed_points.len(),
            available: 0,
        });
    }

    let regions = assign_regions(points, seed_points, options.strategy);
    let centroids = compute_centroids(points, &regions, seed_points.len(), options.strategy);
    let members = region_members(&regions, seed_points.len());

    let index = SpatialIndex::new(points);
    let mut seeds = Vec::with_capacity(seed_points.len());
    for (region, member_list) in members.iter().enumerate() {
        let seed = match centroids[region] {
            Some(centroid) => nearest_member(points, member_list, centroid),
            None => index.find_nearest(seed_points[region]),
        };
        // Non-empty point cloud, so the index always answers
        seeds.push(seed.unwrap_or_default());
    }
    validate_seeds(points.len(), &seeds)?;

    let regions = assign_regions(points, &seed_positions(points, &seeds), options.strategy);
    Ok(run(points, seeds, regions, 1, options))
}

/// One centroid/reseed/assign cycle starting from `seeds` and their `regions`
///
/// Returns the new seeds and their regions. At a fixed point the returned
/// seeds equal the input.
pub fn lloyd_step(
    points: &[DVec3],
    seeds: &[VertexId],
    regions: &[usize],
    strategy: ExecutionStrategy,
) -> (Vec<VertexId>, Vec<usize>) {
    let centroids = compute_centroids(points, regions, seeds.len(), strategy);
    let next = reseed(points, regions, &centroids, seeds, strategy);
    let next_regions = assign_regions(points, &seed_positions(points, &next), strategy);
    (next, next_regions)
}

/// Index of the nearest site for every point
///
/// Ties go to the lowest site index.
pub fn assign_regions(
    points: &[DVec3],
    sites: &[DVec3],
    strategy: ExecutionStrategy,
) -> Vec<usize> {
    let nearest = |p: &DVec3| {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (i, site) in sites.iter().enumerate() {
            let d = p.distance_squared(*site);
            if d < best_distance {
                best_distance = d;
                best = i;
            }
        }
        best
    };

    match strategy {
        ExecutionStrategy::Sequential => points.iter().map(nearest).collect(),
        ExecutionStrategy::Parallel => points.par_iter().map(nearest).collect(),
    }
}

/// Average position of each region, `None` for regions without vertices
pub fn compute_centroids(
    points: &[DVec3],
    regions: &[usize],
    region_count: usize,
    strategy: ExecutionStrategy,
) -> Vec<Option<DVec3>> {
    let accumulate = |(chunk_index, chunk): (usize, &[DVec3])| {
        let mut sums = vec![(DVec3::ZERO, 0usize); region_count];
        let offset = chunk_index * CENTROID_SHARD;
        for (i, p) in chunk.iter().enumerate() {
            let slot = &mut sums[regions[offset + i]];
            slot.0 += *p;
            slot.1 += 1;
        }
        sums
    };

    let shards: Vec<Vec<(DVec3, usize)>> = match strategy {
        ExecutionStrategy::Sequential => points
            .chunks(CENTROID_SHARD)
            .enumerate()
            .map(accumulate)
            .collect(),
        ExecutionStrategy::Parallel => points
            .par_chunks(CENTROID_SHARD)
            .enumerate()
            .map(accumulate)
            .collect(),
    };

    let mut totals = vec![(DVec3::ZERO, 0usize); region_count];
    for shard in shards {
        for (total, (sum, count)) in totals.iter_mut().zip(shard) {
            total.0 += sum;
            total.1 += count;
        }
    }

    totals
        .into_iter()
        .map(|(sum, count)| (count > 0).then(|| sum / count as f64))
        .collect()
}

/// Move each seed to its region member nearest the region centroid
///
/// Regions without a centroid keep their current seed.
pub fn reseed(
    points: &[DVec3],
    regions: &[usize],
    centroids: &[Option<DVec3>],
    seeds: &[VertexId],
    strategy: ExecutionStrategy,
) -> Vec<VertexId> {
    let members = region_members(regions, seeds.len());
    let pick = |region: usize| {
        centroids[region]
            .and_then(|centroid| nearest_member(points, &members[region], centroid))
            .unwrap_or(seeds[region])
    };

    match strategy {
        ExecutionStrategy::Sequential => (0..seeds.len()).map(pick).collect(),
        ExecutionStrategy::Parallel => (0..seeds.len()).into_par_iter().map(pick).collect(),
    }
}

fn run(
    points: &[DVec3],
    mut seeds: Vec<VertexId>,
    mut regions: Vec<usize>,
    mut iterations: usize,
    options: LloydOptions,
) -> Relaxation {
    let start = Instant::now();
    debug!(
        "Lloyd starting: {} vertices, {} seeds, max {} iterations",
        points.len(),
        seeds.len(),
        options.max_iterations
    );

    let converged = loop {
        if iterations >= options.max_iterations {
            break false;
        }

        let iter_start = Instant::now();
        let (next, next_regions) = lloyd_step(points, &seeds, &regions, options.strategy);
        iterations += 1;

        let moved = next.iter().zip(&seeds).filter(|(a, b)| a != b).count();
        debug!(
            "Lloyd iter {}: {} seeds moved, {:?}",
            iterations,
            moved,
            iter_start.elapsed()
        );

        seeds = next;
        regions = next_regions;
        if moved == 0 {
            break true;
        }
    };

    if converged {
        debug!(
            "Lloyd converged after {} iterations, total={:?}",
            iterations,
            start.elapsed()
        );
    } else {
        warn!(
            "Lloyd relaxation hit the iteration cap ({}) without converging",
            options.max_iterations
        );
    }

    Relaxation {
        seeds,
        regions,
        iterations,
        converged,
    }
}

fn validate_seeds(point_count: usize, seeds: &[VertexId]) -> Result<()> {
    if seeds.is_empty() {
        return Err(FractureError::EmptySeedSet);
    }
    let mut seen = HashSet::with_capacity(seeds.len());
    for &seed in seeds {
        if seed as usize >= point_count {
            return Err(FractureError::VertexOutOfRange {
                vertex: seed,
                count: point_count,
            });
        }
        if !seen.insert(seed) {
            return Err(FractureError::DuplicateSeed(seed));
        }
    }
    Ok(())
}

fn seed_positions(points: &[DVec3], seeds: &[VertexId]) -> Vec<DVec3> {
    seeds.iter().map(|&s| points[s as usize]).collect()
}

fn region_members(regions: &[usize], region_count: usize) -> Vec<Vec<VertexId>> {
    let mut members = vec![Vec::new(); region_count];
    for (vertex, &region) in regions.iter().enumerate() {
        members[region].push(vertex as VertexId);
    }
    members
}

/// Member nearest `target`; ties go to the lowest vertex id
fn nearest_member(points: &[DVec3], members: &[VertexId], target: DVec3) -> Option<VertexId> {
    let mut best = None;
    let mut best_distance = f64::INFINITY;
    for &vertex in members {
        let d = points[vertex as usize].distance_squared(target);
        if d < best_distance {
            best_distance = d;
            best = Some(vertex);
        }
    }
    best
}

//! Initial seed selection
//!
//! Seeds are vertex ids. Both strategies draw from a `ChaCha8Rng` seeded with
//! the configured value, so the same inputs always produce the same seeds,
//! and both return their seeds sorted ascending.

use log::debug;
use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;

use crate::error::{FractureError, Result};
use crate::graph::{VertexId, WeightedGraph};

/// Pick `count` distinct vertices uniformly from `0..vertex_count`
///
/// # Errors
///
/// `NotEnoughVertices` if `count` exceeds `vertex_count`, `EmptySeedSet` if
/// `count` is zero.
pub fn random_seeds(vertex_count: usize, count: usize, rng_seed: u64) -> Result<Vec<VertexId>> {
    if count == 0 {
        return Err(FractureError::EmptySeedSet);
    }
    if count > vertex_count {
        return Err(FractureError::NotEnoughVertices {
            requested: count,
            available: vertex_count,
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);
    let mut seeds: Vec<VertexId> = index::sample(&mut rng, vertex_count, count)
        .into_iter()
        .map(|i| i as VertexId)
        .collect();
    seeds.sort_unstable();
    Ok(seeds)
}

/// Pick `count` seeds clustered around an impact
///
/// With `count` no larger than the impact itself, the seeds are a random
/// subset of the impact vertices. Otherwise the impact is only the start of
/// the search and never a seed: each layer holds the unvisited neighbors of
/// the previous one, whole layers are taken while they fit, and the layer
/// that would overflow `count` contributes a random subset.
///
/// # Errors
///
/// - `EmptySeedSet` if `count` is zero
/// - `NotEnoughVertices` if `impact` is empty, or if `count` exceeds the
///   impact and its connected component has fewer than `count` vertices
///   outside the impact
/// - `VertexOutOfRange` if an impact vertex is not in the graph
pub fn impact_seeds(
    graph: &WeightedGraph,
    impact: &[VertexId],
    count: usize,
    rng_seed: u64,
) -> Result<Vec<VertexId>> {
    if count == 0 {
        return Err(FractureError::EmptySeedSet);
    }
    let struck: BTreeSet<VertexId> = impact.iter().copied().collect();
    if struck.is_empty() {
        return Err(FractureError::NotEnoughVertices {
            requested: count,
            available: 0,
        });
    }
    if let Some(&vertex) = struck.iter().find(|&&v| !graph.contains_vertex(v)) {
        return Err(FractureError::VertexOutOfRange {
            vertex,
            count: graph.size(),
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);
    let mut seeds: Vec<VertexId>;

    if count <= struck.len() {
        let struck: Vec<VertexId> = struck.into_iter().collect();
        seeds = index::sample(&mut rng, struck.len(), count)
            .into_iter()
            .map(|i| struck[i])
            .collect();
        debug!("Picked {} impact seeds on the struck face", seeds.len());
        seeds.sort_unstable();
        return Ok(seeds);
    }

    seeds = Vec::with_capacity(count);
    let mut visited = struck.clone();
    let mut frontier: Vec<VertexId> = struck.into_iter().collect();
    let mut depth = 0;

    loop {
        let mut next = BTreeSet::new();
        for &vertex in &frontier {
            for link in graph.links(vertex) {
                if visited.insert(link.to) {
                    next.insert(link.to);
                }
            }
        }
        if next.is_empty() {
            return Err(FractureError::NotEnoughVertices {
                requested: count,
                available: seeds.len(),
            });
        }
        let layer: Vec<VertexId> = next.into_iter().collect();
        depth += 1;

        let wanted = count - seeds.len();
        if layer.len() >= wanted {
            seeds.extend(
                index::sample(&mut rng, layer.len(), wanted)
                    .into_iter()
                    .map(|i| layer[i]),
            );
            break;
        }
        seeds.extend_from_slice(&layer);
        frontier = layer;
    }

    debug!(
        "Picked {} impact seeds within {} layers of the impact",
        seeds.len(),
        depth
    );
    seeds.sort_unstable();
    Ok(seeds)
}

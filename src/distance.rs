//! Multi-source geodesic distance with path-direction correction
//!
//! Every source runs its own Dijkstra-style relaxation, and all of them
//! publish into one shared best-distance / best-source table. A cheaper path
//! from another source claims a vertex and stops the slower source from
//! expanding through it, which yields a Voronoi-like partition under the
//! corrected metric.
//!
//! # Corrected edge cost
//!
//! Relaxing `u → v` costs the link length plus its weight, plus a curvature
//! penalty `1 - cos θ` for every joint along the last `path_window` edges of
//! the path ending in `u → v`. Straight paths are cheaper than bent ones.
//!
//! # Shared state
//!
//! Distances and sources live in arrays of atomics indexed by vertex id and
//! are read lock-free for the fast-path checks. The predecessor array is
//! behind a reader/writer lock: the curvature walk holds the read side so the
//! chain it follows cannot change mid-walk, and a commit takes the write side
//! only when it actually improves a vertex.
//!
//! # Scheduling
//!
//! With `path_window < 2` the edge cost is fixed, and under
//! [`ExecutionStrategy::Parallel`] each source gets its own rayon worker; any
//! interleaving reaches the same distances and sources. With a curvature
//! term the cost depends on the predecessor chain at relaxation time, so
//! every source is driven from one queue ordered by `(distance, source,
//! vertex)` instead, and the result depends only on the set of sources.

use glam::DVec3;
use log::{debug, warn};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering as AtomicOrdering};
use std::sync::{PoisonError, RwLock};
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::ExecutionStrategy;
use crate::graph::{Link, VertexId, WeightedGraph};

/// Source id of a vertex no source has reached
pub const NO_SOURCE: VertexId = VertexId::MAX;

/// Best known distance of one vertex and the source that achieved it
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceEntry {
    /// Corrected distance to the nearest source
    pub distance: f64,
    /// Source vertex that achieved it
    pub source: VertexId,
}

/// Options for [`compute_distances_with_options`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceOptions {
    /// Number of trailing path edges inspected for the curvature penalty
    pub path_window: usize,
    /// How source workers are scheduled
    pub strategy: ExecutionStrategy,
}

impl Default for DistanceOptions {
    fn default() -> Self {
        Self {
            path_window: 3,
            strategy: ExecutionStrategy::default(),
        }
    }
}

/// Per-vertex result of a distance run
///
/// Dense over vertex ids; unreached vertices have no entry.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceField {
    entries: Vec<Option<DistanceEntry>>,
    predecessors: Vec<VertexId>,
}

impl DistanceField {
    /// Build a field from explicit entries (vertex id = index)
    ///
    /// Useful when the distances come from elsewhere; predecessors are left
    /// unset.
    pub fn from_entries(entries: Vec<Option<DistanceEntry>>) -> Self {
        let predecessors = (0..entries.len() as VertexId).collect();
        Self {
            entries,
            predecessors,
        }
    }

    /// Entry of a vertex, `None` if unreached or unknown
    #[inline]
    pub fn get(&self, vertex: VertexId) -> Option<DistanceEntry> {
        self.entries.get(vertex as usize).copied().flatten()
    }

    /// Source of a vertex, `None` if unreached
    #[inline]
    pub fn source(&self, vertex: VertexId) -> Option<VertexId> {
        self.get(vertex).map(|entry| entry.source)
    }

    /// Vertex the winning path arrived from
    ///
    /// `None` for sources, unreached vertices and fields built from entries.
    pub fn predecessor(&self, vertex: VertexId) -> Option<VertexId> {
        self.get(vertex)?;
        let pred = *self.predecessors.get(vertex as usize)?;
        (pred != vertex).then_some(pred)
    }

    /// Reached vertices and their entries, in ascending vertex order
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, DistanceEntry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(id, entry)| entry.map(|e| (id as VertexId, e)))
    }

    /// Length of the dense id range covered by this field
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the field covers no vertices
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of vertices reached by some source
    pub fn reached_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Map every vertex to the index of its source within `seeds`
    ///
    /// Unreached vertices, and vertices whose source is not in `seeds`, map
    /// to `None`.
    pub fn region_assignment(&self, seeds: &[VertexId]) -> Vec<Option<usize>> {
        let lookup = seed_lookup(seeds);
        self.entries
            .iter()
            .map(|entry| entry.and_then(|e| lookup(e.source)))
            .collect()
    }
}

/// Closure mapping a source vertex id to its position in `seeds`
pub(crate) fn seed_lookup(seeds: &[VertexId]) -> impl Fn(VertexId) -> Option<usize> + '_ {
    let index: std::collections::HashMap<VertexId, usize> = seeds
        .iter()
        .enumerate()
        .map(|(i, &s)| (s, i))
        .collect();
    move |source| index.get(&source).copied()
}

/// Compute corrected distances from `sources` with default scheduling
///
/// `path_window` is the number of trailing path edges inspected by the
/// curvature correction (`0` or `1` disables it).
///
/// # Example
///
/// ```rust
/// use voronoi_fracture::*;
/// use glam::DVec3;
///
/// let mut graph = WeightedGraph::undirected();
/// graph.add_link(0, 1, DVec3::X, 0.0);
/// graph.add_link(1, 2, DVec3::X, 0.0);
///
/// let field = compute_distances(&graph, &[0], 0);
/// assert_eq!(field.get(2).unwrap().distance, 2.0);
/// assert_eq!(field.get(2).unwrap().source, 0);
/// ```
pub fn compute_distances(
    graph: &WeightedGraph,
    sources: &[VertexId],
    path_window: usize,
) -> DistanceField {
    compute_distances_with_options(
        graph,
        sources,
        DistanceOptions {
            path_window,
            ..Default::default()
        },
    )
}

/// Compute corrected distances from `sources`
///
/// Sources missing from the graph never expand. Each declared source ends
/// with entry `(0, itself)`.
pub fn compute_distances_with_options(
    graph: &WeightedGraph,
    sources: &[VertexId],
    options: DistanceOptions,
) -> DistanceField {
    let start = Instant::now();
    let bound = graph
        .id_bound()
        .max(sources.iter().map(|&s| s as usize + 1).max().unwrap_or(0));
    let mut state = SharedState::new(bound);

    let mut active: Vec<VertexId> = Vec::with_capacity(sources.len());
    for &source in sources {
        if !graph.contains_vertex(source) {
            warn!("distance source {} is not in the graph; it will not expand", source);
            continue;
        }
        if state.is_source[source as usize] {
            continue;
        }
        state.pin_source(source);
        active.push(source);
    }
    active.sort_unstable();

    // With a curvature term the cost of an edge depends on the predecessor
    // chain at the time it is relaxed, so only one global pop order gives a
    // result that does not depend on scheduling.
    let independent_workers =
        options.strategy == ExecutionStrategy::Parallel && options.path_window < 2;

    if independent_workers {
        active.par_iter().for_each(|&source| {
            let expanded = expand_source(graph, &state, source, options.path_window);
            debug!("source {} expanded {} vertices", source, expanded);
        });
    } else {
        let expanded = expand_ordered(graph, &state, &active, options.path_window);
        debug!("ordered relaxation expanded {} vertices", expanded);
    }

    let field = state.into_field();
    debug!(
        "distance field: {} sources, {} of {} vertices reached, k={}, {:?}",
        active.len(),
        field.reached_count(),
        graph.size(),
        options.path_window,
        start.elapsed()
    );
    field
}

/// Queue entry ordered so that `BinaryHeap` pops the smallest
/// `(distance, source, vertex)` first
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    source: VertexId,
    vertex: VertexId,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.source.cmp(&self.source))
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Per-vertex state shared by all source workers
struct SharedState {
    distance: Vec<AtomicU64>,
    source: Vec<AtomicU32>,
    predecessor: RwLock<Vec<VertexId>>,
    is_source: Vec<bool>,
}

impl SharedState {
    fn new(bound: usize) -> Self {
        Self {
            distance: (0..bound)
                .map(|_| AtomicU64::new(f64::INFINITY.to_bits()))
                .collect(),
            source: (0..bound).map(|_| AtomicU32::new(NO_SOURCE)).collect(),
            predecessor: RwLock::new((0..bound as VertexId).collect()),
            is_source: vec![false; bound],
        }
    }

    fn pin_source(&mut self, source: VertexId) {
        let i = source as usize;
        self.distance[i].store(0f64.to_bits(), AtomicOrdering::Relaxed);
        self.source[i].store(source, AtomicOrdering::Relaxed);
        self.is_source[i] = true;
    }

    #[inline]
    fn distance(&self, v: VertexId) -> f64 {
        f64::from_bits(self.distance[v as usize].load(AtomicOrdering::Acquire))
    }

    #[inline]
    fn source(&self, v: VertexId) -> VertexId {
        self.source[v as usize].load(AtomicOrdering::Acquire)
    }

    /// Whether `(distance, source)` beats the current entry of `v`
    ///
    /// Exact ties go to the lower source id so the outcome does not depend on
    /// which worker gets there first.
    #[inline]
    fn improves(&self, v: VertexId, distance: f64, source: VertexId) -> bool {
        let current = self.distance(v);
        distance < current || (distance == current && source < self.source(v))
    }

    /// Publish an improvement under the write lock
    ///
    /// Returns `false` if another worker committed something at least as
    /// good in the meantime.
    fn commit(&self, v: VertexId, distance: f64, source: VertexId, pred: VertexId) -> bool {
        let mut predecessor = self
            .predecessor
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if !self.improves(v, distance, source) {
            return false;
        }
        let i = v as usize;
        self.distance[i].store(distance.to_bits(), AtomicOrdering::Release);
        self.source[i].store(source, AtomicOrdering::Release);
        predecessor[i] = pred;
        true
    }

    fn into_field(self) -> DistanceField {
        let predecessors = self
            .predecessor
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let entries = self
            .distance
            .into_iter()
            .zip(self.source)
            .map(|(distance, source)| {
                let distance = f64::from_bits(distance.into_inner());
                let source = source.into_inner();
                (distance.is_finite() && source != NO_SOURCE)
                    .then_some(DistanceEntry { distance, source })
            })
            .collect();
        DistanceField {
            entries,
            predecessors,
        }
    }
}

/// Run one source's relaxation to exhaustion; returns the number of pops expanded
///
/// Used when the edge cost does not depend on the path, so that workers of
/// different sources reach the same fixed point in any interleaving.
fn expand_source(
    graph: &WeightedGraph,
    state: &SharedState,
    source: VertexId,
    path_window: usize,
) -> usize {
    let mut queue = BinaryHeap::new();
    queue.push(Candidate {
        distance: 0.0,
        source,
        vertex: source,
    });
    let mut expanded = 0;
    let mut improvements: Vec<(VertexId, f64)> = Vec::new();

    while let Some(Candidate { distance, vertex: u, .. }) = queue.pop() {
        // Stale: a better path has since been published and u is claimed
        if distance != state.distance(u) && state.source(u) != u {
            continue;
        }
        expanded += 1;

        let owner = state.source(u);
        relax_links(graph, state, u, owner, path_window, &mut improvements);
        for &(v, candidate) in &improvements {
            if state.commit(v, candidate, owner, u) {
                queue.push(Candidate {
                    distance: candidate,
                    source: owner,
                    vertex: v,
                });
            }
        }
    }

    expanded
}

/// Relax all sources from one queue ordered by `(distance, source, vertex)`
///
/// `sources` must be sorted and free of duplicates. The pop order then
/// depends only on the graph and the set of sources, so the predecessor
/// chains read by the curvature walk are the same on every run.
fn expand_ordered(
    graph: &WeightedGraph,
    state: &SharedState,
    sources: &[VertexId],
    path_window: usize,
) -> usize {
    let mut queue: BinaryHeap<Candidate> = sources
        .iter()
        .map(|&source| Candidate {
            distance: 0.0,
            source,
            vertex: source,
        })
        .collect();
    let mut expanded = 0;
    let mut improvements: Vec<(VertexId, f64)> = Vec::new();

    while let Some(Candidate { distance, source, vertex: u }) = queue.pop() {
        // Stale: u has been claimed with a better (distance, source) since
        if distance != state.distance(u) || source != state.source(u) {
            continue;
        }
        expanded += 1;

        relax_links(graph, state, u, source, path_window, &mut improvements);
        for &(v, candidate) in &improvements {
            if state.commit(v, candidate, source, u) {
                queue.push(Candidate {
                    distance: candidate,
                    source,
                    vertex: v,
                });
            }
        }
    }

    expanded
}

/// Collect the neighbors of `u` that `owner` would improve
///
/// Holds the predecessor read lock for the whole scan so the chains walked by
/// the curvature term cannot change underneath it.
fn relax_links(
    graph: &WeightedGraph,
    state: &SharedState,
    u: VertexId,
    owner: VertexId,
    path_window: usize,
    improvements: &mut Vec<(VertexId, f64)>,
) {
    improvements.clear();
    let links = graph.links(u);
    if links.is_empty() {
        return;
    }

    let predecessor = state
        .predecessor
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    let base = state.distance(u);
    for link in links {
        let v = link.to;
        if state.is_source.get(v as usize).copied().unwrap_or(true) {
            continue;
        }
        let candidate = base + corrected_cost(graph, &predecessor, u, link, path_window);
        if state.improves(v, candidate, owner) {
            improvements.push((v, candidate));
        }
    }
}

/// Cost of relaxing `u → link.to` including the curvature penalty
///
/// Walks back from `u` through `predecessor`, collecting at most
/// `path_window` edge displacements (the relaxed edge first), and adds
/// `1 - dot` of each consecutive pair of directions.
fn corrected_cost(
    graph: &WeightedGraph,
    predecessor: &[VertexId],
    u: VertexId,
    link: &Link,
    path_window: usize,
) -> f64 {
    let mut cost = link.cost();
    if path_window < 2 {
        return cost;
    }

    let mut previous = link.displacement.normalize_or_zero();
    let mut current = u;
    for _ in 1..path_window {
        let pred = match predecessor.get(current as usize) {
            Some(&p) if p != current => p,
            _ => break,
        };
        let Some(edge) = graph.get_link(pred, current) else {
            break;
        };
        let direction: DVec3 = edge.displacement.normalize_or_zero();
        cost += 1.0 - direction.dot(previous);
        previous = direction;
        current = pred;
    }

    cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tet::TetMesh;
    use approx::assert_relative_eq;

    const STRATEGIES: [ExecutionStrategy; 2] =
        [ExecutionStrategy::Sequential, ExecutionStrategy::Parallel];

    fn line_graph(n: u32) -> WeightedGraph {
        let mut graph = WeightedGraph::undirected();
        for i in 0..n - 1 {
            graph.add_link(i, i + 1, DVec3::X, 0.0);
        }
        graph
    }

    fn options(path_window: usize, strategy: ExecutionStrategy) -> DistanceOptions {
        DistanceOptions {
            path_window,
            strategy,
        }
    }

    #[test]
    fn test_single_source_line() {
        let graph = line_graph(4);
        let field = compute_distances(&graph, &[0], 0);
        for i in 0..4 {
            let entry = field.get(i).unwrap();
            assert_relative_eq!(entry.distance, i as f64);
            assert_eq!(entry.source, 0);
        }
        assert_eq!(field.predecessor(3), Some(2));
        assert_eq!(field.predecessor(0), None);
    }

    #[test]
    fn test_two_sources_on_a_line_tie_goes_to_lower_source() {
        for strategy in STRATEGIES {
            let graph = line_graph(5);
            let field = compute_distances_with_options(&graph, &[4, 0], options(0, strategy));

            let sources: Vec<VertexId> = (0..5).map(|v| field.source(v).unwrap()).collect();
            assert_eq!(sources, vec![0, 0, 0, 4, 4]);
            assert_relative_eq!(field.get(2).unwrap().distance, 2.0);

            let regions = field.region_assignment(&[0, 4]);
            assert_eq!(regions, vec![Some(0), Some(0), Some(0), Some(1), Some(1)]);
        }
    }

    #[test]
    fn test_sources_are_pinned_at_zero() {
        for strategy in STRATEGIES {
            let mesh = TetMesh::grid(3, 1.0);
            let graph = mesh.to_graph();
            let sources = [0, 13, 40, 63];
            let field = compute_distances_with_options(&graph, &sources, options(3, strategy));
            for &s in &sources {
                assert_eq!(field.get(s), Some(DistanceEntry { distance: 0.0, source: s }));
            }
        }
    }

    #[test]
    fn test_distances_monotone_along_predecessors() {
        for strategy in STRATEGIES {
            let mesh = TetMesh::grid(4, 0.5);
            let graph = mesh.to_graph();
            let field =
                compute_distances_with_options(&graph, &[0, 60, 124], options(3, strategy));

            assert_eq!(field.reached_count(), mesh.vertex_count());
            for (v, entry) in field.iter() {
                assert!(entry.distance >= 0.0);
                if let Some(pred) = field.predecessor(v) {
                    let pred_entry = field.get(pred).unwrap();
                    assert!(entry.distance >= pred_entry.distance);
                    assert!(graph.get_link(pred, v).is_some());
                }
            }
        }
    }

    #[test]
    fn test_zero_window_matches_plain_dijkstra_on_grid() {
        let mesh = TetMesh::grid(2, 1.0);
        let graph = mesh.to_graph();
        let sequential =
            compute_distances_with_options(&graph, &[0], options(0, ExecutionStrategy::Sequential));
        let parallel =
            compute_distances_with_options(&graph, &[0], options(0, ExecutionStrategy::Parallel));

        // The far corner is reached along the main cube diagonals
        let far = (mesh.vertex_count() - 1) as VertexId;
        assert_relative_eq!(
            sequential.get(far).unwrap().distance,
            2.0 * 3f64.sqrt(),
            epsilon = 1e-9
        );
        for v in 0..mesh.vertex_count() as VertexId {
            assert_relative_eq!(
                sequential.get(v).unwrap().distance,
                parallel.get(v).unwrap().distance,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_source_order_does_not_matter_with_curvature() {
        let mesh = TetMesh::grid(4, 0.5);
        let graph = mesh.to_graph();
        for strategy in STRATEGIES {
            let forward = compute_distances_with_options(&graph, &[0, 60, 124], options(3, strategy));
            let backward =
                compute_distances_with_options(&graph, &[124, 60, 0], options(3, strategy));
            let shuffled =
                compute_distances_with_options(&graph, &[60, 0, 124, 60], options(3, strategy));
            assert_eq!(forward, backward);
            assert_eq!(forward, shuffled);
        }
    }

    #[test]
    fn test_strategies_agree_with_curvature() {
        let mesh = TetMesh::grid(4, 0.5);
        let graph = mesh.to_graph();
        let sources = [7, 31, 100];
        let sequential =
            compute_distances_with_options(&graph, &sources, options(3, ExecutionStrategy::Sequential));
        let parallel =
            compute_distances_with_options(&graph, &sources, options(3, ExecutionStrategy::Parallel));
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_strategies_agree_without_curvature() {
        let mesh = TetMesh::grid(4, 0.5);
        let graph = mesh.to_graph();
        let sources = [124, 0, 60];
        let sequential =
            compute_distances_with_options(&graph, &sources, options(0, ExecutionStrategy::Sequential));
        let parallel =
            compute_distances_with_options(&graph, &sources, options(0, ExecutionStrategy::Parallel));
        for v in 0..mesh.vertex_count() as VertexId {
            assert_eq!(sequential.get(v), parallel.get(v));
        }
    }

    #[test]
    fn test_curvature_penalizes_bends() {
        // 0 → 1 → 2 straight, 0 → 1 → 3 bent by 90 degrees
        let mut graph = WeightedGraph::undirected();
        graph.add_link(0, 1, DVec3::X, 0.0);
        graph.add_link(1, 2, DVec3::X, 0.0);
        graph.add_link(1, 3, DVec3::Y, 0.0);

        let field = compute_distances(&graph, &[0], 3);
        assert_relative_eq!(field.get(2).unwrap().distance, 2.0, epsilon = 1e-12);
        assert_relative_eq!(field.get(3).unwrap().distance, 3.0, epsilon = 1e-12);

        let plain = compute_distances(&graph, &[0], 1);
        assert_relative_eq!(plain.get(3).unwrap().distance, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_weights_add_to_edge_cost() {
        let mut graph = WeightedGraph::undirected();
        graph.add_link(0, 1, DVec3::X, 1.5);
        let field = compute_distances(&graph, &[0], 0);
        assert_relative_eq!(field.get(1).unwrap().distance, 2.5);
    }

    #[test]
    fn test_directed_links_are_one_way() {
        let mut graph = WeightedGraph::directed();
        graph.add_link(0, 1, DVec3::X, 0.0);
        let field = compute_distances(&graph, &[1], 0);
        assert!(field.get(0).is_none());
        assert_eq!(field.get(1).unwrap().source, 1);
    }

    #[test]
    fn test_unreached_vertices_are_omitted() {
        let mut graph = line_graph(3);
        graph.add_link(10, 11, DVec3::X, 0.0);
        let field = compute_distances(&graph, &[0], 0);
        assert_eq!(field.reached_count(), 3);
        assert!(field.get(10).is_none());
        assert!(field.get(11).is_none());
        assert_eq!(field.region_assignment(&[0])[10], None);
    }

    #[test]
    fn test_missing_source_is_ineffective() {
        let graph = line_graph(3);
        let field = compute_distances(&graph, &[0, 99], 0);
        assert_eq!(field.reached_count(), 3);
        assert!(field.iter().all(|(_, e)| e.source == 0));
    }

    #[test]
    fn test_duplicate_sources_are_ignored() {
        let graph = line_graph(3);
        let field = compute_distances(&graph, &[2, 2], 0);
        assert_eq!(field.get(0).unwrap().source, 2);
        assert_relative_eq!(field.get(0).unwrap().distance, 2.0);
    }

    #[test]
    fn test_candidate_heap_pops_smallest() {
        let mut heap = BinaryHeap::new();
        for (distance, source, vertex) in [(3.0, 0, 1), (1.0, 4, 2), (2.0, 0, 3), (1.0, 2, 5)] {
            heap.push(Candidate { distance, source, vertex });
        }
        assert_eq!(heap.pop().unwrap().vertex, 5);
        assert_eq!(heap.pop().unwrap().vertex, 2);
        assert_eq!(heap.pop().unwrap().vertex, 3);
        assert_eq!(heap.pop().unwrap().vertex, 1);
    }

    #[test]
    fn test_from_entries() {
        let field = DistanceField::from_entries(vec![
            Some(DistanceEntry { distance: 0.0, source: 0 }),
            None,
        ]);
        assert_eq!(field.len(), 2);
        assert_eq!(field.reached_count(), 1);
        assert_eq!(field.predecessor(0), None);
        assert!(field.get(5).is_none());
    }
}

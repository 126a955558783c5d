//! Weighted adjacency graph over mesh vertices
//!
//! Each link carries a scalar weight and the displacement vector from its
//! owning vertex to its target. Undirected graphs store every edge twice,
//! the reverse link holding the negated displacement and the same weight.

use glam::DVec3;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dense vertex index into the point cloud
pub type VertexId = u32;

/// Tolerance used when comparing link weights and displacements
const LINK_EPSILON: f64 = 1e-8;

/// Outgoing edge of a vertex
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct Link {
    /// Target vertex
    pub to: VertexId,
    /// Additional edge cost on top of the displacement length
    pub weight: f64,
    /// Vector from the owning vertex to `to`
    pub displacement: DVec3,
}

impl Link {
    /// Create a new link
    pub fn new(to: VertexId, weight: f64, displacement: DVec3) -> Self {
        Self {
            to,
            weight,
            displacement,
        }
    }

    /// Base traversal cost: displacement length plus weight
    #[inline]
    pub fn cost(&self) -> f64 {
        self.displacement.length() + self.weight
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.to == other.to
            && (self.weight - other.weight).abs() <= LINK_EPSILON
            && self.displacement.abs_diff_eq(other.displacement, LINK_EPSILON)
    }
}

/// Mutable weighted graph keyed by vertex id
///
/// Whether edges are mirrored is fixed at construction. The graph has no
/// locking of its own: mutate it from one place, then share it immutably
/// (it is `Sync`) with the distance engine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    adjacency: BTreeMap<VertexId, Vec<Link>>,
    directed: bool,
}

impl WeightedGraph {
    /// Create an empty graph
    pub fn new(directed: bool) -> Self {
        Self {
            adjacency: BTreeMap::new(),
            directed,
        }
    }

    /// Create an empty directed graph
    pub fn directed() -> Self {
        Self::new(true)
    }

    /// Create an empty undirected graph
    pub fn undirected() -> Self {
        Self::new(false)
    }

    /// Whether links are stored one-way only
    #[inline]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Add a vertex with no links
    ///
    /// Returns `false` if the vertex already exists.
    pub fn add_vertex(&mut self, id: VertexId) -> bool {
        if self.adjacency.contains_key(&id) {
            return false;
        }
        self.adjacency.insert(id, Vec::new());
        true
    }

    /// Whether the vertex is known to the graph
    #[inline]
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// Remove a vertex and every link that points at it
    ///
    /// Returns `false` if the vertex did not exist.
    pub fn delete_vertex(&mut self, id: VertexId) -> bool {
        if self.adjacency.remove(&id).is_none() {
            return false;
        }
        for links in self.adjacency.values_mut() {
            links.retain(|link| link.to != id);
        }
        true
    }

    /// Add a link, creating both endpoints if needed
    ///
    /// In an undirected graph the reverse link (negated displacement, same
    /// weight) is added as well. Returns `false` if `from → to` already
    /// exists, in which case nothing changes.
    pub fn add_link(
        &mut self,
        from: VertexId,
        to: VertexId,
        displacement: DVec3,
        weight: f64,
    ) -> bool {
        self.add_vertex(from);
        self.add_vertex(to);

        if self.get_link(from, to).is_some() {
            return false;
        }

        self.adjacency
            .entry(from)
            .or_default()
            .push(Link::new(to, weight, displacement));

        if !self.directed && self.get_link(to, from).is_none() {
            self.adjacency
                .entry(to)
                .or_default()
                .push(Link::new(from, weight, -displacement));
        }

        true
    }

    /// Remove the link `from → to` (and its mirror when undirected)
    ///
    /// Returns `false` if no such link exists.
    pub fn delete_link(&mut self, from: VertexId, to: VertexId) -> bool {
        let Some(links) = self.adjacency.get_mut(&from) else {
            return false;
        };
        let Some(pos) = links.iter().position(|link| link.to == to) else {
            return false;
        };
        links.remove(pos);

        if !self.directed {
            if let Some(reverse) = self.adjacency.get_mut(&to) {
                reverse.retain(|link| link.to != from);
            }
        }

        true
    }

    /// Look up the link `from → to`
    pub fn get_link(&self, from: VertexId, to: VertexId) -> Option<&Link> {
        self.adjacency
            .get(&from)?
            .iter()
            .find(|link| link.to == to)
    }

    /// All outgoing links of a vertex (empty if the vertex is unknown)
    pub fn links(&self, from: VertexId) -> &[Link] {
        self.adjacency
            .get(&from)
            .map(|links| links.as_slice())
            .unwrap_or(&[])
    }

    /// Change the weight of `from → to` (and its mirror when undirected)
    ///
    /// Returns `false` if no such link exists.
    pub fn update_link(&mut self, from: VertexId, to: VertexId, weight: f64) -> bool {
        let Some(link) = self
            .adjacency
            .get_mut(&from)
            .and_then(|links| links.iter_mut().find(|link| link.to == to))
        else {
            return false;
        };
        link.weight = weight;

        if !self.directed {
            if let Some(reverse) = self
                .adjacency
                .get_mut(&to)
                .and_then(|links| links.iter_mut().find(|link| link.to == from))
            {
                reverse.weight = weight;
            }
        }

        true
    }

    /// Known vertex ids in ascending order
    pub fn vertices(&self) -> Vec<VertexId> {
        self.adjacency.keys().copied().collect()
    }

    /// Number of vertices
    #[inline]
    pub fn size(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of stored (directed) links
    pub fn link_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// One past the largest vertex id, i.e. the length of a dense per-vertex array
    pub fn id_bound(&self) -> usize {
        self.adjacency
            .keys()
            .next_back()
            .map(|&id| id as usize + 1)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_vertex_twice() {
        let mut graph = WeightedGraph::undirected();
        assert!(graph.add_vertex(3));
        assert!(!graph.add_vertex(3));
        assert_eq!(graph.size(), 1);
        assert!(graph.links(3).is_empty());
    }

    #[test]
    fn test_add_link_mirrors_when_undirected() {
        let mut graph = WeightedGraph::undirected();
        assert!(graph.add_link(0, 1, DVec3::X, 0.5));

        let forward = graph.get_link(0, 1).unwrap();
        let reverse = graph.get_link(1, 0).unwrap();
        assert_eq!(forward.displacement, DVec3::X);
        assert_eq!(reverse.displacement, -DVec3::X);
        assert_eq!(reverse.weight, 0.5);
        assert_eq!(graph.size(), 2);
        assert_eq!(graph.link_count(), 2);

        // Re-adding is a no-op
        assert!(!graph.add_link(0, 1, DVec3::Y, 9.0));
        assert_eq!(graph.get_link(0, 1).unwrap().weight, 0.5);
    }

    #[test]
    fn test_directed_graph_does_not_mirror() {
        let mut graph = WeightedGraph::directed();
        graph.add_link(0, 1, DVec3::X, 1.0);
        assert!(graph.get_link(0, 1).is_some());
        assert!(graph.get_link(1, 0).is_none());
        assert!(graph.contains_vertex(1));
        assert!(graph.is_directed());
    }

    #[test]
    fn test_update_link_updates_both_sides() {
        let mut graph = WeightedGraph::undirected();
        graph.add_link(0, 1, DVec3::X, 0.0);
        assert!(graph.update_link(1, 0, 2.5));
        assert_eq!(graph.get_link(0, 1).unwrap().weight, 2.5);
        assert_eq!(graph.get_link(1, 0).unwrap().weight, 2.5);
        assert!(!graph.update_link(0, 7, 1.0));
    }

    #[test]
    fn test_delete_link() {
        let mut graph = WeightedGraph::undirected();
        graph.add_link(0, 1, DVec3::X, 0.0);
        graph.add_link(0, 2, DVec3::Y, 0.0);
        assert!(graph.delete_link(0, 1));
        assert!(graph.get_link(0, 1).is_none());
        assert!(graph.get_link(1, 0).is_none());
        assert!(graph.get_link(2, 0).is_some());
        assert!(!graph.delete_link(0, 1));
    }

    #[test]
    fn test_delete_vertex_cascades() {
        let mut graph = WeightedGraph::undirected();
        graph.add_link(0, 1, DVec3::X, 0.0);
        graph.add_link(1, 2, DVec3::X, 0.0);
        graph.add_link(2, 0, -DVec3::X * 2.0, 0.0);

        assert!(graph.delete_vertex(1));
        assert!(!graph.contains_vertex(1));
        assert_eq!(graph.vertices(), vec![0, 2]);
        assert!(graph.links(0).iter().all(|l| l.to != 1));
        assert!(graph.links(2).iter().all(|l| l.to != 1));
        assert!(!graph.delete_vertex(1));
    }

    #[test]
    fn test_links_of_unknown_vertex_is_empty() {
        let graph = WeightedGraph::undirected();
        assert!(graph.links(42).is_empty());
        assert_eq!(graph.id_bound(), 0);
    }

    #[test]
    fn test_link_equality_is_approximate() {
        let a = Link::new(1, 0.5, DVec3::X);
        let b = Link::new(1, 0.5 + 1e-12, DVec3::X + DVec3::splat(1e-12));
        let c = Link::new(2, 0.5, DVec3::X);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!((a.cost() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_vertices_sorted() {
        let mut graph = WeightedGraph::undirected();
        graph.add_vertex(5);
        graph.add_vertex(1);
        graph.add_vertex(3);
        assert_eq!(graph.vertices(), vec![1, 3, 5]);
        assert_eq!(graph.id_bound(), 6);
    }
}

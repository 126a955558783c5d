//! Impact energy propagation
//!
//! An impact deposits energy on one triangle of the surface. The energy
//! spreads outward over the vertex graph in breadth-first layers, losing a
//! little with every unit of distance travelled, and every link touched by a
//! layer is reweighted with the mean energy of its endpoints. The resulting
//! weights bias the distance field so cracks favor the struck area.

use log::{debug, warn};
use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::{VertexId, WeightedGraph};

/// Default loss factor per unit of displacement
pub const DEFAULT_ENERGY_DAMPING: f64 = 0.01;

/// Energy delivered to a triangle of the mesh surface
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactEvent {
    /// Energy at the struck vertices
    pub energy: f64,
    /// Vertices of the struck triangle
    pub triangle: [VertexId; 3],
}

impl ImpactEvent {
    pub fn new(energy: f64, triangle: [VertexId; 3]) -> Self {
        Self { energy, triangle }
    }
}

/// Spread impact energy over `graph` and reweight its links
///
/// Each vertex of a new layer receives, from every neighbor in the previous
/// layer, that neighbor's energy divided by `1 + |displacement| * damping`,
/// and keeps the average of what it received. Links leaving a layer get the
/// mean energy of their two endpoints as weight.
///
/// Returns the energy per vertex id (0 for unreached vertices).
pub fn propagate_energy(graph: &mut WeightedGraph, impact: &ImpactEvent, damping: f64) -> Vec<f64> {
    let mut energy = vec![0.0; graph.id_bound()];

    let mut layer = BTreeSet::new();
    for &vertex in impact.triangle.iter() {
        if graph.contains_vertex(vertex) {
            energy[vertex as usize] = impact.energy;
            layer.insert(vertex);
        } else {
            warn!("Impact vertex {} is not in the graph, ignoring", vertex);
        }
    }

    let mut visited = layer.clone();
    let mut layers = 0;
    while !layer.is_empty() {
        let mut received: Vec<(f64, usize)> = vec![(0.0, 0); energy.len()];
        let mut next = BTreeSet::new();

        for &vertex in &layer {
            let source_energy = energy[vertex as usize];
            let targets: Vec<(VertexId, f64)> = graph
                .links(vertex)
                .iter()
                .map(|link| (link.to, link.displacement.length()))
                .collect();

            for (to, length) in targets {
                if !visited.contains(&to) {
                    let slot = &mut received[to as usize];
                    slot.0 += source_energy / (1.0 + length * damping);
                    slot.1 += 1;
                    next.insert(to);
                }
            }
        }

        for &vertex in &next {
            let (sum, count) = received[vertex as usize];
            energy[vertex as usize] = sum / count as f64;
        }

        for &vertex in &layer {
            let targets: Vec<VertexId> = graph.links(vertex).iter().map(|link| link.to).collect();
            for to in targets {
                let weight = (energy[vertex as usize] + energy[to as usize]) / 2.0;
                graph.update_link(vertex, to, weight);
            }
        }

        visited.extend(next.iter().copied());
        layer = next;
        layers += 1;
    }

    debug!(
        "Impact energy {} reached {} vertices over {} layers",
        impact.energy,
        visited.len(),
        layers
    );
    energy
}

//! Fracture pass orchestration

use glam::DVec3;
use log::info;
use std::time::Instant;

use crate::config::{FractureConfig, SeedStrategy};
use crate::distance::{compute_distances_with_options, DistanceField, DistanceOptions};
use crate::error::{FractureError, Result};
use crate::graph::{VertexId, WeightedGraph};
use crate::seeding::{
    impact_seeds, propagate_energy, random_seeds, relax_seeds_with_options, ImpactEvent,
    LloydOptions, Relaxation,
};
use crate::spatial::SpatialIndex;
use crate::split::{split_mesh_with_options, FragmentMesh, SplitOptions, SplitResult};
use crate::tet::TetMesh;

/// A tetrahedral mesh broken into fragments
///
/// Holds every intermediate product of the pass (energy, seeds, distance
/// field) next to the fragments, so callers can inspect or visualize how a
/// fracture came about.
///
/// # Examples
///
/// ```
/// use voronoi_fracture::*;
///
/// let mesh = TetMesh::grid(3, 1.0);
/// let config = FractureConfigBuilder::new()
///     .rng_seed(42)
///     .seed_strategy(SeedStrategy::Random)
///     .seed_count(4)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let fracture = Fracture::compute(config, &mesh, None).unwrap();
/// assert_eq!(fracture.fragment_count(), 4);
///
/// for fragment in fracture.fragments() {
///     println!("{} triangles, volume {:.3}", fragment.triangle_count(), fragment.volume());
/// }
/// ```
#[derive(Clone)]
pub struct Fracture {
    /// Configuration used for this pass
    config: FractureConfig,

    /// Edge graph of the mesh, reweighted by impact energy if any
    graph: WeightedGraph,

    /// Energy per vertex, when an impact was given
    energy: Option<Vec<f64>>,

    /// Seeds before relaxation
    initial_seeds: Vec<VertexId>,

    /// Lloyd result, when relaxation is enabled
    relaxation: Option<Relaxation>,

    /// Final seeds, one per fragment
    seeds: Vec<VertexId>,

    distances: DistanceField,

    /// Region of every vertex (`None` when unreached)
    regions: Vec<Option<usize>>,

    split: SplitResult,

    /// Nearest-vertex lookup over the mesh vertices
    spatial_index: SpatialIndex,
}

impl Fracture {
    /// Run a complete fracture pass over `mesh`
    ///
    /// Steps: build the edge graph, spread the impact energy (if any), pick
    /// seeds, relax them, compute the distance field, assign regions and
    /// split the mesh.
    ///
    /// # Arguments
    ///
    /// * `config` - Fracture configuration
    /// * `mesh` - Tetrahedral mesh to break
    /// * `impact` - Struck triangle and its energy; required by [`SeedStrategy::Impact`]
    ///
    /// # Errors
    ///
    /// - `InvalidMesh` for a mesh without vertices
    /// - `InvalidConfig` for the impact strategy without an impact
    /// - `NotEnoughVertices` when the mesh cannot supply `seed_count` seeds
    /// - `VertexOutOfRange` for an impact vertex outside the mesh
    pub fn compute(
        config: FractureConfig,
        mesh: &TetMesh,
        impact: Option<ImpactEvent>,
    ) -> Result<Self> {
        let start = Instant::now();
        if mesh.vertex_count() == 0 {
            return Err(FractureError::InvalidMesh("mesh has no vertices".to_string()));
        }
        if let Some(&vertex) = impact
            .iter()
            .flat_map(|i| i.triangle.iter())
            .find(|&&v| v as usize >= mesh.vertex_count())
        {
            return Err(FractureError::VertexOutOfRange {
                vertex,
                count: mesh.vertex_count(),
            });
        }

        let mut graph = mesh.to_graph();
        let energy = impact.map(|event| propagate_energy(&mut graph, &event, config.energy_damping));

        let initial_seeds = match (config.seed_strategy, impact) {
            (SeedStrategy::Random, _) => {
                random_seeds(mesh.vertex_count(), config.seed_count, config.rng_seed)?
            }
            (SeedStrategy::Impact, Some(event)) => {
                impact_seeds(&graph, &event.triangle, config.seed_count, config.rng_seed)?
            }
            (SeedStrategy::Impact, None) => {
                return Err(FractureError::InvalidConfig(
                    "impact seed strategy requires an impact event".to_string(),
                ));
            }
        };

        let relaxation = if config.relax_seeds {
            Some(relax_seeds_with_options(
                mesh.vertices(),
                &initial_seeds,
                LloydOptions {
                    max_iterations: config.lloyd_max_iterations,
                    strategy: config.execution,
                },
            )?)
        } else {
            None
        };
        let seeds = relaxation
            .as_ref()
            .map_or_else(|| initial_seeds.clone(), |r| r.seeds.clone());

        let distances = compute_distances_with_options(
            &graph,
            &seeds,
            DistanceOptions {
                path_window: config.path_window,
                strategy: config.execution,
            },
        );
        let mut regions = distances.region_assignment(&seeds);
        regions.resize(mesh.vertex_count(), None);

        let split = split_mesh_with_options(
            mesh,
            &distances,
            &seeds,
            SplitOptions {
                strategy: config.execution,
                metric: config.split_metric,
                close_fragments: config.close_fragments,
            },
        )?;

        info!(
            "Fracture ({} seeds, {}): {} fragments from {} tetrahedra, {:?}",
            config.seed_strategy.name(),
            seeds.len(),
            split.fragments.len(),
            mesh.tetrahedron_count(),
            start.elapsed()
        );

        Ok(Self {
            config,
            graph,
            energy,
            initial_seeds,
            relaxation,
            seeds,
            distances,
            regions,
            split,
            spatial_index: SpatialIndex::new(mesh.vertices()),
        })
    }

    /// Get the configuration used for this pass
    #[inline]
    pub fn config(&self) -> &FractureConfig {
        &self.config
    }

    /// Edge graph the distances were computed on
    #[inline]
    pub fn graph(&self) -> &WeightedGraph {
        &self.graph
    }

    /// Energy per vertex id, if an impact was given
    pub fn energy(&self) -> Option<&[f64]> {
        self.energy.as_deref()
    }

    /// Seeds as chosen, before relaxation
    #[inline]
    pub fn initial_seeds(&self) -> &[VertexId] {
        &self.initial_seeds
    }

    /// Lloyd relaxation outcome, if relaxation was enabled
    pub fn relaxation(&self) -> Option<&Relaxation> {
        self.relaxation.as_ref()
    }

    /// Final seeds; fragment `i` grows from `seeds()[i]`
    #[inline]
    pub fn seeds(&self) -> &[VertexId] {
        &self.seeds
    }

    /// Distance field from the final seeds
    #[inline]
    pub fn distances(&self) -> &DistanceField {
        &self.distances
    }

    /// Region of every mesh vertex
    #[inline]
    pub fn regions(&self) -> &[Option<usize>] {
        &self.regions
    }

    /// Region of one vertex
    ///
    /// Returns `None` for unreached or unknown vertices.
    pub fn region_of(&self, vertex: VertexId) -> Option<usize> {
        self.regions.get(vertex as usize).copied().flatten()
    }

    /// Full splitting output
    #[inline]
    pub fn split(&self) -> &SplitResult {
        &self.split
    }

    /// One fragment per seed
    #[inline]
    pub fn fragments(&self) -> &[FragmentMesh] {
        &self.split.fragments
    }

    /// Get the number of fragments
    #[inline]
    pub fn fragment_count(&self) -> usize {
        self.split.fragments.len()
    }

    /// Region of the vertex nearest `position`
    ///
    /// Useful for mapping a hit point back to the fragment it landed in.
    ///
    /// # Example
    ///
    /// ```
    /// # use voronoi_fracture::*;
    /// # use glam::DVec3;
    /// let mesh = TetMesh::grid(2, 1.0);
    /// let config = FractureConfigBuilder::new()
    ///     .rng_seed(1)
    ///     .seed_strategy(SeedStrategy::Random)
    ///     .seed_count(2)
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    /// let fracture = Fracture::compute(config, &mesh, None).unwrap();
    ///
    /// let seed = fracture.seeds()[0];
    /// let position = mesh.position(seed).unwrap() + DVec3::splat(0.01);
    /// assert_eq!(fracture.find_region_at(position), Some(0));
    /// ```
    pub fn find_region_at(&self, position: DVec3) -> Option<usize> {
        self.region_of(self.spatial_index.find_nearest(position)?)
    }
}

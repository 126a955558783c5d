//! Voronoi-based fracture of tetrahedral meshes
//!
//! A standalone library for breaking a tetrahedral volume mesh into
//! fragments around a set of seed vertices, suitable for real-time
//! destruction effects in any game engine (Bevy, Godot, etc.)
//!
//! Regions grow from the seeds under a geodesic distance that prefers
//! straight paths and follows impact energy, rather than plain Euclidean
//! distance. Tetrahedra straddling a region boundary are cut into pieces so
//! that every fragment gets its own surface mesh.
//!
//! # Quick Start
//!
//! ```rust
//! use voronoi_fracture::*;
//!
//! // A 4x4x4 block of cubes, each cut into six tetrahedra
//! let mesh = TetMesh::grid(4, 0.25);
//!
//! // Strike one of its outer triangles
//! let (_, triangle) = mesh.boundary_faces()[0];
//! let impact = ImpactEvent::new(100.0, triangle);
//!
//! let config = FractureConfigBuilder::new()
//!     .rng_seed(42)
//!     .seed_count(6).unwrap()
//!     .build().unwrap();
//!
//! let fracture = Fracture::compute(config, &mesh, Some(impact)).unwrap();
//! for fragment in fracture.fragments() {
//!     let render = fragment.to_mesh_data();
//!     println!("{} triangles", render.triangle_count());
//! }
//! ```
//!
//! # Stages
//!
//! Each stage is usable on its own:
//!
//! - [`WeightedGraph`] / [`TetMesh::to_graph`]: the vertex graph
//! - [`propagate_energy`]: impact energy spread over the graph
//! - [`random_seeds`], [`impact_seeds`]: initial seeds
//! - [`relax_seeds`]: Lloyd relaxation of the seeds
//! - [`compute_distances`]: multi-source corrected distance field
//! - [`split_mesh`]: tetrahedron splitting and fragment assembly
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-vertex lookups using KD-tree
//! - `serde`: Enables serialization support for configuration and results

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod graph;
pub mod tet;
pub mod distance;
pub mod seeding;
pub mod spatial;
pub mod split;
pub mod mesh;
pub mod fracture;

// Re-export core types for convenience
pub use error::{FractureError, Result};
pub use config::{ExecutionStrategy, FractureConfig, FractureConfigBuilder, SeedStrategy, MAX_PATH_WINDOW};
pub use graph::{Link, VertexId, WeightedGraph};
pub use tet::{TetMesh, Tetrahedron};
pub use distance::{compute_distances, compute_distances_with_options, DistanceEntry, DistanceField, DistanceOptions};
pub use seeding::{
    impact_seeds, propagate_energy, random_seeds, relax_seed_points, relax_seeds,
    relax_seeds_with_options, ImpactEvent, LloydOptions, Relaxation,
};
pub use spatial::SpatialIndex;
pub use split::{
    split_mesh, split_mesh_with_options, FragmentMesh, SplitCase, SplitMetric, SplitOptions,
    SplitResult, SubTetrahedron,
};
pub use mesh::MeshData;
pub use fracture::Fracture;

// Re-export glam::DVec3 for convenience
pub use glam::DVec3;

//! Seed selection, impact energy and Lloyd relaxation

pub mod energy;
pub mod lloyd;
pub mod seeds;

pub use energy::{propagate_energy, ImpactEvent, DEFAULT_ENERGY_DAMPING};
pub use lloyd::{
    assign_regions, compute_centroids, lloyd_step, relax_seed_points, relax_seeds,
    relax_seeds_with_options, reseed, LloydOptions, Relaxation,
};
pub use seeds::{impact_seeds, random_seeds};

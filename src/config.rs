//! Fracture configuration and builder
//!
//! This module provides configuration types for a deterministic fracture pass.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{FractureError, Result};
use crate::split::SplitMetric;

/// Largest accepted path window for the curvature correction
pub const MAX_PATH_WINDOW: usize = 32;

/// How independent units of work are scheduled
///
/// Both strategies produce the same partition for the same input; the
/// sequential one exists for debugging and for single-threaded hosts.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run every unit of work on the calling thread
    Sequential,
    /// Spread units of work over the rayon worker pool
    #[default]
    Parallel,
}

/// How the initial seed set is chosen
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedStrategy {
    /// Uniformly random vertices over the whole mesh
    Random,
    /// Vertices around the struck triangle, growing outward layer by layer
    #[default]
    Impact,
}

impl SeedStrategy {
    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            SeedStrategy::Random => "Random",
            SeedStrategy::Impact => "Impact",
        }
    }
}

/// Configuration for one fracture pass
///
/// The same configuration, mesh, and impact always produce the same fragments.
///
/// # Example
///
/// ```rust
/// use voronoi_fracture::*;
///
/// let config = FractureConfigBuilder::new()
///     .rng_seed(42)
///     .seed_count(6)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: FractureConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractureConfig {
    /// Random seed for seed selection
    pub rng_seed: u64,

    /// Number of fragments (seeds) to produce
    pub seed_count: usize,

    /// How the initial seeds are picked
    pub seed_strategy: SeedStrategy,

    /// Whether to run Lloyd relaxation on the initial seeds
    pub relax_seeds: bool,

    /// Upper bound on Lloyd iterations
    ///
    /// Relaxation normally stops once the seeds stop moving; the cap guards
    /// against configurations that oscillate forever.
    pub lloyd_max_iterations: usize,

    /// Number of trailing path edges inspected by the curvature correction
    ///
    /// - 0 or 1: plain length + weight shortest paths
    /// - 3: default, penalizes bends over the last two joints
    pub path_window: usize,

    /// Distance damping applied while spreading impact energy
    pub energy_damping: f64,

    /// How split points are placed along cut edges
    pub split_metric: SplitMetric,

    /// Whether interior tetrahedra contribute faces so fragments are closed
    pub close_fragments: bool,

    /// Scheduling for the parallel stages
    pub execution: ExecutionStrategy,
}

impl Default for FractureConfig {
    fn default() -> Self {
        FractureConfigBuilder::new().rng_seed(0).build_unchecked()
    }
}

/// Builder for creating [`FractureConfig`] with validation
///
/// # Example
///
/// ```rust
/// use voronoi_fracture::*;
///
/// let config = FractureConfigBuilder::new()
///     .rng_seed(7)
///     .seed_strategy(SeedStrategy::Random)
///     .seed_count(4)
///     .unwrap()
///     .path_window(2)
///     .unwrap()
///     .execution(ExecutionStrategy::Sequential)
///     .build()
///     .unwrap();
/// assert_eq!(config.seed_count, 4);
/// ```
#[derive(Debug, Clone)]
pub struct FractureConfigBuilder {
    rng_seed: Option<u64>,
    seed_count: usize,
    seed_strategy: SeedStrategy,
    relax_seeds: bool,
    lloyd_max_iterations: usize,
    path_window: usize,
    energy_damping: f64,
    split_metric: SplitMetric,
    close_fragments: bool,
    execution: ExecutionStrategy,
}

impl FractureConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - rng_seed: Random (generated from thread_rng)
    /// - seed_count: 8
    /// - seed_strategy: Impact
    /// - relax_seeds: true
    /// - lloyd_max_iterations: 64
    /// - path_window: 3
    /// - energy_damping: 0.01
    /// - split_metric: Euclidean
    /// - close_fragments: true
    /// - execution: Parallel
    pub fn new() -> Self {
        Self {
            rng_seed: None,
            seed_count: 8,
            seed_strategy: SeedStrategy::default(),
            relax_seeds: true,
            lloyd_max_iterations: 64,
            path_window: 3,
            energy_damping: 0.01,
            split_metric: SplitMetric::default(),
            close_fragments: true,
            execution: ExecutionStrategy::default(),
        }
    }

    /// Set the random seed used for seed selection
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Set the number of fragments
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `count` is zero
    pub fn seed_count(mut self, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(FractureError::InvalidConfig(
                "seed count must be at least 1".to_string(),
            ));
        }
        self.seed_count = count;
        Ok(self)
    }

    /// Set how initial seeds are chosen
    pub fn seed_strategy(mut self, strategy: SeedStrategy) -> Self {
        self.seed_strategy = strategy;
        self
    }

    /// Enable or disable Lloyd relaxation
    pub fn relax_seeds(mut self, relax: bool) -> Self {
        self.relax_seeds = relax;
        self
    }

    /// Set the Lloyd iteration cap
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `iterations` is zero
    pub fn lloyd_max_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations == 0 {
            return Err(FractureError::InvalidConfig(
                "Lloyd iteration cap must be at least 1".to_string(),
            ));
        }
        self.lloyd_max_iterations = iterations;
        Ok(self)
    }

    /// Set the curvature-correction path window
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `window` exceeds [`MAX_PATH_WINDOW`]
    pub fn path_window(mut self, window: usize) -> Result<Self> {
        if window > MAX_PATH_WINDOW {
            return Err(FractureError::InvalidConfig(format!(
                "path window must be <= {} (got {})",
                MAX_PATH_WINDOW, window
            )));
        }
        self.path_window = window;
        Ok(self)
    }

    /// Set the energy damping factor
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `damping` is negative or not finite
    pub fn energy_damping(mut self, damping: f64) -> Result<Self> {
        if !damping.is_finite() || damping < 0.0 {
            return Err(FractureError::InvalidConfig(format!(
                "energy damping must be finite and >= 0 (got {})",
                damping
            )));
        }
        self.energy_damping = damping;
        Ok(self)
    }

    /// Set how split points are placed along cut edges
    pub fn split_metric(mut self, metric: SplitMetric) -> Self {
        self.split_metric = metric;
        self
    }

    /// Whether interior tetrahedra contribute faces
    pub fn close_fragments(mut self, close: bool) -> Self {
        self.close_fragments = close;
        self
    }

    /// Set the scheduling strategy
    pub fn execution(mut self, execution: ExecutionStrategy) -> Self {
        self.execution = execution;
        self
    }

    /// Build the configuration
    ///
    /// If no RNG seed was provided, generates a random one using thread_rng.
    pub fn build(self) -> Result<FractureConfig> {
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> FractureConfig {
        FractureConfig {
            rng_seed: self.rng_seed.unwrap_or_else(rand::random),
            seed_count: self.seed_count,
            seed_strategy: self.seed_strategy,
            relax_seeds: self.relax_seeds,
            lloyd_max_iterations: self.lloyd_max_iterations,
            path_window: self.path_window,
            energy_damping: self.energy_damping,
            split_metric: self.split_metric,
            close_fragments: self.close_fragments,
            execution: self.execution,
        }
    }
}

impl Default for FractureConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = FractureConfigBuilder::new().rng_seed(1).build().unwrap();
        assert_eq!(config.seed_count, 8);
        assert_eq!(config.seed_strategy, SeedStrategy::Impact);
        assert!(config.relax_seeds);
        assert_eq!(config.lloyd_max_iterations, 64);
        assert_eq!(config.path_window, 3);
        assert_eq!(config.energy_damping, 0.01);
        assert_eq!(config.split_metric, SplitMetric::Euclidean);
        assert!(config.close_fragments);
        assert_eq!(config.execution, ExecutionStrategy::Parallel);
    }

    #[test]
    fn test_builder_custom() {
        let config = FractureConfigBuilder::new()
            .rng_seed(42)
            .seed_count(3)
            .unwrap()
            .seed_strategy(SeedStrategy::Random)
            .relax_seeds(false)
            .path_window(0)
            .unwrap()
            .split_metric(SplitMetric::Corrected)
            .execution(ExecutionStrategy::Sequential)
            .build()
            .unwrap();

        assert_eq!(config.rng_seed, 42);
        assert_eq!(config.seed_count, 3);
        assert_eq!(config.seed_strategy, SeedStrategy::Random);
        assert!(!config.relax_seeds);
        assert_eq!(config.path_window, 0);
        assert_eq!(config.split_metric, SplitMetric::Corrected);
        assert_eq!(config.execution, ExecutionStrategy::Sequential);
    }

    #[test]
    fn test_builder_rejects_zero_seeds() {
        assert!(FractureConfigBuilder::new().seed_count(0).is_err());
    }

    #[test]
    fn test_builder_rejects_zero_iteration_cap() {
        assert!(FractureConfigBuilder::new().lloyd_max_iterations(0).is_err());
    }

    #[test]
    fn test_builder_rejects_large_path_window() {
        assert!(FractureConfigBuilder::new()
            .path_window(MAX_PATH_WINDOW + 1)
            .is_err());
        assert!(FractureConfigBuilder::new()
            .path_window(MAX_PATH_WINDOW)
            .is_ok());
    }

    #[test]
    fn test_builder_rejects_bad_damping() {
        assert!(FractureConfigBuilder::new().energy_damping(-0.5).is_err());
        assert!(FractureConfigBuilder::new().energy_damping(f64::NAN).is_err());
        assert!(FractureConfigBuilder::new().energy_damping(0.0).is_ok());
    }

    #[test]
    fn test_default_config_is_deterministic() {
        assert_eq!(FractureConfig::default(), FractureConfig::default());
        assert_eq!(FractureConfig::default().rng_seed, 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = FractureConfigBuilder::new()
            .rng_seed(12345)
            .seed_count(5)
            .unwrap()
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: FractureConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}

//! Spatial indexing for fast position-to-vertex lookups
//!
//! With the `spatial-index` feature the lookup is a KD-tree; without it a
//! linear scan gives the same answers more slowly.

#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

use glam::DVec3;

use crate::graph::VertexId;

/// Nearest-vertex lookup over a fixed point cloud
///
/// Used to snap free points (impact locations, point-based seeds) onto
/// actual mesh vertices.
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[derive(Clone)]
pub struct SpatialIndex {
    #[cfg(feature = "spatial-index")]
    tree: Option<ImmutableKdTree<f64, usize, 3, 32>>,
    #[cfg(not(feature = "spatial-index"))]
    points: Vec<DVec3>,
    len: usize,
}

impl SpatialIndex {
    /// Build a spatial index from vertex positions
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_fracture::*;
    /// use glam::DVec3;
    ///
    /// let points = vec![
    ///     DVec3::new(1.0, 0.0, 0.0),
    ///     DVec3::new(0.0, 1.0, 0.0),
    ///     DVec3::new(0.0, 0.0, 1.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&points);
    /// assert_eq!(index.find_nearest(DVec3::new(1.0, 0.1, 0.0)), Some(0));
    /// ```
    pub fn new(points: &[DVec3]) -> Self {
        #[cfg(feature = "spatial-index")]
        {
            let coords: Vec<[f64; 3]> = points.iter().map(|p| p.to_array()).collect();
            Self {
                tree: (!coords.is_empty()).then(|| ImmutableKdTree::new_from_slice(&coords)),
                len: points.len(),
            }
        }
        #[cfg(not(feature = "spatial-index"))]
        {
            Self {
                points: points.to_vec(),
                len: points.len(),
            }
        }
    }

    /// Number of indexed points
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Vertex nearest to `position`, `None` for an empty index
    pub fn find_nearest(&self, position: DVec3) -> Option<VertexId> {
        #[cfg(feature = "spatial-index")]
        {
            let result = self
                .tree
                .as_ref()?
                .nearest_one::<SquaredEuclidean>(&position.to_array());
            Some(result.item as VertexId)
        }
        #[cfg(not(feature = "spatial-index"))]
        {
            self.points
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    a.distance_squared(position)
                        .total_cmp(&b.distance_squared(position))
                })
                .map(|(i, _)| i as VertexId)
        }
    }
}

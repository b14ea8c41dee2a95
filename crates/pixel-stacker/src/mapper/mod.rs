//! Nearest-combination lookup.
//!
//! A [`ColorMapper`] is seeded once with the palette's valid combinations
//! and then answers read-only queries from any number of threads. Two
//! implementations share identical results:
//!
//! - [`KdTreeMapper`]: balanced 3-d tree, logarithmic queries.
//! - [`LinearScanMapper`]: exhaustive scan, the reference the tree is
//!   checked against.
//!
//! Ties between equally distant combinations always go to the combination
//! listed first.

mod kdtree;
mod metric;

use std::sync::Arc;

use crate::color::Rgba;
use crate::palette::{Combination, MaterialPalette};

use kdtree::KdTree;
use metric::distance_squared;

pub use metric::ColorMetric;

/// Mapper misuse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapperError {
    #[error("color mapper queried before being seeded")]
    NotSeeded,
}

/// Nearest-match search over a combination set.
///
/// Seeding takes `&mut self`; queries take `&self`, so a seeded mapper can be
/// shared across rendering threads without locks.
pub trait ColorMapper: Send + Sync {
    /// Replace the search space with `combinations`.
    ///
    /// `palette` must be the palette the combinations were built from.
    fn set_seed_data(
        &mut self,
        combinations: Arc<[Combination]>,
        palette: &MaterialPalette,
        is_side_view: bool,
    );

    fn is_seeded(&self) -> bool;

    /// The combination whose effective color is closest to `color`.
    ///
    /// # Errors
    ///
    /// [`MapperError::NotSeeded`] before [`set_seed_data`](Self::set_seed_data)
    /// was called with a non-empty set.
    fn find_nearest(&self, color: Rgba) -> Result<Combination, MapperError>;
}

/// State shared by both mappers once seeded.
#[derive(Debug, Clone)]
struct Seed {
    combinations: Arc<[Combination]>,
    is_side_view: bool,
}

fn log_seeded(kind: &str, seed: &Seed, palette: &MaterialPalette, metric: ColorMetric) {
    tracing::debug!(
        mapper = kind,
        combinations = seed.combinations.len(),
        materials = palette.len(),
        side_view = seed.is_side_view,
        ?metric,
        "Color mapper seeded"
    );
}

/// [`ColorMapper`] backed by a k-d tree.
#[derive(Debug, Clone, Default)]
pub struct KdTreeMapper {
    metric: ColorMetric,
    seed: Option<Seed>,
    tree: KdTree,
}

impl KdTreeMapper {
    pub fn new(metric: ColorMetric) -> Self {
        Self {
            metric,
            seed: None,
            tree: KdTree::default(),
        }
    }

    #[inline]
    pub fn metric(&self) -> ColorMetric {
        self.metric
    }
}

impl ColorMapper for KdTreeMapper {
    fn set_seed_data(
        &mut self,
        combinations: Arc<[Combination]>,
        palette: &MaterialPalette,
        is_side_view: bool,
    ) {
        let metric = self.metric;
        self.tree = KdTree::build(combinations.iter().map(|c| metric.embed(c.color)));
        let seed = Seed {
            combinations,
            is_side_view,
        };
        log_seeded("kd_tree", &seed, palette, metric);
        self.seed = (!seed.combinations.is_empty()).then_some(seed);
    }

    fn is_seeded(&self) -> bool {
        self.seed.is_some()
    }

    fn find_nearest(&self, color: Rgba) -> Result<Combination, MapperError> {
        let seed = self.seed.as_ref().ok_or(MapperError::NotSeeded)?;
        let index = self
            .tree
            .nearest(self.metric.embed(color.to_srgb()))
            .ok_or(MapperError::NotSeeded)?;
        Ok(seed.combinations[index])
    }
}

/// [`ColorMapper`] that compares against every combination.
#[derive(Debug, Clone, Default)]
pub struct LinearScanMapper {
    metric: ColorMetric,
    seed: Option<Seed>,
    points: Vec<[f32; 3]>,
}

impl LinearScanMapper {
    pub fn new(metric: ColorMetric) -> Self {
        Self {
            metric,
            seed: None,
            points: Vec::new(),
        }
    }
}

impl ColorMapper for LinearScanMapper {
    fn set_seed_data(
        &mut self,
        combinations: Arc<[Combination]>,
        palette: &MaterialPalette,
        is_side_view: bool,
    ) {
        let metric = self.metric;
        self.points = combinations.iter().map(|c| metric.embed(c.color)).collect();
        let seed = Seed {
            combinations,
            is_side_view,
        };
        log_seeded("linear_scan", &seed, palette, metric);
        self.seed = (!seed.combinations.is_empty()).then_some(seed);
    }

    fn is_seeded(&self) -> bool {
        self.seed.is_some()
    }

    fn find_nearest(&self, color: Rgba) -> Result<Combination, MapperError> {
        let seed = self.seed.as_ref().ok_or(MapperError::NotSeeded)?;
        let query = self.metric.embed(color.to_srgb());

        let mut best_idx = 0;
        let mut best_dist = f32::INFINITY;
        for (i, &point) in self.points.iter().enumerate() {
            let dist = distance_squared(point, query);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }
        Ok(seed.combinations[best_idx])
    }
}

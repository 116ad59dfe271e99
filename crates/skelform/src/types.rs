//! Basic placement types and tunables shared by the pipeline stages.
//!
//! - `SolveCfg`: centralizes iteration caps, padding, and the unit extent.
//! - `PlacementBox`: axis-aligned feasible rectangle `[x0,x1]×[y0,y1]` of one node.
//! - `PointMap`: node id → coordinate, the pipeline's output.
//!
//! Code cross-refs: `solver::{place, recompute_boxes}`, `side::refine`

use std::collections::BTreeMap;

use nalgebra::Vector2;
use serde::Serialize;

/// Node identifier as declared in the spec.
pub type NodeId = String;

/// Pipeline configuration (caps and paddings).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SolveCfg {
    /// Dequeue cap for the placement loop; nodes left over stay unplaced.
    pub max_iterations: usize,
    /// Fraction of each interval trimmed from both ends before sampling.
    pub padding_frac: f64,
    /// Rejection-sampling attempts inside a refined polygon before the centroid fallback.
    pub max_rejection_attempts: usize,
    /// Width synthesized for an interval bounded on one side only.
    pub unit_extent: f64,
}

impl Default for SolveCfg {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            padding_frac: 0.1,
            max_rejection_attempts: 1000,
            unit_extent: 1.0,
        }
    }
}

/// Axis-aligned rectangle `[x0, x1] × [y0, y1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementBox {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl PlacementBox {
    #[inline]
    pub fn new(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        Self { x0, x1, y0, y1 }
    }

    /// The default search space `[0,1]×[0,1]`.
    #[inline]
    pub fn unit() -> Self {
        Self::new(0.0, 1.0, 0.0, 1.0)
    }

    /// Box of half-width `half` centered on `p`.
    #[inline]
    pub fn centered(p: Vector2<f64>, half: f64) -> Self {
        Self::new(p.x - half, p.x + half, p.y - half, p.y + half)
    }

    /// Corners in the order `(x0,y0) (x1,y0) (x1,y1) (x0,y1)`.
    pub fn corners(&self) -> [Vector2<f64>; 4] {
        [
            Vector2::new(self.x0, self.y0),
            Vector2::new(self.x1, self.y0),
            Vector2::new(self.x1, self.y1),
            Vector2::new(self.x0, self.y1),
        ]
    }

    /// Closed containment with slack `eps` (positive enlarges).
    #[inline]
    pub fn contains_eps(&self, p: Vector2<f64>, eps: f64) -> bool {
        p.x >= self.x0 - eps && p.x <= self.x1 + eps && p.y >= self.y0 - eps && p.y <= self.y1 + eps
    }

    /// Shrink both intervals by `frac` of their width on each end.
    pub fn padded(&self, frac: f64) -> Self {
        let px = (self.x1 - self.x0) * frac;
        let py = (self.y1 - self.y0) * frac;
        Self::new(self.x0 + px, self.x1 - px, self.y0 + py, self.y1 - py)
    }

    /// `true` if `self` lies inside `outer` (within `eps`).
    pub fn is_within_eps(&self, outer: &PlacementBox, eps: f64) -> bool {
        self.x0 >= outer.x0 - eps
            && self.x1 <= outer.x1 + eps
            && self.y0 >= outer.y0 - eps
            && self.y1 <= outer.y1 + eps
    }
}

/// Final coordinates per node. Ordered by id so iteration and serialization are stable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointMap {
    points: BTreeMap<NodeId, Vector2<f64>>,
}

impl PointMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<Vector2<f64>> {
        self.points.get(id).copied()
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.points.contains_key(id)
    }

    #[inline]
    pub fn insert(&mut self, id: impl Into<NodeId>, p: Vector2<f64>) {
        self.points.insert(id.into(), p);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Vector2<f64>)> + '_ {
        self.points.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Min/max over all coordinates, or `None` when empty. Renderers scale from this.
    pub fn extent(&self) -> Option<PlacementBox> {
        let mut it = self.points.values();
        let first = it.next()?;
        let init = PlacementBox::new(first.x, first.x, first.y, first.y);
        Some(it.fold(init, |b, p| {
            PlacementBox::new(b.x0.min(p.x), b.x1.max(p.x), b.y0.min(p.y), b.y1.max(p.y))
        }))
    }
}

//! End-to-end solve: sanitize → close → place → recompute → refine.
//!
//! Each call owns its workspace; nothing is cached across calls. The sampler is
//! the only source of non-determinism.

use std::collections::BTreeMap;

use nalgebra::Vector2;

use crate::constraint::PositionConstraint;
use crate::sampler::Sampler;
use crate::side::{self, SideOutcome};
use crate::solver::{self, ObligationTable};
use crate::types::{NodeId, PlacementBox, PointMap, SolveCfg};
use crate::validate::{self, Sanitized, Spec};

/// Pipeline result plus diagnostics.
#[derive(Clone, Debug, Default)]
pub struct Solution {
    pub points: PointMap,
    /// Feasible rectangles after refinement.
    pub boxes: BTreeMap<NodeId, PlacementBox>,
    /// Raw position constraints implied by longer chains.
    pub redundant: Vec<PositionConstraint>,
    /// Nodes left over by the iteration cap.
    pub unplaced: Vec<NodeId>,
    /// One entry per sanitized side constraint, in order.
    pub side_outcomes: Vec<SideOutcome>,
}

impl Solution {
    /// Resolve comma-separated links into point sequences, skipping ids without a point.
    pub fn polylines<'a, I>(&self, links: I) -> Vec<Vec<Vector2<f64>>>
    where
        I: IntoIterator<Item = &'a String>,
    {
        links
            .into_iter()
            .map(|link| link.split(',').filter_map(|id| self.points.get(id)).collect::<Vec<_>>())
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Sanitize `spec` and solve it.
pub fn solve<S: Sampler + ?Sized>(spec: &Spec, sampler: &mut S, cfg: &SolveCfg) -> Solution {
    let sanitized = validate::sanitize(spec);
    solve_sanitized(&sanitized, sampler, cfg)
}

/// Solve an already sanitized spec.
pub fn solve_sanitized<S: Sampler + ?Sized>(
    spec: &Sanitized,
    sampler: &mut S,
    cfg: &SolveCfg,
) -> Solution {
    let table = ObligationTable::build(&spec.position);
    let mut placement = solver::place(&spec.nodes, &table, sampler, cfg);
    solver::recompute_boxes(&mut placement, &table, cfg);
    let side_outcomes = side::refine(&mut placement, &spec.side, sampler, cfg);
    tracing::debug!(
        placed = placement.points.len(),
        unplaced = placement.unplaced.len(),
        side = side_outcomes.len(),
        "solved"
    );
    Solution {
        points: placement.points,
        boxes: placement.boxes,
        redundant: spec.redundant.clone(),
        unplaced: placement.unplaced,
        side_outcomes,
    }
}

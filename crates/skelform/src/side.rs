//! Half-plane ("side") refinement of placed points.
//!
//! Constraints are applied strictly in input order. For a violated constraint
//! the node's rectangle is clipped against the line, a new point is drawn
//! inside the clipped polygon, and the rectangle shrinks to the polygon's
//! bounding box so later constraints on the same node compose. Infeasible or
//! degenerate clips leave the point untouched.
//!
//! A later constraint may undo an earlier one on the same point; no
//! re-checking pass is done.

use crate::constraint::SideConstraint;
use crate::geom::{clip_box, to_left};
use crate::sampler::Sampler;
use crate::solver::Placement;
use crate::types::SolveCfg;

/// Outcome of one side constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SideOutcome {
    /// Already on the required side.
    Satisfied,
    /// Point resampled inside the clipped region.
    Moved,
    /// Rectangle lies entirely on the wrong side.
    Infeasible,
    /// Clip left fewer than 3 vertices.
    Degenerate,
    /// A referenced node has no coordinate.
    Missing,
}

/// Apply all side constraints in order; returns one outcome per constraint.
pub fn refine<S: Sampler + ?Sized>(
    placement: &mut Placement,
    constraints: &[SideConstraint],
    sampler: &mut S,
    cfg: &SolveCfg,
) -> Vec<SideOutcome> {
    constraints
        .iter()
        .map(|c| {
            let outcome = apply(placement, c, sampler, cfg);
            tracing::debug!(constraint = %c, outcome = ?outcome, "side constraint");
            outcome
        })
        .collect()
}

fn apply<S: Sampler + ?Sized>(
    placement: &mut Placement,
    c: &SideConstraint,
    sampler: &mut S,
    cfg: &SolveCfg,
) -> SideOutcome {
    let pts = &placement.points;
    let (Some(p), Some(a), Some(b)) = (
        pts.get(&c.point),
        pts.get(&c.line_start),
        pts.get(&c.line_end),
    ) else {
        return SideOutcome::Missing;
    };
    if to_left(p, a, b) {
        return SideOutcome::Satisfied;
    }
    let Some(bb) = placement.boxes.get(&c.point).copied() else {
        return SideOutcome::Missing;
    };
    if !bb.corners().iter().any(|&q| to_left(q, a, b)) {
        return SideOutcome::Infeasible;
    }
    let Some(poly) = clip_box(&bb, a, b) else {
        return SideOutcome::Degenerate;
    };
    let (Some(q), Some(shrunk)) = (
        poly.sample(sampler, cfg.max_rejection_attempts),
        poly.bounding_box(),
    ) else {
        return SideOutcome::Degenerate;
    };
    tracing::debug!(node = %c.point, x = q.x, y = q.y, verts = poly.len(), "resampled in clipped box");
    placement.points.insert(c.point.clone(), q);
    placement.boxes.insert(c.point.clone(), shrunk);
    SideOutcome::Moved
}

//! Bounding-box placement from position constraints.
//!
//! Model
//! - Every constraint `s > t` gives `s` a lower bound at `t` and `t` an upper
//!   bound at `s` on that axis (an `Obligation` on each endpoint).
//! - Nodes are placed once each, in FIFO order of first appearance after
//!   sorting constraints by source id. A node's interval is narrowed by its
//!   already-placed neighbors, padded, and sampled uniformly.
//! - After placement, `recompute_boxes` rebuilds each rectangle from the final
//!   coordinates of all neighbors; side refinement searches inside it.
//!
//! Code cross-refs: `closure::infer` (feeds the closed set), `side::refine`

use std::collections::{BTreeMap, HashMap, VecDeque};

use nalgebra::Vector2;

use crate::constraint::{Axis, PositionConstraint};
use crate::sampler::Sampler;
use crate::types::{NodeId, PlacementBox, PointMap, SolveCfg};

/// Which side of the node a neighbor bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Node must be greater than the neighbor.
    Lower,
    /// Node must be less than the neighbor.
    Upper,
}

/// One bound a node owes to a neighbor on one axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Obligation {
    pub neighbor: NodeId,
    pub axis: Axis,
    pub bound: Bound,
}

/// Per-node obligations plus the placement queue order.
#[derive(Clone, Debug, Default)]
pub struct ObligationTable {
    order: Vec<NodeId>,
    by_node: HashMap<NodeId, Vec<Obligation>>,
}

impl ObligationTable {
    /// Build from a (closed) constraint set; sorting by source id is stable.
    pub fn build(constraints: &[PositionConstraint]) -> Self {
        let mut sorted: Vec<&PositionConstraint> = constraints.iter().collect();
        sorted.sort_by(|a, b| a.source.cmp(&b.source));
        let mut table = Self::default();
        for c in sorted {
            table.push(&c.source, Obligation {
                neighbor: c.target.clone(),
                axis: c.axis,
                bound: Bound::Lower,
            });
            table.push(&c.target, Obligation {
                neighbor: c.source.clone(),
                axis: c.axis,
                bound: Bound::Upper,
            });
        }
        table
    }

    fn push(&mut self, id: &str, ob: Obligation) {
        match self.by_node.get_mut(id) {
            Some(list) => list.push(ob),
            None => {
                self.order.push(id.to_string());
                self.by_node.insert(id.to_string(), vec![ob]);
            }
        }
    }

    /// Nodes in queue order.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    pub fn get(&self, id: &str) -> &[Obligation] {
        self.by_node.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_node.contains_key(id)
    }
}

/// Placement state carried through recomputation and refinement.
#[derive(Clone, Debug, Default)]
pub struct Placement {
    pub points: PointMap,
    pub boxes: BTreeMap<NodeId, PlacementBox>,
    /// Nodes still queued when the iteration cap was hit.
    pub unplaced: Vec<NodeId>,
}

/// Open interval accumulator; infinities mean "unbounded".
#[derive(Clone, Copy, Debug)]
struct Bounds {
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
}

impl Bounds {
    fn tighten(obligations: &[Obligation], points: &PointMap) -> Self {
        let mut b = Bounds {
            x0: f64::NEG_INFINITY,
            x1: f64::INFINITY,
            y0: f64::NEG_INFINITY,
            y1: f64::INFINITY,
        };
        for ob in obligations {
            let Some(p) = points.get(&ob.neighbor) else {
                continue;
            };
            match (ob.axis, ob.bound) {
                (Axis::Horizontal, Bound::Lower) => b.x0 = b.x0.max(p.x),
                (Axis::Horizontal, Bound::Upper) => b.x1 = b.x1.min(p.x),
                (Axis::Vertical, Bound::Lower) => b.y0 = b.y0.max(p.y),
                (Axis::Vertical, Bound::Upper) => b.y1 = b.y1.min(p.y),
            }
        }
        b
    }

    /// Close both axes; `free_x`/`free_y` apply when an axis has no bound at all.
    fn resolve(self, free_x: (f64, f64), free_y: (f64, f64), unit: f64) -> PlacementBox {
        let (x0, x1) = close_interval(self.x0, self.x1, free_x, unit);
        let (y0, y1) = close_interval(self.y0, self.y1, free_y, unit);
        PlacementBox::new(x0, x1, y0, y1)
    }
}

fn close_interval(lo: f64, hi: f64, free: (f64, f64), unit: f64) -> (f64, f64) {
    match (lo.is_finite(), hi.is_finite()) {
        (false, false) => free,
        (false, true) => (hi - unit, hi),
        (true, false) => (lo, lo + unit),
        (true, true) => (lo, hi),
    }
}

/// Place every constrained node, then every declared node without constraints.
///
/// Each node is dequeued once; at most `cfg.max_iterations` dequeues happen and
/// the remainder is reported in `Placement::unplaced`.
pub fn place<S: Sampler + ?Sized>(
    nodes: &[NodeId],
    table: &ObligationTable,
    sampler: &mut S,
    cfg: &SolveCfg,
) -> Placement {
    let mut queue: VecDeque<&str> = table.order().iter().map(String::as_str).collect();
    for id in nodes {
        if !table.contains(id) && !queue.contains(&id.as_str()) {
            queue.push_back(id);
        }
    }

    let mut out = Placement::default();
    let mut iter = 0usize;
    while iter < cfg.max_iterations {
        let Some(next) = queue.pop_front() else {
            break;
        };
        iter += 1;
        let obligations = table.get(next);
        let bb = Bounds::tighten(obligations, &out.points).resolve(
            (0.0, cfg.unit_extent),
            (0.0, cfg.unit_extent),
            cfg.unit_extent,
        );
        let inner = bb.padded(cfg.padding_frac);
        let x = sampler.uniform(inner.x0, inner.x1);
        let y = sampler.uniform(inner.y0, inner.y1);
        tracing::debug!(
            node = next,
            x,
            y,
            x0 = bb.x0,
            x1 = bb.x1,
            y0 = bb.y0,
            y1 = bb.y1,
            obligations = obligations.len(),
            "placed"
        );
        out.points.insert(next, Vector2::new(x, y));
        out.boxes.insert(next.to_string(), bb);
    }
    out.unplaced = queue.into_iter().map(str::to_string).collect();
    if !out.unplaced.is_empty() {
        tracing::warn!(
            unplaced = out.unplaced.len(),
            cap = cfg.max_iterations,
            "iteration cap reached; nodes left unplaced"
        );
    }
    out
}

/// Rebuild each placed node's rectangle from the final neighbor coordinates.
///
/// An axis with no bound gets `[p − 1, p + 1]` around the node's own coordinate.
pub fn recompute_boxes(placement: &mut Placement, table: &ObligationTable, cfg: &SolveCfg) {
    let unit = cfg.unit_extent;
    let mut boxes = BTreeMap::new();
    for (id, p) in placement.points.iter() {
        let around = PlacementBox::centered(p, unit);
        let bb = Bounds::tighten(table.get(id), &placement.points).resolve(
            (around.x0, around.x1),
            (around.y0, around.y1),
            unit,
        );
        boxes.insert(id.to_string(), bb);
    }
    placement.boxes = boxes;
}

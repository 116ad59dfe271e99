//! Transitive closure and redundancy detection for position constraints.
//!
//! Per axis, constraints form a digraph `source → target`. For each node we walk
//! its descendants depth-first and count distinct paths to each one. A raw
//! constraint is redundant iff more than one path connects its endpoints
//! (the direct edge plus at least one longer chain).
//!
//! Path counts are accumulated along a topological order of each source's
//! reachable subgraph and saturate at 2: only "more than one path" matters.
//!
//! Precondition: the per-axis graph is acyclic. Cyclic input is out of contract;
//! the walk still terminates and logs a warning.

use std::collections::{HashMap, HashSet};

use crate::constraint::{Axis, PositionConstraint};

/// Output of `infer`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Closure {
    /// Raw constraints (deduplicated, input order) followed by every implied pair.
    pub closed: Vec<PositionConstraint>,
    /// Raw constraints implied by a longer chain.
    pub redundant: Vec<PositionConstraint>,
}

/// Close both axes; horizontal results come first.
pub fn infer(constraints: &[PositionConstraint]) -> Closure {
    let mut out = Closure::default();
    for axis in [Axis::Horizontal, Axis::Vertical] {
        let raw: Vec<&PositionConstraint> = constraints.iter().filter(|c| c.axis == axis).collect();
        let axis_closure = AxisGraph::new(&raw, axis).close();
        out.closed.extend(axis_closure.closed);
        out.redundant.extend(axis_closure.redundant);
    }
    for c in &out.redundant {
        tracing::warn!(constraint = %c, "{c} is redundant");
    }
    out
}

/// Raw constraints implied by longer chains.
pub fn find_redundant(constraints: &[PositionConstraint]) -> Vec<PositionConstraint> {
    infer(constraints).redundant
}

/// Drop redundant constraints, keeping input order.
pub fn simplify(constraints: &[PositionConstraint]) -> Vec<PositionConstraint> {
    let redundant: HashSet<PositionConstraint> = find_redundant(constraints).into_iter().collect();
    constraints
        .iter()
        .filter(|c| !redundant.contains(*c))
        .cloned()
        .collect()
}

/// Per-axis adjacency with nodes in first-appearance order.
struct AxisGraph<'a> {
    axis: Axis,
    raw: Vec<&'a PositionConstraint>,
    ids: Vec<&'a str>,
    children: Vec<Vec<usize>>,
}

impl<'a> AxisGraph<'a> {
    fn new(constraints: &[&'a PositionConstraint], axis: Axis) -> Self {
        let mut seen: HashSet<&PositionConstraint> = HashSet::new();
        let mut raw = Vec::with_capacity(constraints.len());
        let mut index: HashMap<&'a str, usize> = HashMap::new();
        let mut ids = Vec::new();
        let mut children: Vec<Vec<usize>> = Vec::new();
        let mut intern = |id: &'a str, ids: &mut Vec<&'a str>, children: &mut Vec<Vec<usize>>| {
            *index.entry(id).or_insert_with(|| {
                ids.push(id);
                children.push(Vec::new());
                ids.len() - 1
            })
        };
        for &c in constraints {
            if !seen.insert(c) {
                continue;
            }
            raw.push(c);
            let s = intern(c.source.as_str(), &mut ids, &mut children);
            let t = intern(c.target.as_str(), &mut ids, &mut children);
            children[s].push(t);
        }
        Self {
            axis,
            raw,
            ids,
            children,
        }
    }

    fn close(&self) -> Closure {
        let raw_pairs: HashSet<(&str, &str)> = self
            .raw
            .iter()
            .map(|c| (c.source.as_str(), c.target.as_str()))
            .collect();
        let mut closed: Vec<PositionConstraint> = self.raw.iter().map(|c| (*c).clone()).collect();
        let mut present: HashSet<(&str, &str)> = raw_pairs.clone();
        let mut redundant = Vec::new();

        for s in 0..self.ids.len() {
            let walk = Reach::walk(self, s);
            if walk.cyclic {
                tracing::warn!(node = self.ids[s], axis = ?self.axis, "cycle reachable from node");
            }
            for &t in &walk.preorder {
                if t == s {
                    continue;
                }
                let pair = (self.ids[s], self.ids[t]);
                if raw_pairs.contains(&pair) && walk.paths[t] > 1 {
                    redundant.push(PositionConstraint::new(pair.0, pair.1, self.axis));
                }
                if present.insert(pair) {
                    closed.push(PositionConstraint::new(pair.0, pair.1, self.axis));
                }
            }
        }
        Closure { closed, redundant }
    }
}

/// Reachable set of one source: first-visit order and saturated path counts.
struct Reach {
    preorder: Vec<usize>,
    paths: Vec<u8>,
    cyclic: bool,
}

impl Reach {
    fn walk(g: &AxisGraph<'_>, source: usize) -> Self {
        let n = g.ids.len();
        let mut r = Reach {
            preorder: Vec::new(),
            paths: vec![0; n],
            cyclic: false,
        };
        let mut state = vec![Visit::New; n];
        let mut postorder = Vec::new();
        r.dfs(g, source, &mut state, &mut postorder);

        r.paths[source] = 1;
        for &u in postorder.iter().rev() {
            let pu = r.paths[u];
            if pu == 0 {
                continue;
            }
            for &c in &g.children[u] {
                if c != source {
                    r.paths[c] = r.paths[c].saturating_add(pu).min(2);
                }
            }
        }
        r
    }

    fn dfs(&mut self, g: &AxisGraph<'_>, u: usize, state: &mut [Visit], post: &mut Vec<usize>) {
        state[u] = Visit::Open;
        self.preorder.push(u);
        for &c in &g.children[u] {
            match state[c] {
                Visit::New => self.dfs(g, c, state, post),
                Visit::Open => self.cyclic = true,
                Visit::Done => {}
            }
        }
        state[u] = Visit::Done;
        post.push(u);
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Open,
    Done,
}

#[cfg(test)]
mod tests;

//! Constraint tokens and their parsed forms.
//!
//! Grammar
//! - Horizontal: `s>t` (split at the first `>`), meaning `x(s) > x(t)`.
//! - Vertical: `svt` (single-character ids) or `s v t` (whitespace form),
//!   meaning `y(s) > y(t)` in the raw output space.
//! - Side: `p>a,b`, meaning `p` lies on the left of the directed line `a → b`.
//!
//! Malformed tokens parse to `None`; callers filter them out.

use std::fmt;

use crate::types::NodeId;

/// Spatial axis of a position constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Separator used in the compact token form.
    #[inline]
    pub fn separator(self) -> char {
        match self {
            Axis::Horizontal => '>',
            Axis::Vertical => 'v',
        }
    }
}

/// Ordering `source > target` on one axis.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PositionConstraint {
    pub source: NodeId,
    pub target: NodeId,
    pub axis: Axis,
}

impl PositionConstraint {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, axis: Axis) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            axis,
        }
    }

    #[inline]
    pub fn horizontal(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self::new(source, target, Axis::Horizontal)
    }

    #[inline]
    pub fn vertical(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self::new(source, target, Axis::Vertical)
    }

    /// Parse a single position token; `None` if it matches no form.
    /// A horizontal token holds exactly one `>`.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some((s, t)) = token.split_once('>') {
            let (s, t) = (s.trim(), t.trim());
            if s.is_empty() || t.is_empty() || t.contains('>') {
                return None;
            }
            return Some(Self::horizontal(s, t));
        }
        let fields: Vec<&str> = token.split_whitespace().collect();
        if let [s, "v", t] = fields.as_slice() {
            return Some(Self::vertical(*s, *t));
        }
        let chars: Vec<char> = token.chars().collect();
        if let [s, 'v', t] = chars.as_slice() {
            if !s.is_whitespace() && !t.is_whitespace() {
                return Some(Self::vertical(s.to_string(), t.to_string()));
            }
        }
        None
    }
}

impl fmt::Display for PositionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let compact = self.source.chars().count() == 1 && self.target.chars().count() == 1;
        let sep = self.axis.separator();
        if compact || self.axis == Axis::Horizontal {
            write!(f, "{}{sep}{}", self.source, self.target)
        } else {
            write!(f, "{} {sep} {}", self.source, self.target)
        }
    }
}

/// `point` must lie strictly left of the directed line `line_start → line_end`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SideConstraint {
    pub point: NodeId,
    pub line_start: NodeId,
    pub line_end: NodeId,
}

impl SideConstraint {
    pub fn new(
        point: impl Into<NodeId>,
        line_start: impl Into<NodeId>,
        line_end: impl Into<NodeId>,
    ) -> Self {
        Self {
            point: point.into(),
            line_start: line_start.into(),
            line_end: line_end.into(),
        }
    }

    /// Parse `p>a,b`: exactly one `>`, exactly one `,` after it.
    pub fn parse(token: &str) -> Option<Self> {
        let parts: Vec<&str> = token.split('>').collect();
        let [point, line] = parts.as_slice() else {
            return None;
        };
        let ends: Vec<&str> = line.split(',').collect();
        let [start, end] = ends.as_slice() else {
            return None;
        };
        let (point, start, end) = (point.trim(), start.trim(), end.trim());
        if point.is_empty() || start.is_empty() || end.is_empty() {
            return None;
        }
        Some(Self::new(point, start, end))
    }

    /// Ids referenced by this constraint.
    pub fn ids(&self) -> [&str; 3] {
        [&self.point, &self.line_start, &self.line_end]
    }
}

impl fmt::Display for SideConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}>{},{}", self.point, self.line_start, self.line_end)
    }
}

//! Input spec and its sanitization.
//!
//! `sanitize` never fails: constraints and links that reference undeclared
//! nodes or do not parse are filtered out, then the surviving position
//! constraints are closed (`closure::infer`).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::closure;
use crate::constraint::{PositionConstraint, SideConstraint};
use crate::types::NodeId;

/// Raw constraint token lists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintTokens {
    #[serde(default)]
    pub position: Vec<String>,
    #[serde(default)]
    pub side: Vec<String>,
}

/// Declarative glyph spec, as authored in JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spec {
    /// Glyph label, if any.
    #[serde(default, rename = "char", skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,
    #[serde(default)]
    pub nodes: Vec<NodeId>,
    /// Polylines as comma-separated node ids.
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub constraints: ConstraintTokens,
}

/// Spec after filtering, with parsed and closed constraints.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sanitized {
    pub glyph: Option<String>,
    pub nodes: Vec<NodeId>,
    pub links: Vec<String>,
    /// Closure of the valid position constraints.
    pub position: Vec<PositionConstraint>,
    pub side: Vec<SideConstraint>,
    /// Valid raw position constraints implied by longer chains.
    pub redundant: Vec<PositionConstraint>,
}

/// Filter a raw spec down to what the pipeline can use.
pub fn sanitize(spec: &Spec) -> Sanitized {
    let declared: HashSet<&str> = spec.nodes.iter().map(String::as_str).collect();

    let mut position = Vec::with_capacity(spec.constraints.position.len());
    for token in &spec.constraints.position {
        match PositionConstraint::parse(token) {
            Some(c) if declared.contains(c.source.as_str()) && declared.contains(c.target.as_str()) => {
                position.push(c)
            }
            _ => tracing::debug!(token = token.as_str(), "dropping position constraint"),
        }
    }

    let mut side = Vec::with_capacity(spec.constraints.side.len());
    for token in &spec.constraints.side {
        match SideConstraint::parse(token) {
            Some(c) if c.ids().iter().all(|id| declared.contains(id)) => side.push(c),
            _ => tracing::debug!(token = token.as_str(), "dropping side constraint"),
        }
    }

    let links = spec
        .links
        .iter()
        .map(|link| {
            link.split(',')
                .filter(|id| declared.contains(id))
                .collect::<Vec<_>>()
                .join(",")
        })
        .filter(|link| !link.is_empty())
        .collect();

    let closure = closure::infer(&position);
    Sanitized {
        glyph: spec.glyph.clone(),
        nodes: spec.nodes.clone(),
        links,
        position: closure.closed,
        side,
        redundant: closure.redundant,
    }
}

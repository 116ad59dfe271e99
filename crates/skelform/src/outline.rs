//! Outline → spec conversion.
//!
//! A glyph outline is a set of polylines in concrete coordinates. Every distinct
//! point becomes a node (`a`, `b`, …), every polyline a link, and every pair of
//! nodes contributes one horizontal and one vertical ordering taken from the
//! concrete coordinates. The pairwise set is then minimized with
//! `closure::simplify`, so only the orderings not implied by others remain.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::closure;
use crate::constraint::PositionConstraint;
use crate::validate::{ConstraintTokens, Spec};

/// One glyph drawn as polylines.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub name: String,
    pub paths: Vec<Vec<[f64; 2]>>,
}

/// Node names in assignment order: `a`, `b`, … continuing through Unicode
/// scalars, skipping whitespace and the token separators `>` and `,`.
fn node_names() -> impl Iterator<Item = String> {
    ('a'..=char::MAX)
        .filter(|c| !c.is_whitespace() && !matches!(c, '>' | ','))
        .map(String::from)
}

/// Convert one outline into a minimized spec.
pub fn convert(outline: &Outline) -> Spec {
    let key = |p: &[f64; 2]| (p[0].to_bits(), p[1].to_bits());
    let mut fresh = node_names();
    let mut names: HashMap<(u64, u64), String> = HashMap::new();
    let mut points: Vec<(String, [f64; 2])> = Vec::new();
    for p in outline.paths.iter().flatten() {
        names.entry(key(p)).or_insert_with(|| {
            let name = fresh.next().unwrap_or_else(|| format!("n{}", points.len()));
            points.push((name.clone(), *p));
            name
        });
    }

    let links = outline
        .paths
        .iter()
        .map(|path| {
            path.iter()
                .filter_map(|p| names.get(&key(p)).map(String::as_str))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();

    let mut pairwise = Vec::with_capacity(points.len() * points.len());
    for (i, (a, pa)) in points.iter().enumerate() {
        for (b, pb) in &points[i + 1..] {
            pairwise.push(if pa[0] >= pb[0] {
                PositionConstraint::horizontal(a.as_str(), b.as_str())
            } else {
                PositionConstraint::horizontal(b.as_str(), a.as_str())
            });
            pairwise.push(if pa[1] >= pb[1] {
                PositionConstraint::vertical(a.as_str(), b.as_str())
            } else {
                PositionConstraint::vertical(b.as_str(), a.as_str())
            });
        }
    }
    let minimal = closure::simplify(&pairwise);
    tracing::debug!(
        glyph = outline.name.as_str(),
        nodes = points.len(),
        pairwise = pairwise.len(),
        kept = minimal.len(),
        "converted outline"
    );

    Spec {
        glyph: Some(outline.name.clone()),
        nodes: points.into_iter().map(|(n, _)| n).collect(),
        links,
        constraints: ConstraintTokens {
            position: minimal.iter().map(ToString::to_string).collect(),
            side: Vec::new(),
        },
    }
}

/// Convert a whole font.
pub fn convert_all(font: &[Outline]) -> Vec<Spec> {
    font.iter().map(convert).collect()
}

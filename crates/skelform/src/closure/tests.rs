use super::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn h(s: &str, t: &str) -> PositionConstraint {
    PositionConstraint::horizontal(s, t)
}

fn v(s: &str, t: &str) -> PositionConstraint {
    PositionConstraint::vertical(s, t)
}

fn pairs(cs: &[PositionConstraint]) -> BTreeSet<(String, String, Axis)> {
    cs.iter()
        .map(|c| (c.source.clone(), c.target.clone(), c.axis))
        .collect()
}

/// Full re-walk without memoization: counts every path from each source.
fn naive_redundant(cs: &[PositionConstraint]) -> BTreeSet<(String, String, Axis)> {
    fn walk(
        adj: &HashMap<&str, Vec<&str>>,
        u: &str,
        source: &str,
        counts: &mut HashMap<String, usize>,
    ) {
        if u != source {
            *counts.entry(u.to_string()).or_default() += 1;
        }
        if let Some(cs) = adj.get(u) {
            for c in cs {
                walk(adj, c, source, counts);
            }
        }
    }
    let mut out = BTreeSet::new();
    for axis in [Axis::Horizontal, Axis::Vertical] {
        let raw: BTreeSet<(&str, &str)> = cs
            .iter()
            .filter(|c| c.axis == axis)
            .map(|c| (c.source.as_str(), c.target.as_str()))
            .collect();
        let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
        for &(s, t) in &raw {
            adj.entry(s).or_default().push(t);
        }
        for &s in adj.keys() {
            let mut counts = HashMap::new();
            walk(&adj, s, s, &mut counts);
            for (t, n) in counts {
                if n > 1 && raw.contains(&(s, t.as_str())) {
                    out.insert((s.to_string(), t, axis));
                }
            }
        }
    }
    out
}

#[test]
fn direct_edge_alone_is_not_redundant() {
    let cs = vec![h("a", "b"), h("b", "c")];
    assert!(find_redundant(&cs).is_empty());
}

#[test]
fn two_hop_alternative_flags_direct_edge() {
    let cs = vec![h("a", "b"), h("b", "c"), h("a", "c")];
    assert_eq!(find_redundant(&cs), vec![h("a", "c")]);
    assert_eq!(simplify(&cs), vec![h("a", "b"), h("b", "c")]);
}

#[test]
fn axes_are_independent() {
    // The vertical chain does not make the horizontal edge redundant.
    let cs = vec![h("a", "c"), v("a", "b"), v("b", "c")];
    assert!(find_redundant(&cs).is_empty());
    let closure = infer(&cs);
    assert!(closure.closed.contains(&v("a", "c")));
    assert!(!closure.closed.contains(&h("a", "b")));
}

#[test]
fn closure_adds_every_reachable_pair_after_raw() {
    let cs = vec![h("a", "b"), h("b", "c"), h("c", "d")];
    let closure = infer(&cs);
    assert_eq!(&closure.closed[..3], &cs[..]);
    let expected: BTreeSet<_> = pairs(&[
        h("a", "b"),
        h("a", "c"),
        h("a", "d"),
        h("b", "c"),
        h("b", "d"),
        h("c", "d"),
    ]);
    assert_eq!(pairs(&closure.closed), expected);
    assert_eq!(closure.closed.len(), expected.len());
}

#[test]
fn duplicate_raw_tokens_collapse() {
    let cs = vec![h("a", "b"), h("a", "b")];
    let closure = infer(&cs);
    assert_eq!(closure.closed, vec![h("a", "b")]);
    assert!(closure.redundant.is_empty());
}

#[test]
fn diamond_counts_both_branches() {
    // a→b→d and a→c→d: the pair (a,d) has two paths; raw a>d is redundant.
    let cs = vec![h("a", "b"), h("a", "c"), h("b", "d"), h("c", "d"), h("a", "d")];
    assert_eq!(find_redundant(&cs), vec![h("a", "d")]);
}

#[test]
fn cycle_terminates() {
    let cs = vec![h("a", "b"), h("b", "a")];
    let closure = infer(&cs);
    assert_eq!(pairs(&closure.closed), pairs(&cs));
}

fn dag_strategy() -> impl Strategy<Value = Vec<PositionConstraint>> {
    let names = ["a", "b", "c", "d", "e", "f", "g"];
    prop::collection::vec((0usize..7, 0usize..7, any::<bool>()), 0..18).prop_map(move |edges| {
        edges
            .into_iter()
            .filter(|(i, j, _)| i != j)
            .map(|(i, j, vertical)| {
                let (s, t) = (names[i.min(j)], names[i.max(j)]);
                if vertical {
                    v(s, t)
                } else {
                    h(s, t)
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn matches_naive_traversal(cs in dag_strategy()) {
        prop_assert_eq!(pairs(&find_redundant(&cs)), naive_redundant(&cs));
    }

    #[test]
    fn closure_is_a_fixed_point(cs in dag_strategy()) {
        let once = infer(&cs).closed;
        let twice = infer(&once).closed;
        prop_assert_eq!(pairs(&once), pairs(&twice));
    }

    #[test]
    fn simplify_preserves_reachability(cs in dag_strategy()) {
        let full = pairs(&infer(&cs).closed);
        let minimal = pairs(&infer(&simplify(&cs)).closed);
        prop_assert_eq!(full, minimal);
    }
}

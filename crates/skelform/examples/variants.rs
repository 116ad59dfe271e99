//! Print a few renderings of glyph "A" as point lists.
//!
//! Usage:
//!   cargo run -p skelform --example variants -- 5

use skelform::prelude::*;

fn main() {
    let count: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3);
    let s = |xs: &[&str]| xs.iter().map(|x| x.to_string()).collect::<Vec<_>>();
    let spec = Spec {
        glyph: Some("A".into()),
        nodes: s(&["a", "b", "c", "d", "e"]),
        links: s(&["d,e,a,b,c", "e,b"]),
        constraints: ConstraintTokens {
            position: s(&["avb", "ave", "bvc", "evd", "b>c", "d>e", "evc", "a>b", "e>a", "bvd"]),
            side: Vec::new(),
        },
    };
    let sanitized = sanitize(&spec);
    for r in &sanitized.redundant {
        println!("redundant: {r}");
    }
    for index in 0..count {
        let sol = solve_sanitized(
            &sanitized,
            &mut SeededSampler::new(ReplayToken::new(2025, index)),
            &SolveCfg::default(),
        );
        let pts: Vec<String> = sol
            .points
            .iter()
            .map(|(id, p)| format!("{id}=({:.3}, {:.3})", p.x, p.y))
            .collect();
        println!("variant {index}: {}", pts.join(" "));
    }
}

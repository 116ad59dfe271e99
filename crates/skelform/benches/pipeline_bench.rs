//! Criterion benchmarks for the placement pipeline.
//! Focus: closure on growing chains, full solve of a glyph, side refinement.
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use skelform::closure;
use skelform::side;
use skelform::solver::{self, ObligationTable};
use skelform::prelude::*;

fn chain(n: usize) -> Vec<PositionConstraint> {
    let ids: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
    let mut cs = Vec::new();
    for w in ids.windows(2) {
        cs.push(PositionConstraint::horizontal(w[0].as_str(), w[1].as_str()));
        cs.push(PositionConstraint::vertical(w[0].as_str(), w[1].as_str()));
    }
    cs
}

fn glyph_b() -> Spec {
    let s = |xs: &[&str]| xs.iter().map(|x| x.to_string()).collect::<Vec<_>>();
    Spec {
        glyph: Some("B".into()),
        nodes: s(&["a", "b", "c", "d", "e", "f", "g"]),
        links: s(&["a,b,c,d,e,f,g,d,a"]),
        constraints: ConstraintTokens {
            position: s(&[
                "avb", "bvc", "d>c", "cvd", "dve", "evf", "fvg", "d>g", "a>c", "g>e", "c>b", "e>f",
            ]),
            side: s(&["c>b,d", "f>e,g"]),
        },
    }
}

fn bench_closure(c: &mut Criterion) {
    let mut group = c.benchmark_group("closure");
    for &n in &[4usize, 8, 16, 32] {
        group.bench_with_input(BenchmarkId::new("infer_chain", n), &n, |b, &n| {
            b.iter_batched(|| chain(n), |cs| closure::infer(&cs), BatchSize::SmallInput)
        });
    }
    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    let spec = glyph_b();
    let sanitized = sanitize(&spec);
    let cfg = SolveCfg::default();
    group.bench_function(BenchmarkId::new("glyph", "B"), |b| {
        b.iter_batched(
            || ReplayToken::new(42, 0),
            |mut tok| {
                tok.index = tok.index.wrapping_add(1);
                let _ = solve_sanitized(&sanitized, &mut SeededSampler::new(tok), &cfg);
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function(BenchmarkId::new("sanitize_and_solve", "B"), |b| {
        b.iter(|| solve(&spec, &mut SeededSampler::from_seed(7), &cfg))
    });
    group.finish();
}

fn bench_refine(c: &mut Criterion) {
    let mut group = c.benchmark_group("side");
    let sanitized = sanitize(&glyph_b());
    let cfg = SolveCfg::default();
    let table = ObligationTable::build(&sanitized.position);
    let mut sampler = SeededSampler::from_seed(3);
    let mut placed = solver::place(&sanitized.nodes, &table, &mut sampler, &cfg);
    solver::recompute_boxes(&mut placed, &table, &cfg);
    group.bench_function(BenchmarkId::new("refine", "B"), |b| {
        b.iter_batched(
            || placed.clone(),
            |mut pl| side::refine(&mut pl, &sanitized.side, &mut sampler, &cfg),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_closure, bench_solve, bench_refine);
criterion_main!(benches);

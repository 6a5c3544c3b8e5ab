use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use threes_2x3::board::Board;
use threes_2x3::solver::Solver;
use threes_2x3::state::{with_hint, StateType};

fn bench_construct(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver");
    group.sample_size(10);
    group.bench_function("construct", |bch| bch.iter(|| black_box(Solver::new().stats())));
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let solver = Solver::new();
    let queries: Vec<(Board, StateType)> = (0..6)
        .flat_map(|pos| {
            (1..=3).map(move |hint| {
                let mut b = Board::EMPTY;
                b.place(pos, if hint == 1 { 2 } else { 1 });
                (with_hint(b, hint), StateType::Before)
            })
        })
        .chain((1..=3).map(|hint| (with_hint(Board::EMPTY, hint), StateType::After)))
        .collect();
    c.bench_function("solver/solve", |bch| {
        bch.iter(|| {
            let mut acc = 0.0;
            for (b, kind) in &queries {
                acc += solver.solve(black_box(b), *kind).avg().unwrap_or(0.0);
            }
            black_box(acc)
        })
    });
}

criterion_group!(solver, bench_construct, bench_lookup);
criterion_main!(solver);

use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;
use threes_2x3::bag::TileBag;
use threes_2x3::board::{Board, Move};

fn corpus() -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut bag = TileBag::FULL;
    let mut boards = Vec::new();
    let mut b = Board::EMPTY;
    b.place(0, bag.draw(&mut rng));
    boards.push(b);
    // Derive a variety of densities deterministically
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..32 {
        let dir = seq[i % seq.len()];
        if let Some((nb, _)) = b.shift(dir) {
            b = nb;
            if let Some(&pos) = Board::placement_cells(dir).iter().find(|&&p| b.cell(p) == 0) {
                b.place(pos, bag.draw(&mut rng));
            }
        }
        boards.push(b);
    }
    boards
}

fn bench_slide(c: &mut Criterion) {
    let boards = corpus();
    for dir in Move::ALL {
        c.bench_function(&format!("slide/{dir:?}"), |bch| {
            bch.iter(|| {
                let mut acc = 0u32;
                for &bd in &boards {
                    if let Some((nb, r)) = bd.shift(dir) {
                        acc ^= nb.encode().wrapping_add(r);
                    }
                }
                black_box(acc)
            })
        });
    }
}

fn bench_encode(c: &mut Criterion) {
    let boards = corpus();
    c.bench_function("board/encode", |bch| {
        bch.iter(|| boards.iter().fold(0u32, |acc, b| acc ^ black_box(b).encode()))
    });
}

criterion_group!(board_ops, bench_slide, bench_encode);
criterion_main!(board_ops);

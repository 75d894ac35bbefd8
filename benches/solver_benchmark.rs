//! Performance benchmarks for the combat solver and full games
//!
//! The declaration generators are combinatorial, so the interesting numbers
//! are how quickly they grow with the number of candidates. The game
//! benchmark plays the seeded demo scenario from scratch each iteration.

use ccg_rules::{
    core::{Piece, PieceId, PlayerId, Target},
    game::{
        combat::{damage_assignment_orders, declare_attackers, declare_blockers},
        demo, GameConfig, GameLogger, GameLoop, PlayerController, RandomController,
    },
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

fn pieces(n: u32, owner: u32) -> Vec<Piece> {
    (0..n)
        .map(|i| {
            Piece::new(
                PieceId::new(owner * 100 + i),
                format!("P{owner}.{i}"),
                PlayerId::new(owner),
                1,
                1,
            )
        })
        .collect()
}

fn bench_declare_attackers(c: &mut Criterion) {
    let mut group = c.benchmark_group("declare_attackers");
    let attackables = [Target::Player(PlayerId::new(1)), Target::Piece(PieceId::new(199))];

    for n in [2u32, 4, 6] {
        let attackers = pieces(n, 0);
        let refs: Vec<&Piece> = attackers.iter().collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &refs, |b, refs| {
            b.iter(|| declare_attackers(black_box(refs), black_box(&attackables)));
        });
    }
    group.finish();
}

fn bench_declare_blockers(c: &mut Criterion) {
    let mut group = c.benchmark_group("declare_blockers");
    let attackers: Vec<PieceId> = pieces(3, 0).iter().map(|p| p.id).collect();

    for n in [1u32, 2, 3] {
        let mut blockers = pieces(n, 1);
        for blocker in &mut blockers {
            blocker.max_block_n = 2;
        }
        let refs: Vec<&Piece> = blockers.iter().collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &refs, |b, refs| {
            b.iter(|| declare_blockers(black_box(&attackers), black_box(refs)));
        });
    }
    group.finish();
}

fn bench_damage_orders(c: &mut Criterion) {
    let mut group = c.benchmark_group("damage_assignment_orders");

    for width in [2u32, 3, 4] {
        let relation: Vec<(PieceId, Vec<PieceId>)> = (0..2)
            .map(|k| {
                let base = k * 10;
                let ordered = (1..=width).map(|i| PieceId::new(base + i)).collect();
                (PieceId::new(base), ordered)
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(width), &relation, |b, relation| {
            b.iter(|| damage_assignment_orders(black_box(relation)));
        });
    }
    group.finish();
}

fn bench_demo_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("demo_game");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let seed = 42u64;
    group.bench_function(BenchmarkId::new("fresh", seed), |b| {
        b.iter(|| {
            let mut game = demo::demo_game(GameConfig::default().with_seed(seed))
                .expect("demo game")
                .with_logger(GameLogger::silent());
            let mut controllers: Vec<Box<dyn PlayerController>> = vec![
                Box::new(RandomController::with_seed(PlayerId::new(0), seed)),
                Box::new(RandomController::with_seed(PlayerId::new(1), seed + 1)),
            ];
            let result = GameLoop::new(&mut game)
                .run_game(&mut controllers)
                .expect("demo game runs");
            black_box(result)
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_declare_attackers,
    bench_declare_blockers,
    bench_damage_orders,
    bench_demo_game
);
criterion_main!(benches);

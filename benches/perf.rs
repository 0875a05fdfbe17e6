use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use scout_terminal::pool::{PoolScope, build_pool};
use scout_terminal::rankings::{board_columns, rank_slots, top_n};
use scout_terminal::roles::Slot;
use scout_terminal::sample_data;
use scout_terminal::segment::{FilterBounds, segment};

fn bench_pool_build(c: &mut Criterion) {
    let dataset = sample_data::generate(10_000);
    let scope = PoolScope::season("2025");

    c.bench_function("pool_build_10k", |b| {
        b.iter(|| {
            let pool = build_pool(black_box(&dataset), black_box(&scope));
            black_box(pool.len());
        })
    });
}

fn bench_segment_pass(c: &mut Criterion) {
    let dataset = sample_data::generate(10_000);
    let pool = build_pool(&dataset, &PoolScope::season("2025"));
    let bounds = FilterBounds::from_pool(&pool);
    let mut filter = bounds.reset_filter();
    filter.minutes = (900.0, bounds.minutes.1);

    c.bench_function("segment_pass", |b| {
        b.iter(|| {
            let filtered = segment(black_box(&pool), black_box(&filter));
            black_box(filtered.len());
        })
    });
}

fn bench_rank_slots(c: &mut Criterion) {
    let dataset = sample_data::generate(10_000);
    let pool = build_pool(&dataset, &PoolScope::season("2025"));

    c.bench_function("rank_slots", |b| {
        b.iter(|| {
            let rankings = rank_slots(black_box(&pool));
            black_box(rankings.len());
        })
    });
}

fn bench_leaderboard_render(c: &mut Criterion) {
    let dataset = sample_data::generate(10_000);
    let pool = build_pool(&dataset, &PoolScope::season("2025"));
    let rankings = rank_slots(&pool);
    let striker = rankings
        .iter()
        .find(|r| r.slot == Slot::Striker)
        .expect("striker slot always present");
    let columns = board_columns(Slot::Striker);

    c.bench_function("leaderboard_top_n", |b| {
        b.iter(|| {
            let board = top_n(black_box(&striker.rows), 10, black_box(&columns));
            black_box(board.rows.len());
        })
    });
}

criterion_group!(
    perf,
    bench_pool_build,
    bench_segment_pass,
    bench_rank_slots,
    bench_leaderboard_render
);
criterion_main!(perf);

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use hypergrid_core::*;

fn bench_generate(c: &mut Criterion) {
    let mut seed = 0u64;
    c.bench_function("generate_4x4x4x4_20_mines", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            MineBoard::generate(MINE_BOARD_CONFIG, seed).unwrap()
        })
    });
}

fn bench_full_flood(c: &mut Criterion) {
    // degenerate mine-free board: one reveal floods all 256 cells
    let empty = GameConfig::new(4, 0);
    c.bench_function("flood_reveal_whole_board", |b| {
        b.iter_batched(
            || MineBoard::generate(empty, 7).unwrap(),
            |mut board| board.reveal((0, 0, 0, 0)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_snake_ticks(c: &mut Criterion) {
    c.bench_function("snake_1000_ticks", |b| {
        b.iter_batched(
            || {
                let mut world = SnakeWorld::new(SNAKE_GRID_SIZE, 42);
                world.resume();
                world
            },
            |mut world| {
                for _ in 0..1000 {
                    if world.tick() == TickOutcome::Died {
                        world.reset();
                        world.resume();
                    }
                }
                world.score()
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_generate, bench_full_flood, bench_snake_ticks);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockfall::core::{Board, GameConfig, GameSession, GameSnapshot, PieceController};
use blockfall::types::Command;

fn bench_tick(c: &mut Criterion) {
    let mut session = GameSession::new(GameConfig::new(12345), None, 0).unwrap();
    let mut now = 0u64;

    c.bench_function("session_tick_16ms", |b| {
        b.iter(|| {
            now += 16;
            if session.game_over() {
                session.restart(now);
            }
            session.tick(black_box(now));
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::default();
            for y in 27..31 {
                for x in 0..15 {
                    board.set(x, y, 1);
                }
            }
            board.clear_full_rows();
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    let mut session = GameSession::new(GameConfig::new(12345), None, 0).unwrap();

    c.bench_function("hard_drop_and_spawn", |b| {
        b.iter(|| {
            if session.game_over() {
                session.restart(0);
            }
            session.apply(Command::HardDrop, 0);
        })
    });
}

fn bench_try_move(c: &mut Criterion) {
    let board = Board::default();
    let mut controller = PieceController::new(&GameConfig::new(12345));
    controller.spawn_next(&board, 1);
    let mut dx = 1;

    c.bench_function("try_move", |b| {
        b.iter(|| {
            if !controller.try_move(&board, black_box(dx), 0) {
                dx = -dx;
            }
        })
    });
}

fn bench_rotate_with_kick(c: &mut Criterion) {
    let board = Board::default();
    let mut controller = PieceController::new(&GameConfig::new(12345));
    controller.spawn_next(&board, 1);

    c.bench_function("rotate_with_kick", |b| {
        b.iter(|| {
            controller.rotate_with_kick(&board);
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let session = GameSession::new(GameConfig::new(12345), None, 0).unwrap();
    let mut snap = GameSnapshot::default();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            session.snapshot_into(black_box(&mut snap));
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_hard_drop,
    bench_try_move,
    bench_rotate_with_kick,
    bench_snapshot
);
criterion_main!(benches);

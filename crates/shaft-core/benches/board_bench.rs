use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shaft_core::{Board, Difficulty, InputType, LevelConfig, Referee, Rotation, TileGenerator};

fn hard_board(seed: u64) -> (Board, TileGenerator) {
    let config = LevelConfig::for_difficulty(Difficulty::Hard).with_seed(seed);
    let mut generator = TileGenerator::from_config(&config);
    let board = Board::build(&config, &mut generator).unwrap();
    (board, generator)
}

fn bench_remove_and_replace(c: &mut Criterion) {
    let (board, mut generator) = hard_board(11);
    // First removable group in scan order
    let coord = board
        .coords()
        .find(|coord| board.removable_group(*coord).is_some())
        .expect("bench board should hold a removable group");
    let input = InputType::Touch {
        coord,
        tile_type: board.get(coord).unwrap().clone(),
    };

    c.bench_function("remove_and_replace", |b| {
        b.iter(|| board.remove_and_replace(black_box(coord), false, &mut generator, &input))
    });
}

fn bench_rotate(c: &mut Criterion) {
    let (board, _) = hard_board(12);

    c.bench_function("rotate", |b| {
        b.iter(|| board.rotate(black_box(Rotation::Clockwise), &InputType::RotateRight))
    });
}

fn bench_referee(c: &mut Criterion) {
    let (board, _) = hard_board(13);
    let referee = Referee::default();

    c.bench_function("referee_evaluate", |b| {
        b.iter(|| black_box(referee.evaluate(black_box(&board))))
    });
}

criterion_group!(benches, bench_remove_and_replace, bench_rotate, bench_referee);
criterion_main!(benches);

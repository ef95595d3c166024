use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rotachess_core::coretypes::{Move, Square::*};
use rotachess_core::*;

// Ruy Lopez, 10 plies.
const OPENING: [Move; 10] = [
    Move::new(E2, E4, None),
    Move::new(E7, E5, None),
    Move::new(G1, F3, None),
    Move::new(B8, C6, None),
    Move::new(F1, B5, None),
    Move::new(A7, A6, None),
    Move::new(B5, A4, None),
    Move::new(G8, F6, None),
    Move::new(E1, G1, None),
    Move::new(F8, E7, None),
];

pub fn criterion_session_benchmark(c: &mut Criterion) {
    c.bench_function("apply opening: 10 plies", |b| {
        b.iter(|| {
            let mut session = SessionController::new(StandardRules::new());
            for move_ in OPENING {
                assert!(session.apply_move(black_box(move_)).is_accepted());
            }
            session
        })
    });

    let mut played = SessionController::new(StandardRules::new());
    for move_ in OPENING {
        played.apply_move(move_);
    }

    c.bench_function("undo then redo: 10 plies", |b| {
        b.iter(|| {
            while played.undo() {}
            while played.redo() {}
            assert_eq!(played.history().raw_cursor(), 9);
        })
    });

    c.bench_function("legal destinations: start position", |b| {
        let rules = StandardRules::new();
        let start = Position::start_position();
        b.iter(|| rules.legal_destinations(black_box(&start), black_box(G1)))
    });

    c.bench_function("click select and deselect", |b| {
        let mut session = SessionController::new(StandardRules::new());
        b.iter(|| {
            session.on_square_click(black_box(E2));
            session.on_square_click(black_box(E2));
        })
    });
}

criterion_group!(benches, criterion_session_benchmark);
criterion_main!(benches);

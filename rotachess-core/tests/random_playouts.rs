//! Random playouts
//!
//! Play seeded random games to the end, then walk the whole line back and
//! forward again. Every step must land on the position recorded for it.

use rand::prelude::*;

use rotachess_core::coretypes::{Move, Square};
use rotachess_core::*;

const MAX_PLIES: usize = 200;

fn random_legal_move(session: &SessionController<StandardRules>, rng: &mut StdRng) -> Option<Move> {
    let position = session.current_position();
    let oracle = session.oracle();
    let moves: Vec<Move> = Square::iter()
        .flat_map(|from| {
            oracle
                .legal_destinations(position, from)
                .into_iter()
                .map(move |to| Move::new(from, to, None))
        })
        .collect();
    moves.choose(rng).copied()
}

fn playout(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut session = SessionController::new(StandardRules::new());
    let mut line = vec![session.current_position().clone()];

    while line.len() <= MAX_PLIES && !session.game_status().is_over() {
        let move_ = match random_legal_move(&session, &mut rng) {
            Some(move_) => move_,
            None => break,
        };
        assert!(session.apply_move(move_).is_accepted(), "seed {seed}: {move_}");
        line.push(session.current_position().clone());
    }
    let plies = line.len() - 1;
    assert_eq!(session.move_list_view().moves.len(), plies);

    for expected in line.iter().rev().skip(1) {
        assert!(session.undo());
        assert_eq!(session.current_position(), expected);
    }
    assert!(!session.undo());
    assert_eq!(session.history().raw_cursor(), -1);
    assert_eq!(session.move_list_view().moves.len(), plies);

    for expected in line.iter().skip(1) {
        assert!(session.redo());
        assert_eq!(session.current_position(), expected);
    }
    assert!(!session.redo());
    assert_eq!(session.move_list_view().active, plies.checked_sub(1));
}

#[test]
fn seeded_playouts_walk_back_and_forth() {
    for seed in 0..8 {
        playout(seed);
    }
}

#[test]
fn branching_mid_game_drops_the_tail() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut session = SessionController::new(StandardRules::new());
    for _ in 0..20 {
        match random_legal_move(&session, &mut rng) {
            Some(move_) => assert!(session.apply_move(move_).is_accepted()),
            None => break,
        }
    }
    let played = session.move_list_view().moves.len();
    let back = played / 2;
    for _ in 0..back {
        assert!(session.undo());
    }
    let kept: Vec<String> = session.move_list_view().moves[..played - back].to_vec();

    if let Some(move_) = random_legal_move(&session, &mut rng) {
        assert!(session.apply_move(move_).is_accepted());
        let moves = session.move_list_view().moves;
        assert_eq!(moves.len(), kept.len() + 1);
        assert_eq!(&moves[..kept.len()], kept.as_slice());
        assert!(!session.history().can_redo());
    }
}

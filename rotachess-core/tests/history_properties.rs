//! Property-based tests for session history.
//!
//! Verifies, for arbitrary sequences of moves, undos, redos and resets:
//! 1. The ledger stays consistent: `past` matches the cursor, `past + future` matches the move list.
//! 2. Playing a move and undoing it restores the serialized position.
//! 3. Undo followed by redo returns to the same position and cursor.
//! 4. Rejected moves leave position and history untouched.

use proptest::prelude::*;

use rotachess_core::coretypes::{Move, Square};
use rotachess_core::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    /// Play the n-th legal move, modulo the number of legal moves.
    Play(usize),
    Undo,
    Redo,
    Reset,
    /// Drop a piece between two arbitrary squares.
    Drop(u8, u8),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => any::<usize>().prop_map(Op::Play),
        3 => Just(Op::Undo),
        2 => Just(Op::Redo),
        1 => Just(Op::Reset),
        2 => (0u8..64, 0u8..64).prop_map(|(from, to)| Op::Drop(from, to)),
    ]
}

fn legal_moves(session: &SessionController<StandardRules>) -> Vec<Move> {
    let position = session.current_position();
    let oracle = session.oracle();
    Square::iter()
        .flat_map(|from| {
            oracle
                .legal_destinations(position, from)
                .into_iter()
                .map(move |to| Move::new(from, to, None))
        })
        .collect()
}

fn assert_consistent(session: &SessionController<StandardRules>) {
    let history = session.history();
    let (moves, cursor) = history.current_move_list();
    assert_eq!(history.past_len() as isize, cursor + 1);
    assert_eq!(history.past_len() + history.future_len(), moves.len());
    assert!(cursor >= -1 && cursor < moves.len() as isize);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ledger_stays_consistent(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut session = SessionController::new(StandardRules::new());

        for op in ops {
            match op {
                Op::Play(n) => {
                    let moves = legal_moves(&session);
                    if !moves.is_empty() {
                        prop_assert!(session.apply_move(moves[n % moves.len()]).is_accepted());
                    }
                }
                Op::Undo => { session.on_undo(); }
                Op::Redo => { session.on_redo(); }
                Op::Reset => { session.on_reset(); }
                Op::Drop(from, to) => {
                    if let (Some(from), Some(to)) = (Square::from_u8(from), Square::from_u8(to)) {
                        session.on_drop(from, to);
                    }
                }
            }
            assert_consistent(&session);
            prop_assert!(session.selection().is_idle());
        }
    }

    #[test]
    fn undo_restores_and_redo_returns(
        prefix in prop::collection::vec(any::<usize>(), 0..20),
        pick in any::<usize>(),
    ) {
        let mut session = SessionController::new(StandardRules::new());
        for n in prefix {
            let moves = legal_moves(&session);
            if moves.is_empty() {
                break;
            }
            session.apply_move(moves[n % moves.len()]);
        }

        let moves = legal_moves(&session);
        prop_assume!(!moves.is_empty());
        let before = session.current_position().clone();
        let cursor_before = session.history().raw_cursor();

        prop_assert!(session.apply_move(moves[pick % moves.len()]).is_accepted());
        let after = session.current_position().clone();
        let cursor_after = session.history().raw_cursor();
        prop_assert_eq!(cursor_after, cursor_before + 1);

        prop_assert!(session.undo());
        prop_assert_eq!(session.current_position().serialize(), before.serialize());
        prop_assert_eq!(session.history().raw_cursor(), cursor_before);

        prop_assert!(session.redo());
        prop_assert_eq!(session.current_position(), &after);
        prop_assert_eq!(session.history().raw_cursor(), cursor_after);
    }

    #[test]
    fn rejected_moves_change_nothing(from in 0u8..64, to in 0u8..64, plies in 0usize..6) {
        let mut session = SessionController::new(StandardRules::new());
        for n in 0..plies {
            let moves = legal_moves(&session);
            if moves.is_empty() {
                break;
            }
            session.apply_move(moves[n % moves.len()]);
        }
        let (from, to) = match (Square::from_u8(from), Square::from_u8(to)) {
            (Some(from), Some(to)) => (from, to),
            _ => return Ok(()),
        };
        let legal = legal_moves(&session);
        prop_assume!(!legal.contains(&Move::new(from, to, None)));

        let position = session.current_position().clone();
        let history = session.history().clone();
        prop_assert!(!session.on_drop(from, to));
        prop_assert_eq!(session.current_position(), &position);
        prop_assert_eq!(session.history(), &history);
    }
}

//! History ledger: undo/redo stacks of positions, and the move list they belong to.

use crate::coretypes::Color;
use crate::position::Position;

/// One notation in the move panel, and whether it is the displayed move.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MoveEntry<'a> {
    pub notation: &'a str,
    pub active: bool,
}

/// A row of the move panel: move number, White's move and Black's reply.
/// `white` is None only in the first row of a line that Black starts.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MovePair<'a> {
    pub number: usize,
    pub white: Option<MoveEntry<'a>>,
    pub black: Option<MoveEntry<'a>>,
}

/// HistoryLedger tracks a single linear line of play with one cut point.
///
/// * `past` - positions before each move up to the cursor, used to step backward.
/// * `future` - positions available to redo, last element is redone first.
/// * `moves` - notation of every move on the line, including undone ones.
/// * `cursor` - index of the displayed move in `moves`, -1 for the start position.
///
/// `past.len() == cursor + 1` at all times, and `future` holds exactly the
/// positions after the cursor. Recording a move from anywhere but the head of
/// the line cuts the line at the cursor: later moves and all of `future` are dropped.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HistoryLedger {
    past: Vec<Position>,
    future: Vec<Position>,
    moves: Vec<String>,
    cursor: isize,
}

impl HistoryLedger {
    /// Create a new empty HistoryLedger, cursor at the start position.
    pub fn new() -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            moves: Vec::new(),
            cursor: -1,
        }
    }

    /// Record an accepted move. `previous` is the position the move was played from.
    pub fn record_move(&mut self, previous: Position, notation: String) {
        // Branch point: anything after the cursor belongs to the abandoned line.
        self.moves.truncate(self.head_len());
        self.moves.push(notation);
        self.past.push(previous);
        self.future.clear();
        self.cursor += 1;
        self.check_invariants();
    }

    /// Step one move back. `current` is the position being left, which becomes redoable.
    /// Returns the position to display, or None at the start of the line.
    pub fn undo(&mut self, current: Position) -> Option<Position> {
        if self.cursor < 0 {
            return None;
        }
        let previous = self.past.pop()?;
        self.future.push(current);
        self.cursor -= 1;
        self.check_invariants();
        Some(previous)
    }

    /// Step one move forward along the recorded line. `current` is the position being left.
    /// Returns the position to display, or None when nothing was undone.
    pub fn redo(&mut self, current: Position) -> Option<Position> {
        let next = self.future.pop()?;
        self.past.push(current);
        self.cursor += 1;
        self.check_invariants();
        Some(next)
    }

    /// Discard all history.
    pub fn reset(&mut self) {
        self.past.clear();
        self.future.clear();
        self.moves.clear();
        self.cursor = -1;
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Move list and cursor, for rendering the move panel with the active entry highlighted.
    pub fn current_move_list(&self) -> (&[String], isize) {
        (&self.moves, self.cursor)
    }

    /// Raw cursor, -1 meaning the start position.
    pub fn raw_cursor(&self) -> isize {
        self.cursor
    }

    /// Index of the displayed move, or None at the start position.
    pub fn cursor(&self) -> Option<usize> {
        usize::try_from(self.cursor).ok()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Move list grouped by full move, as laid out in a two column move panel.
    /// `first_mover` and `first_number` describe the position the line starts from.
    pub fn move_pairs(&self, first_mover: Color, first_number: usize) -> Vec<MovePair<'_>> {
        let mut pairs = Vec::with_capacity(self.moves.len() / 2 + 1);
        let mut number = first_number;
        let mut idx = 0;

        if first_mover == Color::Black && !self.moves.is_empty() {
            pairs.push(MovePair {
                number,
                white: None,
                black: Some(self.entry(0)),
            });
            number += 1;
            idx = 1;
        }
        while idx < self.moves.len() {
            pairs.push(MovePair {
                number,
                white: Some(self.entry(idx)),
                black: (idx + 1 < self.moves.len()).then(|| self.entry(idx + 1)),
            });
            number += 1;
            idx += 2;
        }
        pairs
    }

    fn entry(&self, idx: usize) -> MoveEntry<'_> {
        MoveEntry {
            notation: &self.moves[idx],
            active: self.cursor() == Some(idx),
        }
    }

    /// Number of earlier positions on the current line that repeat `position`.
    pub fn repetitions(&self, position: &Position) -> usize {
        let key = position.repetition_key();
        self.past
            .iter()
            .filter(|past| past.repetition_key() == key)
            .count()
    }

    /// Number of moves on the line up to and including the cursor.
    fn head_len(&self) -> usize {
        (self.cursor + 1) as usize
    }

    fn check_invariants(&self) {
        debug_assert_eq!(self.past.len(), self.head_len());
        debug_assert_eq!(self.past.len() + self.future.len(), self.moves.len());
    }
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

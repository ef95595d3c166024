//! Click-to-move state machine.

use std::collections::BTreeMap;

use crate::coretypes::{Destinations, Move, Square};
use crate::oracle::RulesOracle;
use crate::position::Position;

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected {
        square: Square,
        destinations: Destinations,
    },
}

/// What a click asked for. Only `AttemptMove` needs further work by the caller.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ClickAction {
    /// The selected square was clicked again.
    Deselect,
    /// One of the mover's own pieces was picked up.
    Select(Square),
    /// A legal destination of the selected piece was clicked.
    AttemptMove(Move),
    /// Anything else; the selection is dropped.
    Clear,
}

/// How the board widget should style a square.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Highlight {
    Selected,
    LegalDestination,
}

/// Turns square clicks into selection changes or move attempts.
/// There is no terminal state; after every move attempt the tracker is Idle again.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SelectionTracker {
    state: SelectionState,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SelectionState::Idle
    }

    pub fn active_square(&self) -> Option<Square> {
        match &self.state {
            SelectionState::Selected { square, .. } => Some(*square),
            SelectionState::Idle => None,
        }
    }

    pub fn destinations(&self) -> &[Square] {
        match &self.state {
            SelectionState::Selected { destinations, .. } => destinations.as_slice(),
            SelectionState::Idle => &[],
        }
    }

    /// Drop any selection.
    pub fn clear(&mut self) {
        self.state = SelectionState::Idle;
    }

    /// Advance the state machine for a click on `square` in `position`.
    ///
    /// Order of rules:
    /// 1. Clicking the selected square deselects it.
    /// 2. Clicking a piece of the side to move selects it.
    /// 3. Clicking a legal destination of the selected piece attempts that move.
    /// 4. Anything else clears the selection.
    ///
    /// Rule 2 comes before 3, so clicking another of one's own pieces switches
    /// the selection instead of trying to capture it.
    pub fn click<O>(&mut self, square: Square, position: &Position, oracle: &O) -> ClickAction
    where
        O: RulesOracle + ?Sized,
    {
        if self.active_square() == Some(square) {
            self.clear();
            return ClickAction::Deselect;
        }

        let side_to_move = oracle.side_to_move(position);
        let is_own_piece = oracle
            .piece_at(position, square)
            .map_or(false, |piece| piece.color == side_to_move);
        if is_own_piece {
            self.state = SelectionState::Selected {
                square,
                destinations: oracle.legal_destinations(position, square),
            };
            return ClickAction::Select(square);
        }

        let action = match &self.state {
            SelectionState::Selected {
                square: active,
                destinations,
            } if destinations.contains(&square) => {
                ClickAction::AttemptMove(Move::new(*active, square, None))
            }
            _ => ClickAction::Clear,
        };
        self.clear();
        action
    }

    /// Styles for the board widget. The selected square wins over a destination style.
    pub fn square_styles(&self) -> BTreeMap<Square, Highlight> {
        let mut styles = BTreeMap::new();
        if let SelectionState::Selected {
            square,
            destinations,
        } = &self.state
        {
            for destination in destinations {
                styles.insert(*destination, Highlight::LegalDestination);
            }
            styles.insert(*square, Highlight::Selected);
        }
        styles
    }
}

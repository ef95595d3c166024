//! Rules oracle: the external authority on chess rules.
//!
//! The session never decides legality itself. It hands Positions and Moves to a
//! `RulesOracle` and records whatever the oracle accepts.

mod standard;

use std::fmt::{self, Display};

use crate::coretypes::{Color, Destinations, Move, Piece, Square};
use crate::error;
use crate::position::Position;

pub use standard::StandardRules;

/// Result of an accepted move: the new snapshot and the move's notation for the move list.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Applied {
    pub position: Position,
    pub notation: String,
}

/// Why the oracle refused a move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Rejection {
    /// There is no piece on the origin square.
    NoPiece,
    /// The piece on the origin square belongs to the side not on move.
    NotYourTurn,
    /// The piece cannot legally reach the target square.
    IllegalMove,
    /// The side to move has no legal moves left.
    GameOver,
    /// The oracle could not interpret the position it was given.
    UnreadablePosition,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::NoPiece => "no piece on origin square",
            Rejection::NotYourTurn => "not your turn",
            Rejection::IllegalMove => "illegal move",
            Rejection::GameOver => "game is over",
            Rejection::UnreadablePosition => "unreadable position",
        }
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the game at some position is still running.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Draw,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

impl Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameStatus::Ongoing => f.write_str("ongoing"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {} wins", winner.name()),
            GameStatus::Draw => f.write_str("draw"),
        }
    }
}

/// Everything the session needs to know about chess rules.
///
/// Implementations must be deterministic: the same position and move always
/// produce the same answer.
pub trait RulesOracle {
    /// Apply a move to a position, producing a new position, or reject the move.
    /// Moves without a promotion choice that turn out to be promotions promote to a queen.
    fn apply_move(&self, position: &Position, move_: Move) -> Result<Applied, Rejection>;

    /// Squares the piece on `square` may legally move to. Empty if there is no piece
    /// or the piece belongs to the side not on move.
    fn legal_destinations(&self, position: &Position, square: Square) -> Destinations;

    fn piece_at(&self, position: &Position, square: Square) -> Option<Piece>;

    fn side_to_move(&self, position: &Position) -> Color;

    fn is_checkmate(&self, position: &Position) -> bool;

    /// Stalemate, insufficient material, or the fifty move rule.
    /// Repetition depends on history and is not visible from a single position.
    fn is_draw(&self, position: &Position) -> bool;

    /// Check that a position can be played from at all.
    fn validate(&self, position: &Position) -> error::Result<()>;

    /// Serialized form used for rendering and comparisons.
    fn serialize(&self, position: &Position) -> String {
        position.serialize().to_string()
    }

    fn game_status(&self, position: &Position) -> GameStatus {
        if self.is_checkmate(position) {
            GameStatus::Checkmate {
                winner: !self.side_to_move(position),
            }
        } else if self.is_draw(position) {
            GameStatus::Draw
        } else {
            GameStatus::Ongoing
        }
    }
}

/// Blanket impl on references of oracles, so a session may borrow a shared oracle.
impl<O: RulesOracle + ?Sized> RulesOracle for &O {
    fn apply_move(&self, position: &Position, move_: Move) -> Result<Applied, Rejection> {
        O::apply_move(*self, position, move_)
    }
    fn legal_destinations(&self, position: &Position, square: Square) -> Destinations {
        O::legal_destinations(*self, position, square)
    }
    fn piece_at(&self, position: &Position, square: Square) -> Option<Piece> {
        O::piece_at(*self, position, square)
    }
    fn side_to_move(&self, position: &Position) -> Color {
        O::side_to_move(*self, position)
    }
    fn is_checkmate(&self, position: &Position) -> bool {
        O::is_checkmate(*self, position)
    }
    fn is_draw(&self, position: &Position) -> bool {
        O::is_draw(*self, position)
    }
    fn validate(&self, position: &Position) -> error::Result<()> {
        O::validate(*self, position)
    }
    fn serialize(&self, position: &Position) -> String {
        O::serialize(*self, position)
    }
}

//! Holds Position, the immutable board snapshot the session passes around.
//!
//! A Position is a FEN string. The session controller and history ledger never
//! look inside it; only a `RulesOracle` interprets it.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::{self, ErrorKind};

/// Standard chess start position in FEN.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// placement, side to move, castling, en passant, halfmoves, fullmoves.
const NUM_FEN_FIELDS: usize = 6;
// Fields that define "the same position" for repetition purposes.
const NUM_REPETITION_FIELDS: usize = 4;

/// struct Position
/// An immutable serialized snapshot of a chess position:
/// board layout, side to move, castling and en passant metadata, move counters.
///
/// A new Position is produced for every accepted move; an existing one is never
/// changed in place.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Position {
    fen: String,
}

impl Position {
    /// Standard chess start position.
    pub fn start_position() -> Self {
        Self {
            fen: START_FEN.to_string(),
        }
    }

    /// Create a Position from a FEN string.
    /// Only the shape of the string is checked here, whether the described
    /// position is playable is up to the rules oracle.
    pub fn from_fen(fen: &str) -> error::Result<Self> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != NUM_FEN_FIELDS {
            return Err((
                ErrorKind::PositionMalformed,
                format!("expected {NUM_FEN_FIELDS} fields, found {}", fields.len()),
            )
                .into());
        }
        if fields[0].split('/').count() != 8 {
            return Err((ErrorKind::PositionMalformed, "placement needs 8 ranks").into());
        }

        Ok(Self {
            fen: fields.join(" "),
        })
    }

    /// The FEN string of this snapshot.
    pub fn serialize(&self) -> &str {
        &self.fen
    }

    /// Placement, side to move, castling rights and en passant square.
    /// Two positions with equal keys are the same position for repetition draws,
    /// regardless of their move counters.
    pub fn repetition_key(&self) -> &str {
        let mut end = self.fen.len();
        for (count, (idx, _)) in self.fen.match_indices(' ').enumerate() {
            if count + 1 == NUM_REPETITION_FIELDS {
                end = idx;
                break;
            }
        }
        &self.fen[..end]
    }

    /// Number of the full move about to be played, from the last FEN field.
    /// Counters that are not a positive number read as 1.
    pub fn fullmove_number(&self) -> usize {
        self.fen
            .rsplit(' ')
            .next()
            .and_then(|field| field.parse::<usize>().ok())
            .filter(|number| *number > 0)
            .unwrap_or(1)
    }
}

/// Defaults to standard chess start position.
impl Default for Position {
    fn default() -> Self {
        Self::start_position()
    }
}

impl FromStr for Position {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        Self::from_fen(s)
    }
}

/// Displays the FEN string representing Position.
impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.fen)
    }
}

//! Session and history control for a two-player chess board.
//!
//! The rules of chess live behind [`RulesOracle`]; this crate keeps track of
//! the current position, the undo/redo history and move list, click-to-move
//! selection, and cosmetic board rotation.

pub mod coretypes;
pub mod error;
pub mod history;
pub mod oracle;
pub mod position;
pub mod rotation;
pub mod selection;
pub mod session;

pub use history::HistoryLedger;
pub use oracle::{GameStatus, Rejection, RulesOracle, StandardRules};
pub use position::Position;
pub use rotation::{Rotating, RotationEvent};
pub use selection::SelectionTracker;
pub use session::{MoveOutcome, Notification, SessionBuilder, SessionController};

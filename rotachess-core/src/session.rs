//! SessionController ties the pieces of a running game together:
//! the current position, the rules oracle, the history ledger and the
//! click-to-move selection. It exposes the event handlers a board widget calls.

use std::collections::BTreeMap;
use std::fmt;
use std::mem;

use tracing::{debug, info, warn};

use crate::coretypes::{Color, Move, Orientation, PieceKind, Square};
use crate::error;
use crate::history::{HistoryLedger, MovePair};
use crate::oracle::{Applied, GameStatus, Rejection, RulesOracle};
use crate::position::Position;
use crate::selection::{ClickAction, Highlight, SelectionTracker};

/// SessionBuilder allows for parameters of a SessionController to be set once
/// before the session starts.
///
/// Default values:
///
/// * `start_position`: Standard chess start position
/// * `default_promotion`: Queen
/// * `orientation`: White at the bottom
/// * `reset_orientation`: false, reset leaves the orientation alone
/// * `suppress_repeated_rejections`: true
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SessionBuilder {
    start_position: Position,
    default_promotion: PieceKind,
    orientation: Orientation,
    reset_orientation: bool,
    suppress_repeated_rejections: bool,
}

impl SessionBuilder {
    /// Create a new default SessionBuilder.
    pub fn new() -> Self {
        Self {
            start_position: Position::start_position(),
            default_promotion: PieceKind::Queen,
            orientation: Orientation::White,
            reset_orientation: false,
            suppress_repeated_rejections: true,
        }
    }

    /// Create and return a new SessionController.
    /// Fails if the oracle cannot play from the configured start position.
    pub fn build<O: RulesOracle>(&self, oracle: O) -> error::Result<SessionController<O>> {
        oracle.validate(&self.start_position)?;

        Ok(SessionController {
            oracle,
            config: self.clone(),
            position: self.start_position.clone(),
            history: HistoryLedger::new(),
            selection: SelectionTracker::new(),
            orientation: self.orientation,
            last_rejection: None,
            listeners: Vec::new(),
        })
    }

    /// Set the position the session starts from, and returns to on reset.
    pub fn start_position(mut self, position: Position) -> Self {
        self.start_position = position;
        self
    }

    /// Set the piece a pawn promotes to when the player did not choose one.
    /// Kings and pawns are not promotion pieces and leave the setting unchanged.
    pub fn default_promotion(mut self, kind: PieceKind) -> Self {
        if kind.is_promotable() {
            self.default_promotion = kind;
        }
        self
    }

    /// Set which side is drawn at the bottom when the session starts.
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set whether reset also restores the initial orientation.
    pub fn reset_orientation(mut self, reset_orientation: bool) -> Self {
        self.reset_orientation = reset_orientation;
        self
    }

    /// Set whether the same rejected move, submitted again and again, notifies only once.
    pub fn suppress_repeated_rejections(mut self, suppress: bool) -> Self {
        self.suppress_repeated_rejections = suppress;
        self
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What became of a move attempt.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum MoveOutcome {
    Accepted { notation: String, status: GameStatus },
    Rejected(Rejection),
}

impl MoveOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveOutcome::Accepted { .. })
    }
}

/// Events delivered to subscribers of a session.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Notification {
    /// Something the board widget renders has changed.
    StateChanged,
    /// A move attempt was refused by the rules oracle.
    MoveRejected { move_: Move, reason: Rejection },
    /// The last accepted move ended the game. Undo, redo and reset keep working.
    GameOver(GameStatus),
}

/// The move panel: all notations on the current line and the highlighted one.
///
/// `first_mover` and `first_number` come from the start position, so a line
/// that Black opens, or that starts mid-game, is labelled correctly.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MoveListView<'a> {
    pub moves: &'a [String],
    pub active: Option<usize>,
    pub first_mover: Color,
    pub first_number: usize,
}

impl<'a> MoveListView<'a> {
    /// Each entry with the color that played it and whether it is highlighted.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &'a str, Color, bool)> + '_ {
        self.moves.iter().enumerate().map(move |(idx, notation)| {
            let color = if idx % 2 == 0 {
                self.first_mover
            } else {
                !self.first_mover
            };
            (idx, notation.as_str(), color, self.active == Some(idx))
        })
    }
}

type Listener = Box<dyn FnMut(&Notification)>;

/// SessionController owns the current position, the history ledger and the
/// selection, and runs every event to completion before the next one.
///
/// A rejected move changes nothing but the selection, which is dropped after
/// every move attempt. Undo, redo and reset at a boundary are silent no-ops.
pub struct SessionController<O> {
    oracle: O,
    config: SessionBuilder,
    position: Position,
    history: HistoryLedger,
    selection: SelectionTracker,
    orientation: Orientation,
    last_rejection: Option<(Move, Rejection)>,
    listeners: Vec<Listener>,
}

impl<O: RulesOracle> SessionController<O> {
    /// A session from the standard start position with default settings.
    pub fn new(oracle: O) -> Self {
        let config = SessionBuilder::new();
        Self {
            oracle,
            position: config.start_position.clone(),
            orientation: config.orientation,
            config,
            history: HistoryLedger::new(),
            selection: SelectionTracker::new(),
            last_rejection: None,
            listeners: Vec::new(),
        }
    }

    /// Register a listener called for every notification, in registration order.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Notification) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Attempt a move from the current position.
    ///
    /// On acceptance the previous position goes onto the history, the move
    /// list is cut at the cursor and extended, and redo history is dropped.
    /// On rejection the position and history are untouched.
    /// Either way the selection is back to Idle afterwards.
    pub fn apply_move(&mut self, move_: Move) -> MoveOutcome {
        let attempt = Move {
            promotion: Some(move_.promotion_or(self.config.default_promotion)),
            ..move_
        };
        let had_selection = !self.selection.is_idle();
        self.selection.clear();

        match self.oracle.apply_move(&self.position, attempt) {
            Ok(Applied { position, notation }) => {
                let previous = mem::replace(&mut self.position, position);
                self.history.record_move(previous, notation.clone());
                self.last_rejection = None;

                let status = self.game_status();
                debug!(%move_, %notation, cursor = self.history.raw_cursor(), "move accepted");
                self.notify(Notification::StateChanged);
                if status.is_over() {
                    info!(%status, "game over");
                    self.notify(Notification::GameOver(status));
                }
                MoveOutcome::Accepted { notation, status }
            }
            Err(reason) => {
                warn!(%move_, %reason, "move rejected");
                let repeated = self.last_rejection == Some((move_, reason));
                if !(repeated && self.config.suppress_repeated_rejections) {
                    self.notify(Notification::MoveRejected { move_, reason });
                }
                self.last_rejection = Some((move_, reason));
                if had_selection {
                    self.notify(Notification::StateChanged);
                }
                MoveOutcome::Rejected(reason)
            }
        }
    }

    /// Step back one move. Returns false if already at the start of the line.
    /// The move stays in the move list, only the cursor moves.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.position.clone()) {
            Some(previous) => {
                self.position = previous;
                debug!(cursor = self.history.raw_cursor(), "undo");
                self.after_history_step();
                true
            }
            None => false,
        }
    }

    /// Step forward one undone move. Returns false if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.position.clone()) {
            Some(next) => {
                self.position = next;
                debug!(cursor = self.history.raw_cursor(), "redo");
                self.after_history_step();
                true
            }
            None => false,
        }
    }

    /// Discard all history and return to the start position.
    /// Orientation is only restored if the session was built with `reset_orientation`.
    pub fn reset(&mut self) {
        let orientation = if self.config.reset_orientation {
            self.config.orientation
        } else {
            self.orientation
        };
        self.reset_to(orientation);
    }

    /// Reset, then show the board from an explicitly requested side.
    pub fn reset_with_orientation(&mut self, orientation: Orientation) {
        self.reset_to(orientation);
    }

    fn reset_to(&mut self, orientation: Orientation) {
        self.position = self.config.start_position.clone();
        self.history.reset();
        self.orientation = orientation;
        info!(?orientation, "session reset");
        self.after_history_step();
    }

    /// Status of the current position, including draws by threefold repetition.
    pub fn game_status(&self) -> GameStatus {
        match self.oracle.game_status(&self.position) {
            GameStatus::Ongoing if self.history.repetitions(&self.position) >= 2 => {
                GameStatus::Draw
            }
            status => status,
        }
    }

    ////////////////////
    // Widget surface //
    ////////////////////

    /// A piece was dragged from `source` and dropped on `destination`.
    /// Returns true if the move was accepted.
    pub fn on_drop(&mut self, source: Square, destination: Square) -> bool {
        self.apply_move(Move::new(source, destination, None))
            .is_accepted()
    }

    /// A square was clicked or tapped.
    pub fn on_square_click(&mut self, square: Square) {
        match self.selection.click(square, &self.position, &self.oracle) {
            ClickAction::AttemptMove(move_) => {
                // The selection was already dropped by the click, so a rejection
                // still changes what the board shows.
                if !self.apply_move(move_).is_accepted() {
                    self.notify(Notification::StateChanged);
                }
            }
            ClickAction::Select(_) | ClickAction::Deselect | ClickAction::Clear => {
                self.notify(Notification::StateChanged);
            }
        }
    }

    pub fn on_undo(&mut self) {
        self.undo();
    }

    pub fn on_redo(&mut self) {
        self.redo();
    }

    pub fn on_reset(&mut self) {
        self.reset();
    }

    /// Position to draw on the board.
    pub fn current_position(&self) -> &Position {
        &self.position
    }

    /// Highlights to draw on the board.
    pub fn square_styles(&self) -> BTreeMap<Square, Highlight> {
        self.selection.square_styles()
    }

    /// Move panel contents.
    pub fn move_list_view(&self) -> MoveListView<'_> {
        let (moves, _) = self.history.current_move_list();
        MoveListView {
            moves,
            active: self.history.cursor(),
            first_mover: self.oracle.side_to_move(&self.config.start_position),
            first_number: self.config.start_position.fullmove_number(),
        }
    }

    /// Move panel rows, numbered from the start position.
    pub fn move_pairs(&self) -> Vec<MovePair<'_>> {
        self.history.move_pairs(
            self.oracle.side_to_move(&self.config.start_position),
            self.config.start_position.fullmove_number(),
        )
    }

    /// Whose turn it is, for the turn indicator.
    pub fn side_to_move(&self) -> Color {
        self.oracle.side_to_move(&self.position)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        if self.orientation != orientation {
            self.orientation = orientation;
            self.notify(Notification::StateChanged);
        }
    }

    pub fn flip_orientation(&mut self) {
        self.set_orientation(self.orientation.flip());
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    fn after_history_step(&mut self) {
        self.selection.clear();
        self.last_rejection = None;
        self.notify(Notification::StateChanged);
    }

    fn notify(&mut self, notification: Notification) {
        for listener in self.listeners.iter_mut() {
            listener(&notification);
        }
    }
}

impl<O: fmt::Debug> fmt::Debug for SessionController<O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("oracle", &self.oracle)
            .field("position", &self.position)
            .field("history", &self.history)
            .field("selection", &self.selection)
            .field("orientation", &self.orientation)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

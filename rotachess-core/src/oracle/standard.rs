//! Standard chess rules, backed by `shakmaty`.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position as _, Role};

use super::{Applied, Rejection, RulesOracle};
use crate::coretypes::{Color, Destinations, Move, Piece, PieceKind, Square};
use crate::error::{self, ErrorKind};
use crate::position::Position;

/// Oracle for standard (non-960) chess.
///
/// Castling is entered the way players drag it on a board: the king steps two
/// squares toward the rook, `e1g1` or `e1c1`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct StandardRules;

impl StandardRules {
    pub fn new() -> Self {
        Self
    }

    fn setup(&self, position: &Position) -> error::Result<Chess> {
        let fen: Fen = position
            .serialize()
            .parse()
            .map_err(|err| error::Error::from((ErrorKind::PositionMalformed, err)))?;
        fen.into_position(CastlingMode::Standard)
            .map_err(|err| error::Error::from((ErrorKind::PositionUnreadable, err)))
    }

    fn snapshot(chess: &Chess) -> error::Result<Position> {
        let fen = Fen::from_position(chess.clone(), EnPassantMode::Legal);
        Position::from_fen(&fen.to_string())
    }

    /// Find the legal move matching a player's move attempt.
    fn find_move(chess: &Chess, move_: Move) -> Option<shakmaty::Move> {
        let from = to_shakmaty(move_.from);
        let to = to_shakmaty(move_.to);
        let promotion = to_role(move_.promotion_or(PieceKind::Queen));

        chess.legal_moves().into_iter().find(|m| {
            endpoints(m) == Some((from, to)) && m.promotion().map_or(true, |role| role == promotion)
        })
    }
}

impl RulesOracle for StandardRules {
    fn apply_move(&self, position: &Position, move_: Move) -> Result<Applied, Rejection> {
        let chess = self
            .setup(position)
            .map_err(|_| Rejection::UnreadablePosition)?;

        if chess.legal_moves().is_empty() {
            return Err(Rejection::GameOver);
        }
        let piece = chess
            .board()
            .piece_at(to_shakmaty(move_.from))
            .ok_or(Rejection::NoPiece)?;
        if piece.color != chess.turn() {
            return Err(Rejection::NotYourTurn);
        }
        let legal = Self::find_move(&chess, move_).ok_or(Rejection::IllegalMove)?;

        let san = San::from_move(&chess, &legal);
        let after = chess.play(&legal).map_err(|_| Rejection::IllegalMove)?;

        let mut notation = san.to_string();
        if after.is_checkmate() {
            notation.push('#');
        } else if after.is_check() {
            notation.push('+');
        }

        let position = Self::snapshot(&after).map_err(|_| Rejection::UnreadablePosition)?;
        Ok(Applied { position, notation })
    }

    fn legal_destinations(&self, position: &Position, square: Square) -> Destinations {
        let mut destinations = Destinations::new();
        let chess = match self.setup(position) {
            Ok(chess) => chess,
            Err(_) => return destinations,
        };
        let from = to_shakmaty(square);

        for m in chess.legal_moves() {
            let to = match endpoints(&m) {
                Some((move_from, move_to)) if move_from == from => from_shakmaty(move_to),
                _ => continue,
            };
            // Promotions list the same target once per promotion piece.
            if let Some(to) = to {
                if !destinations.contains(&to) && destinations.try_push(to).is_err() {
                    break;
                }
            }
        }
        destinations
    }

    fn piece_at(&self, position: &Position, square: Square) -> Option<Piece> {
        let chess = self.setup(position).ok()?;
        let piece = chess.board().piece_at(to_shakmaty(square))?;
        Some(Piece::new(from_color(piece.color), from_role(piece.role)))
    }

    fn side_to_move(&self, position: &Position) -> Color {
        match self.setup(position) {
            Ok(chess) => from_color(chess.turn()),
            // Fall back to the FEN side to move field.
            Err(_) => position
                .serialize()
                .split(' ')
                .nth(1)
                .and_then(|field| field.chars().next())
                .and_then(|ch| Color::try_from(ch).ok())
                .unwrap_or(Color::White),
        }
    }

    fn is_checkmate(&self, position: &Position) -> bool {
        self.setup(position)
            .map(|chess| chess.is_checkmate())
            .unwrap_or(false)
    }

    fn is_draw(&self, position: &Position) -> bool {
        self.setup(position)
            .map(|chess| {
                chess.is_stalemate() || chess.is_insufficient_material() || chess.halfmoves() >= 100
            })
            .unwrap_or(false)
    }

    fn validate(&self, position: &Position) -> error::Result<()> {
        self.setup(position).map(|_| ())
    }
}

/// Origin and target squares of a move as a player would enter them.
fn endpoints(m: &shakmaty::Move) -> Option<(shakmaty::Square, shakmaty::Square)> {
    match *m {
        shakmaty::Move::Normal { from, to, .. } => Some((from, to)),
        shakmaty::Move::EnPassant { from, to } => Some((from, to)),
        shakmaty::Move::Castle { king, rook } => {
            let file = if rook.file() == shakmaty::File::H {
                shakmaty::File::G
            } else {
                shakmaty::File::C
            };
            Some((king, shakmaty::Square::from_coords(file, king.rank())))
        }
        shakmaty::Move::Put { .. } => None,
    }
}

fn to_shakmaty(square: Square) -> shakmaty::Square {
    shakmaty::Square::from_coords(
        shakmaty::File::new(square.file() as u32),
        shakmaty::Rank::new(square.rank() as u32),
    )
}

// Both square types number a1 = 0 through h8 = 63, rank by rank.
fn from_shakmaty(square: shakmaty::Square) -> Option<Square> {
    Square::from_u8(u8::from(square))
}

fn from_color(color: shakmaty::Color) -> Color {
    match color {
        shakmaty::Color::White => Color::White,
        shakmaty::Color::Black => Color::Black,
    }
}

fn from_role(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

fn to_role(kind: PieceKind) -> Role {
    match kind {
        PieceKind::Pawn => Role::Pawn,
        PieceKind::Knight => Role::Knight,
        PieceKind::Bishop => Role::Bishop,
        PieceKind::Rook => Role::Rook,
        PieceKind::Queen => Role::Queen,
        PieceKind::King => Role::King,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::Square::*;
    use crate::oracle::GameStatus;

    fn fen(s: &str) -> Position {
        Position::from_fen(s).unwrap()
    }

    #[test]
    fn opening_pawn_push() {
        let rules = StandardRules::new();
        let start = Position::start_position();

        let applied = rules.apply_move(&start, Move::new(E2, E4, None)).unwrap();
        assert_eq!(applied.notation, "e4");
        assert_eq!(
            applied.position.serialize(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
        assert_eq!(rules.side_to_move(&applied.position), Color::Black);
    }

    #[test]
    fn rejection_reasons() {
        let rules = StandardRules::new();
        let start = Position::start_position();

        let empty = rules.apply_move(&start, Move::new(E4, E5, None));
        let theirs = rules.apply_move(&start, Move::new(E7, E5, None));
        let illegal = rules.apply_move(&start, Move::new(E2, E5, None));
        assert_eq!(empty, Err(Rejection::NoPiece));
        assert_eq!(theirs, Err(Rejection::NotYourTurn));
        assert_eq!(illegal, Err(Rejection::IllegalMove));
    }

    #[test]
    fn legal_destinations_from_start() {
        let rules = StandardRules::new();
        let start = Position::start_position();

        let pawn = rules.legal_destinations(&start, E2);
        let knight = rules.legal_destinations(&start, G1);
        let bishop = rules.legal_destinations(&start, F1);
        let enemy = rules.legal_destinations(&start, E7);
        let empty = rules.legal_destinations(&start, E4);

        assert_eq!(pawn.len(), 2);
        assert!(pawn.contains(&E3) && pawn.contains(&E4));
        assert_eq!(knight.len(), 2);
        assert!(knight.contains(&F3) && knight.contains(&H3));
        assert!(bishop.is_empty());
        assert!(enemy.is_empty());
        assert!(empty.is_empty());
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let rules = StandardRules::new();
        let pos = fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1");

        let dests = rules.legal_destinations(&pos, E7);
        assert_eq!(dests.as_slice(), &[E8]);

        let queen = rules.apply_move(&pos, Move::new(E7, E8, None)).unwrap();
        let knight = rules
            .apply_move(&pos, Move::new(E7, E8, Some(PieceKind::Knight)))
            .unwrap();
        assert_eq!(queen.notation, "e8=Q");
        assert_eq!(knight.notation, "e8=N");
        assert_eq!(
            rules.piece_at(&queen.position, E8),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
    }

    #[test]
    fn castling_by_king_step() {
        let rules = StandardRules::new();
        let pos = fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");

        let dests = rules.legal_destinations(&pos, E1);
        assert!(dests.contains(&G1));
        assert!(dests.contains(&C1));

        let short = rules.apply_move(&pos, Move::new(E1, G1, None)).unwrap();
        assert_eq!(short.notation, "O-O");
        assert_eq!(
            rules.piece_at(&short.position, F1),
            Some(Piece::new(Color::White, PieceKind::Rook))
        );
    }

    #[test]
    fn checkmate_and_draw_detection() {
        let rules = StandardRules::new();
        let fools_mate = fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        let stalemate = fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        let bare_kings = fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1");

        assert!(rules.is_checkmate(&fools_mate));
        assert_eq!(
            rules.game_status(&fools_mate),
            GameStatus::Checkmate {
                winner: Color::Black
            }
        );
        assert!(rules.is_draw(&stalemate));
        assert!(rules.is_draw(&bare_kings));
        assert_eq!(rules.game_status(&Position::start_position()), GameStatus::Ongoing);
        assert_eq!(
            rules.apply_move(&fools_mate, Move::new(E2, E4, None)),
            Err(Rejection::GameOver)
        );
    }

    #[test]
    fn mating_move_notation() {
        let rules = StandardRules::new();
        let pos = fen("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2");
        let mate = rules.apply_move(&pos, Move::new(D8, H4, None)).unwrap();
        assert_eq!(mate.notation, "Qh4#");
    }

    #[test]
    fn square_conversion_keeps_index() {
        for square in Square::iter() {
            assert_eq!(from_shakmaty(to_shakmaty(square)), Some(square));
        }
        assert_eq!(to_shakmaty(E4), shakmaty::Square::E4);
        assert_eq!(from_shakmaty(shakmaty::Square::H8), Some(H8));
    }

    #[test]
    fn full_game_line_applies_in_order() {
        let rules = StandardRules::new();
        let mut position = Position::start_position();
        let mut notations = Vec::new();
        for (from, to) in [(E2, E4), (E7, E5), (G1, F3), (B8, C6), (F1, B5)] {
            let applied = rules.apply_move(&position, Move::new(from, to, None)).unwrap();
            notations.push(applied.notation);
            position = applied.position;
        }
        assert_eq!(notations, ["e4", "e5", "Nf3", "Nc6", "Bb5"]);
        assert_eq!(rules.side_to_move(&position), Color::Black);
    }

    #[test]
    fn unreadable_position() {
        let rules = StandardRules::new();
        let no_kings = fen("8/8/8/8/8/8/8/8 b - - 0 1");

        assert!(rules.validate(&no_kings).is_err());
        assert!(rules.validate(&Position::start_position()).is_ok());
        assert_eq!(rules.side_to_move(&no_kings), Color::Black);
        assert_eq!(
            rules.apply_move(&no_kings, Move::new(E2, E4, None)),
            Err(Rejection::UnreadablePosition)
        );
    }
}

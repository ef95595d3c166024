//! The fundamental and simple types of `rotachess_core`.

use std::convert::TryFrom;
use std::fmt::{self, Display, Write};
use std::ops::Not;
use std::str::FromStr;

use arrayvec::ArrayVec;

use crate::error::{self, ErrorKind};

///////////////
// Constants //
///////////////
pub const NUM_FILES: usize = 8; // A, B, C, D, E, F, G, H
pub const NUM_RANKS: usize = 8; // 1, 2, 3, 4, 5, 6, 7, 8
pub const NUM_SQUARES: usize = NUM_FILES * NUM_RANKS;

// A queen in the center of an open board reaches 27 squares,
// more than any other piece on any other square.
pub const MAX_DESTINATIONS: usize = 27;

/////////////////////////
// Data and Structures //
/////////////////////////

/// Side of the board: owner of a piece, or the player on move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Color {
    White,
    Black,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

/// Columns a through h. Discriminants index `File::ALL`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[rustfmt::skip]
#[repr(u8)]
pub enum File {
    A, B, C, D, E, F, G, H = 7u8,
}

/// Rows 1 through 8. Discriminants index `Rank::ALL`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[rustfmt::skip]
#[repr(u8)]
pub enum Rank {
    R1, R2, R3, R4, R5, R6, R7, R8 = 7u8,
}

/// Square
/// Every possible square on a chess board, in little-endian rank-file order.
/// `Square::A1 as u8 == 0` and `Square::H8 as u8 == 63`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[rustfmt::skip]
#[repr(u8)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8 = 63u8,
}

/// Move
/// A move attempt as entered by a player: origin, target, and an optional
/// promotion choice. Whether it is legal is decided by the rules oracle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

/// Which side of the board is drawn at the bottom.
/// Independent of game state; only changed by explicit user action.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Orientation {
    #[default]
    White,
    Black,
}

/// Legal destination squares from a single origin square.
pub type Destinations = ArrayVec<Square, MAX_DESTINATIONS>;

//////////////////////
/// Implementations //
//////////////////////

impl Color {
    /// Side to move character of a FEN string.
    pub const fn to_char(&self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// Human readable name, "White" or "Black".
    pub const fn name(&self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl From<Color> for char {
    fn from(color: Color) -> Self {
        color.to_char()
    }
}

impl TryFrom<char> for Color {
    type Error = error::Error;
    fn try_from(ch: char) -> error::Result<Self> {
        match ch {
            'w' => Ok(Color::White),
            'b' => Ok(Color::Black),
            _ => Err((ErrorKind::ParseColorMalformed, "char is not w|b").into()),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(char::from(*self))
    }
}

impl PieceKind {
    /// Uppercase FEN letter, as used for white pieces.
    pub const fn to_char(&self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Returns true if a pawn may promote to this kind.
    pub const fn is_promotable(&self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Piece { color, kind }
    }

    pub const fn to_char(&self) -> char {
        match self.color {
            Color::White => self.kind.to_char(),
            Color::Black => self.kind.to_char().to_ascii_lowercase(),
        }
    }
}

impl From<Piece> for char {
    fn from(piece: Piece) -> Self {
        piece.to_char()
    }
}

impl TryFrom<char> for Piece {
    type Error = error::Error;
    fn try_from(value: char) -> error::Result<Self> {
        let color = match value.is_ascii_uppercase() {
            true => Color::White,
            false => Color::Black,
        };
        let kind = match value.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'R' => PieceKind::Rook,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => {
                return Err((
                    ErrorKind::ParsePieceMalformed,
                    "char is not in PNBRQKpnbrqk",
                )
                    .into())
            }
        };
        Ok(Piece { color, kind })
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(char::from(*self))
    }
}

impl File {
    const ALL: [File; NUM_FILES] = {
        use File::*;
        [A, B, C, D, E, F, G, H]
    };

    /// Files are numbered 0 (a) through 7 (h).
    pub const fn from_u8(value: u8) -> Option<Self> {
        if (value as usize) < NUM_FILES {
            Some(Self::ALL[value as usize])
        } else {
            None
        }
    }

    /// Lowercase file letter.
    pub const fn to_char(&self) -> char {
        (b'a' + *self as u8) as char
    }
}

impl Rank {
    const ALL: [Rank; NUM_RANKS] = {
        use Rank::*;
        [R1, R2, R3, R4, R5, R6, R7, R8]
    };

    /// Ranks are numbered 0 (first rank) through 7 (eighth rank).
    pub const fn from_u8(value: u8) -> Option<Self> {
        if (value as usize) < NUM_RANKS {
            Some(Self::ALL[value as usize])
        } else {
            None
        }
    }

    pub const fn to_char(&self) -> char {
        (b'1' + *self as u8) as char
    }
}

impl TryFrom<char> for File {
    type Error = error::Error;
    fn try_from(ch: char) -> error::Result<Self> {
        match ch {
            'a'..='h' => Ok(Self::ALL[(ch as u8 - b'a') as usize]),
            _ => Err((ErrorKind::ParseFileMalformed, "file char not of abcdefgh").into()),
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = error::Error;
    fn try_from(ch: char) -> error::Result<Self> {
        match ch {
            '1'..='8' => Ok(Self::ALL[(ch as u8 - b'1') as usize]),
            _ => Err((ErrorKind::ParseRankMalformed, "rank char not of 12345678").into()),
        }
    }
}

impl Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.to_char())
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.to_char())
    }
}

impl Square {
    #[rustfmt::skip]
    const ALL: [Square; NUM_SQUARES] = {
        use Square::*;
        [
            A1, B1, C1, D1, E1, F1, G1, H1,
            A2, B2, C2, D2, E2, F2, G2, H2,
            A3, B3, C3, D3, E3, F3, G3, H3,
            A4, B4, C4, D4, E4, F4, G4, H4,
            A5, B5, C5, D5, E5, F5, G5, H5,
            A6, B6, C6, D6, E6, F6, G6, H6,
            A7, B7, C7, D7, E7, F7, G7, H7,
            A8, B8, C8, D8, E8, F8, G8, H8,
        ]
    };

    /// Squares are numbered 0 (a1) through 63 (h8), rank by rank.
    pub const fn from_u8(value: u8) -> Option<Self> {
        if (value as usize) < NUM_SQUARES {
            Some(Self::ALL[value as usize])
        } else {
            None
        }
    }

    pub const fn new(file: File, rank: Rank) -> Self {
        Self::ALL[NUM_FILES * rank as usize + file as usize]
    }

    /// All squares in ascending order, A1 through H8.
    pub fn iter() -> impl DoubleEndedIterator<Item = Square> {
        Self::ALL.into_iter()
    }

    pub const fn file(&self) -> File {
        File::ALL[*self as usize % NUM_FILES]
    }

    pub const fn rank(&self) -> Rank {
        Rank::ALL[*self as usize / NUM_FILES]
    }
}

impl From<(File, Rank)> for Square {
    fn from((file, rank): (File, Rank)) -> Self {
        Self::new(file, rank)
    }
}

/// Algebraic square name, lowercase file then rank: "e4".
impl FromStr for Square {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        let mut chars = s.chars();
        let file = File::try_from(chars.next().ok_or(ErrorKind::ParseSquareMalformed)?)?;
        let rank = Rank::try_from(chars.next().ok_or(ErrorKind::ParseSquareMalformed)?)?;
        if chars.next().is_some() {
            return Err((ErrorKind::ParseSquareMalformed, s).into());
        }
        Ok(Square::new(file, rank))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl Move {
    pub const fn new(from: Square, to: Square, promotion: Option<PieceKind>) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }

    /// The promotion piece to use if this move turns out to be a promotion.
    /// Players dragging a pawn to the last rank get a queen unless they chose otherwise.
    pub fn promotion_or(&self, default: PieceKind) -> PieceKind {
        self.promotion.unwrap_or(default)
    }
}

/// Parses `Pure Algebraic Coordinate Notation`, "e2e4" or "e7e8q".
impl FromStr for Move {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err((ErrorKind::ParseMoveMalformed, s).into());
        }

        let from: Square = s[0..2].parse()?;
        let to: Square = s[2..4].parse()?;

        let promotion = match s.chars().nth(4) {
            None => None,
            Some('q') => Some(PieceKind::Queen),
            Some('r') => Some(PieceKind::Rook),
            Some('b') => Some(PieceKind::Bishop),
            Some('n') => Some(PieceKind::Knight),
            Some(_) => return Err((ErrorKind::ParseMoveMalformed, s).into()),
        };

        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

/// # Example
/// `Move::new(A7, B8, Some(Queen))` prints as `a7b8q`.
impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            f.write_char(kind.to_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl Orientation {
    pub const fn flip(&self) -> Self {
        match self {
            Orientation::White => Orientation::Black,
            Orientation::Black => Orientation::White,
        }
    }

    /// Color of the pieces drawn at the bottom of the board.
    pub const fn bottom(&self) -> Color {
        match self {
            Orientation::White => Color::White,
            Orientation::Black => Color::Black,
        }
    }

    /// Rows of the board from top to bottom, as seen by the viewer.
    pub fn ranks_top_down(&self) -> impl Iterator<Item = Rank> {
        let mut ranks = Rank::ALL;
        if *self == Orientation::White {
            ranks.reverse();
        }
        ranks.into_iter()
    }

    /// Columns of the board from left to right, as seen by the viewer.
    pub fn files_left_right(&self) -> impl Iterator<Item = File> {
        let mut files = File::ALL;
        if *self == Orientation::Black {
            files.reverse();
        }
        files.into_iter()
    }
}

//! Board primitives shared by the whole rules core: squares, files, ranks,
//! directions, players, pieces, moves and the move-validation error taxonomy.

use std::{fmt, mem, ops};

use anyhow::bail;
use arrayvec::ArrayVec;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// An upper bound on the number of moves a single position can produce. Used
/// to keep move lists on the stack.
pub const MAX_MOVES: usize = 256;

/// Bounded scratch list filled by move generation.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

/// Represents a column (vertical row) of the chessboard. In chess notation,
/// it is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", (b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(unsafe { mem::transmute::<u8, Self>(file as u8 - b'a') }),
            _ => bail!("unknown file: expected within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match column {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(column) }),
            _ => bail!("unknown file: expected within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}

impl Rank {
    /// The rank a player's pawns start on.
    pub(crate) const fn pawn_start(player: Player) -> Self {
        match player {
            Player::White => Self::Two,
            Player::Black => Self::Seven,
        }
    }

    /// The rank a player's pawns promote on.
    pub(crate) const fn promotion(player: Player) -> Self {
        match player {
            Player::White => Self::Eight,
            Player::Black => Self::One,
        }
    }

    /// The rank a player's king and rooks start on.
    pub(crate) const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Eight,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute::<u8, Self>(rank as u8 - b'1') }),
            _ => bail!("unknown rank: expected within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match row {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(row) }),
            _ => bail!("unknown rank: expected within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use rukh::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// The absence of a square (e.g. an unset en passant target, rendered as `-`
/// in FEN) is modeled with `Option<Square>`.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        unsafe { mem::transmute(rank as u8 * BOARD_WIDTH + file as u8) }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self as u8 % BOARD_WIDTH) }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(self as u8 / BOARD_WIDTH) }
    }

    /// Returns the square reached by stepping `file_delta` files and
    /// `rank_delta` ranks from this one, or `None` when the step leaves the
    /// board.
    pub(crate) fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        if !(0..BOARD_WIDTH as i8).contains(&file) || !(0..BOARD_WIDTH as i8).contains(&rank) {
            return None;
        }
        Some(unsafe { mem::transmute::<u8, Self>((rank * BOARD_WIDTH as i8 + file) as u8) })
    }

    /// Single step in the given compass direction.
    pub(crate) fn shift(self, direction: Direction) -> Option<Self> {
        self.offset(direction.file_step(), direction.rank_step())
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    /// Parses a square from algebraic notation, e.g. "e4".
    fn try_from(square: &str) -> anyhow::Result<Self> {
        let mut chars = square.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Ok(Self::new(file.try_into()?, rank.try_into()?)),
            _ => bail!("unknown square: expected two chars in [a-h][1-8], got '{square}'"),
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// The direction this player's pawns advance in, as a rank step.
    pub(crate) const fn pawn_direction(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }
}

impl ops::Not for Player {
    type Output = Self;

    /// Returns the opponent.
    fn not(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("unknown player: expected 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::White => write!(f, "w"),
            Self::Black => write!(f, "b"),
        }
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

/// Represents a specific piece owned by a player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    #[allow(missing_docs)]
    pub player: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    /// Algebraic notation symbol used in FEN. Uppercase for white, lowercase
    /// for black.
    pub(crate) const fn algebraic_symbol(self) -> char {
        let symbol = match self.kind {
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Pawn => 'p',
        };
        match self.player {
            Player::White => symbol.to_ascii_uppercase(),
            Player::Black => symbol,
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail!("unknown piece symbol: expected within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        let player = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        Ok(Self { player, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.algebraic_symbol())
    }
}

/// The piece kinds a pawn can be promoted into.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// All promotion targets, in the order they are expanded during move
    /// generation.
    pub(crate) const ALL: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl TryFrom<char> for Promotion {
    type Error = MoveError;

    fn try_from(symbol: char) -> Result<Self, MoveError> {
        match symbol.to_ascii_lowercase() {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            _ => Err(MoveError::InvalidPromotion),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Queen => write!(f, "q"),
            Self::Rook => write!(f, "r"),
            Self::Bishop => write!(f, "b"),
            Self::Knight => write!(f, "n"),
        }
    }
}

/// Directions on the board from the perspective of the White player: "up"
/// means towards Black's backrank.
#[derive(Copy, Clone, Debug)]
#[allow(missing_docs)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// Rook rays.
    pub(crate) const STRAIGHT: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
    /// Bishop rays.
    pub(crate) const DIAGONAL: [Self; 4] =
        [Self::UpLeft, Self::UpRight, Self::DownLeft, Self::DownRight];

    pub(crate) const fn file_step(self) -> i8 {
        match self {
            Self::Up | Self::Down => 0,
            Self::Left | Self::UpLeft | Self::DownLeft => -1,
            Self::Right | Self::UpRight | Self::DownRight => 1,
        }
    }

    pub(crate) const fn rank_step(self) -> i8 {
        match self {
            Self::Left | Self::Right => 0,
            Self::Up | Self::UpLeft | Self::UpRight => 1,
            Self::Down | Self::DownLeft | Self::DownRight => -1,
        }
    }
}

bitflags::bitflags! {
    /// Tracks the ability to [castle] for both players and both wings
    /// (kingside is often referred to as O-O, queenside as O-O-O). A right
    /// survives only while the king and the corresponding rook have never
    /// left their home squares and the rook has not been captured there.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct CastleRights: u8 {
        /// White may castle kingside (`K` in FEN).
        const WHITE_SHORT = 1 << 0;
        /// White may castle queenside (`Q` in FEN).
        const WHITE_LONG = 1 << 1;
        /// Black may castle kingside (`k` in FEN).
        const BLACK_SHORT = 1 << 2;
        /// Black may castle queenside (`q` in FEN).
        const BLACK_LONG = 1 << 3;
    }
}

impl CastleRights {
    /// The kingside right of the given player.
    pub(crate) const fn short(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_SHORT,
            Player::Black => Self::BLACK_SHORT,
        }
    }

    /// The queenside right of the given player.
    pub(crate) const fn long(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_LONG,
            Player::Black => Self::BLACK_LONG,
        }
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses the castling field of a FEN record: `-` or any combination of
    /// `K`, `Q`, `k` and `q`.
    fn try_from(fen: &str) -> anyhow::Result<Self> {
        if fen == "-" {
            return Ok(Self::empty());
        }
        let mut rights = Self::empty();
        for symbol in fen.chars() {
            rights |= match symbol {
                'K' => Self::WHITE_SHORT,
                'Q' => Self::WHITE_LONG,
                'k' => Self::BLACK_SHORT,
                'q' => Self::BLACK_LONG,
                _ => bail!("unknown castling symbol: expected within \"KQkq\", got '{symbol}'"),
            };
        }
        Ok(rights)
    }
}

impl fmt::Display for CastleRights {
    /// Emits the castling field of a FEN record, `KQkq` order.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (right, symbol) in [
            (Self::WHITE_SHORT, 'K'),
            (Self::WHITE_LONG, 'Q'),
            (Self::BLACK_SHORT, 'k'),
            (Self::BLACK_LONG, 'q'),
        ] {
            if self.contains(right) {
                write!(f, "{symbol}")?;
            }
        }
        Ok(())
    }
}

/// A candidate state transition: moving a piece between two squares,
/// optionally promoting a pawn on arrival.
///
/// A `Move` carries no validity promise of its own; it becomes meaningful
/// only against the position it is applied to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<Promotion>,
}

impl Move {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(from: Square, to: Square, promotion: Option<Promotion>) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(self) -> Square {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(self) -> Square {
        self.to
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn promotion(self) -> Option<Promotion> {
        self.promotion
    }

    /// Parses a move from [UCI notation]: `<from><to>` with an optional
    /// promotion suffix in `qrbn`, e.g. "e2e4" or "a7a8q". Parsing is
    /// case-insensitive; anything that is not 4 or 5 characters long is
    /// rejected.
    ///
    /// [UCI notation]: https://www.chessprogramming.org/UCI
    pub fn from_uci(input: &str) -> Result<Self, MoveError> {
        let input = input.trim().to_ascii_lowercase();
        if !input.is_ascii() || !(4..=5).contains(&input.len()) {
            return Err(MoveError::InvalidMoveString);
        }
        let from =
            Square::try_from(&input[0..2]).map_err(|_error| MoveError::InvalidSquare)?;
        let to = Square::try_from(&input[2..4]).map_err(|_error| MoveError::InvalidSquare)?;
        let promotion = match input[4..].chars().next() {
            Some(symbol) => Some(Promotion::try_from(symbol)?),
            None => None,
        };
        Ok(Self::new(from, to, promotion))
    }
}

impl fmt::Display for Move {
    /// Emits the move in lowercase UCI notation.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}

/// The closed set of reasons a candidate move can be refused.
///
/// None of these carries a state change: a refused move leaves the position
/// exactly as it was.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveError {
    /// A square reference outside `a1..h8`.
    InvalidSquare,
    /// Origin and destination are the same square.
    SameSquare,
    /// The origin square is empty.
    NoMoveablePiece,
    /// The origin piece does not belong to the side to move.
    WrongTurn,
    /// The destination holds a piece of the mover's own color.
    CaptureOwnPiece,
    /// The move violates the piece's motion rules, fails a castling
    /// precondition or leaves the mover's king in check.
    IllegalMove,
    /// A promotion was supplied where none is allowed, or the promotion
    /// symbol is not one of `qrbn`.
    InvalidPromotion,
    /// UCI move text of the wrong shape.
    InvalidMoveString,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let reason = match self {
            Self::InvalidSquare => "invalid square",
            Self::SameSquare => "cannot move to the same square",
            Self::NoMoveablePiece => "no piece to move",
            Self::WrongTurn => "not your turn",
            Self::CaptureOwnPiece => "cannot capture own piece",
            Self::IllegalMove => "illegal move for this piece",
            Self::InvalidPromotion => "invalid promotion",
            Self::InvalidMoveString => "move string must be 4 or 5 characters",
        };
        write!(f, "{reason}")
    }
}

impl std::error::Error for MoveError {}

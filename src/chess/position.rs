//! Provides the fully-specified [Chess Position] implementation: piece
//! placement plus the state that does not live on the board (side to move,
//! castling rights, en passant target, halfmove clock, fullmove counter and
//! the cached Zobrist key).
//!
//! [`Position::make_move`] is the only mutating entry point; it validates
//! the candidate first and either commits every side effect of the move or
//! leaves the position untouched.
//!
//! [Chess Position]: https://www.chessprogramming.org/Chess_Position

use std::fmt::{self, Write};

use anyhow::{bail, Context};
use strum::IntoEnumIterator;

use crate::chess::core::{
    CastleRights, File, Move, MoveError, MoveList, Piece, PieceKind, Player, Rank, Square,
    BOARD_SIZE, BOARD_WIDTH,
};
use crate::chess::{attacks, generated, movegen, zobrist};

/// Square-centric implementation of the chess position: a 64-slot mailbox
/// holding an optional piece per square, together with the castling,
/// en passant and move-clock state.
///
/// Cloning a `Position` deep-copies the mailbox, so a clone can be mutated
/// freely without affecting the original. The move validator relies on this
/// for its self-check simulation, and callers can use it to try moves out.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    squares: [Option<Piece>; BOARD_SIZE as usize],
    side_to_move: Player,
    castling: CastleRights,
    en_passant_square: Option<Square>,
    /// [Halfmove Clock] tracking the number of plies since the last capture
    /// or pawn move, used for the fifty-move draw claim.
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    halfmove_clock: u8,
    fullmove_counter: u16,
    hash: zobrist::Key,
}

impl Position {
    /// Creates the starting position of standard chess.
    ///
    /// ```
    /// use rukh::chess::position::Position;
    ///
    /// assert_eq!(
    ///     Position::starting().to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        const BACKRANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut squares = [None; BOARD_SIZE as usize];
        for (file, &kind) in File::iter().zip(BACKRANK.iter()) {
            for (player, backrank, pawn_rank) in [
                (Player::White, Rank::One, Rank::Two),
                (Player::Black, Rank::Eight, Rank::Seven),
            ] {
                squares[Square::new(file, backrank) as usize] = Some(Piece { player, kind });
                squares[Square::new(file, pawn_rank) as usize] = Some(Piece {
                    player,
                    kind: PieceKind::Pawn,
                });
            }
        }
        let mut result = Self {
            squares,
            side_to_move: Player::White,
            castling: CastleRights::all(),
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_counter: 1,
            hash: 0,
        };
        result.hash = result.compute_hash();
        result
    }

    /// Parses a position from the six space-separated fields of
    /// [Forsyth-Edwards Notation]: piece placement, side to move, castling
    /// rights, en passant target, halfmove clock and fullmove number.
    ///
    /// Returns a descriptive error on any malformed field. Piece counts are
    /// deliberately not policed: synthetic positions (even kingless ones)
    /// are accepted and handled defensively by the rest of the core.
    ///
    /// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split(' ');

        let Some(placement) = parts.next() else {
            bail!("missing piece placement");
        };
        let mut squares = [None; BOARD_SIZE as usize];
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            bail!("expected 8 ranks, got {}", ranks.len());
        }
        for (row, rank_fen) in ranks.iter().enumerate() {
            let rank = Rank::try_from(7 - row as u8)?;
            let mut file: u8 = 0;
            for symbol in rank_fen.chars() {
                if let Some(skip) = symbol.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        bail!("invalid empty-square run '{symbol}' in rank {rank}");
                    }
                    file += skip as u8;
                } else {
                    if file >= BOARD_WIDTH {
                        bail!("rank {rank} overflows the board");
                    }
                    let piece = Piece::try_from(symbol)?;
                    squares[Square::new(File::try_from(file)?, rank) as usize] = Some(piece);
                    file += 1;
                }
                if file > BOARD_WIDTH {
                    bail!("rank {rank} overflows the board");
                }
            }
            if file != BOARD_WIDTH {
                bail!("rank {rank} has {file} files, expected {BOARD_WIDTH}");
            }
        }

        let side_to_move = match parts.next() {
            Some(value) => Player::try_from(value)?,
            None => bail!("missing side to move"),
        };
        let castling = match parts.next() {
            Some(value) => CastleRights::try_from(value)?,
            None => bail!("missing castling rights"),
        };
        let en_passant_square = match parts.next() {
            Some("-") => None,
            Some(value) => Some(
                Square::try_from(value)
                    .with_context(|| format!("bad en passant square '{value}'"))?,
            ),
            None => bail!("missing en passant square"),
        };
        let halfmove_clock = match parts.next() {
            Some(value) => value
                .parse::<u8>()
                .with_context(|| format!("halfmove clock can not be parsed: '{value}'"))?,
            None => bail!("missing halfmove clock"),
        };
        let fullmove_counter = match parts.next() {
            Some(value) => match value.parse::<u16>() {
                Ok(0) => bail!("fullmove counter can not be 0"),
                Ok(number) => number,
                Err(error) => {
                    return Err(error)
                        .with_context(|| format!("fullmove counter can not be parsed: '{value}'"));
                }
            },
            None => bail!("missing fullmove number"),
        };
        if parts.next().is_some() {
            bail!("trailing fields");
        }

        let mut result = Self {
            squares,
            side_to_move,
            castling,
            en_passant_square,
            halfmove_clock,
            fullmove_counter,
            hash: 0,
        };
        result.hash = result.compute_hash();
        Ok(result)
    }

    /// The player whose turn it is.
    #[must_use]
    pub const fn us(&self) -> Player {
        self.side_to_move
    }

    /// The player waiting for their turn.
    #[must_use]
    pub fn them(&self) -> Player {
        !self.us()
    }

    /// The piece standing on the given square, if any.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    /// Current castling availability of both players.
    #[must_use]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    /// The square a pawn could capture onto en passant, set for exactly one
    /// ply after a double pawn push.
    #[must_use]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    /// Plies since the last capture or pawn move.
    #[must_use]
    pub const fn halfmove_clock(&self) -> u8 {
        self.halfmove_clock
    }

    /// Move number, starting at 1 and incremented after each Black move.
    #[must_use]
    pub const fn fullmove_counter(&self) -> u16 {
        self.fullmove_counter
    }

    /// Zobrist hash of the position.
    #[must_use]
    pub const fn hash(&self) -> zobrist::Key {
        self.hash
    }

    /// Reports whether the given player's king is attacked. A missing king
    /// (possible on synthetic positions) is reported as "in check" instead
    /// of panicking.
    #[must_use]
    pub fn in_check(&self, player: Player) -> bool {
        match self.king_square(player) {
            Some(king) => attacks::is_square_attacked(self, king, !player),
            None => true,
        }
    }

    /// Reports whether the given player is checkmated: in check with no
    /// legal move available.
    #[must_use]
    pub fn is_checkmate(&self, player: Player) -> bool {
        self.in_check(player) && !self.has_legal_move(player)
    }

    /// Reports whether the given player is stalemated: not in check but
    /// without a legal move.
    #[must_use]
    pub fn is_stalemate(&self, player: Player) -> bool {
        !self.in_check(player) && !self.has_legal_move(player)
    }

    /// Reports whether the fifty-move draw can be claimed: one hundred plies
    /// without a capture or a pawn move.
    #[must_use]
    pub const fn can_claim_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Reports whether neither player can possibly deliver checkmate:
    /// K vs K, a single knight or bishop against a bare king, or one bishop
    /// each with both confined to squares of the same color.
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        #[derive(Default)]
        struct Minors {
            knights: u8,
            bishops: u8,
            light_squared_bishops: u8,
        }

        let mut white = Minors::default();
        let mut black = Minors::default();
        for square in Square::iter() {
            let Some(piece) = self.at(square) else {
                continue;
            };
            let minors = match piece.player {
                Player::White => &mut white,
                Player::Black => &mut black,
            };
            match piece.kind {
                // Any of these can force mate (or promote into one).
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
                PieceKind::Knight => minors.knights += 1,
                PieceKind::Bishop => {
                    minors.bishops += 1;
                    if (square.file() as u8 + square.rank() as u8) % 2 == 0 {
                        minors.light_squared_bishops += 1;
                    }
                }
                PieceKind::King => {}
            }
        }

        // Two minors together (BB, BN, NN helpmates) count as mating
        // material.
        let white_minors = white.knights + white.bishops;
        let black_minors = black.knights + black.bishops;
        if white_minors >= 2 || black_minors >= 2 {
            return false;
        }
        // K vs K, K+N vs K or K+B vs K.
        if white_minors + black_minors <= 1 {
            return true;
        }
        // One minor each: drawn only when both are bishops living on the
        // same square color.
        white.bishops == 1
            && black.bishops == 1
            && white.light_squared_bishops == black.light_squared_bishops
    }

    /// Enumerates candidate moves for the side to move, before castling
    /// preconditions and the self-check filter are applied.
    #[must_use]
    pub fn pseudo_legal_moves(&self) -> MoveList {
        movegen::pseudo_legal_moves(self)
    }

    /// Calculates the list of fully legal moves for the side to move. Every
    /// returned move is guaranteed to be accepted by [`Position::make_move`].
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        movegen::legal_moves(self)
    }

    /// Transitions to the next position by applying the move.
    ///
    /// The candidate is validated first (basic shape, per-piece rules,
    /// self-check); on rejection the position is left untouched. On success
    /// all side effects are committed: the en passant capture, the castling
    /// rook displacement, promotion, castling-right invalidation, the move
    /// clocks, the en passant target, the turn flip and the hash.
    pub fn make_move(&mut self, next_move: &Move) -> Result<(), MoveError> {
        movegen::validate(self, next_move)?;

        let (from, to) = (next_move.from(), next_move.to());
        let Some(piece) = self.at(from) else {
            return Err(MoveError::NoMoveablePiece);
        };

        let mut captured = self.at(to);

        // An en passant capture removes the pawn standing behind the target
        // square rather than one on the destination.
        if piece.kind == PieceKind::Pawn && Some(to) == self.en_passant_square && captured.is_none()
        {
            let captured_square = Square::new(to.file(), from.rank());
            captured = self.at(captured_square);
            self.squares[captured_square as usize] = None;
        }

        // Capturing a rook on its home corner retires the matching right.
        if captured.is_some_and(|target| target.kind == PieceKind::Rook) {
            self.castling.remove(match to {
                Square::A1 => CastleRights::WHITE_LONG,
                Square::H1 => CastleRights::WHITE_SHORT,
                Square::A8 => CastleRights::BLACK_LONG,
                Square::H8 => CastleRights::BLACK_SHORT,
                _ => CastleRights::empty(),
            });
        }

        // Castling also displaces the rook: H to F on the kingside, A to D
        // on the queenside.
        if piece.kind == PieceKind::King
            && (to.file() as i8 - from.file() as i8).abs() == 2
            && from.rank() == to.rank()
        {
            let home = from.rank();
            let (rook_from, rook_to) = if to.file() == File::G {
                (Square::new(File::H, home), Square::new(File::F, home))
            } else {
                (Square::new(File::A, home), Square::new(File::D, home))
            };
            self.squares[rook_to as usize] = self.squares[rook_from as usize].take();
        }

        self.squares[to as usize] = self.squares[from as usize].take();

        if let Some(promotion) = next_move.promotion() {
            self.squares[to as usize] = Some(Piece {
                player: piece.player,
                kind: promotion.into(),
            });
        }

        self.update_castling_rights(from, piece);

        if piece.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        // A double pawn push arms en passant on the square it skipped;
        // anything else disarms it.
        if piece.kind == PieceKind::Pawn && (to.rank() as i8 - from.rank() as i8).abs() == 2 {
            self.en_passant_square = from.offset(0, piece.player.pawn_direction());
        } else {
            self.en_passant_square = None;
        }

        if self.side_to_move == Player::Black {
            self.fullmove_counter = self.fullmove_counter.saturating_add(1);
        }
        self.side_to_move = !self.side_to_move;

        self.hash = self.compute_hash();

        Ok(())
    }

    /// Applies a move with no validation and without touching the clocks,
    /// rights, turn or hash. This is the king-safety simulation primitive:
    /// it reproduces exactly the board mutations of [`Position::make_move`]
    /// (en passant removal, rook displacement, relocation, promotion) on a
    /// scratch clone.
    pub(crate) fn apply_unchecked(&mut self, next_move: &Move) {
        let (from, to) = (next_move.from(), next_move.to());
        let Some(piece) = self.at(from) else {
            return;
        };

        if piece.kind == PieceKind::Pawn
            && Some(to) == self.en_passant_square
            && self.at(to).is_none()
        {
            let captured_square = Square::new(to.file(), from.rank());
            self.squares[captured_square as usize] = None;
        }

        if piece.kind == PieceKind::King
            && (to.file() as i8 - from.file() as i8).abs() == 2
            && from.rank() == to.rank()
        {
            let home = from.rank();
            if to.file() == File::G {
                self.squares[Square::new(File::F, home) as usize] =
                    self.squares[Square::new(File::H, home) as usize].take();
            } else if to.file() == File::C {
                self.squares[Square::new(File::D, home) as usize] =
                    self.squares[Square::new(File::A, home) as usize].take();
            }
        }

        self.squares[to as usize] = self.squares[from as usize].take();

        if let Some(promotion) = next_move.promotion() {
            self.squares[to as usize] = Some(Piece {
                player: piece.player,
                kind: promotion.into(),
            });
        }
    }

    /// Computes the Zobrist hash of the position from scratch. The cached
    /// [`Position::hash`] is refreshed from this after every transition, so
    /// the two always agree.
    pub(crate) fn compute_hash(&self) -> zobrist::Key {
        let mut key = 0;

        if self.side_to_move == Player::Black {
            key ^= generated::SIDE_TO_MOVE;
        }

        for (index, right) in [
            CastleRights::WHITE_SHORT,
            CastleRights::WHITE_LONG,
            CastleRights::BLACK_SHORT,
            CastleRights::BLACK_LONG,
        ]
        .into_iter()
        .enumerate()
        {
            if self.castling.contains(right) {
                key ^= generated::CASTLING_RIGHTS[index];
            }
        }

        // The en passant file participates only when a pawn of the side to
        // move is actually positioned to capture onto the target; two
        // positions differing in an unreachable target are the same
        // position.
        if let Some(square) = self.en_passant_square {
            if self.en_passant_capture_possible() {
                key ^= generated::EN_PASSANT_FILES[square.file() as usize];
            }
        }

        for square in Square::iter() {
            if let Some(piece) = self.at(square) {
                key ^= generated::piece_key(piece, square);
            }
        }

        key
    }

    fn en_passant_capture_possible(&self) -> bool {
        let Some(target) = self.en_passant_square else {
            return false;
        };
        let direction = self.side_to_move.pawn_direction();
        [-1, 1].into_iter().any(|file_delta| {
            target.offset(file_delta, -direction).is_some_and(|square| {
                self.at(square).is_some_and(|piece| {
                    piece.player == self.side_to_move && piece.kind == PieceKind::Pawn
                })
            })
        })
    }

    fn update_castling_rights(&mut self, from: Square, piece: Piece) {
        if piece.kind == PieceKind::King {
            self.castling
                .remove(CastleRights::short(piece.player) | CastleRights::long(piece.player));
            return;
        }
        self.castling.remove(match from {
            Square::A1 => CastleRights::WHITE_LONG,
            Square::H1 => CastleRights::WHITE_SHORT,
            Square::A8 => CastleRights::BLACK_LONG,
            Square::H8 => CastleRights::BLACK_SHORT,
            _ => CastleRights::empty(),
        });
    }

    fn king_square(&self, player: Player) -> Option<Square> {
        Square::iter().find(|&square| {
            self.at(square)
                .is_some_and(|piece| piece.kind == PieceKind::King && piece.player == player)
        })
    }

    /// Terminal-state detection is side-to-move-neutral: querying the
    /// waiting player works on a scratch clone instead of toggling the turn
    /// in place, which keeps shared read access safe.
    fn has_legal_move(&self, player: Player) -> bool {
        if self.side_to_move == player {
            return !self.legal_moves().is_empty();
        }
        let mut flipped = self.clone();
        flipped.side_to_move = player;
        flipped.hash = flipped.compute_hash();
        !flipped.legal_moves().is_empty()
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Trims the input and parses it as FEN.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        Self::from_fen(input.trim())
    }
}

impl fmt::Display for Position {
    /// Returns the position in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut empty_squares = 0;
            for file in File::iter() {
                if let Some(piece) = self.at(Square::new(file, rank)) {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{piece}")?;
                } else {
                    empty_squares += 1;
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                write!(f, "/")?;
            }
        }
        write!(f, " {} ", self.side_to_move)?;
        write!(f, "{} ", self.castling)?;
        match self.en_passant_square {
            Some(square) => write!(f, "{square} ")?,
            None => write!(f, "- ")?,
        }
        write!(f, "{} {}", self.halfmove_clock, self.fullmove_counter)
    }
}

impl fmt::Debug for Position {
    /// Dumps the board in a human-readable grid ('.' for an empty square,
    /// the FEN symbol for a piece) followed by the position state.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board:")?;
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece}")?,
                    None => f.write_char('.')?,
                }
                if file != File::H {
                    f.write_char(' ')?;
                }
            }
            f.write_char('\n')?;
        }
        writeln!(f, "Side to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Castling rights: {}", &self.castling)?;
        writeln!(f, "En passant: {:?}", &self.en_passant_square)?;
        writeln!(f, "Halfmove clock: {}", &self.halfmove_clock)?;
        writeln!(f, "Fullmove counter: {}", &self.fullmove_counter)?;
        writeln!(f, "FEN: {}", &self)
    }
}

/// [Perft] (**per**formance **t**esting) walks the tree of legal moves to a
/// fixed depth and counts the leaf nodes. The node counts of well-known
/// positions are published, which makes this the standard probe for move
/// generation correctness.
///
/// [Perft]: https://www.chessprogramming.org/Perft
#[must_use]
pub fn perft(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    if depth == 1 {
        return position.legal_moves().len() as u64;
    }
    let mut nodes = 0;
    for next_move in position.legal_moves() {
        let mut next_position = position.clone();
        let applied = next_position.make_move(&next_move);
        debug_assert!(applied.is_ok(), "legal move {next_move} was rejected");
        nodes += perft(&next_position, depth - 1);
    }
    nodes
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::Promotion;

    const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn setup(fen: &str) -> Position {
        Position::from_fen(fen).expect("valid test position")
    }

    fn uci(input: &str) -> Move {
        Move::from_uci(input).expect("valid move string")
    }

    #[test]
    fn starting_position() {
        let position = Position::starting();
        assert_eq!(position.to_string(), STARTING_FEN);
        assert_eq!(position.us(), Player::White);
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_counter(), 1);
        assert_eq!(position.castling(), CastleRights::all());
        assert_eq!(position.en_passant_square(), None);
        assert_eq!(
            position.at(Square::E1),
            Some(Piece {
                player: Player::White,
                kind: PieceKind::King
            })
        );
        assert_eq!(position.at(Square::E4), None);
    }

    #[test]
    fn debug_dump() {
        assert_eq!(
            format!("{:?}", Position::starting()),
            "Board:\n\
             r n b q k b n r\n\
             p p p p p p p p\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             P P P P P P P P\n\
             R N B Q K B N R\n\
             Side to move: White\n\
             Castling rights: KQkq\n\
             En passant: None\n\
             Halfmove clock: 0\n\
             Fullmove counter: 1\n\
             FEN: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1\n"
        );
    }

    #[test]
    fn fen_round_trips() {
        for fen in [
            STARTING_FEN,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "8/8/8/8/8/8/4P3/4K2R b K e3 12 7",
            "4k3/8/8/8/8/8/8/4K3 w - - 99 50",
        ] {
            assert_eq!(setup(fen).to_string(), fen);
        }
    }

    #[test]
    fn fen_parsing_errors() {
        for (input, expected) in [
            ("", "expected 8 ranks"),
            ("8/8/8/8/8/8/8", "expected 8 ranks"),
            ("8/8/8/8/8/8/8/8/8 w - - 0 1", "expected 8 ranks"),
            ("9/8/8/8/8/8/8/8 w - - 0 1", "invalid empty-square run"),
            ("ppppppppp/8/8/8/8/8/8/8 w - - 0 1", "overflows the board"),
            ("7/8/8/8/8/8/8/8 w - - 0 1", "has 7 files"),
            ("x7/8/8/8/8/8/8/8 w - - 0 1", "unknown piece symbol"),
            ("8/8/8/8/8/8/8/8 x - - 0 1", "unknown player"),
            ("8/8/8/8/8/8/8/8 w X - 0 1", "unknown castling symbol"),
            ("8/8/8/8/8/8/8/8 w - e9 0 1", "bad en passant square"),
            ("8/8/8/8/8/8/8/8 w - - -1 1", "halfmove clock"),
            ("8/8/8/8/8/8/8/8 w - - x 1", "halfmove clock"),
            ("8/8/8/8/8/8/8/8 w - - 0 0", "can not be 0"),
            ("8/8/8/8/8/8/8/8 w - - 0 x", "fullmove counter"),
            ("8/8/8/8/8/8/8/8 w - -", "missing halfmove clock"),
            ("8/8/8/8/8/8/8/8 w - - 0 1 extra", "trailing fields"),
        ] {
            let error = Position::from_fen(input).expect_err(input);
            assert!(
                format!("{error:#}").contains(expected),
                "parsing {input:?} produced {error:#}, expected {expected:?}"
            );
        }
    }

    #[test]
    fn validation_failure_leaves_position_untouched() {
        let mut position = Position::starting();
        let before = position.clone();
        assert_eq!(position.make_move(&uci("e2e5")), Err(MoveError::IllegalMove));
        assert_eq!(position, before);
        assert_eq!(position.hash(), before.hash());
    }

    #[test]
    fn quiet_moves_tick_the_halfmove_clock() {
        let mut position = setup("4k1n1/8/8/8/8/8/4P3/1N2K3 w - - 0 1");
        position.make_move(&uci("b1a3")).unwrap();
        assert_eq!(position.halfmove_clock(), 1);
        position.make_move(&uci("g8h6")).unwrap();
        assert_eq!(position.halfmove_clock(), 2);
        // A pawn move resets the clock.
        position.make_move(&uci("e2e4")).unwrap();
        assert_eq!(position.halfmove_clock(), 0);
    }

    #[test]
    fn captures_reset_the_halfmove_clock() {
        let mut position = setup("4k3/8/8/3r4/8/8/3R4/4K3 w - - 31 40");
        position.make_move(&uci("d2d5")).unwrap();
        assert_eq!(position.halfmove_clock(), 0);
    }

    #[test]
    fn fullmove_counter_increments_after_black() {
        let mut position = Position::starting();
        position.make_move(&uci("e2e4")).unwrap();
        assert_eq!(position.fullmove_counter(), 1);
        position.make_move(&uci("e7e5")).unwrap();
        assert_eq!(position.fullmove_counter(), 2);
    }

    #[test]
    fn double_push_arms_en_passant() {
        let mut position = setup("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        position.make_move(&uci("e2e4")).unwrap();
        assert_eq!(position.en_passant_square(), Some(Square::E3));
        // Any following move disarms it.
        position.make_move(&uci("e8e7")).unwrap();
        assert_eq!(position.en_passant_square(), None);
    }

    #[test]
    fn en_passant_capture_removes_the_pawn_behind() {
        let mut position = setup("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1");
        position.make_move(&uci("d7d5")).unwrap();
        assert_eq!(position.en_passant_square(), Some(Square::D6));

        position.make_move(&uci("e5d6")).unwrap();
        assert_eq!(position.at(Square::D5), None);
        assert_eq!(
            position.at(Square::D6),
            Some(Piece {
                player: Player::White,
                kind: PieceKind::Pawn
            })
        );
        // En passant is a capture: the clock resets.
        assert_eq!(position.halfmove_clock(), 0);
    }

    #[test]
    fn en_passant_exposing_own_king_is_rejected() {
        // Capturing en passant would clear both pawns off the fifth rank
        // and leave the king staring at the rook.
        let position = setup("8/8/8/KPp4r/8/8/8/7k w - c6 0 2");
        assert_eq!(
            position.clone().make_move(&uci("b5c6")),
            Err(MoveError::IllegalMove)
        );
        assert!(!position
            .legal_moves()
            .iter()
            .any(|candidate| candidate.to_string() == "b5c6"));
    }

    #[test]
    fn kingside_castling_moves_both_pieces() {
        let mut position = setup("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        position.make_move(&uci("e1g1")).unwrap();
        assert_eq!(
            position.at(Square::G1),
            Some(Piece {
                player: Player::White,
                kind: PieceKind::King
            })
        );
        assert_eq!(
            position.at(Square::F1),
            Some(Piece {
                player: Player::White,
                kind: PieceKind::Rook
            })
        );
        assert_eq!(position.at(Square::H1), None);
        assert_eq!(position.at(Square::E1), None);
        assert_eq!(position.castling(), CastleRights::empty());
    }

    #[test]
    fn queenside_castling_moves_both_pieces() {
        let mut position = setup("r3k3/8/8/8/8/8/8/4K3 b q - 0 1");
        position.make_move(&uci("e8c8")).unwrap();
        assert_eq!(
            position.at(Square::C8),
            Some(Piece {
                player: Player::Black,
                kind: PieceKind::King
            })
        );
        assert_eq!(
            position.at(Square::D8),
            Some(Piece {
                player: Player::Black,
                kind: PieceKind::Rook
            })
        );
        assert_eq!(position.at(Square::A8), None);
        assert_eq!(position.at(Square::E8), None);
    }

    #[test]
    fn king_and_rook_moves_retire_castling_rights() {
        let mut position = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        position.make_move(&uci("e1e2")).unwrap();
        assert_eq!(
            position.castling(),
            CastleRights::BLACK_SHORT | CastleRights::BLACK_LONG
        );
        position.make_move(&uci("h8g8")).unwrap();
        assert_eq!(position.castling(), CastleRights::BLACK_LONG);
        position.make_move(&uci("e2e1")).unwrap();
        position.make_move(&uci("a8b8")).unwrap();
        assert_eq!(position.castling(), CastleRights::empty());
    }

    #[test]
    fn rook_capture_retires_the_matching_right() {
        let mut position = setup("4k3/8/8/8/8/q7/8/R3K2R b KQ - 0 1");
        position.make_move(&uci("a3a1")).unwrap();
        assert_eq!(position.castling(), CastleRights::WHITE_SHORT);
    }

    #[test]
    fn promotion_replaces_the_pawn() {
        let mut position = setup("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        position.make_move(&uci("a7a8q")).unwrap();
        assert_eq!(
            position.at(Square::A8),
            Some(Piece {
                player: Player::White,
                kind: PieceKind::Queen
            })
        );
        assert_eq!(position.at(Square::A7), None);
    }

    #[test]
    fn underpromotion_is_available() {
        let mut position = setup("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        position.make_move(&uci("a7a8n")).unwrap();
        assert_eq!(
            position.at(Square::A8),
            Some(Piece {
                player: Player::White,
                kind: PieceKind::Knight
            })
        );
        let promotions = setup("4k3/P7/8/8/8/8/8/4K3 w - - 0 1")
            .legal_moves()
            .iter()
            .filter(|candidate| {
                candidate.from() == Square::A7 && candidate.to() == Square::A8
            })
            .count();
        assert_eq!(promotions, 4);
    }

    #[test]
    fn checkmate_in_the_corner() {
        let position = setup("7k/6Q1/5K2/8/8/8/8/8 b - - 0 1");
        assert!(position.in_check(Player::Black));
        assert!(position.is_checkmate(Player::Black));
        assert!(!position.is_stalemate(Player::Black));
        assert!(position.legal_moves().is_empty());
        assert!(!position.is_checkmate(Player::White));
    }

    #[test]
    fn stalemate_in_the_corner() {
        let position = setup("7k/5K2/6Q1/8/8/8/8/8 b - - 0 1");
        assert!(!position.in_check(Player::Black));
        assert!(position.is_stalemate(Player::Black));
        assert!(!position.is_checkmate(Player::Black));
        assert!(position.legal_moves().is_empty());
    }

    #[test]
    fn terminal_queries_do_not_disturb_the_position() {
        // Querying the waiting player must not leave any observable trace.
        let position = setup("7k/6Q1/5K2/8/8/8/8/8 w - - 0 1");
        let before = position.clone();
        assert!(position.is_checkmate(Player::Black));
        assert!(!position.is_checkmate(Player::White));
        assert_eq!(position, before);
        assert_eq!(position.us(), Player::White);
    }

    #[test]
    fn fifty_move_claim() {
        let position = setup("4k3/8/8/8/8/8/8/4K3 w - - 99 80");
        assert!(!position.can_claim_fifty_move_draw());
        let position = setup("4k3/8/8/8/8/8/8/4K3 w - - 100 80");
        assert!(position.can_claim_fifty_move_draw());
    }

    #[test]
    fn insufficient_material_cases() {
        // K vs K.
        assert!(setup("4k3/8/8/8/8/8/8/4K3 w - - 0 1").is_insufficient_material());
        // K+N vs K and K+B vs K.
        assert!(setup("4k3/8/8/8/8/8/8/4K1N1 w - - 0 1").is_insufficient_material());
        assert!(setup("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1").is_insufficient_material());
        // K+B vs K+B with both bishops on the same square color (c1 and f4
        // are both dark).
        assert!(setup("4k3/8/8/8/5b2/8/8/2B1K3 w - - 0 1").is_insufficient_material());
    }

    #[test]
    fn sufficient_material_cases() {
        // Opposite-colored bishops can build a mating net.
        assert!(!setup("4k3/8/8/8/4b3/8/8/2B1K3 w - - 0 1").is_insufficient_material());
        // Two minors on one side.
        assert!(!setup("4k3/8/8/8/8/8/8/2B1K1N1 w - - 0 1").is_insufficient_material());
        // Any pawn, rook or queen.
        assert!(!setup("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").is_insufficient_material());
        assert!(!setup("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").is_insufficient_material());
        assert!(!setup("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1").is_insufficient_material());
        assert!(!Position::starting().is_insufficient_material());
    }

    #[test]
    fn missing_king_reads_as_in_check() {
        let position = setup("8/8/8/8/8/8/8/4K3 w - - 0 1");
        assert!(position.in_check(Player::Black));
        assert!(!position.in_check(Player::White));
    }

    #[test]
    fn hash_matches_recomputation_along_a_game() {
        let mut position = Position::starting();
        for input in ["e2e4", "c7c5", "g1f3", "d7d6", "f1b5", "c8d7", "e1g1"] {
            position.make_move(&uci(input)).unwrap();
            assert_eq!(position.hash(), position.compute_hash(), "after {input}");
        }
    }

    #[test]
    fn hash_survives_fen_round_trip() {
        let mut position = Position::starting();
        for input in ["e2e4", "e7e5", "g1f3"] {
            position.make_move(&uci(input)).unwrap();
        }
        let reparsed = setup(&position.to_string());
        assert_eq!(position.hash(), reparsed.hash());
    }

    #[test]
    fn hash_changes_with_every_move() {
        let position = Position::starting();
        for candidate in position.legal_moves() {
            let mut next = position.clone();
            next.make_move(&candidate).unwrap();
            assert_ne!(position.hash(), next.hash(), "after {candidate}");
        }
    }

    #[test]
    fn hash_distinguishes_castling_rights_and_turn() {
        let with_rights = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let without_rights = setup("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1");
        assert_ne!(with_rights.hash(), without_rights.hash());

        let black_to_move = setup("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
        assert_ne!(with_rights.hash(), black_to_move.hash());
    }

    #[test]
    fn unreachable_en_passant_target_does_not_change_the_hash() {
        // No white pawn can capture onto e6, so the target is hash-inert.
        let with_target = setup("4k3/8/8/4p3/8/8/8/4K3 w - e6 0 1");
        let without_target = setup("4k3/8/8/4p3/8/8/8/4K3 w - - 0 1");
        assert_eq!(with_target.hash(), without_target.hash());

        // With a white pawn on d5 the capture is on, and the target counts.
        let capturable = setup("4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 1");
        let ignored = setup("4k3/8/8/3Pp3/8/8/8/4K3 w - - 0 1");
        assert_ne!(capturable.hash(), ignored.hash());
    }

    #[test]
    fn clones_are_independent() {
        let original = Position::starting();
        let mut copy = original.clone();
        copy.make_move(&uci("e2e4")).unwrap();
        assert_eq!(original, Position::starting());
        assert_ne!(original, copy);
    }

    #[test]
    fn perft_from_the_starting_position() {
        let position = Position::starting();
        assert_eq!(perft(&position, 0), 1);
        assert_eq!(perft(&position, 1), 20);
        assert_eq!(perft(&position, 2), 400);
        assert_eq!(perft(&position, 3), 8_902);
    }

    #[test]
    fn perft_with_castling_and_promotions() {
        // Kiwipete exercises castling, en passant and promotion paths.
        let position =
            setup("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        assert_eq!(perft(&position, 1), 48);
        assert_eq!(perft(&position, 2), 2_039);
    }

    #[test]
    fn promotion_move_is_required_to_be_flagged() {
        let mut position = setup("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(position.make_move(&uci("a7a8")), Err(MoveError::IllegalMove));
        assert_eq!(position.to_string(), "4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        assert!(position
            .make_move(&Move::new(Square::A7, Square::A8, Some(Promotion::Queen)))
            .is_ok());
    }
}

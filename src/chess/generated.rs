//! Zobrist key tables generated at build time (see `build.rs`). The tables
//! are read-only after inclusion and can be shared freely across threads.

use crate::chess::core::{Piece, Square, BOARD_SIZE};
use crate::chess::zobrist::Key;

/// XORed into the hash when Black is to move.
pub(super) const SIDE_TO_MOVE: Key =
    include!(concat!(env!("OUT_DIR"), "/side_to_move_zobrist_key"));

/// One key per castling right: white short, white long, black short, black
/// long.
pub(super) const CASTLING_RIGHTS: [Key; 4] =
    include!(concat!(env!("OUT_DIR"), "/castling_zobrist_keys"));

/// One key per file holding a capturable en passant target.
pub(super) const EN_PASSANT_FILES: [Key; 8] =
    include!(concat!(env!("OUT_DIR"), "/en_passant_zobrist_keys"));

const PIECE_KEYS: [Key; 2 * 6 * BOARD_SIZE as usize] =
    include!(concat!(env!("OUT_DIR"), "/piece_zobrist_keys"));

/// The key of the given piece standing on the given square.
pub(super) fn piece_key(piece: Piece, square: Square) -> Key {
    const PIECE_KINDS: usize = 6;
    PIECE_KEYS[piece.player as usize * PIECE_KINDS * BOARD_SIZE as usize
        + piece.kind as usize * BOARD_SIZE as usize
        + square as usize]
}

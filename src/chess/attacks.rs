//! Square attack detection: the single routine behind check detection,
//! castling transit legality and en passant hashing relevance.

use crate::chess::core::{Direction, PieceKind, Player, Square};
use crate::chess::position::Position;

/// The eight L-shaped knight steps as (file, rank) deltas.
pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// The eight neighboring squares of a king.
pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Reports whether any piece of `attacker` attacks `target`, ignoring pins
/// and whose turn it is.
///
/// Pawns are probed on the two diagonally adjacent squares towards the
/// attacker's side, knights and kings through their fixed offsets, and
/// sliders by walking each ray outward from `target` until the first
/// occupied square.
#[must_use]
pub fn is_square_attacked(position: &Position, target: Square, attacker: Player) -> bool {
    // A pawn of `attacker` attacks `target` from one rank closer to its own
    // side.
    let pawn_rank_step = -attacker.pawn_direction();
    for file_delta in [-1, 1] {
        if let Some(square) = target.offset(file_delta, pawn_rank_step) {
            if holds(position, square, attacker, PieceKind::Pawn) {
                return true;
            }
        }
    }

    for (file_delta, rank_delta) in KNIGHT_OFFSETS {
        if let Some(square) = target.offset(file_delta, rank_delta) {
            if holds(position, square, attacker, PieceKind::Knight) {
                return true;
            }
        }
    }

    for (file_delta, rank_delta) in KING_OFFSETS {
        if let Some(square) = target.offset(file_delta, rank_delta) {
            if holds(position, square, attacker, PieceKind::King) {
                return true;
            }
        }
    }

    ray_attacked(position, target, attacker, &Direction::STRAIGHT, PieceKind::Rook)
        || ray_attacked(position, target, attacker, &Direction::DIAGONAL, PieceKind::Bishop)
}

fn holds(position: &Position, square: Square, player: Player, kind: PieceKind) -> bool {
    position
        .at(square)
        .is_some_and(|piece| piece.player == player && piece.kind == kind)
}

/// Walks each of `directions` outward from `target`; the first occupied
/// square on a ray either attacks (queen or the given `slider` of
/// `attacker`) or blocks the ray for good.
fn ray_attacked(
    position: &Position,
    target: Square,
    attacker: Player,
    directions: &[Direction; 4],
    slider: PieceKind,
) -> bool {
    for &direction in directions {
        let mut current = target.shift(direction);
        while let Some(square) = current {
            if let Some(piece) = position.at(square) {
                if piece.player == attacker
                    && (piece.kind == slider || piece.kind == PieceKind::Queen)
                {
                    return true;
                }
                break;
            }
            current = square.shift(direction);
        }
    }
    false
}

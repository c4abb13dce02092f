//! Move validation and enumeration.
//!
//! Validation runs in three tiers: basic shape checks (occupancy, turn,
//! own-piece capture), per-piece motion rules (including castling
//! preconditions and promotion requirements) and finally a self-check filter
//! that simulates the move on a scratch copy of the position and rejects it
//! if the mover's own king ends up attacked.
//!
//! Enumeration produces the pseudo-legal candidates per piece and narrows
//! them down to legal moves through the same validation pipeline, so a move
//! reported by [`legal_moves`] is always accepted by
//! [`Position::make_move`](crate::chess::position::Position::make_move).

use crate::chess::attacks;
use crate::chess::core::{
    CastleRights, Direction, File, Move, MoveError, MoveList, Piece, PieceKind, Player, Promotion,
    Rank, Square,
};
use crate::chess::position::Position;

/// Runs the full validation pipeline for a candidate move.
pub(crate) fn validate(position: &Position, candidate: &Move) -> Result<(), MoveError> {
    validate_basic(position, candidate)?;
    let Some(piece) = position.at(candidate.from()) else {
        return Err(MoveError::NoMoveablePiece);
    };
    // Only pawns promote; the pawn rules decide whether the promotion is
    // required or forbidden for the particular move.
    if candidate.promotion().is_some() && piece.kind != PieceKind::Pawn {
        return Err(MoveError::InvalidPromotion);
    }
    if !obeys_piece_rules(position, candidate, piece) {
        return Err(MoveError::IllegalMove);
    }
    if leaves_king_exposed(position, candidate, piece.player) {
        return Err(MoveError::IllegalMove);
    }
    Ok(())
}

/// First tier: rejects moves that are malformed regardless of piece kind.
pub(crate) fn validate_basic(position: &Position, candidate: &Move) -> Result<(), MoveError> {
    if candidate.from() == candidate.to() {
        return Err(MoveError::SameSquare);
    }
    let Some(piece) = position.at(candidate.from()) else {
        return Err(MoveError::NoMoveablePiece);
    };
    if piece.player != position.us() {
        return Err(MoveError::WrongTurn);
    }
    if let Some(target) = position.at(candidate.to()) {
        if target.player == piece.player {
            return Err(MoveError::CaptureOwnPiece);
        }
    }
    Ok(())
}

/// Second tier: motion rules of the moved piece.
fn obeys_piece_rules(position: &Position, candidate: &Move, piece: Piece) -> bool {
    match piece.kind {
        PieceKind::Pawn => pawn_rules(position, candidate, piece.player),
        PieceKind::Knight => knight_rules(candidate),
        PieceKind::Bishop => sliding_rules(position, candidate, &Direction::DIAGONAL),
        PieceKind::Rook => sliding_rules(position, candidate, &Direction::STRAIGHT),
        PieceKind::Queen => {
            sliding_rules(position, candidate, &Direction::STRAIGHT)
                || sliding_rules(position, candidate, &Direction::DIAGONAL)
        }
        PieceKind::King => king_rules(position, candidate, piece.player),
    }
}

/// Third tier: simulates the move on a scratch copy and reports whether the
/// mover's own king is attacked afterwards.
fn leaves_king_exposed(position: &Position, candidate: &Move, player: Player) -> bool {
    let mut simulation = position.clone();
    simulation.apply_unchecked(candidate);
    simulation.in_check(player)
}

fn pawn_rules(position: &Position, candidate: &Move, player: Player) -> bool {
    let direction = player.pawn_direction();
    let file_delta = candidate.to().file() as i8 - candidate.from().file() as i8;
    let rank_delta = candidate.to().rank() as i8 - candidate.from().rank() as i8;

    // Pawns only ever advance.
    if rank_delta * direction <= 0 {
        return false;
    }

    let destination = position.at(candidate.to());

    // Pushes stay on the file and require empty squares.
    if file_delta == 0 {
        if destination.is_some() {
            return false;
        }
        if rank_delta == direction {
            return promotion_shape_ok(candidate, player);
        }
        if rank_delta == 2 * direction && candidate.from().rank() == Rank::pawn_start(player) {
            let Some(skipped) = candidate.from().offset(0, direction) else {
                return false;
            };
            return position.at(skipped).is_none() && promotion_shape_ok(candidate, player);
        }
        return false;
    }

    if file_delta.abs() == 1 && rank_delta == direction {
        if let Some(target) = destination {
            return target.player != player && promotion_shape_ok(candidate, player);
        }
        // En passant: the destination is empty but matches the target square,
        // and the pawn to be captured stands behind it on the mover's rank.
        // Promotion never combines with en passant.
        if position.en_passant_square() == Some(candidate.to()) && candidate.promotion().is_none()
        {
            let captured_square = Square::new(candidate.to().file(), candidate.from().rank());
            return position.at(captured_square).is_some_and(|captured| {
                captured.kind == PieceKind::Pawn && captured.player != player
            });
        }
        return false;
    }

    false
}

/// Landing on the last rank requires a promotion piece; landing anywhere
/// else forbids one.
fn promotion_shape_ok(candidate: &Move, player: Player) -> bool {
    if candidate.to().rank() == Rank::promotion(player) {
        candidate.promotion().is_some()
    } else {
        candidate.promotion().is_none()
    }
}

fn knight_rules(candidate: &Move) -> bool {
    let file_delta = (candidate.to().file() as i8 - candidate.from().file() as i8).abs();
    let rank_delta = (candidate.to().rank() as i8 - candidate.from().rank() as i8).abs();
    (file_delta == 2 && rank_delta == 1) || (file_delta == 1 && rank_delta == 2)
}

fn sliding_rules(position: &Position, candidate: &Move, directions: &[Direction; 4]) -> bool {
    for &direction in directions {
        if moves_along(candidate, direction) {
            return path_is_clear(position, candidate.from(), candidate.to(), direction);
        }
    }
    false
}

fn moves_along(candidate: &Move, direction: Direction) -> bool {
    let file_delta = candidate.to().file() as i8 - candidate.from().file() as i8;
    let rank_delta = candidate.to().rank() as i8 - candidate.from().rank() as i8;
    if direction.file_step() == 0 {
        return file_delta == 0 && rank_delta * direction.rank_step() > 0;
    }
    if direction.rank_step() == 0 {
        return rank_delta == 0 && file_delta * direction.file_step() > 0;
    }
    file_delta.abs() == rank_delta.abs()
        && file_delta * direction.file_step() > 0
        && rank_delta * direction.rank_step() > 0
}

/// Walks from `from` towards `to` along `direction`; every square strictly
/// between the two must be empty.
fn path_is_clear(position: &Position, from: Square, to: Square, direction: Direction) -> bool {
    let mut current = from.shift(direction);
    while let Some(square) = current {
        if square == to {
            return true;
        }
        if position.at(square).is_some() {
            return false;
        }
        current = square.shift(direction);
    }
    false
}

fn king_rules(position: &Position, candidate: &Move, player: Player) -> bool {
    let file_delta = (candidate.to().file() as i8 - candidate.from().file() as i8).abs();
    let rank_delta = (candidate.to().rank() as i8 - candidate.from().rank() as i8).abs();
    if file_delta <= 1 && rank_delta <= 1 {
        return true;
    }
    // Castling is the only two-square king move.
    rank_delta == 0 && file_delta == 2 && castle_allowed(position, candidate, player)
}

/// Castling preconditions: the right survives, the rook stands on its home
/// corner, the squares between king and rook are empty, the king is not in
/// check and neither passes through nor lands on an attacked square. The
/// queenside B file only needs to be empty: the rook may transit through an
/// attacked square.
fn castle_allowed(position: &Position, candidate: &Move, player: Player) -> bool {
    let home = Rank::backrank(player);
    if candidate.from() != Square::new(File::E, home) {
        return false;
    }
    if position.at(candidate.to()).is_some() {
        return false;
    }
    if position.in_check(player) {
        return false;
    }

    let (required, rook_home, between, king_walk): (CastleRights, Square, &[File], [File; 2]) =
        match candidate.to().file() {
            File::G => (
                CastleRights::short(player),
                Square::new(File::H, home),
                &[File::F, File::G],
                [File::F, File::G],
            ),
            File::C => (
                CastleRights::long(player),
                Square::new(File::A, home),
                &[File::B, File::C, File::D],
                [File::D, File::C],
            ),
            _ => return false,
        };

    if !position.castling().contains(required) {
        return false;
    }
    if !position
        .at(rook_home)
        .is_some_and(|rook| rook.kind == PieceKind::Rook && rook.player == player)
    {
        return false;
    }
    if between
        .iter()
        .any(|&file| position.at(Square::new(file, home)).is_some())
    {
        return false;
    }
    !king_walk
        .iter()
        .any(|&file| attacks::is_square_attacked(position, Square::new(file, home), !player))
}

/// Enumerates every candidate destination for each piece of the side to
/// move. Candidates satisfy piece motion and occupancy only; they may still
/// fail castling preconditions or leave the king in check.
pub(crate) fn pseudo_legal_moves(position: &Position) -> MoveList {
    use strum::IntoEnumIterator;

    let mut moves = MoveList::new();
    for from in Square::iter() {
        let Some(piece) = position.at(from) else {
            continue;
        };
        if piece.player != position.us() {
            continue;
        }
        match piece.kind {
            PieceKind::Pawn => pawn_moves(position, from, piece.player, &mut moves),
            PieceKind::Knight => {
                offset_moves(position, from, piece.player, &attacks::KNIGHT_OFFSETS, &mut moves);
            }
            PieceKind::Bishop => {
                slider_moves(position, from, piece.player, &Direction::DIAGONAL, &mut moves);
            }
            PieceKind::Rook => {
                slider_moves(position, from, piece.player, &Direction::STRAIGHT, &mut moves);
            }
            PieceKind::Queen => {
                slider_moves(position, from, piece.player, &Direction::STRAIGHT, &mut moves);
                slider_moves(position, from, piece.player, &Direction::DIAGONAL, &mut moves);
            }
            PieceKind::King => king_moves(position, from, piece.player, &mut moves),
        }
    }
    moves
}

/// The subset of pseudo-legal moves that survives the full validation
/// pipeline.
pub(crate) fn legal_moves(position: &Position) -> MoveList {
    pseudo_legal_moves(position)
        .into_iter()
        .filter(|candidate| validate(position, candidate).is_ok())
        .collect()
}

fn pawn_moves(position: &Position, from: Square, player: Player, moves: &mut MoveList) {
    let direction = player.pawn_direction();
    let Some(one) = from.offset(0, direction) else {
        return;
    };
    let promotion_rank = Rank::promotion(player);

    if position.at(one).is_none() {
        push_pawn_move(moves, from, one, promotion_rank);
        // The double push opens up only while the single push is clear.
        if from.rank() == Rank::pawn_start(player) {
            if let Some(two) = from.offset(0, 2 * direction) {
                if position.at(two).is_none() {
                    moves.push(Move::new(from, two, None));
                }
            }
        }
    }

    for file_delta in [-1, 1] {
        let Some(to) = from.offset(file_delta, direction) else {
            continue;
        };
        match position.at(to) {
            Some(target) if target.player != player => {
                push_pawn_move(moves, from, to, promotion_rank);
            }
            None if position.en_passant_square() == Some(to) => {
                moves.push(Move::new(from, to, None));
            }
            _ => {}
        }
    }
}

/// Pushes a pawn move, expanded into the four promotion choices when it
/// reaches the last rank.
fn push_pawn_move(moves: &mut MoveList, from: Square, to: Square, promotion_rank: Rank) {
    if to.rank() == promotion_rank {
        for promotion in Promotion::ALL {
            moves.push(Move::new(from, to, Some(promotion)));
        }
    } else {
        moves.push(Move::new(from, to, None));
    }
}

fn offset_moves(
    position: &Position,
    from: Square,
    player: Player,
    offsets: &[(i8, i8); 8],
    moves: &mut MoveList,
) {
    for &(file_delta, rank_delta) in offsets {
        let Some(to) = from.offset(file_delta, rank_delta) else {
            continue;
        };
        match position.at(to) {
            Some(target) if target.player == player => {}
            _ => moves.push(Move::new(from, to, None)),
        }
    }
}

fn slider_moves(
    position: &Position,
    from: Square,
    player: Player,
    directions: &[Direction; 4],
    moves: &mut MoveList,
) {
    for &direction in directions {
        let mut current = from.shift(direction);
        while let Some(to) = current {
            match position.at(to) {
                None => moves.push(Move::new(from, to, None)),
                Some(blocker) => {
                    if blocker.player != player {
                        moves.push(Move::new(from, to, None));
                    }
                    break;
                }
            }
            current = to.shift(direction);
        }
    }
}

fn king_moves(position: &Position, from: Square, player: Player, moves: &mut MoveList) {
    offset_moves(position, from, player, &attacks::KING_OFFSETS, moves);
    // Emit both castling targets whenever the king stands on its home
    // square; the preconditions are checked during legality filtering.
    let home = Rank::backrank(player);
    if from == Square::new(File::E, home) {
        moves.push(Move::new(from, Square::new(File::G, home), None));
        moves.push(Move::new(from, Square::new(File::C, home), None));
    }
}

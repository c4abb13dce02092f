//! Deterministic chess rules core: move legality, move generation and
//! game-state transitions.
//!
//! The crate is a pure state machine. Given a [`chess::position::Position`]
//! and a candidate [`chess::core::Move`] it decides whether the move is legal
//! under the full rules of chess (piece motion, blocking, captures, castling
//! legality including transit squares, en passant, promotion requirements and
//! self-check prevention), applies it with all side effects, enumerates every
//! legal move for the side to move, detects checkmate, stalemate,
//! insufficient material and the fifty-move draw claim, serializes positions
//! in [Forsyth-Edwards Notation] and maintains a [Zobrist] position hash.
//!
//! It performs no I/O and holds no global mutable state; transport,
//! persistence and session concerns belong to the callers.
//!
//! ```
//! use rukh::chess::core::Move;
//! use rukh::chess::position::Position;
//!
//! let mut position = Position::starting();
//! assert_eq!(position.legal_moves().len(), 20);
//!
//! position.make_move(&Move::from_uci("e2e4").unwrap()).unwrap();
//! assert_eq!(
//!     position.to_string(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
//! );
//! ```
//!
//! [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
//! [Zobrist]: https://www.chessprogramming.org/Zobrist_Hashing

#![warn(missing_docs, variant_size_differences)]
// Rustc lints.
#![warn(
    absolute_paths_not_starting_with_crate,
    keyword_idents,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications
)]
// Rustdoc lints.
#![warn(
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]
// Clippy lints.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::pedantic
)]

pub mod chess;

//! [Zobrist hashing] of chess positions.
//!
//! Every position feature (piece on a square, side to move, each castling
//! right, a capturable en passant file) owns a random 64-bit constant; the
//! position hash is the XOR of the constants of the features present. The
//! constants are generated at build time from a fixed seed (see `build.rs`),
//! so equal positions hash equally across processes and runs.
//!
//! The key is also the natural building block for threefold-repetition
//! tracking, which callers can layer on top with a position-count map.
//!
//! [Zobrist hashing]: https://www.chessprogramming.org/Zobrist_Hashing

/// Zobrist key is a 64-bit integer.
pub type Key = u64;

//! Implementation of the chess rules: board primitives, attack detection,
//! move validation and generation, position transitions and hashing.

pub mod attacks;
pub mod core;
pub mod movegen;
pub mod position;
pub mod zobrist;

mod generated;

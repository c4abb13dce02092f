//! Generates the Zobrist key tables consumed by `src/chess/generated.rs`.
//!
//! The keys are drawn from a PRNG seeded with a fixed constant, so the same
//! table is produced on every build and every run: position hashes can be
//! persisted, compared across processes and asserted on in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ZOBRIST_SEED: u64 = 0x00C0_FFEE;

fn generate_file(filename: &str, contents: &str) {
    let out_dir = std::env::var_os("OUT_DIR").unwrap();
    let dest_path = std::path::Path::new(&out_dir).join(filename);
    std::fs::write(dest_path, contents).unwrap();
}

fn main() {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

    // One key per (player, piece kind, square).
    let piece_keys: [u64; 2 * 6 * 64] = std::array::from_fn(|_| rng.r#gen());
    generate_file("piece_zobrist_keys", &format!("{piece_keys:?}"));

    let side_to_move: u64 = rng.r#gen();
    generate_file("side_to_move_zobrist_key", &side_to_move.to_string());

    let castling_keys: [u64; 4] = std::array::from_fn(|_| rng.r#gen());
    generate_file("castling_zobrist_keys", &format!("{castling_keys:?}"));

    let en_passant_keys: [u64; 8] = std::array::from_fn(|_| rng.r#gen());
    generate_file("en_passant_zobrist_keys", &format!("{en_passant_keys:?}"));

    println!("cargo:rerun-if-changed=build.rs");
}

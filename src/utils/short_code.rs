//! Short code generation and syntax checking.
//!
//! Codes are 6 characters drawn uniformly from the 36-symbol alphabet
//! `A-Z0-9` and matched case-sensitively on resolution. With ~2.2e9 possible
//! codes, collisions are resolved by the allocator's bounded retry loop
//! against the store's unique constraint.

use rand::Rng;

/// Fixed length of every short code.
pub const SHORT_CODE_LEN: usize = 6;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Draws one random candidate short code.
///
/// Pure generation: uniqueness is checked by the caller against the record
/// store.
pub fn generate_short_code() -> String {
    let mut rng = rand::rng();

    (0..SHORT_CODE_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Returns true if `code` is syntactically a short code.
///
/// Lets the resolver reject garbage paths without a database round trip.
pub fn is_short_code_syntax(code: &str) -> bool {
    code.len() == SHORT_CODE_LEN && code.bytes().all(|b| ALPHABET.contains(&b))
}

//! Join codes: short, human-shareable game tokens in Crockford's Base32 alphabet.

use rand::Rng;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

pub const JOIN_CODE_LEN: usize = 6;

/// Random join code of `JOIN_CODE_LEN` characters.
pub fn generate_join_code() -> String {
    let mut rng = rand::rng();
    (0..JOIN_CODE_LEN)
        .map(|_| CROCKFORD[rng.random_range(0..CROCKFORD.len())] as char)
        .collect()
}

/// Canonical form of a user-typed code: trimmed, uppercased, with the
/// Crockford look-alikes folded (`I`/`L` -> `1`, `O` -> `0`).
///
/// Returns `None` if the result is not a well-formed code.
pub fn normalize_join_code(raw: &str) -> Option<String> {
    let code: String = raw
        .trim()
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'I' | 'L' => '1',
            'O' => '0',
            other => other,
        })
        .collect();

    let well_formed = code.len() == JOIN_CODE_LEN && code.bytes().all(|b| CROCKFORD.contains(&b));
    well_formed.then_some(code)
}

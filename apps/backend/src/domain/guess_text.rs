//! Guess text handling: input cleanup and the exact-match fast path.

use unicode_normalization::UnicodeNormalization;

/// Longest guess stored, in characters.
pub const MAX_GUESS_CHARS: usize = 100;

/// Canonical comparison form: NFC, trimmed, lowercase.
pub fn normalize(text: &str) -> String {
    text.nfc().collect::<String>().trim().to_lowercase()
}

/// Exact match after normalization. No fuzzy logic here.
pub fn is_exact_match(guess: &str, answer: &str) -> bool {
    let answer = normalize(answer);
    !answer.is_empty() && normalize(guess) == answer
}

/// Trim and cap a raw guess. `None` if nothing is left.
pub fn clean_guess(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_GUESS_CHARS).collect::<String>().trim_end().to_string())
}

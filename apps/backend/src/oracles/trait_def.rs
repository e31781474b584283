//! Oracle trait definitions.

use std::fmt;

use async_trait::async_trait;

use crate::domain::card_library::Prompt;

/// Oracle failures. Never surfaced to players: the guess validator treats
/// them as a rejection, the card pool as a cue to use the built-in library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// No oracle configured
    Unavailable,
    Timeout,
    Transport(String),
    BadResponse(String),
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleError::Unavailable => write!(f, "oracle not configured"),
            OracleError::Timeout => write!(f, "oracle timed out"),
            OracleError::Transport(msg) => write!(f, "oracle transport error: {msg}"),
            OracleError::BadResponse(msg) => write!(f, "oracle bad response: {msg}"),
        }
    }
}

impl std::error::Error for OracleError {}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            OracleError::Timeout
        } else if err.is_decode() {
            OracleError::BadResponse(err.to_string())
        } else {
            OracleError::Transport(err.to_string())
        }
    }
}

/// Near-miss judge: is `guess` an acceptable answer for `answer` in `category`?
#[async_trait]
pub trait GuessJudge: Send + Sync {
    async fn judge(&self, guess: &str, answer: &str, category: &str) -> Result<bool, OracleError>;
}

/// Card generation oracle.
#[async_trait]
pub trait CardGenerator: Send + Sync {
    async fn generate(
        &self,
        category: &str,
        count: usize,
        avoid_words: &[String],
    ) -> Result<Vec<Prompt>, OracleError>;
}

/// Judge used when no near-miss oracle is configured: exact match only.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactOnlyJudge;

#[async_trait]
impl GuessJudge for ExactOnlyJudge {
    async fn judge(&self, _guess: &str, _answer: &str, _category: &str) -> Result<bool, OracleError> {
        Ok(false)
    }
}

/// Generator used when no generation oracle is configured; the card pool
/// falls through to the built-in library.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticLibraryGenerator;

#[async_trait]
impl CardGenerator for StaticLibraryGenerator {
    async fn generate(
        &self,
        _category: &str,
        _count: usize,
        _avoid_words: &[String],
    ) -> Result<Vec<Prompt>, OracleError> {
        Err(OracleError::Unavailable)
    }
}

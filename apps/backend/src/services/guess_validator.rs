//! Guess adjudication: exact match first, then the near-miss judge.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::guess_text::is_exact_match;
use crate::oracles::{GuessJudge, OracleError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub accepted: bool,
    /// Accepted by the judge rather than by exact match
    pub fuzzy: bool,
}

impl Verdict {
    pub const EXACT: Verdict = Verdict {
        accepted: true,
        fuzzy: false,
    };
    pub const FUZZY: Verdict = Verdict {
        accepted: true,
        fuzzy: true,
    };
    pub const REJECTED: Verdict = Verdict {
        accepted: false,
        fuzzy: false,
    };
}

/// Knows nothing about turns or scores; only whether text is acceptable.
#[derive(Clone)]
pub struct GuessValidator {
    judge: Arc<dyn GuessJudge>,
    timeout: Duration,
}

impl GuessValidator {
    pub fn new(judge: Arc<dyn GuessJudge>, timeout: Duration) -> Self {
        Self { judge, timeout }
    }

    /// Judge failures and timeouts reject the guess.
    pub async fn validate(&self, guess: &str, answer: &str, category: &str) -> Verdict {
        if is_exact_match(guess, answer) {
            return Verdict::EXACT;
        }

        let judged = tokio::time::timeout(self.timeout, self.judge.judge(guess, answer, category))
            .await
            .unwrap_or(Err(OracleError::Timeout));

        match judged {
            Ok(true) => Verdict::FUZZY,
            Ok(false) => Verdict::REJECTED,
            Err(OracleError::Unavailable) => {
                debug!("near-miss judge not configured; guess rejected");
                Verdict::REJECTED
            }
            Err(err) => {
                warn!(error = %err, category, "near-miss judge failed; guess rejected");
                Verdict::REJECTED
            }
        }
    }
}

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::trait_def::{GuessJudge, OracleError};

#[derive(Serialize)]
struct JudgeRequest<'a> {
    guess: &'a str,
    correct_answer: &'a str,
    category: &'a str,
}

#[derive(Deserialize)]
struct JudgeResponse {
    accepted: bool,
}

/// Near-miss judge behind an HTTP endpoint (`POST {url}` JSON in, `{accepted}` out).
#[derive(Debug, Clone)]
pub struct HttpGuessJudge {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpGuessJudge {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }
}

#[async_trait]
impl GuessJudge for HttpGuessJudge {
    async fn judge(&self, guess: &str, answer: &str, category: &str) -> Result<bool, OracleError> {
        let request = self
            .client
            .post(&self.url)
            .json(&JudgeRequest {
                guess,
                correct_answer: answer,
                category,
            })
            .send();

        // The client timeout covers the request; this also bounds body decoding.
        let body = tokio::time::timeout(self.timeout, async {
            let response = request.await?.error_for_status()?;
            response.json::<JudgeResponse>().await
        })
        .await
        .map_err(|_| OracleError::Timeout)??;

        Ok(body.accepted)
    }
}

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::trait_def::{CardGenerator, OracleError};
use crate::domain::card_library::Prompt;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    category: &'a str,
    count: usize,
    avoid_words: &'a [String],
}

#[derive(Deserialize)]
struct GeneratedCard {
    word: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    cards: Vec<GeneratedCard>,
}

/// Card generator behind an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpCardGenerator {
    client: reqwest::Client,
    url: String,
}

impl HttpCardGenerator {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CardGenerator for HttpCardGenerator {
    async fn generate(
        &self,
        category: &str,
        count: usize,
        avoid_words: &[String],
    ) -> Result<Vec<Prompt>, OracleError> {
        let response = self
            .client
            .post(&self.url)
            .json(&GenerateRequest {
                category,
                count,
                avoid_words,
            })
            .send()
            .await?
            .error_for_status()?;

        let body: GenerateResponse = response.json().await?;
        let prompts: Vec<Prompt> = body
            .cards
            .into_iter()
            .filter(|c| !c.word.trim().is_empty())
            .map(|c| Prompt {
                word: c.word.trim().to_string(),
                description: c.description.trim().to_string(),
            })
            .collect();

        if prompts.is_empty() {
            return Err(OracleError::BadResponse("generator returned no cards".into()));
        }
        Ok(prompts)
    }
}

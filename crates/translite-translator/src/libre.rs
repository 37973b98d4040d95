use async_trait::async_trait;
use serde::Serialize;

use crate::{Backend, Direction, TranslateError};

#[derive(Serialize)]
struct LibreRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

/// A LibreTranslate-compatible `/translate` endpoint
#[derive(Clone)]
pub struct LibreBackend {
    client: reqwest::Client,
    url: String,
}

impl LibreBackend {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Backend for LibreBackend {
    async fn translate(&self, text: &str, direction: Direction) -> Result<String, TranslateError> {
        let request = LibreRequest {
            q: text,
            source: direction.from.code(),
            target: direction.to.code(),
            format: "text",
        };

        let response = self.client.post(&self.url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(TranslateError::Status(response.status()));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            TranslateError::MalformedResponse(format!("Failed to parse response: {}", e))
        })?;

        json.get("translatedText")
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .map(String::from)
            .ok_or(TranslateError::MissingTranslation)
    }

    fn name(&self) -> &str {
        &self.url
    }
}

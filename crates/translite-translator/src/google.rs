use async_trait::async_trait;
use serde_json::Value;

use crate::{Backend, Direction, TranslateError};

/// Google's unauthenticated `translate_a/single` endpoint, used as the last resort
#[derive(Clone)]
pub struct GoogleBackend {
    client: reqwest::Client,
    url: String,
}

impl GoogleBackend {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Backend for GoogleBackend {
    async fn translate(&self, text: &str, direction: Direction) -> Result<String, TranslateError> {
        let params = [
            ("client", "gtx"),
            ("sl", "auto"),
            ("tl", direction.to.code()),
            ("dt", "t"),
            ("q", text),
        ];

        let response = self.client.get(&self.url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(TranslateError::Status(response.status()));
        }

        let body = response.text().await?;
        let json: Value = serde_json::from_str(&body).map_err(|e| {
            TranslateError::MalformedResponse(format!("Failed to parse response: {}", e))
        })?;

        join_segments(&json)
    }

    fn name(&self) -> &str {
        "google"
    }
}

/// `[[["seg", "orig", ...], ["seg", ...]], ...]` -> "segseg"
fn join_segments(json: &Value) -> Result<String, TranslateError> {
    let segments = json
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::MalformedResponse("expected segment list".to_string()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(TranslateError::MissingTranslation);
    }

    Ok(text)
}

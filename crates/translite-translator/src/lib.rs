pub mod google;
pub mod http;
pub mod language;
pub mod libre;
pub mod resolver;
pub mod types;

pub use google::GoogleBackend;
pub use language::{Direction, Language};
pub use libre::LibreBackend;
pub use resolver::Resolver;
pub use types::{Endpoint, Mode, Outcome, Source};

/// Text shown when every candidate failed
pub const FAILURE_TEXT: &str = "(network error: translation failed)";

/// One translation service reachable over the network
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Make exactly one attempt; any failure is reported, never retried
    async fn translate(&self, text: &str, direction: Direction) -> Result<String, TranslateError>;

    /// Short name for logs
    fn name(&self) -> &str;
}

/// Failure of a single attempt against one backend
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No translation in response")]
    MissingTranslation,
}

/// Caller bugs; these are the only errors the resolver hands back
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolverError {
    #[error("invalid mode: {0}")]
    InvalidMode(String),

    #[error("endpoint index {index} out of range (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

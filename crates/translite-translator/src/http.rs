use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use translite_config::network::NetworkConfig;

/// Shared client: per-request timeout and browser-like default headers
pub fn build_client(network: &NetworkConfig) -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );

    match HeaderValue::from_str(&network.user_agent) {
        Ok(value) => {
            headers.insert(USER_AGENT, value);
        }
        Err(e) => tracing::warn!("ignoring user_agent: {e}"),
    }

    match HeaderValue::from_str(&network.accept_language) {
        Ok(value) => {
            headers.insert(ACCEPT_LANGUAGE, value);
        }
        Err(e) => tracing::warn!("ignoring accept_language: {e}"),
    }

    reqwest::Client::builder()
        .timeout(network.timeout())
        .default_headers(headers)
        .build()
}

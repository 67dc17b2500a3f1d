use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;

use crate::models::ProviderConfig;

/// Default HTTP request timeout for all adapter calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const AGENT: &str = "PriceDock/1.0";

/// Build the reusable per-adapter HTTP client: JSON accept header,
/// bearer auth when an API key is configured, 30 s timeout.
pub(crate) fn build_client(config: &ProviderConfig) -> Client {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(key) = &config.api_key {
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {key}")) {
            headers.insert(AUTHORIZATION, value);
        }
    }

    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .default_headers(headers)
        .build()
        .unwrap_or_else(|_| Client::new())
}

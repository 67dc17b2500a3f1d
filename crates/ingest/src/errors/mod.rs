//! Error types for the ingest crate.
//!
//! Note that [`PriceProvider::fetch_prices`](crate::provider::PriceProvider::fetch_prices)
//! never surfaces these past the adapter boundary; bulk-fetch failures are
//! folded into [`SyncResult`](crate::models::SyncResult). `IngestError` is
//! used by adapter internals and by registry factories.

use thiserror::Error;

/// Errors that can occur inside a provider adapter.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The provider rejected the configured credentials.
    #[error("Invalid API key")]
    InvalidApiKey {
        /// The provider that rejected the key
        provider: String,
    },

    /// The provider returned a non-success HTTP status.
    #[error("API error: {status}")]
    ApiStatus {
        /// The provider that returned the status
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// A response payload could not be parsed into price records.
    #[error("Parse error: {provider} - {message}")]
    Parse {
        /// The provider whose payload failed to parse
        provider: String,
        /// Description of the parse failure
        message: String,
    },

    /// The operation is not supported by this provider variant.
    #[error("Not supported: {operation} ({provider})")]
    NotSupported {
        /// The unsupported operation
        operation: String,
        /// The provider that does not support it
        provider: String,
    },

    /// The target site explicitly disallows scraping.
    #[error("Scraping disallowed by robots.txt")]
    RobotsDisallowed,

    /// A network error occurred while communicating with the source.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = IngestError::InvalidApiKey {
            provider: "costdb".to_string(),
        };
        assert_eq!(format!("{}", error), "Invalid API key");

        let error = IngestError::ApiStatus {
            provider: "shopsearch".to_string(),
            status: 503,
        };
        assert_eq!(format!("{}", error), "API error: 503");

        let error = IngestError::NotSupported {
            operation: "fetch_single_price".to_string(),
            provider: "shopping".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Not supported: fetch_single_price (shopping)"
        );
    }
}

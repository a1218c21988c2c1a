//! Catalog transport failure classification.

use std::time::Duration;

use thiserror::Error;

/// Why a catalog call failed.
///
/// The `Display` text is what ends up in `CatalogResponse::error`, so it
/// is written for people rather than logs.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum CatalogError {
    /// `search` was called with an empty or whitespace-only query.
    #[error("Search query cannot be empty")]
    EmptyQuery,

    /// The call did not complete within the transport timeout.
    #[error("timeout of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),

    /// The server answered with a non-2xx status.
    #[error("Request failed with status code {status}{}", detail_suffix(.detail.as_deref()))]
    Status {
        /// HTTP status code.
        status: u16,
        /// `status_message` from a TMDB error body, if any.
        detail: Option<String>,
    },

    /// Connection, DNS or protocol failure.
    #[error("Network Error: {0}")]
    Network(String),

    /// The body was not the JSON we expected.
    #[error("Invalid response: {0}")]
    Decode(String),
}

fn detail_suffix(detail: Option<&str>) -> String {
    detail.map_or_else(String::new, |d| format!(": {d}"))
}

impl CatalogError {
    /// Classifies a `reqwest` failure.
    pub(crate) fn from_transport(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                detail: None,
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

//! Uniform success/data/error envelope returned by every catalog call.

use super::error::CatalogError;
use super::types::Page;

/// Pagination metadata for listing calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page that was returned.
    pub current_page: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

/// Result of a catalog call.
///
/// Failures never escape as `Err`: `data` falls back to `T::default()`
/// (empty list, `None`, empty credits) and `error` holds the message.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogResponse<T> {
    /// Payload; neutral when the call failed.
    pub data: T,
    /// Human-readable failure message; `None` on success.
    pub error: Option<String>,
    /// Pagination metadata for paginated listings.
    pub page: Option<Pagination>,
    /// Trimmed query echoed back by `search`.
    pub query: Option<String>,
}

impl<T> CatalogResponse<T> {
    /// Successful response without pagination.
    pub const fn ok(data: T) -> Self {
        Self {
            data,
            error: None,
            page: None,
            query: None,
        }
    }

    /// Whether the call succeeded.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.error.is_none()
    }

    /// Attaches the echoed query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

impl<T: Default> CatalogResponse<T> {
    /// Failed response carrying the neutral payload.
    pub fn failed(err: &CatalogError) -> Self {
        Self {
            data: T::default(),
            error: Some(err.to_string()),
            page: None,
            query: None,
        }
    }

    /// Folds a fallible call into the envelope.
    pub fn from_result(result: Result<T, CatalogError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::failed(&err),
        }
    }
}

impl<T> CatalogResponse<Vec<T>> {
    /// Folds a fallible listing call into the envelope, keeping pagination.
    pub fn from_page(result: Result<Page<T>, CatalogError>) -> Self {
        match result {
            Ok(page) => Self {
                page: Some(Pagination {
                    current_page: page.page,
                    total_pages: page.total_pages,
                    total_results: page.total_results,
                }),
                data: page.results,
                error: None,
                query: None,
            },
            Err(err) => Self::failed(&err),
        }
    }
}

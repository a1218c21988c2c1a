//! `CatalogClient` - TMDB catalog client implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::CatalogApi;
use super::error::CatalogError;
use super::response::CatalogResponse;
use super::types::{
    Credits, MovieCategory, MovieDetails, MovieSummary, Page, Review, TimeWindow,
    TmdbErrorResponse, Video, VideoList,
};

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default response language.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Transport timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Sub-resources appended to `movie/{id}`.
const DETAILS_APPEND: &str = "videos,credits,similar,reviews,images";

/// TMDB catalog client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API key sent as the `api_key` query parameter.
    api_key: String,
    /// Response language.
    language: String,
    /// Transport timeout (reported in timeout messages).
    timeout: Duration,
}

/// Builder for `CatalogClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    timeout: Option<Duration>,
}

impl CatalogClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            language: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (default: "en-US").
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the transport timeout (default: 10s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or blank.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<CatalogClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .context("api_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?
        };

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(timeout)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(CatalogClient {
            http_client,
            base_url,
            api_key,
            language: self
                .language
                .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE)),
            timeout,
        })
    }
}

impl CatalogClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::new()
    }

    /// Sends a single GET with the API key and language attached.
    ///
    /// No retry: the first failure is classified and returned.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| CatalogError::Network(format!("invalid request path {path}: {e}")))?;

        tracing::debug!(?query, "TMDB API request");

        let response = self
            .http_client
            .get(url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(query)
            .send()
            .await
            .map_err(|e| CatalogError::from_transport(&e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<TmdbErrorResponse>(&body)
                .map(|error_response| error_response.status_message)
                .ok();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::from_transport(&e, self.timeout))?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

/// Logs a failed call before it is folded into the envelope.
fn logged<T>(operation: &str, result: Result<T, CatalogError>) -> Result<T, CatalogError> {
    if let Err(ref err) = result {
        tracing::warn!(operation, error = %err, "TMDB API call failed");
    }
    result
}

impl CatalogApi for CatalogClient {
    #[instrument(skip_all)]
    async fn by_category(
        &self,
        category: MovieCategory,
        page: u32,
    ) -> CatalogResponse<Vec<MovieSummary>> {
        let path = format!("movie/{}", category.as_path());
        let query = [("page", page.to_string())];
        let result = self.get_json::<Page<MovieSummary>>(&path, &query).await;
        CatalogResponse::from_page(logged("by_category", result))
    }

    #[instrument(skip_all)]
    async fn trending(&self, window: TimeWindow) -> CatalogResponse<Vec<MovieSummary>> {
        let path = format!("trending/movie/{}", window.as_path());
        let result = self.get_json::<Page<MovieSummary>>(&path, &[]).await;
        CatalogResponse::from_page(logged("trending", result))
    }

    #[instrument(skip_all)]
    async fn details(&self, movie_id: u64) -> CatalogResponse<Option<MovieDetails>> {
        let path = format!("movie/{movie_id}");
        let query = [("append_to_response", String::from(DETAILS_APPEND))];
        let result = self.get_json::<MovieDetails>(&path, &query).await;
        CatalogResponse::from_result(logged("details", result).map(Some))
    }

    #[instrument(skip_all)]
    async fn search(
        &self,
        query: &str,
        page: u32,
        include_adult: bool,
    ) -> CatalogResponse<Vec<MovieSummary>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return CatalogResponse::failed(&CatalogError::EmptyQuery);
        }

        let params = [
            ("query", String::from(trimmed)),
            ("page", page.to_string()),
            ("include_adult", include_adult.to_string()),
        ];
        let result = self
            .get_json::<Page<MovieSummary>>("search/movie", &params)
            .await;
        let response = CatalogResponse::from_page(logged("search", result));
        if response.success() {
            response.with_query(trimmed)
        } else {
            response
        }
    }

    #[instrument(skip_all)]
    async fn suggestions(&self, query: &str, limit: usize) -> CatalogResponse<Vec<MovieSummary>> {
        let mut response = self.search(query, 1, false).await;
        if response.success() {
            response.data.truncate(limit);
        }
        response
    }

    #[instrument(skip_all)]
    async fn videos(&self, movie_id: u64) -> CatalogResponse<Vec<Video>> {
        let path = format!("movie/{movie_id}/videos");
        let result = self.get_json::<VideoList>(&path, &[]).await;
        CatalogResponse::from_result(logged("videos", result).map(|list| list.results))
    }

    #[instrument(skip_all)]
    async fn similar(&self, movie_id: u64, page: u32) -> CatalogResponse<Vec<MovieSummary>> {
        let path = format!("movie/{movie_id}/similar");
        let query = [("page", page.to_string())];
        let result = self.get_json::<Page<MovieSummary>>(&path, &query).await;
        CatalogResponse::from_page(logged("similar", result))
    }

    #[instrument(skip_all)]
    async fn credits(&self, movie_id: u64) -> CatalogResponse<Credits> {
        let path = format!("movie/{movie_id}/credits");
        let result = self.get_json::<Credits>(&path, &[]).await;
        CatalogResponse::from_result(logged("credits", result))
    }

    #[instrument(skip_all)]
    async fn reviews(&self, movie_id: u64, page: u32) -> CatalogResponse<Vec<Review>> {
        let path = format!("movie/{movie_id}/reviews");
        let query = [("page", page.to_string())];
        let result = self.get_json::<Page<Review>>(&path, &query).await;
        CatalogResponse::from_page(logged("reviews", result))
    }
}

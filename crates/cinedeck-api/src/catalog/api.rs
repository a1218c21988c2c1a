//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use super::response::CatalogResponse;
use super::types::{Credits, MovieCategory, MovieDetails, MovieSummary, Review, TimeWindow, Video};

/// Default number of suggestions returned for autocomplete.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// TMDB catalog operations.
///
/// Every operation folds failures into [`CatalogResponse`]; none of them
/// return `Err`. Abstracted as a trait so the search coordinator can run
/// against scripted catalogs in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Lists movies in a category (`now_playing`, `popular`, ...).
    async fn by_category(
        &self,
        category: MovieCategory,
        page: u32,
    ) -> CatalogResponse<Vec<MovieSummary>>;

    /// Lists trending movies for the given window.
    async fn trending(&self, window: TimeWindow) -> CatalogResponse<Vec<MovieSummary>>;

    /// Fetches movie details with videos, credits, similar titles and reviews appended.
    async fn details(&self, movie_id: u64) -> CatalogResponse<Option<MovieDetails>>;

    /// Searches movies by title.
    ///
    /// Empty or whitespace-only queries fail locally without a network call.
    async fn search(
        &self,
        query: &str,
        page: u32,
        include_adult: bool,
    ) -> CatalogResponse<Vec<MovieSummary>>;

    /// First page of `search`, truncated to `limit` items.
    async fn suggestions(&self, query: &str, limit: usize) -> CatalogResponse<Vec<MovieSummary>>;

    /// Lists videos (trailers, teasers, ...) for a movie.
    async fn videos(&self, movie_id: u64) -> CatalogResponse<Vec<Video>>;

    /// Lists movies similar to the given one.
    async fn similar(&self, movie_id: u64, page: u32) -> CatalogResponse<Vec<MovieSummary>>;

    /// Fetches cast and crew.
    async fn credits(&self, movie_id: u64) -> CatalogResponse<Credits>;

    /// Lists user reviews.
    async fn reviews(&self, movie_id: u64, page: u32) -> CatalogResponse<Vec<Review>>;
}

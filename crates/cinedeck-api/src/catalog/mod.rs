//! TMDB catalog client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie endpoints and folds
//! every outcome into a uniform [`CatalogResponse`] envelope.

mod api;
mod client;
mod error;
mod response;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, DEFAULT_SUGGESTION_LIMIT, LocalCatalogApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{
    CatalogClient, CatalogClientBuilder, DEFAULT_BASE_URL, DEFAULT_LANGUAGE, DEFAULT_TIMEOUT,
};
#[allow(clippy::module_name_repetitions)]
pub use error::CatalogError;
#[allow(clippy::module_name_repetitions)]
pub use response::{CatalogResponse, Pagination};
pub use types::{
    CastMember, Company, Credits, CrewMember, Genre, MovieCategory, MovieDetails, MovieSummary,
    Page, Review, ReviewAuthor, SpokenLanguage, TimeWindow, Video, VideoList,
};

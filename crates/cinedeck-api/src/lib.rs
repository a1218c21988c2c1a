//! API client library for cinedeck.
//!
//! Provides the TMDB catalog client and pure helpers that turn raw
//! catalog fields into display strings and image URLs.

/// TMDB catalog client.
pub mod catalog;

/// Display formatting helpers (images, dates, ratings, genres).
pub mod format;

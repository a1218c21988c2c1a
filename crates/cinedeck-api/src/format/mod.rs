//! Display formatting helpers.
//!
//! Pure functions mapping raw catalog fields to display strings and
//! image URLs. No I/O.

mod image;
mod text;

pub use image::{Artwork, IMAGE_BASE_URL, ImageKind, ImageSize, image_url, movie_image};
pub use text::{
    ReleaseDate, format_date, format_rating, format_runtime, format_thousands, genre_name,
    genre_names, truncate_overview,
};

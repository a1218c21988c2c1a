//! Image URL composition.

use std::fmt;
use std::str::FromStr;

use crate::catalog::{MovieDetails, MovieSummary};

/// Static image host.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Image widths served by the image host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    /// `w92`
    W92,
    /// `w154`
    W154,
    /// `w185`
    W185,
    /// `w342`
    W342,
    /// `w500`
    #[default]
    W500,
    /// `w780`
    W780,
    /// `original`
    Original,
}

impl ImageSize {
    /// Size token used in the URL.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::W92 => "w92",
            Self::W154 => "w154",
            Self::W185 => "w185",
            Self::W342 => "w342",
            Self::W500 => "w500",
            Self::W780 => "w780",
            Self::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "w92" => Ok(Self::W92),
            "w154" => Ok(Self::W154),
            "w185" => Ok(Self::W185),
            "w342" => Ok(Self::W342),
            "w500" => Ok(Self::W500),
            "w780" => Ok(Self::W780),
            "original" => Ok(Self::Original),
            other => Err(format!("unknown image size '{other}'")),
        }
    }
}

/// Which artwork a caller prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageKind {
    /// Portrait poster.
    #[default]
    Poster,
    /// Landscape backdrop.
    Backdrop,
}

/// Anything carrying poster/backdrop paths.
pub trait Artwork {
    /// Poster path, if any.
    fn poster_path(&self) -> Option<&str>;
    /// Backdrop path, if any.
    fn backdrop_path(&self) -> Option<&str>;
}

impl Artwork for MovieSummary {
    fn poster_path(&self) -> Option<&str> {
        self.poster_path.as_deref()
    }

    fn backdrop_path(&self) -> Option<&str> {
        self.backdrop_path.as_deref()
    }
}

impl Artwork for MovieDetails {
    fn poster_path(&self) -> Option<&str> {
        self.poster_path.as_deref()
    }

    fn backdrop_path(&self) -> Option<&str> {
        self.backdrop_path.as_deref()
    }
}

/// Builds `{host}/{size}{path}`; `None` for a missing or empty path.
#[must_use]
pub fn image_url(path: Option<&str>, size: ImageSize) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{IMAGE_BASE_URL}/{size}{p}"))
}

/// Picks the preferred artwork, falling back to the other kind.
///
/// Returns `None` when the item has neither; callers show a placeholder.
#[must_use]
pub fn movie_image(item: &impl Artwork, kind: ImageKind, size: ImageSize) -> Option<String> {
    let (primary, fallback) = match kind {
        ImageKind::Backdrop => (item.backdrop_path(), item.poster_path()),
        ImageKind::Poster => (item.poster_path(), item.backdrop_path()),
    };

    image_url(primary, size).or_else(|| image_url(fallback, size))
}

//! TMDB catalog response types and request parameters.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

// --- Listings ---

/// A paginated listing as returned by `movie/{category}`, `search/movie`,
/// `movie/{id}/similar` and friends.
///
/// Every field defaults so that a body missing `results` decodes as an
/// empty page instead of failing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Page entries.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            page: 0,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

/// A single movie as it appears in listings and search results.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default)]
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Release date (YYYY-MM-DD, possibly empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: Option<f64>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Vote count.
    #[serde(default)]
    pub vote_count: Option<u32>,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

// --- Details ---

/// Response from `movie/{id}` with `videos,credits,similar,reviews,images`
/// appended.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default)]
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Release date.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Release status (e.g., "Released").
    #[serde(default)]
    pub status: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Vote count.
    #[serde(default)]
    pub vote_count: Option<u32>,
    /// Budget in USD.
    #[serde(default)]
    pub budget: Option<u64>,
    /// Revenue in USD.
    #[serde(default)]
    pub revenue: Option<u64>,
    /// Homepage URL.
    #[serde(default)]
    pub homepage: Option<String>,
    /// IMDb ID.
    #[serde(default)]
    pub imdb_id: Option<String>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Production companies.
    #[serde(default)]
    pub production_companies: Vec<Company>,
    /// Spoken languages.
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Appended `videos` sub-resource.
    #[serde(default)]
    pub videos: Option<VideoList>,
    /// Appended `credits` sub-resource.
    #[serde(default)]
    pub credits: Option<Credits>,
    /// Appended `similar` sub-resource.
    #[serde(default)]
    pub similar: Option<Page<MovieSummary>>,
    /// Appended `reviews` sub-resource.
    #[serde(default)]
    pub reviews: Option<Page<Review>>,
}

impl MovieDetails {
    /// Genre names in API order.
    #[must_use]
    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.name.as_str()).collect()
    }

    /// Appended videos, or an empty slice when the sub-resource is absent.
    #[must_use]
    pub fn appended_videos(&self) -> &[Video] {
        self.videos.as_ref().map_or(&[], |v| v.results.as_slice())
    }

    /// Appended similar titles, or an empty slice.
    #[must_use]
    pub fn appended_similar(&self) -> &[MovieSummary] {
        self.similar.as_ref().map_or(&[], |p| p.results.as_slice())
    }

    /// Appended cast, or an empty slice.
    #[must_use]
    pub fn appended_cast(&self) -> &[CastMember] {
        self.credits.as_ref().map_or(&[], |c| c.cast.as_slice())
    }
}

/// Genre entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    #[serde(default)]
    pub name: String,
}

/// Production company.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Company {
    /// Company ID.
    pub id: u64,
    /// Company name.
    #[serde(default)]
    pub name: String,
    /// Origin country (ISO 3166-1).
    #[serde(default)]
    pub origin_country: Option<String>,
}

/// Spoken language.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpokenLanguage {
    /// ISO 639-1 code.
    #[serde(default)]
    pub iso_639_1: String,
    /// English name.
    #[serde(default)]
    pub english_name: Option<String>,
}

// --- Videos ---

/// Response from `movie/{id}/videos`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoList {
    /// Videos.
    #[serde(default)]
    pub results: Vec<Video>,
}

/// A trailer, teaser, clip or featurette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Video {
    /// Video ID.
    #[serde(default)]
    pub id: String,
    /// Site-specific key (e.g., YouTube video id).
    #[serde(default)]
    pub key: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Hosting site (e.g., "YouTube").
    #[serde(default)]
    pub site: String,
    /// Video type (e.g., "Trailer", "Teaser").
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Whether the video is an official upload.
    #[serde(default)]
    pub official: Option<bool>,
}

impl Video {
    /// Returns a watch URL for videos hosted on YouTube.
    #[must_use]
    pub fn watch_url(&self) -> Option<String> {
        (self.site.eq_ignore_ascii_case("youtube") && !self.key.is_empty())
            .then(|| format!("https://www.youtube.com/watch?v={}", self.key))
    }

    /// Whether the video is a trailer or teaser (the ones shown on the videos tab).
    #[must_use]
    pub fn is_trailer_or_teaser(&self) -> bool {
        matches!(self.kind.as_str(), "Trailer" | "Teaser")
    }
}

// --- Credits ---

/// Response from `movie/{id}/credits`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    /// Cast members.
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Crew members.
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// A cast member.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CastMember {
    /// Person ID.
    pub id: u64,
    /// Person name.
    #[serde(default)]
    pub name: String,
    /// Character played.
    #[serde(default)]
    pub character: Option<String>,
    /// Billing order.
    #[serde(default)]
    pub order: Option<u32>,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// A crew member.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrewMember {
    /// Person ID.
    pub id: u64,
    /// Person name.
    #[serde(default)]
    pub name: String,
    /// Department (e.g., "Directing").
    #[serde(default)]
    pub department: Option<String>,
    /// Job (e.g., "Director").
    #[serde(default)]
    pub job: Option<String>,
}

// --- Reviews ---

/// A user review.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Review {
    /// Review ID.
    #[serde(default)]
    pub id: String,
    /// Author display name.
    #[serde(default)]
    pub author: String,
    /// Review body.
    #[serde(default)]
    pub content: String,
    /// Creation timestamp (RFC 3339).
    #[serde(default)]
    pub created_at: Option<String>,
    /// Review URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Author details (rating).
    #[serde(default)]
    pub author_details: Option<ReviewAuthor>,
}

/// Review author details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewAuthor {
    /// Username.
    #[serde(default)]
    pub username: Option<String>,
    /// Rating given by the author (0-10).
    #[serde(default)]
    pub rating: Option<f64>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
}

// --- Parameters ---

/// Listing categories served under `movie/{category}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieCategory {
    /// `now_playing`
    #[default]
    NowPlaying,
    /// `popular`
    Popular,
    /// `top_rated`
    TopRated,
    /// `upcoming`
    Upcoming,
}

impl MovieCategory {
    /// All categories, in carousel order.
    pub const ALL: [Self; 4] = [Self::NowPlaying, Self::Popular, Self::TopRated, Self::Upcoming];

    /// Path segment used by the API.
    #[must_use]
    pub const fn as_path(self) -> &'static str {
        match self {
            Self::NowPlaying => "now_playing",
            Self::Popular => "popular",
            Self::TopRated => "top_rated",
            Self::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for MovieCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for MovieCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('-', "_").as_str() {
            "now_playing" => Ok(Self::NowPlaying),
            "popular" => Ok(Self::Popular),
            "top_rated" => Ok(Self::TopRated),
            "upcoming" => Ok(Self::Upcoming),
            other => Err(format!(
                "unknown category '{other}' (expected now-playing, popular, top-rated or upcoming)"
            )),
        }
    }
}

/// Time window for `trending/movie/{window}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    /// Last 24 hours.
    Day,
    /// Last 7 days.
    #[default]
    Week,
}

impl TimeWindow {
    /// Path segment used by the API.
    #[must_use]
    pub const fn as_path(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            other => Err(format!("unknown time window '{other}' (expected day or week)")),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_page_without_results_is_empty() {
        // Arrange
        let json = r#"{"page":1,"total_pages":0,"total_results":0}"#;

        // Act
        let page: Page<MovieSummary> = serde_json::from_str(json).unwrap();

        // Assert
        assert!(page.results.is_empty());
        assert_eq!(page.page, 1);
    }

    #[test]
    fn test_movie_summary_tolerates_nulls() {
        // Arrange
        let json = r#"{"id":603,"title":"The Matrix","release_date":null,"vote_average":null,"poster_path":null}"#;

        // Act
        let movie: MovieSummary = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(movie.id, 603);
        assert!(movie.release_date.is_none());
        assert!(movie.vote_average.is_none());
        assert!(movie.genre_ids.is_empty());
    }

    #[test]
    fn test_video_watch_url_youtube_only() {
        // Arrange
        let youtube = Video {
            key: String::from("vKQi3bBA1y8"),
            site: String::from("YouTube"),
            ..Video::default()
        };
        let vimeo = Video {
            key: String::from("123"),
            site: String::from("Vimeo"),
            ..Video::default()
        };

        // Act & Assert
        assert_eq!(
            youtube.watch_url().as_deref(),
            Some("https://www.youtube.com/watch?v=vKQi3bBA1y8")
        );
        assert!(vimeo.watch_url().is_none());
    }

    #[test]
    fn test_category_from_str_accepts_kebab_and_snake() {
        // Arrange & Act & Assert
        assert_eq!(
            "top-rated".parse::<MovieCategory>().unwrap(),
            MovieCategory::TopRated
        );
        assert_eq!(
            "now_playing".parse::<MovieCategory>().unwrap(),
            MovieCategory::NowPlaying
        );
        assert!("classics".parse::<MovieCategory>().is_err());
    }

    #[test]
    fn test_details_appended_accessors_default_empty() {
        // Arrange
        let json = r#"{"id":603,"title":"The Matrix"}"#;

        // Act
        let details: MovieDetails = serde_json::from_str(json).unwrap();

        // Assert
        assert!(details.appended_videos().is_empty());
        assert!(details.appended_similar().is_empty());
        assert!(details.appended_cast().is_empty());
    }

    #[test]
    fn test_time_window_paths() {
        // Arrange & Act & Assert
        assert_eq!(TimeWindow::Day.as_path(), "day");
        assert_eq!(TimeWindow::default().as_path(), "week");
        assert_eq!("day".parse::<TimeWindow>().unwrap(), TimeWindow::Day);
    }
}

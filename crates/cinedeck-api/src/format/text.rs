//! Date, rating, genre and runtime formatting.

use chrono::{DateTime, NaiveDate};

/// Placeholder for missing or unparsable dates and runtimes.
const UNKNOWN: &str = "Unknown";

/// Placeholder for missing ratings.
const NOT_AVAILABLE: &str = "N/A";

/// Genre IDs known to the catalog, with display names.
const GENRES: [(u32, &str); 19] = [
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

/// A release date split for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDate {
    /// Four-digit year, or "Unknown".
    pub year: String,
    /// Long form such as "January 5, 2024", or "Unknown".
    pub formatted: String,
}

impl ReleaseDate {
    fn unknown() -> Self {
        Self {
            year: String::from(UNKNOWN),
            formatted: String::from(UNKNOWN),
        }
    }
}

/// Formats a release date.
///
/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps; anything else is "Unknown".
#[must_use]
pub fn format_date(date: Option<&str>) -> ReleaseDate {
    let Some(raw) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return ReleaseDate::unknown();
    };

    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()));

    parsed.map_or_else(ReleaseDate::unknown, |d| ReleaseDate {
        year: d.format("%Y").to_string(),
        formatted: d.format("%B %-d, %Y").to_string(),
    })
}

/// Formats a vote average with one decimal place.
///
/// Rounds the exact binary value, so `8.35` (stored just below) is "8.3".
/// Values exactly halfway between two tenths (`7.25`, `6.75`) round away
/// from zero. Missing, zero and non-finite values become "N/A".
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn format_rating(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v.abs() > 0.0 => {
            if is_exact_hundredths_tie(v) {
                let away = (v.abs() * 10.0 + 0.5).floor() / 10.0;
                format!("{:.1}", away.copysign(v))
            } else {
                format!("{v:.1}")
            }
        }
        _ => String::from(NOT_AVAILABLE),
    }
}

/// Whether `v` sits exactly on `x.x5`. Only multiples of 0.25 can: other
/// such decimals are not representable, and scaling by 2 or 4 is exact.
#[allow(clippy::arithmetic_side_effects)]
fn is_exact_hundredths_tie(v: f64) -> bool {
    (v * 4.0).fract() == 0.0 && (v * 2.0).fract() != 0.0
}

/// Looks up a single genre name.
#[must_use]
pub fn genre_name(id: u32) -> Option<&'static str> {
    GENRES
        .iter()
        .find_map(|&(known, name)| (known == id).then_some(name))
}

/// Maps genre IDs to names; unknown IDs become "Genre {id}".
#[must_use]
pub fn genre_names(ids: &[u32]) -> Vec<String> {
    ids.iter()
        .map(|&id| genre_name(id).map_or_else(|| format!("Genre {id}"), String::from))
        .collect()
}

/// Formats a runtime in minutes as "2h 16m".
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn format_runtime(minutes: Option<u32>) -> String {
    match minutes {
        Some(m) if m > 0 => format!("{}h {}m", m / 60, m % 60),
        _ => String::from(UNKNOWN),
    }
}

/// Groups digits in threes: `63000000` becomes "63,000,000".
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len().saturating_add(digits.len() / 3));
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len().saturating_sub(i)) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Shortens an overview to `max` characters, appending "..." when cut.
#[must_use]
pub fn truncate_overview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return String::from(text);
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push_str("...");
    cut
}

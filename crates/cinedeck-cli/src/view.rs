//! Text rendering for catalog and search output.
//!
//! Every function returns lines; `main` logs them through `tracing`.

use cinedeck_api::catalog::{
    CastMember, Credits, MovieDetails, MovieSummary, Pagination, Review, Video,
};
use cinedeck_api::format::{
    ImageKind, ImageSize, format_date, format_rating, format_runtime, format_thousands,
    genre_names, movie_image, truncate_overview,
};
use cinedeck_search::SearchState;

/// Videos shown on the details view.
const MAX_DETAIL_VIDEOS: usize = 3;

/// Similar titles shown on the details view.
const MAX_DETAIL_SIMILAR: usize = 6;

/// Cast members shown by `catalog credits`.
const MAX_CAST: usize = 10;

/// Overview length in search results.
const SEARCH_OVERVIEW_CHARS: usize = 60;

/// Review excerpt length.
const REVIEW_EXCERPT_CHARS: usize = 200;

/// Sections of the movie details view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DetailsTab {
    /// Title, tagline, rating, runtime, genres, overview and artwork.
    #[default]
    Overview,
    /// Release, money, languages, companies and directors.
    Details,
    /// Trailers and teasers.
    Videos,
    /// Similar titles.
    Similar,
}

/// One line per movie: id, year, rating, title and genres.
pub fn movie_rows(items: &[MovieSummary]) -> Vec<String> {
    items
        .iter()
        .map(|m| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                m.id,
                format_date(m.release_date.as_deref()).year,
                format_rating(m.vote_average),
                m.title,
                genre_names(&m.genre_ids).join(", "),
            )
        })
        .collect()
}

/// "Page x of y (z results)".
pub fn pagination_line(page: Option<Pagination>) -> Option<String> {
    page.map(|p| {
        format!(
            "Page {} of {} ({} results)",
            p.current_page,
            p.total_pages,
            format_thousands(u64::from(p.total_results)),
        )
    })
}

/// Renders one tab of the details view.
pub fn details_lines(details: &MovieDetails, tab: DetailsTab) -> Vec<String> {
    match tab {
        DetailsTab::Overview => overview_tab(details),
        DetailsTab::Details => facts_tab(details),
        DetailsTab::Videos => {
            let trailers: Vec<&Video> = details
                .appended_videos()
                .iter()
                .filter(|v| v.is_trailer_or_teaser())
                .take(MAX_DETAIL_VIDEOS)
                .collect();
            if trailers.is_empty() {
                return vec![String::from("No trailers available")];
            }
            trailers.into_iter().map(video_line).collect()
        }
        DetailsTab::Similar => {
            let similar = details.appended_similar();
            if similar.is_empty() {
                return vec![String::from("No similar movies found")];
            }
            let shown = similar.get(..MAX_DETAIL_SIMILAR).unwrap_or(similar);
            movie_rows(shown)
        }
    }
}

fn overview_tab(details: &MovieDetails) -> Vec<String> {
    let date = format_date(details.release_date.as_deref());
    let mut lines = vec![format!("{} ({})", details.title, date.year)];
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        lines.push(format!("\"{tagline}\""));
    }
    lines.push(format!(
        "Rating: {} ({} votes)",
        format_rating(details.vote_average),
        format_thousands(u64::from(details.vote_count.unwrap_or_default())),
    ));
    lines.push(format!("Runtime: {}", format_runtime(details.runtime)));
    lines.push(format!("Genres: {}", details.genre_names().join(", ")));
    lines.push(format!(
        "Overview: {}",
        details
            .overview
            .as_deref()
            .filter(|o| !o.is_empty())
            .unwrap_or("No overview available."),
    ));
    let poster = movie_image(details, ImageKind::Poster, ImageSize::W500);
    let backdrop = movie_image(details, ImageKind::Backdrop, ImageSize::Original);
    lines.push(format!("Poster: {}", poster.as_deref().unwrap_or("-")));
    lines.push(format!("Backdrop: {}", backdrop.as_deref().unwrap_or("-")));
    let cast: Vec<&str> = details
        .appended_cast()
        .iter()
        .take(5)
        .map(|c| c.name.as_str())
        .collect();
    if !cast.is_empty() {
        lines.push(format!("Starring: {}", cast.join(", ")));
    }
    lines
}

fn facts_tab(details: &MovieDetails) -> Vec<String> {
    let money = |value: Option<u64>| {
        value
            .filter(|&v| v > 0)
            .map_or_else(|| String::from("-"), |v| format!("${}", format_thousands(v)))
    };
    let directors: Vec<&str> = details
        .credits
        .as_ref()
        .map(directors)
        .unwrap_or_default();
    let languages: Vec<&str> = details
        .spoken_languages
        .iter()
        .map(|l| l.english_name.as_deref().unwrap_or(l.iso_639_1.as_str()))
        .collect();
    let companies: Vec<&str> = details
        .production_companies
        .iter()
        .map(|c| c.name.as_str())
        .collect();

    vec![
        format!("Status: {}", details.status.as_deref().unwrap_or("-")),
        format!(
            "Release date: {}",
            format_date(details.release_date.as_deref()).formatted
        ),
        format!(
            "Original title: {}",
            details.original_title.as_deref().unwrap_or(&details.title)
        ),
        format!(
            "Original language: {}",
            details.original_language.as_deref().unwrap_or("-")
        ),
        format!("Budget: {}", money(details.budget)),
        format!("Revenue: {}", money(details.revenue)),
        format!("Directed by: {}", join_or_dash(&directors)),
        format!("Spoken languages: {}", join_or_dash(&languages)),
        format!("Production: {}", join_or_dash(&companies)),
        format!(
            "IMDb: {}",
            details.imdb_id.as_deref().map_or_else(
                || String::from("-"),
                |id| format!("https://www.imdb.com/title/{id}/")
            )
        ),
        format!(
            "Homepage: {}",
            details.homepage.as_deref().filter(|h| !h.is_empty()).unwrap_or("-")
        ),
    ]
}

fn directors(credits: &Credits) -> Vec<&str> {
    credits
        .crew
        .iter()
        .filter(|c| c.job.as_deref() == Some("Director"))
        .map(|c| c.name.as_str())
        .collect()
}

fn join_or_dash(items: &[&str]) -> String {
    if items.is_empty() {
        String::from("-")
    } else {
        items.join(", ")
    }
}

fn video_line(video: &Video) -> String {
    format!(
        "{}\t{}\t{}",
        video.kind,
        video.name,
        video.watch_url().as_deref().unwrap_or(video.site.as_str()),
    )
}

/// One line per video.
pub fn video_rows(videos: &[Video]) -> Vec<String> {
    videos.iter().map(video_line).collect()
}

/// Top-billed cast, then directors.
pub fn credit_rows(credits: &Credits) -> Vec<String> {
    let mut lines: Vec<String> = credits
        .cast
        .iter()
        .take(MAX_CAST)
        .map(cast_line)
        .collect();
    let directors = directors(credits);
    if !directors.is_empty() {
        lines.push(format!("Directed by: {}", directors.join(", ")));
    }
    lines
}

fn cast_line(member: &CastMember) -> String {
    match member.character.as_deref().filter(|c| !c.is_empty()) {
        Some(character) => format!("{} as {character}", member.name),
        None => member.name.clone(),
    }
}

/// Author, rating and an excerpt per review.
pub fn review_rows(reviews: &[Review]) -> Vec<String> {
    reviews
        .iter()
        .map(|r| {
            let rating = r.author_details.as_ref().and_then(|a| a.rating);
            format!(
                "{} ({}): {}",
                r.author,
                format_rating(rating),
                truncate_overview(r.content.trim(), REVIEW_EXCERPT_CHARS),
            )
        })
        .collect()
}

/// Renders the search dropdown for `state`.
pub fn search_lines(state: &SearchState) -> Vec<String> {
    match state {
        SearchState::Idle => vec![String::from("Type at least 2 characters to search")],
        SearchState::Debouncing | SearchState::Searching => vec![String::from("Searching...")],
        SearchState::Empty => vec![String::from("No movies found")],
        SearchState::Failed(message) => vec![format!("Search failed: {message}")],
        SearchState::Success(items) => items
            .iter()
            .map(|m| {
                format!(
                    "{}\t{}\t{}\t{}\t{}",
                    m.id,
                    m.title,
                    format_date(m.release_date.as_deref()).year,
                    format_rating(m.vote_average),
                    truncate_overview(m.overview.as_deref().unwrap_or(""), SEARCH_OVERVIEW_CHARS),
                )
            })
            .collect(),
    }
}

/// Numbered recent searches.
pub fn history_lines(history: &[String]) -> Vec<String> {
    if history.is_empty() {
        return vec![String::from("No recent searches")];
    }
    history
        .iter()
        .zip(1_usize..)
        .map(|(query, n)| format!("{n}. {query}"))
        .collect()
}

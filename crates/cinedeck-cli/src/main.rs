//! cinedeck - TMDB movie catalog browser and search CLI.

/// Application configuration (TOML).
mod config;
/// Text rendering for command output.
mod view;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{API_KEY_ENV, AppConfig, resolve_config_path};
use crate::view::DetailsTab;
use cinedeck_api::catalog::{
    CatalogApi, CatalogClient, CatalogResponse, DEFAULT_SUGGESTION_LIMIT, MovieCategory,
    MovieSummary, TimeWindow,
};
use cinedeck_db::{SqliteStore, open_db, resolve_db_path};
use cinedeck_search::{KeyValueStore, SearchDriver, SearchHistory, SearchSession};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Query the TMDB movie catalog.
    Catalog(CatalogCommand),
    /// Search movies through the search coordinator (records history).
    Search(SearchArgs),
    /// Manage recent searches.
    History(HistoryCommand),
    /// Inspect configuration.
    Config(ConfigCommand),
}

/// Arguments for the `catalog` subcommand.
#[derive(clap::Args)]
struct CatalogCommand {
    /// Catalog subcommand to run.
    #[command(subcommand)]
    command: CatalogSubcommands,
}

/// Available catalog subcommands.
#[derive(Subcommand)]
enum CatalogSubcommands {
    /// List movies in a category.
    Category(CategoryArgs),
    /// List trending movies.
    Trending(TrendingArgs),
    /// Search movies by title.
    Search(CatalogSearchArgs),
    /// Autocomplete suggestions for a query.
    Suggest(SuggestArgs),
    /// Show movie details.
    Details(DetailsArgs),
    /// List videos for a movie.
    Videos(MovieIdArgs),
    /// Show cast and directors.
    Credits(MovieIdArgs),
    /// List movies similar to a movie.
    Similar(PagedMovieArgs),
    /// List user reviews for a movie.
    Reviews(PagedMovieArgs),
}

/// Arguments for the `catalog category` subcommand.
#[derive(clap::Args)]
struct CategoryArgs {
    /// now-playing, popular, top-rated or upcoming.
    #[arg(long, default_value = "now-playing")]
    category: MovieCategory,

    /// Page number.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `catalog trending` subcommand.
#[derive(clap::Args)]
struct TrendingArgs {
    /// day or week.
    #[arg(long, default_value = "week")]
    window: TimeWindow,
}

/// Arguments for the `catalog search` subcommand.
#[derive(clap::Args)]
struct CatalogSearchArgs {
    /// Title to search for.
    #[arg(long)]
    query: String,

    /// Page number.
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Include adult titles.
    #[arg(long)]
    include_adult: bool,
}

/// Arguments for the `catalog suggest` subcommand.
#[derive(clap::Args)]
struct SuggestArgs {
    /// Partial title.
    #[arg(long)]
    query: String,

    /// Maximum number of suggestions.
    #[arg(long, default_value_t = DEFAULT_SUGGESTION_LIMIT)]
    limit: usize,
}

/// Arguments for the `catalog details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// TMDB movie ID.
    #[arg(long)]
    id: u64,

    /// Section to show.
    #[arg(long, value_enum, default_value_t = DetailsTab::Overview)]
    tab: DetailsTab,
}

/// Arguments for single-movie subcommands.
#[derive(clap::Args)]
struct MovieIdArgs {
    /// TMDB movie ID.
    #[arg(long)]
    id: u64,
}

/// Arguments for paginated single-movie subcommands.
#[derive(clap::Args)]
struct PagedMovieArgs {
    /// TMDB movie ID.
    #[arg(long)]
    id: u64,

    /// Page number.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Query to submit.
    #[arg(long, required_unless_present = "history", conflicts_with = "history")]
    query: Option<String>,

    /// Re-run the Nth recent search (1 = most recent).
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=5))]
    history: Option<u16>,

    /// Type the query one keystroke at a time (debounced) instead of submitting it.
    #[arg(long, requires = "query")]
    typed: bool,

    /// Delay between simulated keystrokes in milliseconds.
    #[arg(long, default_value_t = 80)]
    keystroke_ms: u64,
}

/// Arguments for the `history` subcommand.
#[derive(clap::Args)]
struct HistoryCommand {
    /// History subcommand to run.
    #[command(subcommand)]
    command: HistorySubcommands,
}

/// Available history subcommands.
#[derive(Subcommand)]
enum HistorySubcommands {
    /// List recent searches, most recent first.
    List,
    /// Forget all recent searches.
    Clear,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show the effective configuration.
    Show,
}

/// Loads the config file for `dir`.
fn load_config(dir: Option<&Path>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    AppConfig::load(&path)
}

/// Builds a `CatalogClient` from the config and `TMDB_API_KEY`.
///
/// # Errors
///
/// Returns an error if no API key is available, the base URL is invalid or
/// the client fails to build.
#[instrument(skip_all)]
fn build_catalog_client(config: &AppConfig) -> Result<CatalogClient> {
    let api_key = config.tmdb.resolve_api_key(std::env::var(API_KEY_ENV).ok())?;
    let base_url = Url::parse(config.tmdb.base_url())
        .with_context(|| format!("invalid tmdb.base_url {}", config.tmdb.base_url()))?;

    CatalogClient::builder()
        .base_url(base_url)
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .language(config.tmdb.language())
        .timeout(config.tmdb.timeout())
        .build()
        .context("failed to build TMDB client")
}

/// Turns a failed envelope into an error.
fn check<T>(response: CatalogResponse<T>, operation: &str) -> Result<CatalogResponse<T>> {
    if let Some(error) = &response.error {
        bail!("{operation} failed: {error}");
    }
    Ok(response)
}

/// Logs each line.
fn emit(lines: &[String]) {
    for line in lines {
        tracing::info!("{line}");
    }
}

/// Runs a `catalog` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API call fails.
#[instrument(skip_all)]
async fn run_catalog(command: CatalogSubcommands, config: &AppConfig) -> Result<()> {
    let client = build_catalog_client(config)?;
    match command {
        CatalogSubcommands::Category(args) => {
            let response = check(
                client.by_category(args.category, args.page).await,
                "category listing",
            )?;
            tracing::info!("Category: {}", args.category);
            emit_listing(&response);
        }
        CatalogSubcommands::Trending(args) => {
            let response = check(client.trending(args.window).await, "trending listing")?;
            tracing::info!("Trending this {}", args.window.as_path());
            emit_listing(&response);
        }
        CatalogSubcommands::Search(args) => {
            let response = check(
                client
                    .search(&args.query, args.page, args.include_adult)
                    .await,
                "search",
            )?;
            tracing::info!(
                "Results for \"{}\"",
                response.query.as_deref().unwrap_or(&args.query)
            );
            emit_listing(&response);
        }
        CatalogSubcommands::Suggest(args) => {
            let response = check(client.suggestions(&args.query, args.limit).await, "suggestions")?;
            emit(&view::movie_rows(&response.data));
        }
        CatalogSubcommands::Details(args) => run_catalog_details(&client, &args).await?,
        CatalogSubcommands::Videos(args) => {
            let response = check(client.videos(args.id).await, "videos")?;
            emit(&view::video_rows(&response.data));
        }
        CatalogSubcommands::Credits(args) => {
            let response = check(client.credits(args.id).await, "credits")?;
            emit(&view::credit_rows(&response.data));
        }
        CatalogSubcommands::Similar(args) => {
            let response = check(client.similar(args.id, args.page).await, "similar movies")?;
            emit_listing(&response);
        }
        CatalogSubcommands::Reviews(args) => {
            let response = check(client.reviews(args.id, args.page).await, "reviews")?;
            emit(&view::review_rows(&response.data));
            if let Some(line) = view::pagination_line(response.page) {
                tracing::info!("{line}");
            }
        }
    }
    Ok(())
}

/// Logs a movie listing followed by its pagination line.
fn emit_listing(response: &CatalogResponse<Vec<MovieSummary>>) {
    if response.data.is_empty() {
        tracing::info!("No movies found");
    }
    emit(&view::movie_rows(&response.data));
    if let Some(line) = view::pagination_line(response.page) {
        tracing::info!("{line}");
    }
}

/// Runs the `catalog details` subcommand.
///
/// # Errors
///
/// Returns an error if the API call fails.
#[instrument(skip_all)]
async fn run_catalog_details(client: &CatalogClient, args: &DetailsArgs) -> Result<()> {
    let response = check(client.details(args.id).await, "movie details")?;
    let Some(details) = response.data else {
        bail!("movie {} not found", args.id);
    };
    emit(&view::details_lines(&details, args.tab));
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client or database cannot be opened, the history
/// entry does not exist, or the search fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&Path>, config: &AppConfig) -> Result<()> {
    let client = Arc::new(build_catalog_client(config)?);
    let store = SqliteStore::new(open_db(dir)?);
    let session = SearchSession::new(config.search_config(), store);
    let mut driver = SearchDriver::new(client, session);

    if let Some(n) = args.history {
        let index = usize::from(n).saturating_sub(1);
        let Some(entry) = driver.history().get(index).cloned() else {
            bail!("no recent search #{n}");
        };
        tracing::info!("Searching \"{entry}\"");
        driver.select_history(index);
    } else if let Some(query) = args.query.as_deref() {
        if args.typed {
            type_query(&mut driver, query, Duration::from_millis(args.keystroke_ms)).await;
        } else {
            driver.set_query(query);
            driver.submit();
        }
    }

    if driver.state().is_loading() {
        emit(&view::search_lines(driver.state()));
    }
    let state = driver.settle().await;
    if let Some(message) = state.error() {
        bail!("search failed: {message}");
    }
    emit(&view::search_lines(state));
    Ok(())
}

/// Feeds `text` into the driver one character at a time.
async fn type_query<C, S>(driver: &mut SearchDriver<C, S>, text: &str, gap: Duration)
where
    C: CatalogApi + Sync + 'static,
    S: KeyValueStore,
{
    let mut typed = String::new();
    for ch in text.chars() {
        typed.push(ch);
        driver.set_query(&typed);
        tracing::debug!(query = %typed, state = driver.state().label(), "Keystroke");
        if let Ok(Some(state)) = tokio::time::timeout(gap, driver.next_event()).await {
            tracing::info!(query = %typed, state = state.label(), "Search state changed");
        }
    }
}

/// Runs the `history list` subcommand.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
fn run_history_list(dir: Option<&Path>) -> Result<()> {
    let history = SearchHistory::load(SqliteStore::new(open_db(dir)?));
    emit(&view::history_lines(history.entries()));
    Ok(())
}

/// Runs the `history clear` subcommand.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
fn run_history_clear(dir: Option<&Path>) -> Result<()> {
    let mut history = SearchHistory::load(SqliteStore::new(open_db(dir)?));
    let count = history.entries().len();
    history.clear();
    tracing::info!("Cleared {count} recent searches");
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed.
fn run_config_show(dir: Option<&Path>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let config = AppConfig::load(&path)?;
    let search = config.search_config();

    let env_key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty());
    let api_key = if env_key.is_some() {
        format!("set (from {API_KEY_ENV})")
    } else if config.tmdb.api_key.is_some() {
        String::from("set (from config)")
    } else {
        String::from("not set")
    };

    tracing::info!("Config file: {}", path.display());
    tracing::info!("Database: {}", resolve_db_path(dir)?.display());
    tracing::info!("tmdb.api_key = {api_key}");
    tracing::info!("tmdb.base_url = {}", config.tmdb.base_url());
    tracing::info!("tmdb.language = {}", config.tmdb.language());
    tracing::info!("tmdb.timeout_secs = {}", config.tmdb.timeout().as_secs());
    tracing::info!("search.debounce_ms = {}", search.debounce.as_millis());
    tracing::info!("search.suggestion_limit = {}", search.suggestion_limit);
    Ok(())
}

/// Installs the global subscriber: `EnvFilter` (default `info`) plus a
/// `fmt` layer, and an OTLP span layer when `OTEL_EXPORTER_OTLP_ENDPOINT`
/// is set.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(not(feature = "otel"))]
    fmt().with_env_filter(env_filter).with_target(false).init();

    #[cfg(feature = "otel")]
    {
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let dir = cli.dir.as_deref();
    match cli.command {
        Commands::Catalog(cmd) => run_catalog(cmd.command, &load_config(dir)?).await,
        Commands::Search(args) => run_search(&args, dir, &load_config(dir)?).await,
        Commands::History(cmd) => match cmd.command {
            HistorySubcommands::List => run_history_list(dir),
            HistorySubcommands::Clear => run_history_clear(dir),
        },
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Show => run_config_show(dir),
        },
    }
}

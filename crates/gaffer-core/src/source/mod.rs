// Data sources for the optimizer's collaborators.
//
// Nothing here runs at construction time: callers build a source, then call
// `gather` (or the individual fetches) when they need data.

pub mod file;
pub mod history;
pub mod http;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use tracing::{debug, info};

use crate::fpl::{Bootstrap, EntryPicks, Fixture, LiveEvent};

pub use file::FileSource;
pub use history::{load_history, load_history_csv};
pub use http::HttpSource;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed JSON in {what}: {source}")]
    Json {
        what: String,
        source: serde_json::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("unsupported history file {path}: expected .csv or .json")]
    UnsupportedFormat { path: String },
}

// ---------------------------------------------------------------------------
// DataSource trait
// ---------------------------------------------------------------------------

/// Supplier of the public game data the optimizer consumes.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Season snapshot: gameweeks, teams, players.
    async fn bootstrap(&self) -> Result<Bootstrap, SourceError>;

    /// Full-season fixture list.
    async fn fixtures(&self) -> Result<Vec<Fixture>, SourceError>;

    /// Per-player statistics for one gameweek. Implementations set
    /// `LiveEvent::event` to `gameweek`.
    async fn live_event(&self, gameweek: u32) -> Result<LiveEvent, SourceError>;

    /// A manager's squad for one gameweek.
    async fn entry_picks(&self, entry_id: u64, gameweek: u32) -> Result<EntryPicks, SourceError>;
}

// ---------------------------------------------------------------------------
// Gathering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GatherOptions {
    /// How many recent finished gameweeks to fetch for the form sample.
    pub form_window: usize,
    /// Fetch this manager's current squad as well.
    pub entry_id: Option<u64>,
}

/// Everything one optimization request needs, fetched up front.
#[derive(Debug, Clone)]
pub struct Gathered {
    pub bootstrap: Bootstrap,
    pub fixtures: Vec<Fixture>,
    /// Recent finished gameweeks, most recent first.
    pub recent: Vec<LiveEvent>,
    pub picks: Option<EntryPicks>,
    pub gameweek: u32,
}

/// Fetch bootstrap and fixtures concurrently, then the recent gameweek
/// snapshots concurrently, then (optionally) the manager's squad.
///
/// Squads only exist once the season has started; before gameweek 1 the
/// entry is ignored.
pub async fn gather<S>(source: &S, opts: &GatherOptions) -> Result<Gathered, SourceError>
where
    S: DataSource + ?Sized,
{
    let (bootstrap, fixtures) = tokio::try_join!(source.bootstrap(), source.fixtures())?;
    let gameweek = bootstrap.current_gameweek();

    let window: Vec<u32> = bootstrap
        .finished_gameweeks()
        .into_iter()
        .take(opts.form_window)
        .collect();
    debug!(?window, "fetching recent gameweeks");
    let recent = try_join_all(window.iter().map(|gw| source.live_event(*gw))).await?;

    let picks = match opts.entry_id {
        Some(entry) if gameweek > 0 => Some(source.entry_picks(entry, gameweek).await?),
        _ => None,
    };

    info!(
        gameweek,
        players = bootstrap.elements.len(),
        fixtures = fixtures.len(),
        recent = recent.len(),
        has_picks = picks.is_some(),
        "gathered optimizer inputs"
    );

    Ok(Gathered {
        bootstrap,
        fixtures,
        recent,
        picks,
        gameweek,
    })
}

// gaffer entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout stays machine-readable)
// 2. Parse arguments, load config
// 3. Build the data source (offline directory or HTTP)
// 4. Fetch collaborators concurrently
// 5. Run the requested command

mod output;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use gaffer_core::config::{self, Config};
use gaffer_core::fpl::{History, PositionClass};
use gaffer_core::source::{self, DataSource, FileSource, GatherOptions, HttpSource};
use gaffer_engine::{OptimizeRequest, Optimizer};

#[derive(Debug, Parser)]
#[command(name = "gaffer", version, about = "Expected points and squad optimization")]
struct Cli {
    /// directory holding defaults/ and config/ (defaults to the working directory)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// read API documents from this directory instead of the network
    #[arg(long, global = true)]
    offline: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Suggest a squad: rearrange an entry's picks, or build a wildcard
    Optimize {
        /// manager entry id; without one a fresh fifteen is picked
        #[arg(short, long)]
        entry: Option<u64>,

        /// gameweek offset from the current gameweek
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        delta: i32,

        /// print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List players by projected points
    Xp {
        /// number of rows to show
        #[arg(short = 'n', long, default_value_t = 20)]
        top: usize,

        /// only this position (gk, def, mid, fwd)
        #[arg(short, long, value_parser = parse_position)]
        position: Option<PositionClass>,

        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        delta: i32,

        #[arg(long)]
        json: bool,
    },

    /// Show upcoming gameweek deadlines
    Deadlines {
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
    },
}

fn parse_position(s: &str) -> Result<PositionClass, String> {
    PositionClass::from_label(s).ok_or_else(|| format!("unknown position '{s}'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let cli = Cli::parse();
    debug!("args: {cli:?}");

    let config = load_config(cli.config_dir.as_deref()).context("failed to load configuration")?;
    let source = build_source(&config, cli.offline.as_deref())?;

    match cli.command {
        Command::Optimize { entry, delta, json } => {
            let entry = entry.or(config.api.entry_id);
            optimize(&config, source.as_ref(), entry, delta, json).await
        }
        Command::Xp {
            top,
            position,
            delta,
            json,
        } => rank(&config, source.as_ref(), top, position, delta, json).await,
        Command::Deadlines { count } => deadlines(source.as_ref(), count).await,
    }
}

fn load_config(dir: Option<&Path>) -> Result<Config, config::ConfigError> {
    match dir {
        Some(dir) => {
            config::ensure_config_files(dir)?;
            config::load_config_from(dir)
        }
        None => config::load_config(),
    }
}

fn build_source(config: &Config, offline: Option<&Path>) -> anyhow::Result<Box<dyn DataSource>> {
    let offline = offline
        .map(Path::to_path_buf)
        .or_else(|| config.data.offline_dir.as_ref().map(PathBuf::from));
    match offline {
        Some(dir) => {
            info!("Reading offline data from {}", dir.display());
            Ok(Box::new(FileSource::new(dir)))
        }
        None => {
            let http = HttpSource::from_config(&config.api).context("failed to build HTTP client")?;
            info!("Fetching from {}", config.api.base_url);
            Ok(Box::new(http))
        }
    }
}

fn load_history(config: &Config) -> anyhow::Result<Option<History>> {
    let Some(path) = config.data.history_path.as_deref() else {
        return Ok(None);
    };
    let history = source::load_history(Path::new(path))
        .with_context(|| format!("failed to load prior-season data from {path}"))?;
    Ok(Some(history))
}

async fn optimize(
    config: &Config,
    source: &dyn DataSource,
    entry: Option<u64>,
    delta: i32,
    json: bool,
) -> anyhow::Result<()> {
    let gathered = source::gather(
        source,
        &GatherOptions {
            form_window: config.model.form_window,
            entry_id: entry,
        },
    )
    .await
    .context("failed to fetch game data")?;
    if entry.is_some() && gathered.picks.is_none() {
        info!("Season has not started; building a wildcard squad instead");
    }
    let history = load_history(config)?;

    let req = OptimizeRequest {
        bootstrap: &gathered.bootstrap,
        history: history.as_ref(),
        fixtures: &gathered.fixtures,
        last5: Some(gathered.recent.as_slice()),
        picks: gathered.picks.as_ref(),
        delta_event: delta,
    };
    let optimizer = Optimizer::new(config.model.clone(), config.squad.clone());
    let picks = match optimizer.optimize(&req) {
        Ok(picks) => picks,
        Err(e) => bail!("optimization unavailable: {e}"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&picks)?);
    } else {
        print!("{}", output::render_picks(&picks, &gathered.bootstrap));
    }
    Ok(())
}

async fn rank(
    config: &Config,
    source: &dyn DataSource,
    top: usize,
    position: Option<PositionClass>,
    delta: i32,
    json: bool,
) -> anyhow::Result<()> {
    let gathered = source::gather(
        source,
        &GatherOptions {
            form_window: config.model.form_window,
            entry_id: None,
        },
    )
    .await
    .context("failed to fetch game data")?;
    let history = load_history(config)?;

    let req = OptimizeRequest {
        history: history.as_ref(),
        last5: Some(gathered.recent.as_slice()),
        delta_event: delta,
        ..OptimizeRequest::new(&gathered.bootstrap, &gathered.fixtures)
    };
    let optimizer = Optimizer::new(config.model.clone(), config.squad.clone());
    let ranked: Vec<_> = optimizer
        .rank_players(&req)
        .into_iter()
        .filter(|r| position.map_or(true, |p| r.position == p))
        .take(top)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
    } else {
        print!("{}", output::render_ranking(&ranked, &gathered.bootstrap));
    }
    Ok(())
}

async fn deadlines(source: &dyn DataSource, count: usize) -> anyhow::Result<()> {
    let bootstrap = source.bootstrap().await.context("failed to fetch game data")?;
    let upcoming: Vec<_> = bootstrap
        .upcoming_deadlines(chrono::Utc::now())
        .into_iter()
        .take(count)
        .collect();
    print!("{}", output::render_deadlines(&upcoming));
    Ok(())
}

/// Initialize tracing to stderr. `RUST_LOG` overrides the default filter.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gaffer=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

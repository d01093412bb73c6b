// Prior-season player data.
//
// Accepts either a saved bootstrap JSON from last season or the flat
// `players_raw.csv` table community archives publish for past seasons.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use super::SourceError;
use crate::fpl::{Availability, Bootstrap, History, Player, PositionClass};

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

/// One row of a past-season player table. Counting stats are read as f64
/// because some exports write them as `12.0`. Unknown columns are ignored.
#[derive(Debug, Deserialize)]
struct RawHistoryRow {
    id: u32,
    code: u32,
    #[serde(default)]
    web_name: String,
    element_type: u8,
    team: u32,
    #[serde(default)]
    team_code: Option<u32>,
    #[serde(default)]
    now_cost: Option<f64>,
    minutes: f64,
    goals_scored: f64,
    assists: f64,
    #[serde(default)]
    clean_sheets: Option<f64>,
    #[serde(default)]
    goals_conceded: Option<f64>,
    #[serde(default)]
    own_goals: Option<f64>,
    #[serde(default)]
    saves: Option<f64>,
    #[serde(default)]
    yellow_cards: Option<f64>,
    #[serde(default)]
    red_cards: Option<f64>,
    #[serde(default)]
    starts: Option<f64>,
    #[serde(default)]
    expected_goals: Option<f64>,
    #[serde(default)]
    expected_assists: Option<f64>,
    #[serde(default)]
    expected_goals_conceded: Option<f64>,
}

fn count(value: Option<f64>) -> u32 {
    value.filter(|v| v.is_finite() && *v > 0.0).map_or(0, |v| v.round() as u32)
}

fn decimal(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn load_history_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawHistoryRow>() {
        match result {
            Ok(raw) => {
                let Some(element_type) = PositionClass::from_code(raw.element_type) else {
                    warn!(
                        "skipping history row '{}': unknown element_type {}",
                        raw.web_name.trim(),
                        raw.element_type
                    );
                    continue;
                };
                if !raw.minutes.is_finite() {
                    warn!("skipping history row '{}': non-finite minutes", raw.web_name.trim());
                    continue;
                }
                players.push(Player {
                    id: raw.id,
                    code: raw.code,
                    web_name: raw.web_name.trim().to_string(),
                    element_type,
                    team: raw.team,
                    team_code: raw.team_code.unwrap_or(raw.team),
                    now_cost: count(raw.now_cost),
                    status: Availability::Available,
                    chance_of_playing_next_round: None,
                    minutes: count(Some(raw.minutes)),
                    goals_scored: count(Some(raw.goals_scored)),
                    assists: count(Some(raw.assists)),
                    clean_sheets: count(raw.clean_sheets),
                    goals_conceded: count(raw.goals_conceded),
                    own_goals: count(raw.own_goals),
                    saves: count(raw.saves),
                    yellow_cards: count(raw.yellow_cards),
                    red_cards: count(raw.red_cards),
                    starts: count(raw.starts),
                    expected_goals: decimal(raw.expected_goals),
                    expected_assists: decimal(raw.expected_assists),
                    expected_goals_conceded: decimal(raw.expected_goals_conceded),
                });
            }
            Err(e) => {
                warn!("skipping malformed history row: {}", e);
            }
        }
    }
    Ok(players)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load a past-season player table from CSV.
pub fn load_history_csv(path: &Path) -> Result<History, SourceError> {
    let file = std::fs::File::open(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let players = load_history_from_reader(file).map_err(|e| SourceError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(History::from_players(players))
}

/// Load a past-season bootstrap snapshot saved as JSON.
pub fn load_history_json(path: &Path) -> Result<History, SourceError> {
    let text = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let bootstrap: Bootstrap = serde_json::from_str(&text).map_err(|e| SourceError::Json {
        what: path.display().to_string(),
        source: e,
    })?;
    Ok(History::from_players(bootstrap.elements))
}

/// Load prior-season data, choosing the format from the file extension.
pub fn load_history(path: &Path) -> Result<History, SourceError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let history = match ext.as_deref() {
        Some("csv") => load_history_csv(path)?,
        Some("json") => load_history_json(path)?,
        _ => {
            return Err(SourceError::UnsupportedFormat {
                path: path.display().to_string(),
            })
        }
    };
    info!("Loaded {} prior-season players from {}", history.len(), path.display());
    Ok(history)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

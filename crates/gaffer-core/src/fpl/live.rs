// Per-gameweek match statistics ("live" snapshots of completed gameweeks).

use serde::{Deserialize, Serialize};

use super::de::f64_lenient;
use super::PlayerId;

/// One player's statistics for a single gameweek. In a double gameweek the
/// counts cover both matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchStats {
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub goals_scored: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub clean_sheets: u32,
    #[serde(default)]
    pub goals_conceded: u32,
    #[serde(default)]
    pub own_goals: u32,
    #[serde(default)]
    pub saves: u32,
    #[serde(default)]
    pub yellow_cards: u32,
    #[serde(default)]
    pub red_cards: u32,
    #[serde(default)]
    pub starts: u32,
    #[serde(default, deserialize_with = "f64_lenient")]
    pub expected_goals: f64,
    #[serde(default, deserialize_with = "f64_lenient")]
    pub expected_assists: f64,
    #[serde(default, deserialize_with = "f64_lenient")]
    pub expected_goals_conceded: f64,
    #[serde(default)]
    pub total_points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveElement {
    pub id: PlayerId,
    pub stats: MatchStats,
}

/// All players' statistics for one gameweek.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveEvent {
    /// Gameweek number. Not part of the upstream payload; sources fill it in.
    #[serde(default)]
    pub event: u32,
    pub elements: Vec<LiveElement>,
}

impl LiveEvent {
    pub fn stats_for(&self, player: PlayerId) -> Option<&MatchStats> {
        self.elements.iter().find(|e| e.id == player).map(|e| &e.stats)
    }
}

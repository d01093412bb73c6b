// Records published by the fantasy game's public API, plus the prior-season
// lookup used for the history blend.

pub mod de;
pub mod fixture;
pub mod live;
pub mod picks;
pub mod player;
pub mod team;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use fixture::{Fixture, FixtureStatus};
pub use live::{LiveElement, LiveEvent, MatchStats};
pub use picks::{EntryPicks, Pick};
pub use player::{Availability, Player, PositionClass};
pub use team::{Team, Venue};

pub type PlayerId = u32;
pub type TeamId = u32;

/// Number of gameweeks in a season.
pub const SEASON_GAMEWEEKS: u32 = 38;

// ---------------------------------------------------------------------------
// Events (gameweeks)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub deadline_time: DateTime<Utc>,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub is_next: bool,
}

// ---------------------------------------------------------------------------
// Bootstrap snapshot
// ---------------------------------------------------------------------------

/// The season-wide snapshot: gameweeks, clubs and every registered player.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bootstrap {
    #[serde(default)]
    pub events: Vec<Event>,
    pub teams: Vec<Team>,
    pub elements: Vec<Player>,
}

impl Bootstrap {
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.elements.iter().find(|p| p.id == id)
    }

    /// The gameweek flagged as current, or 0 before the season starts.
    pub fn current_gameweek(&self) -> u32 {
        self.events
            .iter()
            .find(|e| e.is_current)
            .map(|e| e.id)
            .unwrap_or(0)
    }

    /// Finished gameweeks, most recent first.
    pub fn finished_gameweeks(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .events
            .iter()
            .filter(|e| e.finished)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable_by(|a, b| b.cmp(a));
        ids
    }

    /// Gameweeks whose deadline is still ahead of `now`, soonest first.
    pub fn upcoming_deadlines(&self, now: DateTime<Utc>) -> Vec<&Event> {
        let mut upcoming: Vec<&Event> = self
            .events
            .iter()
            .filter(|e| e.deadline_time > now)
            .collect();
        upcoming.sort_by_key(|e| e.deadline_time);
        upcoming
    }
}

// ---------------------------------------------------------------------------
// Prior-season lookup
// ---------------------------------------------------------------------------

/// Prior-season player records keyed by the stable player `code`.
#[derive(Debug, Clone, Default)]
pub struct History {
    by_code: HashMap<u32, Player>,
}

impl History {
    pub fn from_players(players: impl IntoIterator<Item = Player>) -> Self {
        History {
            by_code: players.into_iter().map(|p| (p.code, p)).collect(),
        }
    }

    pub fn get(&self, code: u32) -> Option<&Player> {
        self.by_code.get(&code)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

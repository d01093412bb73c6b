// Squad selections.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// One slot of a 15-player squad.
///
/// `position` 1-11 is the starting lineup, 12-15 the bench in substitution
/// order. `multiplier` is 0 for benched players, 1 normally and 2 for the
/// captain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub element: PlayerId,
    pub position: u8,
    pub multiplier: u8,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
    /// Projected points attached by the optimizer. Absent on upstream picks.
    #[serde(default)]
    pub xp: f64,
}

/// A manager's squad for one gameweek.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryPicks {
    #[serde(default)]
    pub active_chip: Option<String>,
    pub picks: Vec<Pick>,
}

impl EntryPicks {
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.picks.iter().map(|p| p.element).collect()
    }
}

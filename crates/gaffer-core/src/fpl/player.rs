// Player records, position classes and availability status.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::de::f64_lenient;
use super::{PlayerId, TeamId};

// ---------------------------------------------------------------------------
// Position class
// ---------------------------------------------------------------------------

/// The four squad position classes, encoded 1-4 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PositionClass {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl PositionClass {
    pub const ALL: [PositionClass; 4] = [
        PositionClass::Goalkeeper,
        PositionClass::Defender,
        PositionClass::Midfielder,
        PositionClass::Forward,
    ];

    /// Wire code: 1 = GK, 2 = DEF, 3 = MID, 4 = FWD.
    pub fn code(self) -> u8 {
        match self {
            PositionClass::Goalkeeper => 1,
            PositionClass::Defender => 2,
            PositionClass::Midfielder => 3,
            PositionClass::Forward => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PositionClass::Goalkeeper),
            2 => Some(PositionClass::Defender),
            3 => Some(PositionClass::Midfielder),
            4 => Some(PositionClass::Forward),
            _ => None,
        }
    }

    /// Parse the short labels used on the command line and in CSV exports.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GK" | "GKP" | "1" => Some(PositionClass::Goalkeeper),
            "DEF" | "D" | "2" => Some(PositionClass::Defender),
            "MID" | "M" | "3" => Some(PositionClass::Midfielder),
            "FWD" | "F" | "4" => Some(PositionClass::Forward),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PositionClass::Goalkeeper => "GK",
            PositionClass::Defender => "DEF",
            PositionClass::Midfielder => "MID",
            PositionClass::Forward => "FWD",
        }
    }
}

impl TryFrom<u8> for PositionClass {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        PositionClass::from_code(code).ok_or_else(|| format!("unknown element_type {code}"))
    }
}

impl From<PositionClass> for u8 {
    fn from(pos: PositionClass) -> u8 {
        pos.code()
    }
}

impl fmt::Display for PositionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

/// Availability flag published with every player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Availability {
    #[default]
    #[serde(rename = "a")]
    Available,
    #[serde(rename = "d")]
    Doubtful,
    #[serde(rename = "i")]
    Injured,
    #[serde(rename = "u")]
    Unavailable,
    #[serde(rename = "s")]
    Suspended,
    /// Registered but not in the club's squad.
    #[serde(rename = "n")]
    NotInSquad,
    #[serde(other)]
    Unknown,
}

impl Availability {
    /// Probability-like weight applied to a projection.
    ///
    /// Doubtful and injured players are scaled by the published "chance of
    /// playing next round" percentage. When that percentage is missing a
    /// doubtful player counts as 50% and an injured player as 0%.
    pub fn play_weight(self, chance_of_playing: Option<u8>) -> f64 {
        match self {
            Availability::Available => 1.0,
            Availability::Doubtful => chance_of_playing.map_or(0.5, percent),
            Availability::Injured => chance_of_playing.map_or(0.0, percent),
            Availability::Unavailable
            | Availability::Suspended
            | Availability::NotInSquad
            | Availability::Unknown => 0.0,
        }
    }

    /// Whether the player can be bought at all. Players who have left the
    /// league (or were never registered to play) are excluded from pools.
    pub fn is_registered(self) -> bool {
        !matches!(self, Availability::Unavailable | Availability::NotInSquad)
    }
}

fn percent(chance: u8) -> f64 {
    f64::from(chance.min(100)) / 100.0
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One player as published in a season snapshot.
///
/// Only the season totals are kept; per-90 rates are derived by the engine so
/// that current-season, prior-season and recent-form samples share one code
/// path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Stable across seasons; used to match prior-season records.
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub web_name: String,
    pub element_type: PositionClass,
    pub team: TeamId,
    #[serde(default)]
    pub team_code: u32,
    /// Price in tenths of a million.
    #[serde(default)]
    pub now_cost: u32,
    #[serde(default)]
    pub status: Availability,
    #[serde(default)]
    pub chance_of_playing_next_round: Option<u8>,

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
}

impl Player {
    /// A bare record with zeroed statistics. Handy for building pools by hand.
    pub fn new(id: PlayerId, element_type: PositionClass, team: TeamId, now_cost: u32) -> Self {
        Player {
            id,
            code: id,
            web_name: format!("player-{id}"),
            element_type,
            team,
            team_code: team,
            now_cost,
            status: Availability::Available,
            chance_of_playing_next_round: None,
            minutes: 0,
            goals_scored: 0,
            assists: 0,
            clean_sheets: 0,
            goals_conceded: 0,
            own_goals: 0,
            saves: 0,
            yellow_cards: 0,
            red_cards: 0,
            starts: 0,
            expected_goals: 0.0,
            expected_assists: 0.0,
            expected_goals_conceded: 0.0,
        }
    }

    pub fn play_weight(&self) -> f64 {
        self.status.play_weight(self.chance_of_playing_next_round)
    }
}

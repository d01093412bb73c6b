// Team strength ratings.

use serde::{Deserialize, Serialize};

use super::TeamId;

/// Which side of a fixture a team is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    Home,
    Away,
}

impl Venue {
    pub fn opposite(self) -> Venue {
        match self {
            Venue::Home => Venue::Away,
            Venue::Away => Venue::Home,
        }
    }
}

/// A club and its directional strength ratings (roughly 1000-1400).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    pub strength_overall_home: u32,
    pub strength_overall_away: u32,
    pub strength_attack_home: u32,
    pub strength_attack_away: u32,
    pub strength_defence_home: u32,
    pub strength_defence_away: u32,
}

impl Team {
    pub fn attack(&self, venue: Venue) -> f64 {
        match venue {
            Venue::Home => f64::from(self.strength_attack_home),
            Venue::Away => f64::from(self.strength_attack_away),
        }
    }

    pub fn defence(&self, venue: Venue) -> f64 {
        match venue {
            Venue::Home => f64::from(self.strength_defence_home),
            Venue::Away => f64::from(self.strength_defence_away),
        }
    }

    pub fn overall(&self, venue: Venue) -> f64 {
        match venue {
            Venue::Home => f64::from(self.strength_overall_home),
            Venue::Away => f64::from(self.strength_overall_away),
        }
    }
}

// Fixture list entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::team::Venue;
use super::TeamId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureStatus {
    NotStarted,
    InProgress,
    Finished,
}

/// A scheduled match. `event` is `None` while the match is unscheduled
/// (postponed fixtures float until a gameweek is assigned).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u32,
    #[serde(default)]
    pub event: Option<u32>,
    pub team_h: TeamId,
    pub team_a: TeamId,
    pub team_h_difficulty: u8,
    pub team_a_difficulty: u8,
    #[serde(default)]
    pub started: Option<bool>,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub kickoff_time: Option<DateTime<Utc>>,
}

impl Fixture {
    pub fn status(&self) -> FixtureStatus {
        if self.finished {
            FixtureStatus::Finished
        } else if self.started == Some(true) {
            FixtureStatus::InProgress
        } else {
            FixtureStatus::NotStarted
        }
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.team_h == team || self.team_a == team
    }

    /// The side `team` plays on, or `None` if it is not in this fixture.
    pub fn venue_of(&self, team: TeamId) -> Option<Venue> {
        if self.team_h == team {
            Some(Venue::Home)
        } else if self.team_a == team {
            Some(Venue::Away)
        } else {
            None
        }
    }

    pub fn opponent_of(&self, team: TeamId) -> Option<TeamId> {
        match self.venue_of(team)? {
            Venue::Home => Some(self.team_a),
            Venue::Away => Some(self.team_h),
        }
    }

    /// Difficulty rating (1-5) as seen by the side playing at `venue`.
    pub fn difficulty_for(&self, venue: Venue) -> u8 {
        match venue {
            Venue::Home => self.team_h_difficulty,
            Venue::Away => self.team_a_difficulty,
        }
    }
}

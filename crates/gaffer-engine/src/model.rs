// Typed squad-selection model.
//
// One binary decision per candidate. Every constraint is keyed by a
// `ConstraintKey`; a candidate's coefficient on a key is derived from the
// candidate itself, so position, team and budget rows can never collide.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use gaffer_core::config::SquadConfig;
use gaffer_core::fpl::{PlayerId, PositionClass, TeamId};

/// Squad size in wildcard mode.
pub const SQUAD_SIZE: u32 = 15;
/// Starting lineup size.
pub const LINEUP_SIZE: u32 = 11;

/// A player as the solver sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: PlayerId,
    pub position: PositionClass,
    /// Real-world club used for the per-team quota.
    pub team: TeamId,
    /// Price in tenths of a million.
    pub cost: u32,
    /// Objective coefficient.
    pub xp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintKey {
    Position(PositionClass),
    Team(TeamId),
    Budget,
    Picks,
}

impl fmt::Display for ConstraintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKey::Position(p) => write!(f, "position {}", p.label()),
            ConstraintKey::Team(t) => write!(f, "team {t}"),
            ConstraintKey::Budget => f.write_str("budget"),
            ConstraintKey::Picks => f.write_str("picks"),
        }
    }
}

/// Inclusive bounds on a constraint row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub fn exactly(n: u32) -> Self {
        Bounds { min: n, max: n }
    }

    pub fn between(min: u32, max: u32) -> Self {
        Bounds { min, max }
    }

    pub fn at_most(max: u32) -> Self {
        Bounds { min: 0, max }
    }

    pub fn is_exact(&self) -> bool {
        self.min == self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= f64::from(self.min) - 1e-6 && value <= f64::from(self.max) + 1e-6
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Fifteen from the whole pool.
    Wildcard,
    /// Starting eleven from an existing squad.
    Lineup,
}

#[derive(Debug, Clone)]
pub struct SquadModel {
    pub kind: ModelKind,
    pub candidates: Vec<Candidate>,
    pub constraints: BTreeMap<ConstraintKey, Bounds>,
}

impl SquadModel {
    /// Fifteen-player squad: 2 GK, 5 DEF, 5 MID, 3 FWD, within budget and
    /// the per-team quota.
    pub fn wildcard(candidates: Vec<Candidate>, rules: &SquadConfig) -> Self {
        let mut constraints = BTreeMap::new();
        constraints.insert(ConstraintKey::Position(PositionClass::Goalkeeper), Bounds::exactly(2));
        constraints.insert(ConstraintKey::Position(PositionClass::Defender), Bounds::exactly(5));
        constraints.insert(ConstraintKey::Position(PositionClass::Midfielder), Bounds::exactly(5));
        constraints.insert(ConstraintKey::Position(PositionClass::Forward), Bounds::exactly(3));
        constraints.insert(ConstraintKey::Budget, Bounds::at_most(rules.budget));
        constraints.insert(ConstraintKey::Picks, Bounds::exactly(SQUAD_SIZE));
        let mut model = SquadModel {
            kind: ModelKind::Wildcard,
            candidates,
            constraints,
        };
        model.add_team_quotas(rules.max_per_team);
        model
    }

    /// Starting eleven from an existing squad: 1 GK, 3-5 DEF, 2-5 MID,
    /// 1-3 FWD, at most 11 picks. No budget row; the squad is already paid
    /// for.
    pub fn lineup(candidates: Vec<Candidate>, rules: &SquadConfig) -> Self {
        let mut constraints = BTreeMap::new();
        constraints.insert(ConstraintKey::Position(PositionClass::Goalkeeper), Bounds::exactly(1));
        constraints.insert(ConstraintKey::Position(PositionClass::Defender), Bounds::between(3, 5));
        constraints.insert(ConstraintKey::Position(PositionClass::Midfielder), Bounds::between(2, 5));
        constraints.insert(ConstraintKey::Position(PositionClass::Forward), Bounds::between(1, 3));
        constraints.insert(ConstraintKey::Picks, Bounds::at_most(LINEUP_SIZE));
        let mut model = SquadModel {
            kind: ModelKind::Lineup,
            candidates,
            constraints,
        };
        model.add_team_quotas(rules.max_per_team);
        model
    }

    fn add_team_quotas(&mut self, max_per_team: u32) {
        let teams: BTreeSet<TeamId> = self.candidates.iter().map(|c| c.team).collect();
        for team in teams {
            self.constraints
                .insert(ConstraintKey::Team(team), Bounds::at_most(max_per_team));
        }
    }

    /// Coefficient of `candidate` in the row keyed by `key`.
    pub fn coefficient(candidate: &Candidate, key: ConstraintKey) -> f64 {
        match key {
            ConstraintKey::Position(p) if candidate.position == p => 1.0,
            ConstraintKey::Team(t) if candidate.team == t => 1.0,
            ConstraintKey::Budget => f64::from(candidate.cost),
            ConstraintKey::Picks => 1.0,
            _ => 0.0,
        }
    }

    /// Row value for a selection (one flag per candidate).
    pub fn row_value(&self, key: ConstraintKey, selected: &[bool]) -> f64 {
        self.candidates
            .iter()
            .zip(selected)
            .filter(|(_, on)| **on)
            .map(|(c, _)| Self::coefficient(c, key))
            .sum()
    }

    /// First constraint a selection violates, if any.
    pub fn violation(&self, selected: &[bool]) -> Option<ConstraintKey> {
        self.constraints
            .iter()
            .find(|(key, bounds)| !bounds.contains(self.row_value(**key, selected)))
            .map(|(key, _)| *key)
    }

    /// First constraint that cannot be met even by selecting every candidate
    /// with a positive coefficient. Catches pools that are short of a
    /// position before the solver is asked.
    pub fn unreachable_minimum(&self) -> Option<ConstraintKey> {
        self.constraints
            .iter()
            .find(|(key, bounds)| {
                let reachable: f64 = self
                    .candidates
                    .iter()
                    .map(|c| Self::coefficient(c, **key))
                    .filter(|v| *v > 0.0)
                    .sum();
                reachable + 1e-6 < f64::from(bounds.min)
            })
            .map(|(key, _)| *key)
    }
}

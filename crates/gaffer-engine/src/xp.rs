// Per-player expected points for a target gameweek.
//
// The per-match estimate comes from one of two samples: season totals
// (scaled by minutes confidence) or, when recent snapshots are supplied,
// the plain average of the player's observed recent matches. That value is
// blended with the prior season, weighted by availability, then summed over
// the player's fixtures in the target gameweek with a difficulty multiplier.
//
// Every missing-data path degrades to zero; nothing here fails.

use std::collections::HashMap;

use gaffer_core::config::ModelConfig;
use gaffer_core::fpl::{
    Bootstrap, Fixture, History, LiveEvent, Player, TeamId, SEASON_GAMEWEEKS,
};
use tracing::debug;

use crate::score::{base_points, minutes_confidence, season_points, Rates};
use crate::strength::strength_index;

/// Matches a prior-season total is spread over.
const HISTORY_MATCHES: u32 = SEASON_GAMEWEEKS;

/// Reference multiplier for a raw 1-5 difficulty rating. Out-of-range
/// ratings are treated as neutral.
pub fn difficulty_multiplier(difficulty: u8) -> f64 {
    match difficulty {
        1 => 1.2,
        2 => 1.1,
        3 => 1.0,
        4 => 0.9,
        5 => 0.8,
        _ => 1.0,
    }
}

/// Projects expected points for players against one snapshot of the season.
pub struct Estimator<'a> {
    bootstrap: &'a Bootstrap,
    fixtures: &'a [Fixture],
    history: Option<&'a History>,
    /// Recent snapshots, most recent first, trimmed to the form window.
    recent: Vec<&'a LiveEvent>,
    current_gameweek: u32,
    params: ModelConfig,
    /// Finished fixtures per team up to the current gameweek.
    matches_played: HashMap<TeamId, u32>,
}

impl<'a> Estimator<'a> {
    pub fn new(
        bootstrap: &'a Bootstrap,
        fixtures: &'a [Fixture],
        current_gameweek: u32,
        params: ModelConfig,
    ) -> Self {
        let mut matches_played: HashMap<TeamId, u32> = HashMap::new();
        for f in fixtures {
            let counts = f.finished && f.event.is_some_and(|gw| gw <= current_gameweek);
            if counts {
                *matches_played.entry(f.team_h).or_default() += 1;
                *matches_played.entry(f.team_a).or_default() += 1;
            }
        }
        Estimator {
            bootstrap,
            fixtures,
            history: None,
            recent: Vec::new(),
            current_gameweek,
            params,
            matches_played,
        }
    }

    /// Blend in prior-season records, matched by player code.
    pub fn with_history(mut self, history: &'a History) -> Self {
        self.history = Some(history);
        self
    }

    /// Use recent gameweek snapshots instead of season totals. An empty
    /// slice leaves the season estimate in place.
    pub fn with_recent(mut self, recent: &'a [LiveEvent]) -> Self {
        let mut sorted: Vec<&LiveEvent> = recent.iter().collect();
        sorted.sort_by(|a, b| b.event.cmp(&a.event));
        sorted.truncate(self.params.form_window);
        self.recent = sorted;
        self
    }

    pub fn current_gameweek(&self) -> u32 {
        self.current_gameweek
    }

    /// Finished fixtures `team` has played up to the current gameweek.
    pub fn matches_played(&self, team: TeamId) -> u32 {
        self.matches_played.get(&team).copied().unwrap_or(0)
    }

    /// Per-match estimate from the current season, before blending.
    pub fn current_form(&self, player: &Player) -> f64 {
        if self.recent.is_empty() {
            return season_points(player, self.matches_played(player.team), self.params.xg_weight);
        }
        let observed = self
            .recent
            .iter()
            .filter_map(|live| live.stats_for(player.id))
            .filter(|stats| stats.minutes > 0);
        match Rates::average(observed) {
            Some(rates) => base_points(player.element_type, &rates, self.params.xg_weight),
            None => 0.0,
        }
    }

    /// Per-match estimate from the prior season, if the player has one.
    pub fn historical(&self, player: &Player) -> Option<f64> {
        let past = self.history?.get(player.code)?;
        let rates = Rates::per_90(past);
        let confidence = minutes_confidence(past.minutes, HISTORY_MATCHES);
        Some(base_points(player.element_type, &rates, self.params.xg_weight) * confidence)
    }

    /// Current and prior season combined. Before the season starts only the
    /// prior season counts.
    pub fn blended(&self, player: &Player) -> f64 {
        let history = self.historical(player);
        if self.current_gameweek == 0 {
            return history.unwrap_or(0.0);
        }
        let current = self.current_form(player);
        match history {
            Some(past) => {
                let w = self.params.history_weight;
                (1.0 - w) * current + w * past
            }
            None => current,
        }
    }

    /// Expected points for `player` in gameweek `current + offset`.
    pub fn estimate(&self, player: &Player, offset: i32) -> f64 {
        let target = i64::from(self.current_gameweek) + i64::from(offset);
        if target < 1 || target > i64::from(SEASON_GAMEWEEKS) {
            return 0.0;
        }
        let target = target as u32;

        let fixtures: Vec<&Fixture> = self
            .fixtures
            .iter()
            .filter(|f| f.event == Some(target) && f.involves(player.team))
            .collect();
        if fixtures.is_empty() {
            return 0.0;
        }
        if offset < 0 && fixtures.iter().any(|f| !f.finished) {
            return 0.0;
        }

        let per_match = self.blended(player) * player.play_weight();
        if per_match == 0.0 {
            return 0.0;
        }

        let Some(own) = self.bootstrap.team(player.team) else {
            debug!(player = player.id, team = player.team, "team missing from bootstrap");
            return 0.0;
        };

        let mut total = 0.0;
        for f in fixtures {
            let (Some(venue), Some(opp_id)) = (f.venue_of(player.team), f.opponent_of(player.team))
            else {
                continue;
            };
            let Some(opponent) = self.bootstrap.team(opp_id) else {
                continue;
            };
            let multiplier = difficulty_multiplier(f.difficulty_for(venue))
                + strength_index(player.element_type, own, opponent, venue);
            total += per_match * multiplier;
        }
        total
    }

    /// Sum of `estimate` over `horizon` consecutive gameweeks starting at
    /// `offset`.
    pub fn estimate_horizon(&self, player: &Player, offset: i32, horizon: usize) -> f64 {
        (0..horizon)
            .map(|step| self.estimate(player, offset.saturating_add(step as i32)))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaffer_core::fpl::{Availability, LiveElement, MatchStats, PositionClass, Team};

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn team(id: u32, rating: u32) -> Team {
        Team {
            id,
            code: id,
            name: format!("Team {id}"),
            short_name: format!("T{id}"),
            strength_overall_home: rating,
            strength_overall_away: rating,
            strength_attack_home: rating,
            strength_attack_away: rating,
            strength_defence_home: rating,
            strength_defence_away: rating,
        }
    }

    fn fixture(id: u32, event: u32, home: u32, away: u32, difficulty: u8, finished: bool) -> Fixture {
        Fixture {
            id,
            event: Some(event),
            team_h: home,
            team_a: away,
            team_h_difficulty: difficulty,
            team_a_difficulty: difficulty,
            started: Some(finished),
            finished,
            kickoff_time: None,
        }
    }

    /// Regular forward: 10 starts, 900 minutes, 5 goals, 4.0 xG. Scores
    /// 0.45 * 4 + 2 = 3.8 per match at xg_weight 0.5.
    fn striker() -> Player {
        let mut p = Player::new(9, PositionClass::Forward, 1, 80);
        p.minutes = 900;
        p.goals_scored = 5;
        p.expected_goals = 4.0;
        p.starts = 10;
        p
    }

    fn bootstrap() -> Bootstrap {
        Bootstrap {
            events: vec![],
            teams: vec![team(1, 1200), team(2, 1200)],
            elements: vec![striker()],
        }
    }

    /// Ten finished gameweeks, then gameweek 11 (difficulty 2) and a double
    /// gameweek 12 (difficulties 2 and 4).
    fn season() -> Vec<Fixture> {
        let mut fixtures: Vec<Fixture> = (1..=10)
            .map(|gw| fixture(gw, gw, 1, 2, 3, true))
            .collect();
        fixtures.push(fixture(11, 11, 1, 2, 2, false));
        fixtures.push(fixture(12, 12, 2, 1, 2, false));
        fixtures.push(fixture(13, 12, 1, 2, 4, false));
        fixtures
    }

    #[test]
    fn difficulty_table() {
        assert_eq!(difficulty_multiplier(1), 1.2);
        assert_eq!(difficulty_multiplier(5), 0.8);
        assert_eq!(difficulty_multiplier(0), 1.0);
        assert_eq!(difficulty_multiplier(9), 1.0);
    }

    #[test]
    fn single_fixture_applies_difficulty() {
        let bs = bootstrap();
        let fixtures = season();
        let est = Estimator::new(&bs, &fixtures, 10, ModelConfig::default());
        assert_eq!(est.matches_played(1), 10);
        let xp = est.estimate(&striker(), 1);
        assert!(approx_eq(xp, 3.8 * 1.1), "got {xp}");
    }

    #[test]
    fn double_gameweek_accumulates() {
        let bs = bootstrap();
        let fixtures = season();
        let est = Estimator::new(&bs, &fixtures, 10, ModelConfig::default());
        let xp = est.estimate(&striker(), 2);
        assert!(approx_eq(xp, 3.8 * 1.1 + 3.8 * 0.9), "got {xp}");
        let both = est.estimate_horizon(&striker(), 1, 2);
        assert!(approx_eq(both, 3.8 * 1.1 + 3.8 * 2.0), "got {both}");
    }

    #[test]
    fn outside_season_is_zero() {
        let bs = bootstrap();
        let fixtures = season();
        let late = Estimator::new(&bs, &fixtures, 38, ModelConfig::default());
        assert_eq!(late.estimate(&striker(), 1), 0.0);
        let early = Estimator::new(&bs, &fixtures, 0, ModelConfig::default());
        assert_eq!(early.estimate(&striker(), 0), 0.0);
    }

    #[test]
    fn unfinished_past_fixture_is_zero() {
        let bs = bootstrap();
        let mut fixtures = season();
        fixtures[7].finished = false; // gameweek 8
        let est = Estimator::new(&bs, &fixtures, 10, ModelConfig::default());
        assert_eq!(est.estimate(&striker(), -2), 0.0);
        assert!(est.estimate(&striker(), -3) > 0.0);
    }

    #[test]
    fn no_fixture_no_points() {
        let bs = bootstrap();
        let fixtures = season();
        let est = Estimator::new(&bs, &fixtures, 10, ModelConfig::default());
        assert_eq!(est.estimate(&striker(), 5), 0.0);
    }

    #[test]
    fn missing_opponent_is_skipped() {
        let bs = bootstrap();
        let mut fixtures = season();
        fixtures[11].team_h = 99; // first gameweek-12 fixture loses its opponent
        let est = Estimator::new(&bs, &fixtures, 10, ModelConfig::default());
        let xp = est.estimate(&striker(), 2);
        assert!(approx_eq(xp, 3.8 * 0.9), "got {xp}");
    }

    #[test]
    fn availability_scales() {
        let bs = bootstrap();
        let fixtures = season();
        let est = Estimator::new(&bs, &fixtures, 10, ModelConfig::default());
        let mut doubtful = striker();
        doubtful.status = Availability::Doubtful;
        doubtful.chance_of_playing_next_round = Some(75);
        assert!(approx_eq(est.estimate(&doubtful, 1), 3.8 * 0.75 * 1.1));
        let mut suspended = striker();
        suspended.status = Availability::Suspended;
        assert_eq!(est.estimate(&suspended, 1), 0.0);
    }

    #[test]
    fn history_blend_and_preseason() {
        let bs = bootstrap();
        let fixtures = season();
        // Prior season: 38 full matches at a 2.0-per-match clip. Only
        // appearance points, so the estimate is exactly 2.0.
        let mut past = Player::new(500, PositionClass::Forward, 1, 80);
        past.code = striker().code;
        past.minutes = 90 * 38;
        past.starts = 38;
        let history = History::from_players(vec![past]);

        let est = Estimator::new(&bs, &fixtures, 10, ModelConfig::default()).with_history(&history);
        let xp = est.estimate(&striker(), 1);
        assert!(approx_eq(xp, (0.85 * 3.8 + 0.15 * 2.0) * 1.1), "got {xp}");

        let preseason =
            Estimator::new(&bs, &fixtures, 0, ModelConfig::default()).with_history(&history);
        assert!(approx_eq(preseason.blended(&striker()), 2.0));
        assert!(approx_eq(preseason.estimate(&striker(), 1), 2.0 * 1.0), "gameweek 1 is difficulty 3");
    }

    #[test]
    fn preseason_without_history_is_zero() {
        let bs = bootstrap();
        let fixtures = season();
        let est = Estimator::new(&bs, &fixtures, 0, ModelConfig::default());
        assert_eq!(est.estimate(&striker(), 1), 0.0);
    }

    #[test]
    fn recent_form_replaces_season_sample() {
        let bs = bootstrap();
        let fixtures = season();
        let snapshot = |event: u32, minutes: u32, goals: u32| LiveEvent {
            event,
            elements: vec![LiveElement {
                id: 9,
                stats: MatchStats {
                    minutes,
                    goals_scored: goals,
                    starts: u32::from(minutes > 0),
                    ..MatchStats::default()
                },
            }],
        };
        // Gameweek 8 was a blank (0 minutes) and is ignored; gameweek 3 falls
        // outside the window.
        let recent = vec![snapshot(3, 90, 5), snapshot(10, 90, 2), snapshot(9, 90, 0), snapshot(8, 0, 0)];
        let params = ModelConfig {
            form_window: 3,
            ..ModelConfig::default()
        };
        let est = Estimator::new(&bs, &fixtures, 10, params).with_recent(&recent);
        // goals avg 1.0, xG 0 -> blend 0.5 * 4 + 2 appearance = 4.0
        assert!(approx_eq(est.current_form(&striker()), 4.0));

        let empty: Vec<LiveEvent> = vec![];
        let est = Estimator::new(&bs, &fixtures, 10, ModelConfig::default()).with_recent(&empty);
        assert!(approx_eq(est.current_form(&striker()), 3.8));
    }

    #[test]
    fn recent_form_without_appearances_is_zero() {
        let bs = bootstrap();
        let fixtures = season();
        let recent = vec![LiveEvent {
            event: 10,
            elements: vec![],
        }];
        let est = Estimator::new(&bs, &fixtures, 10, ModelConfig::default()).with_recent(&recent);
        assert_eq!(est.current_form(&striker()), 0.0);
    }
}

// Position-specific points formulas.
//
// A `Rates` value holds per-match rates: per-90 rates derived from season
// totals, or plain averages over a handful of recent matches. The same
// formula scores both.

use gaffer_core::fpl::{MatchStats, Player, PositionClass};

/// A starts or clean-sheet rate at or above this counts as "regular".
pub const REGULAR_RATE: f64 = 0.67;

/// Per-match rates feeding the points formula.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rates {
    pub goals: f64,
    pub assists: f64,
    pub expected_goals: f64,
    pub expected_assists: f64,
    pub expected_goals_conceded: f64,
    pub clean_sheets: f64,
    pub saves: f64,
    pub starts: f64,
    pub yellow_cards: f64,
    pub red_cards: f64,
    pub own_goals: f64,
}

impl Rates {
    /// Per-90 rates from a player's season totals. Zero minutes gives
    /// all-zero rates.
    pub fn per_90(player: &Player) -> Self {
        if player.minutes == 0 {
            return Rates::default();
        }
        let scale = 90.0 / f64::from(player.minutes);
        let rate = |total: u32| f64::from(total) * scale;
        Rates {
            goals: rate(player.goals_scored),
            assists: rate(player.assists),
            expected_goals: player.expected_goals * scale,
            expected_assists: player.expected_assists * scale,
            expected_goals_conceded: player.expected_goals_conceded * scale,
            clean_sheets: rate(player.clean_sheets),
            saves: rate(player.saves),
            starts: rate(player.starts),
            yellow_cards: rate(player.yellow_cards),
            red_cards: rate(player.red_cards),
            own_goals: rate(player.own_goals),
        }
    }

    /// Plain average over observed matches. `None` when the slice is empty.
    pub fn average<'a, I>(matches: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a MatchStats>,
    {
        let mut sum = Rates::default();
        let mut n = 0u32;
        for m in matches {
            sum.goals += f64::from(m.goals_scored);
            sum.assists += f64::from(m.assists);
            sum.expected_goals += m.expected_goals;
            sum.expected_assists += m.expected_assists;
            sum.expected_goals_conceded += m.expected_goals_conceded;
            sum.clean_sheets += f64::from(m.clean_sheets);
            sum.saves += f64::from(m.saves);
            sum.starts += f64::from(m.starts);
            sum.yellow_cards += f64::from(m.yellow_cards);
            sum.red_cards += f64::from(m.red_cards);
            sum.own_goals += f64::from(m.own_goals);
            n += 1;
        }
        if n == 0 {
            return None;
        }
        let n = f64::from(n);
        Some(Rates {
            goals: sum.goals / n,
            assists: sum.assists / n,
            expected_goals: sum.expected_goals / n,
            expected_assists: sum.expected_assists / n,
            expected_goals_conceded: sum.expected_goals_conceded / n,
            clean_sheets: sum.clean_sheets / n,
            saves: sum.saves / n,
            starts: sum.starts / n,
            yellow_cards: sum.yellow_cards / n,
            red_cards: sum.red_cards / n,
            own_goals: sum.own_goals / n,
        })
    }
}

fn blend(expected: f64, actual: f64, xg_weight: f64) -> f64 {
    xg_weight * expected + (1.0 - xg_weight) * actual
}

fn appearance_points(starts: f64) -> f64 {
    if starts >= REGULAR_RATE {
        2.0
    } else if starts > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Expected points per match for a player of `position` with these rates.
///
/// `xg_weight` blends expected goals/assists against the actual rates.
pub fn base_points(position: PositionClass, rates: &Rates, xg_weight: f64) -> f64 {
    let goal = blend(rates.expected_goals, rates.goals, xg_weight);
    let assist = blend(rates.expected_assists, rates.assists, xg_weight);
    let conceded_penalty = (rates.expected_goals_conceded / 2.0).floor();
    let regular_clean_sheets = rates.clean_sheets >= REGULAR_RATE;
    let regular_starter = rates.starts >= REGULAR_RATE;
    let keeper_or_defender_cs = if regular_starter && regular_clean_sheets {
        4.0 * rates.clean_sheets
    } else {
        0.0
    };

    let positional = match position {
        PositionClass::Forward => goal * 4.0 + assist * 3.0,
        PositionClass::Midfielder => {
            let cs = if regular_clean_sheets { rates.clean_sheets } else { 0.0 };
            goal * 5.0 + assist * 3.0 + cs - conceded_penalty
        }
        PositionClass::Defender => {
            goal * 6.0 + assist * 3.0 + keeper_or_defender_cs - conceded_penalty
        }
        PositionClass::Goalkeeper => {
            goal * 10.0 + assist * 3.0 + keeper_or_defender_cs - conceded_penalty
                + (rates.saves / 3.0).floor()
        }
    };

    positional + appearance_points(rates.starts)
        - rates.yellow_cards
        - 2.0 * rates.red_cards
        - rates.own_goals
}

/// Share of available minutes actually played, capped at 1.
/// No matches considered means no confidence.
pub fn minutes_confidence(minutes: u32, matches: u32) -> f64 {
    if matches == 0 {
        return 0.0;
    }
    (f64::from(minutes) / (90.0 * f64::from(matches))).min(1.0)
}

/// Season-aggregate estimate: the per-90 formula scaled by minutes
/// confidence over `matches` team fixtures.
pub fn season_points(player: &Player, matches: u32, xg_weight: f64) -> f64 {
    let rates = Rates::per_90(player);
    base_points(player.element_type, &rates, xg_weight) * minutes_confidence(player.minutes, matches)
}

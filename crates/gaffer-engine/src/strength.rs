// Home/away strength index for a single fixture.
//
// Ratings are compared across the pitch: a side's attack at its own venue
// against the opponent's defence at the complementary venue, normalised by
// the opponent's overall rating there. Ratings are positive by contract;
// zero ratings are not guarded and yield non-finite values.

use gaffer_core::fpl::{PositionClass, Team, Venue};

/// Attacking matchup: own attack vs. opponent defence.
pub fn attack_index(own: &Team, opponent: &Team, venue: Venue) -> f64 {
    let opp_venue = venue.opposite();
    (own.attack(venue) - opponent.defence(opp_venue)) / opponent.overall(opp_venue)
}

/// Defensive matchup: own defence vs. opponent attack.
pub fn defence_index(own: &Team, opponent: &Team, venue: Venue) -> f64 {
    let opp_venue = venue.opposite();
    (own.defence(venue) - opponent.attack(opp_venue)) / opponent.overall(opp_venue)
}

/// Attack/defence weights per position class. Defenders lean on clean
/// sheets more than midfielders, goalkeepers exclusively.
fn weights(position: PositionClass) -> (f64, f64) {
    match position {
        PositionClass::Forward => (1.0, 0.0),
        PositionClass::Midfielder => (8.0 / 9.0, 1.0 / 9.0),
        PositionClass::Defender => (9.0 / 15.0, 6.0 / 15.0),
        PositionClass::Goalkeeper => (0.0, 1.0),
    }
}

/// Signed favourability of a fixture for a player of `position` whose team
/// plays at `venue`. Positive means the matchup favours the player.
pub fn strength_index(position: PositionClass, own: &Team, opponent: &Team, venue: Venue) -> f64 {
    let (att_w, def_w) = weights(position);
    let mut index = 0.0;
    if att_w > 0.0 {
        index += att_w * attack_index(own, opponent, venue);
    }
    if def_w > 0.0 {
        index += def_w * defence_index(own, opponent, venue);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn team(id: u32, overall: (u32, u32), attack: (u32, u32), defence: (u32, u32)) -> Team {
        Team {
            id,
            code: id,
            name: format!("Team {id}"),
            short_name: format!("T{id}"),
            strength_overall_home: overall.0,
            strength_overall_away: overall.1,
            strength_attack_home: attack.0,
            strength_attack_away: attack.1,
            strength_defence_home: defence.0,
            strength_defence_away: defence.1,
        }
    }

    fn pair() -> (Team, Team) {
        let own = team(1, (1300, 1300), (1300, 1280), (1250, 1240));
        let opp = team(2, (1260, 1250), (1310, 1300), (1210, 1200));
        (own, opp)
    }

    #[test]
    fn forward_uses_attack_only() {
        let (own, opp) = pair();
        // (1300 - 1200) / 1250
        let idx = strength_index(PositionClass::Forward, &own, &opp, Venue::Home);
        assert!(approx_eq(idx, 0.08), "got {idx}");
    }

    #[test]
    fn goalkeeper_uses_defence_only() {
        let (own, opp) = pair();
        // (1250 - 1300) / 1250
        let idx = strength_index(PositionClass::Goalkeeper, &own, &opp, Venue::Home);
        assert!(approx_eq(idx, -0.04), "got {idx}");
    }

    #[test]
    fn outfield_blends() {
        let (own, opp) = pair();
        let mid = strength_index(PositionClass::Midfielder, &own, &opp, Venue::Home);
        let def = strength_index(PositionClass::Defender, &own, &opp, Venue::Home);
        assert!(approx_eq(mid, 8.0 / 9.0 * 0.08 - 1.0 / 9.0 * 0.04), "got {mid}");
        assert!(approx_eq(def, 0.6 * 0.08 - 0.4 * 0.04), "got {def}");
    }

    #[test]
    fn away_side_reads_complementary_ratings() {
        let (own, opp) = pair();
        // own attack away 1280 vs opp defence home 1210, opp overall home 1260
        let idx = attack_index(&own, &opp, Venue::Away);
        assert!(approx_eq(idx, 70.0 / 1260.0), "got {idx}");
    }

    #[test]
    fn evenly_matched_sides_are_neutral() {
        let a = team(1, (1200, 1200), (1200, 1200), (1200, 1200));
        let b = team(2, (1200, 1200), (1200, 1200), (1200, 1200));
        for pos in PositionClass::ALL {
            assert!(approx_eq(strength_index(pos, &a, &b, Venue::Home), 0.0));
        }
    }
}

// Turn a lineup selection into numbered picks with captaincy.
//
// Slot order is explicit rather than whatever order the solver returns:
// starters by position class, then xp descending, then id; the bench puts
// the spare goalkeeper first, then xp descending, then id.

use std::cmp::Ordering;

use gaffer_core::fpl::{Pick, PositionClass};

use crate::model::Candidate;

fn by_xp_then_id(a: &Candidate, b: &Candidate) -> Ordering {
    b.xp
        .partial_cmp(&a.xp)
        .unwrap_or(Ordering::Equal)
        .then(a.id.cmp(&b.id))
}

fn starter_order(a: &Candidate, b: &Candidate) -> Ordering {
    a.position.cmp(&b.position).then_with(|| by_xp_then_id(a, b))
}

fn bench_order(a: &Candidate, b: &Candidate) -> Ordering {
    let a_gk = a.position == PositionClass::Goalkeeper;
    let b_gk = b.position == PositionClass::Goalkeeper;
    b_gk.cmp(&a_gk).then_with(|| by_xp_then_id(a, b))
}

/// Build picks for `squad`, where `starting[i]` says whether `squad[i]`
/// starts. Starters get slots 1..=N and multiplier 1; the rest follow on the
/// bench with multiplier 0.
///
/// The captain is the starter with the highest xp (lowest id on ties) and
/// plays with multiplier 2; the next starter in that order is vice-captain.
pub fn assemble(squad: &[Candidate], starting: &[bool]) -> Vec<Pick> {
    let mut starters: Vec<&Candidate> = Vec::new();
    let mut bench: Vec<&Candidate> = Vec::new();
    for (candidate, &starts) in squad.iter().zip(starting) {
        if starts {
            starters.push(candidate);
        } else {
            bench.push(candidate);
        }
    }
    starters.sort_by(|a, b| starter_order(a, b));
    bench.sort_by(|a, b| bench_order(a, b));

    let mut captaincy: Vec<&Candidate> = starters.clone();
    captaincy.sort_by(|a, b| by_xp_then_id(a, b));
    let captain = captaincy.first().map(|c| c.id);
    let vice = captaincy.get(1).map(|c| c.id);

    let starter_picks = starters.iter().map(|c| (c, 1u8));
    let bench_picks = bench.iter().map(|c| (c, 0u8));
    starter_picks
        .chain(bench_picks)
        .enumerate()
        .map(|(i, (c, multiplier))| {
            let is_captain = captain == Some(c.id);
            Pick {
                element: c.id,
                position: (i + 1) as u8,
                multiplier: if is_captain { 2 } else { multiplier },
                is_captain,
                is_vice_captain: vice == Some(c.id),
                xp: c.xp,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u32, position: PositionClass, xp: f64) -> Candidate {
        Candidate {
            id,
            position,
            team: id,
            cost: 50,
            xp,
        }
    }

    #[test]
    fn starters_then_bench_in_documented_order() {
        let squad = vec![
            candidate(5, PositionClass::Forward, 6.0),
            candidate(1, PositionClass::Goalkeeper, 3.0),
            candidate(3, PositionClass::Defender, 2.0),
            candidate(4, PositionClass::Defender, 4.0),
            candidate(2, PositionClass::Goalkeeper, 2.5),
            candidate(6, PositionClass::Midfielder, 5.0),
            candidate(7, PositionClass::Midfielder, 1.0),
        ];
        let starting = [true, true, true, true, false, true, false];
        let picks = assemble(&squad, &starting);

        let order: Vec<u32> = picks.iter().map(|p| p.element).collect();
        assert_eq!(order, vec![1, 4, 3, 6, 5, 2, 7]);
        let slots: Vec<u8> = picks.iter().map(|p| p.position).collect();
        assert_eq!(slots, vec![1, 2, 3, 4, 5, 6, 7]);
        let multipliers: Vec<u8> = picks.iter().map(|p| p.multiplier).collect();
        assert_eq!(multipliers, vec![1, 1, 1, 1, 2, 0, 0]);
    }

    #[test]
    fn captain_and_vice_by_xp() {
        let squad = vec![
            candidate(1, PositionClass::Goalkeeper, 3.0),
            candidate(2, PositionClass::Midfielder, 7.0),
            candidate(3, PositionClass::Forward, 6.5),
        ];
        let picks = assemble(&squad, &[true, true, true]);
        let captain: Vec<&Pick> = picks.iter().filter(|p| p.is_captain).collect();
        let vice: Vec<&Pick> = picks.iter().filter(|p| p.is_vice_captain).collect();
        assert_eq!(captain.len(), 1);
        assert_eq!(captain[0].element, 2);
        assert_eq!(captain[0].multiplier, 2);
        assert_eq!(vice.len(), 1);
        assert_eq!(vice[0].element, 3);
        assert_eq!(vice[0].multiplier, 1);
    }

    #[test]
    fn ties_go_to_lowest_id() {
        let squad = vec![
            candidate(9, PositionClass::Forward, 5.0),
            candidate(4, PositionClass::Midfielder, 5.0),
            candidate(6, PositionClass::Defender, 5.0),
        ];
        let picks = assemble(&squad, &[true, true, true]);
        let captain = picks.iter().find(|p| p.is_captain).unwrap();
        let vice = picks.iter().find(|p| p.is_vice_captain).unwrap();
        assert_eq!(captain.element, 4);
        assert_eq!(vice.element, 6);
    }

    #[test]
    fn bench_player_never_captains() {
        let squad = vec![
            candidate(1, PositionClass::Goalkeeper, 2.0),
            candidate(2, PositionClass::Goalkeeper, 9.0),
            candidate(3, PositionClass::Forward, 4.0),
        ];
        let picks = assemble(&squad, &[true, false, true]);
        let bench = picks.iter().find(|p| p.element == 2).unwrap();
        assert_eq!(bench.multiplier, 0);
        assert!(!bench.is_captain && !bench.is_vice_captain);
        assert_eq!(picks.iter().find(|p| p.is_captain).unwrap().element, 3);
    }

    #[test]
    fn empty_selection() {
        assert!(assemble(&[], &[]).is_empty());
    }
}

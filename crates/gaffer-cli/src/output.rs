// Terminal tables.

use tabled::{Table, Tabled};

use gaffer_core::fpl::{Bootstrap, Event, Pick};
use gaffer_engine::RankedPlayer;

#[derive(Tabled)]
struct PickRow {
    #[tabled(rename = "#")]
    slot: u8,
    #[tabled(rename = "Pos")]
    position: &'static str,
    #[tabled(rename = "Player")]
    name: String,
    #[tabled(rename = "Club")]
    club: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "xP")]
    xp: String,
    #[tabled(rename = "")]
    role: &'static str,
}

#[derive(Tabled)]
struct RankRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Player")]
    name: String,
    #[tabled(rename = "Pos")]
    position: &'static str,
    #[tabled(rename = "Club")]
    club: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "xP")]
    xp: String,
}

#[derive(Tabled)]
struct DeadlineRow {
    #[tabled(rename = "GW")]
    gameweek: u32,
    #[tabled(rename = "Deadline")]
    deadline: String,
    #[tabled(rename = "Name")]
    name: String,
}

fn club(bootstrap: &Bootstrap, team: u32) -> String {
    bootstrap
        .team(team)
        .map(|t| t.short_name.clone())
        .unwrap_or_else(|| "?".to_string())
}

fn price(cost: u32) -> String {
    format!("{:.1}", f64::from(cost) / 10.0)
}

fn pick_row(pick: &Pick, bootstrap: &Bootstrap) -> PickRow {
    let (name, position, club, cost) = match bootstrap.player(pick.element) {
        Some(p) => (
            p.web_name.clone(),
            p.element_type.label(),
            club(bootstrap, p.team),
            price(p.now_cost),
        ),
        None => ("?".to_string(), "?", "?".to_string(), "?".to_string()),
    };
    let role = if pick.is_captain {
        "(C)"
    } else if pick.is_vice_captain {
        "(V)"
    } else {
        ""
    };
    PickRow {
        slot: pick.position,
        position,
        name,
        club,
        cost,
        xp: format!("{:.2}", pick.xp),
        role,
    }
}

/// Starting eleven, then the bench, then the projected total (captain
/// counted twice).
pub fn render_picks(picks: &[Pick], bootstrap: &Bootstrap) -> String {
    let (starting, bench): (Vec<&Pick>, Vec<&Pick>) =
        picks.iter().partition(|p| p.multiplier > 0);

    let mut out = Table::new(starting.iter().map(|p| pick_row(p, bootstrap))).to_string();
    out.push('\n');
    if !bench.is_empty() {
        out.push_str("Bench\n");
        out.push_str(&Table::new(bench.iter().map(|p| pick_row(p, bootstrap))).to_string());
        out.push('\n');
    }
    let total: f64 = picks.iter().map(|p| p.xp * f64::from(p.multiplier)).sum();
    out.push_str(&format!("Projected: {total:.2}\n"));
    out
}

pub fn render_ranking(ranked: &[RankedPlayer], bootstrap: &Bootstrap) -> String {
    let rows = ranked.iter().enumerate().map(|(i, r)| RankRow {
        rank: i + 1,
        name: r.web_name.clone(),
        position: r.position.label(),
        club: club(bootstrap, r.team),
        cost: price(r.cost),
        xp: format!("{:.2}", r.xp),
    });
    let mut out = Table::new(rows).to_string();
    out.push('\n');
    out
}

pub fn render_deadlines(events: &[&Event]) -> String {
    if events.is_empty() {
        return "No upcoming deadlines.\n".to_string();
    }
    let rows = events.iter().map(|e| DeadlineRow {
        gameweek: e.id,
        deadline: e.deadline_time.format("%a %d %b %H:%M UTC").to_string(),
        name: e.name.clone(),
    });
    let mut out = Table::new(rows).to_string();
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use gaffer_core::fpl::{Player, PositionClass, Team};

    fn bootstrap() -> Bootstrap {
        let team = Team {
            id: 1,
            code: 3,
            name: "Arsenal".into(),
            short_name: "ARS".into(),
            strength_overall_home: 1300,
            strength_overall_away: 1300,
            strength_attack_home: 1300,
            strength_attack_away: 1300,
            strength_defence_home: 1300,
            strength_defence_away: 1300,
        };
        let mut keeper = Player::new(1, PositionClass::Goalkeeper, 1, 55);
        keeper.web_name = "Raya".into();
        let mut winger = Player::new(2, PositionClass::Midfielder, 1, 105);
        winger.web_name = "Saka".into();
        let mut spare = Player::new(3, PositionClass::Goalkeeper, 1, 40);
        spare.web_name = "Neto".into();
        Bootstrap {
            events: vec![],
            teams: vec![team],
            elements: vec![keeper, winger, spare],
        }
    }

    fn pick(element: u32, position: u8, multiplier: u8, xp: f64) -> Pick {
        Pick {
            element,
            position,
            multiplier,
            is_captain: multiplier == 2,
            is_vice_captain: false,
            xp,
        }
    }

    fn line_with<'a>(text: &'a str, needle: &str) -> &'a str {
        text.lines()
            .find(|l| l.contains(needle))
            .unwrap_or_else(|| panic!("no line containing {needle:?} in:\n{text}"))
    }

    #[test]
    fn picks_table_marks_captain_and_bench() {
        let picks = vec![
            pick(1, 1, 1, 4.0),
            pick(2, 2, 2, 6.5),
            pick(3, 3, 0, 1.0),
        ];
        let text = render_picks(&picks, &bootstrap());

        let raya = line_with(&text, "Raya");
        assert!(raya.contains("GK") && raya.contains("5.5") && raya.contains("4.00"));
        assert!(line_with(&text, "Saka").contains("(C)"));

        let bench_at = text.find("Bench").unwrap();
        assert!(text.find("Saka").unwrap() < bench_at);
        assert!(text.find("Neto").unwrap() > bench_at);
        // 4.0 + 2 * 6.5, bench excluded
        assert!(text.ends_with("Projected: 17.00\n"));
    }

    #[test]
    fn squad_without_bench_has_no_bench_table() {
        let text = render_picks(&[pick(1, 1, 1, 2.0)], &bootstrap());
        assert!(!text.contains("Bench"));
        assert!(text.ends_with("Projected: 2.00\n"));
    }

    #[test]
    fn unknown_player_renders_placeholder() {
        let text = render_picks(&[pick(99, 1, 1, 0.0)], &bootstrap());
        assert!(line_with(&text, "0.00").contains('?'));
    }

    #[test]
    fn ranking_numbers_rows() {
        let ranked = vec![RankedPlayer {
            id: 2,
            web_name: "Saka".into(),
            position: PositionClass::Midfielder,
            team: 1,
            cost: 105,
            xp: 6.25,
        }];
        let text = render_ranking(&ranked, &bootstrap());
        let header = line_with(&text, "Player");
        assert!(header.contains("Pos") && header.contains("xP"));
        let row = line_with(&text, "Saka");
        assert!(row.contains("| 1 "), "{row}");
        assert!(row.contains("MID") && row.contains("ARS") && row.contains("10.5"));
        assert!(row.contains("6.25"));
    }

    #[test]
    fn deadlines_list() {
        let event = Event {
            id: 5,
            name: "Gameweek 5".into(),
            deadline_time: Utc.with_ymd_and_hms(2024, 9, 21, 10, 0, 0).unwrap(),
            finished: false,
            is_current: false,
            is_next: true,
        };
        let text = render_deadlines(&[&event]);
        let row = line_with(&text, "Gameweek 5");
        assert!(row.contains("| 5 ") && row.contains("Sat 21 Sep 10:00 UTC"), "{row}");
        assert_eq!(render_deadlines(&[]), "No upcoming deadlines.\n");
    }
}

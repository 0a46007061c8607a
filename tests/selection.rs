use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;

use lanka_xi::activity::ActivePlayers;
use lanka_xi::dataset::ScoreRecord;
use lanka_xi::roster::{PlayerRoster, RoleTag};
use lanka_xi::scoring::{PerformanceLabel, label_for_score};
use lanka_xi::selection::{
    PlayerRatings, SQUAD_SIZE, SelectionStep, compare_match_ids, latest_scores, select_best_xi,
};

fn roster(pairs: &[(&str, RoleTag)]) -> PlayerRoster {
    PlayerRoster::from_pairs(pairs.iter().map(|(p, r)| (p.to_string(), *r)))
}

fn all_active(roster: &PlayerRoster) -> ActivePlayers {
    ActivePlayers {
        players: roster.players().map(str::to_string).collect(),
        latest_date: None,
        cutoff_date: None,
        roster_fallback: false,
    }
}

fn scores(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(p, s)| (p.to_string(), *s)).collect()
}

fn record(player: &str, match_id: &str, date: (i32, u32, u32), score: f64) -> ScoreRecord {
    ScoreRecord {
        player: player.to_string(),
        match_id: match_id.to_string(),
        match_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        performance_score: score,
        performance_label: label_for_score(score),
    }
}

#[test]
fn top_two_openers_take_the_opening_slots() {
    let roster = roster(&[
        ("A", RoleTag::Opener),
        ("B", RoleTag::Opener),
        ("C", RoleTag::Opener),
        ("D", RoleTag::MiddleOrder),
    ]);
    let ratings = PlayerRatings {
        batting: scores(&[("A", 90.0), ("B", 80.0), ("C", 70.0), ("D", 60.0)]),
        bowling: HashMap::new(),
    };
    let squad = select_best_xi(&ratings, &roster, &all_active(&roster));

    assert_eq!(squad.players(), vec!["A", "B", "D", "C"]);
    assert_eq!(squad.entries[0].step, SelectionStep::Openers);
    assert_eq!(squad.entries[1].step, SelectionStep::Openers);
    assert_eq!(squad.entries[2].step, SelectionStep::MiddleOrder);
    assert_eq!(squad.entries[3].step, SelectionStep::BestRemaining);
    // Short pool is a short squad, not an error.
    assert_eq!(squad.len(), 4);
    assert!(!squad.is_full());
}

#[test]
fn spin_allrounder_is_not_picked_twice() {
    let roster = roster(&[
        ("X", RoleTag::AllrounderSpin),
        ("Y", RoleTag::Allrounder),
        ("S", RoleTag::Spinner),
    ]);
    let ratings = PlayerRatings {
        batting: scores(&[("X", 50.0), ("Y", 40.0)]),
        bowling: scores(&[("X", 90.0), ("Y", 40.0), ("S", 10.0)]),
    };
    let squad = select_best_xi(&ratings, &roster, &all_active(&roster));

    assert_eq!(squad.players(), vec!["X", "Y", "S"]);
    assert_eq!(squad.entries[0].step, SelectionStep::Allrounders);
    assert_eq!(squad.entries[2].step, SelectionStep::Spinner);
}

#[test]
fn ties_break_on_player_name() {
    let roster = roster(&[
        ("Zed", RoleTag::Opener),
        ("Amy", RoleTag::OpenerWk),
        ("Bea", RoleTag::Opener),
    ]);
    let ratings = PlayerRatings {
        batting: scores(&[("Zed", 50.0), ("Amy", 50.0), ("Bea", 50.0)]),
        bowling: HashMap::new(),
    };
    let squad = select_best_xi(&ratings, &roster, &all_active(&roster));
    assert_eq!(squad.players(), vec!["Amy", "Bea", "Zed"]);
}

#[test]
fn inactive_and_unrostered_players_are_skipped() {
    let roster = roster(&[("A", RoleTag::Opener), ("B", RoleTag::Opener), ("P", RoleTag::Pacer)]);
    let ratings = PlayerRatings {
        batting: scores(&[("A", 99.0), ("B", 10.0), ("Ghost", 100.0)]),
        bowling: scores(&[("Ghost", 100.0)]),
    };
    let active = ActivePlayers {
        players: ["B", "P", "Ghost"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
        latest_date: None,
        cutoff_date: None,
        roster_fallback: false,
    };
    let squad = select_best_xi(&ratings, &roster, &active);
    assert_eq!(squad.players(), vec!["B", "P"]);
    // Missing discipline scores count as zero.
    assert_eq!(squad.entries[1].batting_score, 0.0);
    assert_eq!(squad.entries[1].bowling_score, 0.0);
}

#[test]
fn full_roster_fills_eleven_distinct_slots() {
    let roster = PlayerRoster::sri_lanka();
    let mut batting = HashMap::new();
    let mut bowling = HashMap::new();
    for (idx, (player, _)) in roster.iter().enumerate() {
        batting.insert(player.to_string(), 20.0 + idx as f64 * 3.0);
        bowling.insert(player.to_string(), 80.0 - idx as f64 * 2.0);
    }
    let ratings = PlayerRatings { batting, bowling };
    let squad = select_best_xi(&ratings, roster, &all_active(roster));

    assert_eq!(squad.len(), SQUAD_SIZE);
    let unique = squad.players().into_iter().collect::<HashSet<_>>();
    assert_eq!(unique.len(), SQUAD_SIZE);

    let count = |step: SelectionStep| squad.entries.iter().filter(|e| e.step == step).count();
    assert_eq!(count(SelectionStep::Openers), 2);
    assert_eq!(count(SelectionStep::MiddleOrder), 3);
    assert_eq!(count(SelectionStep::Allrounders), 2);
    assert_eq!(count(SelectionStep::Spinner), 1);
    assert_eq!(count(SelectionStep::Pacers), 3);
    assert_eq!(count(SelectionStep::BestRemaining), 0);

    for e in &squad.entries {
        assert_eq!(Some(e.role), roster.role(&e.player));
    }
}

#[test]
fn fill_step_tops_up_when_buckets_run_dry() {
    let mut pairs = vec![("O1", RoleTag::Opener)];
    let names = (0..14).map(|i| format!("AR{i:02}")).collect::<Vec<_>>();
    pairs.extend(names.iter().map(|n| (n.as_str(), RoleTag::Allrounder)));
    let roster = roster(&pairs);
    let ratings = PlayerRatings {
        batting: names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i as f64))
            .collect(),
        bowling: HashMap::new(),
    };
    let squad = select_best_xi(&ratings, &roster, &all_active(&roster));

    assert_eq!(squad.len(), SQUAD_SIZE);
    assert_eq!(squad.entries[0].player, "O1");
    assert_eq!(squad.entries[1].player, "AR13");
    assert_eq!(squad.entries[2].player, "AR12");
    assert_eq!(squad.entries[3].step, SelectionStep::BestRemaining);
    assert_eq!(squad.entries[10].player, "AR04");
}

#[test]
fn latest_match_supplies_the_rating() {
    let rows = vec![
        record("A", "1", (2023, 6, 1), 20.0),
        record("A", "0", (2023, 1, 1), 90.0),
        record("B", "100", (2023, 3, 3), 5.0),
        record("B", "101", (2023, 3, 3), 7.0),
        record("B", "099", (2023, 3, 3), 1.0),
    ];
    let latest = latest_scores(&rows);
    assert_eq!(latest.get("A"), Some(&20.0));
    assert_eq!(latest.get("B"), Some(&7.0));

    let ratings = PlayerRatings::from_latest(&rows, &Vec::<ScoreRecord>::new());
    assert_eq!(ratings.bowling("A"), 0.0);
    assert_eq!(ratings.combined("A"), 20.0);
    assert_eq!(rows[0].performance_label, PerformanceLabel::Poor);
}

#[test]
fn same_day_numeric_match_ids_compare_by_value() {
    let rows = vec![
        record("C", "10", (2024, 2, 2), 40.0),
        record("C", "9", (2024, 2, 2), 15.0),
    ];
    assert_eq!(latest_scores(&rows).get("C"), Some(&40.0));

    assert_eq!(compare_match_ids("9", "10"), std::cmp::Ordering::Less);
    assert_eq!(compare_match_ids("b", "a"), std::cmp::Ordering::Greater);
    assert_eq!(compare_match_ids("9", "10a"), std::cmp::Ordering::Greater);
}

use chrono::NaiveDate;

use lanka_xi::activity::active_players;
use lanka_xi::roster::{PlayerRoster, RoleTag};
use lanka_xi::stats::{BattingMatchRow, BowlingMatchRow};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bat(player: &str, match_date: NaiveDate) -> BattingMatchRow {
    BattingMatchRow {
        player: player.to_string(),
        match_id: format!("{player}-{match_date}"),
        match_date,
        runs_scored: 10,
        balls_faced: 10,
        strike_rate: 100.0,
        boundaries: 1,
        dot_ball_pct: 0.4,
        dismissed: 0,
    }
}

fn bowl(player: &str, match_date: NaiveDate) -> BowlingMatchRow {
    BowlingMatchRow {
        player: player.to_string(),
        match_id: format!("{player}-{match_date}"),
        match_date,
        wickets_taken: 1,
        runs_conceded: 30,
        overs_bowled: 4.0,
        economy_rate: 7.5,
        bowling_strike_rate: 24.0,
        dot_ball_pct: 0.35,
    }
}

#[test]
fn cutoff_is_inclusive_at_365_days() {
    // Latest date comes from the bowling side.
    let batting = vec![bat("Edge", date(2023, 1, 1)), bat("Stale", date(2022, 12, 31))];
    let bowling = vec![bowl("Recent", date(2024, 1, 1))];
    let active = active_players(&batting, &bowling, PlayerRoster::sri_lanka());

    assert_eq!(active.latest_date, Some(date(2024, 1, 1)));
    assert_eq!(active.cutoff_date, Some(date(2023, 1, 1)));
    assert!(active.contains("Edge"));
    assert!(active.contains("Recent"));
    assert!(!active.contains("Stale"));
    assert!(!active.roster_fallback);
}

#[test]
fn any_recent_row_in_either_discipline_counts() {
    let batting = vec![
        bat("Batter", date(2020, 5, 5)),
        bat("Batter", date(2024, 3, 1)),
        bat("OnlyOld", date(2021, 1, 1)),
    ];
    let bowling = vec![bowl("OnlyOld", date(2023, 6, 1)), bowl("Bowler", date(2023, 4, 1))];
    let active = active_players(&batting, &bowling, PlayerRoster::sri_lanka());
    assert_eq!(active.len(), 3);
    assert!(active.contains("OnlyOld"));
}

#[test]
fn empty_batting_falls_back_to_whole_roster() {
    let roster = PlayerRoster::from_pairs([
        ("A".to_string(), RoleTag::Opener),
        ("B".to_string(), RoleTag::Pacer),
    ]);
    let bowling = vec![bowl("Someone Else", date(2024, 1, 1))];
    let active = active_players(&Vec::<BattingMatchRow>::new(), &bowling, &roster);

    assert!(active.roster_fallback);
    assert_eq!(active.cutoff_date, None);
    assert_eq!(active.len(), 2);
    assert!(active.contains("A") && active.contains("B"));
    assert!(!active.contains("Someone Else"));
}

use chrono::NaiveDate;

use lanka_xi::form::{BattingForm, BattingFormRow, BowlingForm};
use lanka_xi::scoring::{
    BattingScoreInputs, BowlingScoreInputs, PerformanceLabel, ScoredRow, batting_score,
    bowling_score, label_for_score,
};
use lanka_xi::stats::BattingMatchRow;

fn empty_batting_form() -> BattingForm {
    BattingForm {
        form_runs_10: None,
        form_sr_10: None,
        form_boundaries_10: None,
        form_dot_pct_10: None,
        form_dismissals_10: None,
        consistency_score: None,
        matches_played_total: 1,
        recent_50s: None,
    }
}

fn empty_bowling_form() -> BowlingForm {
    BowlingForm {
        form_wickets_10: None,
        form_economy_10: None,
        form_sr_bowl_10: None,
        form_dot_pct_bowl_10: None,
        form_maidens_10: 0.0,
        consistency_wickets: None,
        matches_played_total: 1,
        recent_3fers: None,
    }
}

#[test]
fn batting_score_is_not_clipped_above_100() {
    let score = batting_score(&BattingScoreInputs {
        runs10: 100.0,
        sr10: 300.0,
        boundaries10: 8.0,
        dot_pct10: 0.0,
    });
    assert!((score - 170.0).abs() < 1e-9);
    assert_eq!(label_for_score(score), PerformanceLabel::Excellent);
}

#[test]
fn batting_score_can_go_negative() {
    let score = batting_score(&BattingScoreInputs {
        runs10: -20.0,
        sr10: 0.0,
        boundaries10: 0.0,
        dot_pct10: 1.0,
    });
    assert!((score - -16.0).abs() < 1e-9);
}

#[test]
fn bowling_terms_are_capped_at_one() {
    let wild = bowling_score(&BowlingScoreInputs {
        wickets10: 0.0,
        economy10: 50.0,
        sr_bowl10: 1000.0,
    });
    assert!(wild.abs() < 1e-9);

    let solid = bowling_score(&BowlingScoreInputs {
        wickets10: 3.0,
        economy10: 6.0,
        sr_bowl10: 12.0,
    });
    assert!((solid - 70.0).abs() < 1e-9);
    assert_eq!(label_for_score(solid), PerformanceLabel::Good);
}

#[test]
fn scores_are_rounded_to_two_decimals() {
    let score = batting_score(&BattingScoreInputs {
        runs10: 100.0 / 3.0,
        sr10: 0.0,
        boundaries10: 0.0,
        dot_pct10: 1.0,
    });
    // 40 * (100/3) / 50 = 26.666..
    assert!((score - 26.67).abs() < 1e-9);
}

#[test]
fn missing_form_is_scored_as_zero() {
    let bat = BattingScoreInputs::from_form(&empty_batting_form());
    assert_eq!(bat, BattingScoreInputs::default());
    // Only the dot-ball term survives: 10 * (1 - 0).
    assert!((batting_score(&bat) - 10.0).abs() < 1e-9);

    let bowl = BowlingScoreInputs::from_form(&empty_bowling_form());
    assert_eq!(bowl, BowlingScoreInputs::default());
    assert!((bowling_score(&bowl) - 60.0).abs() < 1e-9);
}

#[test]
fn scored_row_carries_score_and_label() {
    let row = BattingFormRow {
        stats: BattingMatchRow {
            player: "PHKD Mendis".to_string(),
            match_id: "9".to_string(),
            match_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            runs_scored: 40,
            balls_faced: 30,
            strike_rate: 133.33,
            boundaries: 4,
            dot_ball_pct: 0.3,
            dismissed: 1,
        },
        form: BattingForm {
            form_runs_10: Some(50.0),
            form_sr_10: Some(150.0),
            form_boundaries_10: Some(8.0),
            form_dot_pct_10: Some(0.5),
            ..empty_batting_form()
        },
    };
    let scored = ScoredRow::new(row);
    // 40 + 30 + 20 + 5
    assert!((scored.performance_score - 95.0).abs() < 1e-9);
    assert_eq!(scored.performance_label, PerformanceLabel::Excellent);
}

#[test]
fn label_boundaries_are_inclusive_at_lower_edge() {
    assert_eq!(label_for_score(75.00), PerformanceLabel::Excellent);
    assert_eq!(label_for_score(74.99), PerformanceLabel::Good);
    assert_eq!(label_for_score(25.00), PerformanceLabel::Average);
    assert_eq!(label_for_score(24.99), PerformanceLabel::Poor);
}

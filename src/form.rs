use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::rolling::{rolling_count, rolling_mean, rolling_std};
use crate::stats::{BattingMatchRow, BowlingMatchRow, MatchRow, sort_chronologically};

pub const BATTING_FEATURE_COLUMNS: [&str; 8] = [
    "form_runs_10",
    "form_sr_10",
    "form_boundaries_10",
    "form_dot_pct_10",
    "form_dismissals_10",
    "consistency_score",
    "matches_played_total",
    "recent_50s",
];

pub const BOWLING_FEATURE_COLUMNS: [&str; 8] = [
    "form_wickets_10",
    "form_economy_10",
    "form_sr_bowl_10",
    "form_dot_pct_bowl_10",
    "form_maidens_10",
    "consistency_wickets",
    "recent_3fers",
    "matches_played_total",
];

pub const FIFTY_RUNS: i32 = 50;
pub const THREE_WICKETS: i32 = 3;

/// `None` means the window had fewer than three matches ("unknown form").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingForm {
    pub form_runs_10: Option<f64>,
    pub form_sr_10: Option<f64>,
    pub form_boundaries_10: Option<f64>,
    pub form_dot_pct_10: Option<f64>,
    pub form_dismissals_10: Option<f64>,
    pub consistency_score: Option<f64>,
    pub matches_played_total: u32,
    pub recent_50s: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlingForm {
    pub form_wickets_10: Option<f64>,
    pub form_economy_10: Option<f64>,
    pub form_sr_bowl_10: Option<f64>,
    pub form_dot_pct_bowl_10: Option<f64>,
    /// Maiden overs are not present in the per-match extraction, so this is
    /// a constant 0.0 placeholder and carries no signal.
    pub form_maidens_10: f64,
    pub consistency_wickets: Option<f64>,
    pub matches_played_total: u32,
    pub recent_3fers: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingFormRow {
    pub stats: BattingMatchRow,
    pub form: BattingForm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlingFormRow {
    pub stats: BowlingMatchRow,
    pub form: BowlingForm,
}

impl MatchRow for BattingFormRow {
    fn player(&self) -> &str {
        &self.stats.player
    }

    fn match_id(&self) -> &str {
        &self.stats.match_id
    }

    fn match_date(&self) -> NaiveDate {
        self.stats.match_date
    }
}

impl MatchRow for BowlingFormRow {
    fn player(&self) -> &str {
        &self.stats.player
    }

    fn match_id(&self) -> &str {
        &self.stats.match_id
    }

    fn match_date(&self) -> NaiveDate {
        self.stats.match_date
    }
}

pub fn compute_batting_form(rows: Vec<BattingMatchRow>) -> Vec<BattingFormRow> {
    let out = compute_per_player(rows, batting_form_for_player);
    info!(rows = out.len(), "computed batting form features");
    out
}

pub fn compute_bowling_form(rows: Vec<BowlingMatchRow>) -> Vec<BowlingFormRow> {
    let out = compute_per_player(rows, bowling_form_for_player);
    info!(rows = out.len(), "computed bowling form features");
    out
}

/// Sorts by (player, match_date), splits into per-player runs and computes
/// each run independently. Players are processed in parallel; the output
/// keeps the sorted order.
fn compute_per_player<T, U, F>(mut rows: Vec<T>, per_player: F) -> Vec<U>
where
    T: MatchRow + Sync,
    U: Send,
    F: Fn(&[T]) -> Vec<U> + Sync,
{
    sort_chronologically(&mut rows);
    let groups = rows
        .chunk_by(|a, b| a.player() == b.player())
        .collect::<Vec<_>>();
    groups
        .into_par_iter()
        .map(|group| per_player(group))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

fn column<T>(rows: &[T], f: impl Fn(&T) -> f64) -> Vec<f64> {
    rows.iter().map(f).collect()
}

fn batting_form_for_player(rows: &[BattingMatchRow]) -> Vec<BattingFormRow> {
    let runs = column(rows, |r| f64::from(r.runs_scored));
    let form_runs = rolling_mean(&runs);
    let form_sr = rolling_mean(&column(rows, |r| r.strike_rate));
    let form_boundaries = rolling_mean(&column(rows, |r| f64::from(r.boundaries)));
    let form_dot_pct = rolling_mean(&column(rows, |r| r.dot_ball_pct));
    let form_dismissals = rolling_mean(&column(rows, |r| f64::from(r.dismissed)));
    let consistency = rolling_std(&runs);
    let fifties = rolling_count(
        &rows
            .iter()
            .map(|r| r.runs_scored >= FIFTY_RUNS)
            .collect::<Vec<_>>(),
    );

    rows.iter()
        .enumerate()
        .map(|(idx, row)| BattingFormRow {
            stats: row.clone(),
            form: BattingForm {
                form_runs_10: form_runs[idx],
                form_sr_10: form_sr[idx],
                form_boundaries_10: form_boundaries[idx],
                form_dot_pct_10: form_dot_pct[idx],
                form_dismissals_10: form_dismissals[idx],
                consistency_score: consistency[idx],
                matches_played_total: (idx + 1) as u32,
                recent_50s: fifties[idx],
            },
        })
        .collect()
}

fn bowling_form_for_player(rows: &[BowlingMatchRow]) -> Vec<BowlingFormRow> {
    let wickets = column(rows, |r| f64::from(r.wickets_taken));
    let form_wickets = rolling_mean(&wickets);
    let form_economy = rolling_mean(&column(rows, |r| r.economy_rate));
    let form_sr_bowl = rolling_mean(&column(rows, |r| r.bowling_strike_rate));
    let form_dot_pct = rolling_mean(&column(rows, |r| r.dot_ball_pct));
    let consistency = rolling_std(&wickets);
    let three_fers = rolling_count(
        &rows
            .iter()
            .map(|r| r.wickets_taken >= THREE_WICKETS)
            .collect::<Vec<_>>(),
    );

    rows.iter()
        .enumerate()
        .map(|(idx, row)| BowlingFormRow {
            stats: row.clone(),
            form: BowlingForm {
                form_wickets_10: form_wickets[idx],
                form_economy_10: form_economy[idx],
                form_sr_bowl_10: form_sr_bowl[idx],
                form_dot_pct_bowl_10: form_dot_pct[idx],
                form_maidens_10: 0.0,
                consistency_wickets: consistency[idx],
                matches_played_total: (idx + 1) as u32,
                recent_3fers: three_fers[idx],
            },
        })
        .collect()
}

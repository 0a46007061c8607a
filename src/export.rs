use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::combined::CombinedMatchRow;
use crate::form::{BATTING_FEATURE_COLUMNS, BOWLING_FEATURE_COLUMNS, BattingFormRow, BowlingFormRow};
use crate::scoring::ScoredRow;
use crate::selection::{PlayerRatings, Squad};

pub const BATTING_FORM_FILE: &str = "batting_form_features.csv";
pub const BOWLING_FORM_FILE: &str = "bowling_form_features.csv";
pub const BATTING_LABELED_FILE: &str = "player_labeled_batting.csv";
pub const BOWLING_LABELED_FILE: &str = "player_labeled_bowling.csv";
pub const COMBINED_FILE: &str = "player_combined_performance.csv";

/// A row that can be laid out as one line of a flat table.
pub trait TableRow {
    fn header() -> Vec<String>;
    fn cells(&self) -> Vec<String>;
}

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_count(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn with_features(base: &[&str], features: &[&str]) -> Vec<String> {
    base.iter()
        .chain(features.iter())
        .map(|s| s.to_string())
        .collect()
}

impl TableRow for BattingFormRow {
    fn header() -> Vec<String> {
        with_features(
            &[
                "player",
                "match_id",
                "match_date",
                "runs_scored",
                "balls_faced",
                "strike_rate",
                "boundaries",
                "dot_ball_pct",
                "dismissed",
            ],
            &BATTING_FEATURE_COLUMNS,
        )
    }

    fn cells(&self) -> Vec<String> {
        let s = &self.stats;
        let f = &self.form;
        vec![
            s.player.clone(),
            s.match_id.clone(),
            s.match_date.format("%Y-%m-%d").to_string(),
            s.runs_scored.to_string(),
            s.balls_faced.to_string(),
            s.strike_rate.to_string(),
            s.boundaries.to_string(),
            s.dot_ball_pct.to_string(),
            s.dismissed.to_string(),
            opt(f.form_runs_10),
            opt(f.form_sr_10),
            opt(f.form_boundaries_10),
            opt(f.form_dot_pct_10),
            opt(f.form_dismissals_10),
            opt(f.consistency_score),
            f.matches_played_total.to_string(),
            opt_count(f.recent_50s),
        ]
    }
}

impl TableRow for BowlingFormRow {
    fn header() -> Vec<String> {
        with_features(
            &[
                "player",
                "match_id",
                "match_date",
                "wickets_taken",
                "runs_conceded",
                "overs_bowled",
                "economy_rate",
                "bowling_strike_rate",
                "dot_ball_pct",
            ],
            &BOWLING_FEATURE_COLUMNS,
        )
    }

    fn cells(&self) -> Vec<String> {
        let s = &self.stats;
        let f = &self.form;
        vec![
            s.player.clone(),
            s.match_id.clone(),
            s.match_date.format("%Y-%m-%d").to_string(),
            s.wickets_taken.to_string(),
            s.runs_conceded.to_string(),
            s.overs_bowled.to_string(),
            s.economy_rate.to_string(),
            s.bowling_strike_rate.to_string(),
            s.dot_ball_pct.to_string(),
            opt(f.form_wickets_10),
            opt(f.form_economy_10),
            opt(f.form_sr_bowl_10),
            opt(f.form_dot_pct_bowl_10),
            f.form_maidens_10.to_string(),
            opt(f.consistency_wickets),
            opt_count(f.recent_3fers),
            f.matches_played_total.to_string(),
        ]
    }
}

impl<R: TableRow> TableRow for ScoredRow<R> {
    fn header() -> Vec<String> {
        let mut out = R::header();
        out.push("performance_score".to_string());
        out.push("performance_label".to_string());
        out
    }

    fn cells(&self) -> Vec<String> {
        let mut out = self.row.cells();
        out.push(format!("{:.2}", self.performance_score));
        out.push(self.performance_label.to_string());
        out
    }
}

impl TableRow for CombinedMatchRow {
    fn header() -> Vec<String> {
        [
            "player",
            "match_id",
            "match_date",
            "performance_score_bat",
            "performance_score_bowl",
            "batted",
            "bowled",
            "performance_score",
            "performance_label",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.player.clone(),
            self.match_id.clone(),
            self.match_date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", self.batting_score),
            format!("{:.2}", self.bowling_score),
            u8::from(self.batted).to_string(),
            u8::from(self.bowled).to_string(),
            format!("{:.2}", self.performance_score),
            self.performance_label.to_string(),
        ]
    }
}

/// Missing form values are written as empty cells.
pub fn write_csv_table<T: TableRow>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    writer
        .write_record(T::header())
        .with_context(|| format!("write header to {}", path.display()))?;
    for row in rows {
        writer
            .write_record(row.cells())
            .with_context(|| format!("write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

pub fn export_squad_xlsx(path: &Path, squad: &Squad, ratings: &PlayerRatings) -> Result<()> {
    let mut squad_rows = vec![vec![
        "#".to_string(),
        "Player".to_string(),
        "Role".to_string(),
        "Picked As".to_string(),
        "Batting Score".to_string(),
        "Bowling Score".to_string(),
    ]];
    for (idx, e) in squad.entries.iter().enumerate() {
        squad_rows.push(vec![
            (idx + 1).to_string(),
            e.player.clone(),
            e.role.to_string(),
            e.step.as_str().to_string(),
            format!("{:.2}", e.batting_score),
            format!("{:.2}", e.bowling_score),
        ]);
    }

    let mut players = ratings
        .batting
        .keys()
        .chain(ratings.bowling.keys())
        .map(|p| p.as_str())
        .collect::<Vec<_>>();
    players.sort_unstable();
    players.dedup();

    let mut rating_rows = vec![vec![
        "Player".to_string(),
        "Latest Batting".to_string(),
        "Latest Bowling".to_string(),
        "Combined".to_string(),
    ]];
    for player in players {
        rating_rows.push(vec![
            player.to_string(),
            format!("{:.2}", ratings.batting(player)),
            format!("{:.2}", ratings.bowling(player)),
            format!("{:.2}", ratings.combined(player)),
        ]);
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Squad").context("name squad sheet")?;
    write_rows(sheet, &squad_rows)?;
    let sheet = workbook.add_worksheet();
    sheet.set_name("Ratings").context("name ratings sheet")?;
    write_rows(sheet, &rating_rows)?;

    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

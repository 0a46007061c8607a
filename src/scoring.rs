use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::form::{BattingForm, BattingFormRow, BowlingForm, BowlingFormRow};
use crate::stats::MatchRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerformanceLabel {
    Excellent,
    Good,
    Average,
    Poor,
}

impl PerformanceLabel {
    pub const ALL: [PerformanceLabel; 4] = [
        PerformanceLabel::Excellent,
        PerformanceLabel::Good,
        PerformanceLabel::Average,
        PerformanceLabel::Poor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PerformanceLabel::Excellent => "Excellent",
            PerformanceLabel::Good => "Good",
            PerformanceLabel::Average => "Average",
            PerformanceLabel::Poor => "Poor",
        }
    }
}

impl fmt::Display for PerformanceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerformanceLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PerformanceLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == s.trim())
            .ok_or_else(|| format!("unknown performance label '{s}'"))
    }
}

/// Shared by both disciplines (and the merged view). Lower edges are inclusive.
pub fn label_for_score(score: f64) -> PerformanceLabel {
    if score >= 75.0 {
        PerformanceLabel::Excellent
    } else if score >= 50.0 {
        PerformanceLabel::Good
    } else if score >= 25.0 {
        PerformanceLabel::Average
    } else {
        PerformanceLabel::Poor
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Missing form is scored as zero. Early-career rows therefore lean "Poor".
fn missing_as_zero(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BattingScoreInputs {
    pub runs10: f64,
    pub sr10: f64,
    pub boundaries10: f64,
    pub dot_pct10: f64,
}

impl BattingScoreInputs {
    pub fn from_form(form: &BattingForm) -> Self {
        Self {
            runs10: missing_as_zero(form.form_runs_10),
            sr10: missing_as_zero(form.form_sr_10),
            boundaries10: missing_as_zero(form.form_boundaries_10),
            dot_pct10: missing_as_zero(form.form_dot_pct_10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BowlingScoreInputs {
    pub wickets10: f64,
    pub economy10: f64,
    pub sr_bowl10: f64,
}

impl BowlingScoreInputs {
    pub fn from_form(form: &BowlingForm) -> Self {
        Self {
            wickets10: missing_as_zero(form.form_wickets_10),
            economy10: missing_as_zero(form.form_economy_10),
            sr_bowl10: missing_as_zero(form.form_sr_bowl_10),
        }
    }
}

// Benchmarks: 50 runs, strike rate 150, 8 boundaries per innings.
// Not clamped; strong form scores above 100.
pub fn batting_score(x: &BattingScoreInputs) -> f64 {
    let score = 0.40 * x.runs10 / 50.0
        + 0.30 * x.sr10 / 150.0
        + 0.20 * x.boundaries10 / 8.0
        + 0.10 * (1.0 - x.dot_pct10);
    round2(score * 100.0)
}

// Benchmarks: 3 wickets, economy 12 and strike rate 24 as the zero points.
// Economy and strike-rate terms are each capped at 1 before weighting.
pub fn bowling_score(x: &BowlingScoreInputs) -> f64 {
    let score = 0.40 * x.wickets10 / 3.0
        + 0.35 * (1.0 - (x.economy10 / 12.0).min(1.0))
        + 0.25 * (1.0 - (x.sr_bowl10 / 24.0).min(1.0));
    round2(score * 100.0)
}

pub trait Scorable {
    fn performance_score(&self) -> f64;
}

impl Scorable for BattingFormRow {
    fn performance_score(&self) -> f64 {
        batting_score(&BattingScoreInputs::from_form(&self.form))
    }
}

impl Scorable for BowlingFormRow {
    fn performance_score(&self) -> f64 {
        bowling_score(&BowlingScoreInputs::from_form(&self.form))
    }
}

/// Anything carrying a finished performance score for one player-match.
pub trait Rated: MatchRow {
    fn score(&self) -> f64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRow<R> {
    pub row: R,
    pub performance_score: f64,
    pub performance_label: PerformanceLabel,
}

impl<R: Scorable> ScoredRow<R> {
    pub fn new(row: R) -> Self {
        let performance_score = row.performance_score();
        Self {
            row,
            performance_score,
            performance_label: label_for_score(performance_score),
        }
    }
}

impl<R: MatchRow> MatchRow for ScoredRow<R> {
    fn player(&self) -> &str {
        self.row.player()
    }

    fn match_id(&self) -> &str {
        self.row.match_id()
    }

    fn match_date(&self) -> NaiveDate {
        self.row.match_date()
    }
}

impl<R: MatchRow> Rated for ScoredRow<R> {
    fn score(&self) -> f64 {
        self.performance_score
    }
}

pub type ScoredBattingRow = ScoredRow<BattingFormRow>;
pub type ScoredBowlingRow = ScoredRow<BowlingFormRow>;

pub fn score_rows<R: Scorable>(rows: Vec<R>) -> Vec<ScoredRow<R>> {
    rows.into_iter().map(ScoredRow::new).collect()
}

pub fn score_batting_rows(rows: Vec<BattingFormRow>) -> Vec<ScoredBattingRow> {
    let out = score_rows(rows);
    info!(distribution = %LabelDistribution::from_scored(&out), "scored batting rows");
    out
}

pub fn score_bowling_rows(rows: Vec<BowlingFormRow>) -> Vec<ScoredBowlingRow> {
    let out = score_rows(rows);
    info!(distribution = %LabelDistribution::from_scored(&out), "scored bowling rows");
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelDistribution {
    pub excellent: usize,
    pub good: usize,
    pub average: usize,
    pub poor: usize,
}

impl LabelDistribution {
    pub fn from_labels(labels: impl IntoIterator<Item = PerformanceLabel>) -> Self {
        let mut out = Self::default();
        for label in labels {
            *out.slot(label) += 1;
        }
        out
    }

    pub fn from_scored<R>(rows: &[ScoredRow<R>]) -> Self {
        Self::from_labels(rows.iter().map(|r| r.performance_label))
    }

    fn slot(&mut self, label: PerformanceLabel) -> &mut usize {
        match label {
            PerformanceLabel::Excellent => &mut self.excellent,
            PerformanceLabel::Good => &mut self.good,
            PerformanceLabel::Average => &mut self.average,
            PerformanceLabel::Poor => &mut self.poor,
        }
    }

    pub fn count(&self, label: PerformanceLabel) -> usize {
        match label {
            PerformanceLabel::Excellent => self.excellent,
            PerformanceLabel::Good => self.good,
            PerformanceLabel::Average => self.average,
            PerformanceLabel::Poor => self.poor,
        }
    }

    pub fn total(&self) -> usize {
        self.excellent + self.good + self.average + self.poor
    }

    /// Fraction of rows with this label; 0.0 for an empty collection.
    pub fn share(&self, label: PerformanceLabel) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(label) as f64 / total as f64
    }
}

impl fmt::Display for LabelDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = PerformanceLabel::ALL
            .iter()
            .map(|label| format!("{label}={:.3}", self.share(*label)))
            .collect::<Vec<_>>();
        write!(f, "{} (n={})", parts.join(" "), self.total())
    }
}

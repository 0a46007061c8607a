use std::collections::HashMap;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PipelineError, Result};

pub const BATTING_STATS_FILE: &str = "player_batting_stats.csv";
pub const BOWLING_STATS_FILE: &str = "player_bowling_stats.csv";

/// Identity and timing shared by every row-shaped value the pipeline passes
/// around (raw stats, feature rows, scored rows, stored score records).
pub trait MatchRow {
    fn player(&self) -> &str;
    fn match_id(&self) -> &str;
    fn match_date(&self) -> NaiveDate;
}

/// Columns a per-match CSV artifact must carry before any row is read.
pub trait StatSchema: MatchRow + DeserializeOwned {
    const ARTIFACT: &'static str;
    const REQUIRED_COLUMNS: &'static [&'static str];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingMatchRow {
    pub player: String,
    #[serde(deserialize_with = "de_match_id")]
    pub match_id: String,
    #[serde(with = "match_date_format")]
    pub match_date: NaiveDate,
    #[serde(deserialize_with = "de_count")]
    pub runs_scored: i32,
    #[serde(deserialize_with = "de_count")]
    pub balls_faced: i32,
    pub strike_rate: f64,
    #[serde(deserialize_with = "de_count")]
    pub boundaries: i32,
    pub dot_ball_pct: f64,
    #[serde(deserialize_with = "de_count")]
    pub dismissed: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlingMatchRow {
    pub player: String,
    #[serde(deserialize_with = "de_match_id")]
    pub match_id: String,
    #[serde(with = "match_date_format")]
    pub match_date: NaiveDate,
    #[serde(deserialize_with = "de_count")]
    pub wickets_taken: i32,
    #[serde(deserialize_with = "de_count")]
    pub runs_conceded: i32,
    pub overs_bowled: f64,
    pub economy_rate: f64,
    pub bowling_strike_rate: f64,
    pub dot_ball_pct: f64,
}

impl MatchRow for BattingMatchRow {
    fn player(&self) -> &str {
        &self.player
    }

    fn match_id(&self) -> &str {
        &self.match_id
    }

    fn match_date(&self) -> NaiveDate {
        self.match_date
    }
}

impl MatchRow for BowlingMatchRow {
    fn player(&self) -> &str {
        &self.player
    }

    fn match_id(&self) -> &str {
        &self.match_id
    }

    fn match_date(&self) -> NaiveDate {
        self.match_date
    }
}

impl StatSchema for BattingMatchRow {
    const ARTIFACT: &'static str = BATTING_STATS_FILE;
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "player",
        "match_id",
        "match_date",
        "runs_scored",
        "balls_faced",
        "strike_rate",
        "boundaries",
        "dot_ball_pct",
        "dismissed",
    ];
}

impl StatSchema for BowlingMatchRow {
    const ARTIFACT: &'static str = BOWLING_STATS_FILE;
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "player",
        "match_id",
        "match_date",
        "wickets_taken",
        "runs_conceded",
        "overs_bowled",
        "economy_rate",
        "bowling_strike_rate",
        "dot_ball_pct",
    ];
}

pub fn load_batting_rows(path: &Path) -> Result<Vec<BattingMatchRow>> {
    load_stat_rows(path)
}

pub fn load_bowling_rows(path: &Path) -> Result<Vec<BowlingMatchRow>> {
    load_stat_rows(path)
}

pub fn load_stat_rows<T: StatSchema>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(PipelineError::MissingArtifact {
            path: path.to_path_buf(),
            hint: "run the per-match stat extraction first",
        });
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    read_stat_rows(&mut reader)
}

/// Reads rows from any CSV source, checking the header against the schema
/// before the first record is decoded. A (player, match_id) pair may appear
/// only once.
pub fn read_stat_rows<T: StatSchema, R: std::io::Read>(
    reader: &mut csv::Reader<R>,
) -> Result<Vec<T>> {
    let headers = reader.headers()?.clone();
    let missing = T::REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns {
            artifact: T::ARTIFACT.to_string(),
            columns: missing,
        });
    }

    let mut out = Vec::new();
    let mut seen: HashMap<(String, String), u64> = HashMap::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row = record
            .deserialize::<T>(Some(&headers))
            .map_err(|err| PipelineError::InvalidRow {
                artifact: T::ARTIFACT.to_string(),
                line,
                message: err.to_string(),
            })?;
        let key = (row.player().to_string(), row.match_id().to_string());
        if let Some(first) = seen.insert(key, line) {
            return Err(PipelineError::InvalidRow {
                artifact: T::ARTIFACT.to_string(),
                line,
                message: format!(
                    "duplicate row for player '{}' match '{}' (first seen on line {first})",
                    row.player(),
                    row.match_id()
                ),
            });
        }
        out.push(row);
    }
    Ok(out)
}

/// Stable sort by (player, match_date). Same-day rows for a player keep the
/// order they arrived in.
pub fn sort_chronologically<T: MatchRow>(rows: &mut [T]) {
    rows.sort_by(|a, b| {
        a.player()
            .cmp(b.player())
            .then_with(|| a.match_date().cmp(&b.match_date()))
    });
}

pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|dt| dt.date())
}

pub mod match_date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    use super::parse_match_date;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_match_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid match_date '{raw}'")))
    }
}

// pandas writes integer columns that passed through a NaN fill as "12.0".
fn de_count<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i32, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i32>() {
        return Ok(n);
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| de::Error::custom(format!("invalid count '{raw}'")))?;
    if value.fract() != 0.0 || value.abs() > f64::from(i32::MAX) {
        return Err(de::Error::custom(format!("count is not a whole number: '{raw}'")));
    }
    Ok(value as i32)
}

fn de_match_id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(de::Error::custom("empty match_id"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_date_accepts_pandas_datetime_text() {
        let expected = NaiveDate::from_ymd_opt(2023, 7, 14);
        assert_eq!(parse_match_date("2023-07-14"), expected);
        assert_eq!(parse_match_date("2023-07-14 00:00:00"), expected);
        assert_eq!(parse_match_date("2023-07-14T00:00:00"), expected);
        assert_eq!(parse_match_date("14/07/2023"), None);
    }

    #[test]
    fn header_without_required_columns_is_rejected() {
        let raw = "player,match_id,match_date,runs_scored\nA,1,2023-01-01,10\n";
        let mut reader = csv::Reader::from_reader(raw.as_bytes());
        let err = read_stat_rows::<BattingMatchRow, _>(&mut reader).unwrap_err();
        match err {
            PipelineError::MissingColumns { columns, .. } => {
                assert!(columns.contains(&"strike_rate".to_string()));
                assert!(columns.contains(&"dismissed".to_string()));
                assert!(!columns.contains(&"runs_scored".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn float_formatted_counts_are_read_as_integers() {
        let raw = "match_id,match_date,player,wickets_taken,runs_conceded,overs_bowled,economy_rate,bowling_strike_rate,dot_ball_pct\n\
                   1001,2023-01-01,M Theekshana,2,23.0,4.0,5.75,12.0,0.5\n";
        let mut reader = csv::Reader::from_reader(raw.as_bytes());
        let rows = read_stat_rows::<BowlingMatchRow, _>(&mut reader).expect("valid rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].runs_conceded, 23);
        assert_eq!(rows[0].match_id, "1001");
    }

    #[test]
    fn repeated_player_match_is_rejected_with_its_line() {
        let raw = "player,match_id,match_date,runs_scored,balls_faced,strike_rate,boundaries,dot_ball_pct,dismissed\n\
                   A,1,2023-01-01,10,8,125.0,1,0.3,1\n\
                   B,1,2023-01-01,4,6,66.7,0,0.5,1\n\
                   A,1,2023-01-01,10,8,125.0,1,0.3,1\n";
        let mut reader = csv::Reader::from_reader(raw.as_bytes());
        let err = read_stat_rows::<BattingMatchRow, _>(&mut reader).unwrap_err();
        match err {
            PipelineError::InvalidRow { line, message, .. } => {
                assert_eq!(line, 4);
                assert!(message.contains("first seen on line 2"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sort_keeps_same_day_rows_in_input_order() {
        let day = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        let row = |player: &str, id: &str, date: NaiveDate| BattingMatchRow {
            player: player.to_string(),
            match_id: id.to_string(),
            match_date: date,
            runs_scored: 0,
            balls_faced: 0,
            strike_rate: 0.0,
            boundaries: 0,
            dot_ball_pct: 0.0,
            dismissed: 0,
        };
        let mut rows = vec![
            row("B", "9", day),
            row("A", "2", day),
            row("A", "1", day.pred_opt().unwrap()),
            row("A", "3", day),
        ];
        sort_chronologically(&mut rows);
        let ids = rows.iter().map(|r| r.match_id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["1", "2", "3", "9"]);
    }
}

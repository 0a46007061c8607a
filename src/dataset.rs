use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, params};
use tracing::info;

use crate::activity::ActivePlayers;
use crate::scoring::{PerformanceLabel, Rated, ScoredBattingRow, ScoredBowlingRow};
use crate::selection::Squad;
use crate::stats::{MatchRow, parse_match_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    Batting,
    Bowling,
}

impl Discipline {
    fn table(self) -> &'static str {
        match self {
            Discipline::Batting => "batting_scored",
            Discipline::Bowling => "bowling_scored",
        }
    }
}

/// The slice of a stored scored row the selector needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub player: String,
    pub match_id: String,
    pub match_date: NaiveDate,
    pub performance_score: f64,
    pub performance_label: PerformanceLabel,
}

impl MatchRow for ScoreRecord {
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

impl Rated for ScoreRecord {
    fn score(&self) -> f64 {
        self.performance_score
    }
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS batting_scored (
            player TEXT NOT NULL,
            match_id TEXT NOT NULL,
            match_date TEXT NOT NULL,
            runs_scored INTEGER NOT NULL,
            balls_faced INTEGER NOT NULL,
            strike_rate REAL NOT NULL,
            boundaries INTEGER NOT NULL,
            dot_ball_pct REAL NOT NULL,
            dismissed INTEGER NOT NULL,
            form_runs_10 REAL NULL,
            form_sr_10 REAL NULL,
            form_boundaries_10 REAL NULL,
            form_dot_pct_10 REAL NULL,
            form_dismissals_10 REAL NULL,
            consistency_score REAL NULL,
            matches_played_total INTEGER NOT NULL,
            recent_50s INTEGER NULL,
            performance_score REAL NOT NULL,
            performance_label TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (player, match_id)
        );
        CREATE INDEX IF NOT EXISTS idx_batting_scored_date ON batting_scored(match_date);

        CREATE TABLE IF NOT EXISTS bowling_scored (
            player TEXT NOT NULL,
            match_id TEXT NOT NULL,
            match_date TEXT NOT NULL,
            wickets_taken INTEGER NOT NULL,
            runs_conceded INTEGER NOT NULL,
            overs_bowled REAL NOT NULL,
            economy_rate REAL NOT NULL,
            bowling_strike_rate REAL NOT NULL,
            dot_ball_pct REAL NOT NULL,
            form_wickets_10 REAL NULL,
            form_economy_10 REAL NULL,
            form_sr_bowl_10 REAL NULL,
            form_dot_pct_bowl_10 REAL NULL,
            form_maidens_10 REAL NOT NULL,
            consistency_wickets REAL NULL,
            matches_played_total INTEGER NOT NULL,
            recent_3fers INTEGER NULL,
            performance_score REAL NOT NULL,
            performance_label TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (player, match_id)
        );
        CREATE INDEX IF NOT EXISTS idx_bowling_scored_date ON bowling_scored(match_date);

        CREATE TABLE IF NOT EXISTS selection_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            run_at TEXT NOT NULL,
            latest_date TEXT NULL,
            cutoff_date TEXT NULL,
            roster_fallback INTEGER NOT NULL,
            squad_size INTEGER NOT NULL,
            squad_json TEXT NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

fn date_text(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Replaces the stored batting table with `rows`; player-matches absent from
/// `rows` do not survive.
pub fn replace_batting(conn: &mut Connection, rows: &[ScoredBattingRow]) -> Result<usize> {
    let updated_at = Utc::now().to_rfc3339();
    let tx = conn.transaction().context("begin batting replace")?;
    let removed = tx
        .execute("DELETE FROM batting_scored", [])
        .context("clear batting_scored")?;
    for scored in rows {
        let s = &scored.row.stats;
        let f = &scored.row.form;
        tx.execute(
            r#"
            INSERT INTO batting_scored (
                player, match_id, match_date,
                runs_scored, balls_faced, strike_rate, boundaries, dot_ball_pct, dismissed,
                form_runs_10, form_sr_10, form_boundaries_10, form_dot_pct_10, form_dismissals_10,
                consistency_score, matches_played_total, recent_50s,
                performance_score, performance_label, updated_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5, ?6, ?7, ?8, ?9,
                ?10, ?11, ?12, ?13, ?14,
                ?15, ?16, ?17,
                ?18, ?19, ?20
            )
            ON CONFLICT(player, match_id) DO UPDATE SET
                match_date = excluded.match_date,
                runs_scored = excluded.runs_scored,
                balls_faced = excluded.balls_faced,
                strike_rate = excluded.strike_rate,
                boundaries = excluded.boundaries,
                dot_ball_pct = excluded.dot_ball_pct,
                dismissed = excluded.dismissed,
                form_runs_10 = excluded.form_runs_10,
                form_sr_10 = excluded.form_sr_10,
                form_boundaries_10 = excluded.form_boundaries_10,
                form_dot_pct_10 = excluded.form_dot_pct_10,
                form_dismissals_10 = excluded.form_dismissals_10,
                consistency_score = excluded.consistency_score,
                matches_played_total = excluded.matches_played_total,
                recent_50s = excluded.recent_50s,
                performance_score = excluded.performance_score,
                performance_label = excluded.performance_label,
                updated_at = excluded.updated_at
            "#,
            params![
                s.player,
                s.match_id,
                date_text(s.match_date),
                s.runs_scored,
                s.balls_faced,
                s.strike_rate,
                s.boundaries,
                s.dot_ball_pct,
                s.dismissed,
                f.form_runs_10,
                f.form_sr_10,
                f.form_boundaries_10,
                f.form_dot_pct_10,
                f.form_dismissals_10,
                f.consistency_score,
                f.matches_played_total,
                f.recent_50s,
                scored.performance_score,
                scored.performance_label.as_str(),
                updated_at,
            ],
        )
        .context("upsert batting row")?;
    }
    tx.commit().context("commit batting replace")?;
    info!(rows = rows.len(), removed, "stored scored batting rows");
    Ok(rows.len())
}

/// Replaces the stored bowling table with `rows`; player-matches absent from
/// `rows` do not survive.
pub fn replace_bowling(conn: &mut Connection, rows: &[ScoredBowlingRow]) -> Result<usize> {
    let updated_at = Utc::now().to_rfc3339();
    let tx = conn.transaction().context("begin bowling replace")?;
    let removed = tx
        .execute("DELETE FROM bowling_scored", [])
        .context("clear bowling_scored")?;
    for scored in rows {
        let s = &scored.row.stats;
        let f = &scored.row.form;
        tx.execute(
            r#"
            INSERT INTO bowling_scored (
                player, match_id, match_date,
                wickets_taken, runs_conceded, overs_bowled, economy_rate, bowling_strike_rate, dot_ball_pct,
                form_wickets_10, form_economy_10, form_sr_bowl_10, form_dot_pct_bowl_10, form_maidens_10,
                consistency_wickets, matches_played_total, recent_3fers,
                performance_score, performance_label, updated_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5, ?6, ?7, ?8, ?9,
                ?10, ?11, ?12, ?13, ?14,
                ?15, ?16, ?17,
                ?18, ?19, ?20
            )
            ON CONFLICT(player, match_id) DO UPDATE SET
                match_date = excluded.match_date,
                wickets_taken = excluded.wickets_taken,
                runs_conceded = excluded.runs_conceded,
                overs_bowled = excluded.overs_bowled,
                economy_rate = excluded.economy_rate,
                bowling_strike_rate = excluded.bowling_strike_rate,
                dot_ball_pct = excluded.dot_ball_pct,
                form_wickets_10 = excluded.form_wickets_10,
                form_economy_10 = excluded.form_economy_10,
                form_sr_bowl_10 = excluded.form_sr_bowl_10,
                form_dot_pct_bowl_10 = excluded.form_dot_pct_bowl_10,
                form_maidens_10 = excluded.form_maidens_10,
                consistency_wickets = excluded.consistency_wickets,
                matches_played_total = excluded.matches_played_total,
                recent_3fers = excluded.recent_3fers,
                performance_score = excluded.performance_score,
                performance_label = excluded.performance_label,
                updated_at = excluded.updated_at
            "#,
            params![
                s.player,
                s.match_id,
                date_text(s.match_date),
                s.wickets_taken,
                s.runs_conceded,
                s.overs_bowled,
                s.economy_rate,
                s.bowling_strike_rate,
                s.dot_ball_pct,
                f.form_wickets_10,
                f.form_economy_10,
                f.form_sr_bowl_10,
                f.form_dot_pct_bowl_10,
                f.form_maidens_10,
                f.consistency_wickets,
                f.matches_played_total,
                f.recent_3fers,
                scored.performance_score,
                scored.performance_label.as_str(),
                updated_at,
            ],
        )
        .context("upsert bowling row")?;
    }
    tx.commit().context("commit bowling replace")?;
    info!(rows = rows.len(), removed, "stored scored bowling rows");
    Ok(rows.len())
}

pub fn load_score_records(conn: &Connection, discipline: Discipline) -> Result<Vec<ScoreRecord>> {
    let sql = format!(
        "SELECT player, match_id, match_date, performance_score, performance_label
         FROM {}
         ORDER BY player ASC, match_date ASC, match_id ASC",
        discipline.table()
    );
    let mut stmt = conn.prepare(&sql).context("prepare load scores query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .context("query load scores")?;

    let mut out = Vec::new();
    for row in rows {
        let (player, match_id, date_raw, performance_score, label_raw) =
            row.context("decode score row")?;
        let match_date = parse_match_date(&date_raw)
            .ok_or_else(|| anyhow!("invalid match_date '{date_raw}' for {player}/{match_id}"))?;
        let performance_label = label_raw.parse::<PerformanceLabel>().map_err(|err| anyhow!(err))?;
        out.push(ScoreRecord {
            player,
            match_id,
            match_date,
            performance_score,
            performance_label,
        });
    }
    Ok(out)
}

pub fn record_selection_run(conn: &Connection, active: &ActivePlayers, squad: &Squad) -> Result<i64> {
    let squad_json = serde_json::to_string(squad).context("serialize squad")?;
    conn.execute(
        "INSERT INTO selection_runs(run_at, latest_date, cutoff_date, roster_fallback, squad_size, squad_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            Utc::now().to_rfc3339(),
            active.latest_date.map(date_text),
            active.cutoff_date.map(date_text),
            active.roster_fallback,
            squad.len() as i64,
            squad_json,
        ],
    )
    .context("insert selection run")?;
    Ok(conn.last_insert_rowid())
}

pub fn load_last_squad(conn: &Connection) -> Result<Option<Squad>> {
    let raw = conn
        .query_row(
            "SELECT squad_json FROM selection_runs ORDER BY run_id DESC LIMIT 1",
            [],
            |row| row.get::<_, String>(0),
        )
        .map(Some)
        .or_else(|err| match err {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })
        .context("query last selection run")?;
    raw.map(|json| serde_json::from_str::<Squad>(&json).context("decode stored squad"))
        .transpose()
}

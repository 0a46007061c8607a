use anyhow::{Context, Result};
use tracing::{info, info_span};

use crate::activity::{ActivePlayers, active_players};
use crate::combined::{CombinedMatchRow, merge_disciplines};
use crate::config::PipelineConfig;
use crate::dataset::{self, Discipline};
use crate::export::{
    BATTING_FORM_FILE, BATTING_LABELED_FILE, BOWLING_FORM_FILE, BOWLING_LABELED_FILE,
    COMBINED_FILE, export_squad_xlsx, write_csv_table,
};
use crate::form::{BattingFormRow, BowlingFormRow, compute_batting_form, compute_bowling_form};
use crate::roster::PlayerRoster;
use crate::scoring::{
    LabelDistribution, Rated, ScoredBattingRow, ScoredBowlingRow, score_batting_rows,
    score_bowling_rows,
};
use crate::selection::{PlayerRatings, Squad, select_best_xi};
use crate::stats::{load_batting_rows, load_bowling_rows};

#[derive(Debug, Clone)]
pub struct FormTables {
    pub batting: Vec<BattingFormRow>,
    pub bowling: Vec<BowlingFormRow>,
}

#[derive(Debug, Clone)]
pub struct ScoredTables {
    pub batting: Vec<ScoredBattingRow>,
    pub bowling: Vec<ScoredBowlingRow>,
    pub combined: Vec<CombinedMatchRow>,
}

impl ScoredTables {
    pub fn batting_distribution(&self) -> LabelDistribution {
        LabelDistribution::from_scored(&self.batting)
    }

    pub fn bowling_distribution(&self) -> LabelDistribution {
        LabelDistribution::from_scored(&self.bowling)
    }
}

#[derive(Debug, Clone)]
pub struct Selection {
    pub active: ActivePlayers,
    pub ratings: PlayerRatings,
    pub squad: Squad,
}

pub fn load_roster(cfg: &PipelineConfig) -> Result<PlayerRoster> {
    match &cfg.roster_path {
        Some(path) => PlayerRoster::from_json_file(path)
            .with_context(|| format!("load roster {}", path.display())),
        None => Ok(PlayerRoster::sri_lanka().clone()),
    }
}

/// Stats CSVs to feature tables; writes both feature CSVs.
pub fn run_form_stage(cfg: &PipelineConfig) -> Result<FormTables> {
    let _span = info_span!("form").entered();
    let batting_rows = load_batting_rows(&cfg.batting_stats_path())?;
    let bowling_rows = load_bowling_rows(&cfg.bowling_stats_path())?;
    info!(
        batting = batting_rows.len(),
        bowling = bowling_rows.len(),
        "loaded per-match stat rows"
    );

    let tables = FormTables {
        batting: compute_batting_form(batting_rows),
        bowling: compute_bowling_form(bowling_rows),
    };
    write_csv_table(&cfg.output_path(BATTING_FORM_FILE), &tables.batting)?;
    write_csv_table(&cfg.output_path(BOWLING_FORM_FILE), &tables.bowling)?;
    Ok(tables)
}

/// Scores and labels both tables, writes the labeled CSVs plus the merged
/// view, and replaces the scored tables in the SQLite store.
pub fn run_label_stage(cfg: &PipelineConfig, form: FormTables) -> Result<ScoredTables> {
    let _span = info_span!("label").entered();
    let batting = score_batting_rows(form.batting);
    let bowling = score_bowling_rows(form.bowling);
    let combined = merge_disciplines(&batting, &bowling);

    write_csv_table(&cfg.output_path(BATTING_LABELED_FILE), &batting)?;
    write_csv_table(&cfg.output_path(BOWLING_LABELED_FILE), &bowling)?;
    write_csv_table(&cfg.output_path(COMBINED_FILE), &combined)?;

    let mut conn = dataset::open_db(&cfg.db_path)?;
    dataset::replace_batting(&mut conn, &batting)?;
    dataset::replace_bowling(&mut conn, &bowling)?;

    Ok(ScoredTables {
        batting,
        bowling,
        combined,
    })
}

/// Active filter, latest ratings and the greedy XI, in that order.
pub fn run_selection<B: Rated, W: Rated>(
    batting: &[B],
    bowling: &[W],
    roster: &PlayerRoster,
) -> Selection {
    let _span = info_span!("select").entered();
    let active = active_players(batting, bowling, roster);
    let ratings = PlayerRatings::from_latest(batting, bowling);
    let squad = select_best_xi(&ratings, roster, &active);
    Selection {
        active,
        ratings,
        squad,
    }
}

/// Selection straight from the stored score tables.
pub fn select_from_store(cfg: &PipelineConfig, roster: &PlayerRoster) -> Result<Selection> {
    let conn = dataset::open_db(&cfg.db_path)?;
    let batting = dataset::load_score_records(&conn, Discipline::Batting)?;
    let bowling = dataset::load_score_records(&conn, Discipline::Bowling)?;
    let selection = run_selection(&batting, &bowling, roster);
    dataset::record_selection_run(&conn, &selection.active, &selection.squad)?;
    finish_selection(cfg, &selection)?;
    Ok(selection)
}

pub fn run_all(cfg: &PipelineConfig) -> Result<(ScoredTables, Selection)> {
    let roster = load_roster(cfg)?;
    let form = run_form_stage(cfg)?;
    let scored = run_label_stage(cfg, form)?;
    let selection = run_selection(&scored.batting, &scored.bowling, &roster);

    let conn = dataset::open_db(&cfg.db_path)?;
    dataset::record_selection_run(&conn, &selection.active, &selection.squad)?;
    finish_selection(cfg, &selection)?;
    Ok((scored, selection))
}

fn finish_selection(cfg: &PipelineConfig, selection: &Selection) -> Result<()> {
    if let Some(path) = &cfg.xlsx_path {
        export_squad_xlsx(path, &selection.squad, &selection.ratings)?;
        info!(path = %path.display(), "wrote squad workbook");
    }
    Ok(())
}

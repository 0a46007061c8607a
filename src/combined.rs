use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::scoring::{PerformanceLabel, Rated, label_for_score};
use crate::stats::MatchRow;

/// One player-match across both disciplines. A side the player did not
/// take part in scores 0.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedMatchRow {
    pub player: String,
    pub match_id: String,
    pub match_date: NaiveDate,
    pub batting_score: f64,
    pub bowling_score: f64,
    pub batted: bool,
    pub bowled: bool,
    pub performance_score: f64,
    pub performance_label: PerformanceLabel,
}

impl MatchRow for CombinedMatchRow {
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

type Key = (String, NaiveDate, String);

/// Outer join on (player, match_id, match_date); the overall score is the
/// better of the two sides. Output is ordered by (player, match_date, match_id).
pub fn merge_disciplines<B: Rated, W: Rated>(batting: &[B], bowling: &[W]) -> Vec<CombinedMatchRow> {
    let mut sides: BTreeMap<Key, (Option<f64>, Option<f64>)> = BTreeMap::new();
    for row in batting {
        sides.entry(key_of(row)).or_default().0 = Some(row.score());
    }
    for row in bowling {
        sides.entry(key_of(row)).or_default().1 = Some(row.score());
    }

    sides
        .into_iter()
        .map(|((player, match_date, match_id), (bat, bowl))| {
            let batting_score = bat.unwrap_or(0.0);
            let bowling_score = bowl.unwrap_or(0.0);
            let performance_score = batting_score.max(bowling_score);
            CombinedMatchRow {
                player,
                match_id,
                match_date,
                batting_score,
                bowling_score,
                batted: bat.is_some(),
                bowled: bowl.is_some(),
                performance_score,
                performance_label: label_for_score(performance_score),
            }
        })
        .collect()
}

fn key_of<R: MatchRow>(row: &R) -> Key {
    (
        row.player().to_string(),
        row.match_date(),
        row.match_id().to_string(),
    )
}

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use tracing::{info, warn};

use crate::roster::PlayerRoster;
use crate::stats::MatchRow;

pub const ACTIVE_WINDOW_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePlayers {
    pub players: BTreeSet<String>,
    pub latest_date: Option<NaiveDate>,
    pub cutoff_date: Option<NaiveDate>,
    /// Set when there was no batting data and the whole roster was admitted.
    pub roster_fallback: bool,
}

impl ActivePlayers {
    pub fn contains(&self, player: &str) -> bool {
        self.players.contains(player)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// A player is active with at least one batting or bowling match on or after
/// `latest_date - 365 days`, where `latest_date` spans both collections.
pub fn active_players<B: MatchRow, W: MatchRow>(
    batting: &[B],
    bowling: &[W],
    roster: &PlayerRoster,
) -> ActivePlayers {
    if batting.is_empty() {
        warn!(
            roster = roster.len(),
            "no batting rows available; treating the full roster as active"
        );
        return ActivePlayers {
            players: roster.players().map(str::to_string).collect(),
            latest_date: None,
            cutoff_date: None,
            roster_fallback: true,
        };
    }

    let latest_date = batting
        .iter()
        .map(MatchRow::match_date)
        .chain(bowling.iter().map(MatchRow::match_date))
        .max();
    let cutoff_date = latest_date.map(|d| d - Duration::days(ACTIVE_WINDOW_DAYS));

    let mut players = BTreeSet::new();
    if let Some(cutoff) = cutoff_date {
        let recent = |date: NaiveDate| date >= cutoff;
        players.extend(
            batting
                .iter()
                .filter(|r| recent(r.match_date()))
                .map(|r| r.player().to_string()),
        );
        players.extend(
            bowling
                .iter()
                .filter(|r| recent(r.match_date()))
                .map(|r| r.player().to_string()),
        );
    }

    info!(
        active = players.len(),
        latest = ?latest_date,
        cutoff = ?cutoff_date,
        "resolved active players"
    );

    ActivePlayers {
        players,
        latest_date,
        cutoff_date,
        roster_fallback: false,
    }
}

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::activity::ActivePlayers;
use crate::roster::{Capability, PlayerRoster, RoleTag};
use crate::scoring::Rated;

pub const SQUAD_SIZE: usize = 11;

/// Latest chronological score per player, one map per discipline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerRatings {
    pub batting: HashMap<String, f64>,
    pub bowling: HashMap<String, f64>,
}

impl PlayerRatings {
    pub fn from_latest<B: Rated, W: Rated>(batting: &[B], bowling: &[W]) -> Self {
        Self {
            batting: latest_scores(batting),
            bowling: latest_scores(bowling),
        }
    }

    /// Absent from a discipline means 0 for that discipline.
    pub fn batting(&self, player: &str) -> f64 {
        self.batting.get(player).copied().unwrap_or(0.0)
    }

    pub fn bowling(&self, player: &str) -> f64 {
        self.bowling.get(player).copied().unwrap_or(0.0)
    }

    pub fn combined(&self, player: &str) -> f64 {
        self.batting(player) + self.bowling(player)
    }
}

/// Orders match ids numerically when both are integers, otherwise as text.
pub fn compare_match_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

/// Most recent row per player by match_date; same-day ties go to the greater
/// match_id (see [`compare_match_ids`]), then to the later row in input order.
pub fn latest_scores<R: Rated>(rows: &[R]) -> HashMap<String, f64> {
    let mut best: HashMap<&str, (NaiveDate, &str, f64)> = HashMap::new();
    for row in rows {
        let candidate = (row.match_date(), row.match_id(), row.score());
        match best.get_mut(row.player()) {
            Some(current) => {
                let order = candidate
                    .0
                    .cmp(&current.0)
                    .then_with(|| compare_match_ids(candidate.1, current.1));
                if order != Ordering::Less {
                    *current = candidate;
                }
            }
            None => {
                best.insert(row.player(), candidate);
            }
        }
    }
    best.into_iter()
        .map(|(player, (_, _, score))| (player.to_string(), score))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStep {
    Openers,
    MiddleOrder,
    Allrounders,
    Spinner,
    Pacers,
    BestRemaining,
}

impl SelectionStep {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionStep::Openers => "openers",
            SelectionStep::MiddleOrder => "middle_order",
            SelectionStep::Allrounders => "allrounders",
            SelectionStep::Spinner => "spinner",
            SelectionStep::Pacers => "pacers",
            SelectionStep::BestRemaining => "best_remaining",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RankKey {
    Batting,
    Bowling,
    Combined,
}

struct Bucket {
    step: SelectionStep,
    capability: Option<Capability>,
    key: RankKey,
    take: usize,
}

// Filled strictly in this order; the last bucket tops the squad up to eleven.
const BUCKETS: [Bucket; 6] = [
    Bucket {
        step: SelectionStep::Openers,
        capability: Some(Capability::Opener),
        key: RankKey::Batting,
        take: 2,
    },
    Bucket {
        step: SelectionStep::MiddleOrder,
        capability: Some(Capability::MiddleOrder),
        key: RankKey::Batting,
        take: 3,
    },
    Bucket {
        step: SelectionStep::Allrounders,
        capability: Some(Capability::Allrounder),
        key: RankKey::Combined,
        take: 2,
    },
    Bucket {
        step: SelectionStep::Spinner,
        capability: Some(Capability::Spin),
        key: RankKey::Bowling,
        take: 1,
    },
    Bucket {
        step: SelectionStep::Pacers,
        capability: Some(Capability::Pace),
        key: RankKey::Bowling,
        take: 3,
    },
    Bucket {
        step: SelectionStep::BestRemaining,
        capability: None,
        key: RankKey::Combined,
        take: SQUAD_SIZE,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadEntry {
    pub player: String,
    pub role: RoleTag,
    pub batting_score: f64,
    pub bowling_score: f64,
    pub step: SelectionStep,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    pub entries: Vec<SquadEntry>,
}

impl Squad {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= SQUAD_SIZE
    }

    pub fn players(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.player.as_str()).collect()
    }

    pub fn contains(&self, player: &str) -> bool {
        self.entries.iter().any(|e| e.player == player)
    }
}

impl fmt::Display for Squad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, e) in self.entries.iter().enumerate() {
            writeln!(
                f,
                "{}. {} ({}) - Bat: {:.1} | Bowl: {:.1}",
                idx + 1,
                e.player,
                e.role,
                e.batting_score,
                e.bowling_score
            )?;
        }
        Ok(())
    }
}

fn rank_value(ratings: &PlayerRatings, key: RankKey, player: &str) -> f64 {
    match key {
        RankKey::Batting => ratings.batting(player),
        RankKey::Bowling => ratings.bowling(player),
        RankKey::Combined => ratings.combined(player),
    }
}

/// Greedy fill over the fixed bucket order. Only rostered, active players
/// take part; nobody is placed twice. Ties rank by player name ascending.
/// A thin pool yields a short squad rather than an error.
pub fn select_best_xi(
    ratings: &PlayerRatings,
    roster: &PlayerRoster,
    active: &ActivePlayers,
) -> Squad {
    let eligible = roster
        .iter()
        .filter(|(player, _)| active.contains(player))
        .collect::<Vec<_>>();

    let mut selected: HashSet<&str> = HashSet::new();
    let mut squad = Squad::default();

    for bucket in &BUCKETS {
        let room = SQUAD_SIZE.saturating_sub(squad.len());
        if room == 0 {
            break;
        }
        let mut pool = eligible
            .iter()
            .filter(|(player, _)| !selected.contains(player))
            .filter(|(_, role)| bucket.capability.is_none_or(|cap| role.has(cap)))
            .map(|(player, role)| (*player, *role, rank_value(ratings, bucket.key, player)))
            .collect::<Vec<_>>();
        pool.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });

        for (player, role, value) in pool.into_iter().take(bucket.take.min(room)) {
            debug!(step = bucket.step.as_str(), player, value, "selected");
            selected.insert(player);
            squad.entries.push(SquadEntry {
                player: player.to_string(),
                role,
                batting_score: ratings.batting(player),
                bowling_score: ratings.bowling(player),
                step: bucket.step,
            });
        }
    }

    squad.entries.truncate(SQUAD_SIZE);
    if squad.is_full() {
        info!(players = squad.len(), "squad selected");
    } else {
        warn!(
            players = squad.len(),
            eligible = eligible.len(),
            "eligible pool too small for a full squad"
        );
    }
    squad
}

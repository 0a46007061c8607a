use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTag {
    Opener,
    OpenerWk,
    MiddleOrder,
    MiddleOrderWk,
    Allrounder,
    AllrounderSpin,
    Spinner,
    Pacer,
}

/// What a player can be picked as. A tag may grant several capabilities
/// (`allrounder_spin` is both an all-rounder and a spinner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Opener,
    MiddleOrder,
    Allrounder,
    Spin,
    Pace,
    Wicketkeeper,
}

impl RoleTag {
    pub const ALL: [RoleTag; 8] = [
        RoleTag::Opener,
        RoleTag::OpenerWk,
        RoleTag::MiddleOrder,
        RoleTag::MiddleOrderWk,
        RoleTag::Allrounder,
        RoleTag::AllrounderSpin,
        RoleTag::Spinner,
        RoleTag::Pacer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RoleTag::Opener => "opener",
            RoleTag::OpenerWk => "opener_wk",
            RoleTag::MiddleOrder => "middle_order",
            RoleTag::MiddleOrderWk => "middle_order_wk",
            RoleTag::Allrounder => "allrounder",
            RoleTag::AllrounderSpin => "allrounder_spin",
            RoleTag::Spinner => "spinner",
            RoleTag::Pacer => "pacer",
        }
    }

    pub fn capabilities(self) -> &'static [Capability] {
        use Capability::*;
        match self {
            RoleTag::Opener => &[Opener],
            RoleTag::OpenerWk => &[Opener, Wicketkeeper],
            RoleTag::MiddleOrder => &[MiddleOrder],
            RoleTag::MiddleOrderWk => &[MiddleOrder, Wicketkeeper],
            RoleTag::Allrounder => &[Allrounder],
            RoleTag::AllrounderSpin => &[Allrounder, Spin],
            RoleTag::Spinner => &[Spin],
            RoleTag::Pacer => &[Pace],
        }
    }

    pub fn has(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleTag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim();
        RoleTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == needle)
            .ok_or_else(|| format!("unknown role tag '{s}'"))
    }
}

/// Player identity to role tag. Iterates in player-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerRoster {
    roles: BTreeMap<String, RoleTag>,
}

const SRI_LANKA_ROLES: &[(&str, RoleTag)] = &[
    ("P Nissanka", RoleTag::Opener),
    ("Kusal Mendis", RoleTag::OpenerWk),
    ("KIC Asalanka", RoleTag::MiddleOrder),
    ("PHKD Mendis", RoleTag::MiddleOrder),
    ("S Samarawickrama", RoleTag::MiddleOrderWk),
    ("MD Shanaka", RoleTag::Allrounder),
    ("PWH de Silva", RoleTag::AllrounderSpin),
    ("DM de Silva", RoleTag::Allrounder),
    ("M Theekshana", RoleTag::Spinner),
    ("M Pathirana", RoleTag::Pacer),
    ("PVD Chameera", RoleTag::Pacer),
    ("D Madushanka", RoleTag::Pacer),
    ("N Thushara", RoleTag::Pacer),
    ("DN Wellalage", RoleTag::AllrounderSpin),
    ("MDKJ Perera", RoleTag::OpenerWk),
    ("PBB Rajapaksa", RoleTag::MiddleOrder),
    ("AD Mathews", RoleTag::Allrounder),
    ("L Kumara", RoleTag::Pacer),
];

static SRI_LANKA_ROSTER: Lazy<PlayerRoster> = Lazy::new(|| {
    PlayerRoster::from_pairs(
        SRI_LANKA_ROLES
            .iter()
            .map(|(player, role)| (player.to_string(), *role)),
    )
});

impl PlayerRoster {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, RoleTag)>) -> Self {
        Self {
            roles: pairs.into_iter().collect(),
        }
    }

    pub fn sri_lanka() -> &'static PlayerRoster {
        &SRI_LANKA_ROSTER
    }

    /// Reads `{ "player": "role_tag", ... }`. Tags outside the closed set are rejected.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let parsed: BTreeMap<String, String> = serde_json::from_str(raw)?;
        let mut roles = BTreeMap::new();
        for (player, tag) in parsed {
            let role = tag.parse::<RoleTag>().map_err(|_| PipelineError::UnknownRole {
                player: player.clone(),
                tag: tag.clone(),
            })?;
            roles.insert(player.trim().to_string(), role);
        }
        Ok(Self { roles })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PipelineError::MissingArtifact {
                path: path.to_path_buf(),
                hint: "roster JSON maps player names to role tags",
            });
        }
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn role(&self, player: &str) -> Option<RoleTag> {
        self.roles.get(player).copied()
    }

    pub fn contains(&self, player: &str) -> bool {
        self.roles.contains_key(player)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, RoleTag)> + '_ {
        self.roles.iter().map(|(p, r)| (p.as_str(), *r))
    }

    pub fn players(&self) -> impl Iterator<Item = &str> + '_ {
        self.roles.keys().map(|p| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

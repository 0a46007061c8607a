use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::stats::{BATTING_STATS_FILE, BOWLING_STATS_FILE};

pub const DEFAULT_DATA_DIR: &str = "data/processed";
pub const DEFAULT_DB_FILE: &str = "lanka_xi.sqlite";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Holds the per-match stat CSVs and receives every derived table.
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    /// JSON roster overriding the built-in one (LANKA_XI_ROSTER).
    pub roster_path: Option<PathBuf>,
    /// Squad workbook destination (LANKA_XI_XLSX).
    pub xlsx_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::with_data_dir(PathBuf::from(DEFAULT_DATA_DIR))
    }
}

impl PipelineConfig {
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            db_path: data_dir.join(DEFAULT_DB_FILE),
            data_dir,
            roster_path: None,
            xlsx_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    /// `.env.local` then `.env`, then process environment, then command line.
    pub fn from_env_and_args() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");

        let data_dir = arg_path("--data-dir")
            .or_else(|| env_path("LANKA_XI_DATA_DIR"))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let mut cfg = Self::with_data_dir(data_dir);
        if let Some(db) = arg_path("--db").or_else(|| env_path("LANKA_XI_DB_PATH")) {
            cfg.db_path = db;
        }
        cfg.roster_path = arg_path("--roster").or_else(|| env_path("LANKA_XI_ROSTER"));
        cfg.xlsx_path = arg_path("--xlsx").or_else(|| env_path("LANKA_XI_XLSX"));
        cfg.log_filter = env::var("LANKA_XI_LOG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        cfg
    }

    pub fn batting_stats_path(&self) -> PathBuf {
        self.data_dir.join(BATTING_STATS_FILE)
    }

    pub fn bowling_stats_path(&self) -> PathBuf {
        self.data_dir.join(BOWLING_STATS_FILE)
    }

    pub fn output_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }
}

/// Installs the fmt subscriber; `RUST_LOG` wins over the configured filter.
pub fn init_tracing(cfg: &PipelineConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn arg_path(flag: &str) -> Option<PathBuf> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    parse_path_arg(&args, flag)
}

/// Accepts both `--flag=value` and `--flag value`.
pub fn parse_path_arg(args: &[String], flag: &str) -> Option<PathBuf> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}

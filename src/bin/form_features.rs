use anyhow::Result;

use lanka_xi::config::{PipelineConfig, init_tracing};
use lanka_xi::export::{BATTING_FORM_FILE, BOWLING_FORM_FILE};
use lanka_xi::pipeline;

fn main() -> Result<()> {
    let cfg = PipelineConfig::from_env_and_args();
    init_tracing(&cfg);

    let tables = pipeline::run_form_stage(&cfg)?;

    println!("Form features computed");
    println!(
        "Batting rows: {} -> {}",
        tables.batting.len(),
        cfg.output_path(BATTING_FORM_FILE).display()
    );
    println!(
        "Bowling rows: {} -> {}",
        tables.bowling.len(),
        cfg.output_path(BOWLING_FORM_FILE).display()
    );
    Ok(())
}

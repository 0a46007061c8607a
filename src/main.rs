use anyhow::Result;

use lanka_xi::config::{PipelineConfig, init_tracing};
use lanka_xi::pipeline;

fn main() -> Result<()> {
    let cfg = PipelineConfig::from_env_and_args();
    init_tracing(&cfg);

    let (scored, selection) = pipeline::run_all(&cfg)?;

    println!("Batting labels: {}", scored.batting_distribution());
    println!("Bowling labels: {}", scored.bowling_distribution());
    if selection.active.roster_fallback {
        println!("No batting data: every rostered player treated as active");
    } else if let Some(cutoff) = selection.active.cutoff_date {
        println!(
            "Active players: {} (matches on or after {cutoff})",
            selection.active.len()
        );
    }
    println!();
    println!("Recommended Playing XI based on recent form:");
    print!("{}", selection.squad);
    if !selection.squad.is_full() {
        println!(
            "Only {} eligible players could be placed",
            selection.squad.len()
        );
    }
    Ok(())
}

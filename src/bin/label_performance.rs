use anyhow::Result;

use lanka_xi::config::{PipelineConfig, init_tracing};
use lanka_xi::pipeline;
use lanka_xi::scoring::{LabelDistribution, PerformanceLabel};

fn main() -> Result<()> {
    let cfg = PipelineConfig::from_env_and_args();
    init_tracing(&cfg);

    let form = pipeline::run_form_stage(&cfg)?;
    let scored = pipeline::run_label_stage(&cfg, form)?;

    print_distribution("Batting", &scored.batting_distribution());
    print_distribution("Bowling", &scored.bowling_distribution());
    println!("Merged player-match rows: {}", scored.combined.len());
    println!("DB: {}", cfg.db_path.display());
    Ok(())
}

fn print_distribution(title: &str, dist: &LabelDistribution) {
    println!("{title} class distribution (n={}):", dist.total());
    for label in PerformanceLabel::ALL {
        println!("  {:<9} {:.4}", label.as_str(), dist.share(label));
    }
}

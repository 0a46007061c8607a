use anyhow::Result;

use lanka_xi::config::{PipelineConfig, init_tracing};
use lanka_xi::pipeline;

fn main() -> Result<()> {
    let cfg = PipelineConfig::from_env_and_args();
    init_tracing(&cfg);

    let roster = pipeline::load_roster(&cfg)?;
    let selection = pipeline::select_from_store(&cfg, &roster)?;

    println!("Recommended Playing XI based on recent form:");
    print!("{}", selection.squad);
    if let Some(path) = &cfg.xlsx_path {
        println!("Workbook: {}", path.display());
    }
    Ok(())
}

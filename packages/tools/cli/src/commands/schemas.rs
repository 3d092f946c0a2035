//! 스키마 파일 목록

use crate::config::CliConfig;
use crate::context::EffectiveContext;
use crate::OutputFormat;

use super::render;

pub fn list(config: &CliConfig, ctx: &EffectiveContext) -> anyhow::Result<()> {
    let registry = ctx.open_registry(config)?;
    let summaries = registry.summaries();

    if let OutputFormat::Json = ctx.format {
        return render::print_json(&summaries);
    }

    for summary in summaries {
        let marker = if summary.active { "*" } else { " " };
        match summary.state {
            rds_core::SourceState::Loaded => {
                println!("{} {} ({} tables)", marker, summary.id, summary.tables)
            }
            rds_core::SourceState::Unloaded => println!("{} {}", marker, summary.id),
        }
    }
    Ok(())
}

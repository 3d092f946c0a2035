//! 테이블 선언 위치 (`path:line`)

use crate::config::CliConfig;
use crate::context::EffectiveContext;
use crate::OutputFormat;

use super::render;

pub fn run(config: &CliConfig, ctx: &EffectiveContext, table: &str) -> anyhow::Result<()> {
    let registry = ctx.open_registry(config)?;
    let source = registry
        .active()
        .ok_or_else(|| anyhow::anyhow!("No active schema"))?;

    let line = registry
        .locate_table(table)
        .ok_or_else(|| anyhow::anyhow!("Table '{}' not declared in {}", table, source.id()))?;

    match ctx.format {
        OutputFormat::Json => render::print_json(&serde_json::json!({
            "schema": source.id(),
            "table": table,
            "line": line + 1,
        })),
        OutputFormat::Text => {
            println!("{}:{}", source.id(), line + 1);
            Ok(())
        }
    }
}

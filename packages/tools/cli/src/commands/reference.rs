//! 컬럼 참조 문자열 (`table.column`)

use rds_core::schema::forest;

use crate::config::CliConfig;
use crate::context::EffectiveContext;
use crate::OutputFormat;

use super::render;

pub fn run(
    config: &CliConfig,
    ctx: &EffectiveContext,
    column: &str,
    table: Option<&str>,
) -> anyhow::Result<()> {
    let registry = ctx.open_registry(config)?;
    let snapshot = registry.active_forest();

    let owner = match table {
        Some(name) => forest::find_table(&snapshot, name)
            .ok_or_else(|| anyhow::anyhow!("Table '{}' not found", name))?,
        None => forest::find_column_owner(&snapshot, column)
            .ok_or_else(|| anyhow::anyhow!("Column '{}' not found in any table", column))?,
    };

    let node = owner
        .find_column(column)
        .ok_or_else(|| anyhow::anyhow!("Column '{}' not found in table '{}'", column, owner.name))?;

    match ctx.format {
        OutputFormat::Json => render::print_json(&serde_json::json!({
            "reference": node.reference(),
            "column": node,
        })),
        OutputFormat::Text => {
            println!("{}", node.reference());
            Ok(())
        }
    }
}

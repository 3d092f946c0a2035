//! 전체 테이블 트리

use rds_core::SearchIndex;

use crate::config::CliConfig;
use crate::context::EffectiveContext;
use crate::OutputFormat;

use super::render;

pub fn show(config: &CliConfig, ctx: &EffectiveContext, expand: bool) -> anyhow::Result<()> {
    let registry = ctx.open_registry(config)?;
    let forest = registry.active_forest();

    if forest.is_empty() {
        if let OutputFormat::Json = ctx.format {
            return render::print_json(forest.as_slice());
        }
        println!("No tables.");
        return Ok(());
    }

    let search = SearchIndex::new();
    if let OutputFormat::Text = ctx.format {
        render::print_title(&registry.view_title(&search));
    }
    render::print_view(&search.view(&forest), expand, ctx.format)
}

//! 테이블/컬럼 검색

use rds_core::SearchIndex;

use crate::config::CliConfig;
use crate::context::EffectiveContext;
use crate::OutputFormat;

use super::render;

pub fn run(config: &CliConfig, ctx: &EffectiveContext, term: &str, expand: bool) -> anyhow::Result<()> {
    let registry = ctx.open_registry(config)?;
    let forest = registry.active_forest();

    let mut search = SearchIndex::new();
    search.subscribe(|term| tracing::debug!(term, "filter applied"));
    search.set_term(term);

    if let OutputFormat::Text = ctx.format {
        render::print_title(&registry.view_title(&search));
    }
    render::print_view(&search.view(&forest), expand, ctx.format)
}

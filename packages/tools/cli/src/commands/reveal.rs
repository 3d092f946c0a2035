//! 현재 파일에 해당하는 테이블 찾기
//!
//! 모델 파일이면 후보 이름(명시 table_name, 복수형 경로, 파일 이름)으로 테이블을 찾아
//! 펼쳐 보여주고, 아니거나 찾지 못하면 첫 테이블을 접힌 상태로 보여줍니다.

use std::path::Path;

use rds_core::candidate::CandidateNames;
use rds_core::{NameMatcher, TableNode};
use serde::Serialize;

use crate::config::CliConfig;
use crate::context::EffectiveContext;
use crate::OutputFormat;

use super::render;

#[derive(Serialize)]
struct Revealed<'a> {
    candidates: &'a [String],
    matched: bool,
    table: Option<&'a TableNode>,
}

/// 후보로 찾은 테이블(매칭 여부 포함), 없으면 첫 테이블
fn pick_table<'a>(candidates: &[String], forest: &'a [TableNode]) -> (bool, Option<&'a TableNode>) {
    let matched = NameMatcher::resolve(candidates, forest).is_some();
    (matched, NameMatcher::resolve_or_first(candidates, forest))
}

pub fn run(config: &CliConfig, ctx: &EffectiveContext, file: &Path) -> anyhow::Result<()> {
    let registry = ctx.open_registry(config)?;
    let forest = registry.active_forest();

    let path = file.display().to_string();
    let candidates = if CandidateNames::is_model_path(&path) {
        let source = std::fs::read_to_string(file).unwrap_or_else(|err| {
            tracing::debug!(file = %path, error = %err, "model file unreadable, using path only");
            String::new()
        });
        CandidateNames::from_model(&path, &source)
    } else {
        Vec::new()
    };
    tracing::debug!(?candidates, "candidate table names");

    let (matched, table) = pick_table(&candidates, forest.as_slice());

    if let OutputFormat::Json = ctx.format {
        return render::print_json(&Revealed {
            candidates: &candidates,
            matched,
            table,
        });
    }

    match table {
        Some(table) => {
            for line in render::table_lines(table, matched) {
                println!("{}", line);
            }
            Ok(())
        }
        None => {
            println!("No tables.");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_table_matches_candidate_or_falls_back() {
        let forest = vec![TableNode::new("accounts"), TableNode::new("quizzes")];

        let candidates = CandidateNames::from_model("/app/models/quiz.rb", "");
        let (matched, table) = pick_table(&candidates, &forest);
        assert!(matched);
        assert_eq!(table.unwrap().name, "quizzes");

        let (matched, table) = pick_table(&["missing".to_string()], &forest);
        assert!(!matched);
        assert_eq!(table.unwrap().name, "accounts");

        let (matched, table) = pick_table(&[], &[]);
        assert!(!matched);
        assert!(table.is_none());
    }
}

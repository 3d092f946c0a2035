//! 실행 컨텍스트
//!
//! 워크스페이스 루트, 활성 스키마 선택, 출력 형식을 CLI 옵션 > 환경변수 > 설정 파일
//! 순으로 결정하고, 스키마 레지스트리를 열어 둡니다.

use std::path::PathBuf;

use anyhow::Context as _;
use rds_core::{FsReader, SchemaRegistry};

use crate::config::CliConfig;
use crate::discover::discover_schemas;
use crate::OutputFormat;

/// 최종 결정된 컨텍스트
#[derive(Debug, Clone)]
pub struct EffectiveContext {
    pub root: PathBuf,
    pub schema: Option<String>,
    pub format: OutputFormat,
}

/// 컨텍스트 결정 (CLI 옵션 > 환경변수/설정)
pub fn resolve_context(
    root: Option<PathBuf>,
    schema: Option<String>,
    format: OutputFormat,
    config: &CliConfig,
) -> anyhow::Result<EffectiveContext> {
    let root = match root {
        Some(root) => root,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    Ok(EffectiveContext {
        root,
        schema: schema.or_else(|| config.default_schema()),
        format,
    })
}

impl EffectiveContext {
    /// 스키마 파일을 찾아 레지스트리를 만들고 활성 스키마를 파싱
    pub fn open_registry(&self, config: &CliConfig) -> anyhow::Result<SchemaRegistry> {
        let ids = discover_schemas(&self.root, &config.schema_glob(), &config.exclude)?;
        if ids.is_empty() {
            return Err(anyhow::anyhow!(
                "No schema file found under {} (pattern: {})",
                self.root.display(),
                config.schema_glob()
            ));
        }

        let mut registry = SchemaRegistry::new();
        registry.register(ids);

        if let Some(selection) = &self.schema {
            let id = select_source(&registry, selection);
            registry.set_active(&id)?;
        }

        registry
            .ensure_active_loaded(&FsReader)
            .context("failed to load active schema")?;

        Ok(registry)
    }
}

/// 식별자, 경로 접미사, 파일 이름 순으로 소스 선택
///
/// 아무것도 맞지 않으면 입력값을 그대로 돌려주어 레지스트리가 not-found를 알리게 합니다.
fn select_source(registry: &SchemaRegistry, selection: &str) -> String {
    let normalized = selection.replace('\\', "/");
    let sources = registry.sources();

    sources
        .iter()
        .find(|s| s.id() == selection)
        .or_else(|| {
            sources.iter().find(|s| {
                let id = s.id().replace('\\', "/");
                id.ends_with(&format!("/{}", normalized.trim_start_matches("./")))
            })
        })
        .or_else(|| sources.iter().find(|s| s.file_name() == selection))
        .map(|s| s.id().to_string())
        .unwrap_or_else(|| selection.to_string())
}

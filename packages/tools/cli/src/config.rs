//! CLI 설정
//!
//! `~/.rds/config.json`에서 읽고, 환경변수가 있으면 그 값을 우선합니다.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// 기본 스키마 파일 패턴 (워크스페이스 루트 기준)
pub const DEFAULT_SCHEMA_GLOB: &str = "**/db/*schema.rb";

/// CLI 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// 스키마 파일 glob 패턴
    #[serde(default)]
    pub schema_glob: Option<String>,

    /// 탐색에서 제외할 디렉터리 이름
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// 기본 활성 스키마 (식별자 또는 파일 이름)
    #[serde(default)]
    pub default_schema: Option<String>,
}

fn default_exclude() -> Vec<String> {
    vec!["node_modules".to_string()]
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            schema_glob: None,
            exclude: default_exclude(),
            default_schema: None,
        }
    }
}

impl CliConfig {
    /// 설정 파일 경로
    fn config_path() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?;
        Ok(home.join(".rds").join("config.json"))
    }

    /// 설정 로드
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 지정 경로에서 설정 로드 (파일이 없으면 기본값)
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: CliConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 스키마 glob 패턴 결정
    pub fn schema_glob(&self) -> String {
        std::env::var("RDS_SCHEMA_GLOB")
            .ok()
            .or_else(|| self.schema_glob.clone())
            .unwrap_or_else(|| DEFAULT_SCHEMA_GLOB.to_string())
    }

    /// 기본 활성 스키마 결정
    pub fn default_schema(&self) -> Option<String> {
        std::env::var("RDS_DEFAULT_SCHEMA")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.default_schema.clone())
    }
}

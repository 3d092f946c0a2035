//! 테이블 노드

use serde::{Deserialize, Serialize};

use super::column::ColumnNode;
use super::types::NodeKind;

/// 테이블 노드
///
/// 컬럼 순서는 schema.rb의 선언 순서와 같습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableNode {
    /// 테이블 이름 (포레스트 안에서 유일)
    pub name: String,

    /// `comment:` 옵션 값
    #[serde(default)]
    pub comment: String,

    /// 컬럼 목록
    #[serde(default)]
    pub columns: Vec<ColumnNode>,
}

impl TableNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            columns: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::Table
    }

    /// 컬럼 조회
    pub fn find_column(&self, name: &str) -> Option<&ColumnNode> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// 기본키 컬럼들
    pub fn primary_keys(&self) -> impl Iterator<Item = &ColumnNode> {
        self.columns.iter().filter(|c| c.is_primary_key)
    }

    /// 테이블 이름 또는 컬럼 이름에 `needle`(소문자)이 포함되는지 여부
    pub(crate) fn matches_term(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .columns
                .iter()
                .any(|c| c.name.to_lowercase().contains(needle))
    }
}

//! 트리 표시용 노드 종류

use serde::{Deserialize, Serialize};

/// 표현 계층이 아이콘/컨텍스트 값을 고를 때 쓰는 노드 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// 테이블
    Table,

    /// 일반 컬럼
    Field,

    /// 기본키 컬럼
    PrimaryKey,
}

impl NodeKind {
    /// 컨텍스트 값 (`schemaTable` / `schemaField`)
    pub fn context_value(&self) -> &'static str {
        match self {
            NodeKind::Table => "schemaTable",
            NodeKind::Field | NodeKind::PrimaryKey => "schemaField",
        }
    }

    /// 하위 노드를 펼칠 수 있는지 여부
    pub fn is_collapsible(&self) -> bool {
        matches!(self, NodeKind::Table)
    }
}

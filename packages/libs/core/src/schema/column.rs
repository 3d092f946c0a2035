//! 컬럼 노드
//!
//! `t.<type> "name", ...` 한 줄, 또는 `primary_key:` 옵션을 가진 테이블 헤더에서
//! 만들어집니다.

use serde::{Deserialize, Serialize};

use super::types::NodeKind;

/// 관례상 기본키로 취급되는 컬럼 이름
pub const PRIMARY_KEY_COLUMN: &str = "id";

/// 컬럼 노드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNode {
    /// 컬럼 이름 (추출 실패 시 빈 문자열)
    pub name: String,

    /// DSL 타입 키워드 (`string`, `integer`, ...) 또는 헤더의 `id:` 심볼
    #[serde(default)]
    pub declared_type: Option<String>,

    /// 기본키 여부
    #[serde(default)]
    pub is_primary_key: bool,

    /// `null: false, default: ""` 같은 나머지 옵션 원문
    ///
    /// `comment:` 옵션이 없으면 첫 쉼표 뒤부터 줄 끝까지입니다 (빈 문자열이 아님).
    #[serde(default)]
    pub extra_options: String,

    /// `comment:` 옵션 값
    #[serde(default)]
    pub comment: String,

    /// 소속 테이블 이름 (역참조용, 소유 관계 아님)
    #[serde(default)]
    pub table: String,
}

impl ColumnNode {
    /// 트리 표시용 라벨: `name (type)`
    pub fn label(&self) -> String {
        match &self.declared_type {
            Some(declared_type) => format!("{} ({})", self.name, declared_type),
            None => self.name.clone(),
        }
    }

    /// 아이콘 결정용 노드 종류
    pub fn kind(&self) -> NodeKind {
        if self.is_primary_key {
            NodeKind::PrimaryKey
        } else {
            NodeKind::Field
        }
    }

    /// `table.column` 형태의 참조 문자열
    pub fn reference(&self) -> String {
        format!("{}.{}", self.table, self.name)
    }

    pub(crate) fn is_conventional_primary_key(name: &str) -> bool {
        name == PRIMARY_KEY_COLUMN
    }
}

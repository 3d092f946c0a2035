//! 포레스트 조회 헬퍼
//!
//! 포레스트는 한 스키마 파일에서 파싱된 `TableNode`의 순서 있는 목록입니다.
//! 레지스트리는 `Arc`로 공유해 교체 전 스냅샷을 쥔 쪽이 계속 완전한 트리를 보게 합니다.

use std::sync::Arc;

use super::column::ColumnNode;
use super::table::TableNode;

/// 공유 포레스트 스냅샷
pub type Forest = Arc<Vec<TableNode>>;

/// 이름으로 테이블 조회
pub fn find_table<'a>(forest: &'a [TableNode], name: &str) -> Option<&'a TableNode> {
    forest.iter().find(|t| t.name == name)
}

/// 컬럼 이름으로 소속 테이블 역조회 (포레스트 순서상 첫 번째)
pub fn find_column_owner<'a>(forest: &'a [TableNode], column: &str) -> Option<&'a TableNode> {
    forest
        .iter()
        .find(|t| t.columns.iter().any(|c| c.name == column))
}

/// 컬럼의 소속 테이블 조회
pub fn owner_of<'a>(forest: &'a [TableNode], column: &ColumnNode) -> Option<&'a TableNode> {
    find_table(forest, &column.table).or_else(|| find_column_owner(forest, &column.name))
}

/// 모든 테이블 이름
pub fn table_names(forest: &[TableNode]) -> impl Iterator<Item = &str> {
    forest.iter().map(|t| t.name.as_str())
}

//! schema.rb 파싱 및 테이블/컬럼 트리
//!
//! # 모듈 구조
//!
//! - `token`: 한 줄 단위 토크나이저
//! - `parser`: `create_table` 블록 파싱
//! - `table`: 테이블 노드
//! - `column`: 컬럼 노드
//! - `types`: 트리 표시용 노드 종류
//! - `forest`: 포레스트 조회 헬퍼

mod column;
pub mod forest;
mod parser;
mod table;
pub mod token;
mod types;

pub use column::{ColumnNode, PRIMARY_KEY_COLUMN};
pub use forest::Forest;
pub use parser::SchemaParser;
pub use table::TableNode;
pub use types::NodeKind;

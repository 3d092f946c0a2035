//! rds-core: Rails schema.rb 탐색 핵심 라이브러리
//!
//! 이 크레이트는 CLI와 편집기 연동 계층이 공유하는 핵심 타입과 로직을 제공합니다.
//!
//! # 모듈 구조
//!
//! - `schema`: schema.rb 파싱 및 테이블/컬럼 트리
//! - `matcher`: 후보 이름 → 테이블 매칭
//! - `candidate`: 모델 파일에서 후보 이름 생성
//! - `search`: 검색어 필터 뷰
//! - `registry`: 여러 스키마 파일과 활성 스키마 관리
//! - `error`: 공통 에러 타입

pub mod candidate;
pub mod error;
pub mod matcher;
pub mod registry;
pub mod schema;
pub mod search;

pub use error::{Error, Result};
pub use matcher::NameMatcher;
pub use registry::{FsReader, SchemaRegistry, SchemaSource, SourceReader, SourceState};
pub use schema::{ColumnNode, Forest, NodeKind, SchemaParser, TableNode};
pub use search::{SearchIndex, ViewEntry};

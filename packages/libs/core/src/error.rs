//! 공통 에러 타입
//!
//! 파싱 단계의 형식 오류는 에러로 올라오지 않습니다 (파서 내부에서 복구).
//! 여기에는 호출자에게 반드시 알려야 하는 경계 수준의 실패만 정의합니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// rds 공통 에러
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────────
    // Source Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("schema source could not be read: {id}")]
    UnreadableSource {
        id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("schema source is not valid UTF-8: {id}")]
    InvalidEncoding { id: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Registry Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("schema source not found: {id}")]
    SourceNotFound { id: String },
}

impl Error {
    /// 에러 코드 (클라이언트용)
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnreadableSource { .. } => "UNREADABLE_SOURCE",
            Error::InvalidEncoding { .. } => "INVALID_ENCODING",
            Error::SourceNotFound { .. } => "SOURCE_NOT_FOUND",
        }
    }

    /// 에러가 가리키는 스키마 식별자
    pub fn source_id(&self) -> &str {
        match self {
            Error::UnreadableSource { id, .. }
            | Error::InvalidEncoding { id }
            | Error::SourceNotFound { id } => id,
        }
    }
}

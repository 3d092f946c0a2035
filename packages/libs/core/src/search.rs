//! 테이블/컬럼 검색 뷰
//!
//! 현재 검색어를 들고 있다가 포레스트를 받으면 걸러진 뷰를 만듭니다.
//! 테이블 이름이나 컬럼 이름 중 하나라도 검색어를 포함하면 그 테이블 전체(컬럼 포함)가
//! 뷰에 들어갑니다. 컬럼을 잘라내지는 않습니다.

use std::fmt;

use serde::Serialize;

use crate::schema::TableNode;

type Listener = Box<dyn Fn(&str) + Send + Sync>;

/// 뷰 항목
///
/// 실제 테이블과 안내용 요약 항목을 구분하기 위한 태그 열거형입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewEntry<'a> {
    /// 테이블 (원래 컬럼 목록 그대로)
    Table(&'a TableNode),

    /// 검색 결과 요약 (뷰 맨 앞)
    SearchSummary { count: usize, term: String },

    /// 검색 결과 없음
    NoResults { term: String },
}

impl<'a> ViewEntry<'a> {
    /// 트리 표시용 라벨
    pub fn label(&self) -> String {
        match self {
            ViewEntry::Table(table) => table.name.clone(),
            ViewEntry::SearchSummary { count, term } => {
                let noun = if *count == 1 { "table" } else { "tables" };
                format!("Found {} {} matching \"{}\"", count, noun, term)
            }
            ViewEntry::NoResults { term } => {
                format!("No tables or columns match \"{}\"", term)
            }
        }
    }

    pub fn as_table(&self) -> Option<&'a TableNode> {
        match self {
            ViewEntry::Table(table) => Some(table),
            _ => None,
        }
    }
}

/// 검색 인덱스
#[derive(Default)]
pub struct SearchIndex {
    term: String,
    listeners: Vec<Listener>,
}

impl fmt::Debug for SearchIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchIndex")
            .field("term", &self.term)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 검색어 설정 (앞뒤 공백 제거, 소문자 변환). 빈 문자열은 필터 해제.
    pub fn set_term(&mut self, term: &str) {
        self.term = term.trim().to_lowercase();
        tracing::debug!(term = %self.term, "search term changed");

        for listener in &self.listeners {
            listener(self.term.as_str());
        }
    }

    /// 필터 해제
    pub fn clear(&mut self) {
        self.set_term("");
    }

    /// 현재 검색어 (소문자)
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_filtered(&self) -> bool {
        !self.term.is_empty()
    }

    /// 검색어 변경 알림 구독
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// 포레스트의 검색 뷰
    pub fn view<'a>(&self, forest: &'a [TableNode]) -> Vec<ViewEntry<'a>> {
        if !self.is_filtered() {
            return forest.iter().map(ViewEntry::Table).collect();
        }

        let matched: Vec<&TableNode> = forest
            .iter()
            .filter(|table| table.matches_term(&self.term))
            .collect();

        if matched.is_empty() {
            return vec![ViewEntry::NoResults {
                term: self.term.clone(),
            }];
        }

        let mut entries = Vec::with_capacity(matched.len() + 1);
        entries.push(ViewEntry::SearchSummary {
            count: matched.len(),
            term: self.term.clone(),
        });
        entries.extend(matched.into_iter().map(ViewEntry::Table));
        entries
    }
}

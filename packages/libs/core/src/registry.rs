//! 스키마 레지스트리
//!
//! 워크스페이스의 schema.rb 파일들(예: `db/schema.rb`, `db/cache_schema.rb`)을
//! 식별자별로 보관하고, 그중 하나를 활성 스키마로 지정합니다.
//!
//! # 기본 활성 스키마
//!
//! 식별자는 사전순 정렬 후 뒤집어 보관하고, 맨 앞 항목을 기본 활성으로 삼습니다.
//! 즉 사전순으로 뒤에 오는 파일이 우선합니다 (`db/schema.rb`보다 `db/staging_schema.rb`).
//!
//! # 스냅샷
//!
//! 포레스트는 `Arc`로 통째로 교체됩니다. 교체 전에 `active_forest()`로 받아 둔
//! 스냅샷은 계속 완전한 이전 트리를 가리킵니다.

use std::io;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::schema::{Forest, SchemaParser, TableNode};
use crate::search::SearchIndex;

const DEFAULT_FILE_NAME: &str = "schema.rb";

/// 스키마 원문 읽기 (파일 시스템 등 외부 협력자)
pub trait SourceReader {
    fn read_source(&self, id: &str) -> io::Result<Vec<u8>>;
}

impl<F> SourceReader for F
where
    F: Fn(&str) -> io::Result<Vec<u8>>,
{
    fn read_source(&self, id: &str) -> io::Result<Vec<u8>> {
        self(id)
    }
}

/// 식별자를 파일 경로로 보고 읽는 리더
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn read_source(&self, id: &str) -> io::Result<Vec<u8>> {
        std::fs::read(Path::new(id))
    }
}

/// 소스 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceState {
    /// 등록만 되고 아직 파싱되지 않음
    Unloaded,

    /// 파싱 완료 (읽기 실패 시 빈 포레스트)
    Loaded,
}

/// 스키마 소스 하나
#[derive(Debug, Clone)]
pub struct SchemaSource {
    id: String,
    state: SourceState,
    forest: Forest,
    text: Option<Arc<str>>,
}

impl SchemaSource {
    fn new(id: String) -> Self {
        Self {
            id,
            state: SourceState::Unloaded,
            forest: Forest::default(),
            text: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SourceState {
        self.state
    }

    /// 포레스트 스냅샷
    pub fn forest(&self) -> Forest {
        Arc::clone(&self.forest)
    }

    /// 마지막으로 파싱한 원문
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// 파일 이름 (`db/cache_schema.rb` → `cache_schema.rb`)
    pub fn file_name(&self) -> &str {
        self.id
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILE_NAME)
    }

    /// 원문을 파싱해 포레스트와 원문 캐시를 한 번에 교체
    fn replace(&mut self, text: Option<Arc<str>>) {
        let forest = match &text {
            Some(text) => SchemaParser::parse(text),
            None => Vec::new(),
        };
        tracing::debug!(source = %self.id, tables = forest.len(), "schema parsed");

        self.forest = Arc::new(forest);
        self.text = text;
        self.state = SourceState::Loaded;
    }
}

/// 소스 목록 항목 (표시용)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub id: String,
    pub file_name: String,
    pub state: SourceState,
    pub tables: usize,
    pub active: bool,
}

/// 스키마 레지스트리
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    sources: Vec<SchemaSource>,
    active: Option<usize>,
    placeholder: Forest,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 식별자 등록 (파싱하지 않음)
    ///
    /// 사전순 정렬 후 뒤집은 순서로 보관하고 첫 항목을 활성으로 지정합니다.
    /// 기존 소스는 모두 대체됩니다.
    pub fn register<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        ids.sort();
        ids.dedup();
        ids.reverse();

        self.sources = ids.into_iter().map(SchemaSource::new).collect();
        self.active = if self.sources.is_empty() { None } else { Some(0) };

        tracing::info!(
            sources = self.sources.len(),
            active = self.active().map(SchemaSource::id).unwrap_or("<none>"),
            "schema sources registered"
        );
    }

    /// (식별자, 원문) 목록을 등록하고 모두 파싱
    pub fn load<I, S, T>(&mut self, sources: I)
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: AsRef<str>,
    {
        let sources: Vec<(String, T)> = sources
            .into_iter()
            .map(|(id, text)| (id.into(), text))
            .collect();
        self.register(sources.iter().map(|(id, _)| id.clone()));

        for (id, text) in sources {
            if let Some(source) = self.sources.iter_mut().find(|s| s.id == id) {
                source.replace(Some(Arc::from(text.as_ref())));
            }
        }
    }

    /// 리더로 모든 소스를 읽고 파싱
    ///
    /// 읽기에 실패한 소스는 빈 포레스트가 되고 진단 목록에 포함됩니다.
    pub fn load_all(&mut self, reader: &dyn SourceReader) -> Vec<Error> {
        let mut diagnostics = Vec::new();
        for index in 0..self.sources.len() {
            if let Err(err) = self.reload(index, reader) {
                diagnostics.push(err);
            }
        }
        diagnostics
    }

    /// 활성 소스만 다시 읽고 파싱
    pub fn refresh_active(&mut self, reader: &dyn SourceReader) -> Result<()> {
        match self.active {
            Some(index) => self.reload(index, reader),
            None => Ok(()),
        }
    }

    /// 활성 소스가 아직 파싱되지 않았으면 파싱
    pub fn ensure_active_loaded(&mut self, reader: &dyn SourceReader) -> Result<()> {
        let unloaded = self
            .active()
            .is_some_and(|source| source.state == SourceState::Unloaded);

        if unloaded {
            self.refresh_active(reader)
        } else {
            Ok(())
        }
    }

    /// 활성 소스 변경
    pub fn set_active(&mut self, id: &str) -> Result<()> {
        let index = self
            .sources
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| Error::SourceNotFound { id: id.to_string() })?;

        self.active = Some(index);
        tracing::info!(source = %id, "active schema changed");
        Ok(())
    }

    /// 활성 소스의 포레스트 스냅샷 (소스가 없으면 빈 포레스트)
    pub fn active_forest(&self) -> Forest {
        match self.active() {
            Some(source) => source.forest(),
            None => Arc::clone(&self.placeholder),
        }
    }

    pub fn active(&self) -> Option<&SchemaSource> {
        self.active.and_then(|index| self.sources.get(index))
    }

    pub fn sources(&self) -> &[SchemaSource] {
        &self.sources
    }

    pub fn get(&self, id: &str) -> Option<&SchemaSource> {
        self.sources.iter().find(|s| s.id == id)
    }

    pub fn has_multiple(&self) -> bool {
        self.sources.len() > 1
    }

    /// 표시용 소스 목록
    pub fn summaries(&self) -> Vec<SourceSummary> {
        self.sources
            .iter()
            .enumerate()
            .map(|(index, source)| SourceSummary {
                id: source.id.clone(),
                file_name: source.file_name().to_string(),
                state: source.state,
                tables: source.forest.len(),
                active: self.active == Some(index),
            })
            .collect()
    }

    /// 활성 원문에서 테이블 선언 줄 찾기 (0부터 시작)
    pub fn locate_table(&self, table: &str) -> Option<usize> {
        let text = self.active()?.text()?;
        SchemaParser::locate_declaration(text, table)
    }

    /// 활성 포레스트에서 테이블 조회
    pub fn find_table(&self, name: &str) -> Option<TableNode> {
        let forest = self.active_forest();
        crate::schema::forest::find_table(&forest, name).cloned()
    }

    /// 트리 뷰 제목
    ///
    /// 스키마가 여러 개면 활성 파일 이름을, 필터가 걸려 있으면 검색어를 붙입니다.
    pub fn view_title(&self, search: &SearchIndex) -> String {
        let mut title = String::new();

        if self.has_multiple() {
            if let Some(source) = self.active() {
                title.push_str(source.file_name());
            }
        }

        if search.is_filtered() {
            let filter = format!("(Filtered: \"{}\")", search.term());
            if title.is_empty() {
                title = filter;
            } else {
                title = format!("{} {}", title, filter);
            }
        }

        title
    }

    fn reload(&mut self, index: usize, reader: &dyn SourceReader) -> Result<()> {
        let Some(source) = self.sources.get_mut(index) else {
            return Ok(());
        };

        let bytes = match reader.read_source(&source.id) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(source = %source.id, error = %err, "schema source could not be read");
                source.replace(None);
                return Err(Error::UnreadableSource {
                    id: source.id.clone(),
                    source: err,
                });
            }
        };

        match SchemaParser::decode(&source.id, &bytes) {
            Ok(text) => {
                source.replace(Some(Arc::from(text)));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(source = %source.id, "schema source is not valid UTF-8");
                source.replace(None);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const MAIN: &str = r#"
  create_table "users" do |t|
    t.string "email"
  end
"#;

    const CACHE: &str = r#"
  create_table "solid_cache_entries" do |t|
    t.binary "key", null: false
  end
  create_table "users_cache" do |t|
  end
"#;

    fn reader(files: HashMap<&'static str, &'static str>) -> impl Fn(&str) -> io::Result<Vec<u8>> {
        move |id: &str| {
            files
                .get(id)
                .map(|text| text.as_bytes().to_vec())
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, id.to_string()))
        }
    }

    #[test]
    fn test_lexicographically_later_source_is_default_active() {
        let mut registry = SchemaRegistry::new();
        registry.load([("a/schema.rb", MAIN), ("b/schema.rb", CACHE)]);

        assert_eq!(registry.active().unwrap().id(), "b/schema.rb");
        let ids: Vec<&str> = registry.sources().iter().map(SchemaSource::id).collect();
        assert_eq!(ids, vec!["b/schema.rb", "a/schema.rb"]);
        assert_eq!(registry.active_forest().len(), 2);
    }

    #[test]
    fn test_empty_registry_uses_placeholder() {
        let mut registry = SchemaRegistry::new();
        registry.load(Vec::<(String, String)>::new());

        assert!(registry.active().is_none());
        assert!(registry.active_forest().is_empty());
        assert!(registry.refresh_active(&FsReader).is_ok());
    }

    #[test]
    fn test_set_active_unknown_id_leaves_active_unchanged() {
        let mut registry = SchemaRegistry::new();
        registry.load([("db/schema.rb", MAIN), ("db/cache_schema.rb", CACHE)]);

        let err = registry.set_active("db/missing.rb").unwrap_err();
        assert_eq!(err.code(), "SOURCE_NOT_FOUND");
        assert_eq!(registry.active().unwrap().id(), "db/schema.rb");

        registry.set_active("db/cache_schema.rb").unwrap();
        assert_eq!(registry.active_forest()[0].name, "solid_cache_entries");
    }

    #[test]
    fn test_refresh_swaps_forest_and_keeps_old_snapshot() {
        let files = std::sync::Mutex::new(MAIN);
        let read = |_: &str| -> io::Result<Vec<u8>> { Ok(files.lock().unwrap().as_bytes().to_vec()) };

        let mut registry = SchemaRegistry::new();
        registry.register(["db/schema.rb"]);
        assert_eq!(registry.active().unwrap().state(), SourceState::Unloaded);

        registry.ensure_active_loaded(&read).unwrap();
        let before = registry.active_forest();
        assert_eq!(before.len(), 1);

        *files.lock().unwrap() = CACHE;
        registry.refresh_active(&read).unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].name, "users");
        assert_eq!(registry.active_forest().len(), 2);
        assert_eq!(registry.active().unwrap().text(), Some(CACHE));
    }

    #[test]
    fn test_unreadable_source_degrades_to_empty_forest() {
        let mut registry = SchemaRegistry::new();
        registry.register(["db/schema.rb", "db/gone_schema.rb"]);

        let diagnostics = registry.load_all(&reader(HashMap::from([("db/schema.rb", MAIN)])));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), "UNREADABLE_SOURCE");
        assert_eq!(diagnostics[0].source_id(), "db/gone_schema.rb");

        let gone = registry.get("db/gone_schema.rb").unwrap();
        assert_eq!(gone.state(), SourceState::Loaded);
        assert!(gone.forest().is_empty());
        assert_eq!(registry.get("db/schema.rb").unwrap().forest().len(), 1);
    }

    #[test]
    fn test_invalid_utf8_is_reported() {
        let mut registry = SchemaRegistry::new();
        registry.register(["db/schema.rb"]);

        let read = |_: &str| -> io::Result<Vec<u8>> { Ok(vec![0xff, 0xfe]) };
        let err = registry.refresh_active(&read).unwrap_err();
        assert_eq!(err.code(), "INVALID_ENCODING");
        assert!(registry.active_forest().is_empty());
    }

    #[test]
    fn test_leading_bom_is_stripped_on_load() {
        let mut registry = SchemaRegistry::new();
        registry.register(["db/schema.rb"]);

        let read = |_: &str| -> io::Result<Vec<u8>> {
            let mut bytes = b"\xef\xbb\xbf".to_vec();
            bytes.extend_from_slice(MAIN.as_bytes());
            Ok(bytes)
        };
        registry.refresh_active(&read).unwrap();

        assert_eq!(registry.active().unwrap().text(), Some(MAIN));
        assert_eq!(registry.active_forest()[0].name, "users");
    }

    #[test]
    fn test_view_title_and_locate() {
        let mut registry = SchemaRegistry::new();
        registry.load([("db/schema.rb", MAIN)]);
        let mut search = SearchIndex::new();

        assert_eq!(registry.view_title(&search), "");
        search.set_term("User");
        assert_eq!(registry.view_title(&search), "(Filtered: \"user\")");

        registry.load([("db/schema.rb", MAIN), ("db/cache_schema.rb", CACHE)]);
        assert_eq!(registry.view_title(&search), "schema.rb (Filtered: \"user\")");

        assert_eq!(registry.locate_table("users"), Some(1));
        assert!(registry.find_table("users").is_some());
    }

    #[test]
    fn test_summaries_mark_active() {
        let mut registry = SchemaRegistry::new();
        registry.load([("db/schema.rb", MAIN), ("db/cache_schema.rb", CACHE)]);

        let summaries = registry.summaries();
        assert_eq!(summaries.len(), 2);
        assert!(summaries[0].active);
        assert_eq!(summaries[0].file_name, "schema.rb");
        assert_eq!(summaries[0].tables, 1);
        assert!(!summaries[1].active);
    }
}

//! schema.rb 파서
//!
//! `create_table ... do |t| ... end` 블록을 순서대로 찾아 테이블/컬럼 포레스트로
//! 변환합니다. 형식이 깨진 블록이나 줄은 에러 없이 건너뜁니다.

use std::collections::HashMap;

use super::column::ColumnNode;
use super::table::TableNode;
use super::token::{tokenize_line, Token, TokenKind};
use crate::error::{Error, Result};

const TABLE_KEYWORD: &str = "create_table";
const INDEX_METHOD: &str = "index";
const DEFAULT_BLOCK_VAR: &str = "t";
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// 스키마 파서
pub struct SchemaParser;

/// 선언 줄부터 블록 끝을 찾은 결과
enum BlockScan {
    /// `end` 줄의 인덱스
    Terminated(usize),

    /// `end` 전에 다음 선언이 나옴 (다음 선언 줄의 인덱스)
    Interrupted(usize),

    /// 입력 끝까지 `end` 없음
    Unterminated,
}

impl SchemaParser {
    /// 스키마 텍스트 파싱
    ///
    /// 같은 이름의 테이블이 다시 선언되면 뒤의 선언이 앞의 항목을 그 자리에서 덮어씁니다.
    pub fn parse(text: &str) -> Vec<TableNode> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let lines: Vec<&str> = text.lines().collect();

        let mut tables: Vec<TableNode> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut cursor = 0;

        while cursor < lines.len() {
            if !Self::is_declaration(lines[cursor]) {
                cursor += 1;
                continue;
            }

            match Self::scan_block(&lines, cursor) {
                BlockScan::Terminated(end) => {
                    match Self::parse_block(&lines[cursor..end]) {
                        Some(table) => match positions.get(&table.name) {
                            Some(&position) => {
                                tracing::debug!(table = %table.name, "table redeclared, later declaration wins");
                                tables[position] = table;
                            }
                            None => {
                                positions.insert(table.name.clone(), tables.len());
                                tables.push(table);
                            }
                        },
                        None => {
                            tracing::debug!(line = cursor + 1, "skipping create_table block without a readable name");
                        }
                    }
                    cursor = end + 1;
                }
                BlockScan::Interrupted(next) => {
                    tracing::debug!(line = cursor + 1, "skipping create_table block interrupted by another declaration");
                    cursor = next;
                }
                BlockScan::Unterminated => {
                    tracing::debug!(line = cursor + 1, "skipping unterminated create_table block");
                    cursor += 1;
                }
            }
        }

        tables
    }

    /// 원시 바이트 파싱 (UTF-8 디코딩 실패만 에러)
    pub fn parse_bytes(id: &str, bytes: &[u8]) -> Result<Vec<TableNode>> {
        Ok(Self::parse(Self::decode(id, bytes)?))
    }

    /// UTF-8 디코딩 (앞의 BOM 제거)
    pub fn decode<'a>(id: &str, bytes: &'a [u8]) -> Result<&'a str> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        std::str::from_utf8(bytes).map_err(|_| Error::InvalidEncoding {
            id: id.to_string(),
        })
    }

    /// 테이블 선언 줄 찾기 (0부터 시작하는 줄 번호)
    ///
    /// 여러 줄이 일치하면 마지막 줄을 반환합니다.
    pub fn locate_declaration(text: &str, table: &str) -> Option<usize> {
        let needle = format!("{} \"{}\"", TABLE_KEYWORD, table);
        text.lines()
            .enumerate()
            .filter(|(_, line)| line.trim_start().starts_with(&needle))
            .map(|(index, _)| index)
            .last()
    }

    fn is_declaration(line: &str) -> bool {
        line.trim_start()
            .strip_prefix(TABLE_KEYWORD)
            .is_some_and(|rest| {
                !rest
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
            })
    }

    fn is_terminator(line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed == "end" {
            return true;
        }
        trimmed.starts_with("end")
            && matches!(tokenize_line(trimmed).as_deref(), Ok([token]) if token.is_ident("end"))
    }

    fn scan_block(lines: &[&str], start: usize) -> BlockScan {
        for (offset, line) in lines[start + 1..].iter().enumerate() {
            let index = start + 1 + offset;
            if Self::is_terminator(line) {
                return BlockScan::Terminated(index);
            }
            if Self::is_declaration(line) {
                return BlockScan::Interrupted(index);
            }
        }
        BlockScan::Unterminated
    }

    /// 블록 파싱 (`block[0]`은 선언 줄, 종료 줄은 포함하지 않음)
    fn parse_block(block: &[&str]) -> Option<TableNode> {
        let header = match tokenize_line(block[0]) {
            Ok(tokens) => tokens,
            Err(err) => {
                tracing::debug!(?err, "create_table header could not be tokenized");
                return None;
            }
        };

        let name = header[1..].iter().find_map(Token::as_str)?.to_string();
        let mut table = TableNode::new(name);

        if let Some(comment) = option_value(&header, "comment").and_then(Token::as_str) {
            table.comment = comment.to_string();
        }

        if let Some(column) = Self::header_primary_key(&header, &table.name) {
            table.columns.push(column);
        }

        let block_var = block_variable(&header).unwrap_or(DEFAULT_BLOCK_VAR);

        for line in &block[1..] {
            let tokens = match tokenize_line(line) {
                Ok(tokens) => tokens,
                Err(err) => {
                    tracing::debug!(table = %table.name, ?err, "skipping column line that could not be tokenized");
                    continue;
                }
            };

            if let Some(column) = Self::parse_column(line, &tokens, block_var, &table.name) {
                table.columns.push(column);
            }
        }

        Some(table)
    }

    /// `create_table "x", id: :uuid, primary_key: "uid" do |t|` 의 기본키 컬럼
    fn header_primary_key(header: &[Token], table: &str) -> Option<ColumnNode> {
        let key = option_index(header, "primary_key")?;

        let name = header[key + 2..]
            .iter()
            .take_while(|t| t.kind != TokenKind::Comma)
            .find_map(|t| t.as_str().or_else(|| t.as_symbol()))
            .unwrap_or_default();

        let declared_type = option_value(header, "id")
            .and_then(Token::as_symbol)
            .map(str::to_string);

        Some(ColumnNode {
            name: name.to_string(),
            declared_type,
            is_primary_key: true,
            extra_options: String::new(),
            comment: String::new(),
            table: table.to_string(),
        })
    }

    /// `t.<type> "name", <options>` 한 줄
    fn parse_column(line: &str, tokens: &[Token], block_var: &str, table: &str) -> Option<ColumnNode> {
        let method = match tokens {
            [receiver, dot, method, ..] if receiver.is_ident(block_var) && dot.kind == TokenKind::Dot => {
                match &method.kind {
                    TokenKind::Ident(name) if name != INDEX_METHOD => name.clone(),
                    _ => return None,
                }
            }
            _ => return None,
        };

        let name = tokens[3..]
            .iter()
            .find_map(Token::as_str)
            .unwrap_or_default()
            .to_string();

        let comment_key = option_index(tokens, "comment");
        let comment = comment_key
            .and_then(|key| tokens.get(key + 2))
            .and_then(Token::as_str)
            .unwrap_or_default()
            .to_string();

        let extra_options = match tokens.iter().position(|t| t.kind == TokenKind::Comma) {
            Some(comma) => {
                let from = tokens[comma].span.end;
                let to = match comment_key {
                    Some(key) => tokens[key].span.start,
                    None => tokens.last().map(|t| t.span.end).unwrap_or(from),
                };
                line.get(from..to.max(from))
                    .unwrap_or_default()
                    .trim()
                    .trim_end_matches(',')
                    .trim_end()
                    .to_string()
            }
            None => String::new(),
        };

        let is_primary_key = ColumnNode::is_conventional_primary_key(&name)
            || option_index(tokens, "primary_key").is_some();

        Some(ColumnNode {
            name,
            declared_type: Some(method),
            is_primary_key,
            extra_options,
            comment,
            table: table.to_string(),
        })
    }
}

/// `key:` 형태 옵션 키의 토큰 위치
fn option_index(tokens: &[Token], key: &str) -> Option<usize> {
    tokens.windows(3).position(|w| {
        matches!(w[0].kind, TokenKind::Comma | TokenKind::Open(_))
            && w[1].is_ident(key)
            && w[2].kind == TokenKind::Colon
    })
    .map(|index| index + 1)
}

/// `key: value`의 값 토큰
fn option_value<'a>(tokens: &'a [Token], key: &str) -> Option<&'a Token> {
    option_index(tokens, key).and_then(|index| tokens.get(index + 2))
}

/// `do |t|`의 블록 변수
fn block_variable(header: &[Token]) -> Option<&str> {
    match header {
        [.., open, var, close] if open.kind == TokenKind::Pipe && close.kind == TokenKind::Pipe => {
            match &var.kind {
                TokenKind::Ident(name) => Some(name),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
# This file is auto-generated from the current state of the database.
ActiveRecord::Schema[7.1].define(version: 2024_05_01_120000) do
  enable_extension "plpgsql"

  create_table "users", force: :cascade, comment: "Registered users" do |t|
    t.string "email", default: "", null: false, comment: "user email"
    t.string "name"
    t.datetime "created_at", null: false
    t.index ["email"], name: "index_users_on_email", unique: true
  end

  create_table "orders", id: :uuid, primary_key: "order_id", force: :cascade do |t|
    t.bigint "user_id", null: false
    t.decimal "total", precision: 10, scale: 2
    t.index ["user_id"], name: "index_orders_on_user_id"
  end

  add_foreign_key "orders", "users"
end
"#;

    fn names(tables: &[TableNode]) -> Vec<&str> {
        tables.iter().map(|t| t.name.as_str()).collect()
    }

    fn column_names(table: &TableNode) -> Vec<&str> {
        table.columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_parse_tables_in_source_order() {
        let tables = SchemaParser::parse(SCHEMA);
        assert_eq!(names(&tables), vec!["users", "orders"]);

        let users = &tables[0];
        assert_eq!(users.comment, "Registered users");
        assert_eq!(column_names(users), vec!["email", "name", "created_at"]);
    }

    #[test]
    fn test_parse_column_fields() {
        let tables = SchemaParser::parse(SCHEMA);
        let email = tables[0].find_column("email").unwrap();

        assert_eq!(email.declared_type.as_deref(), Some("string"));
        assert_eq!(email.extra_options, r#"default: "", null: false"#);
        assert_eq!(email.comment, "user email");
        assert_eq!(email.table, "users");
        assert!(!email.is_primary_key);

        let created_at = tables[0].find_column("created_at").unwrap();
        assert_eq!(created_at.extra_options, "null: false");
        assert_eq!(created_at.comment, "");

        let name = tables[0].find_column("name").unwrap();
        assert_eq!(name.extra_options, "");
    }

    #[test]
    fn test_header_primary_key_column() {
        let tables = SchemaParser::parse(SCHEMA);
        let orders = &tables[1];

        assert_eq!(column_names(orders), vec!["order_id", "user_id", "total"]);
        let pk = &orders.columns[0];
        assert!(pk.is_primary_key);
        assert_eq!(pk.declared_type.as_deref(), Some("uuid"));
        assert_eq!(pk.table, "orders");
        assert!(!orders.columns[1].is_primary_key);
    }

    #[test]
    fn test_primary_key_detection() {
        let text = r#"
  create_table "accounts", id: false, force: :cascade do |t|
    t.bigint "id", null: false
    t.string "code", primary_key: true
    t.string "label"
  end
"#;
        let tables = SchemaParser::parse(text);
        let flags: Vec<bool> = tables[0].columns.iter().map(|c| c.is_primary_key).collect();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[test]
    fn test_malformed_line_does_not_abort_table() {
        let text = r#"
  create_table "users", primary_key: "id", id: :bigint, force: :cascade do |t|
    t.string "email", null: false, comment: "user email"
    t.string "nickname, null: false
  end
"#;
        let tables = SchemaParser::parse(text);
        assert_eq!(tables.len(), 1);

        let users = &tables[0];
        assert_eq!(users.name, "users");
        assert_eq!(column_names(users), vec!["id", "email"]);
        assert!(users.columns[0].is_primary_key);
        assert_eq!(users.columns[0].declared_type.as_deref(), Some("bigint"));
        assert_eq!(users.columns[1].comment, "user email");
    }

    #[test]
    fn test_unterminated_block_is_skipped() {
        let text = r#"
  create_table "broken", force: :cascade do |t|
    t.string "a"

  create_table "posts", force: :cascade do |t|
    t.string "title"
  end

  create_table "tail", force: :cascade do |t|
    t.string "b"
"#;
        let tables = SchemaParser::parse(text);
        assert_eq!(names(&tables), vec!["posts"]);
        assert_eq!(column_names(&tables[0]), vec!["title"]);
    }

    #[test]
    fn test_redeclared_table_keeps_later_fields() {
        let text = r#"
  create_table "users" do |t|
    t.string "old_name"
  end
  create_table "posts" do |t|
  end
  create_table "users", comment: "second" do |t|
    t.string "new_name"
  end
"#;
        let tables = SchemaParser::parse(text);
        assert_eq!(names(&tables), vec!["users", "posts"]);
        assert_eq!(tables[0].comment, "second");
        assert_eq!(column_names(&tables[0]), vec!["new_name"]);
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(SchemaParser::parse(SCHEMA), SchemaParser::parse(SCHEMA));
    }

    #[test]
    fn test_empty_and_unrecognized_input() {
        assert!(SchemaParser::parse("").is_empty());
        assert!(SchemaParser::parse("puts 'hello'\n").is_empty());
        assert!(SchemaParser::parse("create_table_options = {}\nend\n").is_empty());
    }

    #[test]
    fn test_field_level_failures_still_emit_column() {
        let text = r#"
  create_table "events" do |t|
    t.timestamps null: false
  end
"#;
        let tables = SchemaParser::parse(text);
        let column = &tables[0].columns[0];
        assert_eq!(column.name, "");
        assert_eq!(column.declared_type.as_deref(), Some("timestamps"));
        assert_eq!(column.extra_options, "");
    }

    #[test]
    fn test_custom_block_variable_and_trailing_comments() {
        let text = r#"
  create_table "tags" do |table| # generated
    table.string "label", comment: "shown in UI" # trailing
  end # tags
"#;
        let tables = SchemaParser::parse(text);
        let label = tables[0].find_column("label").unwrap();
        assert_eq!(label.comment, "shown in UI");
    }

    #[test]
    fn test_parse_bytes_rejects_invalid_utf8() {
        let err = SchemaParser::parse_bytes("db/schema.rb", &[0xff, 0xfe, 0x00]).unwrap_err();
        assert_eq!(err.code(), "INVALID_ENCODING");

        let tables = SchemaParser::parse_bytes("db/schema.rb", SCHEMA.as_bytes()).unwrap();
        assert_eq!(tables.len(), 2);
    }

    #[test]
    fn test_decode_strips_bom() {
        let mut bytes = b"\xef\xbb\xbf".to_vec();
        bytes.extend_from_slice(SCHEMA.as_bytes());

        let text = SchemaParser::decode("db/schema.rb", &bytes).unwrap();
        assert!(!text.starts_with('\u{feff}'));
        assert_eq!(SchemaParser::parse_bytes("db/schema.rb", &bytes).unwrap().len(), 2);
    }

    #[test]
    fn test_locate_declaration_prefers_last_match() {
        let text = "  create_table \"users\" do |t|\n  end\n  create_table \"users\" do |t|\n  end\n";
        assert_eq!(SchemaParser::locate_declaration(text, "users"), Some(2));
        assert_eq!(SchemaParser::locate_declaration(text, "user"), None);
        assert_eq!(SchemaParser::locate_declaration(SCHEMA, "orders"), Some(12));
    }
}

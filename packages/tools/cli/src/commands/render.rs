//! 텍스트/JSON 출력

use rds_core::{ColumnNode, NodeKind, TableNode, ViewEntry};
use serde::Serialize;

use crate::OutputFormat;

/// JSON 출력
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 뷰 제목 (비어 있으면 출력하지 않음)
pub fn print_title(title: &str) {
    if !title.is_empty() {
        println!("{}", title);
        println!();
    }
}

/// 테이블 한 줄 (+ 펼치면 컬럼들)
pub fn table_lines(table: &TableNode, expand: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(table.columns.len() + 1);

    let mut header = table.label().to_string();
    if !table.comment.is_empty() {
        header.push_str(&format!("  # {}", table.comment));
    }
    lines.push(header);

    if expand {
        lines.extend(table.columns.iter().map(column_line));
    }
    lines
}

/// 컬럼 한 줄: `  * id (bigint)  null: false  # comment`
pub fn column_line(column: &ColumnNode) -> String {
    let marker = match column.kind() {
        NodeKind::PrimaryKey => '*',
        _ => '-',
    };

    let mut line = format!("  {} {}", marker, column.label());
    if !column.extra_options.is_empty() {
        line.push_str(&format!("  {}", column.extra_options));
    }
    if !column.comment.is_empty() {
        line.push_str(&format!("  # {}", column.comment));
    }
    line
}

/// 검색 뷰 출력
pub fn print_view(entries: &[ViewEntry<'_>], expand: bool, format: OutputFormat) -> anyhow::Result<()> {
    if let OutputFormat::Json = format {
        return print_json(entries);
    }

    for entry in entries {
        match entry {
            ViewEntry::Table(table) => {
                for line in table_lines(table, expand) {
                    println!("{}", line);
                }
            }
            _ => {
                println!("{}", entry.label());
                println!();
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rds_core::SchemaParser;

    #[test]
    fn test_table_and_column_lines() {
        let text = r#"
  create_table "users", primary_key: "id", id: :bigint, comment: "Registered users" do |t|
    t.string "email", null: false, comment: "user email"
  end
"#;
        let forest = SchemaParser::parse(text);
        let lines = table_lines(&forest[0], true);

        assert_eq!(
            lines,
            vec![
                "users  # Registered users".to_string(),
                "  * id (bigint)".to_string(),
                "  - email (string)  null: false  # user email".to_string(),
            ]
        );
        assert_eq!(table_lines(&forest[0], false).len(), 1);
    }
}

//! 워크스페이스에서 schema.rb 파일 찾기

use std::path::{Component, Path};

use anyhow::Context as _;

/// `root` 아래에서 `pattern`에 맞는 스키마 파일 경로 목록
///
/// `exclude`에 있는 이름의 디렉터리를 거치는 경로는 제외합니다.
/// 정렬/활성 선택은 레지스트리가 담당합니다.
pub fn discover_schemas(root: &Path, pattern: &str, exclude: &[String]) -> anyhow::Result<Vec<String>> {
    let full_pattern = root.join(pattern).display().to_string();
    let mut found = Vec::new();

    for entry in glob::glob(&full_pattern).with_context(|| format!("invalid schema glob: {}", pattern))? {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable path during discovery");
                continue;
            }
        };

        if !path.is_file() || is_excluded(path.strip_prefix(root).unwrap_or(&path), exclude) {
            continue;
        }

        found.push(path.display().to_string());
    }

    tracing::debug!(pattern = %full_pattern, count = found.len(), "schema files discovered");
    Ok(found)
}

fn is_excluded(path: &Path, exclude: &[String]) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => exclude.iter().any(|e| name.to_str() == Some(e.as_str())),
        _ => false,
    })
}

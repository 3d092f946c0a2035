//! 모델 파일 → 후보 테이블 이름
//!
//! 현재 열려 있는 모델 파일(`app/models/**/*.rb`)에서 "사용자가 찾는 테이블"일
//! 가능성이 높은 이름들을 우선순위 순으로 만듭니다.
//!
//! 1. `self.table_name = "..."` 명시값
//! 2. `models/` 이후 경로를 `_`로 이어 복수형으로 만든 이름 (`admin/user.rb` → `admin_users`)
//! 3. 파일 이름 (`user.rb` → `user`)

use inflector::string::pluralize::to_plural;

const MODELS_DIR: &str = "models/";
const RUBY_EXT: &str = ".rb";

/// inflector 규칙표에 없는 ActiveSupport 복수형 접미사
const EXTRA_PLURAL_SUFFIXES: &[(&str, &str)] = &[("quiz", "quizzes")];

/// 후보 이름 생성기
pub struct CandidateNames;

impl CandidateNames {
    /// `models/` 디렉터리 아래의 Ruby 파일인지 여부
    pub fn is_model_path(path: &str) -> bool {
        let path = normalize(path);
        path.ends_with(RUBY_EXT) && model_relative(&path).is_some()
    }

    /// 모델 파일 경로와 내용으로 후보 목록 생성 (중복/빈 값 제거)
    pub fn from_model(path: &str, source: &str) -> Vec<String> {
        let guesses = [
            Self::custom_table_name(source),
            Self::model_table_name(path),
            Self::file_stem(path),
        ];

        let mut candidates: Vec<String> = Vec::new();
        for guess in guesses.into_iter().flatten() {
            if !guess.is_empty() && !candidates.contains(&guess) {
                candidates.push(guess);
            }
        }
        candidates
    }

    /// `self.table_name = "legacy_users"` 명시값
    pub fn custom_table_name(source: &str) -> Option<String> {
        source.lines().find_map(|line| {
            let (_, rest) = line.split_once(".table_name")?;
            let rest = rest.trim_start().strip_prefix('=')?;
            if rest.starts_with('=') {
                return None;
            }
            let value: String = rest.trim().chars().filter(|c| *c != '"' && *c != '\'').collect();
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        })
    }

    /// `app/models/admin/user.rb` → `admin_users`
    pub fn model_table_name(path: &str) -> Option<String> {
        let path = normalize(path);
        let relative = model_relative(&path)?;
        let relative = relative.strip_suffix(RUBY_EXT)?;
        if relative.is_empty() {
            return None;
        }
        Some(pluralize(&relative.replace('/', "_")))
    }

    /// `app/models/user.rb` → `user`
    pub fn file_stem(path: &str) -> Option<String> {
        let path = normalize(path);
        let file = path.rsplit('/').next()?;
        let stem = file.strip_suffix(RUBY_EXT)?;
        (!stem.is_empty()).then(|| stem.to_string())
    }
}

/// 영어 복수형 (snake_case의 마지막 단어만 변환)
pub fn pluralize(word: &str) -> String {
    match word.rsplit_once('_') {
        Some((prefix, last)) if !last.is_empty() => format!("{}_{}", prefix, plural_word(last)),
        _ if word.is_empty() => String::new(),
        _ => plural_word(word),
    }
}

fn plural_word(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    for (suffix, plural) in EXTRA_PLURAL_SUFFIXES {
        if lower.ends_with(suffix) {
            return format!("{}{}", &word[..word.len() - suffix.len()], plural);
        }
    }
    to_plural(word)
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

/// `models/` 이후의 상대 경로
fn model_relative(path: &str) -> Option<&str> {
    path.find(MODELS_DIR)
        .filter(|index| *index == 0 || path[..*index].ends_with('/'))
        .map(|index| &path[index + MODELS_DIR.len()..])
}

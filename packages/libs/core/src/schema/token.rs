//! schema.rb 한 줄 단위 토크나이저
//!
//! schema.rb는 줄 단위로 선언이 나열되는 형식이므로, 파서는 줄마다 토큰을 만들고
//! 토큰 열을 보고 테이블/컬럼 선언을 판별합니다. 각 토큰은 원문 바이트 범위를
//! 가지고 있어 옵션 텍스트를 그대로 잘라낼 수 있습니다.

use std::ops::Range;

/// 토큰 종류
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `"..."` 또는 `'...'` (이스케이프 해제된 값)
    Str(String),

    /// `create_table`, `t`, `string`, `null`, `true` ...
    Ident(String),

    /// `:cascade` 형태의 심볼 (콜론 제외한 이름)
    Symbol(String),

    /// 숫자 리터럴 (`2024_01_01_000000`, `3.5`, `-1`)
    Number(String),

    Colon,
    Comma,
    Dot,
    Pipe,
    /// `=>`
    Arrow,
    Open(char),
    Close(char),

    /// 그 외 구두점
    Other(char),
}

/// 원문 범위를 가진 토큰
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

/// 줄 단위 렉싱 실패
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// 닫히지 않은 문자열 (시작 위치)
    UnterminatedString { start: usize },
}

impl Token {
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(s) if s == name)
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

/// 한 줄을 토큰 열로 변환
///
/// 문자열 밖의 `#`부터는 Ruby 주석이므로 무시합니다.
pub fn tokenize_line(line: &str) -> Result<Vec<Token>, LexError> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let ch = bytes[pos];
        let start = pos;

        match ch {
            b' ' | b'\t' | b'\r' | b'\n' => {
                pos += 1;
            }
            b'#' => break,
            b'"' | b'\'' => {
                let (value, end) = lex_string(line, pos)?;
                pos = end;
                tokens.push(Token {
                    kind: TokenKind::Str(value),
                    span: start..pos,
                });
            }
            b':' => {
                if bytes.get(pos + 1) == Some(&b':') {
                    // `::` 스코프 연산자
                    for offset in 0..2 {
                        tokens.push(Token {
                            kind: TokenKind::Colon,
                            span: start + offset..start + offset + 1,
                        });
                    }
                    pos += 2;
                } else if bytes.get(pos + 1).is_some_and(|b| is_ident_start(*b)) {
                    pos += 1;
                    pos = scan_ident(bytes, pos);
                    tokens.push(Token {
                        kind: TokenKind::Symbol(line[start + 1..pos].to_string()),
                        span: start..pos,
                    });
                } else if bytes.get(pos + 1).is_some_and(|b| *b == b'"' || *b == b'\'') {
                    // :"quoted symbol"
                    let (value, end) = lex_string(line, pos + 1)?;
                    pos = end;
                    tokens.push(Token {
                        kind: TokenKind::Symbol(value),
                        span: start..pos,
                    });
                } else {
                    pos += 1;
                    tokens.push(Token {
                        kind: TokenKind::Colon,
                        span: start..pos,
                    });
                }
            }
            b'=' if bytes.get(pos + 1) == Some(&b'>') => {
                pos += 2;
                tokens.push(Token {
                    kind: TokenKind::Arrow,
                    span: start..pos,
                });
            }
            b',' | b'.' | b'|' | b'(' | b'[' | b'{' | b')' | b']' | b'}' => {
                pos += 1;
                let kind = match ch {
                    b',' => TokenKind::Comma,
                    b'.' => TokenKind::Dot,
                    b'|' => TokenKind::Pipe,
                    b'(' | b'[' | b'{' => TokenKind::Open(ch as char),
                    _ => TokenKind::Close(ch as char),
                };
                tokens.push(Token {
                    kind,
                    span: start..pos,
                });
            }
            b'-' if bytes.get(pos + 1).is_some_and(|b| b.is_ascii_digit()) => {
                pos = scan_number(bytes, pos + 1);
                tokens.push(Token {
                    kind: TokenKind::Number(line[start..pos].to_string()),
                    span: start..pos,
                });
            }
            b'0'..=b'9' => {
                pos = scan_number(bytes, pos);
                tokens.push(Token {
                    kind: TokenKind::Number(line[start..pos].to_string()),
                    span: start..pos,
                });
            }
            _ if is_ident_start(ch) => {
                pos = scan_ident(bytes, pos);
                tokens.push(Token {
                    kind: TokenKind::Ident(line[start..pos].to_string()),
                    span: start..pos,
                });
            }
            _ => {
                // 멀티바이트 문자는 문자 단위로 건너뜀
                let other = line[pos..].chars().next().unwrap_or('?');
                pos += other.len_utf8();
                tokens.push(Token {
                    kind: TokenKind::Other(other),
                    span: start..pos,
                });
            }
        }
    }

    Ok(tokens)
}

/// `start` 위치의 따옴표부터 문자열을 읽어 (값, 닫는 따옴표 다음 위치) 반환
fn lex_string(line: &str, start: usize) -> Result<(String, usize), LexError> {
    let quote = line.as_bytes()[start] as char;
    let mut value = String::new();
    let mut chars = line[start + 1..].char_indices();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, 'n')) if quote == '"' => value.push('\n'),
                Some((_, 't')) if quote == '"' => value.push('\t'),
                Some((_, escaped)) if escaped == quote || escaped == '\\' => value.push(escaped),
                Some((_, escaped)) => {
                    value.push('\\');
                    value.push(escaped);
                }
                None => break,
            },
            _ if ch == quote => return Ok((value, start + 1 + offset + 1)),
            _ => value.push(ch),
        }
    }

    Err(LexError::UnterminatedString { start })
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn scan_ident(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
        pos += 1;
    }
    // Ruby 메서드명 접미사 (`present?`, `save!`)
    if pos < bytes.len() && (bytes[pos] == b'?' || bytes[pos] == b'!') {
        pos += 1;
    }
    pos
}

fn scan_number(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len()
        && (bytes[pos].is_ascii_digit()
            || bytes[pos] == b'_'
            || (bytes[pos] == b'.' && bytes.get(pos + 1).is_some_and(|b| b.is_ascii_digit())))
    {
        pos += 1;
    }
    pos
}

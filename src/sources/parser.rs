//! 참고문헌 한 줄 파서
//!
//! 두 가지 형식을 순서대로 시도합니다.
//! 1. 구분자 형식: `Title: ... | Source: ... | Link: ... | Year: ...`
//! 2. 자유 형식 (APA 유사): `Smith, J. (2023). Title. Site. https://...`
//!
//! 에이전트 출력은 스키마가 보장되지 않는 텍스트이므로 두 형식 모두 지원합니다.

use std::sync::LazyLock;

use regex::Regex;

use super::links::first_url;

const FIELD_SEPARATOR: &str = " | ";

/// 괄호 안 연도 "(2023)" 또는 "(2023, May 4)"
static PAREN_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d{4})[^)]*\)").unwrap());

/// 단독 연도 2000~2029
static BARE_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(20[0-2][0-9])\b").unwrap());

/// "(YYYY). " 뒤의 제목 (다음 마침표 또는 URL 전까지)
static APA_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\d{4}\)\.\s+(.*?)(?:\.|https?://|$)").unwrap());

/// 첫 '(' 또는 '.' 이전의 저자/출처
static AUTHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^(]+?)(?:\s*\(|\s*\.)").unwrap());

const MIN_FALLBACK_TITLE_LEN: usize = 5;

// ============================================================================
// Types
// ============================================================================

/// 파싱 전략
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// ` | ` 구분자 + 레이블 형식
    Delimited,
    /// 정규식 휴리스틱
    FreeForm,
}

/// 한 줄에서 파싱된 필드 (각 필드는 비어 있을 수 있음)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReference {
    pub title: String,
    pub source: String,
    pub link: String,
    pub year: String,
    pub strategy: ParseStrategy,
}

impl ParsedReference {
    fn empty(strategy: ParseStrategy) -> Self {
        Self {
            title: String::new(),
            source: String::new(),
            link: String::new(),
            year: String::new(),
            strategy,
        }
    }

    /// 제목과 링크가 모두 비어 있는지
    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.link.is_empty()
    }

    /// (title, source, link, year) 튜플로 변환
    pub fn into_parts(self) -> (String, String, String, String) {
        (self.title, self.source, self.link, self.year)
    }
}

// ============================================================================
// Parser
// ============================================================================

/// 참고문헌 한 줄 파싱
///
/// 구분자 형식에서 제목도 링크도 얻지 못하면 자유 형식으로 다시 시도합니다.
pub fn parse_reference_line(line: &str) -> ParsedReference {
    let delimited = parse_delimited(line);
    if !delimited.is_blank() {
        return delimited;
    }
    parse_free_form(line)
}

/// 구분자 형식 파싱
pub fn parse_delimited(line: &str) -> ParsedReference {
    let mut parsed = ParsedReference::empty(ParseStrategy::Delimited);

    if !line.contains(FIELD_SEPARATOR) {
        return parsed;
    }

    for segment in line.split(FIELD_SEPARATOR) {
        let segment = segment.trim();
        if let Some(value) = segment.strip_prefix("Title:") {
            parsed.title = value.trim().to_string();
        } else if let Some(value) = segment.strip_prefix("Source:") {
            parsed.source = value.trim().to_string();
        } else if let Some(value) = segment.strip_prefix("Link:") {
            parsed.link = value.trim().to_string();
        } else if let Some(value) = segment.strip_prefix("Year:") {
            parsed.year = value.trim().to_string();
        }
    }

    parsed
}

/// 자유 형식 파싱 (정규식 휴리스틱)
pub fn parse_free_form(line: &str) -> ParsedReference {
    let mut parsed = ParsedReference::empty(ParseStrategy::FreeForm);

    parsed.link = first_url(line).unwrap_or_default().to_string();
    parsed.year = extract_year(line);
    parsed.title = extract_title(line);
    parsed.source = AUTHOR_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    parsed
}

/// 연도 추출: 괄호 안 연도 우선, 없으면 단독 연도
pub fn extract_year(text: &str) -> String {
    PAREN_YEAR_RE
        .captures(text)
        .or_else(|| BARE_YEAR_RE.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn extract_title(line: &str) -> String {
    if let Some(caps) = APA_TITLE_RE.captures(line) {
        return caps
            .get(1)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
    }

    let head = line.split('.').next().unwrap_or_default().trim();
    if head.chars().count() > MIN_FALLBACK_TITLE_LEN {
        head.to_string()
    } else {
        String::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

//! URL 검증 및 추출
//!
//! 네트워크 접근 없이 문자열만으로 URL의 형태를 판별합니다.

use std::sync::LazyLock;

use regex::Regex;

/// 유효 URL 형태: 스킴 + 점으로 구분된 호스트 레이블 (각 1~63자) + 나머지
static VALID_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*.*$",
    )
    .unwrap()
});

/// 텍스트 내 URL 탐색 패턴 (파서와 폴백이 공유)
static URL_IN_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://(?:[-\w.]|%[0-9a-fA-F]{2})+[/\w.-]*").unwrap());

/// 플레이스홀더 도메인 (소문자 부분 문자열로 비교)
const PLACEHOLDER_DOMAINS: &[&str] = &[
    "example.com",
    "placeholder.",
    "dummy.",
    "fake.",
    "test.example",
    "test.test",
];

const MIN_URL_LEN: usize = 10;

/// URL이 형태상 그럴듯하고 플레이스홀더가 아닌지 확인
pub fn is_valid_url(url: &str) -> bool {
    if url.chars().count() < MIN_URL_LEN {
        return false;
    }

    if !VALID_URL_RE.is_match(url) {
        return false;
    }

    let lower = url.to_lowercase();
    !PLACEHOLDER_DOMAINS.iter().any(|p| lower.contains(p))
}

/// 텍스트에서 HTTP(S) URL을 등장 순서대로 추출
pub fn find_urls(text: &str) -> Vec<&str> {
    URL_IN_TEXT_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// 텍스트의 첫 번째 URL
pub fn first_url(text: &str) -> Option<&str> {
    URL_IN_TEXT_RE.find(text).map(|m| m.as_str())
}

/// URL에서 도메인 부분 추출 (스킴 이후 첫 '/' 이전)
pub fn domain_of(url: &str) -> &str {
    let after_scheme = url.split_once("//").map_or(url, |(_, rest)| rest);
    after_scheme.split('/').next().unwrap_or(after_scheme)
}

// ============================================================================
// Tests
// ============================================================================

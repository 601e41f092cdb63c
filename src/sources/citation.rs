//! Citation 모델 및 중복 제거
//!
//! - `Citation`: title / source / link / year 네 필드 인용 레코드
//! - `CitationSet`: 링크와 제목 기준으로 중복이 제거된 순서 있는 집합
//! - `Clock`: 기본 연도 계산용 시계 (테스트에서 고정 가능)

use std::collections::HashSet;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;

use super::links::is_valid_url;

pub const DEFAULT_TITLE: &str = "Referenced Source";
pub const DEFAULT_SOURCE: &str = "Source";

/// 제목에 포함되면 거부되는 어휘 (소문자 부분 문자열)
const PLACEHOLDER_WORDS: &[&str] = &["example", "dummy", "test", "fake", "placeholder"];

// ============================================================================
// Clock
// ============================================================================

/// 현재 연도 제공자
pub trait Clock: Send + Sync {
    /// 현재 연도
    fn current_year(&self) -> i32;
}

/// 시스템 시계 (UTC)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        Utc::now().year()
    }
}

/// 고정 연도 시계
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}

// ============================================================================
// Citation
// ============================================================================

/// 인용 레코드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub source: String,
    pub link: String,
    pub year: String,
    /// 검색 결과 요약 (중복 판정에는 쓰이지 않음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl Citation {
    pub fn new(
        title: impl Into<String>,
        source: impl Into<String>,
        link: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            source: source.into(),
            link: link.into(),
            year: year.into(),
            snippet: None,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// 비어 있는 필드를 기본값으로 채움
    pub fn fill_defaults(&mut self, year: i32) {
        if self.title.trim().is_empty() {
            self.title = DEFAULT_TITLE.to_string();
        }
        if self.source.trim().is_empty() {
            self.source = DEFAULT_SOURCE.to_string();
        }
        let parsed_year = self.year.trim();
        if is_four_digit_year(parsed_year) {
            self.year = parsed_year.to_string();
        } else {
            if !parsed_year.is_empty() {
                tracing::debug!("Replacing non-numeric year {:?} with {}", parsed_year, year);
            }
            self.year = year.to_string();
        }
    }

    /// 제목에 플레이스홀더 어휘가 있는지
    pub fn has_placeholder_title(&self) -> bool {
        let lower = self.title.to_lowercase();
        PLACEHOLDER_WORDS.iter().any(|w| lower.contains(w))
    }

    /// 표시용 스니펫 ("출처 - 제목")
    pub fn display_snippet(&self) -> String {
        match &self.snippet {
            Some(snippet) => snippet.clone(),
            None => format!("{} - {}", self.source, self.title),
        }
    }

    /// APA 형식 인용 문자열
    pub fn apa(&self) -> String {
        if self.link.is_empty() {
            format!("{}. ({}). {}.", self.source, self.year, self.title)
        } else {
            format!(
                "{}. ({}). {}. Retrieved from {}",
                self.source, self.year, self.title, self.link
            )
        }
    }
}

// ============================================================================
// Title Similarity
// ============================================================================

/// 제목 단어 중첩 비율
///
/// 소문자화 후 공백 기준 단어 집합의 교집합 크기를 더 큰 집합의 크기로 나눕니다.
pub fn title_overlap(a: &str, b: &str) -> f64 {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    let words_a: HashSet<&str> = a_lower.split_whitespace().collect();
    let words_b: HashSet<&str> = b_lower.split_whitespace().collect();

    let larger = words_a.len().max(words_b.len());
    if larger == 0 {
        return 0.0;
    }

    let common = words_a.intersection(&words_b).count();
    common as f64 / larger as f64
}

fn is_four_digit_year(s: &str) -> bool {
    s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit())
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

// ============================================================================
// CitationSet
// ============================================================================

/// 후보가 거부된 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// 제목도 링크도 없음
    Empty,
    /// 플레이스홀더 어휘가 포함된 제목
    PlaceholderTitle,
    /// 비어 있지 않지만 유효하지 않은 링크
    InvalidLink,
    /// 이미 수락된 링크
    DuplicateLink,
    /// 이미 수락된 제목과 같거나 유사
    DuplicateTitle,
}

/// 중복 제거된 인용 집합 (첫 등장 순서 유지)
#[derive(Debug, Clone)]
pub struct CitationSet {
    items: Vec<Citation>,
    seen_links: HashSet<String>,
    seen_titles: Vec<String>,
    config: PipelineConfig,
}

impl Default for CitationSet {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl CitationSet {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            items: Vec::new(),
            seen_links: HashSet::new(),
            seen_titles: Vec::new(),
            config,
        }
    }

    /// 후보 인용 추가
    ///
    /// 중복 판정은 파싱된 그대로의 제목으로 하고, 수락된 뒤에 기본값을 채웁니다.
    pub fn insert(&mut self, mut candidate: Citation, year: i32) -> Result<(), Rejection> {
        let title = normalize(&candidate.title);
        let link = normalize(&candidate.link);

        if title.is_empty() && link.is_empty() {
            return Err(Rejection::Empty);
        }
        if candidate.has_placeholder_title() {
            return Err(Rejection::PlaceholderTitle);
        }
        if !link.is_empty() && !is_valid_url(candidate.link.trim()) {
            return Err(Rejection::InvalidLink);
        }
        if !link.is_empty() && self.seen_links.contains(&link) {
            return Err(Rejection::DuplicateLink);
        }
        if !title.is_empty() && self.is_duplicate_title(&title) {
            return Err(Rejection::DuplicateTitle);
        }

        candidate.fill_defaults(year);

        if !link.is_empty() {
            self.seen_links.insert(link);
        }
        if !title.is_empty() {
            self.seen_titles.push(title);
        }
        self.items.push(candidate);
        Ok(())
    }

    fn is_duplicate_title(&self, title: &str) -> bool {
        let min_exact = self.config.min_exact_title_len;
        let min_similar = self.config.min_similarity_title_len;
        let title_len = title.chars().count();

        self.seen_titles.iter().any(|seen| {
            let seen_len = seen.chars().count();
            if title_len > min_exact && seen == title {
                return true;
            }
            title_len > min_similar
                && seen_len > min_similar
                && title_overlap(seen, title) > self.config.title_similarity_threshold
        })
    }

    /// 이미 정규화된 인용 목록을 다시 걸러 새 집합 생성
    pub fn from_citations(
        citations: impl IntoIterator<Item = Citation>,
        year: i32,
        config: PipelineConfig,
    ) -> Self {
        let mut set = Self::new(config);
        for citation in citations {
            if let Err(reason) = set.insert(citation, year) {
                tracing::debug!("Dropped citation: {:?}", reason);
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Citation> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Citation] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Citation> {
        self.items
    }
}

impl PartialEq for CitationSet {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Serialize for CitationSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cite(title: &str, link: &str) -> Citation {
        Citation::new(title, "Publisher", link, "2024")
    }

    #[test]
    fn test_fill_defaults() {
        let mut c = Citation::new("", "", "https://www.nature.com/a", "");
        c.fill_defaults(2031);
        assert_eq!(c.title, DEFAULT_TITLE);
        assert_eq!(c.source, DEFAULT_SOURCE);
        assert_eq!(c.year, "2031");
    }

    #[test]
    fn test_non_numeric_year_replaced() {
        let mut c = Citation::new("Cat Biology", "Britannica", "", "n.d.");
        c.fill_defaults(2031);
        assert_eq!(c.year, "2031");

        let mut c = Citation::new("Cat Biology", "Britannica", "", " 1998 ");
        c.fill_defaults(2031);
        assert_eq!(c.year, "1998");

        let mut c = Citation::new("Cat Biology", "Britannica", "", "20231");
        c.fill_defaults(2031);
        assert_eq!(c.year, "2031");
    }

    #[test]
    fn test_placeholder_title() {
        assert!(cite("Dummy Article", "").has_placeholder_title());
        assert!(cite("An EXAMPLE of cats", "").has_placeholder_title());
        assert!(cite("Latest findings", "").has_placeholder_title());
        assert!(!cite("Cat Biology", "").has_placeholder_title());
    }

    #[test]
    fn test_title_overlap() {
        assert!((title_overlap("the cat sat", "The Cat Sat") - 1.0).abs() < 1e-9);
        assert!((title_overlap("a b c d", "a b x y") - 0.5).abs() < 1e-9);
        assert_eq!(title_overlap("", ""), 0.0);
    }

    #[test]
    fn test_apa() {
        let c = cite("Cat Biology", "https://www.britannica.com/animal/cat");
        assert_eq!(
            c.apa(),
            "Publisher. (2024). Cat Biology. Retrieved from https://www.britannica.com/animal/cat"
        );
        assert_eq!(cite("Cat Biology", "").apa(), "Publisher. (2024). Cat Biology.");
    }

    #[test]
    fn test_display_snippet() {
        let c = cite("Cat Biology", "");
        assert_eq!(c.display_snippet(), "Publisher - Cat Biology");
        let c = c.with_snippet("Cats purr.");
        assert_eq!(c.display_snippet(), "Cats purr.");
    }

    #[test]
    fn test_duplicate_link_case_insensitive() {
        let mut set = CitationSet::default();
        assert!(set.insert(cite("Cat Biology", "https://www.britannica.com/cat"), 2025).is_ok());
        assert_eq!(
            set.insert(cite("Feline Life", " https://WWW.Britannica.com/CAT "), 2025),
            Err(Rejection::DuplicateLink)
        );
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].title, "Cat Biology");
    }

    #[test]
    fn test_similar_titles_collapse() {
        let mut set = CitationSet::default();
        let first = "the complete history of domestic cats in europe";
        let second = "The complete history of domestic cats in Europe today";
        assert!(set.insert(cite(first, ""), 2025).is_ok());
        // 8/9 > 0.8
        assert_eq!(set.insert(cite(second, ""), 2025), Err(Rejection::DuplicateTitle));
    }

    #[test]
    fn test_dissimilar_titles_kept() {
        let mut set = CitationSet::default();
        assert!(set.insert(cite("History of domestic cats", ""), 2025).is_ok());
        assert!(set.insert(cite("Genetics of wild cats", ""), 2025).is_ok());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_short_titles_not_compared_for_similarity() {
        let mut set = CitationSet::default();
        assert!(set.insert(cite("Cats A", ""), 2025).is_ok());
        assert!(set.insert(cite("Cats B", ""), 2025).is_ok());
        // 완전 일치는 5자 초과면 중복
        assert_eq!(set.insert(cite("cats a", ""), 2025), Err(Rejection::DuplicateTitle));
    }

    #[test]
    fn test_link_only_records_not_collapsed_by_default_title() {
        let mut set = CitationSet::default();
        assert!(set.insert(cite("", "https://www.nature.com/a"), 2025).is_ok());
        assert!(set.insert(cite("", "https://www.nature.com/b"), 2025).is_ok());
        assert_eq!(set.len(), 2);
        assert!(set.iter().all(|c| c.title == DEFAULT_TITLE));
    }

    #[test]
    fn test_rejections() {
        let mut set = CitationSet::default();
        assert_eq!(set.insert(cite("", ""), 2025), Err(Rejection::Empty));
        assert_eq!(
            set.insert(cite("Fake news", "https://www.bbc.co.uk/x"), 2025),
            Err(Rejection::PlaceholderTitle)
        );
        assert_eq!(
            set.insert(cite("Real Title", "https://example.com/x"), 2025),
            Err(Rejection::InvalidLink)
        );
        assert!(set.is_empty());
    }

    #[test]
    fn test_from_citations_is_idempotent() {
        let input = vec![
            cite("Cat Biology", "https://www.britannica.com/cat"),
            cite("Dog Biology", "https://www.britannica.com/cat"),
            cite("Bird Biology", "https://www.audubon.org/birds"),
        ];
        let once = CitationSet::from_citations(input, 2025, PipelineConfig::default());
        let twice =
            CitationSet::from_citations(once.clone().into_vec(), 2025, PipelineConfig::default());
        assert_eq!(once.len(), 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(2025).current_year(), 2025);
        assert!(SystemClock.current_year() >= 2024);
    }
}

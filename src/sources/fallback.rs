//! 폴백 소스 생성
//!
//! 참고문헌이 하나도 남지 않았을 때 본문의 URL로 소스를 만들거나,
//! 일반 플레이스홀더 소스 하나를 만들어 결과가 비지 않도록 보장합니다.

use std::collections::HashSet;

use crate::config::PipelineConfig;

use super::citation::Citation;
use super::links::{domain_of, find_urls, is_valid_url};

pub const GENERIC_TITLE: &str = "Information Source";
pub const GENERIC_SOURCE: &str = "Knowledge Base";
pub const TOPIC_SOURCE: &str = "General Knowledge";
pub const ERROR_TITLE: &str = "Error processing sources";
pub const ERROR_SOURCE: &str = "System";
pub const DEFAULT_TOPIC: &str = "this topic";

/// 폴백 소스 목록 생성 (항상 1개 이상)
///
/// - 본문 있음: 본문 URL로 소스 생성, URL이 없으면 일반 소스 1개
/// - 본문 없음: 주제 소스 1개
pub fn synthesize_sources(
    content: &str,
    topic: &str,
    year: i32,
    config: &PipelineConfig,
) -> Vec<Citation> {
    if content.trim().is_empty() {
        tracing::info!("No content; using topic source");
        return vec![topic_source(topic, year)];
    }

    let sources = sources_from_urls(content, year, config.max_fallback_urls);
    if sources.is_empty() {
        tracing::info!("No usable URLs in content; using generic source");
        return vec![generic_source(year)];
    }

    tracing::info!("Synthesized {} sources from content URLs", sources.len());
    sources
}

/// 본문의 URL로 소스 생성 (완전 일치 중복 제거, 검증, 최대 `limit`개)
pub fn sources_from_urls(content: &str, year: i32, limit: usize) -> Vec<Citation> {
    let mut seen = HashSet::new();

    find_urls(content)
        .into_iter()
        .filter(|url| seen.insert(*url))
        .filter(|url| is_valid_url(url))
        .take(limit)
        .enumerate()
        .map(|(i, url)| {
            let domain = domain_of(url);
            Citation::new(
                format!("Source {} - {}", i + 1, domain),
                domain,
                url,
                year.to_string(),
            )
            .with_snippet(format!("Reference extracted from content - {}", domain))
        })
        .collect()
}

/// 일반 소스
pub fn generic_source(year: i32) -> Citation {
    Citation::new(GENERIC_TITLE, GENERIC_SOURCE, "", year.to_string())
}

/// 주제 소스 (주제가 비어 있으면 "this topic")
pub fn topic_source(topic: &str, year: i32) -> Citation {
    let topic = match topic.trim() {
        "" => DEFAULT_TOPIC,
        t => t,
    };
    Citation::new(
        format!("Information about {}", topic),
        TOPIC_SOURCE,
        "",
        year.to_string(),
    )
    .with_snippet(format!(
        "This content was generated based on general knowledge about {}.",
        topic
    ))
}

/// 처리 오류 소스
pub fn error_source(message: &str, year: i32) -> Citation {
    Citation::new(ERROR_TITLE, ERROR_SOURCE, "", year.to_string()).with_snippet(format!(
        "An error occurred while processing the search results: {}",
        message
    ))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_in_content() {
        let content = "See https://www.nature.com/cats and https://www.bbc.co.uk/news/cats for more.";
        let sources = synthesize_sources(content, "cats", 2025, &PipelineConfig::default());

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].title, "Source 1 - www.nature.com");
        assert_eq!(sources[0].source, "www.nature.com");
        assert_eq!(sources[0].link, "https://www.nature.com/cats");
        assert_eq!(sources[0].year, "2025");
        assert_eq!(sources[1].title, "Source 2 - www.bbc.co.uk");
    }

    #[test]
    fn test_urls_deduplicated_validated_and_capped() {
        let content = "https://a1.org/x https://a1.org/x http://example.com/bad \
            https://a2.org/x https://a3.org/x https://a4.org/x https://a5.org/x https://a6.org/x";
        let sources = sources_from_urls(content, 2025, 5);

        let links: Vec<&str> = sources.iter().map(|s| s.link.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "https://a1.org/x",
                "https://a2.org/x",
                "https://a3.org/x",
                "https://a4.org/x",
                "https://a5.org/x"
            ]
        );
        // 번호는 살아남은 URL 기준
        assert_eq!(sources[1].title, "Source 2 - a2.org");
    }

    #[test]
    fn test_generic_source_when_no_urls() {
        let sources = synthesize_sources("Cats are mammals.", "cats", 2025, &PipelineConfig::default());
        assert_eq!(sources, vec![generic_source(2025)]);
        assert_eq!(sources[0].title, "Information Source");
        assert_eq!(sources[0].source, "Knowledge Base");
        assert_eq!(sources[0].link, "");
    }

    #[test]
    fn test_topic_source_when_no_content() {
        let sources = synthesize_sources("", "black holes", 2025, &PipelineConfig::default());
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, "Information about black holes");

        let sources = synthesize_sources("  ", "", 2025, &PipelineConfig::default());
        assert_eq!(sources[0].title, "Information about this topic");
    }

    #[test]
    fn test_error_source() {
        let source = error_source("bad input", 2025);
        assert_eq!(source.title, "Error processing sources");
        assert!(source.display_snippet().contains("bad input"));
    }
}

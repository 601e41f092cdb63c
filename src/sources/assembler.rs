//! 응답 조립
//!
//! 본문과 소스 목록을 평문 표시용 문자열로 합칩니다. 추출 로직은 없습니다.

use std::fmt::Write;

use crate::config::PipelineConfig;

use super::citation::Citation;

const SNIPPET_SEPARATOR: &str = " - ";

/// 기본 설정으로 응답 문자열 생성
pub fn format_response_with_sources(topic: &str, content: &str, sources: &[Citation]) -> String {
    format_response(topic, content, sources, &PipelineConfig::default())
}

/// 응답 문자열 생성
///
/// 본문이 비어 있으면 앞쪽 소스들의 제목/스니펫으로 짧은 요약을 만들고,
/// 소스가 있으면 항상 "Sources:" 섹션을 붙입니다.
pub fn format_response(
    topic: &str,
    content: &str,
    sources: &[Citation],
    config: &PipelineConfig,
) -> String {
    let mut response = if content.is_empty() {
        format!("Information about {}:\n\n", topic)
    } else {
        content.to_string()
    };

    if content.is_empty() && !sources.is_empty() {
        response.push_str(
            "Based on several authoritative sources, here's information about this topic:\n\n",
        );

        for source in sources.iter().take(config.narrative_sources) {
            if source.title.is_empty() {
                continue;
            }
            let _ = writeln!(response, "According to {}:", source.title);

            let snippet = source.display_snippet();
            let lead = snippet
                .split(SNIPPET_SEPARATOR)
                .next()
                .unwrap_or_default()
                .trim();
            if !lead.is_empty() {
                let truncated: String = lead.chars().take(config.snippet_chars).collect();
                let _ = write!(response, "{}...\n\n", truncated);
            }
        }
    }

    if !sources.is_empty() {
        response.push_str("\n\nSources:\n");
        for (i, source) in sources.iter().enumerate() {
            let _ = writeln!(response, "{}. {}", i + 1, source.title);
            if !source.link.is_empty() {
                let _ = writeln!(response, "   Link: {}", source.link);
            }
            let _ = writeln!(response, "   Citation: {}", source.apa());
            response.push('\n');
        }
    }

    response
}

// ============================================================================
// Tests
// ============================================================================

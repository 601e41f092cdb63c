//! LLM 텍스트에서 JSON 복구 및 소스 목록 정규화

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::citation::Citation;
use super::fallback::GENERIC_TITLE;
use super::links::domain_of;

static CODE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").unwrap());

static BARE_JSON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\[[\s\S]*\]|\{[\s\S]*\})").unwrap());

const MAX_TEXT_SNIPPET: usize = 300;

/// 텍스트에서 JSON 추출
///
/// 코드 블록 → 본문의 배열/객체 → 코드 펜스를 지운 전체 텍스트 순으로 시도합니다.
pub fn extract_json_from_text(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }

    let from_blocks = CODE_BLOCK_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| serde_json::from_str(m.as_str().trim()).ok());
    if from_blocks.is_some() {
        return from_blocks;
    }

    let bare = BARE_JSON_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| serde_json::from_str(m.as_str().trim()).ok());
    if bare.is_some() {
        return bare;
    }

    let cleaned = text.replace("```json", "").replace("```", "");
    serde_json::from_str(cleaned.trim()).ok()
}

/// 임의 형태의 소스 데이터를 Citation 목록으로 정규화 (항상 1개 이상)
pub fn citations_from_json(value: &Value, year: i32) -> Vec<Citation> {
    let mut citations = collect_citations(value, year);

    if citations.is_empty() {
        citations.push(
            Citation::new(GENERIC_TITLE, "Source", "", year.to_string())
                .with_snippet("No specific sources were extracted"),
        );
    }

    citations
}

fn collect_citations(value: &Value, year: i32) -> Vec<Citation> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_object().map(|_| citation_from_object(item, year)))
            .collect(),
        Value::Object(map) if map.contains_key("result") => collect_citations(&map["result"], year),
        Value::String(text) => match extract_json_from_text(text) {
            Some(parsed) => collect_citations(&parsed, year),
            None => {
                let snippet: String = text.chars().take(MAX_TEXT_SNIPPET).collect();
                vec![Citation::new(GENERIC_TITLE, "Source", "", year.to_string())
                    .with_snippet(snippet)]
            }
        },
        _ => Vec::new(),
    }
}

fn citation_from_object(item: &Value, year: i32) -> Citation {
    let text = |key: &str| {
        item.get(key)
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let title = match text("title") {
        t if t.is_empty() => "No title".to_string(),
        t => t,
    };
    let link = text("link");
    let source = [text("source"), text("author")]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| {
            if link.is_empty() {
                "Source".to_string()
            } else {
                domain_of(&link).to_string()
            }
        });
    let year = match text("year") {
        y if y.is_empty() => year.to_string(),
        y => y,
    };

    let citation = Citation::new(title, source, link, year);
    match [text("snippet"), text("description")]
        .into_iter()
        .find(|s| !s.is_empty())
    {
        Some(snippet) => citation.with_snippet(snippet),
        None => citation,
    }
}

// ============================================================================
// Tests
// ============================================================================

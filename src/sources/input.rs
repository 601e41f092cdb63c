//! 에이전트 원본 출력 디코딩
//!
//! 업스트림 에이전트는 세 가지 형태 중 하나를 돌려줍니다.
//! - 텍스트 (본문 + "References:" 블록)
//! - `organic_results` 검색 결과 목록을 가진 매핑
//! - `finder_agent_response.result`로 감싸진 매핑
//!
//! 경계에서 한 번만 디코딩하고, 이후 단계는 정규화된 형태만 봅니다.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SourceError, SourceResult};

use super::citation::Citation;
use super::links::domain_of;

const ORGANIC_RESULTS_KEY: &str = "organic_results";
const FINDER_RESPONSE_KEY: &str = "finder_agent_response";
const RESULT_KEY: &str = "result";

// ============================================================================
// Types
// ============================================================================

/// 검색 결과 한 건
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

impl OrganicResult {
    /// Citation으로 변환 (출처는 링크의 도메인)
    pub fn to_citation(&self, year: i32) -> Citation {
        let source = if self.link.is_empty() {
            "Unknown Source"
        } else {
            domain_of(&self.link)
        };

        let citation = Citation::new(self.title.trim(), source, self.link.trim(), year.to_string());
        if self.snippet.trim().is_empty() {
            citation
        } else {
            citation.with_snippet(self.snippet.trim())
        }
    }
}

/// 에이전트 원본 출력
#[derive(Debug, Clone, PartialEq)]
pub enum RawAgentOutput {
    /// 본문 + 참고문헌 텍스트
    Text(String),
    /// 검색 결과 목록
    OrganicResults(Vec<OrganicResult>),
    /// finder 에이전트 응답으로 감싸진 결과
    FinderResponse(Box<RawAgentOutput>),
}

impl RawAgentOutput {
    /// JSON 값 디코딩
    ///
    /// `max_depth`는 허용되는 finder_agent_response 중첩 수입니다.
    pub fn decode(value: &Value, max_depth: usize) -> SourceResult<Self> {
        Self::decode_at(value, 0, max_depth)
    }

    fn decode_at(value: &Value, depth: usize, max_depth: usize) -> SourceResult<Self> {
        match value {
            Value::String(text) => Ok(Self::Text(text.clone())),
            Value::Object(map) => {
                if let Some(results) = map.get(ORGANIC_RESULTS_KEY) {
                    return decode_organic(results).map(Self::OrganicResults);
                }

                if let Some(wrapper) = map.get(FINDER_RESPONSE_KEY) {
                    if depth >= max_depth {
                        return Err(SourceError::NestingTooDeep { limit: max_depth });
                    }
                    let inner = wrapper.get(RESULT_KEY).ok_or_else(|| {
                        SourceError::MalformedInput(format!(
                            "'{}' without '{}'",
                            FINDER_RESPONSE_KEY, RESULT_KEY
                        ))
                    })?;
                    let inner = Self::decode_at(inner, depth + 1, max_depth)?;
                    return Ok(Self::FinderResponse(Box::new(inner)));
                }

                Err(SourceError::MalformedInput(
                    "mapping without a recognised key".to_string(),
                ))
            }
            other => Err(SourceError::MalformedInput(format!(
                "unexpected {} value",
                json_kind(other)
            ))),
        }
    }

    /// 래퍼를 모두 벗겨 텍스트 또는 검색 결과로 정규화
    pub fn into_canonical(self) -> CanonicalOutput {
        let mut current = self;
        loop {
            match current {
                Self::Text(text) => return CanonicalOutput::Text(text),
                Self::OrganicResults(hits) => return CanonicalOutput::OrganicResults(hits),
                Self::FinderResponse(inner) => current = *inner,
            }
        }
    }
}

/// 래퍼가 제거된 에이전트 출력
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalOutput {
    Text(String),
    OrganicResults(Vec<OrganicResult>),
}

impl From<&str> for RawAgentOutput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

fn decode_organic(results: &Value) -> SourceResult<Vec<OrganicResult>> {
    let items = results.as_array().ok_or_else(|| {
        SourceError::MalformedInput(format!("'{}' is not a list", ORGANIC_RESULTS_KEY))
    })?;

    Ok(items
        .iter()
        .filter_map(|item| match serde_json::from_value::<OrganicResult>(item.clone()) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::debug!("Skipping malformed search hit: {}", e);
                None
            }
        })
        .collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_text() {
        let decoded = RawAgentOutput::decode(&json!("hello"), 8).unwrap();
        assert_eq!(decoded, RawAgentOutput::Text("hello".to_string()));
    }

    #[test]
    fn test_decode_organic() {
        let value = json!({
            "organic_results": [
                {"title": "Cats", "link": "https://www.nature.com/cats", "snippet": "About cats"},
                {"title": "No link"},
                "not an object"
            ]
        });
        let decoded = RawAgentOutput::decode(&value, 8).unwrap();
        match decoded {
            RawAgentOutput::OrganicResults(hits) => {
                assert_eq!(hits.len(), 2);
                assert_eq!(hits[0].snippet, "About cats");
                assert_eq!(hits[1].link, "");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_decode_nested_finder_response() {
        let value = json!({
            "finder_agent_response": {
                "result": {"finder_agent_response": {"result": "inner text"}}
            }
        });
        let decoded = RawAgentOutput::decode(&value, 8).unwrap();
        assert!(matches!(decoded, RawAgentOutput::FinderResponse(_)));
        assert_eq!(
            decoded.into_canonical(),
            CanonicalOutput::Text("inner text".to_string())
        );
    }

    #[test]
    fn test_decode_nesting_limit() {
        let value = json!({
            "finder_agent_response": {
                "result": {"finder_agent_response": {"result": "x"}}
            }
        });
        let err = RawAgentOutput::decode(&value, 1).unwrap_err();
        assert!(matches!(err, SourceError::NestingTooDeep { limit: 1 }));
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(
            RawAgentOutput::decode(&json!(42), 8),
            Err(SourceError::MalformedInput(_))
        ));
        assert!(matches!(
            RawAgentOutput::decode(&json!({"other": 1}), 8),
            Err(SourceError::MalformedInput(_))
        ));
        assert!(matches!(
            RawAgentOutput::decode(&json!({"finder_agent_response": {}}), 8),
            Err(SourceError::MalformedInput(_))
        ));
        assert!(matches!(
            RawAgentOutput::decode(&json!({"organic_results": "nope"}), 8),
            Err(SourceError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_organic_to_citation() {
        let hit = OrganicResult {
            title: "Cat Facts".to_string(),
            link: "https://www.nature.com/cats/facts".to_string(),
            snippet: "Cats sleep a lot".to_string(),
        };
        let citation = hit.to_citation(2025);
        assert_eq!(citation.source, "www.nature.com");
        assert_eq!(citation.year, "2025");
        assert_eq!(citation.snippet.as_deref(), Some("Cats sleep a lot"));

        let no_link = OrganicResult {
            title: "Cat Facts".to_string(),
            ..Default::default()
        };
        assert_eq!(no_link.to_citation(2025).source, "Unknown Source");
    }
}

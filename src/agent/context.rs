//! 질의 단위 컨텍스트
//!
//! 한 번의 질의 동안 주제, 본문, 정리된 본문, 소스를 보관합니다.
//! 호출자가 소유하고 각 단계에 명시적으로 넘깁니다.

use serde::Serialize;

use crate::sources::Citation;

/// 질의 컨텍스트
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryContext {
    /// 질의 주제
    pub topic: String,
    /// 추출된 본문
    pub content: String,
    /// 정리 단계를 거친 본문
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organized_content: Option<String>,
    /// 최종 소스 목록
    pub sources: Vec<Citation>,
}

impl QueryContext {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Default::default()
        }
    }
}

/// 전체 파이프라인 응답
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeResponse {
    pub response: String,
    pub sources: Vec<Citation>,
}

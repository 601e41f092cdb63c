//! Agent 모듈 - 질의 한 건의 전체 흐름
//!
//! 프로듀서에서 원본 출력을 받아 소스 파이프라인을 돌리고,
//! 정리된 본문과 최종 소스 목록으로 응답을 만듭니다.
//!
//! - context: 호출자 소유 질의 컨텍스트
//! - pipeline: 디코딩/추출/폴백
//! - producer: 업스트림 에이전트 인터페이스

mod context;
mod pipeline;
mod producer;

// Re-exports
pub use context::{KnowledgeResponse, QueryContext};
pub use pipeline::{SourcePipeline, ORGANIC_CONTENT};
pub use producer::{parse_raw_output, AgentProducer, FileProducer, StaticProducer};

use crate::sources::error_source;

/// 정리된 본문에서 지울 마크업 문자
const ORGANIZED_MARKUP: &[char] = &['#', '*', '_', '`'];

// ============================================================================
// KnowledgeAgent
// ============================================================================

/// 지식 에이전트
pub struct KnowledgeAgent<P: AgentProducer> {
    producer: P,
    pipeline: SourcePipeline,
}

impl<P: AgentProducer> KnowledgeAgent<P> {
    pub fn new(producer: P, pipeline: SourcePipeline) -> Self {
        Self { producer, pipeline }
    }

    pub fn pipeline(&self) -> &SourcePipeline {
        &self.pipeline
    }

    /// 질의 실행
    ///
    /// 응답과 소스 목록을 돌려줍니다. 소스 목록은 비지 않습니다.
    pub async fn get_information(&self, query: &str) -> KnowledgeResponse {
        let mut ctx = QueryContext::new(query);
        // 연도는 질의마다 한 번 읽음
        let year = self.pipeline.current_year();
        tracing::info!("Processing new query via {}: {}", self.producer.name(), query);

        let raw = match self.producer.search(query).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Error running information agent: {:#}", e);
                return KnowledgeResponse {
                    response: format!("Error: {}", e),
                    sources: vec![error_source(&e.to_string(), year)],
                };
            }
        };

        let content = self.pipeline.process_value(&mut ctx, &raw, year);

        if !content.is_empty() {
            match self.producer.organize(&content).await {
                Ok(organized) => ctx.organized_content = organized,
                Err(e) => tracing::warn!("Organizer failed, using extracted content: {:#}", e),
            }
        }

        let response = build_response(&ctx, query);
        let sources = self.pipeline.final_sources(&ctx, year);

        tracing::info!(
            "Query finished: {} chars of response, {} sources",
            response.chars().count(),
            sources.len()
        );

        KnowledgeResponse { response, sources }
    }
}

/// 정리된 본문 → 추출된 본문 → 일반 안내문 순으로 응답 선택
fn build_response(ctx: &QueryContext, query: &str) -> String {
    if let Some(organized) = &ctx.organized_content {
        let cleaned: String = organized
            .chars()
            .filter(|c| !ORGANIZED_MARKUP.contains(c))
            .collect();
        if !cleaned.trim().is_empty() {
            return cleaned;
        }
    }

    if !ctx.content.is_empty() {
        return ctx.content.clone();
    }

    format!(
        "Information about {}:\n\nI've gathered several sources on this topic, but couldn't \
         generate a complete response. Please check the sources below for detailed information.",
        query
    )
}

// ============================================================================
// Tests
// ============================================================================

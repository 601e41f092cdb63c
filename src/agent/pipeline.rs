//! 소스 파이프라인
//!
//! 원본 출력 디코딩 → 추출 → 폴백 → 컨텍스트 저장까지 한 질의 분량을 처리합니다.
//! 어떤 입력이 와도 컨텍스트의 소스 목록은 비지 않습니다.

use std::sync::Arc;

use serde_json::Value;

use crate::config::PipelineConfig;
use crate::error::SourceError;
use crate::sources::{
    error_source, format_response, synthesize_sources, topic_source, CanonicalOutput, Citation,
    CitationSet, Clock, RawAgentOutput, SourceExtractor, SystemClock,
};

use super::context::QueryContext;

/// 검색 결과 목록에서 온 본문
pub const ORGANIC_CONTENT: &str = "Information compiled from multiple sources";

/// 소스 파이프라인
#[derive(Clone)]
pub struct SourcePipeline {
    extractor: SourceExtractor,
}

impl SourcePipeline {
    pub fn new(config: PipelineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            extractor: SourceExtractor::new(config, clock),
        }
    }

    /// 준비된 추출기로 생성
    pub fn from_extractor(extractor: SourceExtractor) -> Self {
        Self { extractor }
    }

    /// 기본 설정 + 시스템 시계
    pub fn with_defaults() -> Self {
        Self::new(PipelineConfig::default(), Arc::new(SystemClock))
    }

    pub fn config(&self) -> &PipelineConfig {
        self.extractor.config()
    }

    pub fn current_year(&self) -> i32 {
        self.extractor.clock().current_year()
    }

    /// JSON 원본 출력 처리
    ///
    /// 컨텍스트의 본문/소스를 갱신하고 본문을 돌려줍니다.
    /// `year`는 호출자가 질의마다 한 번 읽은 현재 연도입니다.
    pub fn process_value(&self, ctx: &mut QueryContext, value: &Value, year: i32) -> String {
        match RawAgentOutput::decode(value, self.config().max_nesting_depth) {
            Ok(raw) => self.process(ctx, raw, year),
            Err(SourceError::MalformedInput(reason)) => {
                tracing::warn!("Unrecognised agent output ({}); treating as empty", reason);
                self.process(ctx, RawAgentOutput::Text(String::new()), year)
            }
            Err(e) => {
                tracing::error!("Failed to decode agent output: {}", e);
                self.fail(ctx, &e, year)
            }
        }
    }

    /// 디코딩된 원본 출력 처리
    pub fn process(&self, ctx: &mut QueryContext, raw: RawAgentOutput, year: i32) -> String {
        let (content, mut sources) = match raw.into_canonical() {
            CanonicalOutput::Text(text) => match self.extractor.try_extract_at(&text, year) {
                Ok(result) => {
                    let references = result.references.into_vec();
                    let sources = if references.is_empty() {
                        synthesize_sources(&result.content, &ctx.topic, year, self.config())
                    } else {
                        references
                    };
                    (result.content, sources)
                }
                Err(e) => {
                    tracing::error!("Error processing sources: {}", e);
                    return self.fail(ctx, &e, year);
                }
            },
            CanonicalOutput::OrganicResults(hits) => {
                tracing::info!("Converting {} search hits to sources", hits.len());
                let citations = hits
                    .iter()
                    .take(self.config().max_organic_results)
                    .map(|hit| hit.to_citation(year));
                let set = CitationSet::from_citations(citations, year, self.config().clone());
                (ORGANIC_CONTENT.to_string(), set.into_vec())
            }
        };

        if sources.is_empty() {
            sources.push(topic_source(&ctx.topic, year));
        }

        tracing::info!("Extracted {} sources", sources.len());

        if !content.is_empty() {
            ctx.content = content.clone();
        }
        ctx.sources = sources;
        content
    }

    fn fail(&self, ctx: &mut QueryContext, error: &SourceError, year: i32) -> String {
        ctx.sources = vec![error_source(&error.to_string(), year)];
        String::new()
    }

    /// 컨텍스트 소스를 다시 중복 제거 (모두 걸러지면 원본 유지)
    pub fn final_sources(&self, ctx: &QueryContext, year: i32) -> Vec<Citation> {
        let set = CitationSet::from_citations(ctx.sources.clone(), year, self.config().clone());
        if set.is_empty() {
            ctx.sources.clone()
        } else {
            set.into_vec()
        }
    }

    /// 컨텍스트를 평문 응답으로 조립
    pub fn render(&self, ctx: &QueryContext) -> String {
        format_response(&ctx.topic, &ctx.content, &ctx.sources, self.config())
    }
}

impl Default for SourcePipeline {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// Tests
// ============================================================================

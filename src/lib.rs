//! articube - 에이전트 출력 참고문헌 추출 및 소스 파이프라인
//!
//! LLM/검색 에이전트가 만든 본문 + 참고문헌 텍스트에서
//! 검증되고 중복이 제거된 인용 목록을 복구합니다.

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod sources;

// Re-exports
pub use agent::{
    AgentProducer, FileProducer, KnowledgeAgent, KnowledgeResponse, QueryContext,
    SourcePipeline, StaticProducer,
};
pub use config::PipelineConfig;
pub use error::{SourceError, SourceResult};
pub use sources::{
    extract_content_and_references, format_response_with_sources, is_valid_url,
    parse_reference_line, synthesize_sources, Citation, CitationSet, Clock, ExtractionResult,
    FixedClock, RawAgentOutput, SourceExtractor, SystemClock,
};

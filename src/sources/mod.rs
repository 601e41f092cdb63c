//! Sources 모듈 - 참고문헌 추출 및 소스 정규화
//!
//! - links: URL 검증/추출 (네트워크 없음)
//! - parser: 참고문헌 한 줄 파싱 (구분자 형식 + 자유 형식)
//! - citation: Citation 모델, 중복 제거 집합, 시계
//! - extractor: 원문 → 본문 + 참고문헌
//! - fallback: 참고문헌이 없을 때의 대체 소스
//! - assembler: 평문 응답 조립
//! - input: 에이전트 원본 출력 디코딩
//! - json: LLM 텍스트의 JSON 복구

mod assembler;
mod citation;
mod extractor;
mod fallback;
mod input;
mod json;
mod links;
mod parser;

// Re-exports
pub use assembler::{format_response, format_response_with_sources};
pub use citation::{
    title_overlap, Citation, CitationSet, Clock, FixedClock, Rejection, SystemClock,
    DEFAULT_SOURCE, DEFAULT_TITLE,
};
pub use extractor::{
    extract_content_and_references, strip_markup, try_extract_content_and_references,
    ExtractionResult, LineParser, SourceExtractor, REFERENCES_MARKER,
};
pub use fallback::{
    error_source, generic_source, sources_from_urls, synthesize_sources, topic_source,
    ERROR_TITLE, GENERIC_SOURCE, GENERIC_TITLE,
};
pub use input::{CanonicalOutput, OrganicResult, RawAgentOutput};
pub use json::{citations_from_json, extract_json_from_text};
pub use links::{domain_of, find_urls, first_url, is_valid_url};
pub use parser::{
    extract_year, parse_delimited, parse_free_form, parse_reference_line, ParseStrategy,
    ParsedReference,
};

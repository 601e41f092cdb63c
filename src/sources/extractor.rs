//! 참고문헌 블록 추출기
//!
//! 에이전트 원문을 "References:" 제목 기준으로 본문과 참고문헌으로 나누고,
//! 각 줄을 파싱/검증/중복 제거하여 `ExtractionResult`를 만듭니다.
//!
//! 추출은 실패하지 않습니다. 내부 오류는 로그로 남기고 참고문헌 없음으로 처리합니다.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::error::{SourceError, SourceResult};

use super::citation::{Citation, CitationSet, Clock, SystemClock};
use super::parser::{parse_reference_line, ParsedReference};

pub const REFERENCES_MARKER: &str = "References:";

/// 본문에서 제거할 마크업 문자
const MARKUP_CHARS: &[char] = &['*', '#'];

/// 구분선으로 취급하는 줄 시작 문자
const SEPARATOR_PREFIXES: &[char] = &['-', '—', '–'];

/// 참고문헌 한 줄 파서
pub type LineParser = fn(&str) -> ParsedReference;

// ============================================================================
// ExtractionResult
// ============================================================================

/// 추출 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    /// "References:" 이전 텍스트 (마크업 제거됨)
    pub content: String,
    /// 검증/중복 제거된 참고문헌
    pub references: CitationSet,
}

impl ExtractionResult {
    fn empty(config: &PipelineConfig) -> Self {
        Self {
            content: String::new(),
            references: CitationSet::new(config.clone()),
        }
    }
}

// ============================================================================
// SourceExtractor
// ============================================================================

/// 참고문헌 추출기
#[derive(Clone)]
pub struct SourceExtractor {
    config: PipelineConfig,
    clock: Arc<dyn Clock>,
    line_parser: LineParser,
}

impl SourceExtractor {
    pub fn new(config: PipelineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            line_parser: parse_reference_line,
        }
    }

    /// 줄 파서 교체
    pub fn with_line_parser(mut self, line_parser: LineParser) -> Self {
        self.line_parser = line_parser;
        self
    }

    /// 기본 설정 + 시스템 시계
    pub fn with_defaults() -> Self {
        Self::new(PipelineConfig::default(), Arc::new(SystemClock))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// 본문과 참고문헌 추출 (실패 시 빈 결과)
    pub fn extract(&self, raw: &str) -> ExtractionResult {
        self.extract_at(raw, self.clock.current_year())
    }

    /// 이미 읽은 연도로 추출 (실패 시 빈 결과)
    pub fn extract_at(&self, raw: &str, year: i32) -> ExtractionResult {
        match self.try_extract_at(raw, year) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("{}", e);
                ExtractionResult::empty(&self.config)
            }
        }
    }

    /// 본문과 참고문헌 추출
    ///
    /// 줄 파싱 중 발생한 panic은 `SourceError::ExtractionFailure`로 변환됩니다.
    pub fn try_extract(&self, raw: &str) -> SourceResult<ExtractionResult> {
        self.try_extract_at(raw, self.clock.current_year())
    }

    /// 이미 읽은 연도로 추출
    pub fn try_extract_at(&self, raw: &str, year: i32) -> SourceResult<ExtractionResult> {
        if raw.is_empty() {
            return Ok(ExtractionResult::empty(&self.config));
        }

        let (head, block) = match raw.split_once(REFERENCES_MARKER) {
            Some((head, block)) => (head, Some(block)),
            None => (raw, None),
        };

        let content = strip_markup(head.trim());

        let references = match block {
            Some(block) => {
                panic::catch_unwind(AssertUnwindSafe(|| self.collect_references(block, year)))
                    .map_err(|payload| SourceError::ExtractionFailure(panic_message(payload)))?
            }
            None => {
                tracing::debug!("No '{}' marker in agent output", REFERENCES_MARKER);
                CitationSet::new(self.config.clone())
            }
        };

        tracing::info!(
            "Extracted {} chars of content and {} references",
            content.chars().count(),
            references.len()
        );

        Ok(ExtractionResult { content, references })
    }

    fn collect_references(&self, block: &str, year: i32) -> CitationSet {
        let mut references = CitationSet::new(self.config.clone());

        for line in block.trim().lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(SEPARATOR_PREFIXES) {
                continue;
            }

            let parsed = (self.line_parser)(line);
            if parsed.is_blank() {
                tracing::debug!("Unparseable reference line skipped: {}", line);
                continue;
            }

            let strategy = parsed.strategy;
            let (title, source, link, parsed_year) = parsed.into_parts();
            let candidate = Citation::new(title, source, link, parsed_year);

            match references.insert(candidate, year) {
                Ok(()) => tracing::debug!("Accepted reference ({:?}): {}", strategy, line),
                Err(reason) => tracing::debug!("Rejected reference ({:?}): {}", reason, line),
            }
        }

        references
    }
}

impl Default for SourceExtractor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// 기본 추출기로 본문과 참고문헌 추출
pub fn extract_content_and_references(raw: &str) -> ExtractionResult {
    SourceExtractor::with_defaults().extract(raw)
}

/// 기본 추출기로 본문과 참고문헌 추출 (오류 반환)
pub fn try_extract_content_and_references(raw: &str) -> SourceResult<ExtractionResult> {
    SourceExtractor::with_defaults().try_extract(raw)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// 강조/제목 마크업 문자 제거
pub fn strip_markup(text: &str) -> String {
    text.chars().filter(|c| !MARKUP_CHARS.contains(c)).collect()
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

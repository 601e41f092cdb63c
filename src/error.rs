//! 에러 타입
//!
//! 소스 파이프라인 내부에서만 쓰이는 에러입니다.
//! 공개 진입점은 이 에러를 로그로 남기고 더 작은 결과로 대체합니다.

use thiserror::Error;

/// 소스 파이프라인 에러
#[derive(Debug, Error)]
pub enum SourceError {
    /// 텍스트도 아니고 인식 가능한 매핑도 아닌 입력
    #[error("Malformed agent output: {0}")]
    MalformedInput(String),

    /// finder_agent_response 래퍼가 너무 깊게 중첩됨
    #[error("Agent output nested too deeply (limit {limit})")]
    NestingTooDeep { limit: usize },

    /// 참고문헌 파싱 중 예기치 못한 실패
    #[error("Reference extraction failed: {0}")]
    ExtractionFailure(String),
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SourceError::NestingTooDeep { limit: 8 };
        assert_eq!(err.to_string(), "Agent output nested too deeply (limit 8)");

        let err = SourceError::ExtractionFailure("boom".to_string());
        assert!(err.to_string().contains("boom"));
    }
}

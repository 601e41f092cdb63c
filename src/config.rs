//! 파이프라인 설정
//!
//! 참고문헌 추출/중복 제거/폴백 단계에서 쓰이는 상수 모음입니다.
//! 환경변수 `ARTICUBE_*`로 개별 값을 덮어쓸 수 있습니다.

use std::str::FromStr;

// ============================================================================
// Environment Variables
// ============================================================================

const ENV_MAX_FALLBACK_URLS: &str = "ARTICUBE_MAX_FALLBACK_URLS";
const ENV_MAX_ORGANIC_RESULTS: &str = "ARTICUBE_MAX_ORGANIC_RESULTS";
const ENV_TITLE_SIMILARITY: &str = "ARTICUBE_TITLE_SIMILARITY";
const ENV_MIN_SIMILARITY_TITLE_LEN: &str = "ARTICUBE_MIN_SIMILARITY_TITLE_LEN";
const ENV_MIN_EXACT_TITLE_LEN: &str = "ARTICUBE_MIN_EXACT_TITLE_LEN";
const ENV_NARRATIVE_SOURCES: &str = "ARTICUBE_NARRATIVE_SOURCES";
const ENV_SNIPPET_CHARS: &str = "ARTICUBE_SNIPPET_CHARS";
const ENV_MAX_NESTING: &str = "ARTICUBE_MAX_NESTING";

// ============================================================================
// PipelineConfig
// ============================================================================

/// 소스 파이프라인 설정
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// 본문에서 추출할 최대 URL 수 (폴백)
    pub max_fallback_urls: usize,
    /// organic_results에서 사용할 최대 검색 결과 수
    pub max_organic_results: usize,
    /// 제목 단어 중첩 비율 임계값 (이 값을 초과하면 중복)
    pub title_similarity_threshold: f64,
    /// 유사도 비교 대상 제목의 최소 길이 (초과해야 비교)
    pub min_similarity_title_len: usize,
    /// 완전 일치 비교 대상 제목의 최소 길이 (초과해야 비교)
    pub min_exact_title_len: usize,
    /// 본문이 없을 때 요약에 사용할 소스 수
    pub narrative_sources: usize,
    /// 요약 스니펫 최대 문자 수
    pub snippet_chars: usize,
    /// finder_agent_response 최대 중첩 깊이
    pub max_nesting_depth: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_fallback_urls: 5,
            max_organic_results: 5,
            title_similarity_threshold: 0.8,
            min_similarity_title_len: 10,
            min_exact_title_len: 5,
            narrative_sources: 3,
            snippet_chars: 200,
            max_nesting_depth: 8,
        }
    }
}

impl PipelineConfig {
    /// 기본값에 환경변수 덮어쓰기 적용
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 기본값에 `lookup`이 돌려준 값으로 덮어쓰기 적용
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        override_with(ENV_MAX_FALLBACK_URLS, &lookup, &mut config.max_fallback_urls);
        override_with(ENV_MAX_ORGANIC_RESULTS, &lookup, &mut config.max_organic_results);
        override_with(ENV_TITLE_SIMILARITY, &lookup, &mut config.title_similarity_threshold);
        override_with(
            ENV_MIN_SIMILARITY_TITLE_LEN,
            &lookup,
            &mut config.min_similarity_title_len,
        );
        override_with(ENV_MIN_EXACT_TITLE_LEN, &lookup, &mut config.min_exact_title_len);
        override_with(ENV_NARRATIVE_SOURCES, &lookup, &mut config.narrative_sources);
        override_with(ENV_SNIPPET_CHARS, &lookup, &mut config.snippet_chars);
        override_with(ENV_MAX_NESTING, &lookup, &mut config.max_nesting_depth);

        config
    }
}

/// 값이 있고 파싱되면 덮어쓰기
fn override_with<T: FromStr>(key: &str, lookup: &dyn Fn(&str) -> Option<String>, slot: &mut T) {
    if let Some(raw) = lookup(key) {
        apply_override(key, &raw, slot);
    }
}

fn apply_override<T: FromStr>(key: &str, raw: &str, slot: &mut T) {
    match raw.trim().parse::<T>() {
        Ok(value) => *slot = value,
        Err(_) => tracing::warn!("Ignoring invalid value for {}: {:?}", key, raw),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_fallback_urls, 5);
        assert_eq!(config.max_organic_results, 5);
        assert!((config.title_similarity_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.min_similarity_title_len, 10);
        assert_eq!(config.snippet_chars, 200);
    }

    #[test]
    fn test_from_lookup_overrides_every_field() {
        let vars: HashMap<&str, &str> = [
            ("ARTICUBE_MAX_FALLBACK_URLS", "2"),
            ("ARTICUBE_MAX_ORGANIC_RESULTS", "3"),
            ("ARTICUBE_TITLE_SIMILARITY", "0.5"),
            ("ARTICUBE_MIN_SIMILARITY_TITLE_LEN", "3"),
            ("ARTICUBE_MIN_EXACT_TITLE_LEN", "1"),
            ("ARTICUBE_NARRATIVE_SOURCES", "4"),
            ("ARTICUBE_SNIPPET_CHARS", "80"),
            ("ARTICUBE_MAX_NESTING", "2"),
        ]
        .into_iter()
        .collect();

        let config = PipelineConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(
            config,
            PipelineConfig {
                max_fallback_urls: 2,
                max_organic_results: 3,
                title_similarity_threshold: 0.5,
                min_similarity_title_len: 3,
                min_exact_title_len: 1,
                narrative_sources: 4,
                snippet_chars: 80,
                max_nesting_depth: 2,
            }
        );
    }

    #[test]
    fn test_from_lookup_keeps_defaults() {
        let config = PipelineConfig::from_lookup(|key| {
            (key == "ARTICUBE_MIN_EXACT_TITLE_LEN").then(|| "many".to_string())
        });
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_apply_override() {
        let mut value = 5usize;
        apply_override("TEST_KEY", " 7 ", &mut value);
        assert_eq!(value, 7);

        // 파싱 실패 시 기존 값 유지
        apply_override("TEST_KEY", "seven", &mut value);
        assert_eq!(value, 7);
    }
}

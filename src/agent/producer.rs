//! 업스트림 에이전트 프로듀서
//!
//! 검색/LLM 에이전트 호출 자체는 이 크레이트 밖의 일입니다.
//! 여기서는 원본 출력을 건네받는 인터페이스와 간단한 구현만 제공합니다.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

// ============================================================================
// AgentProducer Trait
// ============================================================================

/// 에이전트 출력 프로듀서 트레이트
#[async_trait]
pub trait AgentProducer: Send + Sync {
    /// 주제에 대한 원본 출력 (텍스트 또는 JSON 매핑)
    async fn search(&self, topic: &str) -> Result<Value>;

    /// 본문 정리 (기본 구현: 정리하지 않음)
    async fn organize(&self, _content: &str) -> Result<Option<String>> {
        Ok(None)
    }

    /// 프로듀서 이름
    fn name(&self) -> &str;
}

/// 원본 텍스트를 JSON 값으로 해석
///
/// JSON 객체나 문자열로 파싱되면 그 값을, 아니면 텍스트 전체를 문자열로 씁니다.
pub fn parse_raw_output(text: &str) -> Value {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ (Value::Object(_) | Value::String(_))) => value,
        _ => Value::String(text.to_string()),
    }
}

// ============================================================================
// FileProducer
// ============================================================================

/// 파일에서 원본 출력을 읽는 프로듀서
#[derive(Debug, Clone)]
pub struct FileProducer {
    path: PathBuf,
    organized: Option<PathBuf>,
}

impl FileProducer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            organized: None,
        }
    }

    /// 정리된 본문 파일 지정
    pub fn with_organized(mut self, path: impl Into<PathBuf>) -> Self {
        self.organized = Some(path.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AgentProducer for FileProducer {
    async fn search(&self, topic: &str) -> Result<Value> {
        tracing::info!("Reading agent output for '{}' from {:?}", topic, self.path);

        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read agent output: {:?}", self.path))?;

        Ok(parse_raw_output(&text))
    }

    async fn organize(&self, _content: &str) -> Result<Option<String>> {
        let Some(path) = &self.organized else {
            return Ok(None);
        };

        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read organized content: {:?}", path))?;

        Ok(Some(text))
    }

    fn name(&self) -> &str {
        "file"
    }
}

// ============================================================================
// StaticProducer
// ============================================================================

/// 고정 출력을 돌려주는 프로듀서
#[derive(Debug, Clone)]
pub struct StaticProducer {
    output: Value,
    organized: Option<String>,
}

impl StaticProducer {
    pub fn new(output: Value) -> Self {
        Self {
            output,
            organized: None,
        }
    }

    /// 텍스트 출력
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Value::String(text.into()))
    }

    pub fn with_organized(mut self, organized: impl Into<String>) -> Self {
        self.organized = Some(organized.into());
        self
    }
}

#[async_trait]
impl AgentProducer for StaticProducer {
    async fn search(&self, _topic: &str) -> Result<Value> {
        Ok(self.output.clone())
    }

    async fn organize(&self, _content: &str) -> Result<Option<String>> {
        Ok(self.organized.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_parse_raw_output() {
        assert_eq!(parse_raw_output("plain text"), json!("plain text"));
        assert_eq!(parse_raw_output("\"quoted\""), json!("quoted"));
        assert_eq!(
            parse_raw_output(r#"{"organic_results": []}"#),
            json!({"organic_results": []})
        );
        // 배열/숫자는 텍스트로 취급
        assert_eq!(parse_raw_output("[1, 2]"), json!("[1, 2]"));
        assert_eq!(parse_raw_output("2024"), json!("2024"));
    }

    #[tokio::test]
    async fn test_file_producer() {
        let dir = TempDir::new().unwrap();
        let raw_path = dir.path().join("raw.txt");
        let organized_path = dir.path().join("organized.txt");
        std::fs::write(&raw_path, "Cats purr.\nReferences:\n").unwrap();
        std::fs::write(&organized_path, "Cats purr:").unwrap();

        let producer = FileProducer::new(&raw_path).with_organized(&organized_path);
        assert_eq!(producer.path(), raw_path.as_path());
        assert_eq!(producer.search("cats").await.unwrap(), json!("Cats purr.\nReferences:\n"));
        assert_eq!(producer.organize("x").await.unwrap(), Some("Cats purr:".to_string()));
        assert_eq!(producer.name(), "file");
    }

    #[tokio::test]
    async fn test_file_producer_missing_file() {
        let dir = TempDir::new().unwrap();
        let producer = FileProducer::new(dir.path().join("missing.txt"));
        let err = producer.search("cats").await.unwrap_err();
        assert!(err.to_string().contains("Failed to read agent output"));
        assert_eq!(producer.organize("x").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_static_producer() {
        let producer = StaticProducer::text("hello").with_organized("organized");
        assert_eq!(producer.search("t").await.unwrap(), json!("hello"));
        assert_eq!(producer.organize("c").await.unwrap(), Some("organized".to_string()));
    }
}

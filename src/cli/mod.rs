//! CLI 모듈
//!
//! articube CLI 명령어 정의 및 구현

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::agent::{
    parse_raw_output, AgentProducer, FileProducer, KnowledgeAgent, SourcePipeline, StaticProducer,
};
use crate::config::PipelineConfig;
use crate::sources::{
    citations_from_json, format_response, is_valid_url, Clock, SourceExtractor, SystemClock,
};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "articube")]
#[command(version, about = "에이전트 출력에서 본문과 참고문헌 추출", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 원문에서 본문과 참고문헌 추출
    Extract {
        /// 에이전트 출력 파일
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// 직접 입력할 텍스트
        #[arg(short, long)]
        text: Option<String>,

        /// JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 전체 파이프라인 실행 (추출 + 폴백 + 응답)
    Sources {
        /// 질의 주제
        topic: String,

        /// 에이전트 출력 파일 (텍스트 또는 JSON)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// 직접 입력할 텍스트
        #[arg(short, long)]
        text: Option<String>,

        /// 정리된 본문 파일
        #[arg(short, long)]
        organized: Option<PathBuf>,

        /// JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 본문 + 소스 목록을 평문 응답으로 조립
    Format {
        /// 질의 주제
        topic: String,

        /// 본문 텍스트
        #[arg(short, long, default_value = "")]
        content: String,

        /// 소스 목록 파일 (JSON 또는 JSON을 포함한 텍스트)
        #[arg(short, long)]
        sources: Option<PathBuf>,
    },

    /// URL 검증
    CheckUrl {
        /// 검사할 URL
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

// ============================================================================
// CLI Runner
// ============================================================================

/// CLI 명령어 실행
pub async fn run(cli: Cli) -> Result<()> {
    let config = PipelineConfig::from_env();
    tracing::debug!("Pipeline config: {:?}", config);

    match cli.command {
        Commands::Extract { file, text, json } => cmd_extract(file, text, json, config).await,
        Commands::Sources {
            topic,
            file,
            text,
            organized,
            json,
        } => cmd_sources(&topic, file, text, organized, json, config).await,
        Commands::Format {
            topic,
            content,
            sources,
        } => cmd_format(&topic, &content, sources, config).await,
        Commands::CheckUrl { urls } => {
            cmd_check_url(&urls);
            Ok(())
        }
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

/// 추출 명령어 (extract)
async fn cmd_extract(
    file: Option<PathBuf>,
    text: Option<String>,
    json: bool,
    config: PipelineConfig,
) -> Result<()> {
    let raw = read_input(file, text).await?;
    let extractor = SourceExtractor::new(config, Arc::new(SystemClock));
    let result = extractor.extract(&raw);

    if json {
        let out = serde_json::to_string_pretty(&result).context("JSON 직렬화 실패")?;
        println!("{}", out);
        return Ok(());
    }

    println!("[OK] 본문: {} chars", result.content.chars().count());
    if !result.content.is_empty() {
        println!("     {}", truncate_text(&result.content, 200));
    }
    println!();

    if result.references.is_empty() {
        println!("[!] 참고문헌이 없습니다.");
        return Ok(());
    }

    println!("[OK] 참고문헌 ({} 건):\n", result.references.len());
    for (i, citation) in result.references.iter().enumerate() {
        println!("{}. {} ({})", i + 1, citation.title, citation.year);
        println!("   출처: {}", citation.source);
        if !citation.link.is_empty() {
            println!("   URL: {}", citation.link);
        }
        println!();
    }

    Ok(())
}

/// 전체 파이프라인 명령어 (sources)
async fn cmd_sources(
    topic: &str,
    file: Option<PathBuf>,
    text: Option<String>,
    organized: Option<PathBuf>,
    json: bool,
    config: PipelineConfig,
) -> Result<()> {
    let pipeline = SourcePipeline::new(config, Arc::new(SystemClock));

    match (file, text) {
        (Some(path), None) => {
            let mut producer = FileProducer::new(path);
            if let Some(organized) = organized {
                producer = producer.with_organized(organized);
            }
            run_agent(KnowledgeAgent::new(producer, pipeline), topic, json).await
        }
        (None, Some(text)) => {
            let mut producer = StaticProducer::new(parse_raw_output(&text));
            if let Some(organized) = organized {
                let organized = tokio::fs::read_to_string(&organized)
                    .await
                    .with_context(|| format!("정리된 본문 읽기 실패: {:?}", organized))?;
                producer = producer.with_organized(organized);
            }
            run_agent(KnowledgeAgent::new(producer, pipeline), topic, json).await
        }
        _ => bail!("--file 또는 --text 중 하나를 지정해야 합니다"),
    }
}

async fn run_agent<P: AgentProducer>(
    agent: KnowledgeAgent<P>,
    topic: &str,
    json: bool,
) -> Result<()> {
    let response = agent.get_information(topic).await;

    if json {
        let out = serde_json::to_string_pretty(&response).context("JSON 직렬화 실패")?;
        println!("{}", out);
    } else {
        let config = agent.pipeline().config();
        print!(
            "{}",
            format_response(topic, &response.response, &response.sources, config)
        );
    }

    Ok(())
}

/// 응답 조립 명령어 (format)
async fn cmd_format(
    topic: &str,
    content: &str,
    sources: Option<PathBuf>,
    config: PipelineConfig,
) -> Result<()> {
    let citations = match sources {
        Some(path) => {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("소스 파일 읽기 실패: {:?}", path))?;
            let value = serde_json::from_str(&text)
                .unwrap_or_else(|_| serde_json::Value::String(text.clone()));
            citations_from_json(&value, SystemClock.current_year())
        }
        None => Vec::new(),
    };

    print!("{}", format_response(topic, content, &citations, &config));
    Ok(())
}

/// URL 검증 명령어 (check-url)
fn cmd_check_url(urls: &[String]) {
    for url in urls {
        if is_valid_url(url) {
            println!("[OK] {}", url);
        } else {
            println!("[!] {} (유효하지 않음)", url);
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// 파일 또는 텍스트 입력 읽기
async fn read_input(file: Option<PathBuf>, text: Option<String>) -> Result<String> {
    match (file, text) {
        (Some(path), None) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("입력 파일 읽기 실패: {:?}", path)),
        (None, Some(text)) => Ok(text),
        _ => bail!("--file 또는 --text 중 하나를 지정해야 합니다"),
    }
}

/// 텍스트 자르기 (UTF-8 안전)
fn truncate_text(text: &str, max_chars: usize) -> String {
    let cleaned = text.replace('\n', " ").replace('\r', "");
    let cleaned = cleaned.trim();

    if cleaned.chars().count() <= max_chars {
        cleaned.to_string()
    } else {
        let truncated: String = cleaned.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

// ============================================================================
// Tests
// ============================================================================

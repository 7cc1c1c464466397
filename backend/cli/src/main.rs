//! `careline` — text-mode intake session.
//!
//! Reads conversation turns from stdin, maintains the medical narrative, and
//! prints the final summary plus the last diagnosis report on exit. The same
//! pipeline a voice host would drive, minus the audio.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing::info;

use careline_agent::{IntakeRunner, SessionEvent};
use careline_calllog::CallLogger;
use careline_config::CarelineConfig;
use careline_core::{CareError, DiagnosisService, NarrativeSummarizer};
use careline_diagnosis::{LlmDiagnosisService, StaticDiagnosisService};
use careline_narrative::{AppendSummarizer, LlmSummarizer};
use careline_providers::OpenAiCompatProvider;

#[derive(Parser)]
#[command(name = "careline")]
#[command(about = "Careline — medical intake listener with throttled diagnosis updates")]
#[command(version)]
struct Cli {
    /// Config file path (default: $CARELINE_CONFIG, then ./config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session identifier (default: a timestamp)
    #[arg(long)]
    session_id: Option<String>,

    /// Participant name attached to stdin turns
    #[arg(long, default_value = "caller")]
    participant: String,

    /// Run without model backends (append summarizer, empty diagnosis)
    #[arg(long)]
    mock: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(careline_config::config_file_path);
    let config = careline_config::load_config(&config_path).await;

    careline_logging::init_logger(&config.logging.dir, &config.logging.level);
    info!(config = %config_path.display(), "Careline starting");

    let session_id = cli
        .session_id
        .unwrap_or_else(|| Local::now().format("%Y%m%d_%H%M%S").to_string());

    let call_log = CallLogger::create(
        session_id.as_str(),
        &config.session.log_dir,
        &config.session.extract_dir,
        &config.session.summary_dir,
    )
    .await?;

    let (summarizer, diagnosis) = if cli.mock {
        mock_collaborators()
    } else {
        llm_collaborators(&config)?
    };

    let runner = IntakeRunner::new(
        session_id.as_str(),
        config.diagnosis_throttling.clone(),
        summarizer,
        diagnosis,
        Box::new(call_log),
    );

    let (tx, rx) = mpsc::channel(64);
    let session = tokio::spawn(runner.run(rx));

    info!(
        session_id = %session_id,
        "Intake session started; type conversation turns, Ctrl-D to finish"
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim().to_string();
        if text.is_empty() {
            continue;
        }
        let event = SessionEvent::ConversationTurn {
            participant: cli.participant.clone(),
            text,
        };
        if tx.send(event).await.is_err() {
            tracing::warn!(
                error = %CareError::ChannelClosed("intake session".to_string()),
                "Session loop is gone; stopping input"
            );
            break;
        }
    }
    let _ = tx.send(SessionEvent::Close).await;
    drop(tx);

    let summary = session.await??;

    let narrative = if summary.narrative.is_empty() {
        "(no medical information captured)"
    } else {
        summary.narrative.as_str()
    };
    println!("\nMedical Summary:\n{narrative}");
    if let Some(report) = &summary.last_report {
        println!(
            "\nLast diagnosis report:\n{}",
            serde_json::to_string_pretty(report)?
        );
    }

    Ok(())
}

fn mock_collaborators() -> (Arc<dyn NarrativeSummarizer>, Arc<dyn DiagnosisService>) {
    (
        Arc::new(AppendSummarizer),
        Arc::new(StaticDiagnosisService::empty()),
    )
}

/// Build the LLM-backed collaborators from config, falling back to the
/// conventional env vars for keys.
fn llm_collaborators(
    config: &CarelineConfig,
) -> Result<(Arc<dyn NarrativeSummarizer>, Arc<dyn DiagnosisService>)> {
    let summarizer_key = config
        .summarizer
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .context("no summarizer API key: set summarizer.api_key or OPENAI_API_KEY, or pass --mock")?;
    let mut provider = OpenAiCompatProvider::new("openai", summarizer_key);
    if let Some(url) = &config.summarizer.base_url {
        provider = provider.with_base_url(url.as_str());
    }
    let summarizer = LlmSummarizer::new(
        Arc::new(provider),
        config.summarizer.model.as_str(),
        config.summarizer.max_tokens,
        config.summarizer.temperature,
    );

    let diagnosis_key = config
        .diagnosis
        .api_key
        .clone()
        .or_else(|| std::env::var("NEBIUS_TOKEN").ok().filter(|k| !k.is_empty()))
        .or_else(|| std::env::var("HF_TOKEN").ok())
        .context("no diagnosis API key: set diagnosis.api_key, NEBIUS_TOKEN, or HF_TOKEN, or pass --mock")?;
    let mut provider = OpenAiCompatProvider::new("nebius", diagnosis_key);
    if let Some(url) = &config.diagnosis.base_url {
        provider = provider.with_base_url(url.as_str());
    }
    let diagnosis = LlmDiagnosisService::new(
        Arc::new(provider),
        config.diagnosis.model.as_str(),
        config.diagnosis.max_tokens,
        config.diagnosis.temperature,
    );

    Ok((Arc::new(summarizer), Arc::new(diagnosis)))
}

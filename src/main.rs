//! Validin - Indonesian news hoax detection service
//!
//! # Usage
//!
//! ```bash
//! # Run the HTTP service (default subcommand)
//! VALIDIN_API_KEY=... ./validin serve --addr 0.0.0.0:8080
//!
//! # Classify one text and print the result
//! ./validin check --text "Beredar kabar ..."
//! ./validin check --file berita.txt --json
//! ```
//!
//! # Environment Variables
//!
//! - `VALIDIN_CONFIG`: Path to the TOML configuration file
//! - `VALIDIN_API_KEY` / `XAI_API_KEY`: Advisory service credential
//! - `VALIDIN_CORS_ORIGINS`: Comma-separated origins allowed by CORS
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use validin::advisory::{AdvisoryClient, HttpTransport};
use validin::api::{create_app, AppState};
use validin::classifier::{Classifier, ServingModel};
use validin::config::{defaults, ValidinConfig};
use validin::pipeline::Orchestrator;
use validin::text::{KerasVocabulary, Normalizer, Sequencer, StopWords, TokenEncoder};
use validin::Assessment;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "validin")]
#[command(about = "Validin - Indonesian news hoax detection")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file (overrides VALIDIN_CONFIG and ./validin.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Run the HTTP service
    Serve {
        /// Override the server address (default: "0.0.0.0:8080")
        #[arg(short, long, value_name = "HOST:PORT")]
        addr: Option<String>,
    },

    /// Classify a single text and print the verdict and advisory
    Check {
        /// News text to classify
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,

        /// Read the news text from a file
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Print the assessment as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskName {
    HttpServer,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskName::HttpServer => write!(f, "HttpServer"),
        }
    }
}

// ============================================================================
// Initialization
// ============================================================================

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

/// Load artifacts and connect to the model. Any failure here is fatal.
async fn init_orchestrator(config: &ValidinConfig) -> Result<Orchestrator> {
    let stopwords = StopWords::load(config.text.stopwords_path.as_deref())
        .context("Failed to load stop-word list")?;
    info!(words = stopwords.len(), "Stop words loaded");
    let normalizer = Normalizer::new(stopwords).context("Failed to build normalizer")?;

    let vocab_path = &config.text.vocabulary_path;
    let vocabulary = KerasVocabulary::load(vocab_path, config.text.num_words)
        .with_context(|| format!("Failed to load vocabulary from {}", vocab_path.display()))?
        .with_default_num_words(defaults::MAX_FEATURES);
    info!(
        path = %vocab_path.display(),
        words = vocabulary.vocabulary_size(),
        num_words = ?vocabulary.num_words(),
        "Vocabulary loaded"
    );
    let sequencer = Sequencer::new(Arc::new(vocabulary), config.classifier.max_len);

    let model = ServingModel::connect(&config.model)
        .await
        .with_context(|| format!("Model server not ready at {}", config.model.serving_url))?;
    let classifier = Classifier::new(Arc::new(model), &config.classifier);
    info!(
        backend = classifier.backend_name(),
        threshold = classifier.threshold(),
        max_len = config.classifier.max_len,
        "Classifier ready"
    );

    let advisory = match config.advisory.usable_key() {
        Some(key) => {
            let transport = HttpTransport::new(
                &config.advisory.endpoint,
                key.clone(),
                config.advisory.timeout(),
            )
            .context("Failed to build advisory HTTP client")?;
            info!(
                endpoint = %config.advisory.endpoint,
                model = %config.advisory.model,
                style = ?config.advisory.prompt_style,
                "External advisory enabled"
            );
            Some(AdvisoryClient::new(Arc::new(transport), &config.advisory))
        }
        None if config.advisory.enabled => {
            warn!("No advisory API key (VALIDIN_API_KEY / XAI_API_KEY); using fallback templates only");
            None
        }
        None => {
            info!("External advisory disabled by config; using fallback templates only");
            None
        }
    };

    Ok(Orchestrator::new(
        Arc::new(normalizer),
        sequencer,
        classifier,
        advisory,
        config,
    ))
}

// ============================================================================
// Serve
// ============================================================================

/// Spawn the HTTP server task into the JoinSet.
fn spawn_http_server(
    task_set: &mut JoinSet<Result<TaskName>>,
    listener: tokio::net::TcpListener,
    app: axum::Router,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[HttpServer] Task starting");

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                info!("[HttpServer] Received shutdown signal");
            })
            .await;

        match result {
            Ok(()) => {
                info!("[HttpServer] Graceful shutdown complete");
                Ok(TaskName::HttpServer)
            }
            Err(e) => {
                error!("[HttpServer] Server error: {}", e);
                Err(anyhow::anyhow!("HTTP server error: {}", e))
            }
        }
    });
}

/// Run the supervisor loop until every task has finished.
async fn run_supervisor(task_set: &mut JoinSet<Result<TaskName>>) -> Result<()> {
    while let Some(result) = task_set.join_next().await {
        match result {
            Ok(Ok(task_name)) => info!("Supervisor: task {} completed", task_name),
            Ok(Err(e)) => {
                error!("Supervisor: task failed: {}", e);
                return Err(e);
            }
            Err(e) => {
                error!("Supervisor: task panicked: {}", e);
                return Err(anyhow::anyhow!("Task panicked: {}", e));
            }
        }
    }
    Ok(())
}

async fn serve(config: ValidinConfig, addr_override: Option<String>) -> Result<()> {
    let server_addr = addr_override.unwrap_or_else(|| config.server.addr.clone());
    let orchestrator = init_orchestrator(&config).await?;
    let app = create_app(AppState::new(Arc::new(orchestrator)));

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", server_addr))?;
    info!("HTTP server listening on {}", server_addr);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let mut task_set: JoinSet<Result<TaskName>> = JoinSet::new();
    spawn_http_server(&mut task_set, listener, app, cancel_token);
    run_supervisor(&mut task_set).await
}

// ============================================================================
// Check
// ============================================================================

fn print_assessment(assessment: &Assessment) {
    let verdict = &assessment.verdict;
    println!(
        "{} (kepercayaan: {:.2}%, {})",
        verdict.class,
        verdict.confidence,
        verdict.confidence_level().label()
    );
    println!();
    if assessment.advisory.is_fallback() {
        println!("[rekomendasi otomatis]");
    }
    println!("{}", assessment.advisory.text);
}

async fn check(config: ValidinConfig, text: Option<String>, file: Option<PathBuf>, json: bool) -> Result<()> {
    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("either --text or --file is required"),
    };

    let orchestrator = init_orchestrator(&config).await?;
    match orchestrator.assess(&text).await {
        Ok(assessment) if json => {
            println!("{}", serde_json::to_string_pretty(&assessment)?);
            Ok(())
        }
        Ok(assessment) => {
            print_assessment(&assessment);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(anyhow::Error::new(e).context("Text could not be classified"))
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let config = ValidinConfig::load_with_path(args.config.as_deref());

    match args.command {
        None => serve(config, None).await,
        Some(SubCommand::Serve { addr }) => serve(config, addr).await,
        Some(SubCommand::Check { text, file, json }) => check(config, text, file, json).await,
    }
}

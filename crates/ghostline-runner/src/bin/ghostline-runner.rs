//! `ghostline-runner` CLI: a thin driver over `WorkflowOrchestrator`,
//! grounded on `ink-cli`'s `clap::Subcommand` + `tracing_subscriber`
//! wiring. Uses a `MockProvider` for every agent role since the real
//! Anthropic/OpenAI `ModelProvider` implementations are an external
//! collaborator (spec §6 `ProviderSDKs`) this crate does not vendor;
//! swap `build_agents` for a deployment with live provider SDKs wired in.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ghostline_agents::{Agent, AgentRole};
use ghostline_core::config::{GhostlineConfig, ModelConfig};
use ghostline_core::model::Provider;
use ghostline_cost::{CostLedger, SqliteCostLedger};
use ghostline_embed::mock::HashEmbeddingBackend;
use ghostline_embed::Embedder;
use ghostline_modelclient::mock::MockProvider;
use ghostline_modelclient::ModelClient;
use ghostline_orchestrator::{
    IngestedSource, SqliteCheckpointSaver, WorkflowAgents, WorkflowOrchestrator,
};
use ghostline_retrieval::{ChunkStore, InMemoryChunkStore};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ghostline-runner", about = "C12 TaskRunner CLI driver for the ghostline workflow core")]
struct Cli {
    /// Path to the SQLite checkpoint database (created if missing).
    #[arg(long, default_value = "ghostline-checkpoints.sqlite3")]
    checkpoint_db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new book-generation workflow; pauses at outline review.
    Start {
        workflow_id: String,
        project_id: String,
        user_id: String,
        title: String,
        description: String,
        /// One source document per flag; paragraphs become retrieval chunks.
        #[arg(long = "source")]
        sources: Vec<PathBuf>,
        #[arg(long = "writing-sample")]
        writing_samples: Vec<PathBuf>,
        #[arg(long)]
        target_pages: Option<u32>,
        #[arg(long, default_value_t = 3)]
        target_chapters: u32,
        #[arg(long, default_value_t = 250)]
        words_per_page: u32,
    },
    /// Resume a paused workflow with the user's approval decision.
    Resume {
        workflow_id: String,
        title: String,
        description: String,
        #[arg(long)]
        approve_outline: bool,
        #[arg(long)]
        feedback: Option<String>,
    },
    /// Print the last checkpointed state for a workflow.
    Status { workflow_id: String },
}

fn read_chunks(path: &PathBuf) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect())
}

fn build_agent(name: &str, role: AgentRole, config: &ModelConfig, strict: bool) -> Result<Agent> {
    let ledger: Arc<dyn CostLedger> = Arc::new(SqliteCostLedger::open_in_memory()?);
    let client = ModelClient::new(
        Arc::new(MockProvider::succeeding(Provider::Anthropic, "{}")),
        None,
        config.clone(),
        ledger,
        strict,
    );
    Ok(Agent::new(name, role, client))
}

fn build_agents(config: &GhostlineConfig) -> Result<WorkflowAgents> {
    let strict = config.strict_mode.enabled;
    let model = &config.model;
    Ok(WorkflowAgents {
        outline_planner: build_agent("OutlinePlanner", AgentRole::OutlinePlanner, model, strict)?,
        outline_critic: build_agent("OutlineCritic", AgentRole::OutlineCritic, model, strict)?,
        content_drafter: build_agent("ContentDrafter", AgentRole::ContentDrafter, model, strict)?,
        voice_editor: build_agent("VoiceEditor", AgentRole::VoiceEditor, model, strict)?,
        fact_checker: build_agent("FactChecker", AgentRole::FactChecker, model, strict)?,
        cohesion_analyst: build_agent("CohesionAnalyst", AgentRole::CohesionAnalyst, model, strict)?,
        voice_analyst: build_agent("VoiceAnalyst", AgentRole::VoiceAnalyst, model, strict)?,
    })
}

/// Dimension for the bundled `HashEmbeddingBackend` stand-in. Unrelated to
/// `ModelConfig::embedding_dimension`, which describes a real embedding
/// provider this binary does not wire in (spec §6 `ProviderSDKs`).
const CLI_EMBEDDING_DIM: usize = 32;

fn build_orchestrator(cli: &Cli, config: GhostlineConfig) -> Result<WorkflowOrchestrator> {
    let agents = build_agents(&config)?;
    let store: Arc<dyn ChunkStore> = Arc::new(InMemoryChunkStore::new(vec![]));
    let embedder = Embedder::new(
        Box::new(HashEmbeddingBackend::new(CLI_EMBEDDING_DIM)),
        CLI_EMBEDDING_DIM,
        config.model.allow_dimension_mismatch,
    );
    let checkpoints = Arc::new(SqliteCheckpointSaver::open(
        cli.checkpoint_db.to_str().context("checkpoint-db path must be valid UTF-8")?,
    )?);
    Ok(WorkflowOrchestrator::new(store, embedder, agents, checkpoints, config))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = GhostlineConfig::from_env();

    let exit_code = match &cli.command {
        Commands::Start {
            workflow_id,
            project_id,
            user_id,
            title,
            description,
            sources,
            writing_samples,
            target_pages,
            target_chapters,
            words_per_page,
        } => {
            let orchestrator = build_orchestrator(&cli, config)?;
            let sources = sources
                .iter()
                .map(|path| {
                    Ok(IngestedSource {
                        source_material_id: path.display().to_string(),
                        filename: path
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_default(),
                        chunks: read_chunks(path)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let writing_samples = writing_samples
                .iter()
                .map(fs::read_to_string)
                .collect::<Result<Vec<_>, _>>()
                .context("reading writing samples")?;

            match orchestrator.start(
                workflow_id,
                project_id,
                user_id,
                title,
                description,
                sources,
                writing_samples,
                *target_pages,
                *target_chapters,
                *words_per_page,
            ) {
                Ok(state) => {
                    println!("{}", serde_json::to_string_pretty(&state)?);
                    0
                }
                Err(err) => {
                    eprintln!("start failed: {err}");
                    err.exit_code()
                }
            }
        }
        Commands::Resume {
            workflow_id,
            title,
            description,
            approve_outline,
            feedback,
        } => {
            let orchestrator = build_orchestrator(&cli, config)?;
            match orchestrator.resume(workflow_id, title, description, *approve_outline, feedback.clone()) {
                Ok(state) => {
                    println!("{}", serde_json::to_string_pretty(&state)?);
                    0
                }
                Err(err) => {
                    eprintln!("resume failed: {err}");
                    err.exit_code()
                }
            }
        }
        Commands::Status { workflow_id } => {
            let orchestrator = build_orchestrator(&cli, config)?;
            match orchestrator.get_state(workflow_id) {
                Ok(state) => {
                    println!("{}", serde_json::to_string_pretty(&state)?);
                    0
                }
                Err(err) => {
                    eprintln!("status failed: {err}");
                    err.exit_code()
                }
            }
        }
    };

    std::process::exit(exit_code);
}

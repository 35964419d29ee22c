use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use trellis_config::WorkflowDef;
use trellis_indexer::{IndexerConfig, LogNotifier, TriggerIndexer};
use trellis_resolver::{Resolver, StandardResolver};
use trellis_store::{SqliteTriggerStore, TriggerStore};

/// Trellis - trigger indexing for workflow definitions
#[derive(Parser)]
#[command(name = "trellis")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.trellis)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Maximum payloads kept per trigger activity
  #[arg(long, global = true)]
  max_payloads: Option<usize>,

  /// Timeout for evaluating a single input expression, in milliseconds
  #[arg(long, global = true)]
  evaluation_timeout_ms: Option<u64>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Index the triggers of a workflow definition
  Index {
    /// Path to the workflow file (JSON)
    workflow_file: PathBuf,
  },

  /// List the stored triggers of a workflow definition
  List { definition_id: String },

  /// List the stored triggers of one trigger type across all workflows
  ListByName {
    /// Trigger type name, e.g. "Cron"
    name: String,
  },

  /// Delete every stored trigger of a workflow definition
  Delete { definition_id: String },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let Some(command) = cli.command else {
    println!("trellis - use --help to see available commands");
    return Ok(());
  };

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".trellis"),
  };

  let mut config = IndexerConfig::default();
  if let Some(max) = cli.max_payloads {
    config.max_payloads_per_trigger = max;
  }
  if let Some(ms) = cli.evaluation_timeout_ms {
    config.evaluation_timeout = Duration::from_millis(ms);
  }

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run(command, data_dir, config).await })
}

async fn run(command: Commands, data_dir: PathBuf, config: IndexerConfig) -> Result<()> {
  tokio::fs::create_dir_all(&data_dir)
    .await
    .with_context(|| format!("failed to create data directory: {}", data_dir.display()))?;

  let db_path = data_dir.join("triggers.db");
  let store = Arc::new(
    SqliteTriggerStore::open(&db_path)
      .await
      .with_context(|| format!("failed to open trigger store: {}", db_path.display()))?,
  );

  match command {
    Commands::Index { workflow_file } => {
      let indexer = TriggerIndexer::new(store, config).with_notifier(LogNotifier);
      index_workflow(&indexer, workflow_file).await
    }
    Commands::List { definition_id } => {
      let triggers = store
        .find_by_definition_id(&definition_id)
        .await
        .context("failed to list triggers")?;
      println!("{}", serde_json::to_string_pretty(&triggers)?);
      Ok(())
    }
    Commands::ListByName { name } => {
      let triggers = store
        .find_by_name(&name)
        .await
        .context("failed to list triggers")?;
      println!("{}", serde_json::to_string_pretty(&triggers)?);
      Ok(())
    }
    Commands::Delete { definition_id } => {
      let indexer = TriggerIndexer::new(store, config).with_notifier(LogNotifier);
      let removed = indexer
        .delete_triggers(&definition_id, cancel_on_ctrl_c())
        .await
        .context("failed to delete triggers")?;
      println!("{}", serde_json::to_string_pretty(&removed)?);
      Ok(())
    }
  }
}

async fn index_workflow(indexer: &TriggerIndexer, workflow_file: PathBuf) -> Result<()> {
  let workflow_content = tokio::fs::read_to_string(&workflow_file)
    .await
    .with_context(|| format!("failed to read workflow file: {}", workflow_file.display()))?;

  let workflow_def: WorkflowDef = serde_json::from_str(&workflow_content)
    .with_context(|| format!("failed to parse workflow file: {}", workflow_file.display()))?;

  let workflow = StandardResolver::default()
    .resolve(workflow_def)
    .context("failed to resolve workflow")?;

  let result = indexer
    .index_triggers(&workflow, cancel_on_ctrl_c())
    .await
    .context("failed to index triggers")?;

  let output = serde_json::json!({
    "definition_id": result.definition_id(),
    "version": result.workflow.identity.version,
    "is_published": result.workflow.is_published(),
    "added": result.added,
    "removed": result.removed,
    "unchanged": result.unchanged,
  });
  println!("{}", serde_json::to_string_pretty(&output)?);

  Ok(())
}

/// A token that is cancelled when the process receives Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
  let cancel = CancellationToken::new();
  let token = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      warn!("interrupt received, cancelling");
      token.cancel();
    }
  });
  cancel
}

//! todo-sync: command-line front end for a remote todo collection.
//!
//! Each invocation loads the collection, performs one command through the
//! synchronization controller, and prints the resulting list.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use todo_sync::transport::http::HttpTransport;
use todo_sync::transport::memory::InMemoryTransport;
use todo_sync::{
    AppState, Outcome, RecordId, RecordTransport, StateChange, SyncConfig, SyncController,
};

/// Keep a remote todo list in sync from the command line
#[derive(Parser)]
#[command(name = "todo-sync")]
#[command(about = "Synchronize a remote todo collection", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true, env = "TODO_SYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Server origin, overriding config and environment
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Use an empty in-process collection instead of the network
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the collection
    List,

    /// Create a task
    Add {
        /// Task text
        text: String,
    },

    /// Flip a task's completed flag
    Toggle {
        /// Record identifier
        id: String,
    },

    /// Replace a task's text
    Edit {
        /// Record identifier
        id: String,
        /// New task text
        text: String,
    },

    /// Delete a task
    Delete {
        /// Record identifier
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SyncConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SyncConfig::default(),
    }
    .with_env_overrides();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    todo_sync::logging::init(config.log_filter.as_deref()).map_err(|err| anyhow::anyhow!(err))?;

    let transport: Arc<dyn RecordTransport> = if cli.offline {
        Arc::new(InMemoryTransport::new())
    } else {
        Arc::new(HttpTransport::from_config(&config)?)
    };
    let controller = SyncController::new(transport);
    controller.subscribe(|change| {
        if let StateChange::OperationFailed { operation, message } = change {
            eprintln!("{operation} failed: {message}");
        }
    });

    let loaded = controller.load().await;
    let outcome = match cli.command.unwrap_or(Commands::List) {
        Commands::List => loaded,
        Commands::Add { text } => {
            controller.set_input(text);
            controller.add().await
        }
        Commands::Toggle { id } => controller.toggle_completed(&RecordId::from(id)).await,
        Commands::Edit { id, text } => {
            let id = RecordId::from(id);
            match controller.begin_edit(&id) {
                Outcome::Applied => {
                    let _ = controller.update_edit_draft(text);
                    controller.save_edit().await
                }
                skipped => skipped,
            }
        }
        Commands::Delete { id } => controller.delete(&RecordId::from(id)).await,
    };

    if let Outcome::Skipped(reason) = &outcome {
        eprintln!("nothing to do: {reason:?}");
    }
    print!("{}", render(&controller.snapshot()));

    if outcome.is_failed() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn render(state: &AppState) -> String {
    let mut out = String::new();
    for record in state.records() {
        let mark = if record.completed { 'x' } else { ' ' };
        let editing = if state.is_editing(&record.id) { " *" } else { "" };
        out.push_str(&format!("[{mark}] {}  {}{editing}\n", record.id, record.task));
    }
    out
}

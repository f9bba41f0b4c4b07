// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, built on clap.
// Everything beyond argument parsing and printing is delegated
// to Layer 2 (application) and Layer 5 (infra).
//
// Two commands are supported:
//   1. `init` — bootstraps a run and writes its config snapshot
//   2. `show` — prints the resolved config of an existing run
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InitArgs, ShowArgs};

use crate::application::init_run_use_case::InitRunUseCase;
use crate::infra::logging::init_stdout_logger;
use crate::infra::snapshot::SnapshotStore;

#[derive(Parser, Debug)]
#[command(
    name = "cifar-pipeline",
    version,
    about = "Resolve and bootstrap the configuration of a CIFAR-10 training run."
)]
pub struct Cli {
    /// The subcommand to run (init or show)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Init(args) => run_init(args),
            Commands::Show(args) => run_show(args),
        }
    }
}

/// Handles the `init` subcommand.
fn run_init(args: InitArgs) -> Result<()> {
    let run = InitRunUseCase::new(args.into()).execute()?;
    let stores = run.config.stores();

    println!("Run id:        {}", stores.unique_id());
    println!("Device:        {}", run.config.device());
    println!("Logs dir:      {}", stores.logs_dir().display());
    println!("Artifacts dir: {}", stores.artifacts_dir().display());
    println!("Snapshot:      {}", run.snapshot.display());
    Ok(())
}

/// Handles the `show` subcommand.
fn run_show(args: ShowArgs) -> Result<()> {
    init_stdout_logger(tracing::Level::WARN)?;

    let resolved = SnapshotStore::new(args.artifacts_dir).load_resolved()?;
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

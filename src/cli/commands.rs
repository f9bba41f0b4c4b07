// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `init` and `show`, and their flags.
//
// clap's derive macros generate --help, error messages for bad
// values and the string → number conversions.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use crate::application::init_run_use_case::InitRunConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new run: directories, logging and a config snapshot
    Init(InitArgs),

    /// Print the resolved configuration saved by a previous run
    Show(ShowArgs),
}

/// All arguments for the `init` command.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project root; `data/` and `stores/` are created under it
    #[arg(long, default_value = ".")]
    pub base_dir: PathBuf,

    /// JSON file with (partial) parameter-group overrides
    #[arg(long)]
    pub overrides: Option<PathBuf>,

    /// Directory containing (or receiving) the cifar10 dataset folder
    #[arg(long)]
    pub root_dir: Option<PathBuf>,

    /// Project name used to group run directories
    #[arg(long)]
    pub project_name: Option<String>,

    /// Reuse this run id instead of generating one
    #[arg(long)]
    pub run_id: Option<String>,

    /// Number of training epochs
    #[arg(long)]
    pub epochs: Option<usize>,

    /// Optimizer learning rate
    #[arg(long, value_parser = parse_finite)]
    pub lr: Option<f64>,

    /// Batch size for the train, valid and test loaders
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Turn on debug mode for the loaders and the training loop
    #[arg(long)]
    pub debug: bool,

    /// trace, debug, info, warn or error (RUST_LOG wins when set)
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,
}

/// Accept only finite numbers; "NaN" and "inf" parse as f64 but have no
/// JSON representation.
fn parse_finite(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{raw}' is not a finite number"))
    }
}

/// Convert CLI InitArgs into the application-layer InitRunConfig.
impl From<InitArgs> for InitRunConfig {
    fn from(a: InitArgs) -> Self {
        InitRunConfig {
            base_dir:       a.base_dir,
            overrides_file: a.overrides,
            root_dir:       a.root_dir,
            project_name:   a.project_name,
            run_id:         a.run_id,
            epochs:         a.epochs,
            lr:             a.lr,
            batch_size:     a.batch_size,
            debug:          a.debug,
            log_level:      a.log_level,
            init_logging:   true,
        }
    }
}

/// All arguments for the `show` command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Artifacts directory of the run (stores/model_artifacts/<project>/<id>)
    #[arg(long)]
    pub artifacts_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_init_flags_map_onto_run_config() {
        let cli = Cli::try_parse_from([
            "cifar-pipeline", "init",
            "--base-dir", "/tmp/project",
            "--epochs", "7",
            "--lr", "0.001",
            "--debug",
            "--log-level", "debug",
        ])
        .unwrap();

        let Commands::Init(args) = cli.command else {
            panic!("expected init");
        };
        let cfg: InitRunConfig = args.into();

        assert_eq!(cfg.base_dir, PathBuf::from("/tmp/project"));
        assert_eq!(cfg.epochs, Some(7));
        assert_eq!(cfg.lr, Some(0.001));
        assert!(cfg.debug);
        assert_eq!(cfg.log_level, Level::DEBUG);
        assert!(cfg.run_id.is_none());
    }

    #[test]
    fn test_non_finite_lr_is_refused_at_parse_time() {
        for bad in ["NaN", "inf", "-inf"] {
            let res = Cli::try_parse_from(["cifar-pipeline", "init", "--lr", bad]);
            assert!(res.is_err(), "--lr {bad} should be refused");
        }
    }

    #[test]
    fn test_show_requires_artifacts_dir() {
        assert!(Cli::try_parse_from(["cifar-pipeline", "show"]).is_err());
    }
}

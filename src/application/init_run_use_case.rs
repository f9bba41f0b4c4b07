// ============================================================
// Layer 2 — InitRunUseCase
// ============================================================
// Prepares everything a training run needs before the first
// batch is loaded:
//
//   Step 1: Bootstrap the project layout   (Layer 5 - infra)
//   Step 2: Load the overrides file         (Layer 2)
//   Step 3: Apply command-line overrides    (Layer 2)
//   Step 4: Assemble the configuration      (Layer 2 + 3 + 5)
//   Step 5: Start logging into the run dir  (Layer 5 - infra)
//   Step 6: Save the config snapshot        (Layer 5 - infra)
//
// The returned RunContext is what gets handed to the data
// loader, model builder and training loop.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::Level;

use crate::application::pipeline_config::{PipelineConfig, PipelineSpec};
use crate::domain::error::ConfigResult;
use crate::infra::{
    device::DeviceProbe,
    layout::ProjectLayout,
    logging::{init_logger, LoggerHandle},
    snapshot::SnapshotStore,
};

// ─── Run Initialisation Settings ─────────────────────────────────────────────
// Everything a caller may pin for a new run. Fields left as None
// keep whatever the overrides file (or the defaults) say.
#[derive(Debug, Clone)]
pub struct InitRunConfig {
    pub base_dir:       PathBuf,
    pub overrides_file: Option<PathBuf>,
    pub root_dir:       Option<PathBuf>,
    pub project_name:   Option<String>,
    pub run_id:         Option<String>,
    pub epochs:         Option<usize>,
    pub lr:             Option<f64>,
    pub batch_size:     Option<usize>,
    pub debug:          bool,
    pub log_level:      Level,
    /// Install the process-wide logger. Off in tests.
    pub init_logging:   bool,
}

impl Default for InitRunConfig {
    fn default() -> Self {
        Self {
            base_dir:       PathBuf::from("."),
            overrides_file: None,
            root_dir:       None,
            project_name:   None,
            run_id:         None,
            epochs:         None,
            lr:             None,
            batch_size:     None,
            debug:          false,
            log_level:      Level::INFO,
            init_logging:   true,
        }
    }
}

impl InitRunConfig {
    /// Layer the explicit settings on top of `spec`.
    fn apply_to(&self, spec: &mut PipelineSpec, layout: &ProjectLayout) -> ConfigResult<()> {
        if let Some(root) = &self.root_dir {
            spec.data.root_dir = root.clone();
        }
        // Relative data roots are taken relative to the project base.
        if spec.data.root_dir.is_relative() {
            spec.data.root_dir = layout.base_dir().join(&spec.data.root_dir);
        }

        if let Some(name) = &self.project_name {
            spec.stores.project_name = name.clone();
        }
        if let Some(id) = &self.run_id {
            spec.stores.unique_id = Some(id.clone());
        }
        if let Some(epochs) = self.epochs {
            spec.global_train_params.epochs = epochs;
        }
        if let Some(lr) = self.lr {
            spec.optimizer_params.set_lr(lr)?;
        }
        if let Some(batch_size) = self.batch_size {
            spec.datamodule.set_batch_size(batch_size);
        }
        if self.debug {
            spec.global_train_params.debug = true;
            spec.datamodule.debug          = true;
        }
        Ok(())
    }
}

/// The outcome of initialising a run.
#[derive(Debug)]
pub struct RunContext {
    pub config:   PipelineConfig,
    pub snapshot: PathBuf,
    pub logger:   Option<LoggerHandle>,
}

// ─── InitRunUseCase ───────────────────────────────────────────────────────────
pub struct InitRunUseCase {
    settings: InitRunConfig,
    probe:    Option<Box<dyn DeviceProbe>>,
}

impl InitRunUseCase {
    pub fn new(settings: InitRunConfig) -> Self {
        Self { settings, probe: None }
    }

    /// Use a specific device probe instead of the environment.
    pub fn with_device_probe(mut self, probe: impl DeviceProbe + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    /// Resolve the declared configuration without touching the filesystem
    /// beyond reading the overrides file.
    pub fn resolve_spec(&self) -> Result<PipelineSpec> {
        let layout = ProjectLayout::new(&self.settings.base_dir);

        let mut spec = match &self.settings.overrides_file {
            Some(path) => PipelineSpec::from_file(path)
                .with_context(|| format!("Cannot load overrides '{}'", path.display()))?,
            None => PipelineSpec::default(),
        };

        self.settings
            .apply_to(&mut spec, &layout)
            .context("Invalid command-line override")?;
        Ok(spec)
    }

    /// Run the whole initialisation pipeline.
    pub fn execute(self) -> Result<RunContext> {
        let settings = &self.settings;

        // ── Step 1: Project layout ───────────────────────────────────────────
        let layout = ProjectLayout::new(&settings.base_dir);
        layout
            .ensure()
            .with_context(|| format!("Cannot prepare project under '{}'", layout.base_dir().display()))?;

        // ── Steps 2–3: Declared configuration ────────────────────────────────
        let spec = self.resolve_spec()?;

        // ── Step 4: Assemble ─────────────────────────────────────────────────
        let mut builder = PipelineConfig::builder().layout(layout).spec(spec);
        if let Some(probe) = self.probe {
            builder = builder.device_probe(probe);
        }
        let config = builder.build().context("Cannot assemble pipeline config")?;

        // ── Step 5: Logging ──────────────────────────────────────────────────
        let logger = if self.settings.init_logging {
            let handle = init_logger(config.stores().logs_dir(), self.settings.log_level)?;
            // Assembly warnings fired before any subscriber existed.
            for warning in config.consistency_warnings() {
                tracing::warn!("{warning}");
            }
            Some(handle)
        } else {
            None
        };

        tracing::info!(
            "Initialised run '{}' (project '{}') on {}",
            config.stores().unique_id(),
            config.stores().project_name(),
            config.device()
        );
        tracing::info!(
            "Data dir '{}' (download needed: {}), {} epochs, optimizer {}",
            config.data().data_dir().display(),
            config.data().download(),
            config.global_train_params().epochs,
            config.optimizer_params().optimizer_name
        );

        // ── Step 6: Snapshot ─────────────────────────────────────────────────
        let snapshot = SnapshotStore::for_run(&config).save(&config)?;
        tracing::info!("Config snapshot written to '{}'", snapshot.display());

        Ok(RunContext { config, snapshot, logger })
    }
}

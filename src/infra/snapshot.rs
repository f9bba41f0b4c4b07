// ============================================================
// Layer 5 — Configuration Snapshot
// ============================================================
// Saves the configuration a run was started with next to its
// artifacts, so the run can be inspected or rebuilt later.
//
// File: <artifacts_dir>/pipeline_config.json
//
//   {
//     "declared": { ...PipelineSpec, run id pinned... },
//     "resolved": { ...every group incl. derived paths + device... }
//   }
//
// Only "declared" is read back when rebuilding: derived values
// are always recomputed, never trusted from disk. "resolved" is
// there for humans and for tools that just want to look.
//
// Reference: serde_json documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fs, path::PathBuf};

use crate::application::pipeline_config::{PipelineConfig, PipelineSpec};
use crate::infra::layout::ProjectLayout;

/// File name of the snapshot inside a run's artifacts directory.
pub const SNAPSHOT_FILE_NAME: &str = "pipeline_config.json";

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    declared: PipelineSpec,
    resolved: Value,
}

/// Reads and writes the snapshot of one run.
pub struct SnapshotStore {
    /// The run's artifacts directory
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The snapshot store of a resolved configuration's own run.
    pub fn for_run(config: &PipelineConfig) -> Self {
        Self::new(config.stores().artifacts_dir())
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE_NAME)
    }

    /// Write the snapshot, replacing any previous one.
    pub fn save(&self, config: &PipelineConfig) -> Result<PathBuf> {
        let snapshot = Snapshot {
            declared: config.spec(),
            resolved: serde_json::to_value(config)?,
        };

        let path = self.path();
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write snapshot to '{}'", path.display()))?;

        tracing::debug!("Saved pipeline config snapshot to '{}'", path.display());
        Ok(path)
    }

    fn read(&self) -> Result<Snapshot> {
        let path = self.path();
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read snapshot from '{}'. Was this run created with 'init'?",
                path.display()
            )
        })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed snapshot '{}'", path.display()))
    }

    /// The declared values the run was started with.
    pub fn load_spec(&self) -> Result<PipelineSpec> {
        Ok(self.read()?.declared)
    }

    /// The resolved view as written, for display.
    pub fn load_resolved(&self) -> Result<Value> {
        Ok(self.read()?.resolved)
    }

    /// Rebuild the run's configuration. The run id is reused, so the same
    /// directories are ensured again rather than new ones created.
    pub fn restore(&self, layout: ProjectLayout) -> Result<PipelineConfig> {
        let spec = self.load_spec()?;
        PipelineConfig::from_spec(spec, layout)
            .with_context(|| format!("Cannot rebuild config from '{}'", self.path().display()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::device::FixedProbe;
    use tempfile::TempDir;

    fn config_in(tmp: &TempDir) -> PipelineConfig {
        PipelineConfig::builder()
            .layout(ProjectLayout::new(tmp.path()))
            .device_probe(FixedProbe(false))
            .build()
            .unwrap()
    }

    #[test]
    fn test_save_then_restore_reuses_run() {
        let tmp   = TempDir::new().unwrap();
        let cfg   = config_in(&tmp);
        let store = SnapshotStore::for_run(&cfg);

        let path = store.save(&cfg).unwrap();
        assert!(path.starts_with(cfg.stores().artifacts_dir()));
        assert!(path.is_file());

        let restored = store.restore(ProjectLayout::new(tmp.path())).unwrap();
        assert_eq!(restored.stores(), cfg.stores());
        assert_eq!(restored.spec(), cfg.spec());
    }

    #[test]
    fn test_resolved_view_contains_derived_paths() {
        let tmp   = TempDir::new().unwrap();
        let cfg   = config_in(&tmp);
        let store = SnapshotStore::for_run(&cfg);
        store.save(&cfg).unwrap();

        let resolved = store.load_resolved().unwrap();
        assert!(resolved["data"]["data_dir"].as_str().unwrap().ends_with("cifar10"));
        assert_eq!(resolved["device"], "cpu");
    }

    #[test]
    fn test_missing_snapshot_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = SnapshotStore::new(tmp.path()).load_spec().unwrap_err();
        assert!(err.to_string().contains("Cannot read snapshot"));
    }
}

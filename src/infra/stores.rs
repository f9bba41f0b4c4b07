// ============================================================
// Layer 5 — Artifact Store
// ============================================================
// Gives every run its own pair of directories:
//
//   stores/logs/<project_name>/<unique_id>/              ← logs_dir
//   stores/model_artifacts/<project_name>/<unique_id>/   ← artifacts_dir
//
// The unique id is a UUID v4 unless the caller pins one (for
// example when resuming from a snapshot). Both directories are
// created during construction, so anything holding a Stores can
// write into them straight away.
//
// The project name and run id each become exactly one directory
// level, so anything that is not a single plain path segment
// (empty, "..", absolute, containing a separator) is rejected
// before any directory is created.
//
// Concurrent runs never collide: each generates its own id, and
// create_dir_all succeeds silently on directories that already
// exist.
//
// Reference: uuid crate documentation
//            std::fs::create_dir_all documentation

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

use crate::domain::error::{ConfigError, ConfigResult};
use crate::infra::layout::{create_dir_all, ProjectLayout};

/// Fields of [`Stores`] that are derived at construction.
pub const STORES_DERIVED_FIELDS: &[&str] = &["logs_dir", "artifacts_dir"];

/// A fresh, process-wide unique run identifier.
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}

/// Check that `value` is one ordinary path segment.
fn single_segment(field: &'static str, value: &str) -> ConfigResult<()> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(segment)), None) if segment == value => Ok(()),
        _ => Err(ConfigError::InvalidRunId { field, value: value.to_string() }),
    }
}

// ─── StoresSpec ───────────────────────────────────────────────────────────────
/// Declared values of the artifact store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoresSpec {
    pub project_name: String,
    /// Pinned run id; a new one is generated when `None`.
    pub unique_id:    Option<String>,
}

impl Default for StoresSpec {
    fn default() -> Self {
        Self {
            project_name: "MNIST".to_string(),
            unique_id:    None,
        }
    }
}

impl StoresSpec {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self { project_name: project_name.into(), unique_id: None }
    }

    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }
}

// ─── Stores ───────────────────────────────────────────────────────────────────
/// The finalised artifact store of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stores {
    project_name:  String,
    unique_id:     String,
    logs_dir:      PathBuf,
    artifacts_dir: PathBuf,
}

impl Stores {
    /// Resolve the run id, derive both run directories under `layout`
    /// and create them.
    pub fn new(spec: StoresSpec, layout: &ProjectLayout) -> ConfigResult<Self> {
        let unique_id = spec.unique_id.unwrap_or_else(generate_run_id);
        single_segment("project_name", &spec.project_name)?;
        single_segment("unique_id", &unique_id)?;

        let logs_dir = layout
            .logs_dir()
            .join(&spec.project_name)
            .join(&unique_id);
        create_dir_all(&logs_dir)?;

        let artifacts_dir = layout
            .model_artifacts()
            .join(&spec.project_name)
            .join(&unique_id);
        create_dir_all(&artifacts_dir)?;

        tracing::info!(
            "Run '{}' of project '{}': logs='{}', artifacts='{}'",
            unique_id,
            spec.project_name,
            logs_dir.display(),
            artifacts_dir.display()
        );

        Ok(Self {
            project_name: spec.project_name,
            unique_id,
            logs_dir,
            artifacts_dir,
        })
    }

    /// The spec that rebuilds exactly this store, with the run id pinned.
    pub fn spec(&self) -> StoresSpec {
        StoresSpec::new(&self.project_name).with_unique_id(&self.unique_id)
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }
}

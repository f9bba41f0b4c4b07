// ============================================================
// Layer 5 — Project Directory Layout
// ============================================================
// The fixed folder structure every run writes into, rooted at a
// base directory chosen by the caller:
//
//   <base>/
//     data/                    ← raw datasets
//     stores/
//       logs/                  ← per-run log files
//       blob/                  ← downloaded archives
//       feature/               ← cached features
//       model_artifacts/       ← per-run weights and snapshots
//       tensorboard/
//       wandb/
//
// Nothing is created until ensure() is called, and ensure() is
// safe to call any number of times (it behaves like `mkdir -p`).
//
// Reference: std::fs::create_dir_all documentation

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::{ConfigError, ConfigResult};

/// Resolves every well-known directory of a project from one base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    base_dir: PathBuf,
}

impl Default for ProjectLayout {
    /// A layout rooted at the current working directory.
    fn default() -> Self {
        Self::new(".")
    }
}

impl ProjectLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn stores_dir(&self) -> PathBuf {
        self.base_dir.join("stores")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.stores_dir().join("logs")
    }

    pub fn blob_store(&self) -> PathBuf {
        self.stores_dir().join("blob")
    }

    pub fn feature_store(&self) -> PathBuf {
        self.stores_dir().join("feature")
    }

    pub fn model_artifacts(&self) -> PathBuf {
        self.stores_dir().join("model_artifacts")
    }

    pub fn tensorboard_dir(&self) -> PathBuf {
        self.stores_dir().join("tensorboard")
    }

    pub fn wandb_dir(&self) -> PathBuf {
        self.stores_dir().join("wandb")
    }

    /// Every directory in the layout, parents before children.
    pub fn all_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.data_dir(),
            self.stores_dir(),
            self.logs_dir(),
            self.blob_store(),
            self.feature_store(),
            self.model_artifacts(),
            self.tensorboard_dir(),
            self.wandb_dir(),
        ]
    }

    /// Create every directory of the layout that does not exist yet.
    pub fn ensure(&self) -> ConfigResult<()> {
        for dir in self.all_dirs() {
            create_dir_all(&dir)?;
        }
        tracing::debug!("Project layout ready under '{}'", self.base_dir.display());
        Ok(())
    }
}

/// `mkdir -p` that reports which path failed.
pub(crate) fn create_dir_all(path: &Path) -> ConfigResult<()> {
    fs::create_dir_all(path).map_err(|source| ConfigError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================
// Layer 3 — Loader Settings
// ============================================================
// Batching options for each split, handed verbatim to the
// data loader collaborator.
//
// Splits and their defaults:
//   debug  → batch 4,  no shuffle   (tiny smoke-test runs)
//   train  → batch 32, shuffled
//   valid  → batch 32, no shuffle
//   test   → not configured unless the caller supplies one
//
// Reference: Rust Book §6 (Enums), §5 (Structs)

use serde::{Deserialize, Serialize};

/// The data splits a loader can be configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Debug,
    Train,
    Valid,
    Test,
}

/// Options for a single data loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderOptions {
    pub batch_size:  usize,
    pub num_workers: usize,
    pub pin_memory:  bool,
    pub drop_last:   bool,
    pub shuffle:     bool,
    /// Named collation strategy; `None` means the loader's default.
    pub collate_fn:  Option<String>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            batch_size:  32,
            num_workers: 0,
            pin_memory:  true,
            drop_last:   false,
            shuffle:     false,
            collate_fn:  None,
        }
    }
}

impl LoaderOptions {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }
}

/// Loader settings for every split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataModuleParams {
    pub debug:        bool,
    pub debug_loader: LoaderOptions,
    pub train_loader: LoaderOptions,
    pub valid_loader: LoaderOptions,
    pub test_loader:  Option<LoaderOptions>,
}

impl Default for DataModuleParams {
    fn default() -> Self {
        Self {
            debug:        true,
            debug_loader: LoaderOptions::default().with_batch_size(4),
            train_loader: LoaderOptions::default().with_shuffle(true),
            valid_loader: LoaderOptions::default(),
            test_loader:  None,
        }
    }
}

impl DataModuleParams {
    /// Options for `split`, or `None` if that split has no loader.
    pub fn loader(&self, split: Split) -> Option<&LoaderOptions> {
        match split {
            Split::Debug => Some(&self.debug_loader),
            Split::Train => Some(&self.train_loader),
            Split::Valid => Some(&self.valid_loader),
            Split::Test  => self.test_loader.as_ref(),
        }
    }

    /// Overwrite the batch size of the train and valid loaders.
    pub fn set_batch_size(&mut self, batch_size: usize) {
        self.train_loader.batch_size = batch_size;
        self.valid_loader.batch_size = batch_size;
        if let Some(test) = self.test_loader.as_mut() {
            test.batch_size = batch_size;
        }
    }
}

// ============================================================
// Layer 3 — Global Training Flags and Callback Selection
// ============================================================
// Run-wide switches read by the training loop: epoch budget,
// debug mode, mixed precision, early-stop patience and the
// classification setup the model builder should target.
//
// Callbacks are selected by name, in the order they should run.
// Like optimizer names, the identifiers are resolved (and can
// fail) in the training loop, not here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Callback identifiers the standard training loop provides.
pub const KNOWN_CALLBACKS: &[&str] = &[
    "EarlyStopping",
    "ModelCheckpoint",
    "LRScheduler",
    "MetricMeter",
    "History",
];

/// Shape of the classification problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationType {
    Binary,
    Multiclass,
    Multilabel,
}

impl fmt::Display for ClassificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Binary     => "binary",
            Self::Multiclass => "multiclass",
            Self::Multilabel => "multilabel",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalTrainParams {
    pub debug:               bool,
    /// How many batches a debug run keeps, as a multiple of the debug batch size.
    pub debug_multiplier:    usize,
    pub epochs:              usize,
    /// Automatic mixed precision.
    pub use_amp:             bool,
    pub mixup:               bool,
    /// Epochs without improvement before early stopping.
    pub patience:            usize,
    pub model_name:          String,
    pub num_classes:         usize,
    pub classification_type: ClassificationType,
}

impl Default for GlobalTrainParams {
    fn default() -> Self {
        Self {
            debug:               false,
            debug_multiplier:    128,
            epochs:              3,
            use_amp:             true,
            mixup:               false,
            patience:            3,
            model_name:          "custom".to_string(),
            num_classes:         10,
            classification_type: ClassificationType::Multiclass,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CallbackParams {
    pub callbacks: Vec<String>,
}

impl Default for CallbackParams {
    fn default() -> Self {
        Self {
            callbacks: ["EarlyStopping", "ModelCheckpoint", "LRScheduler"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CallbackParams {
    pub fn unknown_callbacks(&self) -> Vec<&str> {
        self.callbacks
            .iter()
            .map(String::as_str)
            .filter(|name| !KNOWN_CALLBACKS.contains(name))
            .collect()
    }
}

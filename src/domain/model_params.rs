// ============================================================
// Layer 3 — Model Parameters
// ============================================================
// What the model-building collaborator needs to size the
// classification head. The backbone itself is chosen by
// GlobalTrainParams::model_name.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelParams {
    pub num_classes: usize,
    /// Dropout probability before the classification head.
    pub dropout:     f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            num_classes: 10,
            dropout:     0.3,
        }
    }
}

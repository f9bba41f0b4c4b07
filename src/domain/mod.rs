// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// The parameter groups that make up a pipeline configuration.
// Pure Rust structs and traits:
//
//   - NO directory creation (that's Layer 5 — infra::stores)
//   - NO logger setup or device probing (also Layer 5); groups
//     only emit tracing events into whatever subscriber exists
//   - NO knowledge of how the groups get assembled (Layer 2)
//
// Each group is a plain value with Default + serde support, so
// it can come from code, from an overrides file or from a saved
// snapshot. The only group with derived fields here is Data,
// which hides them behind accessors.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// Augmentation sizes, normalisation stats and mixup switch
pub mod augmentation;

/// Data locations, manifests and the class mapping
pub mod data_params;

/// Errors raised while building configuration groups
pub mod error;

/// Optimizer, scheduler and criterion families with their hyperparameters
pub mod hyperparams;

/// Per-split loader options
pub mod loader_params;

/// Classification head settings
pub mod model_params;

/// Run-wide training flags and callback selection
pub mod train_params;

/// The transform-adapter abstraction
pub mod traits;

pub use error::{ConfigError, ConfigResult};

// ============================================================
// Layer 3 — Configuration Errors
// ============================================================
// The failure modes of building a pipeline configuration.
//
// Only two things can really go wrong while constructing the
// parameter groups:
//   - the filesystem refuses to create a run directory
//   - the caller hands us something that breaks an invariant
//     (a derived field supplied as input, a class id used twice,
//     a run id that is not a plain directory name)
//
// Everything above this layer wraps these in anyhow::Error.
//
// Reference: thiserror crate documentation
//            Rust Book §9 (Error Handling)

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while constructing or loading a pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A run-scoped directory could not be created.
    #[error("cannot create directory '{}': {source}", path.display())]
    CreateDir {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A derived field was supplied as if it were an input.
    #[error("'{group}.{field}' is derived at construction and cannot be supplied")]
    DerivedField {
        group: &'static str,
        field: String,
    },

    /// Two class names map to the same id, so the reverse mapping
    /// would not be a bijection.
    #[error("class id {id} is assigned to both '{first}' and '{second}'")]
    DuplicateClassId {
        id:     u32,
        first:  String,
        second: String,
    },

    /// A project name or run id is not usable as a single directory name.
    #[error("'stores.{field}' must be a single, non-empty path segment, got '{value}'")]
    InvalidRunId {
        field: &'static str,
        value: String,
    },

    /// A numeric hyperparameter is NaN or infinite and has no JSON form.
    #[error("'{field}' must be a finite number, got {value}")]
    NonFinite {
        field: &'static str,
        value: f64,
    },

    /// An overrides file or snapshot could not be read.
    #[error("cannot read '{}': {source}", path.display())]
    ReadFile {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An overrides file or snapshot is not valid JSON for the schema.
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias used by the configuration constructors.
pub type ConfigResult<T> = Result<T, ConfigError>;

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_field_message_names_group_and_field() {
        let err = ConfigError::DerivedField { group: "data", field: "data_dir".into() };
        assert_eq!(
            err.to_string(),
            "'data.data_dir' is derived at construction and cannot be supplied"
        );
    }

    #[test]
    fn test_create_dir_keeps_io_source() {
        use std::error::Error as _;
        let err = ConfigError::CreateDir {
            path:   PathBuf::from("/nope"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/nope"));
        assert!(err.source().is_some());
    }
}

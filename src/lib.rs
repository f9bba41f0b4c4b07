//! Typed configuration model for a CIFAR-10 image-classification
//! training pipeline.
//!
//! Layers, outermost first:
//!   1. `cli`         — clap front end (`init`, `show`)
//!   2. `application` — `PipelineConfig` assembly and run initialisation
//!   3. `domain`      — the parameter groups and the `Transforms` trait
//!   4. `data`        — transform plans built from the augmentation group
//!   5. `infra`       — directories, run stores, device, logging, snapshots

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;

pub use application::pipeline_config::{PipelineConfig, PipelineConfigBuilder, PipelineSpec};
pub use domain::error::{ConfigError, ConfigResult};

// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// The part of the data pipeline this crate owns: describing how
// images are transformed at each stage of a run.
//
//   AugmentationParams (Layer 3)
//       │
//       ▼
//   ImageClassificationTransforms  → TransformPlan per stage
//       │
//       ▼
//   external image library          (decodes, crops, normalises)
//
// Loading, batching and decoding images happen in the data loader
// collaborator, driven by the Data and DataModuleParams groups.
//
// Reference: Rust Book §7 (Modules)

/// Transform plans built from the augmentation group
pub mod transforms;

// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Puts the parameter groups together and prepares a run.
//
// Rules for this layer:
//   - No directory creation of its own (that's Layer 5)
//   - No printing (that's Layer 1)
//   - Only assembly and workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The aggregate configuration, its builder and the overrides schema
pub mod pipeline_config;

// The run-initialisation workflow
pub mod init_run_use_case;

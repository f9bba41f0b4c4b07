// ============================================================
// Layer 5 — Infrastructure Layer
// ============================================================
// Everything that touches the machine the run happens on:
//
//   layout.rs   — The project's directory tree (data/, stores/…)
//                 and its idempotent `mkdir -p` bootstrap.
//
//   stores.rs   — The per-run artifact store. Generates the run
//                 id and creates the run's logs and artifacts
//                 directories.
//
//   device.rs   — CUDA-or-CPU selection from an injectable probe.
//
//   logging.rs  — tracing subscriber with stdout + file sinks,
//                 returned as an explicit handle.
//
//   snapshot.rs — Writes the resolved configuration next to the
//                 run's artifacts and reads it back.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Compute device selection
pub mod device;

/// Project directory layout
pub mod layout;

/// Logger initialisation
pub mod logging;

/// Configuration snapshot persistence
pub mod snapshot;

/// Per-run artifact store
pub mod stores;

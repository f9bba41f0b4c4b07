// ============================================================
// Layer 5 — Compute Device Selection
// ============================================================
// Decides once, at assembly time, whether the run should target
// a CUDA accelerator or fall back to the CPU.
//
// The decision comes from a DeviceProbe so tests can pin it.
// EnvProbe, the default, reads ambient state only:
//   - CUDA_VISIBLE_DEVICES set to "" or "-1" hides every GPU
//   - otherwise an NVIDIA driver node under /dev means a GPU
//
// Reference: CUDA environment variable documentation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The backend a run should place its tensors on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Cuda,
    Cpu,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cuda => f.write_str("cuda"),
            Device::Cpu  => f.write_str("cpu"),
        }
    }
}

impl Device {
    /// Accelerator if the probe reports one, CPU otherwise.
    pub fn select(probe: &dyn DeviceProbe) -> Self {
        let device = if probe.accelerator_available() {
            Device::Cuda
        } else {
            Device::Cpu
        };
        tracing::debug!("Selected compute device: {}", device);
        device
    }
}

// ─── DeviceProbe ──────────────────────────────────────────────────────────────
/// Anything that can tell whether an accelerator is usable.
pub trait DeviceProbe {
    fn accelerator_available(&self) -> bool;
}

impl<P: DeviceProbe + ?Sized> DeviceProbe for Box<P> {
    fn accelerator_available(&self) -> bool {
        (**self).accelerator_available()
    }
}

/// Probes the process environment and the NVIDIA device nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvProbe;

const NVIDIA_DEVICE_NODES: &[&str] = &["/dev/nvidiactl", "/dev/nvidia0"];

impl DeviceProbe for EnvProbe {
    fn accelerator_available(&self) -> bool {
        if let Ok(visible) = std::env::var("CUDA_VISIBLE_DEVICES") {
            let visible = visible.trim();
            if visible.is_empty() || visible == "-1" {
                return false;
            }
        }
        NVIDIA_DEVICE_NODES.iter().any(|node| Path::new(node).exists())
    }
}

/// A probe with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub bool);

impl DeviceProbe for FixedProbe {
    fn accelerator_available(&self) -> bool {
        self.0
    }
}

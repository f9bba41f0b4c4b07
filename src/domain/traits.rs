// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The one seam in this crate where behaviour is pluggable:
// turning augmentation settings into transform pipelines.
//
// Every implementation must say how training and validation
// images are transformed. The remaining stages are optional and
// default to "not configured" (None), so a simple adapter only
// has to write two methods.
//
//   required   train_transforms, valid_transforms
//   optional   test_transforms, debug_transforms,
//              gradcam_transforms, test_time_augmentations
//
// The associated `Pipeline` type keeps the trait independent of
// any particular image library.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §19 (Associated Types)

// ─── Transforms ───────────────────────────────────────────────────────────────
/// Any component that can describe the transform pipeline for each stage
/// of a run.
///
/// Implementations:
///   - ImageClassificationTransforms → plans built from AugmentationParams
pub trait Transforms {
    /// The representation of one transform pipeline.
    type Pipeline;

    /// Transforms applied to training images.
    fn train_transforms(&self) -> Self::Pipeline;

    /// Transforms applied to validation images.
    fn valid_transforms(&self) -> Self::Pipeline;

    /// Transforms applied to held-out test images.
    fn test_transforms(&self) -> Option<Self::Pipeline> {
        None
    }

    /// Transforms used by debug runs on a handful of batches.
    fn debug_transforms(&self) -> Option<Self::Pipeline> {
        None
    }

    /// Transforms used when rendering Grad-CAM heatmaps.
    fn gradcam_transforms(&self) -> Option<Self::Pipeline> {
        None
    }

    /// One pipeline per test-time-augmentation view.
    fn test_time_augmentations(&self) -> Option<Vec<Self::Pipeline>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Minimal;

    impl Transforms for Minimal {
        type Pipeline = &'static str;

        fn train_transforms(&self) -> Self::Pipeline {
            "train"
        }

        fn valid_transforms(&self) -> Self::Pipeline {
            "valid"
        }
    }

    #[test]
    fn test_optional_stages_default_to_none() {
        let t = Minimal;
        assert_eq!(t.train_transforms(), "train");
        assert_eq!(t.valid_transforms(), "valid");
        assert!(t.test_transforms().is_none());
        assert!(t.debug_transforms().is_none());
        assert!(t.gradcam_transforms().is_none());
        assert!(t.test_time_augmentations().is_none());
    }
}

// ============================================================
// Layer 4 — Image Classification Transforms
// ============================================================
// Turns the augmentation group into declarative transform plans.
// A plan is an ordered list of steps; the image library that
// executes it lives outside this crate.
//
//   train / debug                 valid / test
//   ─────────────                 ────────────
//   RandomResizedCrop(image)      Resize(pre_center_crop)
//   RandomHorizontalFlip(0.5)     CenterCrop(image)
//   ToTensor                      ToTensor
//   Normalize(mean, std)          Normalize(mean, std)
//
// Grad-CAM and test-time augmentation are left unconfigured.
//
// Reference: Rust Book §6 (Enums), §10 (Traits)

use serde::Serialize;

use crate::application::pipeline_config::PipelineConfig;
use crate::domain::augmentation::AugmentationParams;
use crate::domain::traits::Transforms;

/// Probability of the horizontal flip in training plans.
pub const HORIZONTAL_FLIP_PROB: f32 = 0.5;

/// One step of a transform pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformStep {
    RandomResizedCrop { size: u32 },
    RandomHorizontalFlip { p: f32 },
    Resize { size: u32 },
    CenterCrop { size: u32 },
    ToTensor,
    Normalize { mean: Vec<f32>, std: Vec<f32> },
}

/// An ordered sequence of transform steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransformPlan {
    steps: Vec<TransformStep>,
}

impl TransformPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn then(mut self, step: TransformStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[TransformStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The square side length the plan outputs, if it fixes one.
    pub fn output_size(&self) -> Option<u32> {
        self.steps.iter().rev().find_map(|step| match step {
            TransformStep::RandomResizedCrop { size }
            | TransformStep::CenterCrop { size }
            | TransformStep::Resize { size } => Some(*size),
            _ => None,
        })
    }
}

// ─── ImageClassificationTransforms ────────────────────────────────────────────
/// Reads the augmentation group of a resolved configuration.
pub struct ImageClassificationTransforms<'a> {
    config: &'a PipelineConfig,
}

impl<'a> ImageClassificationTransforms<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    fn augmentation(&self) -> &AugmentationParams {
        self.config.augmentation()
    }

    fn normalize(&self) -> TransformStep {
        let aug = self.augmentation();
        TransformStep::Normalize { mean: aug.mean.clone(), std: aug.std.clone() }
    }
}

impl Transforms for ImageClassificationTransforms<'_> {
    type Pipeline = TransformPlan;

    fn train_transforms(&self) -> TransformPlan {
        TransformPlan::new()
            .then(TransformStep::RandomResizedCrop { size: self.augmentation().image_size })
            .then(TransformStep::RandomHorizontalFlip { p: HORIZONTAL_FLIP_PROB })
            .then(TransformStep::ToTensor)
            .then(self.normalize())
    }

    fn valid_transforms(&self) -> TransformPlan {
        let aug = self.augmentation();
        TransformPlan::new()
            .then(TransformStep::Resize { size: aug.pre_center_crop })
            .then(TransformStep::CenterCrop { size: aug.image_size })
            .then(TransformStep::ToTensor)
            .then(self.normalize())
    }

    fn test_transforms(&self) -> Option<TransformPlan> {
        Some(self.valid_transforms())
    }

    fn debug_transforms(&self) -> Option<TransformPlan> {
        Some(self.train_transforms())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::device::FixedProbe;
    use crate::infra::layout::ProjectLayout;
    use tempfile::TempDir;

    fn config_with(tmp: &TempDir, aug: AugmentationParams) -> PipelineConfig {
        PipelineConfig::builder()
            .layout(ProjectLayout::new(tmp.path()))
            .augmentation(aug)
            .device_probe(FixedProbe(false))
            .build()
            .unwrap()
    }

    #[test]
    fn test_train_plan_follows_augmentation_group() {
        let tmp = TempDir::new().unwrap();
        let cfg = config_with(&tmp, AugmentationParams { image_size: 32, ..Default::default() });
        let t   = ImageClassificationTransforms::new(&cfg);

        let plan = t.train_transforms();
        assert_eq!(plan.len(), 4);
        assert_eq!(plan.steps()[0], TransformStep::RandomResizedCrop { size: 32 });
        assert_eq!(plan.output_size(), Some(32));
    }

    #[test]
    fn test_valid_plan_resizes_then_crops() {
        let tmp = TempDir::new().unwrap();
        let cfg = config_with(&tmp, AugmentationParams::default());
        let t   = ImageClassificationTransforms::new(&cfg);

        let plan = t.valid_transforms();
        assert_eq!(plan.steps()[0], TransformStep::Resize { size: 256 });
        assert_eq!(plan.steps()[1], TransformStep::CenterCrop { size: 224 });
        assert_eq!(
            plan.steps()[3],
            TransformStep::Normalize {
                mean: vec![0.485, 0.456, 0.406],
                std:  vec![0.229, 0.224, 0.225],
            }
        );
    }

    #[test]
    fn test_optional_stages_forward_or_stay_empty() {
        let tmp = TempDir::new().unwrap();
        let cfg = config_with(&tmp, AugmentationParams::default());
        let t   = ImageClassificationTransforms::new(&cfg);

        assert_eq!(t.test_transforms(), Some(t.valid_transforms()));
        assert_eq!(t.debug_transforms(), Some(t.train_transforms()));
        assert!(t.gradcam_transforms().is_none());
        assert!(t.test_time_augmentations().is_none());
    }

    #[test]
    fn test_grayscale_stats_flow_into_normalize() {
        let tmp = TempDir::new().unwrap();
        let aug = AugmentationParams {
            mean: vec![0.1307],
            std:  vec![0.3081],
            ..Default::default()
        };
        let cfg = config_with(&tmp, aug);
        let t   = ImageClassificationTransforms::new(&cfg);

        assert_eq!(
            t.train_transforms().steps().last(),
            Some(&TransformStep::Normalize { mean: vec![0.1307], std: vec![0.3081] })
        );
    }

    #[test]
    fn test_plan_serialises_with_op_tags() {
        let plan = TransformPlan::new().then(TransformStep::ToTensor);
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["steps"][0]["op"], "to_tensor");
    }
}

// ============================================================
// Layer 3 — Augmentation Parameters
// ============================================================
// Raw values only: sizes, normalisation statistics and the mixup
// switch. The transform pipelines themselves are described by
// data::transforms and executed by an external image library.
//
// Channel counts are not checked here: grayscale sets carry one
// mean/std entry, RGB sets three.
//
// Defaults are the ImageNet statistics, since CIFAR-10 models in
// this pipeline start from ImageNet-pretrained backbones.

use serde::{Deserialize, Serialize};

use crate::domain::hyperparams::HyperParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AugmentationParams {
    /// Final square side length fed to the model.
    pub image_size:      u32,
    /// Side length to resize to before the centre crop.
    pub pre_center_crop: u32,
    /// Per-channel normalisation mean; one entry per image channel.
    pub mean:            Vec<f32>,
    /// Per-channel normalisation standard deviation.
    pub std:             Vec<f32>,
    pub mixup:           bool,
    pub mixup_params:    Option<HyperParams>,
}

impl Default for AugmentationParams {
    fn default() -> Self {
        Self {
            image_size:      224,
            pre_center_crop: 256,
            mean:            vec![0.485, 0.456, 0.406],
            std:             vec![0.229, 0.224, 0.225],
            mixup:           false,
            mixup_params:    None,
        }
    }
}

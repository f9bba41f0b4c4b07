// ============================================================
// Layer 3 — Optimizer / Scheduler / Criterion Parameters
// ============================================================
// Each group is a family name plus a free-form mapping of named
// hyperparameters. Both are handed verbatim to the matching
// factory collaborator, which is the one that resolves the name
// into a concrete optimizer, scheduler or loss.
//
// The mappings are plain owned BTreeMaps, rebuilt by every call
// to Default::default(), so two groups never share storage.
//
// Family names are NOT validated here. `is_known_*` helpers let
// the assembly step warn about names the usual factories would
// not recognise.
//
// Reference: serde_json::Value documentation
//            Rust Book §8 (Hash Maps)

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::domain::error::{ConfigError, ConfigResult};

/// Named hyperparameters, passed to a factory untouched.
pub type HyperParams = BTreeMap<String, Value>;

/// Optimizer families the standard factory understands.
pub const KNOWN_OPTIMIZERS: &[&str] = &["SGD", "Adam", "AdamW", "RMSprop", "Adagrad"];

/// Scheduler families the standard factory understands.
pub const KNOWN_SCHEDULERS: &[&str] = &[
    "CosineAnnealingWarmRestarts",
    "CosineAnnealingLR",
    "StepLR",
    "MultiStepLR",
    "ExponentialLR",
    "OneCycleLR",
    "ReduceLROnPlateau",
];

/// Loss functions the standard factory understands.
pub const KNOWN_CRITERIA: &[&str] = &[
    "CrossEntropyLoss",
    "BCEWithLogitsLoss",
    "NLLLoss",
    "MSELoss",
];

fn params(pairs: &[(&str, Value)]) -> HyperParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

// ─── Optimizer ────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerParams {
    pub optimizer_name:   String,
    pub optimizer_params: HyperParams,
}

impl Default for OptimizerParams {
    fn default() -> Self {
        Self {
            optimizer_name:   "AdamW".to_string(),
            optimizer_params: params(&[
                ("lr",           json!(1e-4)),
                ("betas",        json!([0.9, 0.999])),
                ("amsgrad",      json!(false)),
                ("weight_decay", json!(1e-6)),
                ("eps",          json!(1e-8)),
            ]),
        }
    }
}

impl OptimizerParams {
    /// The learning rate, if one is set and numeric.
    pub fn lr(&self) -> Option<f64> {
        self.optimizer_params.get("lr").and_then(Value::as_f64)
    }

    /// Set the learning rate. NaN and infinities are rejected, since
    /// JSON would silently store them as `null`.
    pub fn set_lr(&mut self, lr: f64) -> ConfigResult<()> {
        if !lr.is_finite() {
            return Err(ConfigError::NonFinite { field: "optimizer_params.lr", value: lr });
        }
        self.optimizer_params.insert("lr".to_string(), json!(lr));
        Ok(())
    }

    pub fn is_known_family(&self) -> bool {
        KNOWN_OPTIMIZERS.contains(&self.optimizer_name.as_str())
    }
}

// ─── Scheduler ────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerParams {
    pub scheduler_name:   String,
    pub scheduler_params: HyperParams,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            scheduler_name:   "CosineAnnealingWarmRestarts".to_string(),
            scheduler_params: params(&[
                ("T_0",        json!(10)),
                ("T_mult",     json!(1)),
                ("eta_min",    json!(1e-6)),
                ("last_epoch", json!(-1)),
                ("verbose",    json!(false)),
            ]),
        }
    }
}

impl SchedulerParams {
    pub fn is_known_family(&self) -> bool {
        KNOWN_SCHEDULERS.contains(&self.scheduler_name.as_str())
    }
}

// ─── Criterion ────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CriterionParams {
    pub train_criterion_name:   String,
    pub valid_criterion_name:   String,
    pub train_criterion_params: HyperParams,
    pub valid_criterion_params: HyperParams,
}

fn cross_entropy_defaults() -> HyperParams {
    params(&[
        ("weight",          Value::Null),
        ("size_average",    Value::Null),
        ("ignore_index",    json!(-100)),
        ("reduce",          Value::Null),
        ("reduction",       json!("mean")),
        ("label_smoothing", json!(0.0)),
    ])
}

impl Default for CriterionParams {
    fn default() -> Self {
        Self {
            train_criterion_name:   "CrossEntropyLoss".to_string(),
            valid_criterion_name:   "CrossEntropyLoss".to_string(),
            train_criterion_params: cross_entropy_defaults(),
            valid_criterion_params: cross_entropy_defaults(),
        }
    }
}

impl CriterionParams {
    /// Names of the train and valid criteria that no standard factory knows.
    pub fn unknown_families(&self) -> Vec<&str> {
        [&self.train_criterion_name, &self.valid_criterion_name]
            .into_iter()
            .map(String::as_str)
            .filter(|name| !KNOWN_CRITERIA.contains(name))
            .collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimizer_defaults() {
        let p = OptimizerParams::default();
        assert_eq!(p.optimizer_name, "AdamW");
        assert_eq!(p.lr(), Some(1e-4));
        assert_eq!(p.optimizer_params["betas"], json!([0.9, 0.999]));
        assert!(p.is_known_family());
    }

    #[test]
    fn test_mappings_are_not_shared_between_instances() {
        let mut a = OptimizerParams::default();
        let b     = OptimizerParams::default();

        a.set_lr(0.5).unwrap();
        a.optimizer_params.insert("momentum".into(), json!(0.9));

        assert_eq!(a.lr(), Some(0.5));
        assert_eq!(b.lr(), Some(1e-4));
        assert!(!b.optimizer_params.contains_key("momentum"));
    }

    #[test]
    fn test_non_finite_lr_is_rejected_and_keeps_previous_value() {
        let mut p = OptimizerParams::default();

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = p.set_lr(bad).unwrap_err();
            assert!(matches!(err, ConfigError::NonFinite { field: "optimizer_params.lr", .. }));
        }
        assert_eq!(p.lr(), Some(1e-4));
    }

    #[test]
    fn test_train_and_valid_criterion_params_are_independent() {
        let mut c = CriterionParams::default();
        c.train_criterion_params.insert("label_smoothing".into(), json!(0.1));

        assert_eq!(c.train_criterion_params["label_smoothing"], json!(0.1));
        assert_eq!(c.valid_criterion_params["label_smoothing"], json!(0.0));
    }

    #[test]
    fn test_scheduler_defaults() {
        let s = SchedulerParams::default();
        assert_eq!(s.scheduler_params["T_0"], json!(10));
        assert_eq!(s.scheduler_params["last_epoch"], json!(-1));
        assert!(s.is_known_family());
    }

    #[test]
    fn test_unknown_family_names_are_reported_not_rejected() {
        let o = OptimizerParams { optimizer_name: "Lion".into(), ..Default::default() };
        assert!(!o.is_known_family());

        let c = CriterionParams {
            valid_criterion_name: "FocalLoss".into(),
            ..Default::default()
        };
        assert_eq!(c.unknown_families(), vec!["FocalLoss"]);
    }

    #[test]
    fn test_params_override_replaces_whole_mapping() {
        let o: OptimizerParams = serde_json::from_str(
            r#"{ "optimizer_name": "SGD", "optimizer_params": { "lr": 0.1, "momentum": 0.9 } }"#,
        )
        .unwrap();
        assert_eq!(o.lr(), Some(0.1));
        assert!(!o.optimizer_params.contains_key("betas"));
    }
}

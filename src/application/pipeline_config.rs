// ============================================================
// Layer 2 — Pipeline Configuration (aggregate)
// ============================================================
// Assembles every parameter group into one PipelineConfig:
//
//   PipelineSpec            declared values, all groups
//        │                  (defaults / overrides file / snapshot)
//        ▼
//   PipelineConfigBuilder   Data::new       → derived paths + reverse map
//        │                  Stores::new     → run id + run directories
//        │                  Device::select  → cuda / cpu, probed once
//        ▼
//   PipelineConfig          read-only from here on
//
// Groups that are not supplied fall back to their defaults.
// Fields that are derived during construction are rejected when
// they show up in an overrides file.
//
// Family names (optimizer, scheduler, criterion, callbacks) are
// not validated: unknown ones are logged as warnings and left for
// the factory that consumes them to reject.
//
// Reference: Rust Book §5 (Structs), §17 (Builder-style APIs)
//            serde_json::Value documentation

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::domain::augmentation::AugmentationParams;
use crate::domain::data_params::{Data, DataSpec, DATA_DERIVED_FIELDS};
use crate::domain::error::{ConfigError, ConfigResult};
use crate::domain::hyperparams::{CriterionParams, OptimizerParams, SchedulerParams};
use crate::domain::loader_params::DataModuleParams;
use crate::domain::model_params::ModelParams;
use crate::domain::train_params::{CallbackParams, GlobalTrainParams};
use crate::infra::device::{Device, DeviceProbe, EnvProbe};
use crate::infra::layout::ProjectLayout;
use crate::infra::stores::{Stores, StoresSpec, STORES_DERIVED_FIELDS};

// ─── PipelineSpec ─────────────────────────────────────────────────────────────
// The declared half of a configuration. This is also the schema of
// an overrides file: every group is optional and every group may be
// partial, e.g.
//
//   { "data": { "root_dir": "/mnt/cifar" },
//     "global_train_params": { "epochs": 10 } }
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineSpec {
    pub data:                DataSpec,
    pub datamodule:          DataModuleParams,
    pub augmentation:        AugmentationParams,
    pub model:               ModelParams,
    pub stores:              StoresSpec,
    pub global_train_params: GlobalTrainParams,
    pub optimizer_params:    OptimizerParams,
    pub scheduler_params:    SchedulerParams,
    pub criterion_params:    CriterionParams,
    pub callback_params:     CallbackParams,
}

impl PipelineSpec {
    /// Parse an overrides document, rejecting derived fields by name.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        reject_derived_fields(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Read and parse an overrides file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

/// Fail fast if a caller tries to supply a value that construction derives.
fn reject_derived_fields(value: &Value) -> ConfigResult<()> {
    let Some(root) = value.as_object() else {
        // Not an object: let serde produce the type error.
        return Ok(());
    };

    if root.contains_key("device") {
        return Err(ConfigError::DerivedField { group: "pipeline", field: "device".into() });
    }

    let derived_by_group: [(&'static str, &[&str]); 2] = [
        ("data",   DATA_DERIVED_FIELDS),
        ("stores", STORES_DERIVED_FIELDS),
    ];

    for (group, derived) in derived_by_group {
        let Some(fields) = root.get(group).and_then(Value::as_object) else {
            continue;
        };
        if let Some(field) = derived.iter().find(|f| fields.contains_key(**f)) {
            return Err(ConfigError::DerivedField { group, field: field.to_string() });
        }
    }
    Ok(())
}

// ─── PipelineConfig ───────────────────────────────────────────────────────────
/// The fully resolved configuration of one run.
///
/// Owns exactly one instance of every parameter group. Consumers only get
/// shared references, so nothing downstream can change it.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineConfig {
    data:                Data,
    datamodule:          DataModuleParams,
    augmentation:        AugmentationParams,
    model:               ModelParams,
    stores:              Stores,
    global_train_params: GlobalTrainParams,
    optimizer_params:    OptimizerParams,
    scheduler_params:    SchedulerParams,
    criterion_params:    CriterionParams,
    callback_params:     CallbackParams,
    device:              Device,
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Build every group from `spec`, with run directories under `layout`.
    pub fn from_spec(spec: PipelineSpec, layout: ProjectLayout) -> ConfigResult<Self> {
        Self::builder().layout(layout).spec(spec).build()
    }

    /// The declared values that rebuild this configuration, run id included.
    pub fn spec(&self) -> PipelineSpec {
        PipelineSpec {
            data:                self.data.spec().clone(),
            datamodule:          self.datamodule.clone(),
            augmentation:        self.augmentation.clone(),
            model:               self.model.clone(),
            stores:              self.stores.spec(),
            global_train_params: self.global_train_params.clone(),
            optimizer_params:    self.optimizer_params.clone(),
            scheduler_params:    self.scheduler_params.clone(),
            criterion_params:    self.criterion_params.clone(),
            callback_params:     self.callback_params.clone(),
        }
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn datamodule(&self) -> &DataModuleParams {
        &self.datamodule
    }

    pub fn augmentation(&self) -> &AugmentationParams {
        &self.augmentation
    }

    pub fn model(&self) -> &ModelParams {
        &self.model
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn global_train_params(&self) -> &GlobalTrainParams {
        &self.global_train_params
    }

    pub fn optimizer_params(&self) -> &OptimizerParams {
        &self.optimizer_params
    }

    pub fn scheduler_params(&self) -> &SchedulerParams {
        &self.scheduler_params
    }

    pub fn criterion_params(&self) -> &CriterionParams {
        &self.criterion_params
    }

    pub fn callback_params(&self) -> &CallbackParams {
        &self.callback_params
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Cross-group mismatches worth a warning. None of them stop a run.
    pub fn consistency_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let data_classes  = self.data.num_classes();
        let model_classes = self.model.num_classes;
        let train_classes = self.global_train_params.num_classes;
        if data_classes != model_classes || model_classes != train_classes {
            warnings.push(format!(
                "class count mismatch: data={data_classes}, model={model_classes}, \
                 global_train_params={train_classes}"
            ));
        }

        if self.augmentation.mixup != self.global_train_params.mixup {
            warnings.push(format!(
                "mixup is {} in augmentation but {} in global_train_params",
                self.augmentation.mixup, self.global_train_params.mixup
            ));
        }

        if !self.optimizer_params.is_known_family() {
            warnings.push(format!(
                "unrecognised optimizer '{}'",
                self.optimizer_params.optimizer_name
            ));
        }
        if !self.scheduler_params.is_known_family() {
            warnings.push(format!(
                "unrecognised scheduler '{}'",
                self.scheduler_params.scheduler_name
            ));
        }
        for name in self.criterion_params.unknown_families() {
            warnings.push(format!("unrecognised criterion '{name}'"));
        }
        for name in self.callback_params.unknown_callbacks() {
            warnings.push(format!("unrecognised callback '{name}'"));
        }

        warnings
    }
}

// ─── PipelineConfigBuilder ────────────────────────────────────────────────────
/// Collects the groups of a configuration; anything left unset is defaulted
/// in [`PipelineConfigBuilder::build`].
#[derive(Default)]
pub struct PipelineConfigBuilder {
    layout:              ProjectLayout,
    data:                Option<DataSpec>,
    datamodule:          Option<DataModuleParams>,
    augmentation:        Option<AugmentationParams>,
    model:               Option<ModelParams>,
    stores:              Option<StoresSpec>,
    global_train_params: Option<GlobalTrainParams>,
    optimizer_params:    Option<OptimizerParams>,
    scheduler_params:    Option<SchedulerParams>,
    criterion_params:    Option<CriterionParams>,
    callback_params:     Option<CallbackParams>,
    probe:               Option<Box<dyn DeviceProbe>>,
}

impl PipelineConfigBuilder {
    /// Where the run directories are created. Defaults to the working directory.
    pub fn layout(mut self, layout: ProjectLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Supply every group at once.
    pub fn spec(mut self, spec: PipelineSpec) -> Self {
        self.data                = Some(spec.data);
        self.datamodule          = Some(spec.datamodule);
        self.augmentation        = Some(spec.augmentation);
        self.model               = Some(spec.model);
        self.stores              = Some(spec.stores);
        self.global_train_params = Some(spec.global_train_params);
        self.optimizer_params    = Some(spec.optimizer_params);
        self.scheduler_params    = Some(spec.scheduler_params);
        self.criterion_params    = Some(spec.criterion_params);
        self.callback_params     = Some(spec.callback_params);
        self
    }

    pub fn data(mut self, data: DataSpec) -> Self {
        self.data = Some(data);
        self
    }

    pub fn datamodule(mut self, datamodule: DataModuleParams) -> Self {
        self.datamodule = Some(datamodule);
        self
    }

    pub fn augmentation(mut self, augmentation: AugmentationParams) -> Self {
        self.augmentation = Some(augmentation);
        self
    }

    pub fn model(mut self, model: ModelParams) -> Self {
        self.model = Some(model);
        self
    }

    pub fn stores(mut self, stores: StoresSpec) -> Self {
        self.stores = Some(stores);
        self
    }

    pub fn global_train_params(mut self, params: GlobalTrainParams) -> Self {
        self.global_train_params = Some(params);
        self
    }

    pub fn optimizer_params(mut self, params: OptimizerParams) -> Self {
        self.optimizer_params = Some(params);
        self
    }

    pub fn scheduler_params(mut self, params: SchedulerParams) -> Self {
        self.scheduler_params = Some(params);
        self
    }

    pub fn criterion_params(mut self, params: CriterionParams) -> Self {
        self.criterion_params = Some(params);
        self
    }

    pub fn callback_params(mut self, params: CallbackParams) -> Self {
        self.callback_params = Some(params);
        self
    }

    /// Replace the environment probe used for device selection.
    pub fn device_probe(mut self, probe: impl DeviceProbe + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    /// Derive, create the run directories and resolve the device.
    pub fn build(self) -> ConfigResult<PipelineConfig> {
        // Data first: it can fail without leaving anything on disk.
        let data   = Data::new(self.data.unwrap_or_default())?;
        let stores = Stores::new(self.stores.unwrap_or_default(), &self.layout)?;

        let device = match self.probe {
            Some(probe) => Device::select(probe.as_ref()),
            None        => Device::select(&EnvProbe),
        };

        let config = PipelineConfig {
            data,
            datamodule:          self.datamodule.unwrap_or_default(),
            augmentation:        self.augmentation.unwrap_or_default(),
            model:               self.model.unwrap_or_default(),
            stores,
            global_train_params: self.global_train_params.unwrap_or_default(),
            optimizer_params:    self.optimizer_params.unwrap_or_default(),
            scheduler_params:    self.scheduler_params.unwrap_or_default(),
            criterion_params:    self.criterion_params.unwrap_or_default(),
            callback_params:     self.callback_params.unwrap_or_default(),
            device,
        };

        for warning in config.consistency_warnings() {
            tracing::warn!("{warning}");
        }

        Ok(config)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::device::FixedProbe;
    use serde_json::json;
    use tempfile::TempDir;

    fn build_in(tmp: &TempDir) -> PipelineConfig {
        PipelineConfig::builder()
            .layout(ProjectLayout::new(tmp.path()))
            .device_probe(FixedProbe(false))
            .build()
            .unwrap()
    }

    #[test]
    fn test_all_groups_default_when_omitted() {
        let tmp = TempDir::new().unwrap();
        let cfg = build_in(&tmp);

        assert_eq!(cfg.model(), &ModelParams::default());
        assert_eq!(cfg.optimizer_params().optimizer_name, "AdamW");
        assert_eq!(cfg.callback_params().callbacks.len(), 3);
        assert_eq!(cfg.stores().project_name(), "MNIST");
        assert_eq!(cfg.device(), Device::Cpu);
        assert!(cfg.stores().logs_dir().is_dir());
        assert!(cfg.consistency_warnings().is_empty());
    }

    #[test]
    fn test_supplied_groups_are_used() {
        let tmp = TempDir::new().unwrap();
        let cfg = PipelineConfig::builder()
            .layout(ProjectLayout::new(tmp.path()))
            .model(ModelParams { num_classes: 10, dropout: 0.5 })
            .stores(StoresSpec::new("cifar10").with_unique_id("fixed"))
            .device_probe(FixedProbe(true))
            .build()
            .unwrap();

        assert_eq!(cfg.model().dropout, 0.5);
        assert_eq!(cfg.stores().unique_id(), "fixed");
        assert_eq!(cfg.device(), Device::Cuda);
    }

    #[test]
    fn test_independent_configs_do_not_share_mappings() {
        let tmp = TempDir::new().unwrap();
        let a   = build_in(&tmp);
        let b   = build_in(&tmp);

        let mut optimizer = a.optimizer_params().clone();
        optimizer.set_lr(3e-3).unwrap();
        let a = PipelineConfig::builder()
            .layout(ProjectLayout::new(tmp.path()))
            .optimizer_params(optimizer)
            .device_probe(FixedProbe(false))
            .build()
            .unwrap();

        assert_eq!(a.optimizer_params().lr(), Some(3e-3));
        assert_eq!(b.optimizer_params().lr(), Some(1e-4));
        assert_ne!(a.stores().unique_id(), b.stores().unique_id());
    }

    #[test]
    fn test_device_is_stable_across_assemblies() {
        let tmp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(tmp.path());
        let a = PipelineConfig::from_spec(PipelineSpec::default(), layout.clone()).unwrap();
        let b = PipelineConfig::from_spec(PipelineSpec::default(), layout).unwrap();
        assert_eq!(a.device(), b.device());
    }

    #[test]
    fn test_overrides_are_partial() {
        let spec = PipelineSpec::from_json_str(
            r#"{
                "data": { "root_dir": "data/" },
                "global_train_params": { "epochs": 10, "debug": true }
            }"#,
        )
        .unwrap();

        assert_eq!(spec.data.root_dir, std::path::PathBuf::from("data/"));
        assert_eq!(spec.global_train_params.epochs, 10);
        assert!(spec.global_train_params.debug);
        assert_eq!(spec.global_train_params.patience, 3);
        assert_eq!(spec.optimizer_params, OptimizerParams::default());
    }

    #[test]
    fn test_derived_data_field_is_rejected() {
        let err = PipelineSpec::from_json_str(r#"{ "data": { "train_csv": "x.csv" } }"#)
            .unwrap_err();
        match err {
            ConfigError::DerivedField { group, field } => {
                assert_eq!(group, "data");
                assert_eq!(field, "train_csv");
            }
            other => panic!("expected DerivedField, got {other:?}"),
        }
    }

    #[test]
    fn test_derived_store_field_and_device_are_rejected() {
        let stores = PipelineSpec::from_json_str(r#"{ "stores": { "logs_dir": "/tmp" } }"#);
        assert!(matches!(stores, Err(ConfigError::DerivedField { group: "stores", .. })));

        let device = PipelineSpec::from_json_str(r#"{ "device": "cuda" }"#);
        assert!(matches!(device, Err(ConfigError::DerivedField { group: "pipeline", .. })));
    }

    #[test]
    fn test_unknown_field_is_a_parse_error() {
        let err = PipelineSpec::from_json_str(r#"{ "model": { "depth": 50 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_overrides_file_is_reported() {
        let err = PipelineSpec::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_spec_round_trip_pins_run_id() {
        let tmp = TempDir::new().unwrap();
        let cfg = build_in(&tmp);
        let spec = cfg.spec();

        assert_eq!(spec.stores.unique_id.as_deref(), Some(cfg.stores().unique_id()));

        let rebuilt = PipelineConfig::from_spec(spec, ProjectLayout::new(tmp.path())).unwrap();
        assert_eq!(rebuilt.stores(), cfg.stores());
        assert_eq!(rebuilt.data(), cfg.data());
    }

    #[test]
    fn test_warnings_flag_mismatches_and_unknown_families() {
        let tmp = TempDir::new().unwrap();
        let cfg = PipelineConfig::builder()
            .layout(ProjectLayout::new(tmp.path()))
            .model(ModelParams { num_classes: 2, dropout: 0.3 })
            .optimizer_params(OptimizerParams {
                optimizer_name: "Lion".into(),
                ..Default::default()
            })
            .device_probe(FixedProbe(false))
            .build()
            .unwrap();

        let warnings = cfg.consistency_warnings();
        assert!(warnings.iter().any(|w| w.contains("class count mismatch")));
        assert!(warnings.iter().any(|w| w.contains("'Lion'")));
    }

    #[test]
    fn test_resolved_view_serialises_derived_fields() {
        let tmp  = TempDir::new().unwrap();
        let cfg  = build_in(&tmp);
        let json = serde_json::to_value(&cfg).unwrap();

        assert_eq!(json["device"], json!("cpu"));
        assert!(json["data"]["train_csv"].is_string());
        assert_eq!(json["data"]["class_id_to_name"]["0"], json!("airplane"));
        assert_eq!(json["stores"]["unique_id"], json!(cfg.stores().unique_id()));
    }
}

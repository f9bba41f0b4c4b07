// ============================================================
// Layer 3 — Data Parameter Group
// ============================================================
// Where the CIFAR-10 images live and how their manifests are laid out.
//
// Built in two phases:
//   1. DataSpec  — the declared, overridable values
//   2. Data      — DataSpec plus every path and mapping derived from it
//
// Derived layout, relative to root_dir:
//
//   <root_dir>/
//     cifar10/              ← data_dir
//       train/              ← train_dir
//         train.csv         ← train_csv
//       test/               ← test_dir
//         test.csv          ← test_csv
//
// Data only exposes accessors, so the derived values can never
// drift away from the spec they were computed from.
//
// Reference: Rust Book §5 (Structs), §8 (Collections)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::error::{ConfigError, ConfigResult};

/// Name of the dataset folder under `root_dir`.
pub const DATASET_DIR_NAME: &str = "cifar10";

/// Fields of [`Data`] that are computed at construction and must never be
/// supplied by a caller.
pub const DATA_DERIVED_FIELDS: &[&str] = &[
    "data_dir",
    "train_dir",
    "test_dir",
    "train_csv",
    "test_csv",
    "class_id_to_name",
    "download",
];

const DEFAULT_URL: &str =
    "https://github.com/gao-hongnan/peekingduck-trainer/releases/download/v0.0.1-alpha/cifar10.zip";

const CIFAR10_CLASSES: [&str; 10] = [
    "airplane",
    "automobile",
    "bird",
    "cat",
    "deer",
    "dog",
    "frog",
    "horse",
    "ship",
    "truck",
];

/// The two on-disk partitions of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Train,
    Test,
}

// ─── DataSpec ─────────────────────────────────────────────────────────────────
/// Declared values of the data group. Every field is optional in an
/// overrides file; missing ones fall back to [`DataSpec::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataSpec {
    pub root_dir:            PathBuf,
    pub url:                 String,
    pub blob_file:           String,
    pub image_col_name:      String,
    pub image_path_col_name: String,
    pub target_col_name:     String,
    pub image_extension:     String,
    pub class_name_to_id:    BTreeMap<String, u32>,
}

impl Default for DataSpec {
    fn default() -> Self {
        Self {
            root_dir:            PathBuf::from("data"),
            url:                 DEFAULT_URL.to_string(),
            blob_file:           "cifar10.zip".to_string(),
            image_col_name:      "image_id".to_string(),
            image_path_col_name: "image_path".to_string(),
            target_col_name:     "class_id".to_string(),
            image_extension:     ".png".to_string(),
            class_name_to_id:    cifar10_class_map(),
        }
    }
}

/// The standard CIFAR-10 label set, `airplane = 0` through `truck = 9`.
pub fn cifar10_class_map() -> BTreeMap<String, u32> {
    CIFAR10_CLASSES
        .iter()
        .enumerate()
        .map(|(id, name)| (name.to_string(), id as u32))
        .collect()
}

// ─── Data ─────────────────────────────────────────────────────────────────────
/// The finalised data group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Data {
    #[serde(flatten)]
    spec:             DataSpec,
    data_dir:         PathBuf,
    train_dir:        PathBuf,
    test_dir:         PathBuf,
    train_csv:        PathBuf,
    test_csv:         PathBuf,
    class_id_to_name: BTreeMap<u32, String>,
    download:         bool,
}

impl Data {
    /// Fix the declared values and derive everything that depends on them.
    ///
    /// Fails only if two class names share an id, since the reverse
    /// mapping would then silently drop one of them.
    pub fn new(spec: DataSpec) -> ConfigResult<Self> {
        let class_id_to_name = invert_class_map(&spec.class_name_to_id)?;

        let data_dir  = spec.root_dir.join(DATASET_DIR_NAME);
        let train_dir = data_dir.join("train");
        let test_dir  = data_dir.join("test");
        let train_csv = train_dir.join("train.csv");
        let test_csv  = test_dir.join("test.csv");

        // Only queried, never required: a missing dataset just means
        // the loader collaborator has to fetch it first.
        let download = !data_dir.exists();

        tracing::debug!(
            "Data group: data_dir='{}', {} classes, download={}",
            data_dir.display(),
            class_id_to_name.len(),
            download
        );

        Ok(Self {
            spec,
            data_dir,
            train_dir,
            test_dir,
            train_csv,
            test_csv,
            class_id_to_name,
            download,
        })
    }

    /// The declared values this group was built from.
    pub fn spec(&self) -> &DataSpec {
        &self.spec
    }

    pub fn root_dir(&self) -> &Path {
        &self.spec.root_dir
    }

    pub fn url(&self) -> &str {
        &self.spec.url
    }

    pub fn blob_file(&self) -> &str {
        &self.spec.blob_file
    }

    pub fn image_col_name(&self) -> &str {
        &self.spec.image_col_name
    }

    pub fn image_path_col_name(&self) -> &str {
        &self.spec.image_path_col_name
    }

    pub fn target_col_name(&self) -> &str {
        &self.spec.target_col_name
    }

    pub fn image_extension(&self) -> &str {
        &self.spec.image_extension
    }

    pub fn class_name_to_id(&self) -> &BTreeMap<String, u32> {
        &self.spec.class_name_to_id
    }

    pub fn class_id_to_name(&self) -> &BTreeMap<u32, String> {
        &self.class_id_to_name
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn train_dir(&self) -> &Path {
        &self.train_dir
    }

    pub fn test_dir(&self) -> &Path {
        &self.test_dir
    }

    pub fn train_csv(&self) -> &Path {
        &self.train_csv
    }

    pub fn test_csv(&self) -> &Path {
        &self.test_csv
    }

    /// True if `data_dir` was absent when the group was constructed.
    pub fn download(&self) -> bool {
        self.download
    }

    pub fn num_classes(&self) -> usize {
        self.spec.class_name_to_id.len()
    }

    /// Where the downloaded archive is stored: `<root_dir>/<blob_file>`.
    pub fn blob_path(&self) -> PathBuf {
        self.spec.root_dir.join(&self.spec.blob_file)
    }

    pub fn partition_dir(&self, partition: Partition) -> &Path {
        match partition {
            Partition::Train => &self.train_dir,
            Partition::Test  => &self.test_dir,
        }
    }

    pub fn manifest(&self, partition: Partition) -> &Path {
        match partition {
            Partition::Train => &self.train_csv,
            Partition::Test  => &self.test_csv,
        }
    }

    /// Path of a single image: `<partition_dir>/<image_id><image_extension>`.
    pub fn image_path(&self, partition: Partition, image_id: &str) -> PathBuf {
        self.partition_dir(partition)
            .join(format!("{image_id}{}", self.spec.image_extension))
    }
}

/// Build the id → name mapping, rejecting ids that appear twice.
fn invert_class_map(forward: &BTreeMap<String, u32>) -> ConfigResult<BTreeMap<u32, String>> {
    let mut reverse = BTreeMap::new();
    for (name, &id) in forward {
        if let Some(first) = reverse.insert(id, name.clone()) {
            return Err(ConfigError::DuplicateClassId {
                id,
                first,
                second: name.clone(),
            });
        }
    }
    Ok(reverse)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn spec_at(root: impl Into<PathBuf>) -> DataSpec {
        DataSpec { root_dir: root.into(), ..Default::default() }
    }

    #[test]
    fn test_paths_derive_from_root_dir() {
        let data = Data::new(spec_at("data/")).unwrap();
        assert_eq!(data.data_dir(),  Path::new("data/cifar10"));
        assert_eq!(data.train_dir(), Path::new("data/cifar10/train"));
        assert_eq!(data.test_dir(),  Path::new("data/cifar10/test"));
        assert_eq!(data.train_csv(), Path::new("data/cifar10/train/train.csv"));
        assert_eq!(data.test_csv(),  Path::new("data/cifar10/test/test.csv"));
    }

    #[test]
    fn test_default_class_map_is_cifar10() {
        let data = Data::new(spec_at("data/")).unwrap();
        assert_eq!(data.num_classes(), 10);
        assert_eq!(data.class_id_to_name()[&0], "airplane");
        assert_eq!(data.class_id_to_name()[&9], "truck");
    }

    #[test]
    fn test_reverse_map_is_exact_inverse() {
        let data = Data::new(DataSpec::default()).unwrap();
        let forward = data.class_name_to_id();
        let reverse = data.class_id_to_name();

        assert_eq!(forward.len(), reverse.len());
        for (name, id) in forward {
            assert_eq!(&reverse[id], name);
        }
    }

    #[test]
    fn test_download_true_when_dataset_missing() {
        let tmp  = tempfile::TempDir::new().unwrap();
        let data = Data::new(spec_at(tmp.path())).unwrap();
        assert!(data.download());
    }

    #[test]
    fn test_download_false_when_dataset_present() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join(DATASET_DIR_NAME)).unwrap();
        let data = Data::new(spec_at(tmp.path())).unwrap();
        assert!(!data.download());
    }

    #[test]
    fn test_construction_is_deterministic() {
        let a = Data::new(spec_at("data/")).unwrap();
        let b = Data::new(spec_at("data/")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicate_class_id_is_rejected() {
        let mut spec = DataSpec::default();
        spec.class_name_to_id.insert("plane".into(), 0);

        match Data::new(spec) {
            Err(ConfigError::DuplicateClassId { id, .. }) => assert_eq!(id, 0),
            other => panic!("expected DuplicateClassId, got {other:?}"),
        }
    }

    #[test]
    fn test_image_and_blob_paths() {
        let data = Data::new(spec_at("data")).unwrap();
        assert_eq!(
            data.image_path(Partition::Test, "img_42"),
            PathBuf::from("data/cifar10/test/img_42.png")
        );
        assert_eq!(data.blob_path(), PathBuf::from("data/cifar10.zip"));
        assert_eq!(data.manifest(Partition::Train), data.train_csv());
    }

    #[test]
    fn test_partial_overrides_keep_defaults() {
        let spec: DataSpec =
            serde_json::from_str(r#"{ "root_dir": "/mnt/datasets" }"#).unwrap();
        assert_eq!(spec.root_dir, PathBuf::from("/mnt/datasets"));
        assert_eq!(spec.blob_file, "cifar10.zip");
        assert_eq!(spec.class_name_to_id.len(), 10);
    }

    #[test]
    fn test_derived_fields_are_not_accepted_by_spec() {
        let parsed = serde_json::from_str::<DataSpec>(r#"{ "data_dir": "elsewhere" }"#);
        assert!(parsed.is_err());
    }
}

use std::path::PathBuf;

use tempfile::TempDir;

use crate::signatures::{
    ActionSignature, ParamKind, SignatureCatalog, SignatureParameter, SignatureRepository,
};

/// Isolated directory for scripts, configs and signature caches.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl Default for UnitTestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitTestFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            data_path,
        }
    }

    /// Create a file with content.
    #[must_use]
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Create a shell script.
    #[must_use]
    pub fn create_script(&self, name: &str, content: &str) -> PathBuf {
        self.create_file(name, content)
    }

    /// Write [`SAMPLE_HIERARCHY`] as a signature cache.
    #[must_use]
    pub fn create_hierarchy(&self) -> PathBuf {
        self.create_file("cache/hierarchy.json", SAMPLE_HIERARCHY)
    }
}

/// A small command hierarchy in the discovery cache format.
pub const SAMPLE_HIERARCHY: &str = r#"{
  "qiime": {
    "name": "qiime",
    "help": "QIIME 2 command-line interface (q2cli)",
    "builtins": ["info", "tools"],
    "info": { "name": "info", "type": "builtin" },
    "tools": {
      "name": "tools",
      "type": "builtin",
      "import": {
        "name": "import",
        "signature": [
          { "name": "type", "type": "text", "required": true },
          { "name": "input_path", "type": "path", "required": true },
          { "name": "output_path", "type": "path", "required": true },
          { "name": "input_format", "type": "text", "default": null }
        ]
      }
    },
    "demux": {
      "id": "demux",
      "name": "demux",
      "summarize": {
        "id": "summarize",
        "signature": [
          { "name": "data", "type": "input", "repr": "SampleData[SequencesWithQuality]" },
          { "name": "n", "type": "parameter", "repr": "Int", "default": 10000 },
          { "name": "visualization", "type": "output", "repr": "Visualization" }
        ]
      }
    },
    "feature-table": {
      "id": "feature_table",
      "name": "feature-table",
      "filter-samples": {
        "signature": [
          { "name": "table", "type": "input", "repr": "FeatureTable[Frequency]" },
          { "name": "min_frequency", "type": "parameter", "repr": "Int", "default": 0 },
          { "name": "exclude_ids", "type": "parameter", "repr": "Bool", "default": false, "is_bool_flag": true },
          { "name": "metadata", "type": "metadata", "metadata": "file", "default": null },
          { "name": "where", "type": "parameter", "repr": "Str", "default": null, "multiple": "True" },
          { "name": "filtered_table", "type": "output", "repr": "FeatureTable[Frequency]" }
        ]
      }
    }
  }
}"#;

/// `demux summarize` requiring `i-data` and `p-something`.
#[must_use]
pub fn demux_summarize() -> ActionSignature {
    ActionSignature::new(
        "demux",
        "summarize",
        vec![
            SignatureParameter::new("i-data", ParamKind::Input)
                .required()
                .with_type("SampleData[SequencesWithQuality]"),
            SignatureParameter::new("p-something", ParamKind::Parameter)
                .required()
                .with_type("Int"),
            SignatureParameter::new("p-n", ParamKind::Parameter).with_default("10000"),
            SignatureParameter::new("p-verbose", ParamKind::Parameter).flag(),
            SignatureParameter::new("o-visualization", ParamKind::Output).required(),
        ],
    )
    .expect("valid signature")
}

/// A loaded repository holding [`demux_summarize`] plus a `qiime info` leaf.
#[must_use]
pub fn sample_repository() -> SignatureRepository {
    let mut repo = SignatureRepository::new();
    repo.load_catalog(SignatureCatalog {
        signatures: vec![demux_summarize()],
        leaf_commands: vec!["info".to_string()],
        builtins: vec!["info".to_string()],
        ..SignatureCatalog::default()
    });
    repo
}

use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_THREADED_VARIANT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Google Benchmark CSV output
    pub input: PathBuf,
    /// Where the charts are written, created if absent
    pub output_dir: PathBuf,
    pub threaded_variant: String,
    pub comparison_size: (u32, u32),
    pub scalability_size: (u32, u32),
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("doc/data/performance_results.csv"),
            output_dir: PathBuf::from("doc/figures"),
            threaded_variant: DEFAULT_THREADED_VARIANT.to_owned(),
            comparison_size: (1400, 800),
            scalability_size: (1000, 600),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yml::from_str(yaml).context("Parse settings")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Read settings file {}", path.display()))?;
        Self::from_yaml(&yaml)
    }
}

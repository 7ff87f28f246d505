use anyhow::Context;
use clap::ValueEnum;
use ogprcore::ScanKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which 2-D view of the volume the workflow extracts.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lower")]
pub enum ViewKind {
    BScan,
    CScan,
    TScan,
}

impl ViewKind {
    pub fn to_scan_kind(self) -> ScanKind {
        match self {
            ViewKind::BScan => ScanKind::BScan,
            ViewKind::CScan => ScanKind::CScan,
            ViewKind::TScan => ScanKind::TScan,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub view: ViewKind,
    pub index: usize,
    #[serde(rename = "macro", default)]
    pub macro_text: String,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(view: ViewKind, index: usize, macro_text: String) -> Self {
        Self {
            view,
            index,
            macro_text,
        }
    }
}

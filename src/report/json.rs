//! JSON bundle artifact

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bundle::{BundleFile, BundleResult};
use crate::error::{CtxpackError, Result};

/// Serialized form of a bundle, also the input to `ctxpack explain`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleJson {
    pub task: String,
    pub budget: u64,
    pub estimated_tokens: u64,
    pub files_included: usize,
    pub files_skipped: u32,
    pub files: Vec<BundleFile>,
}

impl From<&BundleResult> for BundleJson {
    fn from(bundle: &BundleResult) -> Self {
        Self {
            task: bundle.task.clone(),
            budget: bundle.budget,
            estimated_tokens: bundle.estimated_tokens,
            files_included: bundle.files.len(),
            files_skipped: bundle.skipped_files,
            files: bundle.files.clone(),
        }
    }
}

/// Write the bundle as pretty-printed JSON
pub fn write_bundle_json(bundle: &BundleResult, out_path: &Path) -> Result<()> {
    let payload = BundleJson::from(bundle);
    let json =
        serde_json::to_string_pretty(&payload).map_err(|e| CtxpackError::FileWriteFailed {
            path: out_path.display().to_string(),
            reason: e.to_string(),
        })?;
    std::fs::write(out_path, json).map_err(|e| CtxpackError::FileWriteFailed {
        path: out_path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Read a previously written bundle JSON
pub fn read_bundle_json(path: &Path) -> Result<BundleJson> {
    if !path.exists() {
        return Err(CtxpackError::BundleNotFound {
            path: path.display().to_string(),
        });
    }
    let raw = std::fs::read_to_string(path).map_err(|e| CtxpackError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| CtxpackError::BundleParseFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

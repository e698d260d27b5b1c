use crate::archive::layout::VERSION_MANIFEST_PATH;
use crate::archive::ArchiveHandle;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Model id -> "major.minor.patch".
pub type ModelVersionMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionTriple {
    pub major: i64,
    pub minor: i64,
    pub patch: i64,
}

impl VersionTriple {
    pub fn to_version_string(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// One manifest value. Fields other than `id` and `version` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestRecord {
    pub id: String,
    pub version: VersionTriple,
}

/// Reads the versions manifest out of the archive and projects it into a
/// model version map.
pub fn fetch_versions_data(archive: &mut ArchiveHandle) -> CoreResult<ModelVersionMap> {
    let bytes = match archive.read_entry_bytes(VERSION_MANIFEST_PATH) {
        Ok(b) => b,
        Err(CoreError::EntryNotFound(_)) => {
            return Err(CoreError::ManifestInvalid(format!(
                "missing {}",
                VERSION_MANIFEST_PATH
            )))
        }
        Err(e) => return Err(e),
    };
    let versions = parse_versions_manifest(&bytes).map_err(|e| {
        warn!(archive = %archive.path().display(), error = %e, "versions json is not valid");
        e
    })?;
    info!(
        archive = %archive.path().display(),
        models = versions.len(),
        "total models in use"
    );
    Ok(versions)
}

/// A single malformed record invalidates the whole manifest.
pub fn parse_versions_manifest(bytes: &[u8]) -> CoreResult<ModelVersionMap> {
    let v: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| CoreError::ManifestInvalid(format!("malformed json: {}", e)))?;
    let groups = v
        .as_object()
        .ok_or_else(|| CoreError::ManifestInvalid("top level is not an object".to_string()))?;

    let mut out = ModelVersionMap::new();
    for (key, value) in groups {
        let record: ManifestRecord = serde_json::from_value(value.clone())
            .map_err(|e| CoreError::ManifestInvalid(format!("record {}: {}", key, e)))?;
        let version = record.version.to_version_string();
        if out.insert(record.id.clone(), version).is_some() {
            return Err(CoreError::ManifestInvalid(format!(
                "duplicate model id {} (record {})",
                record.id, key
            )));
        }
    }
    Ok(out)
}

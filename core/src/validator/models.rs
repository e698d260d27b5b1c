use crate::archive::layout::model_file_path;
use crate::archive::ArchiveHandle;
use crate::error::{CoreError, CoreResult};
use crate::validator::manifest::ModelVersionMap;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Model id -> uncompressed size of `<id>.json` in bytes.
pub type ModelSizeMap = BTreeMap<String, u64>;

/// Every model id whose `<id>.json` file is absent. Does not stop at the
/// first miss.
pub fn find_in_use_model_files(archive: &ArchiveHandle, versions: &ModelVersionMap) -> Vec<String> {
    info!(archive = %archive.path().display(), "finding in use model files");
    let mut missing = Vec::new();
    for model_id in versions.keys() {
        if !archive.contains(&model_file_path(model_id)) {
            warn!(model_id = %model_id, "model file not found");
            missing.push(model_id.clone());
        }
    }
    if missing.is_empty() {
        info!("all model files found");
    }
    missing
}

/// Every model id whose file is present but is not valid JSON. All ids are
/// checked; absent files are left to `find_in_use_model_files`. Read
/// failures other than malformed JSON are returned as errors.
pub fn validate_in_use_model_files(
    archive: &mut ArchiveHandle,
    versions: &ModelVersionMap,
) -> CoreResult<Vec<String>> {
    info!(archive = %archive.path().display(), "validating in use model files");
    let mut invalid = Vec::new();
    for model_id in versions.keys() {
        let path = model_file_path(model_id);
        if !archive.contains(&path) {
            continue;
        }
        match archive.read_entry_json(&path) {
            Ok(_) => {}
            Err(CoreError::Json(e)) => {
                warn!(model_id = %model_id, error = %e, "model file not valid");
                invalid.push(model_id.clone());
            }
            Err(e) => return Err(e),
        }
    }
    if invalid.is_empty() {
        info!("all model files are valid");
    }
    Ok(invalid)
}

/// Parsed JSON payload of every in-use model.
pub fn fetch_in_use_model_files(
    archive: &mut ArchiveHandle,
    versions: &ModelVersionMap,
) -> CoreResult<BTreeMap<String, serde_json::Value>> {
    let mut out = BTreeMap::new();
    for model_id in versions.keys() {
        let v = archive.read_entry_json(&model_file_path(model_id))?;
        out.insert(model_id.clone(), v);
    }
    Ok(out)
}

pub fn model_sizes(archive: &mut ArchiveHandle, versions: &ModelVersionMap) -> CoreResult<ModelSizeMap> {
    info!(archive = %archive.path().display(), "getting model file size info");
    let mut out = ModelSizeMap::new();
    for model_id in versions.keys() {
        let size = archive.entry_size(&model_file_path(model_id))?;
        out.insert(model_id.clone(), size);
    }
    Ok(out)
}

pub mod manifest;
pub mod models;
pub mod presence;

use crate::archive::ArchiveHandle;
use crate::error::{CoreError, CoreResult};
use manifest::ModelVersionMap;
use std::path::Path;
use tracing::info;

/// Runs the single-archive gate sequence and returns the model version map.
///
/// Stages run in a fixed order and the first failure ends the run:
/// presence, manifest, model file existence, model file syntax. The archive
/// handle is dropped on every return path.
pub fn validate_archive(path: &Path) -> CoreResult<ModelVersionMap> {
    info!(archive = %path.display(), "analyzing archive");
    let mut archive = ArchiveHandle::open(path)?;
    validate_open_archive(&mut archive)
}

pub fn validate_open_archive(archive: &mut ArchiveHandle) -> CoreResult<ModelVersionMap> {
    let missing = presence::missing_mandatory_items(archive);
    if !missing.is_empty() {
        return Err(CoreError::MandatoryAssetsMissing { missing });
    }

    let versions = manifest::fetch_versions_data(archive)?;

    let ids = models::find_in_use_model_files(archive, &versions);
    if !ids.is_empty() {
        return Err(CoreError::ModelFilesMissing { ids });
    }

    let ids = models::validate_in_use_model_files(archive, &versions)?;
    if !ids.is_empty() {
        return Err(CoreError::ModelFilesInvalid { ids });
    }

    Ok(versions)
}

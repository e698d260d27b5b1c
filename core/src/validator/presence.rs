use crate::archive::layout::{MODEL_DIRECTORY_PREFIX, VERSION_MANIFEST_PATH};
use crate::archive::ArchiveHandle;
use tracing::{debug, info};

pub const MANDATORY_ITEMS: [&str; 2] = [MODEL_DIRECTORY_PREFIX, VERSION_MANIFEST_PATH];

/// Mandatory prefixes that match no entry in the archive.
pub fn missing_mandatory_items(archive: &ArchiveHandle) -> Vec<String> {
    info!(archive = %archive.path().display(), "checking mandatory items");
    let mut missing = Vec::new();
    for item in MANDATORY_ITEMS {
        let found = archive.has_prefix(item);
        debug!(item, found, "mandatory item");
        if !found {
            missing.push(item.to_string());
        }
    }
    missing
}

/// True only if both the model directory and the versions manifest exist.
pub fn check_mandatory_items(archive: &ArchiveHandle) -> bool {
    missing_mandatory_items(archive).is_empty()
}

use crate::archive::ArchiveHandle;
use crate::config::ChangeExpectation;
use crate::error::{CoreError, CoreResult};
use crate::validator::manifest::{fetch_versions_data, ModelVersionMap};
use crate::validator::models::{model_sizes, ModelSizeMap};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One model that differs between the new and the old archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelDelta<T> {
    Changed { model_id: String, new: T, old: T },
    OnlyInNew { model_id: String, new: T },
    OnlyInOld { model_id: String, old: T },
}

impl<T> ModelDelta<T> {
    pub fn model_id(&self) -> &str {
        match self {
            ModelDelta::Changed { model_id, .. }
            | ModelDelta::OnlyInNew { model_id, .. }
            | ModelDelta::OnlyInOld { model_id, .. } => model_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonOutcome {
    /// Versions changed as expected; size comparison skipped.
    VersionChangeConfirmed { deltas: Vec<ModelDelta<String>> },
    /// Versions unchanged as expected and every model size matched.
    SizesMatched { models: usize },
}

/// Supplies per-model sizes. Only consulted when no version change is
/// expected and none was found.
pub trait ModelSizeSource {
    fn model_sizes(&mut self, versions: &ModelVersionMap) -> CoreResult<ModelSizeMap>;
}

impl ModelSizeSource for ArchiveHandle {
    fn model_sizes(&mut self, versions: &ModelVersionMap) -> CoreResult<ModelSizeMap> {
        model_sizes(self, versions)
    }
}

/// Opens the archive on first use.
pub struct LazyArchive {
    path: PathBuf,
    handle: Option<ArchiveHandle>,
}

impl LazyArchive {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            handle: None,
        }
    }
}

impl ModelSizeSource for LazyArchive {
    fn model_sizes(&mut self, versions: &ModelVersionMap) -> CoreResult<ModelSizeMap> {
        let handle = match self.handle.take() {
            Some(h) => h,
            None => ArchiveHandle::open(&self.path)?,
        };
        model_sizes(self.handle.insert(handle), versions)
    }
}

/// Three-way diff: differing value, present only in new, present only in
/// old. Sorted by model id.
pub fn diff_model_maps<T: PartialEq + Clone>(
    new: &BTreeMap<String, T>,
    old: &BTreeMap<String, T>,
) -> Vec<ModelDelta<T>> {
    let ids: BTreeSet<&String> = new.keys().chain(old.keys()).collect();
    let mut out = Vec::new();
    for id in ids {
        match (new.get(id), old.get(id)) {
            (Some(n), Some(o)) if n != o => out.push(ModelDelta::Changed {
                model_id: id.clone(),
                new: n.clone(),
                old: o.clone(),
            }),
            (Some(n), None) => out.push(ModelDelta::OnlyInNew {
                model_id: id.clone(),
                new: n.clone(),
            }),
            (None, Some(o)) => out.push(ModelDelta::OnlyInOld {
                model_id: id.clone(),
                old: o.clone(),
            }),
            _ => {}
        }
    }
    out
}

fn log_deltas<T: Display>(what: &str, deltas: &[ModelDelta<T>]) {
    for d in deltas {
        match d {
            ModelDelta::Changed { model_id, new, old } => {
                warn!(model_id = %model_id, new = %new, old = %old, "model {} mismatch", what)
            }
            ModelDelta::OnlyInNew { model_id, .. } => {
                warn!(model_id = %model_id, "model id not found in old archive")
            }
            ModelDelta::OnlyInOld { model_id, .. } => {
                warn!(model_id = %model_id, "model id not found in new archive")
            }
        }
    }
}

fn delta_ids<T>(deltas: &[ModelDelta<T>]) -> Vec<String> {
    deltas.iter().map(|d| d.model_id().to_string()).collect()
}

pub fn identify_model_version_updates(
    new: &ModelVersionMap,
    old: &ModelVersionMap,
) -> Vec<ModelDelta<String>> {
    let deltas = diff_model_maps(new, old);
    log_deltas("version", &deltas);
    deltas
}

pub fn compare_model_sizes(new: &ModelSizeMap, old: &ModelSizeMap) -> Vec<ModelDelta<u64>> {
    let deltas = diff_model_maps(new, old);
    log_deltas("size", &deltas);
    deltas
}

/// Checks the version diff against the declared expectation and, when no
/// change is expected and none is found, diffs model sizes.
pub fn compare_model_sets(
    new_versions: &ModelVersionMap,
    old_versions: &ModelVersionMap,
    expectation: ChangeExpectation,
    new_sizes: &mut dyn ModelSizeSource,
    old_sizes: &mut dyn ModelSizeSource,
) -> CoreResult<ComparisonOutcome> {
    let deltas = identify_model_version_updates(new_versions, old_versions);
    let change_detected = !deltas.is_empty();

    match (expectation, change_detected) {
        (ChangeExpectation::EXPECTED, false) => {
            warn!("model version change expected but not found");
            return Err(CoreError::ExpectedChangeNotFound);
        }
        (ChangeExpectation::NOT_EXPECTED, true) => {
            warn!("model version change not expected but found");
            return Err(CoreError::UnexpectedChangeFound {
                ids: delta_ids(&deltas),
            });
        }
        (ChangeExpectation::EXPECTED, true) => {
            info!("model version change expected and found, skipping model size comparison");
            return Ok(ComparisonOutcome::VersionChangeConfirmed { deltas });
        }
        (ChangeExpectation::NOT_EXPECTED, false) => {
            info!("model version change not expected and not found, comparing model sizes");
        }
    }

    let new_map = new_sizes.model_sizes(new_versions)?;
    let old_map = old_sizes.model_sizes(old_versions)?;
    let size_deltas = compare_model_sizes(&new_map, &old_map);
    if !size_deltas.is_empty() {
        return Err(CoreError::UnexpectedSizeChange {
            ids: delta_ids(&size_deltas),
        });
    }
    info!("model sizes matched");
    Ok(ComparisonOutcome::SizesMatched {
        models: new_map.len(),
    })
}

/// Compares an already-validated new archive against a reference archive.
///
/// The reference archive only goes through the manifest loader. The new
/// archive is reopened only if sizes are needed.
pub fn compare_with_old_archive(
    new_archive: &Path,
    new_versions: &ModelVersionMap,
    old_archive: &Path,
    expectation: ChangeExpectation,
) -> CoreResult<ComparisonOutcome> {
    info!(
        new = %new_archive.display(),
        old = %old_archive.display(),
        "comparing new archive with old archive"
    );
    let mut old = ArchiveHandle::open(old_archive)?;
    let old_versions = fetch_versions_data(&mut old)?;
    let mut new = LazyArchive::new(new_archive);
    compare_model_sets(new_versions, &old_versions, expectation, &mut new, &mut old)
}

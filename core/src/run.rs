use crate::compare::{compare_with_old_archive, ComparisonOutcome};
use crate::config::{ComparisonConfig, RunConfig, SourceMode};
use crate::error::{CoreError, CoreResult};
use crate::validator::manifest::ModelVersionMap;
use crate::validator::validate_archive;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Result of validating (and optionally comparing) one archive.
#[derive(Debug)]
pub struct ArchiveOutcome {
    pub archive: PathBuf,
    pub validation: CoreResult<ModelVersionMap>,
    /// `None` when comparison was not requested or validation failed.
    pub comparison: Option<CoreResult<ComparisonOutcome>>,
}

impl ArchiveOutcome {
    pub fn passed(&self) -> bool {
        self.validation.is_ok() && !matches!(self.comparison, Some(Err(_)))
    }
}

/// Files directly inside `dir` whose name contains `.apk`, sorted by name.
/// Symlinks are resolved, so a link to an archive is listed.
pub fn list_archive_files(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    for e in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let e = match e {
            Ok(e) => e,
            Err(err) if err.depth() > 0 => {
                warn!(error = %err, "skipping unreadable folder entry");
                continue;
            }
            Err(err) => {
                return Err(CoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    err,
                )))
            }
        };
        if e.file_type().is_file() && e.file_name().to_string_lossy().contains(".apk") {
            out.push(e.into_path());
        }
    }
    Ok(out)
}

pub fn perform_complete_validation(
    archive: &Path,
    comparison: Option<&ComparisonConfig>,
) -> ArchiveOutcome {
    let validation = validate_archive(archive);
    let comparison = match (&validation, comparison) {
        (Ok(versions), Some(cfg)) => {
            info!(
                archive = %archive.display(),
                "archive contains the model directory and versions manifest and all in-use models are syntactically correct"
            );
            Some(compare_with_old_archive(
                archive,
                versions,
                &cfg.old_archive,
                cfg.model_change,
            ))
        }
        _ => None,
    };

    match (&validation, &comparison) {
        (Err(e), _) => warn!(archive = %archive.display(), error = %e, "archive validation failed"),
        (Ok(_), Some(Err(e))) => warn!(
            archive = %archive.display(),
            error = %e,
            "archive does not have valid models as per comparison with older archive"
        ),
        (Ok(_), Some(Ok(_))) => info!(
            archive = %archive.display(),
            "archive seems to have valid model changes if any"
        ),
        (Ok(_), None) => info!(archive = %archive.display(), "archive validation passed"),
    }

    ArchiveOutcome {
        archive: archive.to_path_buf(),
        validation,
        comparison,
    }
}

/// Validates every archive named by the config, one at a time. One
/// archive's failure does not stop its siblings; only an unreadable source
/// folder fails the run.
pub fn run(config: &RunConfig) -> CoreResult<Vec<ArchiveOutcome>> {
    let archives = match &config.source {
        SourceMode::File(p) => vec![p.clone()],
        SourceMode::Folder(dir) => list_archive_files(dir)?,
    };
    if archives.is_empty() {
        warn!("no archives found");
    }
    Ok(archives
        .iter()
        .map(|a| perform_complete_validation(a, config.comparison.as_ref()))
        .collect())
}

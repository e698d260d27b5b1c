use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceKind {
    FILE,
    FOLDER,
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChangeExpectation {
    EXPECTED,
    NOT_EXPECTED,
}

impl ChangeExpectation {
    pub fn from_flag(expected: bool) -> Self {
        if expected {
            ChangeExpectation::EXPECTED
        } else {
            ChangeExpectation::NOT_EXPECTED
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMode {
    File(PathBuf),
    Folder(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonConfig {
    pub old_archive: PathBuf,
    pub model_change: ChangeExpectation,
}

/// Raw options as collected by a front end, before cross-field checks.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub source: SourceKind,
    pub pathname: Option<PathBuf>,
    pub compare: bool,
    pub model_change_expected: bool,
    pub old_archive: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            source: SourceKind::FOLDER,
            pathname: None,
            compare: false,
            model_change_expected: false,
            old_archive: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub source: SourceMode,
    pub comparison: Option<ComparisonConfig>,
}

impl RunConfig {
    pub fn new(opts: RunOptions) -> CoreResult<Self> {
        let comparison = if opts.compare {
            let old_archive = opts.old_archive.ok_or_else(|| {
                CoreError::InvalidInput(
                    "old archive path is required when comparison is requested".to_string(),
                )
            })?;
            Some(ComparisonConfig {
                old_archive,
                model_change: ChangeExpectation::from_flag(opts.model_change_expected),
            })
        } else {
            None
        };

        let source = match opts.source {
            SourceKind::FILE => SourceMode::File(opts.pathname.ok_or_else(|| {
                CoreError::InvalidInput("pathname is required when source is file".to_string())
            })?),
            SourceKind::FOLDER => {
                SourceMode::Folder(opts.pathname.unwrap_or_else(|| PathBuf::from(".")))
            }
        };

        Ok(Self { source, comparison })
    }
}

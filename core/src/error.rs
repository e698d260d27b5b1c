use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("archive corrupt: {path}: {reason}")]
    ArchiveCorrupt { path: String, reason: String },

    #[error("entry not found: {0}")]
    EntryNotFound(String),

    #[error("mandatory assets missing: {}", .missing.join(", "))]
    MandatoryAssetsMissing { missing: Vec<String> },

    #[error("versions manifest invalid: {0}")]
    ManifestInvalid(String),

    #[error("model files not found for model ids: {}", .ids.join(", "))]
    ModelFilesMissing { ids: Vec<String> },

    #[error("model files not valid json for model ids: {}", .ids.join(", "))]
    ModelFilesInvalid { ids: Vec<String> },

    #[error("model version change expected but not found, rebuild required")]
    ExpectedChangeNotFound,

    #[error("model version change not expected but found for model ids: {}, rebuild required", .ids.join(", "))]
    UnexpectedChangeFound { ids: Vec<String> },

    #[error("model size mismatch found for model ids: {}, rebuild required", .ids.join(", "))]
    UnexpectedSizeChange { ids: Vec<String> },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("zip error: {0}")]
    Zip(String),
}

impl CoreError {
    /// Stable identifier for the failure kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::InvalidInput(_) => "INVALID_INPUT",
            CoreError::ArchiveCorrupt { .. } => "ARCHIVE_CORRUPT",
            CoreError::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            CoreError::MandatoryAssetsMissing { .. } => "MANDATORY_ASSETS_MISSING",
            CoreError::ManifestInvalid(_) => "MANIFEST_INVALID",
            CoreError::ModelFilesMissing { .. } => "MODEL_FILES_MISSING",
            CoreError::ModelFilesInvalid { .. } => "MODEL_FILES_INVALID",
            CoreError::ExpectedChangeNotFound => "EXPECTED_CHANGE_NOT_FOUND",
            CoreError::UnexpectedChangeFound { .. } => "UNEXPECTED_CHANGE_FOUND",
            CoreError::UnexpectedSizeChange { .. } => "UNEXPECTED_SIZE_CHANGE",
            CoreError::Io(_) => "IO",
            CoreError::Json(_) => "JSON",
            CoreError::Zip(_) => "ZIP",
        }
    }

    /// Model ids attached to the failure, if the kind carries any.
    pub fn model_ids(&self) -> &[String] {
        match self {
            CoreError::ModelFilesMissing { ids }
            | CoreError::ModelFilesInvalid { ids }
            | CoreError::UnexpectedChangeFound { ids }
            | CoreError::UnexpectedSizeChange { ids } => ids,
            _ => &[],
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

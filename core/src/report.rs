use crate::compare::ComparisonOutcome;
use crate::error::CoreError;
use crate::run::ArchiveOutcome;
use crate::validator::manifest::ModelVersionMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
    pub result: String, // PASS|FAIL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub model_ids: Vec<String>,
}

impl StageResult {
    fn pass(message: String, model_ids: Vec<String>) -> Self {
        Self {
            result: "PASS".to_string(),
            kind: None,
            message,
            model_ids,
        }
    }

    fn fail(e: &CoreError) -> Self {
        Self {
            result: "FAIL".to_string(),
            kind: Some(e.kind().to_string()),
            message: e.to_string(),
            model_ids: e.model_ids().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveReport {
    pub archive: String,
    pub overall: String, // PASS|FAIL
    pub validation: StageResult,
    #[serde(default, skip_serializing_if = "ModelVersionMap::is_empty")]
    pub models: ModelVersionMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<StageResult>,
}

impl From<&ArchiveOutcome> for ArchiveReport {
    fn from(o: &ArchiveOutcome) -> Self {
        let (validation, models) = match &o.validation {
            Ok(v) => (
                StageResult::pass(format!("{} models in use", v.len()), Vec::new()),
                v.clone(),
            ),
            Err(e) => (StageResult::fail(e), ModelVersionMap::new()),
        };
        let comparison = o.comparison.as_ref().map(|c| match c {
            Ok(ComparisonOutcome::VersionChangeConfirmed { deltas }) => StageResult::pass(
                "model version change expected and found".to_string(),
                deltas.iter().map(|d| d.model_id().to_string()).collect(),
            ),
            Ok(ComparisonOutcome::SizesMatched { models }) => StageResult::pass(
                format!("no model version change, {} model sizes matched", models),
                Vec::new(),
            ),
            Err(e) => StageResult::fail(e),
        });
        Self {
            archive: o.archive.display().to_string(),
            overall: if o.passed() { "PASS" } else { "FAIL" }.to_string(),
            validation,
            models,
            comparison,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub overall: String, // PASS|FAIL
    pub archives: Vec<ArchiveReport>,
}

impl RunReport {
    pub fn from_outcomes(outcomes: &[ArchiveOutcome]) -> Self {
        let archives: Vec<ArchiveReport> = outcomes.iter().map(ArchiveReport::from).collect();
        let overall = if !archives.is_empty() && archives.iter().all(|a| a.overall == "PASS") {
            "PASS"
        } else {
            "FAIL"
        };
        Self {
            overall: overall.to_string(),
            archives,
        }
    }
}

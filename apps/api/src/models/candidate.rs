use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::parsing::text::ExtractionWarning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    Extracted,
    ExtractionFailed,
}

/// Per-document result. Built once by the screening pipeline and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRecord {
    pub filename: String,
    pub status: ExtractionStatus,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Subset of the skill vocabulary, original casing, sorted.
    pub skills: BTreeSet<String>,
    pub score: u32,
    pub raw_text: String,
    pub warnings: Vec<ExtractionWarning>,
}

impl CandidateRecord {
    /// Placeholder for a document whose text could not be extracted.
    pub fn extraction_failed(filename: String, warnings: Vec<ExtractionWarning>) -> Self {
        Self {
            filename,
            status: ExtractionStatus::ExtractionFailed,
            name: None,
            email: None,
            phone: None,
            skills: BTreeSet::new(),
            score: 0,
            raw_text: String::new(),
            warnings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    /// 1-based position after sorting by score.
    pub rank: u32,
    #[serde(flatten)]
    pub candidate: CandidateRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    pub screening_id: Uuid,
    pub processed_at: DateTime<Utc>,
    pub job_skills: BTreeSet<String>,
    pub candidates: Vec<RankedCandidate>,
    pub warnings: Vec<String>,
}

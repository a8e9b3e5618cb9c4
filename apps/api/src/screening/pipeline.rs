//! Screening pipeline: job description + uploaded resumes → ranked report.
//!
//! Documents are processed strictly one after another. A failure inside one
//! document is recorded on that document's record and never aborts the batch.

use std::collections::BTreeSet;

use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{CandidateRecord, ExtractionStatus, ScreeningReport};
use crate::parsing::contact::extract_contact_info;
use crate::parsing::name::{extract_name, EntityRecognizer};
use crate::parsing::skills::SkillVocabulary;
use crate::parsing::text::{extract_text, ExtractedText, ExtractionWarning};
use crate::screening::ranker::rank_candidates;
use crate::screening::scoring::{matched_skills, score};

pub const NO_JOB_SKILLS_WARNING: &str =
    "No target skills found in the job description. Ranking might be ineffective.";

/// An uploaded resume: original filename plus raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub content: Bytes,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// Runs a full screening for one batch.
pub async fn screen(
    job_description: &str,
    documents: Vec<UploadedDocument>,
    vocabulary: &SkillVocabulary,
    recognizer: &dyn EntityRecognizer,
) -> Result<ScreeningReport, AppError> {
    if documents.is_empty() || job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Please upload resumes and paste a job description before processing.".to_string(),
        ));
    }

    let screening_id = Uuid::new_v4();
    let job_skills = vocabulary.extract_skills(job_description);
    let mut warnings = Vec::new();
    if job_skills.is_empty() {
        warn!("Screening {screening_id}: {NO_JOB_SKILLS_WARNING}");
        warnings.push(NO_JOB_SKILLS_WARNING.to_string());
    }
    info!(
        "Screening {screening_id}: {} resumes, job skills: {:?}",
        documents.len(),
        job_skills
    );

    let total = documents.len();
    let mut candidates = Vec::with_capacity(total);
    for (i, document) in documents.into_iter().enumerate() {
        info!("Processing ({}/{}): {}", i + 1, total, document.filename);
        candidates.push(parse_candidate(document, vocabulary, recognizer, &job_skills).await);
    }

    let failed = candidates
        .iter()
        .filter(|c| c.status == ExtractionStatus::ExtractionFailed)
        .count();
    info!("Screening {screening_id} complete: {total} processed, {failed} failed extraction");

    Ok(ScreeningReport {
        screening_id,
        processed_at: Utc::now(),
        job_skills,
        candidates: rank_candidates(candidates),
        warnings,
    })
}

/// Extracts every field of one document and scores it against `job_skills`.
pub async fn parse_candidate(
    document: UploadedDocument,
    vocabulary: &SkillVocabulary,
    recognizer: &dyn EntityRecognizer,
    job_skills: &BTreeSet<String>,
) -> CandidateRecord {
    let UploadedDocument { filename, content } = document;

    let ExtractedText { text, warning } = read_document(&filename, content).await;
    if text.is_empty() {
        info!("  -> Could not extract text from {filename}.");
        return CandidateRecord::extraction_failed(filename, warning.into_iter().collect());
    }

    let mut warnings: Vec<ExtractionWarning> = warning.into_iter().collect();

    let name = match extract_name(&text, recognizer).await {
        Ok(name) => name,
        Err(e) => {
            warn!("Name recognition failed for {filename}: {e}");
            warnings.push(ExtractionWarning::NameRecognitionFailed {
                filename: filename.clone(),
                reason: e.to_string(),
            });
            None
        }
    };
    let contact = extract_contact_info(&text);
    let skills = vocabulary.extract_skills(&text);
    let candidate_score = score(&skills, job_skills);
    debug!(
        "{filename}: score {candidate_score}, matched {:?}",
        matched_skills(&skills, job_skills)
    );

    CandidateRecord {
        filename,
        status: ExtractionStatus::Extracted,
        name,
        email: contact.email,
        phone: contact.phone,
        skills,
        score: candidate_score,
        raw_text: text,
        warnings,
    }
}

/// Runs the blocking document readers off the async worker threads.
async fn read_document(filename: &str, content: Bytes) -> ExtractedText {
    let owned_name = filename.to_string();
    match tokio::task::spawn_blocking(move || extract_text(&owned_name, &content)).await {
        Ok(extracted) => extracted,
        Err(e) => {
            warn!("Text extraction task for {filename} did not complete: {e}");
            ExtractedText {
                text: String::new(),
                warning: Some(ExtractionWarning::MalformedDocument {
                    format: "document".to_string(),
                    reason: e.to_string(),
                }),
            }
        }
    }
}

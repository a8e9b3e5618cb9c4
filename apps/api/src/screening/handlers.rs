//! Axum route handlers for the Screening API.

use std::collections::BTreeSet;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::models::candidate::{CandidateRecord, ScreeningReport};
use crate::screening::pipeline::{parse_candidate, screen, UploadedDocument};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SkillListResponse {
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractSkillsRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractSkillsResponse {
    pub skills: BTreeSet<String>,
}

/// Multipart body of a screening request.
#[derive(Debug, Default)]
struct ScreeningUpload {
    job_description: Option<String>,
    documents: Vec<UploadedDocument>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/skills
///
/// The configured skill vocabulary, in configured order.
pub async fn handle_list_skills(State(state): State<AppState>) -> Json<SkillListResponse> {
    Json(SkillListResponse {
        skills: state.vocabulary.skills().map(str::to_string).collect(),
    })
}

/// POST /api/v1/skills/extract
///
/// Previews which vocabulary skills a job description mentions.
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    Json(request): Json<ExtractSkillsRequest>,
) -> Result<Json<ExtractSkillsResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    Ok(Json(ExtractSkillsResponse {
        skills: state.vocabulary.extract_skills(&request.text),
    }))
}

/// POST /api/v1/candidates/parse
///
/// Extracts one resume (multipart field `resume`) without scoring it.
pub async fn handle_parse_candidate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CandidateRecord>, AppError> {
    let upload = read_upload(multipart).await?;
    let mut documents = upload.documents.into_iter();
    let (Some(document), None) = (documents.next(), documents.next()) else {
        return Err(AppError::Validation(
            "exactly one resume file is required".to_string(),
        ));
    };

    let record = parse_candidate(
        document,
        &state.vocabulary,
        state.recognizer.as_ref(),
        &BTreeSet::new(),
    )
    .await;

    Ok(Json(record))
}

/// POST /api/v1/screenings
///
/// Full pipeline: job description skills → per-resume extraction → score → rank.
/// Expects a `job_description` text field and one or more `resumes` file fields.
pub async fn handle_screen(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ScreeningReport>, AppError> {
    let upload = read_upload(multipart).await?;

    let report = screen(
        upload.job_description.as_deref().unwrap_or_default(),
        upload.documents,
        &state.vocabulary,
        state.recognizer.as_ref(),
    )
    .await?;

    Ok(Json(report))
}

async fn read_upload(mut multipart: Multipart) -> Result<ScreeningUpload, AppError> {
    let mut upload = ScreeningUpload::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "job_description" => upload.job_description = Some(field.text().await?),
            "resumes" | "resume" => {
                let filename = field
                    .file_name()
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        AppError::Validation(format!("'{field_name}' field must be a file upload"))
                    })?;
                let content = field.bytes().await?;
                upload.documents.push(UploadedDocument { filename, content });
            }
            other => debug!("Ignoring unknown multipart field '{other}'"),
        }
    }

    Ok(upload)
}

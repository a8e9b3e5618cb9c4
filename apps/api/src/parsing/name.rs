//! Candidate name extraction.
//!
//! Entity recognition is delegated to an `EntityRecognizer`, constructed once at
//! startup and injected via `AppState`. The selection policy over PERSON spans
//! is a best-effort heuristic: the first multi-token span wins, else the first
//! span of any length. Resumes that list references may yield a reference's
//! name; whichever span the recognizer reports first is used.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::parsing::prompts::{ENTITY_PROMPT_TEMPLATE, ENTITY_SYSTEM, STARTUP_CHECK_TEXT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    Person,
    Org,
    Gpe,
    Date,
    #[serde(other)]
    Other,
}

/// A contiguous span of the input text with its entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
}

/// Labels spans of text with entity types.
///
/// Carried in `AppState` as `Arc<dyn EntityRecognizer>`; read-only after construction.
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Returns labelled spans in the order they appear in `text`.
    async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, AppError>;

    fn name(&self) -> &str;
}

/// Picks the candidate's name from recognized spans.
pub fn select_candidate_name(spans: &[EntitySpan]) -> Option<String> {
    let mut persons = spans
        .iter()
        .filter(|s| s.label == EntityLabel::Person)
        .map(|s| s.text.as_str())
        .peekable();

    let first = *persons.peek()?;
    let name = persons
        .find(|name| name.split_whitespace().count() > 1)
        .unwrap_or(first);
    Some(name.to_string())
}

/// Runs the recognizer over `text` and applies the name selection policy.
/// Empty text never reaches the recognizer.
pub async fn extract_name(
    text: &str,
    recognizer: &dyn EntityRecognizer,
) -> Result<Option<String>, AppError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let spans = recognizer.recognize(text).await?;
    Ok(select_candidate_name(&spans))
}

// ────────────────────────────────────────────────────────────────────────────
// LlmEntityRecognizer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct EntityResponse {
    #[serde(default)]
    entities: Vec<EntitySpan>,
}

/// Entity recognizer backed by the LLM client.
///
/// Construct with [`LlmEntityRecognizer::load`], which sends the model one startup request so
/// that an unusable recognizer stops the service at startup.
pub struct LlmEntityRecognizer {
    llm: LlmClient,
    max_input_chars: usize,
}

impl LlmEntityRecognizer {
    pub async fn load(llm: LlmClient, max_input_chars: usize) -> Result<Self, AppError> {
        let recognizer = Self {
            llm,
            max_input_chars,
        };

        let checked = recognizer
            .recognize(STARTUP_CHECK_TEXT)
            .await
            .map_err(|e| AppError::ModelUnavailable(e.to_string()))?;
        info!(
            "Entity recognizer ready (model: {}, startup spans: {})",
            crate::llm_client::MODEL,
            checked.len()
        );

        Ok(recognizer)
    }
}

#[async_trait]
impl EntityRecognizer for LlmEntityRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, AppError> {
        let input = truncate_chars(text, self.max_input_chars);
        let prompt = ENTITY_PROMPT_TEMPLATE.replace("{text}", input);

        let response: EntityResponse = self
            .llm
            .call_json(&prompt, ENTITY_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Entity recognition failed: {e}")))?;

        let spans = retain_spans_in_text(response.entities, input);
        debug!("Recognized {} entity spans", spans.len());
        Ok(spans)
    }

    fn name(&self) -> &str {
        "llm"
    }
}

/// Drops spans that are not literally present in the text the model was given.
fn retain_spans_in_text(spans: Vec<EntitySpan>, text: &str) -> Vec<EntitySpan> {
    spans
        .into_iter()
        .map(|mut s| {
            s.text = s.text.trim().to_string();
            s
        })
        .filter(|s| !s.text.is_empty() && text.contains(&s.text))
        .collect()
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

use std::sync::Arc;

use crate::config::Config;
use crate::parsing::name::EntityRecognizer;
use crate::parsing::skills::SkillVocabulary;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub vocabulary: Arc<SkillVocabulary>,
    /// Loaded once at startup; a recognizer that fails to load stops the service.
    pub recognizer: Arc<dyn EntityRecognizer>,
}

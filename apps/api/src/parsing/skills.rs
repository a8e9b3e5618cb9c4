//! Skill vocabulary and whole-word skill extraction.

use std::collections::BTreeSet;
use std::path::Path;

use regex::Regex;
use thiserror::Error;
use tracing::info;

/// Skills searched for when no vocabulary file is configured.
pub const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "java",
    "c++",
    "javascript",
    "sql",
    "nosql",
    "mongodb",
    "postgresql",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "git",
    "jira",
    "agile",
    "scrum",
    "machine learning",
    "deep learning",
    "nlp",
    "natural language processing",
    "data analysis",
    "data science",
    "pandas",
    "numpy",
    "scikit-learn",
    "tensorflow",
    "pytorch",
    "react",
    "angular",
    "vue",
    "node.js",
    "flask",
    "django",
    "project management",
    "communication",
    "teamwork",
    "problem solving",
];

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("failed to read vocabulary file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pattern for skill '{skill}': {source}")]
    Pattern {
        skill: String,
        #[source]
        source: regex::Error,
    },

    #[error("skill vocabulary is empty")]
    Empty,
}

/// A single vocabulary entry with its compiled whole-word matcher.
#[derive(Debug, Clone)]
struct SkillPattern {
    skill: String,
    matcher: Regex,
}

/// Ordered list of skill phrases, fixed at startup.
///
/// Order is preserved for display only. Each entry is matched as a whole word
/// against lowercased text, so "java" never matches inside "javascript".
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    patterns: Vec<SkillPattern>,
}

impl SkillVocabulary {
    pub fn new<I, S>(skills: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = skills
            .into_iter()
            .map(|skill| {
                let skill: String = skill.into();
                skill.trim().to_string()
            })
            .filter(|skill| !skill.is_empty())
            .map(|skill| {
                let pattern = format!(r"\b{}\b", regex::escape(&skill.to_lowercase()));
                match Regex::new(&pattern) {
                    Ok(matcher) => Ok(SkillPattern { skill, matcher }),
                    Err(source) => Err(VocabularyError::Pattern { skill, source }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if patterns.is_empty() {
            return Err(VocabularyError::Empty);
        }

        Ok(Self { patterns })
    }

    pub fn default_skills() -> Result<Self, VocabularyError> {
        Self::new(DEFAULT_SKILLS.iter().copied())
    }

    /// Parses a vocabulary file: one skill per line, blank lines and `#` comments ignored.
    pub fn parse(contents: &str) -> Result<Self, VocabularyError> {
        Self::new(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Loads the vocabulary from `path`, or the built-in list when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, VocabularyError> {
        let vocabulary = match path {
            Some(path) => {
                let contents =
                    std::fs::read_to_string(path).map_err(|source| VocabularyError::Io {
                        path: path.display().to_string(),
                        source,
                    })?;
                Self::parse(&contents)?
            }
            None => Self::default_skills()?,
        };
        info!(
            "Skill vocabulary loaded: {} entries ({})",
            vocabulary.len(),
            path.map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string())
        );
        Ok(vocabulary)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Skills in configured order.
    pub fn skills(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.skill.as_str())
    }

    /// Returns every vocabulary entry present in `text` as a whole word,
    /// in its original casing.
    pub fn extract_skills(&self, text: &str) -> BTreeSet<String> {
        let text_lower = text.to_lowercase();
        self.patterns
            .iter()
            .filter(|p| p.matcher.is_match(&text_lower))
            .map(|p| p.skill.clone())
            .collect()
    }
}

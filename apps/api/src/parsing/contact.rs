use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// The `|` inside the TLD class is literal; kept for compatibility with existing results.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b").expect("valid email regex")
});

// North American numbers only. International formats come back as None.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("valid phone regex")
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Returns the first email-shaped and the first phone-shaped match in `text`.
/// No validation beyond the pattern.
pub fn extract_contact_info(text: &str) -> ContactInfo {
    ContactInfo {
        email: EMAIL_RE.find(text).map(|m| m.as_str().to_string()),
        phone: PHONE_RE.find(text).map(|m| m.as_str().to_string()),
    }
}

//! Issue key extraction.

use once_cell::sync::Lazy;
use regex::Regex;

/// Two or more uppercase letters, a dash, then digits (e.g. `PROJ-123`).
static ISSUE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]{2,}-[0-9]+").expect("Valid regex pattern"));

/// Returns the first issue key in `text`, if any. Later keys are ignored.
pub fn extract_issue_key(text: &str) -> Option<&str> {
    ISSUE_KEY.find(text).map(|m| m.as_str())
}

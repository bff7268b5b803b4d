//! Host conventions injected into the engine.
//!
//! Name splitting, the row-level generate flag and what counts as a valid
//! email address are frontend policy, not engine logic, so they travel as
//! plain function values. The defaults here match the desktop app's behavior.

use common::model::dataset::Row;
use regex::Regex;
use std::sync::OnceLock;

/// Strategy bundle passed into every preview/generation pass.
#[derive(Clone, Copy)]
pub struct RowConventions {
    /// Split a free-form full name into (first, last).
    pub parse_name: fn(&str) -> (String, String),
    /// Whether the row opted into generation.
    pub is_generate_true: fn(&Row) -> bool,
    /// Whether an email address is well-formed enough to draft to.
    pub is_email_valid: fn(&str) -> bool,
}

impl Default for RowConventions {
    fn default() -> Self {
        RowConventions {
            parse_name,
            is_generate_true,
            is_email_valid,
        }
    }
}

/// Default name split.
///
/// A comma means `"Last, First"`; otherwise whitespace tokens, keeping the
/// first and last token and discarding middle names. Single token → first
/// name only.
pub fn parse_name(full_name: &str) -> (String, String) {
    let full = full_name.trim();
    if full.is_empty() {
        return (String::new(), String::new());
    }
    if let Some((last, first)) = full.split_once(',') {
        return (first.trim().to_string(), last.trim().to_string());
    }
    let mut parts = full.split_whitespace();
    let first = parts.next().unwrap_or_default();
    match parts.last() {
        Some(last) => (first.to_string(), last.to_string()),
        None => (first.to_string(), String::new()),
    }
}

/// Default generate flag: a `generate` column (or its `gen` shorthand) parsed
/// as a boolean. Rows without either column are included.
pub fn is_generate_true(row: &Row) -> bool {
    for key in ["generate", "gen"] {
        if let Some(val) = row.get(key) {
            return parse_bool(val);
        }
    }
    true
}

fn parse_bool(val: &str) -> bool {
    matches!(val.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "y")
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"))
}

/// Default email check: `local@domain.tld` shape, nothing stricter.
pub fn is_email_valid(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email_re().is_match(email)
}

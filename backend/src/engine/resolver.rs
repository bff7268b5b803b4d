//! Per-row placeholder resolution.
//!
//! A `RowResolver` is built fresh for each row of a pass. It derives the
//! semantic values (first/last/full name, firm, school) from the detected
//! header roles and substitutes `{token}` placeholders in template text.
//!
//! Resolution priority for a token:
//! 1. derived value (case-insensitive key, `firm name` aliases `firm`)
//! 2. exact header name match, pulling the raw column value
//! 3. empty string

use crate::engine::conventions::RowConventions;
use crate::engine::headers::HeaderRoles;
use common::model::dataset::Row;
use regex::{Captures, Regex};
use std::sync::OnceLock;

// Non-nested, non-greedy: shortest span between a brace pair. Replacement
// text is never re-scanned, so substitution cannot recurse.
fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("placeholder pattern"))
}

/// Semantic values derived from one row.
///
/// Kept separate from the raw row map: the row stays an arbitrary
/// caller-defined column set, this is the engine's fixed vocabulary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedValues {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub firm: String,
    pub school: String,
}

impl DerivedValues {
    /// Lookup by lowercase placeholder key. `firm` and `firm name` are two
    /// spellings of the same source value.
    fn lookup(&self, key: &str) -> Option<&str> {
        match key {
            "first name" => Some(&self.first_name),
            "last name" => Some(&self.last_name),
            "full name" => Some(&self.full_name),
            "firm" | "firm name" => Some(&self.firm),
            "school" => Some(&self.school),
            _ => None,
        }
    }
}

pub struct RowResolver<'a> {
    headers: &'a [String],
    row: &'a Row,
    roles: HeaderRoles,
    derived: DerivedValues,
}

impl<'a> RowResolver<'a> {
    pub fn new(headers: &'a [String], row: &'a Row, conventions: &RowConventions) -> Self {
        let roles = HeaderRoles::detect(headers);
        let derived = build_derived(headers, row, &roles, conventions);
        RowResolver {
            headers,
            row,
            roles,
            derived,
        }
    }

    /// Substitute every `{token}` in `text`. Single pass, unresolved tokens
    /// become empty strings, text without braces is returned unchanged.
    pub fn resolve_text(&self, text: &str) -> String {
        if !text.contains('{') {
            return text.to_string();
        }
        placeholder_re()
            .replace_all(text, |caps: &Captures| self.resolve_token(&caps[1]))
            .into_owned()
    }

    fn resolve_token(&self, token: &str) -> String {
        let key = token.trim().to_lowercase();
        if let Some(val) = self.derived.lookup(&key) {
            return val.to_string();
        }
        for header in self.headers {
            if *header == key {
                return cell(self.row, header);
            }
        }
        String::new()
    }

    /// Row value of the resolved email header; falls back to a literal
    /// `email` column when no header matched the role.
    pub fn get_email(&self) -> String {
        match &self.roles.email {
            Some(header) => cell(self.row, header),
            None => cell(self.row, "email"),
        }
    }

    pub fn get_firm(&self) -> &str {
        &self.derived.firm
    }

    pub fn get_first_last(&self) -> (&str, &str) {
        (&self.derived.first_name, &self.derived.last_name)
    }

    pub fn get_full_name(&self) -> &str {
        &self.derived.full_name
    }
}

fn cell(row: &Row, header: &str) -> String {
    row.get(header).map(|v| v.trim().to_string()).unwrap_or_default()
}

fn build_derived(
    headers: &[String],
    row: &Row,
    roles: &HeaderRoles,
    conventions: &RowConventions,
) -> DerivedValues {
    let mut full_name = match &roles.full_name {
        Some(header) => cell(row, header),
        None => String::new(),
    };

    let (mut first, mut last) = (conventions.parse_name)(&full_name);

    let firm = match &roles.firm {
        Some(header) => cell(row, header),
        None => String::new(),
    };
    let school = match &roles.school {
        Some(header) => cell(row, header),
        None => String::new(),
    };

    // The selected full-name header can exist but hold an empty value for
    // this row; a literal "name" column still serves as a fallback then.
    if full_name.is_empty() && headers.iter().any(|h| h == "name") {
        let fallback = cell(row, "name");
        if !fallback.is_empty() {
            full_name = fallback;
            if first.is_empty() && last.is_empty() {
                let (f, l) = (conventions.parse_name)(&full_name);
                first = f;
                last = l;
            }
        }
    }

    // Prefix rule: a non-empty prefix value turns the first-name placeholder
    // into "Prefix. Last" (or "Prefix." without a last name). An empty value
    // in an existing prefix column reverts to the plain first name.
    let prefix_val = match &roles.prefix {
        Some(header) => cell(row, header),
        None => String::new(),
    };
    let first_name = if !prefix_val.is_empty() {
        if last.is_empty() {
            format!("{}.", prefix_val)
        } else {
            format!("{}. {}", prefix_val, last)
        }
    } else {
        first
    };

    DerivedValues {
        first_name,
        last_name: last,
        full_name,
        firm,
        school,
    }
}

//! Template selection: manual overrides first, then per-firm rotation.

use crate::engine::resolver::RowResolver;
use common::model::template::Template;
use std::collections::HashMap;

/// Per-firm rotation bookkeeping for a single pass.
///
/// Counters are built fresh for every preview or generation pass and never
/// persisted or shared between passes; both independently restart, which is
/// what keeps preview and generation in agreement. The empty firm string is
/// a rotation key of its own, so all "no firm" recipients share one sequence.
#[derive(Debug, Default)]
pub struct RotationCounters {
    counts: HashMap<String, u32>,
}

impl RotationCounters {
    pub fn new() -> Self {
        RotationCounters::default()
    }

    /// Increment and return the count for a firm key. First recipient at a
    /// firm sees 1.
    fn bump(&mut self, firm_key: &str) -> u32 {
        let count = self.counts.entry(firm_key.to_string()).or_insert(0);
        *count += 1;
        *count
    }
}

/// Decide which template a recipient gets.
///
/// Returns `(template, is_manual)`:
/// - a manual override by normalized email wins outright, including
///   `manual_only` templates;
/// - an override pointing at a template that no longer exists pins the
///   recipient to "unassigned" — it does not re-enter rotation and does not
///   advance any counter;
/// - otherwise the Nth recipient at a firm (in row order) gets the Nth
///   non-manual template, wrapping around.
pub fn choose_template<'t>(
    resolver: &RowResolver,
    templates: &'t [Template],
    overrides: &HashMap<String, String>,
    counters: &mut RotationCounters,
) -> (Option<&'t Template>, bool) {
    let email = resolver.get_email().trim().to_lowercase();

    if !email.is_empty() {
        if let Some(template_id) = overrides.get(&email) {
            let found = templates.iter().find(|t| &t.id == template_id);
            return (found, found.is_some());
        }
    }

    let rotatable: Vec<&Template> = templates.iter().filter(|t| !t.manual_only).collect();
    if rotatable.is_empty() {
        return (None, false);
    }

    let count = counters.bump(resolver.get_firm());
    let idx = (count as usize - 1) % rotatable.len();
    (Some(rotatable[idx]), false)
}

//! Builds the per-recipient preview/assignment table.
//!
//! One linear traversal of the rows, sharing a single `RotationCounters` for
//! the whole pass. The function is deterministic for identical inputs: every
//! call restarts the counters, so rendering the preview twice (or previewing
//! and then generating) assigns the same templates.

use crate::engine::conventions::RowConventions;
use crate::engine::resolver::RowResolver;
use crate::engine::select::{choose_template, RotationCounters};
use common::model::dataset::Row;
use common::model::preview::PreviewEntry;
use common::model::template::Template;
use std::collections::HashMap;

/// Shown in place of a template name when none could be assigned.
const UNASSIGNED: &str = "–";

/// Build preview entries for every row, in row order.
///
/// A row is eligible when its generate flag parses true and its email is
/// well-formed. With `only_recipients` set, ineligible rows are dropped from
/// the output entirely; otherwise they are listed but never assigned a
/// template — and never advance a firm's rotation counter either way.
pub fn build_preview_rows(
    rows: &[Row],
    headers: &[String],
    templates: &[Template],
    overrides: &HashMap<String, String>,
    conventions: &RowConventions,
    only_recipients: bool,
) -> Vec<PreviewEntry> {
    let mut out = Vec::new();
    let mut counters = RotationCounters::new();

    for row in rows {
        let resolver = RowResolver::new(headers, row, conventions);

        let email = resolver.get_email();
        let email_norm = email.trim().to_lowercase();
        let eligible =
            (conventions.is_generate_true)(row) && (conventions.is_email_valid)(&email);

        if only_recipients && !eligible {
            continue;
        }

        let firm = resolver.get_firm().to_string();
        let (first, last) = resolver.get_first_last();

        // With a prefix the short form alone reads oddly ("Dr. Smith"), so
        // the full name is shown alongside it.
        let prefix_val = row.get("prefix").map(|v| v.trim()).unwrap_or("");
        let name = if !prefix_val.is_empty() {
            format!("{} ({})", first, resolver.get_full_name())
        } else if last.is_empty() {
            first.trim().to_string()
        } else {
            format!("{} {}", first, last).trim().to_string()
        };

        let (chosen, is_manual) = if eligible {
            choose_template(&resolver, templates, overrides, &mut counters)
        } else {
            (None, false)
        };

        let entry = match chosen {
            Some(t) => PreviewEntry {
                name,
                email,
                email_norm,
                firm,
                template_name: t.name.clone(),
                template_id: Some(t.id.clone()),
                is_manual,
                is_eligible: eligible,
            },
            None => PreviewEntry {
                name,
                email,
                email_norm,
                firm,
                template_name: UNASSIGNED.to_string(),
                template_id: None,
                is_manual: false,
                is_eligible: eligible,
            },
        };
        out.push(entry);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        ["name", "firm", "email", "generate"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn row(name: &str, firm: &str, email: &str, generate: &str) -> Row {
        Row::from([
            ("name".to_string(), name.to_string()),
            ("firm".to_string(), firm.to_string()),
            ("email".to_string(), email.to_string()),
            ("generate".to_string(), generate.to_string()),
        ])
    }

    fn template(id: &str, name: &str, manual_only: bool) -> Template {
        Template {
            id: id.to_string(),
            name: name.to_string(),
            text: "Hi {first name}".to_string(),
            manual_only,
        }
    }

    #[test]
    fn rotation_matches_row_order_within_a_firm() {
        let rows = vec![
            row("Jane Doe", "Acme", "jane@acme.com", "true"),
            row("Bob Lee", "Acme", "bob@acme.com", "true"),
        ];
        let templates = vec![template("1", "T1", false), template("2", "T2", false)];
        let entries = build_preview_rows(
            &rows,
            &headers(),
            &templates,
            &HashMap::new(),
            &RowConventions::default(),
            true,
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].template_name, "T1");
        assert_eq!(entries[1].template_name, "T2");
    }

    #[test]
    fn only_recipients_drops_ineligible_rows() {
        let rows = vec![
            row("Jane Doe", "Acme", "jane@acme.com", "true"),
            row("No Email", "Acme", "", "true"),
            row("Opted Out", "Acme", "out@acme.com", "no"),
        ];
        let templates = vec![template("1", "T1", false)];
        let entries = build_preview_rows(
            &rows,
            &headers(),
            &templates,
            &HashMap::new(),
            &RowConventions::default(),
            true,
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].email_norm, "jane@acme.com");
    }

    #[test]
    fn all_rows_mode_lists_ineligible_rows_unassigned() {
        let rows = vec![
            row("Jane Doe", "Acme", "jane@acme.com", "true"),
            row("Opted Out", "Acme", "out@acme.com", "no"),
        ];
        let templates = vec![template("1", "T1", false)];
        let entries = build_preview_rows(
            &rows,
            &headers(),
            &templates,
            &HashMap::new(),
            &RowConventions::default(),
            false,
        );
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_eligible);
        assert!(!entries[1].is_eligible);
        assert_eq!(entries[1].template_name, "–");
        assert_eq!(entries[1].template_id, None);
        assert!(!entries[1].is_manual);
    }

    #[test]
    fn ineligible_rows_do_not_advance_rotation() {
        let rows = vec![
            row("Jane Doe", "Acme", "jane@acme.com", "true"),
            row("Opted Out", "Acme", "out@acme.com", "no"),
            row("Bob Lee", "Acme", "bob@acme.com", "true"),
        ];
        let templates = vec![template("1", "T1", false), template("2", "T2", false)];
        let entries = build_preview_rows(
            &rows,
            &headers(),
            &templates,
            &HashMap::new(),
            &RowConventions::default(),
            false,
        );
        // Bob is the second *eligible* recipient at Acme, so he gets T2 even
        // though an ineligible row sits between him and Jane.
        assert_eq!(entries[2].template_name, "T2");
    }

    #[test]
    fn stale_override_shows_unassigned_despite_rotatable_templates() {
        let rows = vec![row("Jane Doe", "Acme", "jane@acme.com", "true")];
        let templates = vec![template("1", "T1", false)];
        let overrides = HashMap::from([("jane@acme.com".to_string(), "deleted".to_string())]);
        let entries = build_preview_rows(
            &rows,
            &headers(),
            &templates,
            &overrides,
            &RowConventions::default(),
            true,
        );
        assert_eq!(entries[0].template_name, "–");
        assert_eq!(entries[0].template_id, None);
        assert!(!entries[0].is_manual);
    }

    #[test]
    fn manual_override_is_flagged() {
        let rows = vec![row("Jane Doe", "Acme", "jane@acme.com", "true")];
        let templates = vec![template("1", "T1", false), template("m", "M", true)];
        let overrides = HashMap::from([("jane@acme.com".to_string(), "m".to_string())]);
        let entries = build_preview_rows(
            &rows,
            &headers(),
            &templates,
            &overrides,
            &RowConventions::default(),
            true,
        );
        assert_eq!(entries[0].template_name, "M");
        assert!(entries[0].is_manual);
    }

    #[test]
    fn display_name_shows_full_name_with_prefix() {
        let mut r = row("John Smith", "Acme", "john@acme.com", "true");
        r.insert("prefix".to_string(), "Dr".to_string());
        let mut h = headers();
        h.push("prefix".to_string());

        let templates = vec![template("1", "T1", false)];
        let entries = build_preview_rows(
            &[r],
            &h,
            &templates,
            &HashMap::new(),
            &RowConventions::default(),
            true,
        );
        assert_eq!(entries[0].name, "Dr. Smith (John Smith)");
    }

    #[test]
    fn preview_is_deterministic_across_calls() {
        let rows = vec![
            row("Jane Doe", "Acme", "jane@acme.com", "true"),
            row("Bob Lee", "Acme", "bob@acme.com", "true"),
            row("Ann Wu", "Globex", "ann@globex.com", "true"),
        ];
        let templates = vec![template("1", "T1", false), template("2", "T2", false)];
        let conventions = RowConventions::default();
        let first =
            build_preview_rows(&rows, &headers(), &templates, &HashMap::new(), &conventions, true);
        let second =
            build_preview_rows(&rows, &headers(), &templates, &HashMap::new(), &conventions, true);
        let ids = |entries: &[PreviewEntry]| {
            entries
                .iter()
                .map(|e| e.template_id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn preserves_display_casing_and_normalizes_identity() {
        let rows = vec![row("Jane Doe", "Acme", "Jane@Acme.COM", "true")];
        let templates = vec![template("1", "T1", false)];
        let entries = build_preview_rows(
            &rows,
            &headers(),
            &templates,
            &HashMap::new(),
            &RowConventions::default(),
            true,
        );
        assert_eq!(entries[0].email, "Jane@Acme.COM");
        assert_eq!(entries[0].email_norm, "jane@acme.com");
    }
}

//! Draft generation: turns the previewed assignments into fully-resolved
//! outgoing drafts and hands them to a sink.
//!
//! The generator never selects templates on its own — it re-runs the preview
//! with recipient filtering on, so the set of drafts created is exactly the
//! set of preview entries holding a template id. Subject and body are then
//! re-resolved per recipient against the original row.

use crate::engine::conventions::RowConventions;
use crate::engine::preview::build_preview_rows;
use crate::engine::resolver::RowResolver;
use common::model::dataset::Row;
use common::model::template::Template;
use std::collections::HashMap;

/// A fully-resolved draft, ready for the mail client.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingDraft {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachment: Option<String>,
}

/// Destination for finished drafts. The production implementation talks to
/// Microsoft Outlook; tests collect drafts in memory.
pub trait DraftSink {
    fn create_draft(&self, draft: &OutgoingDraft) -> Result<(), String>;
}

/// Caller options for one generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub subject_template: String,
    pub resume_path: Option<String>,
    pub dry_run: bool,
}

/// Generate one draft per assigned recipient. Returns the number of drafts
/// created (or, under `dry_run`, that would have been created).
///
/// A sink failure aborts the run and propagates; the count never includes a
/// draft the sink did not accept, and rows already handed off are not
/// retried. `progress` is called after each draft with (done, total).
pub fn generate_drafts(
    rows: &[Row],
    headers: &[String],
    templates: &[Template],
    overrides: &HashMap<String, String>,
    conventions: &RowConventions,
    options: &GenerateOptions,
    sink: &dyn DraftSink,
    mut progress: impl FnMut(u32, u32),
) -> Result<u32, String> {
    let preview = build_preview_rows(rows, headers, templates, overrides, conventions, true);

    // Normalized email -> source row, over the full row set. Last row wins
    // when two rows share an address.
    let mut rows_by_email: HashMap<String, &Row> = HashMap::new();
    for row in rows {
        let resolver = RowResolver::new(headers, row, conventions);
        let email = resolver.get_email().trim().to_lowercase();
        if !email.is_empty() {
            rows_by_email.insert(email, row);
        }
    }

    let templates_by_id: HashMap<&str, &Template> =
        templates.iter().map(|t| (t.id.as_str(), t)).collect();

    let total = preview
        .iter()
        .filter(|p| p.template_id.is_some() && !p.email_norm.is_empty())
        .count() as u32;

    let mut count = 0u32;
    for entry in &preview {
        let template_id = match entry.template_id.as_deref() {
            Some(id) => id,
            None => continue,
        };
        if entry.email_norm.is_empty() {
            continue;
        }
        let row = match rows_by_email.get(&entry.email_norm) {
            Some(row) => *row,
            None => continue,
        };
        let template = match templates_by_id.get(template_id) {
            Some(t) => *t,
            None => continue,
        };

        let resolver = RowResolver::new(headers, row, conventions);
        let subject = resolver.resolve_text(&options.subject_template);
        let body = wrap_html(&resolver.resolve_text(&template.text));

        if !options.dry_run {
            let to = if entry.email.is_empty() {
                entry.email_norm.clone()
            } else {
                entry.email.clone()
            };
            sink.create_draft(&OutgoingDraft {
                to,
                subject,
                html_body: body,
                attachment: options.resume_path.clone(),
            })?;
        }

        count += 1;
        progress(count, total);
    }

    Ok(count)
}

/// Wrap resolved plain text in the minimal HTML envelope the mail client
/// expects: double spaces become paragraph breaks, newlines become line
/// breaks, stray break markers at either end are dropped.
pub fn wrap_html(text: &str) -> String {
    let html = text.trim().replace("  ", "<br><br>").replace('\n', "<br>");
    let mut content = html.as_str();
    while let Some(rest) = content.strip_prefix("<br>") {
        content = rest;
    }
    while let Some(rest) = content.strip_suffix("<br>") {
        content = rest;
    }
    format!(
        "<html><body style='margin:0;padding:0;font-family:Arial,sans-serif;'>{}</body></html>",
        content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct MemorySink {
        drafts: RefCell<Vec<OutgoingDraft>>,
    }

    impl MemorySink {
        fn new() -> Self {
            MemorySink {
                drafts: RefCell::new(Vec::new()),
            }
        }
    }

    impl DraftSink for MemorySink {
        fn create_draft(&self, draft: &OutgoingDraft) -> Result<(), String> {
            self.drafts.borrow_mut().push(draft.clone());
            Ok(())
        }
    }

    /// Fails on every draft after the first.
    struct FlakySink {
        accepted: RefCell<u32>,
    }

    impl DraftSink for FlakySink {
        fn create_draft(&self, _draft: &OutgoingDraft) -> Result<(), String> {
            let mut accepted = self.accepted.borrow_mut();
            if *accepted >= 1 {
                return Err("mail client unavailable".to_string());
            }
            *accepted += 1;
            Ok(())
        }
    }

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

    fn template(id: &str, name: &str, text: &str) -> Template {
        Template {
            id: id.to_string(),
            name: name.to_string(),
            text: text.to_string(),
            manual_only: false,
        }
    }

    fn options(subject: &str) -> GenerateOptions {
        GenerateOptions {
            subject_template: subject.to_string(),
            resume_path: None,
            dry_run: false,
        }
    }

    #[test]
    fn drafts_match_preview_assignments() {
        let rows = vec![
            row("Jane Doe", "Acme", "jane@acme.com", "true"),
            row("Bob Lee", "Acme", "bob@acme.com", "true"),
        ];
        let templates = vec![
            template("1", "T1", "Hi {first name}"),
            template("2", "T2", "Hello {first name}"),
        ];
        let conventions = RowConventions::default();
        let overrides = HashMap::new();

        let preview =
            build_preview_rows(&rows, &headers(), &templates, &overrides, &conventions, true);
        let assigned = preview.iter().filter(|p| p.template_id.is_some()).count() as u32;

        let sink = MemorySink::new();
        let count = generate_drafts(
            &rows,
            &headers(),
            &templates,
            &overrides,
            &conventions,
            &options("Intro from {firm}"),
            &sink,
            |_, _| {},
        )
        .unwrap();

        assert_eq!(count, assigned);
        let drafts = sink.drafts.borrow();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].to, "jane@acme.com");
        assert_eq!(drafts[0].subject, "Intro from Acme");
        assert!(drafts[0].html_body.contains("Hi Jane"));
        assert!(drafts[1].html_body.contains("Hello Bob"));
    }

    #[test]
    fn dry_run_counts_without_touching_the_sink() {
        let rows = vec![row("Jane Doe", "Acme", "jane@acme.com", "true")];
        let templates = vec![template("1", "T1", "Hi {first name}")];
        let sink = MemorySink::new();
        let mut opts = options("Hello");
        opts.dry_run = true;

        let count = generate_drafts(
            &rows,
            &headers(),
            &templates,
            &HashMap::new(),
            &RowConventions::default(),
            &opts,
            &sink,
            |_, _| {},
        )
        .unwrap();

        assert_eq!(count, 1);
        assert!(sink.drafts.borrow().is_empty());
    }

    #[test]
    fn ineligible_and_unassigned_rows_produce_no_drafts() {
        let rows = vec![
            row("Jane Doe", "Acme", "jane@acme.com", "true"),
            row("Opted Out", "Acme", "out@acme.com", "no"),
            row("Bad Email", "Acme", "not-an-email", "true"),
        ];
        let templates = vec![template("1", "T1", "Hi {first name}")];
        let sink = MemorySink::new();

        let count = generate_drafts(
            &rows,
            &headers(),
            &templates,
            &HashMap::new(),
            &RowConventions::default(),
            &options(""),
            &sink,
            |_, _| {},
        )
        .unwrap();

        assert_eq!(count, 1);
        assert_eq!(sink.drafts.borrow().len(), 1);
    }

    #[test]
    fn sink_failure_aborts_and_count_excludes_failures() {
        let rows = vec![
            row("Jane Doe", "Acme", "jane@acme.com", "true"),
            row("Bob Lee", "Acme", "bob@acme.com", "true"),
        ];
        let templates = vec![template("1", "T1", "Hi {first name}")];
        let sink = FlakySink {
            accepted: RefCell::new(0),
        };

        let err = generate_drafts(
            &rows,
            &headers(),
            &templates,
            &HashMap::new(),
            &RowConventions::default(),
            &options(""),
            &sink,
            |_, _| {},
        )
        .unwrap_err();

        assert!(err.contains("mail client unavailable"));
        assert_eq!(*sink.accepted.borrow(), 1);
    }

    #[test]
    fn attachment_path_travels_with_every_draft() {
        let rows = vec![row("Jane Doe", "Acme", "jane@acme.com", "true")];
        let templates = vec![template("1", "T1", "Hi")];
        let sink = MemorySink::new();
        let opts = GenerateOptions {
            subject_template: String::new(),
            resume_path: Some("/tmp/resume.pdf".to_string()),
            dry_run: false,
        };

        generate_drafts(
            &rows,
            &headers(),
            &templates,
            &HashMap::new(),
            &RowConventions::default(),
            &opts,
            &sink,
            |_, _| {},
        )
        .unwrap();

        assert_eq!(
            sink.drafts.borrow()[0].attachment.as_deref(),
            Some("/tmp/resume.pdf")
        );
    }

    #[test]
    fn progress_reports_done_and_total() {
        let rows = vec![
            row("Jane Doe", "Acme", "jane@acme.com", "true"),
            row("Bob Lee", "Acme", "bob@acme.com", "true"),
        ];
        let templates = vec![template("1", "T1", "Hi")];
        let sink = MemorySink::new();
        let mut reports = Vec::new();

        generate_drafts(
            &rows,
            &headers(),
            &templates,
            &HashMap::new(),
            &RowConventions::default(),
            &options(""),
            &sink,
            |done, total| reports.push((done, total)),
        )
        .unwrap();

        assert_eq!(reports, vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn wrap_html_formats_breaks_and_envelope() {
        let html = wrap_html("Hello\nWorld");
        assert_eq!(
            html,
            "<html><body style='margin:0;padding:0;font-family:Arial,sans-serif;'>Hello<br>World</body></html>"
        );

        let html = wrap_html("Para one.  Para two.");
        assert!(html.contains("Para one.<br><br>Para two."));

        // Leading/trailing breaks are stripped.
        let html = wrap_html("\nHi\n");
        assert!(html.contains(">Hi<"));
    }
}

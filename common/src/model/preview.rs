use serde::{Deserialize, Serialize};

/// One row of the recipient preview table.
///
/// `email` keeps the original casing for display; `email_norm` is the
/// lowercased/trimmed identity used for override lookups and row matching.
/// `template_id` is `None` when no template could be assigned (no rotatable
/// templates, or a stale override), in which case `template_name` is "–".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewEntry {
    pub name: String,
    pub email: String,
    pub email_norm: String,
    pub firm: String,
    pub template_name: String,
    pub template_id: Option<String>,
    pub is_manual: bool,
    pub is_eligible: bool,
}

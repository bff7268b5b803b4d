use serde::{Deserialize, Serialize};

/// Request payload for the preview endpoint.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub source_id: String,
    #[serde(default = "default_true")]
    pub only_recipients: bool,
}

/// Request payload for starting a draft-generation job.
#[derive(Debug, Clone, Deserialize)]
pub struct StartDraftsRequest {
    pub source_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub resume_path: Option<String>,
    #[serde(default)]
    pub dry_run: bool,
}

/// Request payload for loading a Google Sheets data source.
#[derive(Debug, Deserialize)]
pub struct SheetLoadRequest {
    pub url: String,
}

/// Pin a recipient (by email) to a specific template.
#[derive(Debug, Deserialize)]
pub struct SetOverrideRequest {
    pub email: String,
    pub template_id: String,
}

/// Remove a recipient's pinned template.
#[derive(Debug, Deserialize)]
pub struct ClearOverrideRequest {
    pub email: String,
}

/// Delete a template by id.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTemplateRequest {
    pub id: String,
}

fn default_true() -> bool {
    true
}

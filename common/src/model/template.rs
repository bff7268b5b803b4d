use serde::{Deserialize, Serialize};

/// An outreach email template.
///
/// `id` is assigned once when the template is first saved and is never
/// regenerated afterwards, so renames and edits keep recipient overrides
/// pointing at the same template. `manual_only` templates are skipped by
/// automatic rotation and can only be assigned through an override.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Template {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub text: String,
    #[serde(default)]
    pub manual_only: bool,
}

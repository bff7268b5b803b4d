use serde::{Deserialize, Serialize};

/// Lifecycle of a background job (draft generation, sheet import).
///
/// `InProgress` carries a percentage for draft jobs. `Completed` and `Failed`
/// carry a human-readable message shown by the frontend.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    InProgress(u32),
    Completed(String),
    Failed(String),
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One recipient row: lowercase, trimmed column name → trimmed value.
///
/// Rows are normalized by the data-source loaders; the engine assumes keys
/// are already lowercased. A case-insensitive key collision resolves to the
/// last column written.
pub type Row = HashMap<String, String>;

/// Where a stored data source came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceKind {
    Csv,
    Sheet,
}

/// Summary returned after a data source is uploaded or fetched.
///
/// `id` is the md5 of the stored CSV bytes and doubles as the filename under
/// the uploads directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceSummary {
    pub id: String,
    pub kind: DataSourceKind,
    pub headers: Vec<String>,
    pub row_count: usize,
}

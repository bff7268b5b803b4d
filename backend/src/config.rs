//! Fixed deployment constants for the local backend.

pub const HOST: &str = "127.0.0.1";
pub const PORT: u16 = 8080;

/// Single-file profile database: templates, recipient overrides and
/// data-source records.
pub const DB_FILE: &str = "outreach.sqlite";

/// Uploaded/fetched CSV files live here, named by their md5.
pub const UPLOAD_DIR: &str = "./uploads";

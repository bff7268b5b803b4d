//! CSV data sources.
//!
//! An uploaded file is hashed while it streams in and stored under
//! `uploads/{md5}.csv`; the md5 becomes the data-source id the preview and
//! draft endpoints refer back to. Re-uploading identical bytes lands on the
//! same id, so nothing is duplicated.
//!
//! - `POST /api/data_sources/csv/upload`: multipart upload (`file` field).
//!   Returns the source id, normalized headers and row count.

use actix_web::web::{post, scope};
use actix_web::Scope;

pub mod load;
mod upload;

const API_PATH: &str = "/api/data_sources/csv";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/upload", post().to(upload::process))
}

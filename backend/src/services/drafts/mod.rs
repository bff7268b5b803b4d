//! # Draft Generation Service
//!
//! Endpoints under `/api/drafts`. Generation is a background job: one mail
//! client round trip per recipient adds up, so `POST /start` returns a job id
//! immediately and the frontend polls `GET /status/{job_id}` while drafts
//! appear in Outlook.

mod get_status;
pub mod outlook;
mod start;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/drafts";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/start", post().to(start::process))
        .route("/status/{job_id}", get().to(get_status::process))
}

//! # Template Store Service
//!
//! Endpoints under `/api/templates` managing the outreach templates owned by
//! the user's profile. Templates keep their insertion order (a `position`
//! column); the rotation engine walks them in exactly that order, so saving
//! an edit never reshuffles assignments.
//!
//! - `GET /api/templates` — ordered list (`list::process`).
//! - `POST /api/templates/save` — create or update; a blank id means a new
//!   template and gets a uuid assigned exactly once (`save::process`).
//! - `POST /api/templates/delete` — removes a template; recipient overrides
//!   pointing at it go stale rather than being cascaded (`delete::process`).

mod delete;
mod list;
mod save;

pub use list::list_templates;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/templates";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/save", post().to(save::process))
        .route("/delete", post().to(delete::process))
}

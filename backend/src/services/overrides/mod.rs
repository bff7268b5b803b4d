//! # Recipient Override Service
//!
//! Endpoints under `/api/overrides` managing the per-recipient template
//! pins: a normalized (lowercased, trimmed) email address mapped to a
//! template id. An override always beats rotation, including for
//! `manual_only` templates.
//!
//! Writes are not referentially checked against the template table — an
//! override may point at a template deleted later. Such stale entries pin
//! their recipient to "unassigned" in previews and can be swept out with
//! `POST /prune`.

mod get;
mod prune;
mod save;

pub use get::load_overrides;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/overrides";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(get::process))
        .route("/set", post().to(save::process_set))
        .route("/clear", post().to(save::process_clear))
        .route("/prune", post().to(prune::process))
}

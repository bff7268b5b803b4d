//! Preview endpoint: the assignment table the frontend renders.
//!
//! `POST /api/preview` loads the stored data source plus the profile's
//! templates and overrides, then runs the engine's preview pass. The same
//! inputs feed draft generation, so what this returns is exactly what a
//! generation run would create.

use crate::db;
use crate::engine::conventions::RowConventions;
use crate::engine::preview::build_preview_rows;
use crate::services::data_sources::csv::load;
use crate::services::overrides::load_overrides;
use crate::services::templates::list_templates;
use actix_web::web::{post, scope};
use actix_web::{web, HttpResponse, Responder, Scope};
use common::model::preview::PreviewEntry;
use common::requests::PreviewRequest;

const API_PATH: &str = "/api/preview";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", post().to(process))
}

pub(crate) async fn process(payload: web::Json<PreviewRequest>) -> impl Responder {
    match build_preview(payload.into_inner()) {
        Ok(entries) => {
            let count = entries.len();
            HttpResponse::Ok().json(serde_json::json!({
                "preview_rows": entries,
                "count": count,
            }))
        }
        Err(e) => HttpResponse::BadRequest().body(format!("Error: {}", e)),
    }
}

fn build_preview(req: PreviewRequest) -> Result<Vec<PreviewEntry>, String> {
    let (rows, headers) = load::load_source(&req.source_id)?;

    let conn = db::open()?;
    let templates = list_templates(&conn)?;
    let overrides = load_overrides(&conn)?;

    Ok(build_preview_rows(
        &rows,
        &headers,
        &templates,
        &overrides,
        &RowConventions::default(),
        req.only_recipients,
    ))
}

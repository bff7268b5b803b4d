use crate::db;
use actix_web::{web, HttpResponse, Responder};
use common::requests::DeleteTemplateRequest;
use rusqlite::params;

pub(crate) async fn process(payload: web::Json<DeleteTemplateRequest>) -> impl Responder {
    match delete_template(&payload.id) {
        Ok(true) => HttpResponse::Ok().body("Template deleted"),
        Ok(false) => HttpResponse::NotFound().body("Template not found"),
        Err(e) => {
            HttpResponse::ServiceUnavailable().body(format!("Error deleting template: {}", e))
        }
    }
}

/// Remove a template by id. Overrides that referenced it are left in place
/// as stale entries; the overrides prune endpoint cleans those up.
fn delete_template(id: &str) -> Result<bool, String> {
    let conn = db::open()?;
    let affected = conn
        .execute("DELETE FROM templates WHERE id = ?1", params![id])
        .map_err(|e| e.to_string())?;
    Ok(affected > 0)
}

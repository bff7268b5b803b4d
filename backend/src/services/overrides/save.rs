use crate::db;
use actix_web::{web, HttpResponse, Responder};
use common::requests::{ClearOverrideRequest, SetOverrideRequest};
use rusqlite::params;

pub(crate) async fn process_set(payload: web::Json<SetOverrideRequest>) -> impl Responder {
    match set_override(&payload.email, &payload.template_id) {
        Ok(()) => HttpResponse::Ok().body("Override saved"),
        Err(e) => HttpResponse::ServiceUnavailable().body(format!("Error saving override: {}", e)),
    }
}

pub(crate) async fn process_clear(payload: web::Json<ClearOverrideRequest>) -> impl Responder {
    match clear_override(&payload.email) {
        Ok(()) => HttpResponse::Ok().body("Override cleared"),
        Err(e) => {
            HttpResponse::ServiceUnavailable().body(format!("Error clearing override: {}", e))
        }
    }
}

/// Pin a recipient to a template. The email is normalized here so lookups in
/// the engine (which normalize the row's email the same way) always hit.
fn set_override(email: &str, template_id: &str) -> Result<(), String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err("Override email must not be empty".to_string());
    }
    if template_id.trim().is_empty() {
        return Err("Override template id must not be empty".to_string());
    }

    let conn = db::open()?;
    conn.execute(
        "INSERT OR REPLACE INTO recipient_overrides (email, template_id) VALUES (?1, ?2)",
        params![email, template_id],
    )
    .map_err(|e| e.to_string())?;
    Ok(())
}

fn clear_override(email: &str) -> Result<(), String> {
    let email = email.trim().to_lowercase();
    let conn = db::open()?;
    conn.execute(
        "DELETE FROM recipient_overrides WHERE email = ?1",
        params![email],
    )
    .map_err(|e| e.to_string())?;
    Ok(())
}

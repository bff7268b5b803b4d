use crate::db;
use actix_web::{HttpResponse, Responder};
use rusqlite::Connection;
use std::collections::HashMap;

pub(crate) async fn process() -> impl Responder {
    let result = db::open().and_then(|conn| load_overrides(&conn));
    match result {
        Ok(map) => HttpResponse::Ok().json(map),
        Err(e) => {
            HttpResponse::ServiceUnavailable().body(format!("Error loading overrides: {}", e))
        }
    }
}

/// The full override map, keyed by normalized email. Shared with the preview
/// and draft services.
pub fn load_overrides(conn: &Connection) -> Result<HashMap<String, String>, String> {
    let mut stmt = conn
        .prepare("SELECT email, template_id FROM recipient_overrides")
        .map_err(|e| e.to_string())?;

    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
        .map_err(|e| e.to_string())?;

    rows.collect::<Result<HashMap<_, _>, _>>()
        .map_err(|e| e.to_string())
}

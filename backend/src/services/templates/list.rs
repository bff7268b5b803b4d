use crate::db;
use actix_web::{HttpResponse, Responder};
use common::model::template::Template;
use rusqlite::Connection;

pub(crate) async fn process() -> impl Responder {
    let result = db::open().and_then(|conn| list_templates(&conn));
    match result {
        Ok(templates) => HttpResponse::Ok().json(templates),
        Err(e) => {
            HttpResponse::ServiceUnavailable().body(format!("Error listing templates: {}", e))
        }
    }
}

/// All templates in rotation order. Also used by the preview and draft
/// services, which need the same ordered view the user sees.
pub fn list_templates(conn: &Connection) -> Result<Vec<Template>, String> {
    let mut stmt = conn
        .prepare("SELECT id, name, text, manual_only FROM templates ORDER BY position")
        .map_err(|e| e.to_string())?;

    let rows = stmt
        .query_map([], |row| {
            Ok(Template {
                id: row.get(0)?,
                name: row.get(1)?,
                text: row.get(2)?,
                manual_only: row.get::<_, i32>(3)? != 0,
            })
        })
        .map_err(|e| e.to_string())?;

    rows.collect::<Result<Vec<_>, _>>().map_err(|e| e.to_string())
}

use crate::db;
use actix_web::{web, HttpResponse, Responder};
use common::model::template::Template;
use rusqlite::params;

pub(crate) async fn process(payload: web::Json<Template>) -> impl Responder {
    match save_template(payload.into_inner()) {
        Ok(saved) => HttpResponse::Ok().json(saved),
        Err(e) => HttpResponse::ServiceUnavailable().body(format!("Error saving template: {}", e)),
    }
}

/// Insert or update a template.
///
/// A blank incoming id means a brand-new template: it gets a uuid here and
/// keeps it for life — edits and renames go through the ON CONFLICT branch,
/// which leaves both id and position untouched.
pub fn save_template(mut template: Template) -> Result<Template, String> {
    if template.name.trim().is_empty() {
        return Err("Template name must not be empty".to_string());
    }
    if template.id.trim().is_empty() {
        template.id = uuid::Uuid::new_v4().to_string();
    }

    let conn = db::open()?;
    conn.execute(
        "INSERT INTO templates (id, name, text, manual_only, position)
         VALUES (?1, ?2, ?3, ?4, COALESCE((SELECT MAX(position) + 1 FROM templates), 0))
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            text = excluded.text,
            manual_only = excluded.manual_only",
        params![
            &template.id,
            &template.name,
            &template.text,
            template.manual_only as i32
        ],
    )
    .map_err(|e| e.to_string())?;

    Ok(template)
}

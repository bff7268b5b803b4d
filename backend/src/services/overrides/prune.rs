use crate::db;
use actix_web::{HttpResponse, Responder};
use log::info;

pub(crate) async fn process() -> impl Responder {
    match prune_stale_overrides() {
        Ok(pruned) => HttpResponse::Ok().json(serde_json::json!({ "pruned": pruned })),
        Err(e) => {
            HttpResponse::ServiceUnavailable().body(format!("Error pruning overrides: {}", e))
        }
    }
}

/// Delete every override whose template no longer exists.
fn prune_stale_overrides() -> Result<usize, String> {
    let conn = db::open()?;
    let pruned = conn
        .execute(
            "DELETE FROM recipient_overrides
             WHERE template_id NOT IN (SELECT id FROM templates)",
            [],
        )
        .map_err(|e| e.to_string())?;
    if pruned > 0 {
        info!("Pruned {} stale recipient overrides", pruned);
    }
    Ok(pruned)
}

//! Google Sheets data sources.
//!
//! A standard sharing link is rewritten to the CSV export endpoint
//! (`/export?format=csv&gid=N`), fetched, and then stored and parsed exactly
//! like an uploaded CSV file — downstream code never knows the difference.

use crate::db;
use crate::services::data_sources::csv::load;
use actix_web::web::{post, scope};
use actix_web::{web, HttpResponse, Responder, Scope};
use common::model::dataset::{DataSourceKind, DataSourceSummary};
use common::requests::SheetLoadRequest;
use regex::Regex;
use rusqlite::params;
use std::sync::OnceLock;
use std::time::Duration;

const API_PATH: &str = "/api/data_sources/sheet";

const GS_HOST: &str = "docs.google.com";

// Anonymous export endpoints occasionally answer bot-looking agents with an
// interstitial instead of the CSV, so the fetch presents a browser UA.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0 Safari/537.36";

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/load", post().to(process))
}

pub(crate) async fn process(payload: web::Json<SheetLoadRequest>) -> impl Responder {
    match load_sheet(&payload.url).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => HttpResponse::BadRequest().body(format!("Error: {}", e)),
    }
}

fn sheet_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/spreadsheets/d/([a-zA-Z0-9\-_]+)").expect("sheet id pattern"))
}

fn gid_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"gid=(\d+)").expect("gid pattern"))
}

/// Rewrite a sharing URL into its CSV export URL. Returns `None` for URLs
/// that are not Google Sheets links. The worksheet gid is taken from the
/// URL fragment when present, defaulting to the first worksheet.
pub fn to_export_csv_url(url: &str) -> Option<String> {
    if !url.contains(GS_HOST) {
        return None;
    }
    let ssid = sheet_id_re().captures(url)?.get(1)?.as_str().to_string();

    let fragment = url.split_once('#').map(|(_, f)| f).unwrap_or("");
    let gid = gid_re()
        .captures(fragment)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or("0");

    Some(format!(
        "https://{}/spreadsheets/d/{}/export?format=csv&gid={}",
        GS_HOST, ssid, gid
    ))
}

async fn load_sheet(url: &str) -> Result<DataSourceSummary, String> {
    let export_url = to_export_csv_url(url).ok_or("Invalid Google Sheets URL")?;

    let client = reqwest::Client::new();
    let response = client
        .get(&export_url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status().as_u16()));
    }
    let bytes = response.bytes().await.map_err(|e| e.to_string())?;

    // Stored and addressed exactly like an upload: by content hash.
    let digest = format!("{:x}", md5::compute(&bytes));
    let path = load::source_path(&digest)?;
    std::fs::write(&path, &bytes).map_err(|e| e.to_string())?;

    let (rows, headers) = load::load_source(&digest)?;

    let conn = db::open()?;
    conn.execute(
        "INSERT OR REPLACE INTO data_sources (id, kind, origin) VALUES (?1, 'sheet', ?2)",
        params![digest, url],
    )
    .map_err(|e| e.to_string())?;

    Ok(DataSourceSummary {
        id: digest,
        kind: DataSourceKind::Sheet,
        headers,
        row_count: rows.len(),
    })
}

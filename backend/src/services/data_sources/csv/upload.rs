use crate::config::UPLOAD_DIR;
use crate::db;
use crate::services::data_sources::csv::load;
use actix_multipart::Multipart;
use actix_web::{HttpResponse, Responder};
use common::model::dataset::{DataSourceKind, DataSourceSummary};
use futures_util::StreamExt;
use md5::Context;
use rusqlite::params;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use uuid::Uuid;

pub(crate) async fn process(payload: Multipart) -> impl Responder {
    match upload_data_source(payload).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => HttpResponse::BadRequest().body(format!("Error: {}", e)),
    }
}

/// Streams a multipart CSV upload to disk.
///
/// The file is hashed while it streams; since the final name is the digest,
/// bytes go to a temp file first and are renamed once the hash is known.
/// The header line is validated as soon as it is complete so an obviously
/// broken file is rejected before the rest of it is consumed.
async fn upload_data_source(
    mut payload: Multipart,
) -> Result<DataSourceSummary, Box<dyn std::error::Error>> {
    let mut stored: Option<(String, String)> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        if field_name.as_deref() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();
        if !filename.to_lowercase().ends_with(".csv") {
            return Err("The file must end with .csv".into());
        }

        let tmp_path = Path::new(UPLOAD_DIR).join(format!(".incoming-{}.csv", Uuid::new_v4()));
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        let mut hasher = Context::new();
        let mut header_buf: Vec<u8> = Vec::new();
        let mut header_checked = false;

        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            hasher.consume(&chunk);

            if !header_checked {
                header_buf.extend_from_slice(&chunk);
                if let Some(pos) = header_buf.iter().position(|&b| b == b'\n') {
                    if let Err(e) = validate_header_line(&header_buf[..pos]) {
                        let _ = fs::remove_file(&tmp_path);
                        return Err(e);
                    }
                    header_checked = true;
                    header_buf.clear();
                }
            }

            writer.write_all(&chunk)?;
        }

        if !header_checked {
            // Single-line file: the whole payload is the header.
            if let Err(e) = validate_header_line(&header_buf) {
                let _ = fs::remove_file(&tmp_path);
                return Err(e);
            }
        }

        writer.flush()?;
        drop(writer);

        let digest = format!("{:x}", hasher.finalize());
        let final_path = load::source_path(&digest)?;
        fs::rename(&tmp_path, &final_path)?;
        stored = Some((digest, filename));
    }

    let (id, origin) = stored.ok_or("Missing file")?;

    let (rows, headers) = load::load_source(&id)?;

    let conn = db::open()?;
    conn.execute(
        "INSERT OR REPLACE INTO data_sources (id, kind, origin) VALUES (?1, 'csv', ?2)",
        params![id, origin],
    )?;

    Ok(DataSourceSummary {
        id,
        kind: DataSourceKind::Csv,
        headers,
        row_count: rows.len(),
    })
}

/// Sanity-check the raw header line: UTF-8, not blank, no empty cells.
/// Column *names* stay arbitrary — mapping them to meaning is the engine's
/// job, not the upload's.
fn validate_header_line(bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    let mut line = bytes.to_vec();
    if line.ends_with(b"\r") {
        line.pop();
    }
    let header = String::from_utf8(line).map_err(|_| "Header is not valid UTF-8")?;
    let header = header.trim_start_matches('\u{feff}');
    if header.trim().is_empty() {
        return Err("CSV header line must not be empty".into());
    }

    let delimiter = load::detect_delimiter(header);
    for cell in header.split(delimiter) {
        let mut cell = cell.trim();
        if cell.starts_with('"') && cell.ends_with('"') && cell.len() >= 2 {
            cell = &cell[1..cell.len() - 1];
        }
        if cell.trim().is_empty() {
            return Err("CSV header cells must not be empty".into());
        }
    }
    Ok(())
}

//! # Draft Job Start Service
//!
//! `POST /api/drafts/start` kicks off a background job that turns the current
//! preview into actual mail-client drafts.
//!
//! ## Workflow:
//!
//! 1.  **HTTP Request**: `process` receives a `StartDraftsRequest` naming the
//!     data source plus the subject template, optional attachment and dry-run
//!     flag.
//!
//! 2.  **Job Scheduling**: `schedule_drafts_job` registers the job as
//!     `Pending`, returns the job id to the client right away, and spawns a
//!     Tokio task to own the job's lifecycle.
//!
//! 3.  **Background Processing**: the spawned task runs `generate_blocking`
//!     under `tokio::task::spawn_blocking` — the worker is synchronous
//!     (sequential row traversal plus one `osascript` subprocess per draft)
//!     and must not sit on the async runtime.
//!
//! 4.  **Progress Reporting**: the worker sends `DraftUpdate` messages over a
//!     dedicated channel; a listener task translates per-draft progress into
//!     a percentage and forwards everything to the central job controller.
//!
//! 5.  **Completion**: success reports the number of drafts created; any
//!     error (missing source, sink failure) flips the job to `Failed` with
//!     the error text.

use crate::db;
use crate::engine::conventions::RowConventions;
use crate::engine::generate::{generate_drafts, GenerateOptions};
use crate::job_controller::state::{JobUpdate, JobsState};
use crate::services::data_sources::csv::load;
use crate::services::drafts::outlook::OutlookSink;
use crate::services::overrides::load_overrides;
use crate::services::templates::list_templates;
use actix_web::{web, HttpResponse, Responder};
use common::jobs::JobStatus;
use common::requests::StartDraftsRequest;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Progress messages from the blocking worker back to the async listener.
#[derive(Debug)]
enum DraftUpdate {
    /// Overall job status change (e.g. Failed).
    Job(JobStatus),
    /// One more draft handed to the mail client.
    Task { done: u32, total: u32 },
}

pub(crate) async fn process(
    state: web::Data<JobsState>,
    payload: web::Json<StartDraftsRequest>,
) -> impl Responder {
    match schedule_drafts_job(state, payload.into_inner()).await {
        Ok(job_id) => HttpResponse::Ok().json(serde_json::json!({ "job_id": job_id })),
        Err(err) => HttpResponse::InternalServerError().body(err),
    }
}

async fn schedule_drafts_job(
    state: web::Data<JobsState>,
    req: StartDraftsRequest,
) -> Result<String, String> {
    let job_id = Uuid::new_v4().to_string();
    state
        .jobs
        .write()
        .await
        .insert(job_id.clone(), JobStatus::Pending);

    let tx = state.tx.clone();
    let job_id_clone = job_id.clone();

    tokio::spawn(async move {
        let (draft_tx, mut draft_rx) = mpsc::channel::<DraftUpdate>(100);

        // Listener: translate worker updates into job-controller updates.
        let updater_tx = tx.clone();
        let job_id_for_updater = job_id_clone.clone();
        tokio::spawn(async move {
            while let Some(update) = draft_rx.recv().await {
                let status = match update {
                    DraftUpdate::Job(status) => status,
                    DraftUpdate::Task { done, total } => {
                        let progress = if total > 0 {
                            (done as f32 / total as f32 * 100.0) as u32
                        } else {
                            0
                        };
                        JobStatus::InProgress(progress)
                    }
                };
                let _ = updater_tx
                    .send(JobUpdate::new(job_id_for_updater.clone(), status))
                    .await;
            }
        });

        let handle = tokio::task::spawn_blocking(move || generate_blocking(draft_tx, req));

        match handle.await {
            Ok(Ok(count)) => {
                let _ = tx
                    .send(JobUpdate::new(
                        job_id_clone,
                        JobStatus::Completed(format!("Created {} drafts", count)),
                    ))
                    .await;
            }
            Ok(Err(e)) => {
                let _ = tx
                    .send(JobUpdate::new(job_id_clone, JobStatus::Failed(e)))
                    .await;
            }
            Err(e) => {
                let _ = tx
                    .send(JobUpdate::new(
                        job_id_clone,
                        JobStatus::Failed(format!("Task join error: {}", e)),
                    ))
                    .await;
            }
        }
    });

    Ok(job_id)
}

/// The synchronous worker: load everything, run the engine, report progress.
fn generate_blocking(
    tx: mpsc::Sender<DraftUpdate>,
    req: StartDraftsRequest,
) -> Result<u32, String> {
    let _ = tx.blocking_send(DraftUpdate::Job(JobStatus::InProgress(0)));

    let (rows, headers) = load::load_source(&req.source_id)?;

    let conn = db::open()?;
    let templates = list_templates(&conn)?;
    let overrides = load_overrides(&conn)?;

    let options = GenerateOptions {
        subject_template: req.subject,
        resume_path: req.resume_path,
        dry_run: req.dry_run,
    };

    let sink = OutlookSink;
    generate_drafts(
        &rows,
        &headers,
        &templates,
        &overrides,
        &RowConventions::default(),
        &options,
        &sink,
        |done, total| {
            let _ = tx.blocking_send(DraftUpdate::Task { done, total });
        },
    )
}

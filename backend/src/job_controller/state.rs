//! Tracks the state of long-running background jobs.
//!
//! Draft generation can take a while (one mail-client round trip per
//! recipient), so the start endpoint returns a job id immediately and the
//! frontend polls for status. This module holds the pieces shared by every
//! job:
//!
//! - `JobsState`: clonable, thread-safe map of job id → `JobStatus`, injected
//!   into the Actix application state in `main.rs`.
//! - `JobUpdate`: message a background worker sends to change a job's status.
//! - `start_job_updater`: the single task that drains the update channel and
//!   writes into the shared map, so workers never need the write lock.

use common::jobs::JobStatus;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// Shared container for the status of all background jobs.
#[derive(Clone)]
pub struct JobsState {
    /// Job id → current status; the single source of truth polled by the
    /// status endpoints.
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,

    /// Sender half of the update channel. Workers push `JobUpdate`s here
    /// instead of writing to `jobs` directly.
    pub tx: mpsc::Sender<JobUpdate>,
}

/// A status change for one job.
#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

impl JobUpdate {
    pub fn new(job_id: impl Into<String>, status: JobStatus) -> Self {
        JobUpdate {
            job_id: job_id.into(),
            status,
        }
    }
}

/// Drains the update channel into the shared map. Spawned once in `main.rs`
/// and runs for the lifetime of the server.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let mut jobs = state.jobs.write().await;
        jobs.insert(update.job_id.clone(), update.status);
    }
}

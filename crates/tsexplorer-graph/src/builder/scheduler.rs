//! The coordinator: sole owner of the queue, the known sets and the maps.
//!
//! ```text
//!            pending (VecDeque<JobFile>)
//!                 │ dispatch min(idle, pending)
//!                 ▼
//!   ┌──────────┐ JobRequest ┌──────────┐
//!   │          │──────────▶│ worker 0 │──┐
//!   │ Scheduler│──────────▶│ worker 1 │──┤ WorkerResponse
//!   │          │◀──────────────────────────┘ (Result | Error)
//!   └──────────┘
//!        │ merge: declare files/imports/packages, enqueue new files
//!        ▼
//!    ParserMaps
//! ```
//!
//! A file hash is known from the moment it is first merged, before its own
//! job runs. Later discoveries only add edges, so cycles terminate.

use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use crate::maps::ParserMaps;

use super::BuildError;
use super::job::{
    JobFile, JobId, JobReport, JobRequest, KnownSnapshot, WorkerId, WorkerResponse,
};
use super::worker::{Worker, WorkerContext};

pub(crate) struct Scheduler {
    maps: ParserMaps,
    pending: VecDeque<JobFile>,
    idle: Vec<WorkerId>,
    active: FxHashMap<JobId, WorkerId>,
    senders: Vec<mpsc::Sender<JobRequest>>,
    handles: Vec<JoinHandle<()>>,
    responses: mpsc::UnboundedReceiver<WorkerResponse>,
    snapshot: Option<Arc<KnownSnapshot>>,
    next_job: u64,
    failed_jobs: usize,
}

impl Scheduler {
    /// Spawn `pool_size` workers sharing `context`.
    pub(crate) fn spawn(context: Arc<WorkerContext>, pool_size: usize, maps: ParserMaps) -> Self {
        let (response_tx, responses) = mpsc::unbounded_channel();
        let mut senders = Vec::with_capacity(pool_size);
        let mut handles = Vec::with_capacity(pool_size);

        for index in 0..pool_size {
            let (job_tx, job_rx) = mpsc::channel(1);
            let worker = Worker::new(
                WorkerId(index),
                Arc::clone(&context),
                job_rx,
                response_tx.clone(),
            );
            senders.push(job_tx);
            handles.push(tokio::spawn(worker.run()));
        }

        Self {
            maps,
            pending: VecDeque::new(),
            // Reversed so worker 0 is handed the first job
            idle: (0..pool_size).rev().map(WorkerId).collect(),
            active: FxHashMap::default(),
            senders,
            handles,
            responses,
            snapshot: None,
            next_job: 0,
            failed_jobs: 0,
        }
    }

    pub(crate) fn enqueue(&mut self, file: JobFile) {
        self.pending.push_back(file);
    }

    /// Run until nothing is pending or active, then stop the workers.
    pub(crate) async fn run(mut self) -> Result<ParserMaps, BuildError> {
        loop {
            self.dispatch().await;

            if self.pending.is_empty() && self.active.is_empty() {
                break;
            }

            let Some(response) = self.responses.recv().await else {
                self.shutdown().await;
                return Err(BuildError::WorkerPool(format!(
                    "all workers stopped with {} job(s) in flight",
                    self.active.len()
                )));
            };
            self.handle(response);
        }

        if self.failed_jobs > 0 {
            warn!(
                "{} job(s) failed; the graph is missing their imports",
                self.failed_jobs
            );
        }

        self.shutdown().await;
        Ok(self.maps)
    }

    async fn dispatch(&mut self) {
        while !self.pending.is_empty() {
            let Some(worker_id) = self.idle.pop() else {
                break;
            };
            let Some(file) = self.pending.pop_front() else {
                self.idle.push(worker_id);
                break;
            };

            let job_id = JobId(self.next_job);
            self.next_job += 1;
            let request = JobRequest {
                job_id,
                file,
                snapshot: self.snapshot(),
            };

            trace!("dispatch {} to {}", job_id, worker_id);
            match self.senders[worker_id.0].send(request).await {
                Ok(()) => {
                    self.active.insert(job_id, worker_id);
                }
                Err(err) => {
                    // The worker is gone; its job is dropped like any other failure
                    error!(
                        "{} could not be sent to {}: {}",
                        job_id,
                        worker_id,
                        err.0.file.path.display()
                    );
                    self.failed_jobs += 1;
                }
            }
        }
    }

    /// The current snapshot, rebuilt only after the known sets changed.
    fn snapshot(&mut self) -> Arc<KnownSnapshot> {
        if let Some(snapshot) = &self.snapshot {
            return Arc::clone(snapshot);
        }

        let snapshot = Arc::new(KnownSnapshot {
            files: self.maps.files.keys().cloned().collect(),
            packages: self.maps.packages.keys().cloned().collect(),
        });
        self.snapshot = Some(Arc::clone(&snapshot));
        snapshot
    }

    fn handle(&mut self, response: WorkerResponse) {
        let job_id = response.job_id();
        if self.active.remove(&job_id).is_none() {
            warn!("response for unknown {}", job_id);
        }
        self.idle.push(response.worker_id());

        match response {
            WorkerResponse::Result { report, .. } => self.merge(job_id, report),
            WorkerResponse::Error { error, .. } => {
                error!("{} failed: {}", job_id, error);
                self.failed_jobs += 1;
            }
        }
    }

    fn merge(&mut self, job_id: JobId, report: JobReport) {
        let JobReport {
            file_hash,
            imports,
            new_files,
            new_packages,
            package_names,
        } = report;

        let mut changed = false;

        for file in new_files {
            let (entry, nodes) = file.into_parts();
            let job_file = JobFile::from(&entry);
            if self.maps.declare_file(entry, nodes) {
                self.pending.push_back(job_file);
                changed = true;
            }
        }

        for target in &imports {
            self.maps.declare_import(&file_hash, target);
        }

        for package in new_packages {
            changed |= self.maps.declare_package(package);
        }

        for name in &package_names {
            self.maps.declare_file_package(&file_hash, name);
        }

        if changed {
            self.snapshot = None;
        }

        debug!(
            "merged {}: {} pending, {} active",
            job_id,
            self.pending.len(),
            self.active.len()
        );
    }

    async fn shutdown(&mut self) {
        self.senders.clear();
        for handle in self.handles.drain(..) {
            if let Err(err) = handle.await {
                error!("worker task ended abnormally: {}", err);
            }
        }
    }
}

//! Worker tasks.
//!
//! A worker owns one file at a time. For that file it resolves every import
//! specifier and parses each directly imported file the snapshot does not
//! know yet. Parsing happens inline; workers never hand work back to the
//! pool themselves.

use rustc_hash::FxHashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::parser::{FileParser, ParseError};
use crate::resolver::ModuleResolver;
use crate::runtime::Runtime;
use crate::types::ResolvedModule;

use super::job::{JobReport, JobRequest, WorkerId, WorkerResponse};

/// Shared, read-only state every worker uses.
#[derive(Debug)]
pub(crate) struct WorkerContext {
    pub runtime: Arc<dyn Runtime>,
    pub resolver: ModuleResolver,
    pub parser: FileParser,
    pub skip_node_modules: bool,
}

pub(crate) struct Worker {
    id: WorkerId,
    context: Arc<WorkerContext>,
    jobs: mpsc::Receiver<JobRequest>,
    responses: mpsc::UnboundedSender<WorkerResponse>,
}

impl Worker {
    pub(crate) fn new(
        id: WorkerId,
        context: Arc<WorkerContext>,
        jobs: mpsc::Receiver<JobRequest>,
        responses: mpsc::UnboundedSender<WorkerResponse>,
    ) -> Self {
        Self {
            id,
            context,
            jobs,
            responses,
        }
    }

    /// Process jobs until the coordinator closes the channel.
    pub(crate) async fn run(mut self) {
        while let Some(request) = self.jobs.recv().await {
            let job_id = request.job_id;
            let context = Arc::clone(&self.context);

            // A panicking job surfaces as a JoinError instead of killing the worker
            let outcome = tokio::spawn(async move { process_job(&context, request).await }).await;

            let response = match outcome {
                Ok(Ok(report)) => WorkerResponse::Result {
                    job_id,
                    worker_id: self.id,
                    report,
                },
                Ok(Err(err)) => WorkerResponse::Error {
                    job_id,
                    worker_id: self.id,
                    error: err.to_string(),
                },
                Err(join_err) => WorkerResponse::Error {
                    job_id,
                    worker_id: self.id,
                    error: format!("job panicked: {}", join_err),
                },
            };

            if self.responses.send(response).is_err() {
                break;
            }
        }
        trace!("{} stopped", self.id);
    }
}

/// Resolve one file's imports and parse the ones not seen before.
pub(crate) async fn process_job(
    context: &WorkerContext,
    request: JobRequest,
) -> Result<JobReport, ParseError> {
    let JobRequest {
        job_id,
        file,
        snapshot,
    } = request;
    let runtime = context.runtime.as_ref();

    let mut report = JobReport {
        file_hash: file.hash.clone(),
        imports: Vec::new(),
        new_files: Vec::new(),
        new_packages: Vec::new(),
        package_names: Vec::new(),
    };
    let mut seen_files = FxHashSet::default();
    let mut seen_packages = FxHashSet::default();

    for specifier in &file.import_specifiers {
        let Some(resolved) = context
            .resolver
            .resolve(&file.path, specifier, runtime)
            .await
        else {
            continue;
        };

        let path = match resolved {
            ResolvedModule::Internal(path) => path,
            ResolvedModule::External { path, package } => {
                if let Some(package) = package {
                    if seen_packages.insert(package.name.clone()) {
                        report.package_names.push(package.name.clone());
                        if !snapshot.packages.contains(&package.name) {
                            report.new_packages.push(package);
                        }
                    }
                }
                if context.skip_node_modules {
                    continue;
                }
                path
            }
        };

        let content = match context.parser.read(&path, runtime).await {
            Ok(Some(content)) => content,
            Ok(None) => continue,
            Err(err) => {
                warn!(
                    "{} {}: skipping import {}: {}",
                    job_id,
                    file.path.display(),
                    specifier,
                    err
                );
                continue;
            }
        };

        if !seen_files.insert(content.hash.clone()) {
            continue;
        }
        report.imports.push(content.hash.clone());

        if snapshot.files.contains(&content.hash) {
            continue;
        }
        report
            .new_files
            .push(context.parser.parse_blocking(content, false).await?);
    }

    debug!(
        "{} {}: {} import(s), {} new file(s), {} new package(s)",
        job_id,
        file.path.display(),
        report.imports.len(),
        report.new_files.len(),
        report.new_packages.len()
    );

    Ok(report)
}

use std::fs;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use anyhow::{anyhow, bail, Context};
use rlimit::{getrlimit, setrlimit, Resource};

use crate::cancellation::CancellationToken;
use crate::chunk_sorter;
use crate::config::SortConfig;
use crate::job::JobId;
use crate::merger;
use crate::splitter;
use crate::status::{JobStatus, StatusStore};
use crate::work_dir::WorkDir;

/// Orchestrates one sort job end to end: split the input into bounded
/// chunks, sort the chunks in parallel, merge the sorted chunks into the
/// output file.
///
/// The job's working directory is owned exclusively by the run and removed
/// on every exit path. Errors from any stage are caught here and converted
/// into a boolean failure; no partial output is ever reported as success.
///
/// # Examples
/// ```
/// use std::path::PathBuf;
/// use std::sync::Arc;
/// use large_file_sort::config::SortConfig;
/// use large_file_sort::job::JobId;
/// use large_file_sort::sorter::Sorter;
/// use large_file_sort::status::InMemoryStatusStore;
///
/// fn sort_file(job_id: &JobId) -> bool {
///     let mut config = SortConfig::new(
///         PathBuf::from("./generated"),
///         PathBuf::from("./sorted"),
///     );
///     // chunks of this size are sorted fully in memory, so the setting
///     // bounds peak memory together with the number of tasks
///     config.with_chunk_size_mb(100);
///     config.with_tasks(4);
///     let mut sorter = Sorter::new(config);
///     sorter.with_status_store(Arc::new(InMemoryStatusStore::new()));
///     sorter.run(job_id)
/// }
/// ```
pub struct Sorter {
    config: SortConfig,
    status_store: Option<Arc<dyn StatusStore>>,
}

impl Sorter {
    pub fn new(config: SortConfig) -> Sorter {
        Sorter {
            config,
            status_store: None,
        }
    }

    /// Attach a status store. The sorter publishes `InProgress` when a run
    /// starts and `Completed`/`Failed` when it finishes.
    pub fn with_status_store(&mut self, status_store: Arc<dyn StatusStore>) {
        self.status_store = Some(status_store);
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Run the job to completion. Returns true only if splitting, sorting
    /// and merging all succeeded and the output file is in place.
    pub fn run(&self, job_id: &JobId) -> bool {
        self.run_with_token(job_id, &CancellationToken::new())
    }

    /// Run the job with a caller-held cancellation token. Cancellation is
    /// observed at line boundaries and reported as an ordinary failure.
    pub fn run_with_token(&self, job_id: &JobId, token: &CancellationToken) -> bool {
        let stopwatch = Instant::now();
        self.publish(job_id, JobStatus::InProgress);
        match self.execute(job_id, token) {
            Ok(()) => {
                log::info!(
                    "Sorted file {} in {:.2} seconds",
                    job_id,
                    stopwatch.elapsed().as_secs_f64()
                );
                self.publish(job_id, JobStatus::Completed);
                true
            }
            Err(error) => {
                log::error!(
                    "Failed to sort file {} after {:.2} seconds: {:#}",
                    job_id,
                    stopwatch.elapsed().as_secs_f64(),
                    error
                );
                self.publish(job_id, JobStatus::Failed);
                false
            }
        }
    }

    /// Run the job on a background thread, in the fire-and-forget manner of
    /// an accepting front end. The job is marked `InProgress` before the
    /// thread starts; a panic inside the run is reported as `Failed`.
    pub fn spawn(self: Arc<Self>, job_id: JobId, token: CancellationToken) -> thread::JoinHandle<bool> {
        self.publish(&job_id, JobStatus::InProgress);
        thread::spawn(move || {
            match catch_unwind(AssertUnwindSafe(|| self.run_with_token(&job_id, &token))) {
                Ok(success) => success,
                Err(_) => {
                    log::error!("Sort of file {job_id} panicked");
                    self.publish(&job_id, JobStatus::Failed);
                    false
                }
            }
        })
    }

    fn execute(&self, job_id: &JobId, token: &CancellationToken) -> Result<(), anyhow::Error> {
        let input_path = self.config.input_path(job_id);
        if !input_path.exists() {
            bail!("input file not found: {}", input_path.display());
        }
        fs::create_dir_all(self.config.output_dir())
            .with_context(|| anyhow!("path: {}", self.config.output_dir().display()))?;

        let work_dir = WorkDir::create(self.config.work_dir(job_id))?;

        let chunks = splitter::split(
            &input_path,
            work_dir.path(),
            self.config.chunk_size_bytes(),
            token,
        )?;
        log::info!("The file {} was divided into {} chunks", job_id, chunks.len());

        // the merge opens every sorted chunk at once
        Self::raise_nofile_limit(chunks.len())?;

        let sorted_chunks = chunk_sorter::sort_chunks(chunks, self.config.effective_tasks(), token)?;
        merger::merge(sorted_chunks, &self.config.output_path(job_id), token)?;
        Ok(())
    }

    // Raised monotonically and never restored: concurrent jobs share the
    // process-wide limit, and lowering it under a running merge would
    // starve that job of descriptors.
    fn raise_nofile_limit(chunk_count: usize) -> Result<(), anyhow::Error> {
        let (current_soft, current_hard) =
            getrlimit(Resource::NOFILE).with_context(|| "getrlimit")?;
        let needed = (chunk_count as u64 + 256).min(current_hard);
        if needed > current_soft {
            log::info!(
                "Raise rlimit NOFILE, soft: {current_soft} -> {needed}, hard: {current_hard}"
            );
            setrlimit(Resource::NOFILE, needed, current_hard).with_context(|| {
                format!("set rlimit NOFILE, soft: {needed}, hard: {current_hard}")
            })?;
        }
        Ok(())
    }

    fn publish(&self, job_id: &JobId, status: JobStatus) {
        if let Some(status_store) = &self.status_store {
            status_store.set_status(job_id, status);
        }
    }
}

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::RwLock;

use crate::job::JobId;

/// Lifecycle states a sort job can be observed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobStatus {
    NotFound,
    InProgress,
    Completed,
    Failed,
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JobStatus::NotFound => "NotFound",
            JobStatus::InProgress => "InProgress",
            JobStatus::Completed => "Completed",
            JobStatus::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// Store of job statuses, shared between the sorter and whatever front end
/// polls it. Implementations must tolerate concurrent readers and writers.
pub trait StatusStore: Send + Sync {
    fn set_status(&self, job_id: &JobId, status: JobStatus);

    /// Status of a job, `NotFound` for unknown ids.
    fn get_status(&self, job_id: &JobId) -> JobStatus;
}

/// In-memory status store backed by a read-write lock.
#[derive(Debug, Default)]
pub struct InMemoryStatusStore {
    store: RwLock<HashMap<JobId, JobStatus>>,
}

impl InMemoryStatusStore {
    pub fn new() -> InMemoryStatusStore {
        InMemoryStatusStore {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl StatusStore for InMemoryStatusStore {
    fn set_status(&self, job_id: &JobId, status: JobStatus) {
        self.store.write().unwrap().insert(job_id.clone(), status);
    }

    fn get_status(&self, job_id: &JobId) -> JobStatus {
        self.store
            .read()
            .unwrap()
            .get(job_id)
            .copied()
            .unwrap_or(JobStatus::NotFound)
    }
}

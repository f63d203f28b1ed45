use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use command_executor::command::Command;

use crate::cancellation::CancellationToken;
use crate::chunk_sorter;

/// Worker-pool command that sorts a single chunk file.
///
/// Completed sorted-chunk paths are appended to a shared collection; the
/// order of completion is irrelevant because the merge re-establishes global
/// order. Failures are collected rather than returned so that one bad chunk
/// does not tear down the pool mid-drain.
pub(crate) struct SortChunkCommand {
    chunk_path: PathBuf,
    sorted: Arc<Mutex<Vec<PathBuf>>>,
    failures: Arc<Mutex<Vec<anyhow::Error>>>,
    token: CancellationToken,
}

impl SortChunkCommand {
    pub(crate) fn new(
        chunk_path: PathBuf,
        sorted: Arc<Mutex<Vec<PathBuf>>>,
        failures: Arc<Mutex<Vec<anyhow::Error>>>,
        token: CancellationToken,
    ) -> SortChunkCommand {
        SortChunkCommand {
            chunk_path,
            sorted,
            failures,
            token,
        }
    }
}

impl Command for SortChunkCommand {
    fn execute(&self) -> Result<(), anyhow::Error> {
        match chunk_sorter::sort_chunk(&self.chunk_path, &self.token) {
            Ok(sorted_path) => {
                self.sorted.lock().unwrap().push(sorted_path);
            }
            Err(error) => {
                log::error!(
                    "Failed to sort chunk {}: {:#}",
                    self.chunk_path.display(),
                    error
                );
                self.failures.lock().unwrap().push(error);
            }
        }
        Ok(())
    }
}

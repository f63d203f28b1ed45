use std::path::PathBuf;

use crate::job::JobId;

/// Configuration of the sort service: directory layout, chunk size and
/// parallelism. All values are supplied by the caller at construction time;
/// the sorting core derives everything else from them.
#[derive(Clone, Debug)]
pub struct SortConfig {
    input_dir: PathBuf,
    output_dir: PathBuf,
    tmp_dir: PathBuf,
    chunk_size_mb: u64,
    tasks: usize,
}

impl SortConfig {
    /// Create a configuration with the default temporary directory
    /// (std::env::temp_dir()), 100 MB chunks, and one sort task per
    /// available CPU core.
    pub fn new(input_dir: PathBuf, output_dir: PathBuf) -> SortConfig {
        SortConfig {
            input_dir,
            output_dir,
            tmp_dir: std::env::temp_dir(),
            chunk_size_mb: 100,
            tasks: 0,
        }
    }

    /// Set the directory for per-job working directories. For large files a
    /// dedicated directory on the same file system as the output is
    /// recommended.
    pub fn with_tmp_dir(&mut self, tmp_dir: PathBuf) {
        self.tmp_dir = tmp_dir;
    }

    /// Set the chunk size in megabytes. The input is split into chunks of
    /// roughly this size; each chunk is sorted fully in memory.
    pub fn with_chunk_size_mb(&mut self, chunk_size_mb: u64) {
        self.chunk_size_mb = chunk_size_mb;
    }

    /// Set the number of concurrent chunk-sort tasks. The default of zero
    /// uses all available cores.
    pub fn with_tasks(&mut self, tasks: usize) {
        self.tasks = tasks;
    }

    pub fn input_dir(&self) -> &PathBuf {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    pub fn tmp_dir(&self) -> &PathBuf {
        &self.tmp_dir
    }

    /// Path the input file of a job is expected at.
    pub fn input_path(&self, job_id: &JobId) -> PathBuf {
        self.input_dir.join(format!("file_{job_id}.txt"))
    }

    /// Path the sorted output file of a job is written to.
    pub fn output_path(&self, job_id: &JobId) -> PathBuf {
        self.output_dir.join(format!("file_{job_id}_sorted.txt"))
    }

    pub(crate) fn work_dir(&self, job_id: &JobId) -> PathBuf {
        self.tmp_dir.join(job_id.as_str())
    }

    pub(crate) fn chunk_size_bytes(&self) -> u64 {
        self.chunk_size_mb * 1024 * 1024
    }

    pub(crate) fn effective_tasks(&self) -> usize {
        if self.tasks == 0 {
            num_cpus::get()
        } else {
            self.tasks
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::config::SortConfig;
    use crate::job::JobId;

    #[test]
    fn test_paths_derive_from_job_id() {
        let mut config = SortConfig::new(PathBuf::from("/in"), PathBuf::from("/out"));
        config.with_tmp_dir(PathBuf::from("/tmp/sort"));
        let job_id = JobId::from("abc123");

        assert_eq!(config.input_path(&job_id), PathBuf::from("/in/file_abc123.txt"));
        assert_eq!(
            config.output_path(&job_id),
            PathBuf::from("/out/file_abc123_sorted.txt")
        );
        assert_eq!(config.work_dir(&job_id), PathBuf::from("/tmp/sort/abc123"));
    }

    #[test]
    fn test_chunk_size_converts_to_bytes() {
        let mut config = SortConfig::new(PathBuf::from("/in"), PathBuf::from("/out"));
        config.with_chunk_size_mb(2);
        assert_eq!(config.chunk_size_bytes(), 2 * 1024 * 1024);
    }

    #[test]
    fn test_zero_tasks_falls_back_to_core_count() {
        let config = SortConfig::new(PathBuf::from("/in"), PathBuf::from("/out"));
        assert!(config.effective_tasks() >= 1);
    }
}

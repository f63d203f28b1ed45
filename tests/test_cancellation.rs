use std::sync::Arc;

use large_file_sort::cancellation::CancellationToken;
use large_file_sort::job::JobId;
use large_file_sort::sorter::Sorter;
use large_file_sort::status::{InMemoryStatusStore, JobStatus, StatusStore};

mod common;

#[test]
fn test_cancelled_job_fails_and_cleans_up() {
    let config = common::setup("cancelled");
    let store = Arc::new(InMemoryStatusStore::new());
    let job_id = JobId::new();
    common::write_input(&config, &job_id, &["2. Banana", "1. Apple"]);

    let token = CancellationToken::new();
    token.cancel();

    let mut sorter = Sorter::new(config.clone());
    sorter.with_status_store(store.clone());
    assert!(!sorter.run_with_token(&job_id, &token));

    assert_eq!(store.get_status(&job_id), JobStatus::Failed);
    assert!(!config.output_path(&job_id).exists());
    // the working directory was created before the split observed the
    // cancellation, so cleanup must have removed it
    assert!(!common::work_dir(&config, &job_id).exists());
}

#[test]
fn test_cancelling_a_spawned_job_still_cleans_up() {
    let config = common::setup("cancelled-spawn");
    let store = Arc::new(InMemoryStatusStore::new());
    let job_id = JobId::new();
    common::write_input(&config, &job_id, &["2. Banana", "1. Apple"]);

    let token = CancellationToken::new();
    token.cancel();

    let mut sorter = Sorter::new(config.clone());
    sorter.with_status_store(store.clone());
    let sorter = Arc::new(sorter);
    let handle = sorter.spawn(job_id.clone(), token);

    assert!(!handle.join().unwrap());
    assert_eq!(store.get_status(&job_id), JobStatus::Failed);
    assert!(!common::work_dir(&config, &job_id).exists());
}

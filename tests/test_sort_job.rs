use std::fs;
use std::sync::Arc;

use large_file_sort::cancellation::CancellationToken;
use large_file_sort::generator::Generator;
use large_file_sort::job::JobId;
use large_file_sort::sorter::Sorter;
use large_file_sort::status::{InMemoryStatusStore, JobStatus, StatusStore};

mod common;

#[test]
fn test_sort_job_end_to_end() {
    let config = common::setup("end-to-end");
    let job_id = JobId::new();
    common::write_input(
        &config,
        &job_id,
        &[
            "4. Date",
            "1. Apple",
            "3. Cherry",
            "2. Banana",
            "NotANumber. Cherry",
            "no delimiter here",
        ],
    );

    let sorter = Sorter::new(config.clone());
    assert!(sorter.run(&job_id));

    let output = common::read_lines(&config.output_path(&job_id));
    assert_eq!(
        output,
        vec![
            "1. Apple",
            "2. Banana",
            "NotANumber. Cherry",
            "3. Cherry",
            "4. Date",
            "no delimiter here",
        ]
    );
    assert!(!common::work_dir(&config, &job_id).exists());
}

#[test]
fn test_multiset_and_order_preserved_across_chunks() {
    let mut config = common::setup("multiset");
    config.with_chunk_size_mb(1);
    config.with_tasks(4);

    let job_id = JobId::new();
    let generator = Generator::new(config.input_dir().clone());
    generator.generate(&job_id, 3).unwrap();

    let sorter = Sorter::new(config.clone());
    assert!(sorter.run(&job_id));

    let mut input = common::read_lines(&config.input_path(&job_id));
    let output = common::read_lines(&config.output_path(&job_id));
    assert!(common::is_sorted_by_key(&output));

    let mut output_multiset = output;
    input.sort();
    output_multiset.sort();
    assert_eq!(input, output_multiset);
    assert!(!common::work_dir(&config, &job_id).exists());
}

#[test]
fn test_sorting_sorted_output_is_idempotent() {
    let config = common::setup("idempotent");
    let first_id = JobId::new();
    common::write_input(
        &config,
        &first_id,
        &["9. Pear", "5. Apple", "7. Mango", "5. apple", "6. Lime"],
    );

    let sorter = Sorter::new(config.clone());
    assert!(sorter.run(&first_id));
    let first_output = config.output_path(&first_id);

    let second_id = JobId::new();
    fs::copy(&first_output, config.input_path(&second_id)).unwrap();
    assert!(sorter.run(&second_id));

    assert_eq!(
        common::read_lines(&first_output),
        common::read_lines(&config.output_path(&second_id))
    );
}

#[test]
fn test_empty_input_sorts_to_empty_output() {
    let config = common::setup("empty-input");
    let job_id = JobId::new();
    common::write_input(&config, &job_id, &[]);

    let sorter = Sorter::new(config.clone());
    assert!(sorter.run(&job_id));

    assert!(config.output_path(&job_id).exists());
    assert!(common::read_lines(&config.output_path(&job_id)).is_empty());
    assert!(!common::work_dir(&config, &job_id).exists());
}

#[test]
fn test_missing_input_fails_without_output() {
    let config = common::setup("missing-input");
    let store = Arc::new(InMemoryStatusStore::new());
    let job_id = JobId::new();

    let mut sorter = Sorter::new(config.clone());
    sorter.with_status_store(store.clone());
    assert!(!sorter.run(&job_id));

    assert_eq!(store.get_status(&job_id), JobStatus::Failed);
    assert!(!config.output_path(&job_id).exists());
    assert!(!common::work_dir(&config, &job_id).exists());
}

#[test]
fn test_status_transitions_are_published() {
    let config = common::setup("status");
    let store = Arc::new(InMemoryStatusStore::new());
    let job_id = JobId::new();
    assert_eq!(store.get_status(&job_id), JobStatus::NotFound);

    common::write_input(&config, &job_id, &["2. Banana", "1. Apple"]);
    let mut sorter = Sorter::new(config);
    sorter.with_status_store(store.clone());
    assert!(sorter.run(&job_id));
    assert_eq!(store.get_status(&job_id), JobStatus::Completed);
}

#[test]
fn test_spawned_job_publishes_terminal_status() {
    let config = common::setup("spawn");
    let store = Arc::new(InMemoryStatusStore::new());
    let job_id = JobId::new();
    common::write_input(&config, &job_id, &["2. Banana", "1. Apple"]);

    let mut sorter = Sorter::new(config.clone());
    sorter.with_status_store(store.clone());
    let sorter = Arc::new(sorter);

    let handle = sorter.spawn(job_id.clone(), CancellationToken::new());
    assert!(handle.join().unwrap());
    assert_eq!(store.get_status(&job_id), JobStatus::Completed);
    assert_eq!(
        common::read_lines(&config.output_path(&job_id)),
        vec!["1. Apple", "2. Banana"]
    );
}

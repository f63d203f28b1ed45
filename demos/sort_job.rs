use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Error;
use simple_logger::SimpleLogger;

use large_file_sort::config::SortConfig;
use large_file_sort::generator::Generator;
use large_file_sort::job::JobId;
use large_file_sort::sorter::Sorter;
use large_file_sort::status::{InMemoryStatusStore, StatusStore};

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

// cargo run -r --example sort_job
pub fn main() -> Result<(), Error> {
    SimpleLogger::new().init().unwrap();

    let input_dir = PathBuf::from("./target/demo/generated");
    let output_dir = PathBuf::from("./target/demo/sorted");
    let tmp_dir = PathBuf::from("./target/demo/tmp");

    let job_id = JobId::new();
    let mut generator = Generator::new(input_dir.clone());
    generator.with_piece_size_mb(16);
    let input_path = generator.generate(&job_id, 64)?;
    println!("generated {}", input_path.display());

    let mut config = SortConfig::new(input_dir, output_dir);
    config.with_tmp_dir(tmp_dir);
    config.with_chunk_size_mb(16);

    let status_store = Arc::new(InMemoryStatusStore::new());
    let mut sorter = Sorter::new(config.clone());
    sorter.with_status_store(status_store.clone());

    let success = sorter.run(&job_id);
    println!(
        "job {}: success: {}, status: {}, output: {}",
        job_id,
        success,
        status_store.get_status(&job_id),
        config.output_path(&job_id).display()
    );
    Ok(())
}

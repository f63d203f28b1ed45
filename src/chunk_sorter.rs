use std::fs;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context};
use command_executor::shutdown_mode::ShutdownMode;
use command_executor::thread_pool_builder::ThreadPoolBuilder;

use crate::cancellation::CancellationToken;
use crate::line_record::LineRecord;
use crate::sort_command::SortChunkCommand;

const QUEUE_SIZE: usize = 4096;

/// Sort one chunk file in memory and replace it with its sorted counterpart.
///
/// All lines of the chunk are loaded with their keys, sorted stably, written
/// to `<stem>_sorted.txt` and the unsorted chunk file is deleted. Stability
/// matters: equal-key lines of a chunk keep their input order, which is the
/// only ordering guarantee the merge preserves for duplicates.
pub(crate) fn sort_chunk(
    chunk_path: &Path,
    token: &CancellationToken,
) -> Result<PathBuf, anyhow::Error> {
    let file = File::open(chunk_path)
        .with_context(|| anyhow!("path: {}", chunk_path.display()))?;
    let reader = BufReader::new(file);

    let mut records: Vec<LineRecord> = Vec::new();
    for line in reader.lines() {
        token.check()?;
        records.push(LineRecord::new(line?));
    }
    records.sort();

    let sorted_path = sorted_chunk_path(chunk_path);
    let sorted_file = File::create(&sorted_path)
        .with_context(|| anyhow!("path: {}", sorted_path.display()))?;
    let mut writer = BufWriter::new(sorted_file);
    for record in &records {
        token.check()?;
        writeln!(writer, "{}", record.as_line())?;
    }
    writer.flush()?;

    fs::remove_file(chunk_path)
        .with_context(|| anyhow!("path: {}", chunk_path.display()))?;
    Ok(sorted_path)
}

/// Sort all chunks concurrently, one pool command per chunk.
///
/// The pool is bounded by `tasks` workers; chunk sorts share no mutable state
/// beyond the result and failure collections, so they proceed independently.
/// The returned paths carry no ordering guarantee.
pub(crate) fn sort_chunks(
    chunks: Vec<PathBuf>,
    tasks: usize,
    token: &CancellationToken,
) -> Result<Vec<PathBuf>, anyhow::Error> {
    let chunk_count = chunks.len();
    let sorted: Arc<Mutex<Vec<PathBuf>>> = Arc::new(Mutex::new(Vec::with_capacity(chunk_count)));
    let failures: Arc<Mutex<Vec<anyhow::Error>>> = Arc::new(Mutex::new(Vec::new()));

    log::info!("Start sorting {chunk_count} chunks on {tasks} tasks");
    let mut thread_pool_builder = ThreadPoolBuilder::new();
    let mut sorting_pool = thread_pool_builder
        .with_name("chunk-sorting".to_string())
        .with_tasks(tasks)
        .with_queue_size(QUEUE_SIZE)
        .with_shutdown_mode(ShutdownMode::CompletePending)
        .build()
        .unwrap();

    for chunk_path in chunks {
        let command = Box::new(SortChunkCommand::new(
            chunk_path,
            sorted.clone(),
            failures.clone(),
            token.clone(),
        ));
        sorting_pool.submit(command);
    }

    sorting_pool.shutdown();
    sorting_pool.join()?;

    if let Some(error) = failures.lock().unwrap().pop() {
        return Err(error);
    }
    token.check()?;

    let sorted = std::mem::take(&mut *sorted.lock().unwrap());
    log::info!("Finished sorting {} chunks", sorted.len());
    Ok(sorted)
}

fn sorted_chunk_path(chunk_path: &Path) -> PathBuf {
    let stem = chunk_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("chunk");
    chunk_path.with_file_name(format!("{stem}_sorted.txt"))
}

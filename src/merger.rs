use std::collections::BinaryHeap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};

use crate::cancellation::CancellationToken;
use crate::chunk_cursor::ChunkCursor;

/// Merge sorted chunk files into a single ordered output file.
///
/// One streaming cursor per chunk feeds a heap keyed by the cursors' head
/// records; the loop pops the minimum, writes its line, advances the owning
/// cursor and reinserts it while it has lines left. Within a chunk the
/// relative order of equal keys is preserved; ties drawn from different
/// chunks carry no ordering guarantee. Memory stays bounded at one buffered
/// line per chunk.
pub(crate) fn merge(
    sorted_chunks: Vec<PathBuf>,
    output_path: &Path,
    token: &CancellationToken,
) -> Result<(), anyhow::Error> {
    log::info!(
        "Merging {} sorted chunks into {}",
        sorted_chunks.len(),
        output_path.display()
    );

    let mut cursors = BinaryHeap::with_capacity(sorted_chunks.len());
    for path in &sorted_chunks {
        let cursor = ChunkCursor::new(path)?;
        if cursor.has_next() {
            cursors.push(cursor);
        }
    }

    let output_file = File::create(output_path)
        .with_context(|| anyhow!("path: {}", output_path.display()))?;
    let mut writer = BufWriter::new(output_file);
    let mut merged_len: usize = 0;

    while let Some(mut cursor) = cursors.pop() {
        token.check()?;
        let record = cursor
            .advance()?
            .ok_or_else(|| anyhow!("merge heap held an exhausted cursor"))?;
        writeln!(writer, "{}", record.line())?;
        merged_len += 1;
        if cursor.has_next() {
            cursors.push(cursor);
        }
    }
    writer.flush()?;

    log::info!("Finished merging, merged length: {merged_len} lines");
    Ok(())
}

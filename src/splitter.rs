use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};

use crate::cancellation::CancellationToken;

/// Split the input file into chunk files of roughly `chunk_size_bytes` each.
///
/// The input is read once, in file order. Lines are buffered together with a
/// running byte estimate (UTF-8 length plus one terminator byte per line);
/// when the estimate reaches the target the buffer is flushed to the next
/// `chunk_<index>.txt` under `work_dir`. A trailing buffer becomes a final,
/// possibly undersized, chunk. An empty input produces no chunks.
pub(crate) fn split(
    input_path: &Path,
    work_dir: &Path,
    chunk_size_bytes: u64,
    token: &CancellationToken,
) -> Result<Vec<PathBuf>, anyhow::Error> {
    let file = File::open(input_path)
        .with_context(|| anyhow!("path: {}", input_path.display()))?;
    let reader = BufReader::new(file);

    let mut chunks = Vec::new();
    let mut buffer: Vec<String> = Vec::new();
    let mut buffered_bytes: u64 = 0;
    let mut index = 0;

    for line in reader.lines() {
        token.check()?;
        let line = line.with_context(|| anyhow!("path: {}", input_path.display()))?;
        buffered_bytes += line.len() as u64 + 1;
        buffer.push(line);

        if buffered_bytes >= chunk_size_bytes {
            chunks.push(write_chunk(work_dir, index, &buffer, token)?);
            index += 1;
            buffer.clear();
            buffered_bytes = 0;
        }
    }

    if !buffer.is_empty() {
        chunks.push(write_chunk(work_dir, index, &buffer, token)?);
    }

    log::info!(
        "Split {} into {} chunks of <= {} bytes",
        input_path.display(),
        chunks.len(),
        chunk_size_bytes
    );
    Ok(chunks)
}

fn write_chunk(
    work_dir: &Path,
    index: usize,
    lines: &[String],
    token: &CancellationToken,
) -> Result<PathBuf, anyhow::Error> {
    let path = work_dir.join(format!("chunk_{index}.txt"));
    let file = File::create(&path)
        .with_context(|| anyhow!("path: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        token.check()?;
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(path)
}

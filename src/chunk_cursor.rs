use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};

use crate::line_record::LineRecord;

/// Streaming read position into one sorted chunk during the merge.
///
/// Holds at most one buffered record (the head), which bounds merge memory
/// at one line per chunk regardless of file sizes. The ordering is reversed
/// so that a max-heap of cursors pops the smallest head first.
#[derive(Debug)]
pub(crate) struct ChunkCursor {
    path: PathBuf,
    reader: BufReader<File>,
    head: Option<LineRecord>,
}

impl ChunkCursor {
    pub(crate) fn new(path: &Path) -> Result<ChunkCursor, anyhow::Error> {
        let file = File::open(path)
            .with_context(|| anyhow!("path: {}", path.display()))?;
        let mut cursor = ChunkCursor {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            head: None,
        };
        cursor.head = cursor.read_record()?;
        Ok(cursor)
    }

    pub(crate) fn has_next(&self) -> bool {
        self.head.is_some()
    }

    /// Return the current head and buffer the following line in its place.
    pub(crate) fn advance(&mut self) -> Result<Option<LineRecord>, anyhow::Error> {
        let next = self.read_record()?;
        Ok(std::mem::replace(&mut self.head, next))
    }

    fn read_record(&mut self) -> Result<Option<LineRecord>, anyhow::Error> {
        let mut line = String::new();
        let bytes = self
            .reader
            .read_line(&mut line)
            .with_context(|| anyhow!("path: {}", self.path.display()))?;
        if bytes == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(LineRecord::new(line)))
    }
}

impl Eq for ChunkCursor {}

impl PartialEq<Self> for ChunkCursor {
    fn eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (None, None) => true,
            (Some(_), None) | (None, Some(_)) => false,
            (Some(left), Some(right)) => left.eq(right),
        }
    }
}

impl PartialOrd<Self> for ChunkCursor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChunkCursor {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.head, &other.head) {
            (None, None) => Ordering::Equal,
            // exhausted cursors sort above live ones so they pop first
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(left), Some(right)) => right.cmp(left),
        }
    }
}

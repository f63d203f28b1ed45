use std::cmp::Ordering;

use crate::sort_key::SortKey;

/// A line paired with its precomputed sort key. The key is extracted once
/// when the record is created and reused for every comparison.
#[derive(Debug)]
pub(crate) struct LineRecord {
    line: String,
    key: SortKey,
}

impl LineRecord {
    pub(crate) fn new(line: String) -> LineRecord {
        let key = SortKey::from_line(&line);
        LineRecord { line, key }
    }

    pub(crate) fn line(self) -> String {
        self.line
    }

    pub(crate) fn as_line(&self) -> &str {
        &self.line
    }
}

impl Eq for LineRecord {}

impl PartialEq<Self> for LineRecord {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl PartialOrd<Self> for LineRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LineRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

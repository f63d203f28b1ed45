use std::cmp::Ordering;

/// Composite sort key of a line: the text after the first `.` delimiter and
/// the integer prefix before it.
///
/// Keys order text-first, comparing the text case-insensitively, and break
/// ties on the number. Extraction never fails: a missing delimiter keys the
/// whole trimmed line, a prefix that does not parse as an integer becomes 0.
#[derive(Debug, Clone)]
pub struct SortKey {
    text: String,
    number: i64,
}

impl SortKey {
    pub fn from_line(line: &str) -> SortKey {
        match line.find('.') {
            Some(index) => SortKey {
                text: line[index + 1..].trim().to_string(),
                number: line[..index].trim().parse::<i64>().unwrap_or(0),
            },
            None => SortKey {
                text: line.trim().to_string(),
                number: 0,
            },
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn number(&self) -> i64 {
        self.number
    }
}

// Compares without allocating; keys are compared once per heap operation
// during the merge so a lowercased copy per comparison would dominate.
fn cmp_ignore_case(left: &str, right: &str) -> Ordering {
    let mut left_chars = left.chars().flat_map(char::to_lowercase);
    let mut right_chars = right.chars().flat_map(char::to_lowercase);
    loop {
        match (left_chars.next(), right_chars.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => match l.cmp(&r) {
                Ordering::Equal => continue,
                ordering => return ordering,
            },
        }
    }
}

impl Eq for SortKey {}

impl PartialEq<Self> for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd<Self> for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match cmp_ignore_case(&self.text, &other.text) {
            Ordering::Equal => self.number.cmp(&other.number),
            ordering => ordering,
        }
    }
}

//! Line classification and tokenization for atop parseable output.
//!
//! atop interleaves many record types (`CPU`, `cpu`, `MEM`, `SWP`, `DSK`,
//! `RESET`, `SEP`, ...) in one stream. Only `CPU` and `MEM` are understood
//! here; every other line is dropped without being treated as an error.

use serde::Serialize;
use std::fmt;
use tracing::trace;

/// Record types understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    Cpu,
    Mem,
}

impl RecordKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            RecordKind::Cpu => "CPU",
            RecordKind::Mem => "MEM",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A classified line with its leading keyword removed.
///
/// `CPU` records keep the hostname as their first token. `MEM` records also
/// drop the hostname, so position 0 is the epoch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub kind: RecordKind,
    pub tokens: Vec<String>,
}

impl TokenRecord {
    pub fn new(kind: RecordKind, tokens: Vec<String>) -> Self {
        Self { kind, tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`, if the line is long enough.
    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// Token at `index` parsed as a signed integer.
    pub fn int(&self, index: usize) -> Option<i64> {
        self.token(index)?.parse().ok()
    }
}

/// Classifies one raw line.
///
/// Returns `None` for blank lines and for record types other than `CPU`
/// and `MEM`.
pub fn classify_line(line: &str) -> Option<TokenRecord> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("CPU") => Some(TokenRecord::new(
            RecordKind::Cpu,
            parts.map(str::to_string).collect(),
        )),
        // "MEM" alone on a line carries no payload and is not a MEM record
        Some("MEM") if line.starts_with("MEM ") => {
            // skip hostname
            parts.next();
            Some(TokenRecord::new(
                RecordKind::Mem,
                parts.map(str::to_string).collect(),
            ))
        }
        _ => None,
    }
}

/// All understood records of one input, grouped by kind in input order.
#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    pub cpu: Vec<TokenRecord>,
    pub mem: Vec<TokenRecord>,
    /// Blank lines seen.
    pub blank_lines: usize,
    /// Non-blank lines with an unknown record type.
    pub ignored_lines: usize,
}

impl RecordBatch {
    pub fn records(&self, kind: RecordKind) -> &[TokenRecord] {
        match kind {
            RecordKind::Cpu => &self.cpu,
            RecordKind::Mem => &self.mem,
        }
    }

    pub fn total_lines(&self) -> usize {
        self.cpu.len() + self.mem.len() + self.blank_lines + self.ignored_lines
    }
}

/// Classifies every line of an input.
pub fn split_records<I, S>(lines: I) -> RecordBatch
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut batch = RecordBatch::default();

    for line in lines {
        let line = line.as_ref();
        match classify_line(line) {
            Some(record) => match record.kind {
                RecordKind::Cpu => batch.cpu.push(record),
                RecordKind::Mem => batch.mem.push(record),
            },
            None if line.trim().is_empty() => batch.blank_lines += 1,
            None => {
                trace!("Ignoring line: {}", line);
                batch.ignored_lines += 1;
            }
        }
    }

    batch
}

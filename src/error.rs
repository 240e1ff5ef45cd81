//! Conditions reported to callers instead of a computed result.

use crate::record::RecordKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyzeError {
    #[error("No {0} lines found in input")]
    NoRecords(RecordKind),

    #[error("No valid {kind} records parsed ({skipped} lines skipped)")]
    NoValidRecords { kind: RecordKind, skipped: usize },
}

impl AnalyzeError {
    pub fn kind(&self) -> RecordKind {
        match *self {
            AnalyzeError::NoRecords(kind) => kind,
            AnalyzeError::NoValidRecords { kind, .. } => kind,
        }
    }
}

//! `MEM` record decoding against a resolved [`MemSchema`].

use serde::Serialize;
use tracing::trace;

use crate::record::TokenRecord;
use crate::schema::{Availability, MemSchema};

/// Timestamp used when a line lacks date and time tokens.
pub const UNKNOWN_TIMESTAMP: &str = "UNKNOWN";

/// One decoded `MEM` record, in kilobytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemSample {
    pub timestamp: String,
    pub total_kb: i64,
    pub avail_kb: i64,
    pub used_kb: i64,
    pub used_pct: f64,
    /// Explicit availability column used for this line, if any.
    pub avail_column: Option<usize>,
}

impl MemSample {
    /// `None` when a kilobyte value does not fit in an `i64`.
    fn from_pages(
        timestamp: String,
        page_size_bytes: i64,
        total_pages: i64,
        avail_pages: i64,
        avail_column: Option<usize>,
    ) -> Option<Self> {
        let page_kb = page_size_bytes.div_euclid(1024);
        let total_kb = total_pages.checked_mul(page_kb)?;
        let avail_kb = avail_pages.checked_mul(page_kb)?;
        let used_kb = total_kb.checked_sub(avail_kb)?;
        let used_pct = if total_kb > 0 {
            used_kb as f64 / total_kb as f64 * 100.0
        } else {
            0.0
        };

        Some(Self {
            timestamp,
            total_kb,
            avail_kb,
            used_kb,
            used_pct,
            avail_column,
        })
    }
}

fn timestamp(record: &TokenRecord) -> String {
    match (record.token(1), record.token(2)) {
        (Some(date), Some(time)) => format!("{} {}", date, time),
        _ => UNKNOWN_TIMESTAMP.to_string(),
    }
}

/// Decodes a `MEM` record.
///
/// The explicit availability column is used when the schema has one and
/// the line reaches it; otherwise available pages are free + cache +
/// buffer. Lines too short for either, or whose values overflow when
/// converted to kilobytes, are skipped.
pub fn decode_mem(record: &TokenRecord, schema: &MemSchema) -> Option<MemSample> {
    let page_size_bytes = record.int(schema.page_size_index())?;
    let total_pages = record.int(schema.total_pages_index())?;

    let explicit = match schema.availability {
        Availability::Explicit { column } if record.len() > column => Some(column),
        _ => None,
    };

    let avail_pages = match explicit {
        Some(column) => record.int(column)?,
        None => {
            let (free, cache, buffer) = schema.derived_columns();
            if record.len() <= buffer {
                trace!(
                    "MEM line has {} tokens, need {} for free+cache+buffer",
                    record.len(),
                    buffer + 1
                );
                return None;
            }
            record
                .int(free)?
                .checked_add(record.int(cache)?)?
                .checked_add(record.int(buffer)?)?
        }
    };

    let sample = MemSample::from_pages(
        timestamp(record),
        page_size_bytes,
        total_pages,
        avail_pages,
        explicit,
    );
    if sample.is_none() {
        trace!("MEM line values overflow when converted to kB");
    }
    sample
}

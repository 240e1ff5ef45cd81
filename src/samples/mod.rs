//! Record decoders for `CPU` and `MEM` lines.
//!
//! This module provides:
//! - `cpu`: `CPU` line decoding into [`CpuSample`]
//! - `memory`: `MEM` line decoding into [`MemSample`] against a [`MemSchema`]
//!
//! Malformed lines are skipped, never fatal. The batch decoders report how
//! many lines were skipped through [`DecodeStats`].

pub mod cpu;
pub mod memory;

pub use cpu::{decode_cpu, CpuCounter, CpuSample, CPU_FIXED_FIELDS};
pub use memory::{decode_mem, MemSample, UNKNOWN_TIMESTAMP};

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::record::TokenRecord;
use crate::schema::MemSchema;

/// Per-batch decode counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecodeStats {
    pub decoded: usize,
    pub skipped: usize,
}

impl DecodeStats {
    pub fn total(&self) -> usize {
        self.decoded + self.skipped
    }
}

/// Decodes every record in parallel, keeping input order.
fn decode_all<T, F>(records: &[TokenRecord], decode: F) -> (Vec<T>, DecodeStats)
where
    T: Send,
    F: Fn(&TokenRecord) -> Option<T> + Sync + Send,
{
    let decoded: Vec<Option<T>> = records.par_iter().map(decode).collect();

    let mut stats = DecodeStats::default();
    let mut samples = Vec::with_capacity(decoded.len());
    for sample in decoded {
        match sample {
            Some(s) => {
                stats.decoded += 1;
                samples.push(s);
            }
            None => stats.skipped += 1,
        }
    }

    (samples, stats)
}

/// Decodes a batch of `CPU` records.
pub fn decode_cpu_batch(records: &[TokenRecord]) -> (Vec<CpuSample>, DecodeStats) {
    let (samples, stats) = decode_all(records, decode_cpu);
    debug!(
        "Decoded {} CPU records, skipped {}",
        stats.decoded, stats.skipped
    );
    (samples, stats)
}

/// Decodes a batch of `MEM` records with one schema for all of them.
pub fn decode_mem_batch(
    records: &[TokenRecord],
    schema: &MemSchema,
) -> (Vec<MemSample>, DecodeStats) {
    let (samples, stats) = decode_all(records, |record| decode_mem(record, schema));
    debug!(
        "Decoded {} MEM records, skipped {}",
        stats.decoded, stats.skipped
    );
    (samples, stats)
}

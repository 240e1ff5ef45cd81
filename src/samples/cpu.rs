//! `CPU` record decoding.
//!
//! Payload layout after the keyword:
//! `hostname epoch date time interval load ncpu counter...`

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

use crate::record::TokenRecord;

/// Positional tokens required before the counter tail.
pub const CPU_FIXED_FIELDS: usize = 7;

/// Named CPU counters, in the order atop emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CpuCounter {
    Usr,
    Sys,
    Nice,
    Idle,
    Iowait,
    Irq,
    Softirq,
    Steal,
    Guest,
    GuestNice,
}

impl CpuCounter {
    pub const ALL: [CpuCounter; 10] = [
        CpuCounter::Usr,
        CpuCounter::Sys,
        CpuCounter::Nice,
        CpuCounter::Idle,
        CpuCounter::Iowait,
        CpuCounter::Irq,
        CpuCounter::Softirq,
        CpuCounter::Steal,
        CpuCounter::Guest,
        CpuCounter::GuestNice,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CpuCounter::Usr => "usr",
            CpuCounter::Sys => "sys",
            CpuCounter::Nice => "nice",
            CpuCounter::Idle => "idle",
            CpuCounter::Iowait => "iowait",
            CpuCounter::Irq => "irq",
            CpuCounter::Softirq => "softirq",
            CpuCounter::Steal => "steal",
            CpuCounter::Guest => "guest",
            CpuCounter::GuestNice => "guest_nice",
        }
    }
}

impl fmt::Display for CpuCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One decoded `CPU` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CpuSample {
    pub hostname: String,
    pub epoch: i64,
    pub datetime: String,
    pub interval: i64,
    pub load: i64,
    pub ncpu: i64,
    /// Only the counters present on the line.
    pub counters: BTreeMap<CpuCounter, i64>,
    /// Counters beyond the named vocabulary, in line order.
    pub extra: Vec<i64>,
}

impl CpuSample {
    pub fn counter(&self, counter: CpuCounter) -> Option<i64> {
        self.counters.get(&counter).copied()
    }

    /// Sum of the named counters; `extra` is not part of the total.
    ///
    /// Widened to `i128` so counters near `i64::MAX` cannot overflow.
    pub fn total(&self) -> i128 {
        self.counters.values().map(|&v| i128::from(v)).sum()
    }

    /// idle + iowait.
    pub fn rest_total(&self) -> i128 {
        [CpuCounter::Idle, CpuCounter::Iowait]
            .iter()
            .filter_map(|&c| self.counter(c))
            .map(i128::from)
            .sum()
    }
}

/// Decodes a `CPU` record.
///
/// A line that is too short or holds a non-integer where an integer is
/// expected yields `None`; no partial sample is produced.
pub fn decode_cpu(record: &TokenRecord) -> Option<CpuSample> {
    if record.len() < CPU_FIXED_FIELDS {
        trace!("CPU line too short ({} tokens)", record.len());
        return None;
    }

    let hostname = record.token(0)?.to_string();
    let epoch = record.int(1)?;
    let datetime = format!("{} {}", record.token(2)?, record.token(3)?);
    let interval = record.int(4)?;
    let load = record.int(5)?;
    let ncpu = record.int(6)?;

    let values = record.tokens[CPU_FIXED_FIELDS..]
        .iter()
        .map(|t| t.parse::<i64>().ok())
        .collect::<Option<Vec<i64>>>()?;

    let named = values.len().min(CpuCounter::ALL.len());
    let counters = CpuCounter::ALL
        .iter()
        .copied()
        .zip(values[..named].iter().copied())
        .collect();
    let extra = values[named..].to_vec();

    Some(CpuSample {
        hostname,
        epoch,
        datetime,
        interval,
        load,
        ncpu,
        counters,
        extra,
    })
}

//! CPU utilization from decoded counters.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::samples::{CpuCounter, CpuSample};

/// Share of each named counter plus overall busy time, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuUtilization {
    pub percentages: BTreeMap<CpuCounter, f64>,
    /// Everything except idle and iowait.
    pub total_util: f64,
}

impl CpuUtilization {
    /// Percentage for a counter; 0 when the line did not carry it.
    pub fn pct(&self, counter: CpuCounter) -> f64 {
        self.percentages.get(&counter).copied().unwrap_or(0.0)
    }
}

/// Computes per-counter percentages and `total_util` for one sample.
///
/// The denominator is the sum of the named counters only. When it is not
/// positive every percentage, `total_util` included, is 0.
pub fn compute_cpu_utilization(sample: &CpuSample) -> CpuUtilization {
    let total = sample.total();

    if total <= 0 {
        return CpuUtilization {
            percentages: sample.counters.keys().map(|&c| (c, 0.0)).collect(),
            total_util: 0.0,
        };
    }

    let total_f = total as f64;
    let percentages = sample
        .counters
        .iter()
        .map(|(&counter, &value)| (counter, value as f64 / total_f * 100.0))
        .collect();
    let busy = total - sample.rest_total();

    CpuUtilization {
        percentages,
        total_util: 100.0 * busy as f64 / total_f,
    }
}

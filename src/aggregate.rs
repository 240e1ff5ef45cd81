//! Running averages over decoded samples.
//!
//! CPU samples cover equal intervals, so their busy percentages are
//! averaged directly. Memory totals may change between samples, so the
//! memory average is mean(used) / mean(total) rather than a mean of
//! percentages.

use serde::Serialize;

use crate::samples::MemSample;
use crate::utilization::CpuUtilization;

/// Final average handed to reporters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AverageSummary {
    pub average_pct: f64,
    pub sample_count: u64,
    /// Mean used kilobytes; only set for memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_used_kb: Option<f64>,
}

/// Running sum and count of one metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningStat {
    count: u64,
    sum: f64,
}

impl RunningStat {
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of all values, `None` before the first value.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Mean CPU busy percentage.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuAverage {
    total_util: RunningStat,
}

impl CpuAverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, util: &CpuUtilization) {
        self.total_util.add(util.total_util);
    }

    pub fn count(&self) -> u64 {
        self.total_util.count()
    }

    /// `None` when no sample was folded in.
    pub fn summary(&self) -> Option<AverageSummary> {
        Some(AverageSummary {
            average_pct: self.total_util.mean()?,
            sample_count: self.count(),
            average_used_kb: None,
        })
    }
}

/// Memory average built from averaged totals.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemAverage {
    used_kb: RunningStat,
    total_kb: RunningStat,
}

impl MemAverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sample: &MemSample) {
        self.used_kb.add(sample.used_kb as f64);
        self.total_kb.add(sample.total_kb as f64);
    }

    pub fn count(&self) -> u64 {
        self.used_kb.count()
    }

    /// `None` when no sample was folded in.
    pub fn summary(&self) -> Option<AverageSummary> {
        let used = self.used_kb.mean()?;
        let total = self.total_kb.mean()?;
        let average_pct = if total > 0.0 {
            used / total * 100.0
        } else {
            0.0
        };

        Some(AverageSummary {
            average_pct,
            sample_count: self.count(),
            average_used_kb: Some(used),
        })
    }
}

impl<'a> Extend<&'a CpuUtilization> for CpuAverage {
    fn extend<I: IntoIterator<Item = &'a CpuUtilization>>(&mut self, iter: I) {
        for util in iter {
            self.add(util);
        }
    }
}

impl<'a> Extend<&'a MemSample> for MemAverage {
    fn extend<I: IntoIterator<Item = &'a MemSample>>(&mut self, iter: I) {
        for sample in iter {
            self.add(sample);
        }
    }
}

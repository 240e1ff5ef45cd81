//! Text rendering of analysis results.

use crate::aggregate::AverageSummary;
use crate::analyze::CpuEntry;
use crate::error::AnalyzeError;
use crate::record::RecordKind;
use crate::samples::{CpuCounter, MemSample};

/// Formats an integer with `,` thousands separators.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One line per CPU sample.
pub fn cpu_line(entry: &CpuEntry) -> String {
    let util = &entry.utilization;
    format!(
        "{} | Host: {} | CPU Utilization: {:.2}% (usr={:.2}%, sys={:.2}%, iowait={:.2}%, idle={:.2}%)",
        entry.sample.datetime,
        entry.sample.hostname,
        util.total_util,
        util.pct(CpuCounter::Usr),
        util.pct(CpuCounter::Sys),
        util.pct(CpuCounter::Iowait),
        util.pct(CpuCounter::Idle),
    )
}

pub fn cpu_average_line(summary: &AverageSummary) -> String {
    format!(
        "Average CPU Utilization: {:.2}% over {} samples",
        summary.average_pct, summary.sample_count
    )
}

/// One line per MEM sample.
pub fn mem_line(sample: &MemSample) -> String {
    format!(
        "{} | Used: {} kB ({:.2}%) | Total: {} kB | Available={} kB",
        sample.timestamp,
        group_thousands(sample.used_kb),
        sample.used_pct,
        group_thousands(sample.total_kb),
        group_thousands(sample.avail_kb),
    )
}

/// The mean used kilobytes are rounded half to even.
pub fn mem_average_line(summary: &AverageSummary) -> String {
    let used = summary.average_used_kb.unwrap_or(0.0).round_ties_even() as i64;
    format!(
        "Average Memory Utilization: {:.2}% ({} kB avg used) over {} samples",
        summary.average_pct,
        group_thousands(used),
        summary.sample_count
    )
}

/// Message printed instead of a report when there is nothing to average.
pub fn no_data_message(err: &AnalyzeError) -> &'static str {
    match err {
        AnalyzeError::NoRecords(RecordKind::Cpu)
        | AnalyzeError::NoValidRecords {
            kind: RecordKind::Cpu,
            ..
        } => "No CPU samples found in input.",
        AnalyzeError::NoRecords(RecordKind::Mem) => "No MEM lines found.",
        AnalyzeError::NoValidRecords {
            kind: RecordKind::Mem,
            ..
        } => "No valid records parsed.",
    }
}

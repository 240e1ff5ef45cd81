//! End-to-end pipeline: records → schema → samples → utilization → average.

use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::{AverageSummary, CpuAverage, MemAverage};
use crate::error::AnalyzeError;
use crate::record::{RecordKind, TokenRecord};
use crate::samples::{decode_cpu_batch, decode_mem_batch, CpuSample, DecodeStats, MemSample};
use crate::schema::{infer_mem_schema, MemSchema, SchemaRules};
use crate::utilization::{compute_cpu_utilization, CpuUtilization};

/// A decoded `CPU` sample with its utilization.
#[derive(Debug, Clone, Serialize)]
pub struct CpuEntry {
    pub sample: CpuSample,
    pub utilization: CpuUtilization,
}

#[derive(Debug, Clone, Serialize)]
pub struct CpuAnalysis {
    pub entries: Vec<CpuEntry>,
    pub stats: DecodeStats,
    pub summary: AverageSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemAnalysis {
    pub schema: MemSchema,
    pub samples: Vec<MemSample>,
    pub stats: DecodeStats,
    pub summary: AverageSummary,
}

fn no_valid(kind: RecordKind, stats: DecodeStats) -> AnalyzeError {
    AnalyzeError::NoValidRecords {
        kind,
        skipped: stats.skipped,
    }
}

/// Decodes and evaluates a batch of `CPU` records.
pub fn analyze_cpu(records: &[TokenRecord]) -> Result<CpuAnalysis, AnalyzeError> {
    if records.is_empty() {
        return Err(AnalyzeError::NoRecords(RecordKind::Cpu));
    }

    let (samples, stats) = decode_cpu_batch(records);

    let mut average = CpuAverage::new();
    let entries: Vec<CpuEntry> = samples
        .into_iter()
        .map(|sample| {
            let utilization = compute_cpu_utilization(&sample);
            average.add(&utilization);
            CpuEntry {
                sample,
                utilization,
            }
        })
        .collect();

    let summary = average
        .summary()
        .ok_or_else(|| no_valid(RecordKind::Cpu, stats))?;

    info!(
        "CPU: {} samples, {} skipped, average {:.2}%",
        summary.sample_count, stats.skipped, summary.average_pct
    );

    Ok(CpuAnalysis {
        entries,
        stats,
        summary,
    })
}

/// Infers the schema of a `MEM` batch, then decodes and averages it.
pub fn analyze_mem(
    records: &[TokenRecord],
    rules: &SchemaRules,
) -> Result<MemAnalysis, AnalyzeError> {
    if records.is_empty() {
        return Err(AnalyzeError::NoRecords(RecordKind::Mem));
    }

    let schema = infer_mem_schema(records, rules);
    analyze_mem_with_schema(records, schema)
}

/// Decodes and averages a `MEM` batch with an already inferred schema.
pub fn analyze_mem_with_schema(
    records: &[TokenRecord],
    schema: MemSchema,
) -> Result<MemAnalysis, AnalyzeError> {
    if records.is_empty() {
        return Err(AnalyzeError::NoRecords(RecordKind::Mem));
    }
    debug!("MEM schema: {:?}", schema);

    let (samples, stats) = decode_mem_batch(records, &schema);

    let mut average = MemAverage::new();
    average.extend(&samples);
    let summary = average
        .summary()
        .ok_or_else(|| no_valid(RecordKind::Mem, stats))?;

    info!(
        "MEM: {} samples, {} skipped, average {:.2}%",
        summary.sample_count, stats.skipped, summary.average_pct
    );

    Ok(MemAnalysis {
        schema,
        samples,
        stats,
        summary,
    })
}

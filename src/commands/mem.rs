//! MEM command implementation.
//!
//! Detects the MEM column layout, then prints per-sample memory utilization
//! followed by the average.

use anyhow::Result;
use atop_utilization::report::{mem_average_line, mem_line, no_data_message};
use atop_utilization::{
    analyze_mem_with_schema, infer_mem_schema, AnalyzeError, RecordBatch, RecordKind, SchemaRules,
};
use serde_json::json;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

use crate::cli::OutputFormat;
use crate::commands::load_batch;
use crate::config::Config;

/// Reports memory utilization for an input file or stdin.
pub fn command_mem(file: &Path, average: bool, debug: bool, config: &Config) -> Result<()> {
    let batch = load_batch(file)?;
    let debug = debug || config.debug.unwrap_or(false);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_mem_report(
        &mut out,
        &batch,
        &config.schema,
        average,
        debug,
        config.output_format(),
    )
}

/// Writes the MEM report for a classified input.
pub fn write_mem_report<W: Write>(
    out: &mut W,
    batch: &RecordBatch,
    rules: &SchemaRules,
    average: bool,
    debug: bool,
    format: OutputFormat,
) -> Result<()> {
    let result = if batch.mem.is_empty() {
        Err(AnalyzeError::NoRecords(RecordKind::Mem))
    } else {
        let schema = infer_mem_schema(&batch.mem, rules);
        info!("{}", schema);
        if debug && format == OutputFormat::Text {
            writeln!(out, "{}", schema)?;
        }
        analyze_mem_with_schema(&batch.mem, schema)
    };

    let analysis = match result {
        Ok(analysis) => analysis,
        Err(e) => {
            match format {
                OutputFormat::Text => writeln!(out, "{}", no_data_message(&e))?,
                OutputFormat::Json => writeln!(
                    out,
                    "{}",
                    json!({ "record": e.kind(), "error": e.to_string() })
                )?,
            }
            return Ok(());
        }
    };

    match format {
        OutputFormat::Text => {
            if !average {
                for sample in &analysis.samples {
                    writeln!(out, "{}", mem_line(sample))?;
                }
            }
            writeln!(out)?;
            writeln!(out, "{}", mem_average_line(&analysis.summary))?;
        }
        OutputFormat::Json => {
            let value = if average {
                json!({
                    "schema": analysis.schema,
                    "summary": analysis.summary,
                    "stats": analysis.stats,
                })
            } else {
                serde_json::to_value(&analysis)?
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        }
    }

    Ok(())
}

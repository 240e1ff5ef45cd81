//! CPU command implementation.
//!
//! Prints per-sample CPU utilization or the average over all samples.

use anyhow::Result;
use atop_utilization::report::{cpu_average_line, cpu_line, no_data_message};
use atop_utilization::{analyze_cpu, RecordBatch};
use serde_json::json;
use std::io::{self, Write};
use std::path::Path;

use crate::cli::OutputFormat;
use crate::commands::load_batch;
use crate::config::Config;

/// Reports CPU utilization for an input file or stdin.
pub fn command_cpu(file: &Path, average: bool, config: &Config) -> Result<()> {
    let batch = load_batch(file)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_cpu_report(&mut out, &batch, average, config.output_format())
}

/// Writes the CPU report for a classified input.
pub fn write_cpu_report<W: Write>(
    out: &mut W,
    batch: &RecordBatch,
    average: bool,
    format: OutputFormat,
) -> Result<()> {
    let analysis = match analyze_cpu(&batch.cpu) {
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
            if average {
                writeln!(out, "{}", cpu_average_line(&analysis.summary))?;
            } else {
                for entry in &analysis.entries {
                    writeln!(out, "{}", cpu_line(entry))?;
                }
            }
        }
        OutputFormat::Json => {
            let value = if average {
                json!({ "summary": analysis.summary, "stats": analysis.stats })
            } else {
                serde_json::to_value(&analysis)?
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        }
    }

    Ok(())
}

//! Schema command implementation.
//!
//! Shows the MEM column layout detected for an input without decoding it.

use anyhow::Result;
use atop_utilization::{infer_mem_schema, Availability, PageSizeColumn, RecordBatch, SchemaRules};
use serde_json::json;
use std::io::{self, Write};
use std::path::Path;

use crate::cli::OutputFormat;
use crate::commands::load_batch;
use crate::config::Config;

/// Prints the detected MEM layout for an input file or stdin.
pub fn command_schema(file: &Path, config: &Config) -> Result<()> {
    let batch = load_batch(file)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_schema_report(&mut out, &batch, &config.schema, config.output_format())
}

pub fn write_schema_report<W: Write>(
    out: &mut W,
    batch: &RecordBatch,
    rules: &SchemaRules,
    format: OutputFormat,
) -> Result<()> {
    if batch.mem.is_empty() {
        match format {
            OutputFormat::Text => writeln!(out, "No MEM lines found.")?,
            OutputFormat::Json => writeln!(out, "{}", json!({ "mem_records": 0 }))?,
        }
        return Ok(());
    }

    let schema = infer_mem_schema(&batch.mem, rules);

    if format == OutputFormat::Json {
        let value = json!({
            "mem_records": batch.mem.len(),
            "cpu_records": batch.cpu.len(),
            "ignored_lines": batch.ignored_lines,
            "schema": schema,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    writeln!(out, "📐 MEM column layout")?;
    writeln!(out, "====================")?;
    writeln!(
        out,
        "   Records:      {} MEM, {} CPU, {} ignored lines",
        batch.mem.len(),
        batch.cpu.len(),
        batch.ignored_lines
    )?;
    writeln!(out, "   First record: {} columns", schema.observed_columns)?;

    match schema.page_size {
        PageSizeColumn::Resolved(index) => {
            writeln!(out, "   Page size:    column {} (detected)", index)?
        }
        PageSizeColumn::Fallback(index) => writeln!(
            out,
            "   Page size:    column {} (fallback, no column holds {:?} in every record)",
            index, rules.page_sizes
        )?,
    }
    writeln!(out, "   Total pages:  column {}", schema.total_pages_index())?;

    match schema.availability {
        Availability::Explicit { column } => {
            writeln!(out, "   Available:    column {} (explicit)", column)?
        }
        Availability::Derived {
            free,
            cache,
            buffer,
        } => writeln!(
            out,
            "   Available:    free+cache+buffer, columns {}+{}+{} (derived)",
            free, cache, buffer
        )?,
    }

    Ok(())
}

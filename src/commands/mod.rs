//! CLI command implementations for atop-utilization.
//!
//! This module provides implementations for all CLI subcommands:
//! - `cpu`: CPU utilization report
//! - `mem`: memory utilization report
//! - `schema`: detected MEM column layout
//! - `config`: Configuration file generation
//! - `generate`: Synthetic atop output generation

pub mod config;
pub mod cpu;
pub mod generate;
pub mod mem;
pub mod schema;

// Re-export command functions
pub use config::command_config;
pub use cpu::command_cpu;
pub use generate::command_generate_testdata;
pub use mem::command_mem;
pub use schema::command_schema;

use anyhow::{Context, Result};
use atop_utilization::{split_records, RecordBatch};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Reads a file, or standard input for `-`, dropping undecodable bytes.
pub fn read_input(path: &Path) -> Result<String> {
    let bytes = if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buf)
            .context("Failed to read standard input")?;
        buf
    } else {
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
    };

    Ok(decode_lossy(&bytes))
}

/// UTF-8 decoding that drops invalid sequences instead of replacing them.
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).replace(char::REPLACEMENT_CHARACTER, "")
}

/// Reads and classifies an input.
pub fn load_batch(path: &Path) -> Result<RecordBatch> {
    let content = read_input(path)?;
    let batch = split_records(content.lines());
    debug!(
        "Read {} lines from {}: {} CPU, {} MEM, {} ignored, {} blank",
        batch.total_lines(),
        path.display(),
        batch.cpu.len(),
        batch.mem.len(),
        batch.ignored_lines,
        batch.blank_lines
    );
    Ok(batch)
}

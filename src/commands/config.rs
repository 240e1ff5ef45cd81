//! Config command implementation.
//!
//! Generates configuration files in various formats.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(output: Option<PathBuf>, format: ConfigFormat, commented: bool) -> Result<()> {
    let config = Config::default();
    let output = output.unwrap_or_else(|| PathBuf::from("atop-utilization.yaml"));

    let mut content = render_config(&config, format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# atop-utilization Configuration
# ===============================
#
# Logging
# -------
# log_level: "warn"            # off, error, warn, info, debug, trace
#
# Decoding
# --------
# parallelism: null            # Decoding threads (null/0 = auto)
#
# Reporting
# ---------
# output_format: "text"        # text or json
# debug: false                 # Always print the detected MEM layout
#
# MEM Column Detection
# --------------------
# schema:
#   page_sizes: [4096, 8192]        # Values accepted as a page size (bytes)
#   scan_limit: 10                  # Leading columns searched for the page size
#   fallback_page_size_index: 4     # Page size column when none qualifies
#   availability_threshold: 28      # Longer first records carry an explicit
#   availability_column: 28         # available-memory column at this index
"#;

    format!("{comments}\n{yaml}")
}

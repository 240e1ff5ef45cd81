//! CLI arguments and subcommands for atop-utilization.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parses a level name from a config file.
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "atop-utilization",
    about = "CPU and memory utilization from atop parseable output",
    long_about = "CPU and memory utilization from atop parseable output.\n\n\
                  Reads `atop -P CPU` / `atop -P MEM` output from a file or standard input \
                  and reports per-sample and average utilization. The MEM column layout is \
                  detected from the data, so output of older and newer atop releases can be \
                  mixed across runs.",
    version = "0.1.0",
    propagate_version = true,
    after_help = "Examples:\n  \
                  atop -r /var/log/atop/atop_20231114 -P CPU | atop-utilization cpu -\n  \
                  atop-utilization mem atop_mem.txt --average"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level (default: warn)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Report format for cpu/mem/schema output (default: text)
    #[arg(long, value_enum, global = true)]
    pub report_format: Option<OutputFormat>,

    /// Parallel decoding threads (0 = auto)
    #[arg(long, global = true)]
    pub parallelism: Option<usize>,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report CPU utilization from CPU records
    Cpu {
        /// Input file, or "-" for standard input
        #[arg(default_value = "-")]
        file: PathBuf,

        /// Print only the average over all samples
        #[arg(long)]
        average: bool,
    },

    /// Report memory utilization from MEM records
    Mem {
        /// Input file, or "-" for standard input
        #[arg(default_value = "-")]
        file: PathBuf,

        /// Print only the average over all samples
        #[arg(long)]
        average: bool,

        /// Print the detected column layout before the report
        #[arg(long)]
        debug: bool,
    },

    /// Show the MEM column layout detected for an input
    Schema {
        /// Input file, or "-" for standard input
        #[arg(default_value = "-")]
        file: PathBuf,
    },

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// Generate synthetic atop parseable output
    GenerateTestdata {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long, default_value = "atop-testdata.txt")]
        output: PathBuf,

        /// Number of CPU and MEM samples to generate
        #[arg(short = 'n', long, default_value_t = 60)]
        samples: usize,

        /// Emit the short MEM layout without an availability column
        #[arg(long)]
        legacy: bool,

        /// Hostname written into every record
        #[arg(long, default_value = "testhost")]
        host: String,

        /// Interleave unrelated record types and malformed lines
        #[arg(long)]
        noise: bool,
    },
}

//! atop-utilization - version 0.1.0
//!
//! CPU and memory utilization reports from atop parseable output.
//! This is the main entry point that resolves configuration and dispatches subcommands.

mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::{debug, error, info, Level};

use cli::{Args, Commands, LogLevel};
use commands::{
    command_config, command_cpu, command_generate_testdata, command_mem, command_schema,
};
use commands::generate::GeneratorOptions;
use config::{resolve_config, show_config, validate_effective_config, Config};

/// Initializes tracing logging subsystem with configured log level.
///
/// Logs go to stderr so reports on stdout stay machine-readable.
fn setup_logging(config: &Config) {
    let log_level = match config.log_level() {
        LogLevel::Off => return,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return;
    }

    info!("Logging initialized with level: {:?}", config.log_level());
}

/// Sizes the global rayon pool used for decoding.
fn setup_parallelism(config: &Config) {
    if let Some(threads) = config.parallelism {
        if threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .unwrap_or_else(|e| error!("Failed to set rayon thread pool: {}", e));
            debug!("Rayon thread pool configured with {} threads", threads);
        }
    }
}

/// Main application entry point.
fn main() -> Result<()> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    let Some(command) = &args.command else {
        Args::command().print_help()?;
        println!();
        return Ok(());
    };

    // Config generation works without a valid config on disk
    if let Commands::Config {
        output,
        format,
        commented,
    } = command
    {
        return command_config(output.clone(), *format, *commented);
    }

    let config = resolve_config(&args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }

    setup_logging(&config);
    setup_parallelism(&config);

    match command {
        Commands::Cpu { file, average } => command_cpu(file, *average, &config),

        Commands::Mem {
            file,
            average,
            debug,
        } => command_mem(file, *average, *debug, &config),

        Commands::Schema { file } => command_schema(file, &config),

        Commands::GenerateTestdata {
            output,
            samples,
            legacy,
            host,
            noise,
        } => command_generate_testdata(
            output.clone(),
            GeneratorOptions {
                samples: *samples,
                legacy: *legacy,
                host: host.clone(),
                noise: *noise,
            },
        ),

        Commands::Config { .. } => unreachable!("Config handled above"),
    }
}

//! Generate testdata command implementation.
//!
//! Writes synthetic `atop -P CPU,MEM` output for exercising the reports
//! without a recorded atop log.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

// Sampling interval written into every record (seconds)
const INTERVAL_SECS: i64 = 600;
// Clock ticks per second per CPU
const TICKS_PER_SEC: i64 = 100;
const PAGE_SIZE: i64 = 4096;
// Payload columns of the modern MEM layout; available memory sits at 28
const MODERN_MEM_COLUMNS: usize = 31;
const AVAIL_COLUMN: usize = 28;
// Every Nth sample gets malformed companions in noise mode
const NOISE_EVERY: usize = 5;

/// Shape of the generated trace.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub samples: usize,
    pub legacy: bool,
    pub host: String,
    pub noise: bool,
}

/// Generates synthetic atop parseable output.
pub fn command_generate_testdata(output: PathBuf, options: GeneratorOptions) -> Result<()> {
    debug!(
        "Generating test data: samples={}, legacy={}, noise={}, output={}",
        options.samples,
        options.legacy,
        options.noise,
        output.display()
    );

    let start = Utc::now() - Duration::seconds(INTERVAL_SECS * options.samples as i64);
    let lines = generate_lines(&mut rand::thread_rng(), &options, start);
    let mut content = lines.join("\n");
    content.push('\n');

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!(
            "✅ Generated test data: {} CPU and {} MEM samples in {}",
            options.samples,
            options.samples,
            output.display()
        );
    }

    Ok(())
}

/// Builds the trace line by line, one CPU and one MEM record per sample.
pub fn generate_lines<R: Rng>(
    rng: &mut R,
    options: &GeneratorOptions,
    start: DateTime<Utc>,
) -> Vec<String> {
    let ncpu: i64 = rng.gen_range(1..=16);
    let total_pages: i64 = rng.gen_range(262_144..=8_388_608);
    let mut lines = Vec::with_capacity(options.samples * 2);

    for i in 0..options.samples {
        let at = start + Duration::seconds(INTERVAL_SECS * i as i64);
        let stamp = Stamp {
            host: &options.host,
            epoch: at.timestamp(),
            date: at.format("%Y/%m/%d").to_string(),
            time: at.format("%H:%M:%S").to_string(),
        };

        if options.noise {
            lines.push("RESET".to_string());
        }

        lines.push(cpu_line(rng, &stamp, ncpu));
        if options.noise {
            for cpu in 0..ncpu.min(2) {
                lines.push(format!(
                    "cpu {} {} {} {} {} {} {} 0 0 0 0 0 0 0 0 0 0",
                    stamp.host, stamp.epoch, stamp.date, stamp.time, INTERVAL_SECS, TICKS_PER_SEC, cpu
                ));
            }
        }

        lines.push(mem_line(rng, &stamp, total_pages, options.legacy));

        if options.noise {
            lines.push(format!(
                "SWP {} {} {} {} {} {} 1048576 1048000 0 0 0",
                stamp.host, stamp.epoch, stamp.date, stamp.time, INTERVAL_SECS, PAGE_SIZE
            ));
            lines.push(format!(
                "PAG {} {} {} {} {} {} 0 0 0 0",
                stamp.host, stamp.epoch, stamp.date, stamp.time, INTERVAL_SECS, PAGE_SIZE
            ));
            if i % NOISE_EVERY == NOISE_EVERY - 1 {
                lines.push(format!(
                    "CPU {} {} {}",
                    stamp.host, stamp.epoch, stamp.date
                ));
                lines.push(format!(
                    "MEM {} {} {} {} {} {} n/a 1 1 1",
                    stamp.host, stamp.epoch, stamp.date, stamp.time, INTERVAL_SECS, PAGE_SIZE
                ));
            }
            lines.push("SEP".to_string());
            lines.push(String::new());
        }
    }

    lines
}

struct Stamp<'a> {
    host: &'a str,
    epoch: i64,
    date: String,
    time: String,
}

/// `CPU host epoch date time interval ticks ncpu usr sys nice idle iowait irq softirq steal guest guest_nice`
fn cpu_line<R: Rng>(rng: &mut R, stamp: &Stamp<'_>, ncpu: i64) -> String {
    let budget = TICKS_PER_SEC * INTERVAL_SECS * ncpu;
    let busy: f64 = rng.gen_range(0.02..0.95);
    let busy_ticks = (budget as f64 * busy) as i64;

    let usr = busy_ticks * rng.gen_range(50..=70) / 100;
    let sys = busy_ticks * rng.gen_range(10..=20) / 100;
    let nice = busy_ticks / 50;
    let irq = busy_ticks / 100;
    let softirq = busy_ticks / 80;
    let steal = rng.gen_range(0..=busy_ticks / 100 + 1);
    let accounted = usr + sys + nice + irq + softirq + steal;

    let waiting = budget - accounted;
    let iowait = waiting * rng.gen_range(0..=10) / 100;
    let idle = waiting - iowait;

    format!(
        "CPU {} {} {} {} {} {} {} {} {} {} {} {} {} {} {} 0 0",
        stamp.host,
        stamp.epoch,
        stamp.date,
        stamp.time,
        INTERVAL_SECS,
        TICKS_PER_SEC,
        ncpu,
        usr,
        sys,
        nice,
        idle,
        iowait,
        irq,
        softirq,
        steal
    )
}

/// `MEM host epoch date time interval pagesize total free cache buffer ...`
///
/// The legacy layout stops after a handful of columns; the modern one runs
/// past the availability column.
fn mem_line<R: Rng>(rng: &mut R, stamp: &Stamp<'_>, total: i64, legacy: bool) -> String {
    let free = total * rng.gen_range(5..=40) / 100;
    let cache = total * rng.gen_range(5..=30) / 100;
    let buffer = total * rng.gen_range(1..=5) / 100;
    let slab = total / 50;
    let dirty: i64 = rng.gen_range(0..=1024);

    let mut columns: Vec<String> = vec![
        stamp.epoch.to_string(),
        stamp.date.clone(),
        stamp.time.clone(),
        INTERVAL_SECS.to_string(),
        PAGE_SIZE.to_string(),
        total.to_string(),
        free.to_string(),
        cache.to_string(),
        buffer.to_string(),
        slab.to_string(),
        dirty.to_string(),
    ];

    if !legacy {
        // Reclaimable slab counts as available on modern kernels
        let avail = (free + cache + buffer + slab / 2).min(total);
        while columns.len() < MODERN_MEM_COLUMNS {
            let value = if columns.len() == AVAIL_COLUMN {
                avail
            } else {
                rng.gen_range(0..=total / 100)
            };
            columns.push(value.to_string());
        }
    }

    format!("MEM {} {}", stamp.host, columns.join(" "))
}

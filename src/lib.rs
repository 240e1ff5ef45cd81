//! atop Utilization Library
//!
//! Derives CPU busy percentage and memory used percentage from atop
//! parseable output (`atop -P CPU,MEM`). The `MEM` column layout differs
//! between atop releases and is not tagged in the output, so the page size
//! and availability columns are inferred from the data itself.
//!
//! # Pipeline
//!
//! - **Tokenizer** ([`record`]): classifies lines as `CPU` / `MEM`, drops the rest
//! - **Schema inference** ([`schema`]): locates the page size column and
//!   decides between explicit and derived availability
//! - **Decoder** ([`samples`]): turns tokens into typed samples, skipping bad lines
//! - **Utilization** ([`utilization`]): per-counter and total busy percentages
//! - **Aggregation** ([`aggregate`]): CPU mean, memory mean-of-totals
//!
//! # Usage
//!
//! ```rust
//! use atop_utilization::{analyze_cpu, analyze_mem, split_records, SchemaRules};
//!
//! let input = "CPU host1 1700000000 2023-11-14 10:00:00 1 100 4 10 2 0 85 1\n\
//!              MEM host1 1700000000 2023-11-14 10:00:00 600 4096 1000 100 200 50\n";
//! let batch = split_records(input.lines());
//!
//! let cpu = analyze_cpu(&batch.cpu).unwrap();
//! println!("CPU busy: {:.2}%", cpu.summary.average_pct);
//!
//! let mem = analyze_mem(&batch.mem, &SchemaRules::default()).unwrap();
//! assert_eq!(mem.schema.page_size_index(), 4);
//! assert_eq!(mem.samples[0].avail_kb, 1400);
//! ```

pub mod aggregate;
pub mod analyze;
pub mod error;
pub mod record;
pub mod report;
pub mod samples;
pub mod schema;
pub mod utilization;

// Re-export main types for convenience
pub use aggregate::{AverageSummary, CpuAverage, MemAverage, RunningStat};
pub use analyze::{
    analyze_cpu, analyze_mem, analyze_mem_with_schema, CpuAnalysis, CpuEntry, MemAnalysis,
};
pub use error::AnalyzeError;
pub use record::{classify_line, split_records, RecordBatch, RecordKind, TokenRecord};
pub use samples::{
    decode_cpu, decode_cpu_batch, decode_mem, decode_mem_batch, CpuCounter, CpuSample,
    DecodeStats, MemSample,
};
pub use schema::{
    infer_mem_schema, infer_page_size_column, Availability, MemSchema, PageSizeColumn,
    SchemaRules,
};
pub use utilization::{compute_cpu_utilization, CpuUtilization};

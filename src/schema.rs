//! Column layout detection for `MEM` records.
//!
//! atop does not tag its parseable output with a format revision, and the
//! `MEM` layout differs between releases. The layout is therefore inferred
//! from the values themselves, once per batch, and then applied to every
//! line of that batch.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::record::TokenRecord;

/// Constants driving the inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRules {
    /// Values accepted as a page size, in bytes (default: 4096, 8192)
    #[serde(default = "default_page_sizes")]
    pub page_sizes: Vec<i64>,

    /// Number of leading columns scanned for the page size (default: 10)
    #[serde(default = "default_scan_limit")]
    pub scan_limit: usize,

    /// Page size column used when no column qualifies (default: 4)
    #[serde(default = "default_fallback_index")]
    pub fallback_page_size_index: usize,

    /// A first record longer than this carries an explicit availability column (default: 28)
    #[serde(default = "default_availability_threshold")]
    pub availability_threshold: usize,

    /// Position of the explicit availability column (default: 28)
    #[serde(default = "default_availability_column")]
    pub availability_column: usize,
}

fn default_page_sizes() -> Vec<i64> {
    vec![4096, 8192]
}
fn default_scan_limit() -> usize {
    10
}
fn default_fallback_index() -> usize {
    4
}
fn default_availability_threshold() -> usize {
    28
}
fn default_availability_column() -> usize {
    28
}

impl Default for SchemaRules {
    fn default() -> Self {
        Self {
            page_sizes: default_page_sizes(),
            scan_limit: default_scan_limit(),
            fallback_page_size_index: default_fallback_index(),
            availability_threshold: default_availability_threshold(),
            availability_column: default_availability_column(),
        }
    }
}

/// Where the page size was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "index", rename_all = "snake_case")]
pub enum PageSizeColumn {
    /// Every record holds a valid page size at this position.
    Resolved(usize),
    /// No position qualified; the configured default is used.
    Fallback(usize),
}

impl PageSizeColumn {
    pub fn index(&self) -> usize {
        match *self {
            PageSizeColumn::Resolved(index) | PageSizeColumn::Fallback(index) => index,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PageSizeColumn::Fallback(_))
    }
}

/// How available memory is obtained for each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Availability {
    /// Newer atop releases report available pages in their own column.
    Explicit { column: usize },
    /// Older releases: available = free + cache + buffer.
    Derived {
        free: usize,
        cache: usize,
        buffer: usize,
    },
}

impl Availability {
    /// Free/cache/buffer columns that follow the page size and total pages.
    pub fn derived_from(page_size: PageSizeColumn) -> Self {
        let index = page_size.index();
        Availability::Derived {
            free: index + 2,
            cache: index + 3,
            buffer: index + 4,
        }
    }

    pub fn explicit_column(&self) -> Option<usize> {
        match *self {
            Availability::Explicit { column } => Some(column),
            Availability::Derived { .. } => None,
        }
    }
}

/// Column layout resolved for one batch of `MEM` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemSchema {
    pub page_size: PageSizeColumn,
    pub availability: Availability,
    /// Token count of the first record, used for the availability check.
    pub observed_columns: usize,
}

impl MemSchema {
    pub fn page_size_index(&self) -> usize {
        self.page_size.index()
    }

    pub fn total_pages_index(&self) -> usize {
        self.page_size.index() + 1
    }

    /// Columns summed when the explicit availability column cannot be used.
    pub fn derived_columns(&self) -> (usize, usize, usize) {
        let index = self.page_size.index();
        (index + 2, index + 3, index + 4)
    }
}

impl fmt::Display for MemSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Detected columns: {}. Using pagesize_idx={}, avail_idx=",
            self.observed_columns,
            self.page_size.index()
        )?;
        match self.availability.explicit_column() {
            Some(column) => write!(f, "{}", column),
            None => f.write_str("None"),
        }
    }
}

/// Locates the page size column.
///
/// Candidate positions are scanned in ascending order up to the shorter of
/// `rules.scan_limit` and the shortest record. A position is accepted when
/// every record holds an integer from `rules.page_sizes` there; the first
/// such position wins.
pub fn infer_page_size_column(batch: &[TokenRecord], rules: &SchemaRules) -> PageSizeColumn {
    let shortest = batch.iter().map(TokenRecord::len).min().unwrap_or(0);
    let limit = rules.scan_limit.min(shortest);

    for index in 0..limit {
        let qualifies = batch.iter().all(|record| {
            record
                .int(index)
                .is_some_and(|value| rules.page_sizes.contains(&value))
        });

        if qualifies {
            debug!("Page size column resolved at index {}", index);
            return PageSizeColumn::Resolved(index);
        }
    }

    PageSizeColumn::Fallback(rules.fallback_page_size_index)
}

/// Resolves the full `MEM` layout for a batch.
pub fn infer_mem_schema(batch: &[TokenRecord], rules: &SchemaRules) -> MemSchema {
    let page_size = infer_page_size_column(batch, rules);
    let observed_columns = batch.first().map(TokenRecord::len).unwrap_or(0);

    if page_size.is_fallback() && !batch.is_empty() {
        warn!(
            "No column within the first {} holds a page size {:?} in every MEM record; \
             falling back to index {}",
            rules.scan_limit,
            rules.page_sizes,
            page_size.index()
        );
    }

    let availability = if observed_columns > rules.availability_threshold {
        Availability::Explicit {
            column: rules.availability_column,
        }
    } else {
        Availability::derived_from(page_size)
    };

    let schema = MemSchema {
        page_size,
        availability,
        observed_columns,
    };
    debug!("{}", schema);
    schema
}

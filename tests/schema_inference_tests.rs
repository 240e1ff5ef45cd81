//! Integration tests for MEM column layout detection.
//!
//! Batches are built from raw lines so the tokenizer's keyword and
//! hostname stripping is part of what is being checked.

use atop_utilization::{
    analyze_mem, infer_mem_schema, infer_page_size_column, split_records, Availability,
    PageSizeColumn, SchemaRules, TokenRecord,
};

/// MEM lines whose payload holds `page_size` at `index` and
/// non-page-size integers everywhere else.
fn batch_with_page_size_at(index: usize, width: usize, rows: usize) -> Vec<TokenRecord> {
    let lines: Vec<String> = (0..rows)
        .map(|row| {
            let payload: Vec<String> = (0..width)
                .map(|col| {
                    if col == index {
                        let page_size = if row % 2 == 0 { "4096" } else { "8192" };
                        page_size.to_string()
                    } else {
                        (1000 + row * 31 + col).to_string()
                    }
                })
                .collect();
            format!("MEM host{} {}", row, payload.join(" "))
        })
        .collect();
    split_records(lines.iter()).mem
}

#[test]
fn test_page_size_found_at_every_scanned_position() {
    let rules = SchemaRules::default();
    for index in 0..rules.scan_limit {
        let batch = batch_with_page_size_at(index, 12, 5);
        assert_eq!(
            infer_page_size_column(&batch, &rules),
            PageSizeColumn::Resolved(index),
            "page size injected at {}",
            index
        );
    }
}

#[test]
fn test_positions_past_scan_limit_fall_back() {
    let rules = SchemaRules::default();
    let batch = batch_with_page_size_at(rules.scan_limit, 14, 3);
    assert_eq!(
        infer_page_size_column(&batch, &rules),
        PageSizeColumn::Fallback(4)
    );
}

#[test]
fn test_shortest_record_bounds_the_scan() {
    // Column 6 qualifies in the long records but one record stops at 6 tokens
    let mut batch = batch_with_page_size_at(6, 10, 3);
    batch.extend(split_records(["MEM h 1 2 3 4 5 6"]).mem);
    assert_eq!(batch.last().map(TokenRecord::len), Some(6));

    let column = infer_page_size_column(&batch, &SchemaRules::default());
    assert_eq!(column, PageSizeColumn::Fallback(4));
}

#[test]
fn test_lowest_qualifying_position_wins() {
    let batch = split_records([
        "MEM h 1 d t 600 4096 4096 8192",
        "MEM h 2 d t 600 8192 4096 8192",
    ])
    .mem;
    assert_eq!(
        infer_page_size_column(&batch, &SchemaRules::default()),
        PageSizeColumn::Resolved(4)
    );
}

#[test]
fn test_single_disagreeing_record_disqualifies_position() {
    let batch = split_records([
        "MEM h 1 d t 600 4096 1 1 1",
        "MEM h 2 d t 600 16384 1 1 1",
        "MEM h 3 d t 600 4096 1 1 1",
    ])
    .mem;
    let column = infer_page_size_column(&batch, &SchemaRules::default());
    assert!(column.is_fallback());
    assert_eq!(column.index(), 4);
}

#[test]
fn test_custom_page_sizes() {
    let rules = SchemaRules {
        page_sizes: vec![16384, 65536],
        ..SchemaRules::default()
    };
    let batch = split_records([
        "MEM h 1 d t 600 16384 100 1 1 1",
        "MEM h 2 d t 600 65536 100 1 1 1",
    ])
    .mem;
    assert_eq!(
        infer_page_size_column(&batch, &rules),
        PageSizeColumn::Resolved(4)
    );

    let mem = analyze_mem(&batch, &rules).expect("two samples");
    assert_eq!(mem.samples[0].total_kb, 1600);
    assert_eq!(mem.samples[1].total_kb, 6400);
}

#[test]
fn test_availability_threshold_is_strict() {
    let rules = SchemaRules::default();

    let at_threshold = batch_with_page_size_at(4, 28, 1);
    let schema = infer_mem_schema(&at_threshold, &rules);
    assert_eq!(schema.observed_columns, 28);
    assert!(schema.availability.explicit_column().is_none());

    let above = batch_with_page_size_at(4, 29, 1);
    let schema = infer_mem_schema(&above, &rules);
    assert_eq!(schema.availability, Availability::Explicit { column: 28 });
}

#[test]
fn test_availability_decided_by_first_record() {
    let mut batch = batch_with_page_size_at(4, 9, 1);
    batch.extend(batch_with_page_size_at(4, 31, 2));
    let schema = infer_mem_schema(&batch, &SchemaRules::default());
    assert_eq!(schema.observed_columns, 9);
    assert_eq!(
        schema.availability,
        Availability::Derived {
            free: 6,
            cache: 7,
            buffer: 8
        }
    );
}

#[test]
fn test_short_lines_in_explicit_batch_use_derived_formula() {
    let long = format!(
        "MEM h 1 d t 600 4096 1000 100 100 100 {} 700",
        vec!["0"; 19].join(" ")
    );
    let batch = split_records([long.as_str(), "MEM h 2 d t 600 4096 1000 100 100 100"]).mem;

    let mem = analyze_mem(&batch, &SchemaRules::default()).expect("two samples");
    assert_eq!(mem.schema.availability.explicit_column(), Some(28));
    assert_eq!(mem.samples[0].avail_kb, 700 * 4);
    assert_eq!(mem.samples[0].avail_column, Some(28));
    assert_eq!(mem.samples[1].avail_kb, 300 * 4);
    assert_eq!(mem.samples[1].avail_column, None);
}

#[test]
fn test_schema_display() {
    let batch = batch_with_page_size_at(5, 30, 2);
    let schema = infer_mem_schema(&batch, &SchemaRules::default());
    assert_eq!(
        schema.to_string(),
        "Detected columns: 30. Using pagesize_idx=5, avail_idx=28"
    );
}

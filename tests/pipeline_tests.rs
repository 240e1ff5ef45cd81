//! End-to-end tests: raw atop text through tokenizer, schema inference,
//! decoding, utilization and averaging.

use atop_utilization::report::{cpu_average_line, cpu_line, mem_average_line, mem_line};
use atop_utilization::{
    analyze_cpu, analyze_mem, split_records, AnalyzeError, Availability, CpuCounter,
    PageSizeColumn, RecordKind, SchemaRules,
};

fn zeros(n: usize) -> String {
    vec!["0"; n].join(" ")
}

#[test]
fn test_cpu_line_end_to_end() {
    let batch = split_records(["CPU host1 1700000000 2023-11-14 10:00:00 1 5 4 10 2 0 85 1 0 0 0 0"]);
    let cpu = analyze_cpu(&batch.cpu).expect("one sample");
    let entry = &cpu.entries[0];

    assert_eq!(entry.sample.hostname, "host1");
    assert_eq!(entry.sample.epoch, 1_700_000_000);
    assert_eq!(entry.sample.datetime, "2023-11-14 10:00:00");
    assert_eq!(entry.sample.interval, 1);
    assert_eq!(entry.sample.load, 5);
    assert_eq!(entry.sample.ncpu, 4);
    assert_eq!(entry.sample.counters.len(), 9);
    assert_eq!(entry.sample.total(), 98);

    // busy = total - (idle + iowait) = 98 - 86
    let util = &entry.utilization;
    assert!((util.pct(CpuCounter::Usr) - 1000.0 / 98.0).abs() < 1e-9);
    assert!((util.pct(CpuCounter::Sys) - 200.0 / 98.0).abs() < 1e-9);
    assert!((util.pct(CpuCounter::Idle) - 8500.0 / 98.0).abs() < 1e-9);
    assert!((util.total_util - 1200.0 / 98.0).abs() < 1e-9);

    assert_eq!(
        cpu_line(entry),
        "2023-11-14 10:00:00 | Host: host1 | CPU Utilization: 12.24% \
         (usr=10.20%, sys=2.04%, iowait=1.02%, idle=86.73%)"
    );
}

#[test]
fn test_mem_line_with_explicit_availability() {
    // Payload: epoch date time, four zeros, 4096 at index 7, total at 8,
    // zeros up to the availability column at 28.
    let line = format!(
        "MEM host1 1700000000 2023-11-14 10:00:00 0 0 0 0 4096 1000 {} 300",
        zeros(19)
    );
    let batch = split_records([line.as_str()]);
    assert_eq!(batch.mem[0].len(), 29);

    let mem = analyze_mem(&batch.mem, &SchemaRules::default()).expect("one sample");
    assert_eq!(mem.schema.page_size, PageSizeColumn::Resolved(7));
    assert_eq!(mem.schema.availability, Availability::Explicit { column: 28 });

    let sample = &mem.samples[0];
    assert_eq!(sample.total_kb, 4000);
    assert_eq!(sample.avail_kb, 1200);
    assert_eq!(sample.used_kb, 2800);
    assert_eq!(sample.avail_column, Some(28));
    assert_eq!(
        mem_line(sample),
        "2023-11-14 10:00:00 | Used: 2,800 kB (70.00%) | Total: 4,000 kB | Available=1,200 kB"
    );
}

#[test]
fn test_legacy_layout_uses_free_cache_buffer() {
    let input = "\
MEM old 1700000000 2023/11/14 10:00:00 600 8192 1000 100 200 50
MEM old 1700000600 2023/11/14 10:10:00 600 8192 1000 400 100 0
";
    let batch = split_records(input.lines());
    let mem = analyze_mem(&batch.mem, &SchemaRules::default()).expect("two samples");

    assert_eq!(mem.schema.page_size_index(), 4);
    assert_eq!(
        mem.schema.availability,
        Availability::Derived {
            free: 6,
            cache: 7,
            buffer: 8
        }
    );
    assert_eq!(mem.samples[0].avail_kb, 350 * 8);
    assert_eq!(mem.samples[1].avail_kb, 500 * 8);
    assert!(mem.samples.iter().all(|s| s.avail_column.is_none()));

    // used 650*8 and 500*8 of 1000*8
    assert!((mem.summary.average_pct - 57.5).abs() < 1e-9);
    assert_eq!(
        mem_average_line(&mem.summary),
        "Average Memory Utilization: 57.50% (4,600 kB avg used) over 2 samples"
    );
}

#[test]
fn test_used_plus_available_equals_total() {
    let input = "\
MEM a 1 2023/11/14 10:00:00 600 4096 5000 1000 500 250
MEM a 2 2023/11/14 10:10:00 600 4096 5000 5000 5000 5000
MEM a 3 2023/11/14 10:20:00 600 4096 0 0 0 0
";
    let batch = split_records(input.lines());
    let mem = analyze_mem(&batch.mem, &SchemaRules::default()).expect("samples");
    assert_eq!(mem.samples.len(), 3);
    for sample in &mem.samples {
        assert_eq!(sample.used_kb + sample.avail_kb, sample.total_kb);
    }
    // availability above total gives negative used memory, reported as-is
    assert!(mem.samples[1].used_kb < 0);
    assert_eq!(mem.samples[2].used_pct, 0.0);
}

#[test]
fn test_malformed_lines_are_skipped_not_fatal() {
    let input = "\
CPU web 1700000000 2023/11/14 10:00:00 600 100 2 10 10 0 80 0
CPU web 1700000600 2023/11/14 10:10:00
CPU web 1700001200 2023/11/14 10:20:00 600 100 2 10 x 0 80 0
CPU web 1700001800 2023/11/14 10:30:00 600 100 2 30 10 0 60 0
MEM web 1700000000 2023/11/14 10:00:00 600 4096 1000 100 100 100
MEM web 1700000600 2023/11/14 10:10:00 600 4096 n/a 100 100 100
";
    let batch = split_records(input.lines());

    let cpu = analyze_cpu(&batch.cpu).expect("two good samples");
    assert_eq!(cpu.stats.decoded, 2);
    assert_eq!(cpu.stats.skipped, 2);
    assert_eq!(cpu.entries[0].sample.epoch, 1_700_000_000);
    assert_eq!(cpu.entries[1].sample.epoch, 1_700_001_800);
    assert_eq!(
        cpu_average_line(&cpu.summary),
        "Average CPU Utilization: 30.00% over 2 samples"
    );

    let mem = analyze_mem(&batch.mem, &SchemaRules::default()).expect("one good sample");
    assert_eq!(mem.stats.decoded, 1);
    assert_eq!(mem.stats.skipped, 1);
}

#[test]
fn test_no_records_and_no_valid_records() {
    let batch = split_records(["RESET", "SEP", "cpu h 1 d t 1 1 0 1 1 1 1"]);
    assert_eq!(
        analyze_cpu(&batch.cpu).unwrap_err(),
        AnalyzeError::NoRecords(RecordKind::Cpu)
    );
    assert_eq!(
        analyze_mem(&batch.mem, &SchemaRules::default()).unwrap_err(),
        AnalyzeError::NoRecords(RecordKind::Mem)
    );

    let batch = split_records(["MEM h 1 d t 600 4096 x 1 1 1"]);
    assert_eq!(
        analyze_mem(&batch.mem, &SchemaRules::default()).unwrap_err(),
        AnalyzeError::NoValidRecords {
            kind: RecordKind::Mem,
            skipped: 1
        }
    );
}

#[test]
fn test_analysis_is_idempotent() {
    let input = "\
CPU h 1700000000 2023/11/14 10:00:00 600 100 1 25 25 0 40 10
MEM h 1700000000 2023/11/14 10:00:00 600 4096 1000 250 0 0
";
    let first = split_records(input.lines());
    let second = split_records(input.lines());

    let a = analyze_cpu(&first.cpu).expect("cpu");
    let b = analyze_cpu(&second.cpu).expect("cpu");
    assert_eq!(a.summary, b.summary);

    let a = analyze_mem(&first.mem, &SchemaRules::default()).expect("mem");
    let b = analyze_mem(&second.mem, &SchemaRules::default()).expect("mem");
    assert_eq!(a.schema, b.schema);
    assert_eq!(a.samples, b.samples);
}

#[test]
fn test_mixed_input_keeps_order_per_kind() {
    let mut input = String::new();
    for i in 0..50 {
        input.push_str(&format!(
            "CPU h {} 2023/11/14 10:00:00 600 100 1 {} 0 0 {} 0\n",
            1_700_000_000 + i,
            i,
            100 - i
        ));
        input.push_str(&format!(
            "MEM h {} 2023/11/14 10:00:00 600 4096 100 {} 0 0\n",
            1_700_000_000 + i,
            i
        ));
    }
    let batch = split_records(input.lines());

    let cpu = analyze_cpu(&batch.cpu).expect("cpu");
    for (i, entry) in cpu.entries.iter().enumerate() {
        assert_eq!(entry.sample.epoch, 1_700_000_000 + i as i64);
        assert!((entry.utilization.total_util - i as f64).abs() < 1e-9);
    }

    let mem = analyze_mem(&batch.mem, &SchemaRules::default()).expect("mem");
    for (i, sample) in mem.samples.iter().enumerate() {
        assert_eq!(sample.avail_kb, i as i64 * 4);
    }
}

#[test]
fn test_out_of_range_values_do_not_abort_the_batch() {
    let max = i64::MAX;
    let mem_lines = [
        "MEM h 1 d t 600 4096 1000 1 1 1".to_string(),
        format!("MEM h 2 d t 600 4096 {max} 1 1 1"),
        format!("MEM h 3 d t 600 4096 1000 {max} {max} 1"),
        "MEM h 4 d t 600 4096 1000 100 0 0".to_string(),
    ];
    let batch = split_records(mem_lines.iter());
    let mem = analyze_mem(&batch.mem, &SchemaRules::default()).expect("two good samples");
    assert_eq!(mem.stats.decoded, 2);
    assert_eq!(mem.stats.skipped, 2);
    assert_eq!(mem.samples[1].avail_kb, 400);

    let cpu_lines = [
        format!("CPU h 2 d t 1 1 1 {max} {max} 0 1 0"),
        "CPU h 3 d t 1 1 1 50 0 0 50 0".to_string(),
    ];
    let batch = split_records(cpu_lines.iter());
    let cpu = analyze_cpu(&batch.cpu).expect("both samples");
    assert_eq!(cpu.stats.decoded, 2);
    assert!((cpu.entries[0].utilization.total_util - 100.0).abs() < 1e-9);
    assert!((cpu.summary.average_pct - 75.0).abs() < 1e-9);
}

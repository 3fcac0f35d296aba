use std::fs;
use std::hint::black_box;
use std::io::Write;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rollout_reader::parsers::{ScanOptions, Silent, build_session_info};
use rollout_reader::build_session_index;
use tempfile::{NamedTempFile, TempDir};

const LINE: &str = r#"{"type":"response_item","payload":{"type":"reasoning","summary":[{"type":"summary_text","text":"Thinking about the next step"}]}}"#;

/// Generate a rollout file whose metadata sits at `meta_line`, padded to `num_lines`
fn generate_rollout(num_lines: usize, meta_line: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for i in 1..=num_lines {
        if i == meta_line {
            writeln!(
                file,
                r#"{{"type":"session_meta","payload":{{"id":"bench","timestamp":"2024-03-07T10:00:00Z","cwd":"/work/bench"}}}}"#
            )
            .unwrap();
        } else {
            writeln!(file, "{}", LINE).unwrap();
        }
    }
    file.flush().unwrap();
    file
}

/// Generate a `YYYY/MM/DD` tree with `num_files` rollouts of 1,000 lines each
fn generate_sessions_tree(num_files: usize) -> TempDir {
    let root = TempDir::new().unwrap();
    for i in 0..num_files {
        let dir = root.path().join(format!("2024/{:02}/{:02}", (i % 12) + 1, (i % 28) + 1));
        fs::create_dir_all(&dir).unwrap();
        let file = generate_rollout(1_000, 1);
        fs::copy(file.path(), dir.join(format!("rollout-{i}.jsonl"))).unwrap();
    }
    root
}

fn bench_scan_bound(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_session_info");
    // Metadata past the bound forces a full bounded read
    let file = generate_rollout(50_000, 49_000);

    for max_lines in [100, 500, 5_000].iter() {
        group.throughput(Throughput::Elements(*max_lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(max_lines), max_lines, |b, &max_lines| {
            b.iter(|| {
                build_session_info(black_box(file.path()), ScanOptions { max_lines }, &Silent)
            });
        });
    }

    group.finish();
}

fn bench_build_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_session_index");
    group.sample_size(20);

    for size in [10, 100, 500].iter() {
        let root = generate_sessions_tree(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| build_session_index(black_box(root.path()), ScanOptions::default(), &Silent));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scan_bound, bench_build_index);
criterion_main!(benches);

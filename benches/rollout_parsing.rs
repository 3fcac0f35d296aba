use std::hint::black_box;
use std::io::Write;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rollout_reader::parse_session;
use tempfile::NamedTempFile;

/// Generate a synthetic rollout file with N turns (user message, tool call,
/// tool output, assistant reply, plus the echoed user message)
fn generate_rollout_file(num_turns: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();

    writeln!(
        file,
        r#"{{"type":"session_meta","timestamp":"2024-03-07T10:00:00Z","payload":{{"id":"bench","timestamp":"2024-03-07T10:00:00Z","cwd":"/work/bench","git":{{"repository_url":"https://github.com/acme/bench.git","branch":"main"}}}}}}"#
    )
    .unwrap();

    for i in 0..num_turns {
        writeln!(
            file,
            r#"{{"type":"response_item","payload":{{"type":"message","role":"user","content":[{{"type":"input_text","text":"Run step {i}"}}]}}}}"#
        )
        .unwrap();
        writeln!(file, r#"{{"type":"event_msg","payload":{{"type":"user_message","message":"Run step {i}"}}}}"#)
            .unwrap();
        writeln!(
            file,
            r#"{{"type":"response_item","payload":{{"type":"function_call","name":"shell","arguments":"{{\"command\":[\"echo\",\"{i}\"]}}","call_id":"call-{i}"}}}}"#
        )
        .unwrap();
        writeln!(
            file,
            r#"{{"type":"response_item","payload":{{"type":"function_call_output","call_id":"call-{i}","output":"{{\"output\":\"{i}\\n\",\"metadata\":{{\"exit_code\":0}}}}"}}}}"#
        )
        .unwrap();
        writeln!(
            file,
            r#"{{"type":"response_item","payload":{{"type":"message","role":"assistant","content":[{{"type":"output_text","text":"Step {i} done"}}]}}}}"#
        )
        .unwrap();
    }

    file.flush().unwrap();
    file
}

fn bench_parse_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_session");

    for size in [100, 1_000, 10_000].iter() {
        let file = generate_rollout_file(*size);

        group.throughput(Throughput::Elements(*size as u64 * 5 + 1));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| parse_session(black_box(file.path())).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_session);
criterion_main!(benches);

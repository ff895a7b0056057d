use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use poker_session::SessionConfig;
use poker_session::hand_history::{classify, parse_session};
use poker_session::stats::SessionSummary;
use poker_session::test_util::generate_session;

const PLAYERS: [&str; 6] = ["Alice", "Bob", "Carol", "Dave", "Erin", "Frank"];
const STARTING_STACK: u64 = 10_000;

fn bench_classify(c: &mut Criterion) {
    let lines = generate_session(200, &PLAYERS, STARTING_STACK);
    c.bench_function("classify_lines", |b| {
        b.iter(|| {
            for line in &lines {
                std::hint::black_box(classify(line).ok());
            }
        })
    });
}

fn bench_parse_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_session");
    let config = SessionConfig::default();

    for num_hands in [100usize, 1_000, 10_000] {
        let lines = generate_session(num_hands, &PLAYERS, STARTING_STACK);
        group.bench_with_input(BenchmarkId::from_parameter(num_hands), &lines, |b, lines| {
            b.iter(|| {
                let session = parse_session(lines, &config).unwrap();
                std::hint::black_box(SessionSummary::from_session(&session))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_parse_session);
criterion_main!(benches);

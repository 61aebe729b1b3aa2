//! Submit/poll round-trip throughput at varying worker counts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use feio::{Config, Engine, PollOutcome, Priority};
use std::time::Duration;

fn drain_all(engine: &std::sync::Arc<Engine>, expected: usize) {
    let mut finished = 0;
    while finished < expected {
        match engine.poll() {
            PollOutcome::Drained { finished: n } => {
                finished += n;
                if n == 0 {
                    std::thread::sleep(Duration::from_micros(50));
                }
            }
            PollOutcome::WouldBlock => {}
            PollOutcome::Aborted(_) => break,
        }
    }
}

fn submit_poll_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_poll");
    for &workers in &[1usize, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            let engine = Engine::new(Config::new().min_parallel(workers).max_parallel(workers));
            b.iter(|| {
                const N: usize = 256;
                for _ in 0..N {
                    engine.submit(black_box(feio::ops::nop(Priority::default())));
                }
                drain_all(&engine, N);
            });
        });
    }
    group.finish();
}

criterion_group!(submit_poll_benches, submit_poll_roundtrip);
criterion_main!(submit_poll_benches);

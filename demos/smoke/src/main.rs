//! feio End-to-End Smoke Test
//!
//! Exercises the engine against the real filesystem:
//!   Part A — Basic ops (nop, open/write/read/close, stat, mkdir/rmdir)
//!   Part B — Priority ordering under a single worker
//!   Part C — Groups: deferral, feeder/limit, cancellation fan-out
//!   Part D — Idle worker retirement
//!
//! Run: ./target/release/feio-smoke

use feio::{Config, Engine, PollOutcome, Priority};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

struct TestRunner {
    total: usize,
    passed: usize,
    failed: usize,
}

const LINE: &str = "────────────────────────────────────────────────────────────";

impl TestRunner {
    fn new() -> Self {
        Self { total: 0, passed: 0, failed: 0 }
    }

    fn section(&self, name: &str) {
        println!("\n{LINE}");
        println!("  {name}");
        println!("{LINE}");
    }

    fn check(&mut self, name: &str, ok: bool, reason: &str) {
        self.total += 1;
        if ok {
            self.passed += 1;
            println!("  [{:2}] {:<52} PASS", self.total, name);
        } else {
            self.failed += 1;
            println!("  [{:2}] {:<52} FAIL: {}", self.total, name, reason);
        }
    }

    fn summary(&self) {
        println!("\n{LINE}");
        println!("  Total: {}  Passed: {}  Failed: {}", self.total, self.passed, self.failed);
        println!("{LINE}");
    }
}

fn drain(engine: &Arc<Engine>, timeout: Duration) {
    let start = Instant::now();
    loop {
        match engine.poll() {
            PollOutcome::Drained { .. } => {
                if engine.nreqs() == 0 || start.elapsed() >= timeout {
                    return;
                }
                std::thread::sleep(Duration::from_millis(5));
            }
            PollOutcome::WouldBlock => {
                if start.elapsed() >= timeout {
                    return;
                }
                std::thread::sleep(Duration::from_millis(5));
            }
            PollOutcome::Aborted(_) => return,
        }
    }
}

fn test_basic_ops(t: &mut TestRunner) {
    t.section("Part A: Basic filesystem ops");
    let engine = Engine::new(Config::new().min_parallel(2));

    let nop_ok = Arc::new(AtomicUsize::new(0));
    {
        let nop_ok = nop_ok.clone();
        let req = feio::ops::nop(Priority::default()).with_finish(Box::new(move |req| {
            if req.result == 0 && req.errorno.is_none() {
                nop_ok.fetch_add(1, Ordering::SeqCst);
            }
            0
        }));
        engine.submit(req);
    }
    drain(&engine, Duration::from_secs(2));
    t.check("nop completes with result 0", nop_ok.load(Ordering::SeqCst) == 1, "finish never ran");

    let path = std::env::temp_dir().join(format!("feio-smoke-{}", std::process::id()));
    let wrote = Arc::new(AtomicUsize::new(0));
    {
        let wrote = wrote.clone();
        let open_req = feio::ops::open(
            path.clone(),
            libc::O_RDWR | libc::O_CREAT | libc::O_TRUNC,
            0o600,
            Priority::default(),
        )
        .with_finish(Box::new(move |req| {
            wrote.store(req.result as usize, Ordering::SeqCst);
            0
        }));
        engine.submit(open_req);
    }
    drain(&engine, Duration::from_secs(2));
    let fd = wrote.load(Ordering::SeqCst) as i32;
    t.check("open() returns a valid fd", fd >= 0, &format!("fd={fd}"));

    let written = Arc::new(AtomicUsize::new(0));
    {
        let written = written.clone();
        let req = feio::ops::write(fd, 0, b"hello feio".to_vec(), Priority::default())
            .with_finish(Box::new(move |req| {
                written.store(req.result as usize, Ordering::SeqCst);
                0
            }));
        engine.submit(req);
    }
    drain(&engine, Duration::from_secs(2));
    t.check("write() wrote 10 bytes", written.load(Ordering::SeqCst) == 10, "short write");

    let readback = Arc::new(Mutex::new(Vec::new()));
    {
        let readback = readback.clone();
        let req = feio::ops::read(fd, 0, 10, Priority::default()).with_finish(Box::new(move |req| {
            if let Some(buf) = req.payload1.as_ref().and_then(feio::Payload::buffer) {
                *readback.lock().unwrap() = buf.to_vec();
            }
            0
        }));
        engine.submit(req);
    }
    drain(&engine, Duration::from_secs(2));
    t.check(
        "read() roundtrips the written bytes",
        readback.lock().unwrap().as_slice() == b"hello feio",
        "mismatch",
    );

    engine.submit(feio::ops::close(fd, Priority::default()));
    drain(&engine, Duration::from_secs(2));
    std::fs::remove_file(&path).ok();
}

fn test_priority_ordering(t: &mut TestRunner) {
    t.section("Part B: Priority ordering");
    let engine = Engine::new(Config::new().min_parallel(1).max_parallel(1));
    let order = Arc::new(Mutex::new(Vec::new()));

    for priority in [0i8, 4, 2] {
        let order = order.clone();
        let req = feio::ops::nop(Priority::new(priority)).with_finish(Box::new(move |req| {
            order.lock().unwrap().push(req.priority.get());
            0
        }));
        engine.submit(req);
    }
    drain(&engine, Duration::from_secs(2));
    t.check(
        "finish order is [4, 2, 0]",
        *order.lock().unwrap() == vec![4, 2, 0],
        &format!("{:?}", order.lock().unwrap()),
    );
}

fn test_groups(t: &mut TestRunner) {
    t.section("Part C: Groups");
    let engine = Engine::new(Config::new().min_parallel(2));
    let order = Arc::new(Mutex::new(Vec::new()));

    let group = engine.group(Some({
        let order = order.clone();
        Box::new(move |_req| {
            order.lock().unwrap().push("group");
            0
        })
    }));
    for label in ["child1", "child2"] {
        let order = order.clone();
        let req = feio::ops::nop(Priority::default()).with_finish(Box::new(move |_req| {
            order.lock().unwrap().push(label);
            0
        }));
        group.add(req);
    }
    drain(&engine, Duration::from_secs(2));
    let seen = order.lock().unwrap().clone();
    t.check("group finish runs after both children", seen.last() == Some(&"group"), &format!("{seen:?}"));

    let produced = Arc::new(AtomicUsize::new(0));
    let max_inflight = Arc::new(AtomicUsize::new(0));
    let feeder_group = engine.group(None);
    {
        let produced = produced.clone();
        feeder_group.set_feeder(3, move || {
            if produced.fetch_add(1, Ordering::SeqCst) >= 10 {
                produced.fetch_sub(1, Ordering::SeqCst);
                return None;
            }
            Some(feio::ops::nop(Priority::default()))
        });
    }
    let start = Instant::now();
    while start.elapsed() < Duration::from_secs(5) {
        max_inflight.fetch_max(feeder_group.pending_children(), Ordering::SeqCst);
        if produced.load(Ordering::SeqCst) >= 10 && feeder_group.pending_children() == 0 {
            break;
        }
        engine.poll();
        std::thread::sleep(Duration::from_millis(2));
    }
    t.check(
        "feeder never exceeds limit 3",
        max_inflight.load(Ordering::SeqCst) <= 3,
        &format!("peak={}", max_inflight.load(Ordering::SeqCst)),
    );

    let cancel_group = engine.group(None);
    let cancelled_count = Arc::new(AtomicUsize::new(0));
    for _ in 0..5 {
        let cancelled_count = cancelled_count.clone();
        let req = feio::ops::busy(1.0, Priority::default()).with_finish(Box::new(move |req| {
            if req.is_cancelled() {
                cancelled_count.fetch_add(1, Ordering::SeqCst);
            }
            0
        }));
        cancel_group.add(req);
    }
    cancel_group.cancel();
    drain(&engine, Duration::from_secs(3));
    t.check(
        "cancelled group fans out to all children",
        cancelled_count.load(Ordering::SeqCst) == 5,
        &format!("{}/5", cancelled_count.load(Ordering::SeqCst)),
    );
}

fn test_idle_retirement(t: &mut TestRunner) {
    t.section("Part D: Idle worker retirement");
    let engine = Engine::new(Config::new().min_parallel(0).max_idle(1).max_parallel(8));
    for _ in 0..8 {
        engine.submit(feio::ops::busy(0.05, Priority::default()));
    }
    drain(&engine, Duration::from_secs(5));
    println!("  waiting >10s for idle workers to retire...");
    std::thread::sleep(Duration::from_secs(11));
    t.check(
        "nthreads settles at max_idle",
        engine.nthreads() == 1,
        &format!("nthreads={}", engine.nthreads()),
    );
}

fn main() {
    println!("=== feio End-to-End Smoke Test ===");

    let mut t = TestRunner::new();
    test_basic_ops(&mut t);
    test_priority_ordering(&mut t);
    test_groups(&mut t);
    test_idle_retirement(&mut t);

    t.summary();
    std::process::exit(if t.failed > 0 { 1 } else { 0 });
}

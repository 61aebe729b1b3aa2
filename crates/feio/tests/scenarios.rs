//! `spec.md` §8's six concrete scenarios, driving a real [`feio::Engine`]
//! end to end (real worker threads, real `poll` loop).

use feio::{Config, Engine, PollOutcome, Priority};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn spin_until(mut cond: impl FnMut() -> bool, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    cond()
}

fn drain(engine: &Arc<Engine>, timeout: Duration) -> usize {
    let mut total = 0;
    let start = Instant::now();
    loop {
        match engine.poll() {
            PollOutcome::Drained { finished } => {
                total += finished;
                if engine.nreqs() == 0 || start.elapsed() >= timeout {
                    return total;
                }
                std::thread::sleep(Duration::from_millis(5));
            }
            PollOutcome::WouldBlock => {
                if start.elapsed() >= timeout {
                    return total;
                }
                std::thread::sleep(Duration::from_millis(5));
            }
            PollOutcome::Aborted(_) => return total,
        }
    }
}

#[test]
fn scenario_1_priority_ordering() {
    let engine = Engine::new(Config::new().min_parallel(1).max_parallel(1));
    let order = Arc::new(Mutex::new(Vec::new()));

    let mut submit_at = |priority: i8| {
        let order = order.clone();
        let req = feio::ops::nop(Priority::new(priority)).with_finish(Box::new(move |req| {
            order.lock().unwrap().push(req.priority.get());
            0
        }));
        engine.submit(req);
    };
    submit_at(0);
    submit_at(4);
    submit_at(2);

    assert!(spin_until(|| engine.npending() == 3, Duration::from_secs(2)));
    drain(&engine, Duration::from_secs(2));

    assert_eq!(*order.lock().unwrap(), vec![4, 2, 0]);
}

#[test]
fn scenario_2_group_deferral() {
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

    let seen = order.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen.last(), Some(&"group"));
    assert!(seen[..2].contains(&"child1"));
    assert!(seen[..2].contains(&"child2"));
}

#[test]
fn scenario_3_idle_retirement() {
    let engine = Engine::new(Config::new().min_parallel(0).max_idle(1).max_parallel(8));

    for _ in 0..8 {
        engine.submit(feio::ops::busy(0.05, Priority::default()));
    }

    assert!(spin_until(|| engine.npending() == 8, Duration::from_secs(5)));
    drain(&engine, Duration::from_secs(2));

    std::thread::sleep(Duration::from_secs(11));
    assert_eq!(engine.nthreads(), 1);
}

#[test]
fn scenario_4_poll_budget() {
    let engine = Engine::new(Config::new().min_parallel(4).max_poll_reqs(10));

    for _ in 0..100 {
        engine.submit(feio::ops::nop(Priority::default()));
    }

    assert!(spin_until(|| engine.npending() > 0, Duration::from_secs(2)));
    // Give every worker a chance to drain its share into the result queue.
    std::thread::sleep(Duration::from_millis(200));

    match engine.poll() {
        PollOutcome::WouldBlock => {}
        other => panic!("expected WouldBlock, got {other:?}"),
    }
}

#[test]
fn scenario_5_feeder_and_limit() {
    let engine = Engine::new(Config::new().min_parallel(4));
    let produced = Arc::new(AtomicUsize::new(0));
    let max_inflight = Arc::new(AtomicUsize::new(0));
    let group = engine.group(None);

    {
        let produced = produced.clone();
        group.set_feeder(3, move || {
            if produced.fetch_add(1, Ordering::SeqCst) >= 10 {
                produced.fetch_sub(1, Ordering::SeqCst);
                return None;
            }
            Some(feio::ops::nop(Priority::default()))
        });
    }

    let start = Instant::now();
    while start.elapsed() < Duration::from_secs(5) {
        let inflight = group.pending_children();
        max_inflight.fetch_max(inflight, Ordering::SeqCst);
        if produced.load(Ordering::SeqCst) >= 10 && inflight == 0 {
            break;
        }
        engine.poll();
        std::thread::sleep(Duration::from_millis(2));
    }

    assert!(max_inflight.load(Ordering::SeqCst) <= 3);
    assert_eq!(produced.load(Ordering::SeqCst), 10);
}

#[test]
fn scenario_6_cancellation_fanout() {
    let engine = Engine::new(Config::new().min_parallel(0).max_parallel(0));
    let finished = Arc::new(Mutex::new(Vec::new()));
    let group_finished = Arc::new(Mutex::new(false));

    let group = engine.group(Some({
        let group_finished = group_finished.clone();
        Box::new(move |_req| {
            *group_finished.lock().unwrap() = true;
            0
        })
    }));

    for _ in 0..5 {
        let finished = finished.clone();
        let req = feio::ops::busy(1.0, Priority::default()).with_finish(Box::new(move |req| {
            finished.lock().unwrap().push(req.is_cancelled());
            0
        }));
        group.add(req);
    }

    group.cancel();
    engine.set_min_parallel(1);

    drain(&engine, Duration::from_secs(3));

    let finished = finished.lock().unwrap();
    assert_eq!(finished.len(), 5);
    assert!(finished.iter().all(|&cancelled| cancelled));
    assert!(*group_finished.lock().unwrap());
}

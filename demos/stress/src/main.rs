//! Stress test - many simultaneous requests
//!
//! Tests submitting and draining large numbers of NOP requests through
//! an elastic worker pool.

use feio::{Config, Engine, PollOutcome, Priority};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

fn main() {
    println!("=== feio Stress Test ===\n");

    let num_requests: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(100_000);

    println!("Submitting {num_requests} requests...");

    let engine = Engine::new(Config::new().min_parallel(8).max_parallel(8));
    let completed = Arc::new(AtomicU64::new(0));

    let start = Instant::now();

    for i in 0..num_requests {
        let completed = completed.clone();
        let req = feio::ops::nop(Priority::default()).with_finish(Box::new(move |_req| {
            completed.fetch_add(1, Ordering::Relaxed);
            0
        }));
        engine.submit(req);

        if (i + 1) % 10_000 == 0 {
            print!("\rSubmitted: {}/{num_requests}", i + 1);
        }
    }

    let submit_time = start.elapsed();
    println!("\n\nSubmit time: {submit_time:?}");
    println!("Submit rate: {:.0} requests/sec", num_requests as f64 / submit_time.as_secs_f64());

    println!("\nDraining...");
    let run_start = Instant::now();

    loop {
        let done = completed.load(Ordering::Relaxed) as usize;
        if done >= num_requests {
            break;
        }
        if run_start.elapsed().as_secs() > 30 {
            println!("Timeout! Only {done}/{num_requests} completed");
            break;
        }
        match engine.poll() {
            PollOutcome::Drained { .. } | PollOutcome::WouldBlock => {}
            PollOutcome::Aborted(code) => {
                println!("Aborted with code {code}");
                break;
            }
        }
        print!("\rCompleted: {done}/{num_requests}");
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    let total_time = start.elapsed();
    let run_time = run_start.elapsed();

    println!("\n\n=== Results ===");
    println!("Total requests: {num_requests}");
    println!("Completed:      {}", completed.load(Ordering::Relaxed));
    println!("Submit time:    {submit_time:?}");
    println!("Drain time:     {run_time:?}");
    println!("Total time:     {total_time:?}");
    println!(
        "Throughput:     {:.0} requests/sec",
        num_requests as f64 / total_time.as_secs_f64()
    );

    println!("\n=== Stress Test Complete ===");
}

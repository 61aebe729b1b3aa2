//! Worker main loop — `spec.md` §4.2, grounded on `eio.c`'s
//! `etp_proc`/`etp_worker` and the teacher's
//! `ksvc-module::fixed_pool::worker_loop`.

use crate::pool::Pool;
use feio_core::{Executor, OpCode, Request};
use std::sync::Arc;
use std::time::Duration;

/// Workers expire after sitting idle this long with surplus capacity
/// (`eio.c`'s `IDLE_TIMEOUT`).
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Spreads worker expirations so they don't all wake at once
/// (`spec.md` §4.2 "Timeout randomization").
fn jitter_for(worker_id: usize) -> Duration {
    Duration::from_millis((worker_id as u64 * 131 + 37) % 997)
}

pub fn worker_loop<E: Executor + ?Sized + 'static>(pool: Arc<Pool<E>>, worker_id: usize) {
    let deadline = IDLE_TIMEOUT + jitter_for(worker_id);
    let mut scratch = feio_core::Scratch::new();

    loop {
        let mut guard = pool.req_lock.lock().unwrap();
        let req: Option<Box<Request>> = loop {
            if let Some(req) = guard.shift() {
                break Some(req);
            }
            pool.counters.inc_idle();
            let (g, wait_result) = pool.req_cv.wait_timeout(guard, deadline).unwrap();
            guard = g;
            if wait_result.timed_out() && pool.counters.idle() > pool.counters.max_idle() {
                pool.counters.dec_idle();
                pool.counters.dec_started();
                break None;
            }
            pool.counters.dec_idle();
        };
        drop(guard);

        let mut req = match req {
            Some(req) => req,
            None => {
                pool.retire_worker(worker_id);
                return;
            }
        };

        if req.opcode == OpCode::Quit {
            pool.retire_worker(worker_id);
            return;
        }

        // Quit sentinels (`retire_excess`) are pushed straight onto
        // `req_lock` without going through `submit`, so `nready` was never
        // incremented for them; decrementing must wait until they're
        // excluded above, or shrinking the pool underflows the counter.
        pool.counters.dec_nready();

        if !req.is_cancelled() {
            pool.executor.execute(&mut scratch, &mut req);
        }
        scratch.release();

        let prior = {
            let mut res = pool.res_lock.lock().unwrap();
            pool.counters.inc_npending();
            res.push(req)
        };
        if prior == 0 {
            pool.fire_want_poll();
        }
    }
}

//! Pool controller — `spec.md` §4.3, grounded on `eio.c`'s
//! `etp_maybe_start_thread`/`etp_end_thread` and the teacher's
//! `ksvc-module::fixed_pool::FixedPool` (generalized from a fixed worker
//! count to elastic scale up/down).

use crate::counters::Counters;
use crate::worker::{self};
use crossbeam_queue::ArrayQueue;
use feio_core::{Executor, OpCode, Priority, Request, RequestId};
use feio_queue::PriorityQueue;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

/// Generous upper bound on simultaneously-retiring-but-not-yet-joined
/// workers. A worker handle that doesn't fit is dropped rather than
/// joined — the thread still runs to completion, it's just not waited
/// on, which only matters for tests that assert clean shutdown.
const RETIRED_QUEUE_CAPACITY: usize = 4096;

struct WorkerHandle {
    id: usize,
    handle: Option<thread::JoinHandle<()>>,
}

/// Owns the request queue, result queue, worker set, and counters for
/// one engine. Generic over the (caller-supplied) `Executor` so
/// `feio-pool` never depends on `feio-ops`.
pub struct Pool<E: Executor + ?Sized> {
    pub(crate) executor: Arc<E>,
    pub(crate) req_lock: Mutex<PriorityQueue>,
    pub(crate) req_cv: Condvar,
    pub(crate) res_lock: Mutex<PriorityQueue>,
    wrk_lock: Mutex<Vec<WorkerHandle>>,
    retired: ArrayQueue<thread::JoinHandle<()>>,
    pub(crate) counters: Counters,
    next_id: AtomicU64,
    next_worker_id: AtomicU64,
    want_poll: Option<Arc<dyn Fn() + Send + Sync>>,
    done_poll: Option<Arc<dyn Fn() + Send + Sync>>,
    debug_logging: AtomicBool,
}

impl<E: Executor + ?Sized + 'static> Pool<E> {
    pub fn new(
        executor: Arc<E>,
        min_parallel: usize,
        max_idle: usize,
        want_poll: Option<Arc<dyn Fn() + Send + Sync>>,
        done_poll: Option<Arc<dyn Fn() + Send + Sync>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            executor,
            req_lock: Mutex::new(PriorityQueue::new()),
            req_cv: Condvar::new(),
            res_lock: Mutex::new(PriorityQueue::new()),
            wrk_lock: Mutex::new(Vec::new()),
            retired: ArrayQueue::new(RETIRED_QUEUE_CAPACITY),
            counters: Counters::new(min_parallel, max_idle),
            next_id: AtomicU64::new(1),
            next_worker_id: AtomicU64::new(0),
            want_poll,
            done_poll,
            debug_logging: AtomicBool::new(false),
        })
    }

    /// Lifecycle lines (worker spawned/retired) are silent by default;
    /// the host opts in via `Config::debug_logging` (`SPEC_FULL.md` §9).
    pub fn set_debug_logging(&self, enable: bool) {
        self.debug_logging.store(enable, Ordering::Relaxed);
    }

    fn debug_logging(&self) -> bool {
        self.debug_logging.load(Ordering::Relaxed)
    }

    pub fn next_request_id(&self) -> RequestId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn fire_want_poll(&self) {
        if let Some(cb) = &self.want_poll {
            cb();
        }
    }

    fn fire_done_poll(&self) {
        if let Some(cb) = &self.done_poll {
            cb();
        }
    }

    /// `spec.md` §4.4 `submit`: clamps priority (already done by
    /// `Priority::new` at request construction), pushes under `reqlock`,
    /// signals, then scales up.
    pub fn submit(self: &Arc<Self>, mut req: Request) -> RequestId {
        req.id = self.next_request_id();
        req.priority = Priority::new(req.priority.get());
        let id = req.id;

        {
            let mut q = self.req_lock.lock().unwrap();
            self.counters.inc_nreqs();
            self.counters.inc_nready();
            q.push(Box::new(req));
            self.req_cv.notify_one();
        }
        self.maybe_start_thread();
        id
    }

    /// `spec.md` §4.3 "Scale up": starts a worker iff demand exceeds
    /// capacity plus not-yet-collected results.
    pub fn maybe_start_thread(self: &Arc<Self>) {
        self.reap_retired();
        let started = self.counters.started();
        let wanted = self.counters.wanted();
        let npending = self.counters.npending();
        let nreqs = self.counters.nreqs();

        if started < wanted && started + npending < nreqs {
            self.spawn_worker();
        }
    }

    fn spawn_worker(self: &Arc<Self>) {
        let id = self.next_worker_id.fetch_add(1, Ordering::Relaxed) as usize;
        let pool = Arc::clone(self);
        let built = thread::Builder::new()
            .name(format!("feio-worker-{id}"))
            .spawn(move || worker::worker_loop(pool, id));

        match built {
            Ok(handle) => {
                self.counters.inc_started();
                self.wrk_lock.lock().unwrap().push(WorkerHandle {
                    id,
                    handle: Some(handle),
                });
                if self.debug_logging() {
                    eprintln!("feio: worker {id} spawned (started={})", self.counters.started());
                }
            }
            // Worker startup failures are silent: the engine simply runs
            // with fewer workers than wanted (`spec.md` §7).
            Err(_) => {}
        }
    }

    /// Called by a worker thread just before it exits.
    pub(crate) fn retire_worker(&self, id: usize) {
        let mut list = self.wrk_lock.lock().unwrap();
        if let Some(pos) = list.iter().position(|w| w.id == id) {
            let mut w = list.swap_remove(pos);
            if let Some(handle) = w.handle.take() {
                let _ = self.retired.push(handle);
            }
        }
        if self.debug_logging() {
            eprintln!("feio: worker {id} retired (started={})", self.counters.started());
        }
    }

    fn reap_retired(&self) {
        while let Some(handle) = self.retired.pop() {
            let _ = handle.join();
        }
    }

    /// `spec.md` §4.3 "Scale down": pushes one sentinel per excess worker.
    pub fn retire_excess(self: &Arc<Self>, target: usize) {
        let started = self.counters.started();
        if started <= target {
            return;
        }
        let excess = started - target;
        let mut q = self.req_lock.lock().unwrap();
        for _ in 0..excess {
            let sentinel = Request::new(OpCode::Quit, Priority::highest());
            q.push(Box::new(sentinel));
            self.counters.dec_started();
        }
        self.req_cv.notify_all();
    }

    /// `spec.md` §4.4 `poll` step 2: try to take one finished request.
    pub fn try_pop_result(&self) -> Option<Box<Request>> {
        let mut rq = self.res_lock.lock().unwrap();
        let req = rq.shift();
        if req.is_some() {
            self.counters.dec_npending();
            if rq.is_empty() {
                drop(rq);
                self.fire_done_poll();
            }
        }
        req
    }

    pub fn nreqs(&self) -> usize {
        self.counters.nreqs()
    }

    pub fn nready(&self) -> usize {
        self.counters.nready()
    }

    pub fn npending(&self) -> usize {
        self.counters.npending()
    }

    pub fn nthreads(&self) -> usize {
        self.counters.started()
    }

    pub fn set_min_parallel(self: &Arc<Self>, n: usize) {
        let current = self.counters.wanted();
        if n > current {
            self.counters.set_wanted(n);
            self.maybe_start_thread();
        }
    }

    pub fn set_max_parallel(self: &Arc<Self>, n: usize) {
        if self.counters.wanted() > n {
            self.counters.set_wanted(n);
        }
        if self.counters.started() > n {
            self.retire_excess(n);
        }
    }

    pub fn set_max_idle(&self, n: usize) {
        self.counters.set_max_idle(n);
    }

    pub fn dec_nreqs(&self) {
        self.counters.dec_nreqs();
    }

    /// Registers this pool for fork handling. Idempotent per process
    /// (`spec.md` §4.6: "auto-installs ... exactly once").
    pub fn install_fork_handler(self: &Arc<Self>) {
        let dyn_self: Arc<dyn crate::fork::ForkAware> = self.clone();
        let weak: std::sync::Weak<dyn crate::fork::ForkAware> = Arc::downgrade(&dyn_self);
        crate::fork::register(weak);
    }
}

impl<E: Executor + ?Sized + 'static> crate::fork::ForkAware for Pool<E> {
    fn fork_prepare(&self) {
        let _w = self.wrk_lock.lock().unwrap();
        let _r = self.req_lock.lock().unwrap();
        let _s = self.res_lock.lock().unwrap();
    }

    fn fork_parent(&self) {}

    /// `spec.md` §4.6 steps 1–5. Runs on the forked child, which inherits
    /// no live worker threads (`fork()` clones only the calling thread).
    fn fork_child(&self) {
        {
            let mut q = self.req_lock.lock().unwrap();
            while q.shift().is_some() {}
        }
        {
            let mut rq = self.res_lock.lock().unwrap();
            while rq.shift().is_some() {}
        }
        {
            let mut list = self.wrk_lock.lock().unwrap();
            // The OS threads behind these handles don't exist in the
            // child; dropping (not joining) is the only safe option.
            list.clear();
        }
        while self.retired.pop().is_some() {}
        self.counters.reset_after_fork();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feio_core::Scratch;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct NopExecutor {
        calls: AtomicUsize,
    }

    impl Executor for NopExecutor {
        fn execute(&self, _scratch: &mut Scratch, req: &mut Request) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            req.result = 0;
        }
    }

    fn test_pool(min_parallel: usize) -> Arc<Pool<NopExecutor>> {
        Pool::new(
            Arc::new(NopExecutor {
                calls: AtomicUsize::new(0),
            }),
            min_parallel,
            1,
            None,
            None,
        )
    }

    fn wait_for(mut cond: impl FnMut() -> bool, timeout: Duration) -> bool {
        let start = std::time::Instant::now();
        while start.elapsed() < timeout {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        cond()
    }

    #[test]
    fn submit_and_poll_nop_roundtrip() {
        let pool = test_pool(1);
        pool.submit(Request::new(OpCode::Nop, Priority::default()));
        assert!(wait_for(|| pool.npending() == 1, Duration::from_secs(2)));
        let result = pool.try_pop_result().expect("result available");
        assert_eq!(result.result, 0);
        assert_eq!(pool.npending(), 0);
    }

    #[test]
    fn scale_up_starts_workers_on_backlog() {
        let pool = test_pool(4);
        for _ in 0..4 {
            pool.submit(Request::new(OpCode::Busy, Priority::default()));
        }
        assert!(wait_for(|| pool.nthreads() >= 1, Duration::from_secs(2)));
    }

    #[test]
    fn set_max_parallel_zero_drains_workers() {
        let pool = test_pool(2);
        pool.submit(Request::new(OpCode::Nop, Priority::default()));
        assert!(wait_for(|| pool.nthreads() >= 1, Duration::from_secs(2)));
        pool.set_max_parallel(0);
        assert!(wait_for(|| pool.nthreads() == 0, Duration::from_secs(2)));
    }
}

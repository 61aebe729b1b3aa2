//! `Engine` — the top-level entry point, wiring `feio-pool`'s worker pool
//! to `feio-ops`'s real dispatch table (`spec.md` §4.4/§6).

use crate::config::Config;
use crate::group::{Group, PoolSubmitter};
use crate::handle::{EngineStats, PollOutcome, RequestHandle};
use feio_core::{FinishOutcome, OpCode, Priority, Request};
use feio_group::GroupState;
use feio_ops::FsExecutor;
use feio_pool::Pool;
use std::sync::Arc;
use std::time::Instant;

/// The engine itself. Not generic over the executor (`SPEC_FULL.md`'s
/// workspace layout has exactly one dispatch table, `feio-ops::FsExecutor`)
/// — `feio-pool::Pool` stays generic so it never has to know that.
pub struct Engine {
    pool: Arc<Pool<FsExecutor>>,
    max_poll_reqs: std::sync::atomic::AtomicUsize,
    max_poll_time: std::sync::Mutex<Option<std::time::Duration>>,
}

impl Engine {
    /// `spec.md` §6 `init`, minus the separate callback-registration call:
    /// callbacks live on `Config` (`SPEC_FULL.md` §6). Installs the fork
    /// handler exactly once per engine, as `eio_init` does per process.
    pub fn new(config: Config) -> Arc<Self> {
        if let Err(e) = config.validate() {
            panic!("feio: {e}");
        }
        if config.debug_logging {
            config.print();
        }
        let pool = Pool::new(
            Arc::new(FsExecutor),
            config.min_parallel,
            config.max_idle,
            config.want_poll.clone(),
            config.done_poll.clone(),
        );
        pool.set_debug_logging(config.debug_logging);
        if let Some(max) = config.max_parallel {
            pool.set_max_parallel(max);
        }
        pool.install_fork_handler();

        Arc::new(Self {
            pool,
            max_poll_reqs: std::sync::atomic::AtomicUsize::new(config.max_poll_reqs),
            max_poll_time: std::sync::Mutex::new(config.max_poll_time),
        })
    }

    /// `spec.md` §4.4 `submit`.
    pub fn submit(&self, req: Request) -> RequestHandle {
        let flags = req.flags.clone();
        let group_query = req.group_query.clone();
        let id = self.pool.submit(req);
        RequestHandle { id, flags, group_query }
    }

    /// `spec.md` §6 `cancel(req)`.
    pub fn cancel(&self, handle: &RequestHandle) {
        handle.cancel();
    }

    /// `eio_grp`: creates and immediately submits a `Group`-opcode request
    /// (always at the highest priority, matching `eio.c`'s own
    /// `const int pri = EIO_PRI_MAX`), returning a handle children can be
    /// added to.
    pub fn group(self: &Arc<Self>, finish: Option<feio_core::request::FinishFn>) -> Group {
        let mut req = Request::new(OpCode::Group, Priority::highest());
        if let Some(f) = finish {
            req = req.with_finish(f);
        }
        let submitter: Arc<dyn feio_group::ChildSubmitter> = Arc::new(PoolSubmitter(self.pool.clone()));
        let state = GroupState::new(req.flags.clone(), submitter);
        req = req.with_group_query(state.clone());
        let handle = self.submit(req);
        Group { state, handle }
    }

    /// `spec.md` §4.4 `poll`, steps 1–7.
    pub fn poll(&self) -> PollOutcome {
        let max_reqs = self.max_poll_reqs.load(std::sync::atomic::Ordering::Acquire);
        let max_time = *self.max_poll_time.lock().unwrap();
        let start = max_time.map(|_| Instant::now());
        let mut finished = 0usize;

        loop {
            // Step 1.
            self.pool.maybe_start_thread();

            // Steps 2-3.
            let Some(mut req) = self.pool.try_pop_result() else {
                return PollOutcome::Drained { finished };
            };

            // Step 4.
            self.pool.dec_nreqs();

            // Step 5: a group with children still pending is deferred,
            // not finished, until its last child drains it to zero.
            if let Some(gq) = req.group_query.clone() {
                if gq.pending_children() > 0 {
                    req.mark_deferred();
                    gq.defer(req);
                    continue;
                }
            }

            // Step 6.
            let sink = req.group.take();
            let outcome = req.run_finish();
            if let Some(sink) = sink {
                sink.child_finished();
            }
            finished += 1;

            if let FinishOutcome::Abort(code) = outcome {
                return PollOutcome::Aborted(code);
            }

            // Step 7: budget check.
            if max_reqs != 0 && finished >= max_reqs {
                return PollOutcome::WouldBlock;
            }
            if let (Some(budget), Some(start)) = (max_time, start) {
                if start.elapsed() >= budget {
                    return PollOutcome::WouldBlock;
                }
            }
        }
    }

    pub fn nreqs(&self) -> usize {
        self.pool.nreqs()
    }

    pub fn nready(&self) -> usize {
        self.pool.nready()
    }

    pub fn npending(&self) -> usize {
        self.pool.npending()
    }

    pub fn nthreads(&self) -> usize {
        self.pool.nthreads()
    }

    /// `SPEC_FULL.md` §10: ergonomic bundle of the four counters above.
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            nreqs: self.nreqs(),
            nready: self.nready(),
            npending: self.npending(),
            nthreads: self.nthreads(),
        }
    }

    pub fn set_min_parallel(&self, n: usize) {
        self.pool.set_min_parallel(n);
    }

    pub fn set_max_parallel(&self, n: usize) {
        self.pool.set_max_parallel(n);
    }

    pub fn set_max_idle(&self, n: usize) {
        self.pool.set_max_idle(n);
    }

    pub fn set_max_poll_reqs(&self, n: usize) {
        self.max_poll_reqs.store(n, std::sync::atomic::Ordering::Release);
    }

    pub fn set_max_poll_time(&self, d: Option<std::time::Duration>) {
        *self.max_poll_time.lock().unwrap() = d;
    }
}

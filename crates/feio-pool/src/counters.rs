//! Process-wide-per-engine counters (`spec.md` §3 "Counters",
//! invariants 1–2). Each field is independently atomic; callers that
//! need a consistent joint read of several (`maybe_start_thread`) take
//! the pool's `reqlock` around the read, matching `eio.c`'s own
//! "aligned machine-word reads aren't atomic on every platform" caveat
//! (`spec.md` §5) even though Rust's atomics make that caveat moot —
//! the lock is still needed for the *compound* check, not for each
//! individual load.

use std::sync::atomic::{AtomicUsize, Ordering};

/// `eio.c`'s own compiled-in default (`static unsigned int started, idle,
/// wanted = 4;`, `eio.c:164`): `wanted` starts positive independently of
/// any host-supplied `min_parallel`, which only ever *raises* it
/// (`eio.c:551`'s `eio_set_min_parallel`). A host that asks for
/// `min_parallel(0)` still gets on-demand scale-up capacity up to this
/// floor; `set_max_parallel` is the only thing that can lower it below
/// the floor, and only when the host asks for that explicitly.
pub const DEFAULT_WANTED: usize = 4;

#[derive(Default)]
pub struct Counters {
    nreqs: AtomicUsize,
    nready: AtomicUsize,
    npending: AtomicUsize,
    started: AtomicUsize,
    idle: AtomicUsize,
    wanted: AtomicUsize,
    max_idle: AtomicUsize,
}

impl Counters {
    /// `min_parallel` raises the default floor (`DEFAULT_WANTED`); it
    /// never lowers it, matching `eio_set_min_parallel`'s own `if (wanted
    /// < nthreads) wanted = nthreads;` guard.
    pub fn new(min_parallel: usize, max_idle: usize) -> Self {
        Self {
            nreqs: AtomicUsize::new(0),
            nready: AtomicUsize::new(0),
            npending: AtomicUsize::new(0),
            started: AtomicUsize::new(0),
            idle: AtomicUsize::new(0),
            wanted: AtomicUsize::new(min_parallel.max(DEFAULT_WANTED)),
            max_idle: AtomicUsize::new(max_idle.max(1)),
        }
    }

    pub fn nreqs(&self) -> usize {
        self.nreqs.load(Ordering::Acquire)
    }

    pub fn nready(&self) -> usize {
        self.nready.load(Ordering::Acquire)
    }

    pub fn npending(&self) -> usize {
        self.npending.load(Ordering::Acquire)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::Acquire)
    }

    pub fn idle(&self) -> usize {
        self.idle.load(Ordering::Acquire)
    }

    pub fn wanted(&self) -> usize {
        self.wanted.load(Ordering::Acquire)
    }

    pub fn max_idle(&self) -> usize {
        self.max_idle.load(Ordering::Acquire)
    }

    pub fn set_wanted(&self, n: usize) {
        self.wanted.store(n, Ordering::Release);
    }

    pub fn set_max_idle(&self, n: usize) {
        self.max_idle.store(n.max(1), Ordering::Release);
    }

    pub fn inc_nreqs(&self) {
        self.nreqs.fetch_add(1, Ordering::AcqRel);
    }

    pub fn dec_nreqs(&self) {
        self.nreqs.fetch_sub(1, Ordering::AcqRel);
    }

    pub fn inc_nready(&self) {
        self.nready.fetch_add(1, Ordering::AcqRel);
    }

    pub fn dec_nready(&self) {
        self.nready.fetch_sub(1, Ordering::AcqRel);
    }

    pub fn inc_npending(&self) {
        self.npending.fetch_add(1, Ordering::AcqRel);
    }

    pub fn dec_npending(&self) {
        self.npending.fetch_sub(1, Ordering::AcqRel);
    }

    pub fn inc_started(&self) {
        self.started.fetch_add(1, Ordering::AcqRel);
    }

    pub fn dec_started(&self) {
        self.started.fetch_sub(1, Ordering::AcqRel);
    }

    pub fn inc_idle(&self) {
        self.idle.fetch_add(1, Ordering::AcqRel);
    }

    pub fn dec_idle(&self) {
        self.idle.fetch_sub(1, Ordering::AcqRel);
    }

    /// Zeroes the liveness counters. Used only by the fork child handler
    /// (`spec.md` §4.6 step 4) — `wanted`/`max_idle` survive a fork since
    /// they're configuration, not liveness state.
    pub fn reset_after_fork(&self) {
        self.nreqs.store(0, Ordering::SeqCst);
        self.nready.store(0, Ordering::SeqCst);
        self.npending.store(0, Ordering::SeqCst);
        self.started.store(0, Ordering::SeqCst);
        self.idle.store(0, Ordering::SeqCst);
    }
}

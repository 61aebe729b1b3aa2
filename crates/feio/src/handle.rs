//! The host-facing handle returned by [`crate::Engine::submit`], plus the
//! small value types `poll`/stat snapshots return.

use feio_core::{GroupQuery, RequestFlags, RequestId};
use std::sync::Arc;

/// What the host got back from [`crate::Engine::submit`]. Carries just
/// enough to cancel the request later (`spec.md` §6 `cancel(req)`)
/// without holding a pointer into engine-owned storage — the `Request`
/// itself has already moved into the queue.
#[derive(Clone)]
pub struct RequestHandle {
    pub(crate) id: RequestId,
    pub(crate) flags: Arc<RequestFlags>,
    pub(crate) group_query: Option<Arc<dyn GroupQuery>>,
}

impl RequestHandle {
    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.flags.is_cancelled()
    }

    /// `spec.md` §6 `cancel(req)`: set the cancelled flag; if this handle
    /// names a group, fan out recursively (`eio_cancel`/`eio_grp_cancel`).
    pub fn cancel(&self) {
        self.flags.cancel();
        if let Some(gq) = &self.group_query {
            gq.cancel_fanout();
        }
    }
}

/// `spec.md` §4.4's three-way `poll` result, widened from the C API's
/// overloaded `0 | -1(EAGAIN) | user_code` into a real enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The result queue ran dry (or the poll budget wasn't hit) after
    /// finishing this many requests.
    Drained { finished: usize },
    /// The poll budget (`max_poll_reqs`/`max_poll_time`) was exhausted
    /// before the result queue ran dry. Carries `EAGAIN` for parity with
    /// `spec.md`'s `-1, errno = EAGAIN`.
    WouldBlock,
    /// A `finish` callback returned nonzero; `poll` stopped immediately,
    /// leaving the rest of the batch in the result queue for next time.
    Aborted(i32),
}

/// Ergonomic bundle of the four counter getters from `spec.md` §6,
/// additive sugar over `Engine::nreqs`/`nready`/`npending`/`nthreads`
/// (`SPEC_FULL.md` §10) — `eio.c` itself only exposes the getters
/// individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineStats {
    pub nreqs: usize,
    pub nready: usize,
    pub npending: usize,
    pub nthreads: usize,
}

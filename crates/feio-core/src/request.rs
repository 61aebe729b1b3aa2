//! The `Request` value object — `spec.md` §3's central entity.

use crate::flags::{self, RequestFlags};
use crate::group_sink::{GroupQuery, GroupSink};
use crate::opcode::OpCode;
use crate::payload::Payload;
use crate::priority::Priority;
use std::any::Any;
use std::sync::Arc;

pub type RequestId = u64;

/// Return value of `poll`'s abort path (`spec.md` §4.4 step 6): a `finish`
/// callback returning nonzero aborts the poll loop immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishOutcome {
    Continue,
    Abort(i32),
}

pub type FinishFn = Box<dyn FnOnce(&mut Request) -> i32 + Send>;
pub type FeedFn = Box<dyn FnMut(&mut Request) + Send>;
pub type DestroyFn = Box<dyn FnOnce() + Send>;

/// Unit of asynchronous work. Owned by exactly one of: the request queue,
/// a worker's in-flight slot, the result queue, or a group's child list —
/// never more than one at a time (`spec.md` invariant 3).
pub struct Request {
    pub id: RequestId,
    pub opcode: OpCode,
    pub priority: Priority,

    pub int1: i64,
    pub int2: i64,
    pub int3: i64,
    pub offset: i64,
    pub size: u64,
    pub seconds1: f64,
    pub seconds2: f64,

    pub payload1: Option<Payload>,
    pub payload2: Option<Payload>,

    pub result: i64,
    pub errorno: Option<i32>,

    pub flags: Arc<RequestFlags>,
    pub user_data: Option<Box<dyn Any + Send>>,

    pub(crate) finish: Option<FinishFn>,
    pub(crate) feed: Option<FeedFn>,
    pub(crate) on_destroy: Option<DestroyFn>,

    /// Set by `grp_add`; cleared once the child's completion has been
    /// reported to the group.
    pub group: Option<Arc<dyn GroupSink>>,

    /// Set only on a `Group`-opcode request itself, pointing back at its
    /// own coordinator state so the poll loop can query pending children
    /// (`spec.md` §4.4 step 5) without depending on `feio-group`.
    pub group_query: Option<Arc<dyn GroupQuery>>,
}

impl Request {
    pub fn new(opcode: OpCode, priority: Priority) -> Self {
        Self {
            id: 0,
            opcode,
            priority,
            int1: 0,
            int2: 0,
            int3: 0,
            offset: 0,
            size: 0,
            seconds1: 0.0,
            seconds2: 0.0,
            payload1: None,
            payload2: None,
            result: 0,
            errorno: None,
            flags: Arc::new(RequestFlags::new()),
            user_data: None,
            finish: None,
            feed: None,
            on_destroy: None,
            group: None,
            group_query: None,
        }
    }

    pub fn with_group_query(mut self, q: Arc<dyn GroupQuery>) -> Self {
        self.group_query = Some(q);
        self
    }

    pub fn with_finish(mut self, f: FinishFn) -> Self {
        self.finish = Some(f);
        self
    }

    pub fn with_feed(mut self, f: FeedFn) -> Self {
        self.feed = Some(f);
        self
    }

    pub fn with_user_data(mut self, data: Box<dyn Any + Send>) -> Self {
        self.user_data = Some(data);
        self
    }

    pub fn with_on_destroy(mut self, f: DestroyFn) -> Self {
        self.on_destroy = Some(f);
        self
    }

    pub fn set_path1(&mut self, path: std::path::PathBuf) {
        self.payload1 = Some(Payload::Path(path));
        self.flags.set(flags::PTR1_OWNED);
    }

    pub fn set_path2(&mut self, path: std::path::PathBuf) {
        self.payload2 = Some(Payload::Path(path));
        self.flags.set(flags::PTR2_OWNED);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flags.is_cancelled()
    }

    pub fn cancel(&self) {
        self.flags.cancel();
    }

    pub fn is_deferred(&self) -> bool {
        self.flags.is_set(flags::DEFERRED)
    }

    pub fn mark_deferred(&self) {
        self.flags.set(flags::DEFERRED);
    }

    pub fn has_feeder(&self) -> bool {
        self.feed.is_some()
    }

    pub fn clear_feed(&mut self) {
        self.feed = None;
    }

    /// Invoke the feed callback once, if present (`EIO_FEED` in `eio.c`).
    /// Used both for a group's feeder and for `Custom` requests' worker-side
    /// execute step.
    pub fn run_feed(&mut self) {
        if let Some(mut f) = self.feed.take() {
            f(self);
            // feed is not one-shot; only the caller decides to clear it
            // (group feeder: on no-progress; custom op: after execute).
            self.feed = Some(f);
        }
    }

    /// Invoke the finish callback exactly once, whether or not the request
    /// was cancelled: cancellation is a flag for `finish` to observe via
    /// [`Request::is_cancelled`] (`spec.md` §4.5/§8), not a reason to skip
    /// it.
    pub fn run_finish(&mut self) -> FinishOutcome {
        match self.finish.take() {
            Some(f) => {
                let res = f(self);
                if res == 0 {
                    FinishOutcome::Continue
                } else {
                    FinishOutcome::Abort(res)
                }
            }
            None => FinishOutcome::Continue,
        }
    }
}

impl Drop for Request {
    fn drop(&mut self) {
        if let Some(f) = self.on_destroy.take() {
            f();
        }
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("id", &self.id)
            .field("opcode", &self.opcode)
            .field("priority", &self.priority)
            .field("result", &self.result)
            .field("errorno", &self.errorno)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_runs_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let mut req = Request::new(OpCode::Nop, Priority::default()).with_finish(Box::new(
            move |_req| {
                c.fetch_add(1, Ordering::SeqCst);
                0
            },
        ));
        assert_eq!(req.run_finish(), FinishOutcome::Continue);
        assert_eq!(req.run_finish(), FinishOutcome::Continue);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancelled_request_still_runs_finish() {
        let mut req = Request::new(OpCode::Nop, Priority::default()).with_finish(Box::new(
            |req| {
                assert!(req.is_cancelled());
                0
            },
        ));
        req.cancel();
        assert_eq!(req.run_finish(), FinishOutcome::Continue);
    }

    #[test]
    fn finish_abort_propagates_code() {
        let mut req =
            Request::new(OpCode::Nop, Priority::default()).with_finish(Box::new(|_req| 7));
        assert_eq!(req.run_finish(), FinishOutcome::Abort(7));
    }
}

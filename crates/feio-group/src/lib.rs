//! Request groups — grounded on `eio.c`'s `grp_try_feed`/`grp_dec`/
//! `eio_grp_add`/`eio_grp_cancel` family.
//!
//! All entry points here run on the single host thread driving
//! `feio::Engine::poll` (`SPEC_FULL.md` §4.4): a child's `GroupSink::
//! child_finished` is invoked only after the child's own `finish`
//! callback has run on that thread, and [`GroupQuery::defer`] is called
//! from the same loop. There is exactly one caller at a time, so the
//! `Mutex`es below exist for interior mutability behind a shared `Arc`,
//! not for contended locking.

use feio_core::{GroupQuery, GroupSink, Request, RequestFlags, RequestId};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Hands a group's newly-produced child back to whatever owns the actual
/// request queue, without `feio-group` depending on `feio-pool` or
/// `feio`. Implemented by `feio::Engine`.
pub trait ChildSubmitter: Send + Sync {
    fn submit_child(&self, req: Request) -> RequestId;
}

type Feeder = Box<dyn FnMut() -> Option<Request> + Send>;

/// A tracked child: its flags (for the cancel flag itself) plus, if the
/// child is itself a group, the handle needed to recurse into it —
/// mirrors `eio_cancel`'s unconditional `eio_grp_cancel` call, which is a
/// no-op for a plain request because its `grp_first` is null.
struct ChildRef {
    flags: Arc<RequestFlags>,
    nested: Option<Arc<dyn GroupQuery>>,
}

struct Inner {
    size: AtomicUsize,
    /// `eio.c`'s `grp->int2`: feed stops once `size` reaches this. `0`
    /// means "no feeder active", matching the C default.
    limit: AtomicUsize,
    /// `eio.c`'s `grp->int1`: set once `poll` has popped the group's own
    /// request and found children still pending.
    waiting: AtomicBool,
    /// Set once the group's deferred finish has run; further [`GroupState::add`]
    /// calls are refused, matching `eio_grp_add`'s assert.
    done: AtomicBool,
    own_flags: Arc<RequestFlags>,
    deferred: Mutex<Option<Box<Request>>>,
    feeder: Mutex<Option<Feeder>>,
    children: Mutex<Vec<ChildRef>>,
    submitter: Arc<dyn ChildSubmitter>,
}

/// A group's coordinator state. Shared via `Arc` between the group's own
/// `Request` (as a [`GroupQuery`]) and every child `Request` it produces
/// (as a [`GroupSink`]).
pub struct GroupState(Inner);

impl GroupState {
    pub fn new(own_flags: Arc<RequestFlags>, submitter: Arc<dyn ChildSubmitter>) -> Arc<Self> {
        Arc::new(GroupState(Inner {
            size: AtomicUsize::new(0),
            limit: AtomicUsize::new(0),
            waiting: AtomicBool::new(false),
            done: AtomicBool::new(false),
            own_flags,
            deferred: Mutex::new(None),
            feeder: Mutex::new(None),
            children: Mutex::new(Vec::new()),
            submitter,
        }))
    }

    pub fn pending_children(&self) -> usize {
        self.0.size.load(Ordering::Acquire)
    }

    /// Adds a request as this group's child: attaches this group as its
    /// [`GroupSink`], tracks its flags for cancellation fan-out, and
    /// submits it (`eio_grp_add`).
    pub fn add(self: &Arc<Self>, mut req: Request) -> RequestId {
        assert!(
            !self.0.done.load(Ordering::Acquire),
            "cannot add requests to a group after it has finished"
        );
        self.0.size.fetch_add(1, Ordering::AcqRel);
        self.0.children.lock().unwrap().push(ChildRef {
            flags: req.flags.clone(),
            nested: req.group_query.clone(),
        });
        req.group = Some(self.clone());
        self.0.submitter.submit_child(req)
    }

    /// `eio_grp_limit`: sets the feed concurrency ceiling and kicks the
    /// feeder immediately.
    pub fn set_limit(self: &Arc<Self>, limit: usize) {
        self.0.limit.store(limit, Ordering::Release);
        self.try_feed();
    }

    /// `eio_grp_feed`: installs the feeder closure and kicks it.
    pub fn set_feeder(self: &Arc<Self>, limit: usize, feeder: impl FnMut() -> Option<Request> + Send + 'static) {
        self.0.limit.store(limit, Ordering::Release);
        *self.0.feeder.lock().unwrap() = Some(Box::new(feeder));
        self.try_feed();
    }

    /// `eio_grp_cancel`: cooperative cancellation fan-out to every child
    /// currently tracked (in flight or still queued), recursing into any
    /// child that is itself a group. Does not touch this group request's
    /// own flags — the caller (`GroupQuery::cancel_fanout`) does that.
    pub fn cancel_children(&self) {
        for child in self.0.children.lock().unwrap().iter() {
            child.flags.cancel();
            if let Some(nested) = &child.nested {
                nested.cancel_fanout();
            }
        }
    }

    fn try_feed(self: &Arc<Self>) {
        if self.0.own_flags.is_cancelled() {
            return;
        }
        loop {
            let limit = self.0.limit.load(Ordering::Acquire);
            if limit == 0 || self.0.size.load(Ordering::Acquire) >= limit {
                break;
            }
            let next = {
                let mut guard = self.0.feeder.lock().unwrap();
                match guard.as_mut() {
                    Some(f) => f(),
                    None => break,
                }
            };
            match next {
                Some(child) => {
                    self.add(child);
                }
                // no progress made this round; stop (eio.c: "stop if no
                // progress has been made", detected there via old_len ==
                // size, which for us is simply "feeder returned nothing").
                None => break,
            }
        }
    }

    fn finish_if_ready(self: &Arc<Self>) {
        if !self.0.waiting.load(Ordering::Acquire) {
            return;
        }
        if self.0.size.load(Ordering::Acquire) != 0 {
            return;
        }
        if self.0.done.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(mut req) = self.0.deferred.lock().unwrap().take() {
            // This group may itself be another group's child (nested
            // groups): take its own sink before running finish, the same
            // way the top-level poll loop does for an ordinary request.
            let sink = req.group.take();
            // The group's own `finish` return value has no poll loop left
            // to hand an abort code to (this runs after that request was
            // already popped and deferred); it is discarded, matching
            // `grp_dec`'s call to `eio_finish` for a fully-detached group.
            let _ = req.run_finish();
            if let Some(sink) = sink {
                sink.child_finished();
            }
        }
    }
}

impl GroupSink for GroupState {
    fn child_finished(self: Arc<Self>) {
        self.0.size.fetch_sub(1, Ordering::AcqRel);
        self.try_feed();
        self.finish_if_ready();
    }
}

impl GroupQuery for GroupState {
    fn pending_children(&self) -> usize {
        self.pending_children()
    }

    fn defer(&self, req: Box<Request>) {
        self.0.waiting.store(true, Ordering::Release);
        *self.0.deferred.lock().unwrap() = Some(req);
    }

    fn cancel_fanout(&self) {
        self.cancel_children();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feio_core::{FinishOutcome, OpCode, Priority};
    use std::sync::atomic::AtomicUsize as Counter;

    struct RecordingSubmitter {
        submitted: Mutex<Vec<Request>>,
    }

    impl ChildSubmitter for RecordingSubmitter {
        fn submit_child(&self, req: Request) -> RequestId {
            self.submitted.lock().unwrap().push(req);
            0
        }
    }

    fn finish_child(group: &Arc<GroupState>) {
        group.clone().child_finished();
    }

    #[test]
    fn finishes_after_defer_once_children_drain() {
        let submitter = Arc::new(RecordingSubmitter { submitted: Mutex::new(Vec::new()) });
        let own_flags = Arc::new(RequestFlags::new());
        let group = GroupState::new(own_flags, submitter.clone());

        group.add(Request::new(OpCode::Nop, Priority::default()));
        group.add(Request::new(OpCode::Nop, Priority::default()));
        assert_eq!(group.pending_children(), 2);

        let finished = Arc::new(Counter::new(0));
        let f = finished.clone();
        let own_req = Request::new(OpCode::Group, Priority::default()).with_finish(Box::new(
            move |_req| {
                f.fetch_add(1, Ordering::SeqCst);
                0
            },
        ));

        GroupQuery::defer(&*group, Box::new(own_req));
        assert_eq!(finished.load(Ordering::SeqCst), 0);

        finish_child(&group);
        assert_eq!(finished.load(Ordering::SeqCst), 0);
        finish_child(&group);
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn feeder_is_throttled_by_limit() {
        let submitter = Arc::new(RecordingSubmitter { submitted: Mutex::new(Vec::new()) });
        let own_flags = Arc::new(RequestFlags::new());
        let group = GroupState::new(own_flags, submitter.clone());

        let remaining = Arc::new(Counter::new(5));
        let r = remaining.clone();
        group.set_feeder(2, move || {
            if r.load(Ordering::SeqCst) == 0 {
                None
            } else {
                r.fetch_sub(1, Ordering::SeqCst);
                Some(Request::new(OpCode::Nop, Priority::default()))
            }
        });

        assert_eq!(group.pending_children(), 2);
        finish_child(&group);
        assert_eq!(group.pending_children(), 2);
    }

    #[test]
    #[should_panic(expected = "after it has finished")]
    fn add_after_finish_panics() {
        let submitter = Arc::new(RecordingSubmitter { submitted: Mutex::new(Vec::new()) });
        let own_flags = Arc::new(RequestFlags::new());
        let group = GroupState::new(own_flags, submitter);

        group.add(Request::new(OpCode::Nop, Priority::default()));
        GroupQuery::defer(&*group, Box::new(Request::new(OpCode::Group, Priority::default())));
        finish_child(&group);

        group.add(Request::new(OpCode::Nop, Priority::default()));
    }

    #[allow(unused)]
    fn _assert_outcome_type(_: FinishOutcome) {}
}

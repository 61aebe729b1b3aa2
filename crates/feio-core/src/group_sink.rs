//! The seam between a plain [`crate::Request`] and `feio-group`'s
//! `GroupState`, so `feio-core` never needs to know groups exist.

use crate::request::Request;
use std::sync::Arc;

/// Implemented by a group's internal state. A child request holds an
/// `Arc<dyn GroupSink>` in [`crate::Request::group`] and calls
/// [`GroupSink::child_finished`] exactly once, after its own `finish`
/// callback has run (`spec.md` §4.5 "child completion").
pub trait GroupSink: Send + Sync {
    fn child_finished(self: Arc<Self>);
}

/// Implemented by a group's internal state and attached to the group's
/// own `Request` (not its children) via
/// [`crate::Request::group_query`], so the poll loop can ask "does this
/// group still have pending children" without `feio-core` knowing
/// `feio-group` exists (`spec.md` §4.4 step 5).
pub trait GroupQuery: Send + Sync {
    fn pending_children(&self) -> usize;

    /// Hands the group's own (now-popped-from-the-result-queue) boxed
    /// request to the group for safekeeping until the last child
    /// completes. Called at most once, under the `DEFERRED` flag.
    fn defer(&self, req: Box<Request>);

    /// Recursively cancels every child (and, for children that are
    /// themselves groups, their descendants), matching `eio.c`'s
    /// `eio_cancel`/`eio_grp_cancel` mutual recursion — every request
    /// unconditionally fans cancellation out to its children, so a plain
    /// request is simply a no-op leaf.
    fn cancel_fanout(&self);
}

//! Public group wrapper — `spec.md` §4.5/§6: `grp()`, `grp_add`,
//! `grp_limit`, `grp_feed`, `grp_cancel`.

use crate::handle::RequestHandle;
use feio_core::{Request, RequestId};
use feio_group::{ChildSubmitter, GroupState};
use feio_ops::FsExecutor;
use feio_pool::Pool;
use std::sync::Arc;

/// Hands a group's children back to the same pool every other request
/// goes through, so `feio-group` never needs to know `feio-pool` exists.
pub(crate) struct PoolSubmitter(pub Arc<Pool<FsExecutor>>);

impl ChildSubmitter for PoolSubmitter {
    fn submit_child(&self, req: Request) -> RequestId {
        self.0.submit(req)
    }
}

/// A composite request: a coordinator (`feio_group::GroupState`) plus the
/// handle to the group's own `Request`, which carries its own completion
/// like any other request (`spec.md` §4.5).
pub struct Group {
    pub(crate) state: Arc<GroupState>,
    pub(crate) handle: RequestHandle,
}

impl Group {
    pub fn id(&self) -> RequestId {
        self.handle.id()
    }

    /// `eio_grp_add`: add a child request to this group.
    pub fn add(&self, req: Request) -> RequestId {
        self.state.add(req)
    }

    /// `eio_grp_limit`: cap on simultaneously in-flight children.
    pub fn set_limit(&self, limit: usize) {
        self.state.set_limit(limit);
    }

    /// `eio_grp_feed`: installs a feeder invoked whenever the group has
    /// room under `limit`; the feeder returns `None` to signal it has
    /// nothing left to add right now.
    pub fn set_feeder(&self, limit: usize, feeder: impl FnMut() -> Option<Request> + Send + 'static) {
        self.state.set_feeder(limit, feeder);
    }

    pub fn pending_children(&self) -> usize {
        self.state.pending_children()
    }

    /// `eio_grp_cancel`: fans cancellation out to every current child,
    /// recursively.
    pub fn cancel(&self) {
        self.handle.cancel();
    }
}

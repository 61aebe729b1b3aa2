//! Request flags — a small shared, atomically-updated bitset.
//!
//! `RequestFlags` is held behind an `Arc` so the group coordinator can fan
//! cancellation out to children that are still sitting in the request
//! queue or mid-flight in a worker, without holding a raw pointer to the
//! `Request` itself (see `spec.md` §4.5/§5: cancellation is a flag, not a
//! preemption, and setting it is atomic).

use std::sync::atomic::{AtomicU8, Ordering};

/// Request has been cancelled. Cooperative only — an in-flight request
/// still runs its `execute` step to completion.
pub const CANCELLED: u8 = 1 << 0;
/// `payload1` is an owned allocation released on request destruction.
/// Kept for parity with the C API's ownership flags; in this crate
/// payload ownership is automatic (it's a `Payload`, not a raw pointer),
/// so this flag carries no release logic of its own — see DESIGN.md.
pub const PTR1_OWNED: u8 = 1 << 1;
/// As [`PTR1_OWNED`], for `payload2`.
pub const PTR2_OWNED: u8 = 1 << 2;
/// A group has been marked deferred by `poll` (§4.4 step 5): its `size`
/// was non-zero when polled, so it is finished later by its last child
/// rather than immediately. Replaces `libeio`'s overloaded `int1 = 1`.
pub const DEFERRED: u8 = 1 << 3;

#[derive(Debug, Default)]
pub struct RequestFlags(AtomicU8);

impl RequestFlags {
    pub fn new() -> Self {
        Self(AtomicU8::new(0))
    }

    #[inline]
    pub fn set(&self, bit: u8) {
        self.0.fetch_or(bit, Ordering::AcqRel);
    }

    #[inline]
    pub fn clear(&self, bit: u8) {
        self.0.fetch_and(!bit, Ordering::AcqRel);
    }

    #[inline]
    pub fn is_set(&self, bit: u8) -> bool {
        self.0.load(Ordering::Acquire) & bit != 0
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.is_set(CANCELLED)
    }

    #[inline]
    pub fn cancel(&self) {
        self.set(CANCELLED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_observable() {
        let f = RequestFlags::new();
        assert!(!f.is_cancelled());
        f.cancel();
        assert!(f.is_cancelled());
    }

    #[test]
    fn deferred_is_independent_of_cancelled() {
        let f = RequestFlags::new();
        f.set(DEFERRED);
        assert!(f.is_set(DEFERRED));
        assert!(!f.is_cancelled());
    }
}

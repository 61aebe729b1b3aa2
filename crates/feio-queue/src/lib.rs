//! # feio-queue — the priority multiqueue
//!
//! `spec.md` §4.1: a fixed-number-of-priorities FIFO multiqueue with O(1)
//! push and shift. Both the request queue and the result queue
//! (`spec.md` §3) are instances of [`PriorityQueue`]; only the mutex that
//! guards each (`reqlock` vs `reslock` in `spec.md` §5) differs, and that
//! guarding is the caller's (`feio-pool`) responsibility — this crate is
//! single-threaded by design, matching how the teacher's
//! `gvthread-runtime::ready_queue::SimpleQueue` separates the lock-free
//! bookkeeping from the `Mutex`/`Condvar` wrapper around it.

use feio_core::{Priority, Request, NUM_PRIORITIES};
use std::collections::VecDeque;

/// One bucket per priority level, aggregate size tracked alongside so
/// `is_empty`/`len` never have to sum the buckets (`spec.md`: "Aggregate
/// `size` is authoritative").
pub struct PriorityQueue {
    buckets: Vec<VecDeque<Box<Request>>>,
    size: usize,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self {
            buckets: (0..NUM_PRIORITIES).map(|_| VecDeque::new()).collect(),
            size: 0,
        }
    }

    /// Push `req` onto the tail of its priority bucket.
    ///
    /// Returns the aggregate size *before* this insertion — the host uses
    /// a `0` return from the result-queue push to detect the
    /// empty→non-empty edge that should fire `want_poll`
    /// (`spec.md` §4.2 step 5).
    pub fn push(&mut self, req: Box<Request>) -> usize {
        let prior = self.size;
        let idx = req.priority.index();
        self.buckets[idx].push_back(req);
        self.size += 1;
        prior
    }

    /// Pop the head of the highest non-empty priority bucket.
    pub fn shift(&mut self) -> Option<Box<Request>> {
        for bucket in self.buckets.iter_mut() {
            if let Some(req) = bucket.pop_front() {
                self.size -= 1;
                return Some(req);
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl Default for PriorityQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feio_core::OpCode;

    fn req(pri: i8) -> Box<Request> {
        Box::new(Request::new(OpCode::Nop, Priority::new(pri)))
    }

    #[test]
    fn push_returns_prior_size() {
        let mut q = PriorityQueue::new();
        assert_eq!(q.push(req(0)), 0);
        assert_eq!(q.push(req(0)), 1);
    }

    #[test]
    fn shift_is_highest_priority_first() {
        let mut q = PriorityQueue::new();
        q.push(req(0));
        q.push(req(4));
        q.push(req(2));

        let first = q.shift().unwrap();
        assert_eq!(first.priority.get(), 4);
        let second = q.shift().unwrap();
        assert_eq!(second.priority.get(), 2);
        let third = q.shift().unwrap();
        assert_eq!(third.priority.get(), 0);
        assert!(q.shift().is_none());
    }

    #[test]
    fn same_priority_preserves_submission_order() {
        let mut q = PriorityQueue::new();
        for i in 0..5 {
            let mut r = req(0);
            r.int1 = i;
            q.push(r);
        }
        for i in 0..5 {
            assert_eq!(q.shift().unwrap().int1, i);
        }
    }

    #[test]
    fn size_matches_push_and_shift() {
        let mut q = PriorityQueue::new();
        assert!(q.is_empty());
        q.push(req(0));
        q.push(req(1));
        assert_eq!(q.len(), 2);
        q.shift();
        assert_eq!(q.len(), 1);
        q.shift();
        assert!(q.is_empty());
    }
}

//! The opaque `execute` step (`spec.md` §1: "out of scope except as a
//! black-box execute step"). `feio-core` only defines the seam;
//! `feio-ops` provides the real dispatch table over blocking OS calls,
//! and tests are free to stub it with instrumented no-ops
//! (`spec.md` §9 design note).

use crate::request::Request;

/// Per-worker scratch state: a reusable buffer (readahead/sendfile
/// emulation, directory scan batching) and a cached open directory
/// handle, both released at the end of every request (`spec.md` §5
/// resource discipline).
#[derive(Default)]
pub struct Scratch {
    pub buffer: Option<Vec<u8>>,
    pub dir: Option<std::fs::ReadDir>,
}

impl Scratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lazily allocate (or reuse) a buffer of at least `min_size` bytes.
    pub fn buffer_mut(&mut self, min_size: usize) -> &mut Vec<u8> {
        let buf = self.buffer.get_or_insert_with(Vec::new);
        if buf.len() < min_size {
            buf.resize(min_size, 0);
        }
        buf
    }

    /// Release both fields, bounding per-worker idle memory.
    pub fn release(&mut self) {
        self.buffer = None;
        self.dir = None;
    }
}

/// Runs the blocking OS call (or user closure, for `Custom`) a request
/// names, filling in `result`/`errorno`. Implementations must not touch
/// fields other than `result`, `errorno`, `payload1`, `payload2`, and —
/// for `Custom` — whatever `Request::run_feed` needs.
pub trait Executor: Send + Sync {
    fn execute(&self, scratch: &mut Scratch, req: &mut Request);
}

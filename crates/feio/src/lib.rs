//! # feio — an asynchronous filesystem I/O engine
//!
//! A thread-pool request engine over a blocking opcode dispatch table: the
//! host submits [`feio_core::Request`] values, the pool runs them off the
//! main thread, and the host drains completions by calling [`Engine::poll`]
//! whenever it likes. No I/O runs on the calling thread and no callback
//! ever runs on a worker thread — everything the host's `finish` closures
//! touch runs inside `poll`.
//!
//! Built from the same four moving parts as `eio.c`: a priority request
//! queue (`feio-queue`), an elastic worker pool (`feio-pool`), a blocking
//! opcode table (`feio-ops`), and request groups (`feio-group`). This
//! crate is the glue: [`Engine`] owns the pool, [`Config`] tunes it, and
//! [`RequestHandle`]/[`Group`] are what the host holds on to.

mod config;
mod engine;
mod group;
mod handle;
pub mod ops;

pub use config::Config;
pub use engine::Engine;
pub use group::Group;
pub use handle::{EngineStats, PollOutcome, RequestHandle};

pub use feio_core::{
    FeioError, FeioResult, FinishOutcome, OpCode, Payload, Priority, Request, RequestId,
};
pub use feio_ops::FsExecutor;

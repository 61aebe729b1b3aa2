//! # feio-core — trait definitions and value types for the feio engine
//!
//! This crate defines the data model shared by every other `feio-*` crate:
//! the [`Request`] value object, its [`OpCode`] and [`Priority`], the
//! shared [`RequestFlags`] bitset, and the [`GroupSink`] trait that lets
//! `feio-group` hook into request completion without `feio-core` knowing
//! anything about groups.
//!
//! ## Design principle
//!
//! Every component of feio depends on the types in this crate, never on
//! each other's concrete internals. The engine, the pool, and the group
//! coordinator are wired together at the top level (`feio`), not here.

pub mod error;
pub mod executor;
pub mod flags;
pub mod group_sink;
pub mod opcode;
pub mod payload;
pub mod priority;
pub mod request;
pub mod stat;

pub use error::{FeioError, FeioResult};
pub use executor::{Executor, Scratch};
pub use flags::RequestFlags;
pub use group_sink::{GroupQuery, GroupSink};
pub use opcode::OpCode;
pub use payload::Payload;
pub use priority::{Priority, NUM_PRIORITIES, PRI_MAX, PRI_MIN};
pub use request::{FinishOutcome, Request, RequestId};
pub use stat::FileStat;

//! Owned payload carried in a request's `payload1`/`payload2` slots.
//!
//! `spec.md` §9 notes that the safer replacement for `libeio`'s raw
//! `ptr1`/`ptr2` plus ownership flags is "owned byte-sequence handles
//! carried by a tagged variant over opcodes". `Payload` is that variant.
//! Ownership is automatic (it's a normal Rust value, dropped with the
//! `Request`); `RequestFlags::PTR1_OWNED`/`PTR2_OWNED` are retained on the
//! request only for API parity with `spec.md`'s literal data model.

use crate::stat::FileStat;
use std::any::Any;
use std::ffi::OsString;
use std::path::PathBuf;

pub enum Payload {
    Path(PathBuf),
    Buffer(Vec<u8>),
    DirEntries(Vec<OsString>),
    Stat(FileStat),
    /// Escape hatch for `Custom` requests and anything else that doesn't
    /// fit the built-in shapes above.
    Other(Box<dyn Any + Send>),
}

impl Payload {
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Payload::Path(p) => Some(p.as_path()),
            _ => None,
        }
    }

    pub fn buffer(&self) -> Option<&[u8]> {
        match self {
            Payload::Buffer(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    pub fn buffer_mut(&mut self) -> Option<&mut Vec<u8>> {
        match self {
            Payload::Buffer(b) => Some(b),
            _ => None,
        }
    }

    pub fn into_buffer(self) -> Option<Vec<u8>> {
        match self {
            Payload::Buffer(b) => Some(b),
            _ => None,
        }
    }

    pub fn stat(&self) -> Option<&FileStat> {
        match self {
            Payload::Stat(s) => Some(s),
            _ => None,
        }
    }

    pub fn dir_entries(&self) -> Option<&[OsString]> {
        match self {
            Payload::DirEntries(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Payload::Buffer(b) => f.debug_tuple("Buffer").field(&b.len()).finish(),
            Payload::DirEntries(v) => f.debug_tuple("DirEntries").field(&v.len()).finish(),
            Payload::Stat(s) => f.debug_tuple("Stat").field(s).finish(),
            Payload::Other(_) => f.write_str("Other(..)"),
        }
    }
}

//! Opcodes — tags selecting which blocking operation a worker executes.
//!
//! Grounded on `libeio`'s `EIO_*` opcode enumeration
//! (`examples/original_source/eio.c`), trimmed of the genuinely
//! platform-marginal entries (`EIO_MLOCK`/`EIO_MLOCKALL`, see DESIGN.md)
//! and with `Busy` added as the engine-core test harness's synthetic
//! long-running opcode (`spec.md` §8's scenarios 3 and 6 call it BUSY).

/// Which blocking operation a worker should run for a request.
///
/// `Quit` is the internal sentinel from `spec.md` §3: pushed at highest
/// priority to retire a worker. It never reaches the result queue
/// (`spec.md` invariant 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    /// Internal: instructs the worker that dequeues it to exit.
    Quit,

    /// No-op. `result == 0`, `errorno == None` unconditionally.
    Nop,
    /// Sleeps for `seconds1` inside a worker. Used to simulate long-running
    /// work in tests (`spec.md` §8 scenarios 3, 6) without depending on a
    /// real slow filesystem.
    Busy,
    /// Runs a user-supplied closure in `feed` on a worker thread.
    Custom,
    /// Composite request with no execute step of its own; see `feio-group`.
    Group,

    Open,
    Close,
    Read,
    Write,
    ReadAhead,
    Sync,
    FSync,
    FDataSync,
    SyncFs,

    Stat,
    LStat,
    FStat,
    StatVfs,
    FStatVfs,
    Truncate,
    FTruncate,
    Chmod,
    FChmod,
    Chown,
    FChown,

    Unlink,
    Rmdir,
    Mkdir,
    Rename,
    Link,
    Symlink,
    Readlink,
    Realpath,
    ReadDir,

    Utime,
    Futime,

    SendFile,
    MSync,
    MTouch,
}

impl OpCode {
    /// Whether this opcode takes two path-shaped payload slots
    /// (`payload1`/`payload2` both own a path), per `spec.md` §4.7.
    pub fn is_two_path(self) -> bool {
        matches!(self, OpCode::Rename | OpCode::Link | OpCode::Symlink)
    }

    /// Whether this opcode's first payload slot is a path.
    pub fn takes_path(self) -> bool {
        matches!(
            self,
            OpCode::Open
                | OpCode::Stat
                | OpCode::LStat
                | OpCode::StatVfs
                | OpCode::Truncate
                | OpCode::Chmod
                | OpCode::Chown
                | OpCode::Unlink
                | OpCode::Rmdir
                | OpCode::Mkdir
                | OpCode::Rename
                | OpCode::Link
                | OpCode::Symlink
                | OpCode::Readlink
                | OpCode::Realpath
                | OpCode::ReadDir
                | OpCode::Utime
        ) || self.is_two_path()
    }
}

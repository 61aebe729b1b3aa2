//! The remaining opcodes that don't fit a family: `SendFile`'s manual
//! copy loop, `MSync`/`MTouch`'s best-effort stubs, and the engine-core
//! synthetic opcodes (`Nop`/`Busy`/`Custom`/`Group`/`Quit`) that never
//! reach a real syscall.

use crate::result::{fail_last_os_error, ok};
use feio_core::{OpCode, Request, Scratch};
use std::os::raw::c_int;
use std::time::Duration;

/// `int1` out fd, `int2` in fd, `offset` the in-file offset, `size` the
/// byte count. Emulated with a `pread`/`write` copy loop through the
/// worker's scratch buffer, matching `eio.c`'s non-`sendfile(2)` fallback
/// path (`eio__sendfile`'s `#else` branch) rather than the Linux
/// `sendfile(2)` fast path, since the fallback is the one that works
/// identically across every target this crate builds for.
pub fn sendfile_req(req: &mut Request, scratch: &mut Scratch) {
    let out_fd = req.int1 as c_int;
    let in_fd = req.int2 as c_int;
    let mut offset = req.offset as libc::off_t;
    let mut remaining = req.size as usize;
    let mut copied: i64 = 0;
    const CHUNK: usize = 64 * 1024;

    while remaining > 0 {
        let len = remaining.min(CHUNK);
        let buf = scratch.buffer_mut(len);
        let n = unsafe {
            libc::pread(in_fd, buf.as_mut_ptr() as *mut libc::c_void, len, offset)
        };
        if n < 0 {
            return fail_last_os_error(req);
        }
        if n == 0 {
            break;
        }
        let mut written = 0usize;
        while written < n as usize {
            let w = unsafe {
                libc::write(
                    out_fd,
                    buf[written..n as usize].as_ptr() as *const libc::c_void,
                    n as usize - written,
                )
            };
            if w < 0 {
                return fail_last_os_error(req);
            }
            written += w as usize;
        }
        offset += n as libc::off_t;
        remaining -= n as usize;
        copied += n as i64;
    }
    ok(req, copied);
}

/// Host-owned in-memory range sync. `feio-core`'s payload model keeps no
/// raw pointer into host memory (`spec.md`'s "user buffer memory
/// ownership beyond a release-on-destroy flag" is out of scope), so this
/// is a best-effort no-op: the real `msync(2)`/touch semantics require a
/// `mmap`'d address this crate is never handed.
pub fn msync_req(req: &mut Request) {
    ok(req, 0);
}

pub fn mtouch_req(req: &mut Request) {
    ok(req, 0);
}

pub fn nop_req(req: &mut Request) {
    ok(req, 0);
}

pub fn busy_req(req: &mut Request) {
    std::thread::sleep(Duration::from_secs_f64(req.seconds1.max(0.0)));
    ok(req, 0);
}

/// Runs the user's feeder once as the execute step, then drops it so it
/// isn't invoked again by a group feeder pass (`eio.c`'s `EIO_CUSTOM`
/// case: `req->feed (req)`, unconditionally, every time it's scheduled).
pub fn custom_req(req: &mut Request) {
    req.run_feed();
    req.clear_feed();
    ok(req, 0);
}

/// `Group` requests never reach a worker in normal operation (a group
/// with only children has its own opcode skipped for execution by
/// `feio-group`); keep a harmless no-op here rather than panicking, in
/// case a group is ever submitted directly.
pub fn group_req(req: &mut Request) {
    ok(req, 0);
}

pub fn quit_unreachable(req: &Request) {
    debug_assert!(
        !matches!(req.opcode, OpCode::Quit),
        "Quit must be intercepted by the worker loop before execute"
    );
}

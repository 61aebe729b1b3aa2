//! Result/errno capture discipline — `SPEC_FULL.md` §3: captured inside
//! the worker, immediately after the call that can fail, since a thread
//! park/unpark between the call and the capture is permitted to clobber
//! `errno` on some platforms (`eio.c` carries the same caveat for its own
//! `errno` handling around condition-variable waits).

use feio_core::Request;

pub fn ok(req: &mut Request, value: i64) {
    req.result = value;
    req.errorno = None;
}

pub fn fail_errno(req: &mut Request, errno: i32) {
    req.result = -1;
    req.errorno = Some(errno);
}

/// Captures `errno` via `std::io::Error::last_os_error()` — must be
/// called immediately after the failing libc call, before any other
/// fallible operation.
pub fn fail_last_os_error(req: &mut Request) {
    fail_errno(req, std::io::Error::last_os_error().raw_os_error().unwrap_or(libc::EIO));
}

pub fn from_io<T>(req: &mut Request, result: std::io::Result<T>, on_ok: impl FnOnce(T) -> i64) {
    match result {
        Ok(v) => ok(req, on_ok(v)),
        Err(e) => fail_errno(req, e.raw_os_error().unwrap_or(libc::EIO)),
    }
}

/// Runs a raw libc call (`-1` on failure, errno set) and records the
/// outcome.
pub fn from_libc_ret(req: &mut Request, ret: libc::c_long) {
    if ret < 0 {
        fail_last_os_error(req);
    } else {
        ok(req, ret as i64);
    }
}

//! Utime/futime family — grounded on `eio.c`'s shared `EIO_UTIME`/
//! `EIO_FUTIME` case: `seconds1`/`seconds2` are access/modification time
//! in seconds since the epoch, and the sentinel pair `(-1.0, -1.0)` means
//! "set both to now" (passes a null `timeval` array to `utimes`).
//!
//! `SPEC_FULL.md` §9's open question ("treat UTIME/FUTIME as terminal, do
//! not guess") is honored literally: there is no portable fallback here,
//! only the platform-gated ENOSYS path `eio.c` itself uses for `futimes`.

use crate::result::{fail_errno, fail_last_os_error, ok};
use feio_core::{Payload, Request};
use std::os::raw::c_int;

fn timeval_pair(seconds1: f64, seconds2: f64) -> Option<[libc::timeval; 2]> {
    if seconds1 == -1.0 && seconds2 == -1.0 {
        return None;
    }
    let to_tv = |s: f64| libc::timeval {
        tv_sec: s.trunc() as libc::time_t,
        tv_usec: ((s - s.trunc()) * 1_000_000.0) as libc::suseconds_t,
    };
    Some([to_tv(seconds1), to_tv(seconds2)])
}

pub fn utime_req(req: &mut Request) {
    let Some(path) = req.payload1.as_ref().and_then(Payload::path).map(|p| p.to_path_buf())
    else {
        return fail_errno(req, libc::EINVAL);
    };
    let Some(cpath) = crate::path_util::to_cstring(&path) else {
        return fail_errno(req, libc::EINVAL);
    };
    let times = timeval_pair(req.seconds1, req.seconds2);
    let ptr = times.as_ref().map_or(std::ptr::null(), |t| t.as_ptr());
    let ret = unsafe { libc::utimes(cpath.as_ptr(), ptr) };
    if ret < 0 {
        fail_last_os_error(req);
    } else {
        ok(req, 0);
    }
}

#[cfg(target_os = "linux")]
pub fn futime_req(req: &mut Request) {
    let times = timeval_pair(req.seconds1, req.seconds2);
    let ptr = times.as_ref().map_or(std::ptr::null(), |t| t.as_ptr());
    let ret = unsafe { libc::futimes(req.int1 as c_int, ptr) };
    if ret < 0 {
        fail_last_os_error(req);
    } else {
        ok(req, 0);
    }
}

/// `eio.c` stubs `eio__futimes` with `errno = ENOSYS` on platforms that
/// never had BSD `futimes`; no portable equivalent exists that `eio.c`
/// itself trusts, so this crate doesn't guess one either.
#[cfg(not(target_os = "linux"))]
pub fn futime_req(req: &mut Request) {
    fail_errno(req, libc::ENOSYS);
}

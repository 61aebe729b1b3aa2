//! Open/close/read/write/sync family — grounded on `eio.c`'s
//! `EIO_OPEN`/`EIO_CLOSE`/`EIO_READ`/`EIO_WRITE`/`EIO_READAHEAD`/
//! `EIO_(F)SYNC(FS|DATA)` cases, and the teacher's
//! `ksvc-module::fixed_pool::execute_syscall` raw-libc-call-plus-errno
//! style.

use crate::result::{fail_errno, fail_last_os_error, ok};
use feio_core::{Payload, Request, Scratch};
use std::os::raw::c_int;

/// `int1` carries raw `O_*` flags, `int2` the creation mode, `payload1`
/// the path (`spec.md` §4.7's "path is duplicated and `PTR1_OWNED` set").
pub fn open_req(req: &mut Request) {
    let Some(path) = req.payload1.as_ref().and_then(Payload::path) else {
        return fail_errno(req, libc::EINVAL);
    };
    let Some(cpath) = crate::path_util::to_cstring(path) else {
        return fail_errno(req, libc::EINVAL);
    };
    let fd = unsafe { libc::open(cpath.as_ptr(), req.int1 as c_int, req.int2 as libc::mode_t) };
    if fd < 0 {
        fail_last_os_error(req);
    } else {
        ok(req, fd as i64);
    }
}

/// `int1` is the fd to close.
pub fn close_req(req: &mut Request) {
    let ret = unsafe { libc::close(req.int1 as c_int) };
    if ret < 0 {
        fail_last_os_error(req);
    } else {
        ok(req, 0);
    }
}

/// `int1` fd, `offset`/`size` the range; fills `payload1` with the bytes
/// read on success.
pub fn read_req(req: &mut Request) {
    let fd = req.int1 as c_int;
    let mut buf = vec![0u8; req.size as usize];
    let n = unsafe {
        libc::pread(
            fd,
            buf.as_mut_ptr() as *mut libc::c_void,
            buf.len(),
            req.offset as libc::off_t,
        )
    };
    if n < 0 {
        fail_last_os_error(req);
    } else {
        buf.truncate(n as usize);
        req.payload1 = Some(Payload::Buffer(buf));
        ok(req, n as i64);
    }
}

/// `int1` fd, `offset` the position, `payload1` the bytes to write.
pub fn write_req(req: &mut Request) {
    let fd = req.int1 as c_int;
    let Some(buf) = req.payload1.as_ref().and_then(Payload::buffer) else {
        return fail_errno(req, libc::EINVAL);
    };
    let n = unsafe {
        libc::pwrite(
            fd,
            buf.as_ptr() as *const libc::c_void,
            buf.len(),
            req.offset as libc::off_t,
        )
    };
    if n < 0 {
        fail_last_os_error(req);
    } else {
        ok(req, n as i64);
    }
}

/// Emulated readahead (`eio.c`'s `eio__readahead` fallback): sequential
/// reads into the worker's scratch buffer, discarded. `int1` fd,
/// `offset`/`size` the range.
pub fn readahead_req(req: &mut Request, scratch: &mut Scratch) {
    let fd = req.int1 as c_int;
    let mut remaining = req.size as usize;
    let mut offset = req.offset as libc::off_t;
    const CHUNK: usize = 64 * 1024;

    while remaining > 0 {
        let len = remaining.min(CHUNK);
        let buf = scratch.buffer_mut(len);
        let n = unsafe {
            libc::pread(fd, buf.as_mut_ptr() as *mut libc::c_void, len, offset)
        };
        if n < 0 {
            return fail_last_os_error(req);
        }
        if n == 0 {
            break;
        }
        offset += n as libc::off_t;
        remaining -= n as usize;
    }
    ok(req, req.size as i64);
}

pub fn sync_req(req: &mut Request) {
    unsafe { libc::sync() };
    ok(req, 0);
}

pub fn fsync_req(req: &mut Request) {
    let ret = unsafe { libc::fsync(req.int1 as c_int) };
    if ret < 0 {
        fail_last_os_error(req);
    } else {
        ok(req, 0);
    }
}

pub fn fdatasync_req(req: &mut Request) {
    #[cfg(target_os = "linux")]
    let ret = unsafe { libc::fdatasync(req.int1 as c_int) };
    #[cfg(not(target_os = "linux"))]
    let ret = unsafe { libc::fsync(req.int1 as c_int) };

    if ret < 0 {
        fail_last_os_error(req);
    } else {
        ok(req, 0);
    }
}

pub fn syncfs_req(req: &mut Request) {
    #[cfg(target_os = "linux")]
    {
        let ret = unsafe { libc::syscall(libc::SYS_syncfs, req.int1 as c_int) };
        if ret < 0 {
            fail_last_os_error(req);
        } else {
            ok(req, 0);
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        fsync_req(req);
    }
}

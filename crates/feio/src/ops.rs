//! Per-opcode request builders — `spec.md` §4.7: one constructor per
//! syscall family, setting the same `int`/`offset`/`size`/`payload` slots
//! `feio-ops` reads back out on the worker side.

use feio_core::request::FeedFn;
use feio_core::{OpCode, Payload, Priority, Request};
use std::path::PathBuf;

fn req(opcode: OpCode, priority: Priority) -> Request {
    Request::new(opcode, priority)
}

pub fn open(path: PathBuf, flags: i32, mode: u32, priority: Priority) -> Request {
    let mut r = req(OpCode::Open, priority);
    r.set_path1(path);
    r.int1 = flags as i64;
    r.int2 = mode as i64;
    r
}

pub fn close(fd: i32, priority: Priority) -> Request {
    let mut r = req(OpCode::Close, priority);
    r.int1 = fd as i64;
    r
}

pub fn read(fd: i32, offset: i64, size: u64, priority: Priority) -> Request {
    let mut r = req(OpCode::Read, priority);
    r.int1 = fd as i64;
    r.offset = offset;
    r.size = size;
    r
}

pub fn write(fd: i32, offset: i64, data: Vec<u8>, priority: Priority) -> Request {
    let mut r = req(OpCode::Write, priority);
    r.int1 = fd as i64;
    r.offset = offset;
    r.payload1 = Some(Payload::Buffer(data));
    r
}

pub fn readahead(fd: i32, offset: i64, size: u64, priority: Priority) -> Request {
    let mut r = req(OpCode::ReadAhead, priority);
    r.int1 = fd as i64;
    r.offset = offset;
    r.size = size;
    r
}

pub fn sync(priority: Priority) -> Request {
    req(OpCode::Sync, priority)
}

pub fn fsync(fd: i32, priority: Priority) -> Request {
    let mut r = req(OpCode::FSync, priority);
    r.int1 = fd as i64;
    r
}

pub fn fdatasync(fd: i32, priority: Priority) -> Request {
    let mut r = req(OpCode::FDataSync, priority);
    r.int1 = fd as i64;
    r
}

pub fn syncfs(fd: i32, priority: Priority) -> Request {
    let mut r = req(OpCode::SyncFs, priority);
    r.int1 = fd as i64;
    r
}

pub fn stat(path: PathBuf, priority: Priority) -> Request {
    let mut r = req(OpCode::Stat, priority);
    r.set_path1(path);
    r
}

pub fn lstat(path: PathBuf, priority: Priority) -> Request {
    let mut r = req(OpCode::LStat, priority);
    r.set_path1(path);
    r
}

pub fn fstat(fd: i32, priority: Priority) -> Request {
    let mut r = req(OpCode::FStat, priority);
    r.int1 = fd as i64;
    r
}

pub fn statvfs(path: PathBuf, priority: Priority) -> Request {
    let mut r = req(OpCode::StatVfs, priority);
    r.set_path1(path);
    r
}

pub fn fstatvfs(fd: i32, priority: Priority) -> Request {
    let mut r = req(OpCode::FStatVfs, priority);
    r.int1 = fd as i64;
    r
}

pub fn truncate(path: PathBuf, size: u64, priority: Priority) -> Request {
    let mut r = req(OpCode::Truncate, priority);
    r.set_path1(path);
    r.size = size;
    r
}

pub fn ftruncate(fd: i32, size: u64, priority: Priority) -> Request {
    let mut r = req(OpCode::FTruncate, priority);
    r.int1 = fd as i64;
    r.size = size;
    r
}

pub fn chmod(path: PathBuf, mode: u32, priority: Priority) -> Request {
    let mut r = req(OpCode::Chmod, priority);
    r.set_path1(path);
    r.int1 = mode as i64;
    r
}

pub fn fchmod(fd: i32, mode: u32, priority: Priority) -> Request {
    let mut r = req(OpCode::FChmod, priority);
    r.int1 = fd as i64;
    r.int2 = mode as i64;
    r
}

pub fn chown(path: PathBuf, uid: u32, gid: u32, priority: Priority) -> Request {
    let mut r = req(OpCode::Chown, priority);
    r.set_path1(path);
    r.int1 = uid as i64;
    r.int2 = gid as i64;
    r
}

pub fn fchown(fd: i32, uid: u32, gid: u32, priority: Priority) -> Request {
    let mut r = req(OpCode::FChown, priority);
    r.int1 = fd as i64;
    r.int2 = uid as i64;
    r.int3 = gid as i64;
    r
}

pub fn unlink(path: PathBuf, priority: Priority) -> Request {
    let mut r = req(OpCode::Unlink, priority);
    r.set_path1(path);
    r
}

pub fn rmdir(path: PathBuf, priority: Priority) -> Request {
    let mut r = req(OpCode::Rmdir, priority);
    r.set_path1(path);
    r
}

pub fn mkdir(path: PathBuf, mode: u32, priority: Priority) -> Request {
    let mut r = req(OpCode::Mkdir, priority);
    r.set_path1(path);
    r.int1 = mode as i64;
    r
}

pub fn rename(from: PathBuf, to: PathBuf, priority: Priority) -> Request {
    let mut r = req(OpCode::Rename, priority);
    r.set_path1(from);
    r.set_path2(to);
    r
}

pub fn link(from: PathBuf, to: PathBuf, priority: Priority) -> Request {
    let mut r = req(OpCode::Link, priority);
    r.set_path1(from);
    r.set_path2(to);
    r
}

pub fn symlink(target: PathBuf, link_path: PathBuf, priority: Priority) -> Request {
    let mut r = req(OpCode::Symlink, priority);
    r.set_path1(target);
    r.set_path2(link_path);
    r
}

pub fn readlink(path: PathBuf, priority: Priority) -> Request {
    let mut r = req(OpCode::Readlink, priority);
    r.set_path1(path);
    r
}

pub fn realpath(path: PathBuf, priority: Priority) -> Request {
    let mut r = req(OpCode::Realpath, priority);
    r.set_path1(path);
    r
}

pub fn readdir(path: PathBuf, priority: Priority) -> Request {
    let mut r = req(OpCode::ReadDir, priority);
    r.set_path1(path);
    r
}

/// `seconds1`/`seconds2` are access/modification time; pass `(-1.0, -1.0)`
/// for "set both to now" (`spec.md` §4.7).
pub fn utime(path: PathBuf, atime: f64, mtime: f64, priority: Priority) -> Request {
    let mut r = req(OpCode::Utime, priority);
    r.set_path1(path);
    r.seconds1 = atime;
    r.seconds2 = mtime;
    r
}

pub fn futime(fd: i32, atime: f64, mtime: f64, priority: Priority) -> Request {
    let mut r = req(OpCode::Futime, priority);
    r.int1 = fd as i64;
    r.seconds1 = atime;
    r.seconds2 = mtime;
    r
}

pub fn sendfile(out_fd: i32, in_fd: i32, offset: i64, size: u64, priority: Priority) -> Request {
    let mut r = req(OpCode::SendFile, priority);
    r.int1 = out_fd as i64;
    r.int2 = in_fd as i64;
    r.offset = offset;
    r.size = size;
    r
}

pub fn msync(priority: Priority) -> Request {
    req(OpCode::MSync, priority)
}

pub fn mtouch(priority: Priority) -> Request {
    req(OpCode::MTouch, priority)
}

pub fn nop(priority: Priority) -> Request {
    req(OpCode::Nop, priority)
}

pub fn busy(seconds: f64, priority: Priority) -> Request {
    let mut r = req(OpCode::Busy, priority);
    r.seconds1 = seconds;
    r
}

/// `eio_custom`: the worker runs `body` once, on a worker thread, then
/// drops it (`spec.md` §4.7's "custom" entry).
pub fn custom(body: FeedFn, priority: Priority) -> Request {
    req(OpCode::Custom, priority).with_feed(body)
}

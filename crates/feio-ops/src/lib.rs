//! The opaque execute step (`SPEC_FULL.md` §1) over blocking OS calls.
//! `feio-core` defines the [`feio_core::Executor`] seam; this crate is its
//! real implementation, split into opcode families the way `eio.c`'s own
//! giant `switch` groups cases by resource kind.

mod dir_family;
mod fs_family;
mod meta_family;
mod misc;
mod path_util;
mod result;
mod time_family;

pub use meta_family::FsCapacity;

use feio_core::{Executor, OpCode, Request, Scratch};

/// The engine's default [`Executor`]: every opcode dispatches to a real
/// blocking syscall (or, for `Custom`/`Nop`/`Busy`/`Group`, the
/// engine-core synthetic behavior `eio.c` itself special-cases in the
/// same `switch`).
#[derive(Debug, Default)]
pub struct FsExecutor;

impl Executor for FsExecutor {
    fn execute(&self, scratch: &mut Scratch, req: &mut Request) {
        match req.opcode {
            OpCode::Quit => misc::quit_unreachable(req),
            OpCode::Nop => misc::nop_req(req),
            OpCode::Busy => misc::busy_req(req),
            OpCode::Custom => misc::custom_req(req),
            OpCode::Group => misc::group_req(req),

            OpCode::Open => fs_family::open_req(req),
            OpCode::Close => fs_family::close_req(req),
            OpCode::Read => fs_family::read_req(req),
            OpCode::Write => fs_family::write_req(req),
            OpCode::ReadAhead => fs_family::readahead_req(req, scratch),
            OpCode::Sync => fs_family::sync_req(req),
            OpCode::FSync => fs_family::fsync_req(req),
            OpCode::FDataSync => fs_family::fdatasync_req(req),
            OpCode::SyncFs => fs_family::syncfs_req(req),

            OpCode::Stat => meta_family::stat_req(req),
            OpCode::LStat => meta_family::lstat_req(req),
            OpCode::FStat => meta_family::fstat_req(req),
            OpCode::StatVfs => meta_family::statvfs_req(req),
            OpCode::FStatVfs => meta_family::fstatvfs_req(req),
            OpCode::Truncate => meta_family::truncate_req(req),
            OpCode::FTruncate => meta_family::ftruncate_req(req),
            OpCode::Chmod => meta_family::chmod_req(req),
            OpCode::FChmod => meta_family::fchmod_req(req),
            OpCode::Chown => meta_family::chown_req(req),
            OpCode::FChown => meta_family::fchown_req(req),

            OpCode::Unlink => dir_family::unlink_req(req),
            OpCode::Rmdir => dir_family::rmdir_req(req),
            OpCode::Mkdir => dir_family::mkdir_req(req),
            OpCode::Rename => dir_family::rename_req(req),
            OpCode::Link => dir_family::link_req(req),
            OpCode::Symlink => dir_family::symlink_req(req),
            OpCode::Readlink => dir_family::readlink_req(req),
            OpCode::Realpath => dir_family::realpath_req(req),
            OpCode::ReadDir => dir_family::readdir_req(req),

            OpCode::Utime => time_family::utime_req(req),
            OpCode::Futime => time_family::futime_req(req),

            OpCode::SendFile => misc::sendfile_req(req, scratch),
            OpCode::MSync => misc::msync_req(req),
            OpCode::MTouch => misc::mtouch_req(req),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feio_core::{Payload, Priority};
    use std::io::Write as _;

    fn run(req: &mut Request) {
        let mut scratch = Scratch::new();
        FsExecutor.execute(&mut scratch, req);
    }

    #[test]
    fn nop_always_succeeds() {
        let mut req = Request::new(OpCode::Nop, Priority::default());
        run(&mut req);
        assert_eq!(req.result, 0);
        assert_eq!(req.errorno, None);
    }

    #[test]
    fn open_missing_file_reports_enoent() {
        let mut req = Request::new(OpCode::Open, Priority::default());
        req.set_path1(std::path::PathBuf::from("/nonexistent/feio-test-path"));
        req.int1 = libc::O_RDONLY as i64;
        run(&mut req);
        assert_eq!(req.result, -1);
        assert_eq!(req.errorno, Some(libc::ENOENT));
    }

    #[test]
    fn write_then_read_roundtrip() {
        let tmp = tempfile_path();
        let mut req = Request::new(OpCode::Open, Priority::default());
        req.set_path1(tmp.clone());
        req.int1 = (libc::O_RDWR | libc::O_CREAT | libc::O_TRUNC) as i64;
        req.int2 = 0o600;
        run(&mut req);
        assert_eq!(req.errorno, None);
        let fd = req.result as i32;

        let mut wreq = Request::new(OpCode::Write, Priority::default());
        wreq.int1 = fd as i64;
        wreq.offset = 0;
        wreq.payload1 = Some(Payload::Buffer(b"hello feio".to_vec()));
        run(&mut wreq);
        assert_eq!(wreq.result, 10);

        let mut rreq = Request::new(OpCode::Read, Priority::default());
        rreq.int1 = fd as i64;
        rreq.offset = 0;
        rreq.size = 10;
        run(&mut rreq);
        assert_eq!(rreq.result, 10);
        assert_eq!(rreq.payload1.as_ref().and_then(Payload::buffer), Some(&b"hello feio"[..]));

        let mut creq = Request::new(OpCode::Close, Priority::default());
        creq.int1 = fd as i64;
        run(&mut creq);
        std::fs::remove_file(&tmp).ok();
    }

    #[test]
    fn stat_reports_regular_file() {
        let tmp = tempfile_path();
        std::fs::File::create(&tmp).unwrap().write_all(b"x").unwrap();
        let mut req = Request::new(OpCode::Stat, Priority::default());
        req.set_path1(tmp.clone());
        run(&mut req);
        let stat = req.payload2.as_ref().and_then(Payload::stat).unwrap();
        assert!(stat.is_file);
        assert_eq!(stat.size, 1);
        std::fs::remove_file(&tmp).ok();
    }

    #[test]
    fn mkdir_rmdir_roundtrip() {
        let dir = tempfile_path();
        let mut req = Request::new(OpCode::Mkdir, Priority::default());
        req.set_path1(dir.clone());
        req.int1 = 0o700;
        run(&mut req);
        assert_eq!(req.errorno, None);
        assert!(dir.is_dir());

        let mut rm = Request::new(OpCode::Rmdir, Priority::default());
        rm.set_path1(dir.clone());
        run(&mut rm);
        assert_eq!(rm.errorno, None);
        assert!(!dir.exists());
    }

    #[test]
    fn busy_sleeps_for_requested_duration() {
        let mut req = Request::new(OpCode::Busy, Priority::default());
        req.seconds1 = 0.01;
        let start = std::time::Instant::now();
        run(&mut req);
        assert!(start.elapsed() >= Duration::from_millis(9));
    }

    use std::time::Duration;

    fn tempfile_path() -> std::path::PathBuf {
        let pid = std::process::id();
        let n = std::sync::atomic::AtomicU64::new(0).fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        std::env::temp_dir().join(format!("feio-ops-test-{pid}-{n}-{:?}", std::thread::current().id()))
    }
}

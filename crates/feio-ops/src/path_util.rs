//! Path ↔ `CString` conversion for the handful of opcodes that call
//! libc directly instead of going through `std::fs`.

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

pub fn to_cstring(path: &Path) -> Option<CString> {
    CString::new(path.as_os_str().as_bytes()).ok()
}

//! Fork handler — `spec.md` §4.6, grounded on `eio.c`'s
//! `pthread_atfork` registration.
//!
//! `eio.c` holds `wrklock`/`reqlock`/`reslock` across the actual `fork()`
//! syscall, which POSIX's `pthread_atfork` contract allows because it
//! cooperates directly with the C runtime's mutex implementation. Rust's
//! `std::sync::Mutex` makes no such promise (it isn't guaranteed to be a
//! raw `pthread_mutex_t`), and safely extending a `MutexGuard`'s lifetime
//! across an FFI callback boundary would require unsafe lifetime
//! extension with no precedent elsewhere in this codebase. `prepare`
//! instead establishes a best-effort quiescent point immediately before
//! `fork()` by acquiring and releasing all three locks in order; the real
//! correctness-bearing work is the child handler, which rebuilds the
//! engine into a valid empty state (`spec.md` §4.6 steps 1–5) regardless
//! of what the parent was doing at the moment of fork.

use std::sync::{Mutex, OnceLock, Weak};

/// Implemented by `feio-pool::Pool<E>`. `feio-pool` never names a
/// concrete engine type in the registry, only this trait object.
pub trait ForkAware: Send + Sync {
    fn fork_prepare(&self);
    fn fork_parent(&self);
    fn fork_child(&self);
}

fn registry() -> &'static Mutex<Vec<Weak<dyn ForkAware>>> {
    static REGISTRY: OnceLock<Mutex<Vec<Weak<dyn ForkAware>>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(Vec::new()))
}

/// Registers `engine` to participate in fork handling and installs the
/// process-wide `pthread_atfork` hooks on first call
/// (`spec.md` §4.6: "auto-installs ... exactly once").
pub fn register(engine: Weak<dyn ForkAware>) {
    install_once();
    registry().lock().unwrap().push(engine);
}

fn install_once() {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(install);
}

#[cfg(unix)]
fn install() {
    unsafe {
        libc::pthread_atfork(Some(on_prepare), Some(on_parent), Some(on_child));
    }
}

#[cfg(not(unix))]
fn install() {}

fn for_each_engine(f: impl Fn(&dyn ForkAware)) {
    let engines = registry().lock().unwrap();
    for weak in engines.iter() {
        if let Some(engine) = weak.upgrade() {
            f(engine.as_ref());
        }
    }
}

extern "C" fn on_prepare() {
    for_each_engine(|e: &dyn ForkAware| e.fork_prepare());
}

extern "C" fn on_parent() {
    for_each_engine(|e: &dyn ForkAware| e.fork_parent());
}

extern "C" fn on_child() {
    for_each_engine(|e: &dyn ForkAware| e.fork_child());
}

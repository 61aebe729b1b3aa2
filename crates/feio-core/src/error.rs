//! feio error type — a thin domain wrapper over [`gerror::GError`].

use gerror::codes::feio::{
    ERR_FEIO_FEEDER_CAP, ERR_FEIO_GROUP_FINISHED, ERR_FEIO_INVALID_CONFIG,
    ERR_FEIO_POOL_EXHAUSTED, ERR_FEIO_SPAWN_FAILED, SUB_FEIO_CONFIG, SUB_FEIO_FEEDER,
    SUB_FEIO_FORK, SUB_FEIO_WORKER, SYS_FEIO_ENGINE, SYS_FEIO_GROUP, SYS_FEIO_POOL,
};
use gerror::{err, GError};
use std::fmt;

/// Domain error for every fallible feio operation that isn't a per-request
/// OS error (those are carried as `result`/`errorno` on the `Request`
/// itself, per `spec.md` §6/§7).
#[derive(Debug)]
pub struct FeioError(GError);

pub type FeioResult<T> = Result<T, FeioError>;

impl FeioError {
    pub fn spawn_failed(reason: impl std::fmt::Display) -> Self {
        Self(err!(
            SYS_FEIO_POOL,
            SUB_FEIO_WORKER,
            ERR_FEIO_SPAWN_FAILED,
            gerror::GlobalId::UNSET,
            format!("worker spawn failed: {reason}")
        ))
    }

    pub fn pool_exhausted() -> Self {
        Self(GError::simple(
            SYS_FEIO_POOL,
            ERR_FEIO_POOL_EXHAUSTED,
            gerror::GlobalId::UNSET,
        ))
    }

    pub fn group_already_finished() -> Self {
        Self(err!(
            SYS_FEIO_GROUP,
            SUB_FEIO_FEEDER,
            ERR_FEIO_GROUP_FINISHED,
            gerror::GlobalId::UNSET,
            "attempted to mutate a group that has already finished"
        ))
    }

    pub fn feeder_cap_exceeded(limit: usize) -> Self {
        Self(err!(
            SYS_FEIO_ENGINE,
            SUB_FEIO_FEEDER,
            ERR_FEIO_FEEDER_CAP,
            gerror::GlobalId::UNSET,
            format!("group feeder exceeded configured cap of {limit}")
        ))
    }

    pub fn invalid_config(reason: impl std::fmt::Display) -> Self {
        Self(err!(
            SYS_FEIO_ENGINE,
            SUB_FEIO_CONFIG,
            ERR_FEIO_INVALID_CONFIG,
            gerror::GlobalId::UNSET,
            format!("invalid config: {reason}")
        ))
    }

    pub fn fork(reason: impl std::fmt::Display) -> Self {
        Self(err!(
            SYS_FEIO_ENGINE,
            SUB_FEIO_FORK,
            ERR_FEIO_SPAWN_FAILED,
            gerror::GlobalId::UNSET,
            format!("fork handler error: {reason}")
        ))
    }

    pub fn inner(&self) -> &GError {
        &self.0
    }
}

impl fmt::Display for FeioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0.kind())
    }
}

impl std::error::Error for FeioError {}

impl From<GError> for FeioError {
    fn from(e: GError) -> Self {
        Self(e)
    }
}

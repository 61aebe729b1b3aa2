//! Engine configuration — a builder over `spec.md` §4.3's tunables,
//! grounded on `gvthread-runtime::config::SchedulerConfig`'s
//! env-overridable-defaults pattern.

use feio_core::{FeioError, FeioResult};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// `eio.c`'s own compiled-in defaults (`static unsigned int started, idle,
/// wanted = 4;` / `max_idle = 4;`): start with four workers wanted, retire
/// down to four idle before anyone is cut loose.
mod defaults {
    pub const MIN_PARALLEL: usize = 4;
    pub const MAX_IDLE: usize = 4;
    pub const MAX_POLL_REQS: usize = 0;
    pub const DEBUG_LOGGING: bool = false;
}

fn env_get<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

type PollCallback = Arc<dyn Fn() + Send + Sync>;

/// Tunables for one [`crate::Engine`], mirroring `spec.md` §4.3 plus the
/// `want_poll`/`done_poll` host callbacks from §6.
#[derive(Clone)]
pub struct Config {
    pub min_parallel: usize,
    pub max_parallel: Option<usize>,
    pub max_idle: usize,
    pub max_poll_reqs: usize,
    pub max_poll_time: Option<Duration>,
    pub want_poll: Option<PollCallback>,
    pub done_poll: Option<PollCallback>,
    pub debug_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Config {
    /// Compile-time defaults with environment overrides.
    ///
    /// - `FEIO_MIN_PARALLEL` — initial/floor worker count
    /// - `FEIO_MAX_IDLE` — idle workers tolerated before retirement
    /// - `FEIO_MAX_POLL_REQS` — per-`poll` drain budget (0 = unbounded)
    /// - `FEIO_DEBUG` — enable lifecycle logging (0/1)
    pub fn from_env() -> Self {
        Self {
            min_parallel: env_get("FEIO_MIN_PARALLEL", defaults::MIN_PARALLEL),
            max_parallel: None,
            max_idle: env_get("FEIO_MAX_IDLE", defaults::MAX_IDLE),
            max_poll_reqs: env_get("FEIO_MAX_POLL_REQS", defaults::MAX_POLL_REQS),
            max_poll_time: None,
            want_poll: None,
            done_poll: None,
            debug_logging: env_get_bool("FEIO_DEBUG", defaults::DEBUG_LOGGING),
        }
    }

    /// Explicit defaults, no environment lookups. Used by tests that need
    /// reproducible configuration.
    pub fn new() -> Self {
        Self {
            min_parallel: defaults::MIN_PARALLEL,
            max_parallel: None,
            max_idle: defaults::MAX_IDLE,
            max_poll_reqs: defaults::MAX_POLL_REQS,
            max_poll_time: None,
            want_poll: None,
            done_poll: None,
            debug_logging: defaults::DEBUG_LOGGING,
        }
    }

    pub fn min_parallel(mut self, n: usize) -> Self {
        self.min_parallel = n;
        self
    }

    pub fn max_parallel(mut self, n: usize) -> Self {
        self.max_parallel = Some(n);
        self
    }

    pub fn max_idle(mut self, n: usize) -> Self {
        self.max_idle = n;
        self
    }

    pub fn max_poll_reqs(mut self, n: usize) -> Self {
        self.max_poll_reqs = n;
        self
    }

    pub fn max_poll_time(mut self, d: Duration) -> Self {
        self.max_poll_time = Some(d);
        self
    }

    pub fn want_poll(mut self, cb: impl Fn() + Send + Sync + 'static) -> Self {
        self.want_poll = Some(Arc::new(cb));
        self
    }

    pub fn done_poll(mut self, cb: impl Fn() + Send + Sync + 'static) -> Self {
        self.done_poll = Some(Arc::new(cb));
        self
    }

    pub fn debug_logging(mut self, enable: bool) -> Self {
        self.debug_logging = enable;
        self
    }

    /// Rejects configurations that can never make progress.
    pub fn validate(&self) -> FeioResult<()> {
        if let Some(max) = self.max_parallel {
            if max == 0 && self.min_parallel > 0 {
                return Err(FeioError::invalid_config(
                    "max_parallel is 0 but min_parallel is nonzero",
                ));
            }
            if self.min_parallel > max {
                return Err(FeioError::invalid_config("min_parallel exceeds max_parallel"));
            }
        }
        Ok(())
    }

    pub fn print(&self) {
        eprintln!("feio configuration:");
        eprintln!("  min_parallel:   {}", self.min_parallel);
        eprintln!("  max_parallel:   {:?}", self.max_parallel);
        eprintln!("  max_idle:       {}", self.max_idle);
        eprintln!("  max_poll_reqs:  {}", self.max_poll_reqs);
        eprintln!("  max_poll_time:  {:?}", self.max_poll_time);
        eprintln!("  debug_logging:  {}", self.debug_logging);
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("min_parallel", &self.min_parallel)
            .field("max_parallel", &self.max_parallel)
            .field("max_idle", &self.max_idle)
            .field("max_poll_reqs", &self.max_poll_reqs)
            .field("max_poll_time", &self.max_poll_time)
            .field("debug_logging", &self.debug_logging)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_parallel, defaults::MIN_PARALLEL);
    }

    #[test]
    fn builder_overrides_fields() {
        let config = Config::new().min_parallel(2).max_parallel(8).max_idle(1);
        assert_eq!(config.min_parallel, 2);
        assert_eq!(config.max_parallel, Some(8));
        assert_eq!(config.max_idle, 1);
    }

    #[test]
    fn min_exceeding_max_is_invalid() {
        let config = Config::new().min_parallel(10).max_parallel(2);
        assert!(config.validate().is_err());
    }
}

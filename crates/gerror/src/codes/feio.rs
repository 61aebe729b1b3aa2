//! Reserved code namespace for the feio asynchronous filesystem I/O engine.
//!
//! Other projects should not use codes in the 5000–7999 range.

use crate::GlobalId;

// ── Systems (5000–5099) ───────────────────────────────────────────

pub const SYS_FEIO_ENGINE: GlobalId = GlobalId::new("feio_engine", 5001);
pub const SYS_FEIO_POOL:   GlobalId = GlobalId::new("feio_pool", 5002);
pub const SYS_FEIO_GROUP:  GlobalId = GlobalId::new("feio_group", 5003);
pub const SYS_FEIO_OPS:    GlobalId = GlobalId::new("feio_ops", 5004);

// ── Subsystems (5100–5199) ────────────────────────────────────────

pub const SUB_FEIO_QUEUE:  GlobalId = GlobalId::new("feio_queue", 5100);
pub const SUB_FEIO_WORKER: GlobalId = GlobalId::new("feio_worker", 5101);
pub const SUB_FEIO_FORK:   GlobalId = GlobalId::new("feio_fork", 5102);
pub const SUB_FEIO_FEEDER: GlobalId = GlobalId::new("feio_feeder", 5103);
pub const SUB_FEIO_CONFIG: GlobalId = GlobalId::new("feio_config", 5104);

// ── Error codes (6000–6099) ───────────────────────────────────────

pub const ERR_FEIO_SPAWN_FAILED:   GlobalId = GlobalId::new("feio_spawn_failed", 6001);
pub const ERR_FEIO_POOL_EXHAUSTED: GlobalId = GlobalId::new("feio_pool_exhausted", 6002);
pub const ERR_FEIO_GROUP_FINISHED: GlobalId = GlobalId::new("feio_group_finished", 6003);
pub const ERR_FEIO_WOULD_BLOCK:    GlobalId = GlobalId::new("feio_would_block", 6004);
pub const ERR_FEIO_FEEDER_CAP:     GlobalId = GlobalId::new("feio_feeder_cap", 6005);
pub const ERR_FEIO_INVALID_CONFIG: GlobalId = GlobalId::new("feio_invalid_config", 6006);

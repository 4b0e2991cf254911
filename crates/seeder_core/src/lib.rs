//! Seeder core: pure shutdown state machine, shared counters and query generation.
mod effect;
mod msg;
mod query;
mod state;
mod stats;
mod summary;
mod update;

pub use effect::Effect;
pub use msg::Msg;
pub use query::{random_token, Query, QueryGenerator, DEFAULT_TOKEN_LEN};
pub use state::{AppState, ShutdownPhase};
pub use stats::{Attempt, Stats, StatsSnapshot};
pub use summary::{format_runtime, status_line, CleanupCounts, Summary};
pub use update::update;

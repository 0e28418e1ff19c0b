//! The two-tier rule cache: short-TTL local, longer-TTL best-effort
//! remote, rule store as source of truth. See [`RuleCache`].

mod cache;
mod key;
mod remote;

pub use cache::{CacheStats, CacheStatsSnapshot, Loaded, RuleCache};
pub use key::CacheKey;
pub use remote::{NoopRemoteTier, RemoteOutcome, RemoteTier};

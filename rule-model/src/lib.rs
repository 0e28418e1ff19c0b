//! Rule and RuleVersion types, the lifecycle event taxonomy, and the
//! version-diff operation. No storage, no matching — see `rule-store` and
//! `rete-net`/`rule-engine` respectively.

mod error;
mod lifecycle;
mod rule;
mod version;

pub use error::RuleModelError;
pub use lifecycle::RuleLifecycleEvent;
pub use rule::{Rule, RuleDraft, DEFAULT_GROUP};
pub use version::{diff_versions, FieldDiff, RuleVersion};

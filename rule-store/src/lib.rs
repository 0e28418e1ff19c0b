//! Rule persistence (`rules`/`rule_versions`) and the rule lifecycle hook.
//! `rule-engine` is the sole caller: it applies a `RuleStore` mutation,
//! then fans the returned [`rule_model::RuleLifecycleEvent`] out to
//! `rule-cache`, `conflict-detector`, and `rete-net`.

mod error;
mod mapping;
mod schema;
mod store;

pub use error::StoreError;
pub use store::RuleStore;

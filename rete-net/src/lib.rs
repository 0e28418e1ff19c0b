//! The RETE discrimination network and its linear conformance reference.
//!
//! `network::ReteNetwork` is the compiled path rules are normally matched
//! through; `linear::evaluate_simple` walks condition trees directly and
//! exists so the two can be checked against each other (spec §4.4, §8).

mod error;
mod linear;
mod network;
mod types;

pub use error::CompileError;
pub use linear::{evaluate_simple, ConditionIndex};
pub use network::{CompileOutcome, ReteNetwork};
pub use types::{
    AlphaId, AlphaNode, BetaId, BetaKind, BetaNode, EvaluationResult, NetworkStats, RuleMatch,
    TerminalNode,
};

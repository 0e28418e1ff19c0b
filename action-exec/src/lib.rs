//! Action descriptor and executor boundary (spec §4.11), carrying the
//! `Effect` classification reused from the teacher's `rig-effects` so the
//! executor boundary can make retry/compensation decisions without
//! knowing what a given action actually does.

mod descriptor;
mod effect;
mod error;
mod executor;

pub use descriptor::ActionDescriptor;
pub use effect::{Effect, Effectful, Recovery};
pub use error::ActionError;
pub use executor::{ActionExecutor, ActionOutcome, LoggingExecutor, NoopExecutor};

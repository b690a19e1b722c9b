//! The resolution stack: scoped push/pop over a preference chain.
//!
//! Each logical flow (a thread, a task, a request) owns its own
//! [`ResolutionStack`]. Stacks carry no synchronization; nodes are shared
//! immutably, so [`ResolutionStack::fork`] hands an existing chain to a new
//! flow without copying it.

pub mod config;
mod guard;
mod resolution;

pub use config::{StackConfig, DEFAULT_MAX_DEPTH};
pub use guard::ScopeGuard;
pub use resolution::ResolutionStack;

//! # sentaku - Scoped Implementation Choice
//!
//! sentaku answers "which concrete implementation of a capability should run
//! here?" Enclosing scopes push ordered preference lists onto a
//! [`ResolutionStack`]; leaf code offers the implementations it has and gets
//! back the one ranked highest by the innermost active list.
//!
//! ## Core Concepts
//!
//! - **PreferenceList**: an ordered, non-empty list of keys, most-preferred first
//! - **Scope**: a position in an immutable chain of preference nodes
//! - **Freeze**: a single-key scope that forbids any further nesting
//! - **ResolutionStack**: scoped push/pop with a guard that always pops
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use sentaku::{PreferenceList, ResolutionStack, SentakuError};
//!
//! # fn main() -> Result<(), SentakuError<&'static str>> {
//! let impls: HashMap<&str, &str> =
//!     [("fast", "vectorized kernel"), ("safe", "checked kernel")].into_iter().collect();
//!
//! let mut stack = ResolutionStack::new();
//! let mut outer = stack.push(PreferenceList::new(vec!["fast", "safe"])?)?;
//! {
//!     let inner = outer.push_frozen("safe")?;
//!     assert_eq!(*inner.choose(&impls)?.value, "checked kernel");
//! }
//! assert_eq!(outer.choose(&impls)?.key, "fast");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod preference;
pub mod stack;

// Re-export primary types at crate root for convenience
pub use error::{ChoiceError, ScopeError, SentakuError, SentakuResult};
pub use preference::{chain, Candidates, ImplementationChoice, PreferenceList, PreferenceNode, Scope};
pub use stack::{ResolutionStack, ScopeGuard, StackConfig, DEFAULT_MAX_DEPTH};

//! Preference primitives.
//!
//! A [`PreferenceList`] is one scope's ordered list of implementation keys.
//! Scopes are chained as immutable [`PreferenceNode`]s rooted at the empty
//! [`Scope`], and resolution walks only the innermost node's list.

mod candidates;
mod list;
mod node;

pub use candidates::{Candidates, ImplementationChoice};
pub use list::PreferenceList;
pub use node::{chain, PreferenceNode, Scope};

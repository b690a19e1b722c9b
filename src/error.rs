//! Error types for sentaku.
//!
//! All errors are strongly typed using thiserror. Push-side failures
//! ([`ScopeError`]) are independent of the key type; resolve-side failures
//! ([`ChoiceError`]) carry the keys involved so a failed lookup can be
//! diagnosed from the error alone.

use std::fmt;

use thiserror::Error;

/// Errors raised while entering a scope or configuring a stack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("further nesting of implementation choice has been disabled")]
    NestingDisabled,

    #[error("a frozen scope must hold exactly one preference, got {len}")]
    FrozenArity {
        len: usize,
    },

    #[error("stack depth exceeded: depth {depth} is over the limit of {limit}")]
    DepthExceeded {
        limit: usize,
        depth: usize,
    },

    #[error("preference list cannot be empty")]
    EmptyPreferences,

    #[error("Invalid stack configuration: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

impl ScopeError {
    /// Returns true if this error indicates a structurally wrong call site.
    ///
    /// These are not meant to be caught and handled; they signal a caller bug.
    #[must_use]
    pub const fn is_programming_error(&self) -> bool {
        matches!(
            self,
            Self::NestingDisabled | Self::FrozenArity { .. } | Self::EmptyPreferences
        )
    }

    /// Returns true if this error signals runaway nesting.
    #[must_use]
    pub const fn is_depth_exceeded(&self) -> bool {
        matches!(self, Self::DepthExceeded { .. })
    }
}

/// Errors raised while resolving an implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChoiceError<K: fmt::Debug> {
    #[error("No choice possible without valid context")]
    NoContext,

    #[error("no implementation matched preferences {preferences:?}, available: {available:?}")]
    NoMatch {
        preferences: Vec<K>,
        available: Vec<K>,
    },
}

impl<K: fmt::Debug> ChoiceError<K> {
    /// Returns true if resolution was attempted before any scope was pushed.
    #[must_use]
    pub const fn is_no_context(&self) -> bool {
        matches!(self, Self::NoContext)
    }

    /// Returns true if a scope was active but none of its keys were offered.
    #[must_use]
    pub const fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch { .. })
    }
}

/// Top-level error type for sentaku.
///
/// Useful for code that both enters scopes and resolves inside them, e.g.
/// the body passed to [`crate::ResolutionStack::scoped`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SentakuError<K: fmt::Debug> {
    #[error("Scope error: {0}")]
    Scope(ScopeError),

    #[error("Choice error: {0}")]
    Choice(ChoiceError<K>),
}

impl<K: fmt::Debug> From<ScopeError> for SentakuError<K> {
    fn from(err: ScopeError) -> Self {
        Self::Scope(err)
    }
}

impl<K: fmt::Debug> From<ChoiceError<K>> for SentakuError<K> {
    fn from(err: ChoiceError<K>) -> Self {
        Self::Choice(err)
    }
}

impl<K: fmt::Debug> SentakuError<K> {
    /// Returns true if this is a scope error.
    #[must_use]
    pub const fn is_scope(&self) -> bool {
        matches!(self, Self::Scope(_))
    }

    /// Returns true if this is a choice error.
    #[must_use]
    pub const fn is_choice(&self) -> bool {
        matches!(self, Self::Choice(_))
    }

    /// Returns true if this error signals a caller bug rather than a runtime condition.
    #[must_use]
    pub const fn is_programming_error(&self) -> bool {
        match self {
            Self::Scope(e) => e.is_programming_error(),
            Self::Choice(_) => false,
        }
    }
}

/// Result type alias for sentaku operations.
pub type SentakuResult<T, K> = Result<T, SentakuError<K>>;

//! Stack configuration (nesting limits).

use serde::{Deserialize, Serialize};

use crate::error::ScopeError;

/// Default maximum number of nested scopes, sentinel excluded.
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Limits applied to a [`crate::ResolutionStack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Maximum chain depth. Pushing past it fails with `DepthExceeded`.
    pub max_depth: usize,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl StackConfig {
    /// Config with a custom depth limit.
    #[must_use]
    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Validate the configuration.
    ///
    /// This must be called before constructing a stack from it.
    ///
    /// # Errors
    /// [`ScopeError::InvalidConfig`] if `max_depth` is zero.
    pub fn validate(&self) -> Result<(), ScopeError> {
        if self.max_depth == 0 {
            return Err(ScopeError::InvalidConfig {
                reason: "max_depth must be > 0".to_string(),
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config, e.g. `{"max_depth": 8}`.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    /// [`ScopeError::InvalidConfig`] on malformed JSON or invalid values.
    pub fn from_json(raw: &str) -> Result<Self, ScopeError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| ScopeError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

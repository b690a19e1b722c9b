use std::fmt;
use std::sync::Arc;

use super::{ScopeGuard, StackConfig};
use crate::error::{ChoiceError, ScopeError};
use crate::preference::{chain, Candidates, ImplementationChoice, PreferenceList, PreferenceNode, Scope};

/// Mutable holder of the active preference scope.
///
/// `current` only changes through [`ResolutionStack::pushed`] and the drop of
/// the returned [`ScopeGuard`]; it is never assigned directly.
#[derive(Debug)]
pub struct ResolutionStack<K> {
    pub(super) current: Scope<K>,
    config: StackConfig,
}

impl<K> ResolutionStack<K> {
    /// An empty stack (current scope is the sentinel) with the default config.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: Scope::Empty,
            config: StackConfig::default(),
        }
    }

    /// A stack whose base scope is `default_elements`, if given.
    ///
    /// This establishes a process-wide default order without every caller
    /// having to push one.
    #[must_use]
    pub fn from_elements(default_elements: Option<PreferenceList<K>>) -> Self {
        let current = match default_elements {
            Some(elements) => Scope::Node(PreferenceNode::root(elements)),
            None => Scope::Empty,
        };
        Self {
            current,
            config: StackConfig::default(),
        }
    }

    /// Like [`Self::from_elements`] with a custom config.
    ///
    /// # Errors
    /// [`ScopeError::InvalidConfig`] if the config does not validate.
    pub fn with_config(
        config: StackConfig,
        default_elements: Option<PreferenceList<K>>,
    ) -> Result<Self, ScopeError> {
        config.validate()?;
        let mut stack = Self::from_elements(default_elements);
        stack.config = config;
        Ok(stack)
    }

    /// A stack starting from an existing chain.
    ///
    /// # Errors
    /// - [`ScopeError::InvalidConfig`] if the config does not validate.
    /// - [`ScopeError::DepthExceeded`] if the chain is already deeper than allowed.
    pub fn from_scope(current: Scope<K>, config: StackConfig) -> Result<Self, ScopeError> {
        config.validate()?;
        let depth = current.depth();
        if depth > config.max_depth {
            return Err(ScopeError::DepthExceeded {
                limit: config.max_depth,
                depth,
            });
        }
        Ok(Self { current, config })
    }

    /// A new, independent stack sharing this stack's current chain and config.
    ///
    /// Pushes on the fork never affect this stack, and vice versa.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            current: self.current.clone(),
            config: self.config,
        }
    }

    /// Enter a nested scope with preference list `new`.
    ///
    /// The scope stays active until the returned guard is dropped, which
    /// restores the scope that was active before this call.
    ///
    /// # Errors
    /// - [`ScopeError::NestingDisabled`] if the current scope is frozen.
    /// - [`ScopeError::FrozenArity`] if `frozen` is set and `new` has more than one key.
    /// - [`ScopeError::DepthExceeded`] if the chain would grow past the limit.
    ///   The stack is left exactly as it was.
    pub fn pushed(
        &mut self,
        new: PreferenceList<K>,
        frozen: bool,
    ) -> Result<ScopeGuard<'_, K>, ScopeError> {
        let node = PreferenceNode::make(&self.current, new, frozen)?;
        let guard = ScopeGuard::enter(self, Scope::Node(node));

        let depth = guard.current.depth();
        let limit = guard.config.max_depth;
        if depth > limit {
            tracing::warn!(depth, limit, "stack depth exceeded");
            // Dropping the guard pops the node we just pushed.
            return Err(ScopeError::DepthExceeded { limit, depth });
        }

        tracing::debug!(depth, frozen, "scope pushed");
        Ok(guard)
    }

    /// Enter an unfrozen nested scope.
    ///
    /// # Errors
    /// See [`Self::pushed`].
    pub fn push(&mut self, new: PreferenceList<K>) -> Result<ScopeGuard<'_, K>, ScopeError> {
        self.pushed(new, false)
    }

    /// Enter a frozen scope that settles on `key`; nothing may nest inside it.
    ///
    /// # Errors
    /// See [`Self::pushed`].
    pub fn push_frozen(&mut self, key: K) -> Result<ScopeGuard<'_, K>, ScopeError> {
        self.pushed(PreferenceList::single(key), true)
    }

    /// Run `body` inside a nested scope, popping it however `body` exits.
    ///
    /// `body` gets the scope's guard, never the stack itself, so it can nest
    /// further scopes and resolve but cannot swap out the stack's config.
    ///
    /// # Errors
    /// A push failure (converted into `E`) or whatever `body` returns.
    pub fn scoped<R, E, F>(&mut self, new: PreferenceList<K>, frozen: bool, body: F) -> Result<R, E>
    where
        F: FnOnce(&mut ScopeGuard<'_, K>) -> Result<R, E>,
        E: From<ScopeError>,
    {
        let mut guard = self.pushed(new, frozen)?;
        body(&mut guard)
    }

    /// The active scope.
    #[must_use]
    pub fn current(&self) -> &Scope<K> {
        &self.current
    }

    /// The limits this stack enforces.
    #[must_use]
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Number of scopes currently active, sentinel excluded.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.current.depth()
    }

    /// Returns true if no scope is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Returns true if the active scope forbids further nesting.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.current.is_frozen()
    }

    /// Active scopes, root-most first.
    #[must_use]
    pub fn chain(&self) -> Vec<Arc<PreferenceNode<K>>> {
        chain(&self.current)
    }

    /// Given a mapping of implementations, choose one under the active scope.
    ///
    /// # Errors
    /// - [`ChoiceError::NoContext`] if no scope is active.
    /// - [`ChoiceError::NoMatch`] if none of the active keys are offered.
    pub fn choose<'a, V, C>(
        &self,
        choose_from: &'a C,
    ) -> Result<ImplementationChoice<K, &'a V>, ChoiceError<K>>
    where
        K: Clone + fmt::Debug,
        C: Candidates<K, V> + ?Sized,
    {
        self.current.choose(choose_from)
    }

    /// Choose among bare keys, returning the winning key.
    ///
    /// # Errors
    /// Same as [`Self::choose`].
    pub fn choose_key(&self, available: &[K]) -> Result<K, ChoiceError<K>>
    where
        K: Clone + PartialEq + fmt::Debug,
    {
        let Some(elements) = self.current.elements() else {
            return Err(ChoiceError::NoContext);
        };
        match elements.iter().find(|key| available.contains(key)) {
            Some(key) => Ok(key.clone()),
            None => Err(ChoiceError::NoMatch {
                preferences: elements.as_slice().to_vec(),
                available: available.to_vec(),
            }),
        }
    }

    /// Position of `key` in the active preference list (0 = most preferred).
    #[must_use]
    pub fn rank(&self, key: &K) -> Option<usize>
    where
        K: PartialEq,
    {
        self.current.elements().and_then(|elements| elements.position(key))
    }
}

impl<K> Default for ResolutionStack<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Display> fmt::Display for ResolutionStack<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<ICS [")?;
        for (i, node) in chain(&self.current).iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{node}")?;
        }
        f.write_str("]>")
    }
}

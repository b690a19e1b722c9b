use std::fmt;
use std::ops::Deref;

use super::ResolutionStack;
use crate::error::ScopeError;
use crate::preference::{PreferenceList, Scope};

/// A pushed scope. Dropping it pops the scope.
///
/// The guard mutably borrows its stack, so scopes can only be released in
/// LIFO order. Nested pushes go through the guard's own push methods;
/// read-only queries (`choose`, `depth`, ...) go through `Deref`. The stack
/// itself is never handed out mutably, so its config and chain cannot be
/// replaced from inside a scope. Release happens on every exit path,
/// including `?` propagation and panic unwinding.
///
/// ```compile_fail
/// use sentaku::{PreferenceList, ResolutionStack, StackConfig};
///
/// let mut stack = ResolutionStack::new();
/// let mut guard = stack.push(PreferenceList::single("a")).unwrap();
/// *guard = ResolutionStack::with_config(StackConfig::with_max_depth(1000), None).unwrap();
/// ```
#[must_use = "dropping the guard immediately pops the scope"]
pub struct ScopeGuard<'s, K> {
    stack: &'s mut ResolutionStack<K>,
    previous: Scope<K>,
}

impl<'s, K> ScopeGuard<'s, K> {
    /// Install `next` as the current scope, remembering what it replaces.
    pub(super) fn enter(stack: &'s mut ResolutionStack<K>, next: Scope<K>) -> Self {
        let previous = std::mem::replace(&mut stack.current, next);
        Self { stack, previous }
    }

    /// The scope that becomes current again when this guard drops.
    #[must_use]
    pub fn previous(&self) -> &Scope<K> {
        &self.previous
    }

    /// Enter a scope nested inside this one.
    ///
    /// # Errors
    /// See [`ResolutionStack::pushed`].
    pub fn pushed(
        &mut self,
        new: PreferenceList<K>,
        frozen: bool,
    ) -> Result<ScopeGuard<'_, K>, ScopeError> {
        self.stack.pushed(new, frozen)
    }

    /// Enter an unfrozen scope nested inside this one.
    ///
    /// # Errors
    /// See [`ResolutionStack::pushed`].
    pub fn push(&mut self, new: PreferenceList<K>) -> Result<ScopeGuard<'_, K>, ScopeError> {
        self.stack.pushed(new, false)
    }

    /// Enter a frozen scope nested inside this one.
    ///
    /// # Errors
    /// See [`ResolutionStack::pushed`].
    pub fn push_frozen(&mut self, key: K) -> Result<ScopeGuard<'_, K>, ScopeError> {
        self.stack.pushed(PreferenceList::single(key), true)
    }

    /// Run `body` inside a scope nested inside this one.
    ///
    /// # Errors
    /// See [`ResolutionStack::scoped`].
    pub fn scoped<R, E, F>(&mut self, new: PreferenceList<K>, frozen: bool, body: F) -> Result<R, E>
    where
        F: FnOnce(&mut ScopeGuard<'_, K>) -> Result<R, E>,
        E: From<ScopeError>,
    {
        self.stack.scoped(new, frozen, body)
    }
}

impl<K: fmt::Debug> fmt::Debug for ScopeGuard<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeGuard")
            .field("current", &self.stack.current)
            .field("previous", &self.previous)
            .finish()
    }
}

impl<K> Deref for ScopeGuard<'_, K> {
    type Target = ResolutionStack<K>;

    fn deref(&self) -> &Self::Target {
        self.stack
    }
}

impl<K> Drop for ScopeGuard<'_, K> {
    fn drop(&mut self) {
        self.stack.current = std::mem::take(&mut self.previous);
        tracing::debug!(depth = self.stack.current.depth(), "scope popped");
    }
}

use std::fmt;
use std::sync::Arc;

use crate::error::{ChoiceError, ScopeError};

use super::{Candidates, ImplementationChoice, PreferenceList};

/// One scope's preference list, chained to the scope that enclosed it.
///
/// Nodes are immutable once built. The back-reference is shared, so a chain
/// may be referenced by several stacks at once (see
/// [`crate::ResolutionStack::fork`]).
#[derive(Debug)]
pub struct PreferenceNode<K> {
    elements: PreferenceList<K>,
    previous: Scope<K>,
    frozen: bool,
}

/// The active position in a preference chain.
///
/// `Empty` is the sentinel root: nothing has declared a preference yet.
#[derive(Debug)]
pub enum Scope<K> {
    /// No active context. Resolving always fails.
    Empty,
    /// An active scope.
    Node(Arc<PreferenceNode<K>>),
}

impl<K> PreferenceNode<K> {
    /// Build a node nested under `current`.
    ///
    /// # Errors
    /// - [`ScopeError::NestingDisabled`] if `current` is a frozen scope.
    /// - [`ScopeError::FrozenArity`] if `frozen` is set and `elements` does not
    ///   hold exactly one key.
    pub fn make(
        current: &Scope<K>,
        elements: PreferenceList<K>,
        frozen: bool,
    ) -> Result<Arc<Self>, ScopeError> {
        if current.is_frozen() {
            tracing::debug!(
                depth = current.depth(),
                "refusing to nest under a frozen scope"
            );
            return Err(ScopeError::NestingDisabled);
        }
        if frozen && elements.len() != 1 {
            tracing::error!(
                len = elements.len(),
                "attempted to freeze a scope with more than one preference"
            );
            return Err(ScopeError::FrozenArity {
                len: elements.len(),
            });
        }

        tracing::trace!(len = elements.len(), frozen, "preference node created");
        Ok(Arc::new(Self {
            elements,
            previous: current.clone(),
            frozen,
        }))
    }

    /// An unfrozen node directly above the sentinel.
    pub(crate) fn root(elements: PreferenceList<K>) -> Arc<Self> {
        Arc::new(Self {
            elements,
            previous: Scope::Empty,
            frozen: false,
        })
    }

    /// This scope's preference list.
    #[must_use]
    pub fn elements(&self) -> &PreferenceList<K> {
        &self.elements
    }

    /// The enclosing scope.
    #[must_use]
    pub fn previous(&self) -> &Scope<K> {
        &self.previous
    }

    /// Whether nesting under this node is disabled.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Pick the first key of this node's list that `choose_from` offers.
    ///
    /// Earlier positions always win, whatever else matches.
    ///
    /// # Errors
    /// [`ChoiceError::NoMatch`] with the attempted list and the offered keys
    /// when nothing matches.
    pub fn choose<'a, V, C>(
        &self,
        choose_from: &'a C,
    ) -> Result<ImplementationChoice<K, &'a V>, ChoiceError<K>>
    where
        K: Clone + fmt::Debug,
        C: Candidates<K, V> + ?Sized,
    {
        for choice in &self.elements {
            if let Some(value) = choose_from.lookup(choice) {
                return Ok(ImplementationChoice {
                    key: choice.clone(),
                    value,
                });
            }
        }

        let available: Vec<K> = choose_from.candidate_keys().into_iter().cloned().collect();
        tracing::debug!(
            preferences = ?self.elements.as_slice(),
            available = ?available,
            "no implementation matched"
        );
        Err(ChoiceError::NoMatch {
            preferences: self.elements.as_slice().to_vec(),
            available,
        })
    }
}

impl<K: fmt::Display> fmt::Display for PreferenceNode<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.elements)?;
        if self.frozen {
            f.write_str("!")?;
        }
        Ok(())
    }
}

impl<K> Scope<K> {
    /// Returns true at the sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The sentinel reads as unfrozen so the first push is always permitted.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Node(node) => node.frozen,
        }
    }

    /// The node at this position, if any.
    #[must_use]
    pub fn node(&self) -> Option<&Arc<PreferenceNode<K>>> {
        match self {
            Self::Empty => None,
            Self::Node(node) => Some(node),
        }
    }

    /// The active preference list, if any.
    #[must_use]
    pub fn elements(&self) -> Option<&PreferenceList<K>> {
        self.node().map(|node| &node.elements)
    }

    /// Number of nodes in the chain, sentinel excluded.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self;
        while let Self::Node(node) = scope {
            depth += 1;
            scope = &node.previous;
        }
        depth
    }

    /// Identity comparison: true if both refer to the same node (or both are empty).
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Node(a), Self::Node(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Resolve against this scope.
    ///
    /// # Errors
    /// - [`ChoiceError::NoContext`] at the sentinel, regardless of input.
    /// - [`ChoiceError::NoMatch`] if none of the active keys are offered.
    pub fn choose<'a, V, C>(
        &self,
        choose_from: &'a C,
    ) -> Result<ImplementationChoice<K, &'a V>, ChoiceError<K>>
    where
        K: Clone + fmt::Debug,
        C: Candidates<K, V> + ?Sized,
    {
        match self {
            Self::Empty => Err(ChoiceError::NoContext),
            Self::Node(node) => node.choose(choose_from),
        }
    }
}

impl<K> Clone for Scope<K> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Node(node) => Self::Node(Arc::clone(node)),
        }
    }
}

impl<K> Default for Scope<K> {
    fn default() -> Self {
        Self::Empty
    }
}

/// The nodes from the root-most scope down to `scope`, oldest first.
///
/// Chains are acyclic by construction: a node's `previous` always predates it.
#[must_use]
pub fn chain<K>(scope: &Scope<K>) -> Vec<Arc<PreferenceNode<K>>> {
    let mut nodes = Vec::with_capacity(scope.depth());
    let mut cursor = scope;
    while let Scope::Node(node) = cursor {
        nodes.push(Arc::clone(node));
        cursor = &node.previous;
    }
    nodes.reverse();
    nodes
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn list(keys: &[&'static str]) -> PreferenceList<&'static str> {
        PreferenceList::new(keys.to_vec()).unwrap()
    }

    fn candidates(keys: &[&'static str]) -> HashMap<&'static str, usize> {
        keys.iter().enumerate().map(|(i, k)| (*k, i)).collect()
    }

    #[test]
    fn make_chains_under_current() {
        let outer = Scope::Node(PreferenceNode::make(&Scope::Empty, list(&["a"]), false).unwrap());
        let inner = PreferenceNode::make(&outer, list(&["b"]), false).unwrap();
        assert!(inner.previous().same_as(&outer));
        assert_eq!(Scope::Node(inner).depth(), 2);
    }

    #[test]
    fn make_refuses_nesting_under_frozen() {
        let frozen = Scope::Node(PreferenceNode::make(&Scope::Empty, list(&["a"]), true).unwrap());
        let err = PreferenceNode::make(&frozen, list(&["b"]), false).unwrap_err();
        assert_eq!(err, ScopeError::NestingDisabled);
    }

    #[test]
    fn make_requires_single_key_when_frozen() {
        let err = PreferenceNode::make(&Scope::Empty, list(&["a", "b"]), true).unwrap_err();
        assert_eq!(err, ScopeError::FrozenArity { len: 2 });
    }

    #[test]
    fn nesting_check_runs_before_arity_check() {
        let frozen = Scope::Node(PreferenceNode::make(&Scope::Empty, list(&["a"]), true).unwrap());
        let err = PreferenceNode::make(&frozen, list(&["b", "c"]), true).unwrap_err();
        assert_eq!(err, ScopeError::NestingDisabled);
    }

    #[test]
    fn choose_first_match_wins() {
        let node = PreferenceNode::make(&Scope::Empty, list(&["a", "b", "c"]), false).unwrap();
        let offered = candidates(&["c", "b"]);
        let choice = node.choose(&offered).unwrap();
        assert_eq!(choice.key, "b");
        assert_eq!(*choice.value, 1);
    }

    #[test]
    fn choose_duplicates_only_first_reachable() {
        let node = PreferenceNode::make(&Scope::Empty, list(&["a", "b", "a"]), false).unwrap();
        let offered = candidates(&["a", "b"]);
        assert_eq!(node.choose(&offered).unwrap().key, "a");
    }

    #[test]
    fn choose_no_match_reports_both_sides() {
        let node = PreferenceNode::make(&Scope::Empty, list(&["a", "b"]), false).unwrap();
        let offered = candidates(&["c"]);
        let err = node.choose(&offered).unwrap_err();
        assert_eq!(
            err,
            ChoiceError::NoMatch {
                preferences: vec!["a", "b"],
                available: vec!["c"],
            }
        );
    }

    #[test]
    fn sentinel_never_chooses() {
        let offered = candidates(&["a"]);
        let err = Scope::<&str>::Empty.choose(&offered).unwrap_err();
        assert!(err.is_no_context());
        assert!(!Scope::<&str>::Empty.is_frozen());
    }

    #[test]
    fn chain_is_oldest_first() {
        let a = Scope::Node(PreferenceNode::make(&Scope::Empty, list(&["a"]), false).unwrap());
        let b = Scope::Node(PreferenceNode::make(&a, list(&["b"]), false).unwrap());
        let c = Scope::Node(PreferenceNode::make(&b, list(&["c"]), true).unwrap());

        let nodes = chain(&c);
        let firsts: Vec<&str> = nodes.iter().map(|n| *n.elements().first()).collect();
        assert_eq!(firsts, vec!["a", "b", "c"]);
        assert!(chain::<&str>(&Scope::Empty).is_empty());
        assert_eq!(nodes[2].to_string(), "[c]!");
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ScopeError;

/// A non-empty, order-preserving list of implementation keys.
///
/// - Empty lists are rejected.
/// - Duplicates are kept, but only the first occurrence is ever reachable
///   during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PreferenceList<K>(Vec<K>);

impl<K> PreferenceList<K> {
    /// Construct a validated preference list, most-preferred key first.
    ///
    /// # Errors
    /// Returns [`ScopeError::EmptyPreferences`] if `elements` is empty.
    pub fn new(elements: Vec<K>) -> Result<Self, ScopeError> {
        if elements.is_empty() {
            return Err(ScopeError::EmptyPreferences);
        }
        Ok(Self(elements))
    }

    /// A list holding exactly one key. This is the only shape a frozen scope accepts.
    #[must_use]
    pub fn single(key: K) -> Self {
        Self(vec![key])
    }

    /// Build a list from any iterator of keys.
    ///
    /// # Errors
    /// Returns [`ScopeError::EmptyPreferences`] if the iterator yields nothing.
    pub fn try_from_iter<I: IntoIterator<Item = K>>(iter: I) -> Result<Self, ScopeError> {
        Self::new(iter.into_iter().collect())
    }

    /// Returns the list as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[K] {
        &self.0
    }

    /// Number of keys, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed list; kept so `len` has the
    /// `is_empty` companion clippy's `len_without_is_empty` expects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The most-preferred key.
    #[must_use]
    pub fn first(&self) -> &K {
        &self.0[0]
    }

    /// Iterate keys in preference order.
    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.0.iter()
    }

    /// Consume the list, returning the underlying keys.
    #[must_use]
    pub fn into_vec(self) -> Vec<K> {
        self.0
    }
}

impl<K: PartialEq> PreferenceList<K> {
    /// Position of the first occurrence of `key`, if present.
    #[must_use]
    pub fn position(&self, key: &K) -> Option<usize> {
        self.0.iter().position(|k| k == key)
    }

    /// Returns true if `key` appears anywhere in the list.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.0.contains(key)
    }

    /// Keys that can actually win, i.e. each key's first occurrence, in order.
    #[must_use]
    pub fn first_occurrences(&self) -> Vec<&K> {
        let mut seen: Vec<&K> = Vec::with_capacity(self.0.len());
        for key in &self.0 {
            if !seen.contains(&key) {
                seen.push(key);
            }
        }
        seen
    }
}

impl<K> TryFrom<Vec<K>> for PreferenceList<K> {
    type Error = ScopeError;

    fn try_from(elements: Vec<K>) -> Result<Self, Self::Error> {
        Self::new(elements)
    }
}

impl<K, const N: usize> TryFrom<[K; N]> for PreferenceList<K> {
    type Error = ScopeError;

    fn try_from(elements: [K; N]) -> Result<Self, Self::Error> {
        Self::new(Vec::from(elements))
    }
}

impl<'a, K> IntoIterator for &'a PreferenceList<K> {
    type Item = &'a K;
    type IntoIter = std::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: fmt::Display> fmt::Display for PreferenceList<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}")?;
        }
        f.write_str("]")
    }
}

impl<'de, K: Deserialize<'de>> Deserialize<'de> for PreferenceList<K> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Vec::<K>::deserialize(deserializer)?;
        PreferenceList::new(raw).map_err(serde::de::Error::custom)
    }
}

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

/// The winning key and its implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImplementationChoice<K, V> {
    /// The preference key that matched.
    pub key: K,
    /// The implementation registered under `key`.
    pub value: V,
}

impl<K, V> ImplementationChoice<K, V> {
    /// Split into a `(key, value)` pair.
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// A mapping of available implementations offered at a resolve site.
///
/// Resolution only needs membership lookup; iteration order of the
/// mapping never influences which key wins.
pub trait Candidates<K, V> {
    /// The implementation registered under `key`, if offered.
    fn lookup(&self, key: &K) -> Option<&V>;

    /// All offered keys (used for diagnostics when nothing matches).
    fn candidate_keys(&self) -> Vec<&K>;
}

impl<K, V, S> Candidates<K, V> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn candidate_keys(&self) -> Vec<&K> {
        self.keys().collect()
    }
}

impl<K: Ord, V> Candidates<K, V> for BTreeMap<K, V> {
    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn candidate_keys(&self) -> Vec<&K> {
        self.keys().collect()
    }
}

/// Association list; the first pair with a given key shadows later ones.
impl<K: PartialEq, V> Candidates<K, V> for [(K, V)] {
    fn lookup(&self, key: &K) -> Option<&V> {
        self.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Distinct keys in first-seen order. Dedup is quadratic since `K` is
    /// only `PartialEq`; this runs only when building a `NoMatch` error.
    fn candidate_keys(&self) -> Vec<&K> {
        let mut keys: Vec<&K> = Vec::with_capacity(self.len());
        for (k, _) in self {
            if !keys.contains(&k) {
                keys.push(k);
            }
        }
        keys
    }
}

impl<K: PartialEq, V> Candidates<K, V> for Vec<(K, V)> {
    fn lookup(&self, key: &K) -> Option<&V> {
        self.as_slice().lookup(key)
    }

    fn candidate_keys(&self) -> Vec<&K> {
        self.as_slice().candidate_keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_map_lookup() {
        let map: HashMap<&str, u32> = [("fast", 1), ("safe", 2)].into_iter().collect();
        assert_eq!(map.lookup(&"safe"), Some(&2));
        assert_eq!(map.lookup(&"slow"), None);
        assert_eq!(map.candidate_keys().len(), 2);
    }

    #[test]
    fn btree_map_keys_are_sorted() {
        let map: BTreeMap<&str, u32> = [("safe", 2), ("fast", 1)].into_iter().collect();
        assert_eq!(map.candidate_keys(), vec![&"fast", &"safe"]);
    }

    #[test]
    fn pair_slice_first_entry_shadows() {
        let pairs = vec![("fast", 1), ("safe", 2), ("fast", 3)];
        assert_eq!(pairs.lookup(&"fast"), Some(&1));
        assert_eq!(pairs.candidate_keys(), vec![&"fast", &"safe"]);
    }

    #[test]
    fn pair_slice_keys_dedup_in_first_seen_order() {
        let pairs = [("b", 1), ("a", 2), ("b", 3), ("c", 4), ("a", 5), ("c", 6)];
        assert_eq!(pairs[..].candidate_keys(), vec![&"b", &"a", &"c"]);
        assert_eq!(pairs[..].lookup(&"c"), Some(&4));
    }

    #[test]
    fn choice_into_pair() {
        let choice = ImplementationChoice { key: "fast", value: 1 };
        assert_eq!(choice.into_pair(), ("fast", 1));
    }
}

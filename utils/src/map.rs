use std::hash::Hash;

use fnv::FnvHashMap;

/// Hash map keyed by small integers, backed by FNV hashing.
#[derive(Clone, Debug)]
pub struct Map<K, V>(pub FnvHashMap<K, V>);

impl<K: Eq + Hash, V> Default for Map<K, V> {
    fn default() -> Self {
        Self(FnvHashMap::<K, V>::default())
    }
}

impl<K: Eq + Hash, V> Map<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, k: K, data: V) -> Option<V> {
        self.0.insert(k, data)
    }

    pub fn get(&self, k: &K) -> Option<&V> {
        self.0.get(k)
    }

    pub fn contains_key(&self, k: &K) -> bool {
        self.0.contains_key(k)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get() {
        let mut map: Map<u64, &str> = Map::new();
        assert!(map.is_empty());
        assert_eq!(map.insert(5, "five"), None);
        assert_eq!(map.insert(5, "cinq"), Some("five"));
        assert_eq!(map.get(&5), Some(&"cinq"));
        assert!(map.contains_key(&5));
        assert!(!map.contains_key(&25));
        assert_eq!(map.len(), 1);
        assert_eq!(map.keys().copied().collect::<Vec<u64>>(), vec![5]);
    }
}

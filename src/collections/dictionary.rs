use std::{
    collections::HashMap,
    fmt,
    hash::Hash,
    marker::PhantomData,
};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

use crate::{
    cursor::{EntriesCursor, KeyedCursor},
    sequence::Sequence,
    util::{Result, Status},
};

/// Insertion-ordered, key-unique map
///
/// The materialized shape of [`Sequence::to_dictionary`]. Overwriting a key
/// replaces its value but keeps the key's original position.
///
/// # Layout
///
/// ```text
/// entries: [(k0, v0), (k1, v1), ...]   iteration order
/// index:   { k0 -> 0, k1 -> 1, ... }   key lookup
/// ```
#[derive(Clone)]
pub struct Dictionary<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K, V> Dictionary<K, V>
where
    K: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        Dictionary {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Dictionary {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Insert or overwrite; returns the previous value for the key
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&pos) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let pos = *self.index.get(key)?;
        Some(&mut self.entries[pos].1)
    }

    /// Like [`Dictionary::get`], failing with `NotFound` for a missing key
    pub fn get_or_err(&self, key: &K) -> Result<&V>
    where
        K: fmt::Debug,
    {
        self.get(key)
            .ok_or_else(|| Status::not_found(format!("key {key:?} not found")))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }
}

impl<K, V> Dictionary<K, V> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Key-preserving sequence borrowing the entries
    pub fn sequence(&self) -> Sequence<'_, K, V> {
        Sequence::new(KeyedCursor::new(self.iter()))
    }

    /// Key-preserving sequence owning the entries
    pub fn into_sequence<'a>(self) -> Sequence<'a, K, V>
    where
        K: 'a,
        V: 'a,
    {
        Sequence::new(EntriesCursor::new(self.entries))
    }

    pub(crate) fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}

impl<K, V> Default for Dictionary<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Dictionary::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Dictionary<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for Dictionary<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K, V> FromIterator<(K, V)> for Dictionary<K, V>
where
    K: Hash + Eq + Clone,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut dict = Dictionary::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

/// Borrowing iterator over a [`Dictionary`] in insertion order
pub struct Iter<'a, K, V> {
    inner: std::slice::Iter<'a, (K, V)>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a Dictionary<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K: Serialize, V: Serialize> Serialize for Dictionary<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct DictionaryVisitor<K, V> {
    marker: PhantomData<fn() -> Dictionary<K, V>>,
}

impl<'de, K, V> Visitor<'de> for DictionaryVisitor<K, V>
where
    K: Deserialize<'de> + Hash + Eq + Clone,
    V: Deserialize<'de>,
{
    type Value = Dictionary<K, V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut dict = Dictionary::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((k, v)) = access.next_entry()? {
            dict.insert(k, v);
        }
        Ok(dict)
    }
}

impl<'de, K, V> Deserialize<'de> for Dictionary<K, V>
where
    K: Deserialize<'de> + Hash + Eq + Clone,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(DictionaryVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position_on_overwrite() {
        let mut dict = Dictionary::new();
        assert_eq!(dict.insert("a", 1), None);
        assert_eq!(dict.insert("b", 2), None);
        assert_eq!(dict.insert("a", 3), Some(1));

        assert_eq!(dict.len(), 2);
        assert_eq!(dict.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(dict.values().copied().collect::<Vec<_>>(), vec![3, 2]);
    }

    #[test]
    fn test_get_or_err() {
        let dict: Dictionary<&str, i32> = [("a", 1)].into_iter().collect();
        assert_eq!(dict.get_or_err(&"a").unwrap(), &1);
        let err = dict.get_or_err(&"z").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_get_mut() {
        let mut dict: Dictionary<&str, i32> = [("a", 1)].into_iter().collect();
        *dict.get_mut(&"a").unwrap() += 10;
        assert_eq!(dict.get(&"a"), Some(&11));
        assert!(dict.get_mut(&"b").is_none());
    }

    #[test]
    fn test_serde_roundtrip_keeps_order() {
        let dict: Dictionary<String, i32> = [("z".to_string(), 1), ("a".to_string(), 2)].into_iter().collect();
        let json = serde_json::to_string(&dict).unwrap();
        assert_eq!(json, r#"{"z":1,"a":2}"#);

        let back: Dictionary<String, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dict);
    }

    #[test]
    fn test_sequence_preserves_keys() {
        let dict: Dictionary<&str, i32> = [("x", 1), ("y", 2)].into_iter().collect();
        let mut seq = dict.sequence();
        assert!(seq.valid().unwrap());
        assert_eq!(seq.current().unwrap(), (&"x", &1));
        assert_eq!(seq.count().unwrap(), 2);
    }
}

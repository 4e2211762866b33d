use std::{fmt, hash::Hash};

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    collections::Dictionary,
    cursor::{ArrayCursor, Cursor, EntriesCursor, KeyedCursor},
    sequence::Sequence,
    util::{Result, Status},
};

/// Values that share a computed key, in source order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grouping<K, V> {
    key: K,
    items: Vec<V>,
}

impl<K, V> Grouping<K, V> {
    pub fn new(key: K) -> Self {
        Grouping {
            key,
            items: Vec::new(),
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn values(&self) -> &[V] {
        &self.items
    }

    pub fn sequence(&self) -> Sequence<'_, usize, V> {
        Sequence::new(ArrayCursor::new(self.items.as_slice()))
    }

    pub fn into_sequence<'a>(self) -> Sequence<'a, usize, V>
    where
        V: 'a,
    {
        Sequence::new(ArrayCursor::new(self.items))
    }

    fn push(&mut self, value: V) {
        self.items.push(value);
    }
}

/// Multi-valued mapping from key to [`Grouping`]
///
/// Built by one full pass over a source. Groups are ordered by the first
/// occurrence of their key; values keep source order inside a group.
#[derive(Clone)]
pub struct Lookup<K, V> {
    groups: Dictionary<K, Grouping<K, V>>,
}

impl<K, V> Lookup<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Drain `source` from its current position, grouping values by
    /// `key_selector`
    pub fn build<C, F>(source: &mut C, mut key_selector: F) -> Result<Self>
    where
        C: Cursor<Value = V> + ?Sized,
        V: Clone,
        F: FnMut(&V) -> K,
    {
        let mut groups: Dictionary<K, Grouping<K, V>> = Dictionary::new();
        let mut elements = 0usize;
        while source.valid()? {
            let value = source.value()?;
            let key = key_selector(value);
            match groups.get_mut(&key) {
                Some(group) => group.push(value.clone()),
                None => {
                    let mut group = Grouping::new(key.clone());
                    group.push(value.clone());
                    groups.insert(key, group);
                },
            }
            elements += 1;
            source.advance()?;
        }

        tracing::debug!(groups = groups.len(), elements, "lookup built");
        Ok(Lookup { groups })
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.groups.contains_key(key)
    }

    /// Values of the group for `key`; `NotFound` when there is no such group
    pub fn get(&self, key: &K) -> Result<Sequence<'_, usize, V>>
    where
        K: fmt::Debug,
    {
        self.grouping(key)
            .map(Grouping::sequence)
            .ok_or_else(|| Status::not_found(format!("no group for key {key:?}")))
    }

    pub fn grouping(&self, key: &K) -> Option<&Grouping<K, V>> {
        self.groups.get(key)
    }
}

impl<K, V> Lookup<K, V> {
    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.keys()
    }

    /// `(key, grouping)` pairs in first-occurrence order
    pub fn sequence(&self) -> Sequence<'_, K, Grouping<K, V>> {
        Sequence::new(KeyedCursor::new(self.groups.iter()))
    }

    pub fn into_sequence<'a>(self) -> Sequence<'a, K, Grouping<K, V>>
    where
        K: 'a,
        V: 'a,
    {
        Sequence::new(EntriesCursor::new(self.groups.into_entries()))
    }

    fn into_entries(self) -> Vec<(K, Grouping<K, V>)> {
        self.groups.into_entries()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Lookup<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.groups.iter().map(|(k, g)| (k, g.values())))
            .finish()
    }
}

impl<K: Serialize, V: Serialize> Serialize for Lookup<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, group) in self.groups.iter() {
            map.serialize_entry(key, group.values())?;
        }
        map.end()
    }
}

/// Deferred grouping: drains the parent into a [`Lookup`] on the first pull
/// and then yields `(key, grouping)` pairs.
pub struct GroupBy<C: Cursor, F, K> {
    parent: C,
    key_selector: F,
    groups: Option<EntriesCursor<K, Grouping<K, C::Value>>>,
}

impl<C, F, K> GroupBy<C, F, K>
where
    C: Cursor,
    C::Value: Clone,
    F: FnMut(&C::Value) -> K,
    K: Hash + Eq + Clone,
{
    pub fn new(parent: C, key_selector: F) -> Self {
        GroupBy {
            parent,
            key_selector,
            groups: None,
        }
    }

    fn groups(&self) -> Result<&EntriesCursor<K, Grouping<K, C::Value>>> {
        self.groups.as_ref().ok_or_else(Status::not_positioned)
    }
}

impl<C, F, K> Cursor for GroupBy<C, F, K>
where
    C: Cursor,
    C::Value: Clone,
    F: FnMut(&C::Value) -> K,
    K: Hash + Eq + Clone,
{
    type Key = K;
    type Value = Grouping<K, C::Value>;

    fn valid(&mut self) -> Result<bool> {
        if self.groups.is_none() {
            let lookup = Lookup::build(&mut self.parent, &mut self.key_selector)?;
            self.groups = Some(EntriesCursor::new(lookup.into_entries()));
        }
        match self.groups.as_mut() {
            Some(groups) => groups.valid(),
            None => Ok(false),
        }
    }

    fn key(&self) -> Result<&K> {
        self.groups()?.key()
    }

    fn value(&self) -> Result<&Grouping<K, C::Value>> {
        self.groups()?.value()
    }

    fn advance(&mut self) -> Result<bool> {
        if !self.valid()? {
            return Ok(false);
        }
        match self.groups.as_mut() {
            Some(groups) => groups.advance(),
            None => Ok(false),
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.parent.reset()?;
        self.groups = None;
        Ok(())
    }

    fn remaining(&self) -> Option<usize> {
        self.groups.as_ref()?.remaining()
    }
}

//! The `Sequence` type and its operators.
//!
//! A `Sequence` owns exactly one boxed [`Cursor`]. Deferred operators
//! consume the sequence and wrap its cursor in an operator cursor, so a
//! query is built without pulling anything:
//!
//! ```ignore
//! let mut evens = Sequence::range(0, 100)?
//!     .filter(|v| v % 2 == 0)
//!     .select(|v| v * 10)
//!     .take(3)?;
//! assert_eq!(evens.to_vec()?, vec![0, 20, 40]);
//! ```
//!
//! Terminal operators take `&mut self` and stop where they stopped: a
//! sequence that was partially consumed continues from its current
//! position unless it is `reset()`.

mod operators;
mod options;
mod set_ops;
mod terminal;

use std::{fmt, hash::Hash};

pub use operators::{Concat, Filter, Select, SelectMany, Skip, SkipWhile, Take, TakeWhile};
pub use options::{DuplicateKeyPolicy, ToDictionaryOptions};
pub use set_ops::{Distinct, SetFilter, SetMode};
pub use terminal::EachContext;

use crate::{
    collections::{GroupBy, Grouping},
    cursor::{ArrayCursor, BuildContext, BuildCursor, Cursor, EntriesCursor, IndexKey, IterCursor, KeyedCursor},
    util::{Result, Status, checked_count},
};

/// Lazy, ordered series of (key, value) pairs
pub struct Sequence<'a, K, V> {
    cursor: Box<dyn Cursor<Key = K, Value = V> + 'a>,
}

impl<'a, K: 'a, V: 'a> Sequence<'a, K, V> {
    pub fn new<C>(cursor: C) -> Self
    where
        C: Cursor<Key = K, Value = V> + 'a,
    {
        Sequence {
            cursor: Box::new(cursor),
        }
    }

    /// Sequence without elements
    pub fn empty() -> Self {
        Sequence::new(EntriesCursor::new(Vec::new()))
    }

    /// Sequence over explicit `(key, value)` pairs
    pub fn from_pairs(pairs: Vec<(K, V)>) -> Self {
        Sequence::new(EntriesCursor::new(pairs))
    }

    /// Key-preserving sequence over a borrowed map
    ///
    /// Accepts the `iter()` of any map yielding `(&K, &V)`; values are
    /// visited in the map's order and the keys are the map's keys.
    pub fn from_map<I>(iter: I) -> Self
    where
        I: Iterator<Item = (&'a K, &'a V)> + Clone + 'a,
    {
        Sequence::new(KeyedCursor::new(iter))
    }

    /// Open-ended builder
    ///
    /// The callback is invoked once per step with a fresh [`BuildContext`].
    /// Returning `None` or setting `cancel` ends the sequence; clearing
    /// `add_item` skips the produced value. See [`BuildCursor`].
    pub fn build_while<F>(callback: F) -> Self
    where
        K: IndexKey,
        F: FnMut(&mut BuildContext<K, V>) -> Option<V> + 'a,
    {
        Sequence::new(BuildCursor::new(callback))
    }

    /// Lend this sequence to a child operator
    ///
    /// The child advances this sequence's cursor; once the child is dropped
    /// this sequence continues from wherever the child left it.
    pub fn by_ref(&mut self) -> Sequence<'_, K, V> {
        Sequence::new(&mut *self.cursor)
    }

    pub fn valid(&mut self) -> Result<bool> {
        self.cursor.valid()
    }

    pub fn key(&self) -> Result<&K> {
        self.cursor.key()
    }

    pub fn value(&self) -> Result<&V> {
        self.cursor.value()
    }

    pub fn current(&self) -> Result<(&K, &V)> {
        self.cursor.current()
    }

    pub fn advance(&mut self) -> Result<bool> {
        self.cursor.advance()
    }

    pub fn reset(&mut self) -> Result<()> {
        self.cursor.reset()
    }

    pub fn remaining(&self) -> Option<usize> {
        self.cursor.remaining()
    }

    /// Iterator of owned `(key, value)` pairs from the current position
    ///
    /// Stops after the first error, which is yielded as the last item.
    pub fn entries(self) -> Entries<'a, K, V>
    where
        K: Clone,
        V: Clone,
    {
        Entries {
            seq: self,
            failed: false,
        }
    }

    // Deferred operators

    /// Transform every value; keys are unchanged
    pub fn select<U, F>(self, mut selector: F) -> Sequence<'a, K, U>
    where
        U: 'a,
        F: FnMut(&V) -> U + 'a,
    {
        Sequence::new(Select::new(self.cursor, move |v: &V| Ok(selector(v))))
    }

    /// Transform every value with a fallible selector
    ///
    /// An `Err` surfaces when the offending element is pulled.
    pub fn try_select<U, F>(self, selector: F) -> Sequence<'a, K, U>
    where
        U: 'a,
        F: FnMut(&V) -> Result<U> + 'a,
    {
        Sequence::new(Select::new(self.cursor, selector))
    }

    /// Expand every value into a sub-sequence and flatten
    ///
    /// The keys of the result are positions in the flattened output.
    pub fn select_many<I, F>(self, selector: F) -> Sequence<'a, usize, I::Item>
    where
        I: IntoIterator + 'a,
        I::IntoIter: 'a,
        I::Item: 'a,
        F: FnMut(&V) -> I + 'a,
    {
        Sequence::new(SelectMany::new(self.cursor, selector))
    }

    /// Keep the elements matching `predicate`
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnMut(&V) -> bool + 'a,
    {
        Sequence::new(Filter::new(self.cursor, predicate))
    }

    /// Bypass `count` elements; fails with `InvalidArgument` if `count < 0`
    pub fn skip(self, count: i64) -> Result<Self> {
        let count = checked_count(count, "skip count")?;
        Ok(Sequence::new(Skip::new(self.cursor, count)))
    }

    /// Yield at most `count` elements; fails with `InvalidArgument` if `count < 0`
    pub fn take(self, count: i64) -> Result<Self> {
        let count = checked_count(count, "take count")?;
        Ok(Sequence::new(Take::new(self.cursor, count)))
    }

    pub fn skip_while<P>(self, predicate: P) -> Self
    where
        P: FnMut(&V) -> bool + 'a,
    {
        Sequence::new(SkipWhile::new(self.cursor, predicate))
    }

    pub fn take_while<P>(self, predicate: P) -> Self
    where
        P: FnMut(&V) -> bool + 'a,
    {
        Sequence::new(TakeWhile::new(self.cursor, predicate))
    }

    /// The remaining elements of `self`, then those of `other`
    pub fn concat(self, other: Sequence<'a, K, V>) -> Self {
        Sequence::new(Concat::new(self.cursor, other.cursor))
    }

    /// Drop repeated values, keeping the first occurrence
    pub fn distinct(self) -> Self
    where
        V: Hash + Eq + Clone,
    {
        Sequence::new(Distinct::new(self.cursor))
    }

    /// Distinct values of `self` followed by distinct new values of `other`
    pub fn union(self, other: Sequence<'a, K, V>) -> Self
    where
        V: Hash + Eq + Clone,
    {
        self.concat(other).distinct()
    }

    /// Distinct values of `self` that also occur in `other`
    pub fn intersect<K2: 'a>(self, other: Sequence<'a, K2, V>) -> Self
    where
        V: Hash + Eq + Clone,
    {
        Sequence::new(SetFilter::new(self.cursor, other.cursor, SetMode::Intersect))
    }

    /// Distinct values of `self` that don't occur in `other`
    pub fn except<K2: 'a>(self, other: Sequence<'a, K2, V>) -> Self
    where
        V: Hash + Eq + Clone,
    {
        Sequence::new(SetFilter::new(self.cursor, other.cursor, SetMode::Except))
    }

    /// Deferred grouping by computed key, yielding `(key, grouping)` pairs in
    /// first-occurrence order
    pub fn group_by<G, F>(self, key_selector: F) -> Sequence<'a, G, Grouping<G, V>>
    where
        V: Clone,
        G: Hash + Eq + Clone + 'a,
        F: FnMut(&V) -> G + 'a,
    {
        Sequence::new(GroupBy::new(self.cursor, key_selector))
    }
}

impl<'a, V: 'a> Sequence<'a, usize, V> {
    pub fn from_vec(values: Vec<V>) -> Self {
        Sequence::new(ArrayCursor::new(values))
    }

    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        Sequence::from_vec(values.into_iter().collect())
    }

    /// Sequence borrowing the elements of a slice; values are cloned only by
    /// terminal operators that return owned values
    pub fn from_slice(values: &'a [V]) -> Self {
        Sequence::new(ArrayCursor::new(values))
    }

    /// One-shot sequence over an iterator used as a generator
    ///
    /// `reset()` fails with `NotSupported` once the first element was pulled.
    #[allow(clippy::should_implement_trait)]
    pub fn from_iter<I>(iter: I) -> Self
    where
        I: Iterator<Item = V> + 'a,
    {
        Sequence::new(IterCursor::once(iter))
    }

    /// Restartable sequence over a cloneable iterator
    pub fn from_restartable_iter<I>(iter: I) -> Self
    where
        I: Iterator<Item = V> + Clone + 'a,
    {
        Sequence::new(IterCursor::restartable(iter))
    }

    /// `count` copies of `value`
    pub fn repeat(value: V, count: i64) -> Result<Self>
    where
        V: Clone,
    {
        let count = checked_count(count, "repeat count")?;
        Ok(Sequence::from_restartable_iter(std::iter::repeat_n(value, count)))
    }
}

impl Sequence<'static, usize, i64> {
    /// `count` consecutive integers starting at `start`
    pub fn range(start: i64, count: i64) -> Result<Self> {
        checked_count(count, "range count")?;
        let end = start.checked_add(count).ok_or_else(|| {
            Status::invalid_argument(format!("range {start} + {count} overflows"))
        })?;
        Ok(Sequence::from_restartable_iter(start..end))
    }
}

impl<K, V> Cursor for Sequence<'_, K, V> {
    type Key = K;
    type Value = V;

    fn valid(&mut self) -> Result<bool> {
        self.cursor.valid()
    }

    fn key(&self) -> Result<&K> {
        self.cursor.key()
    }

    fn value(&self) -> Result<&V> {
        self.cursor.value()
    }

    fn advance(&mut self) -> Result<bool> {
        self.cursor.advance()
    }

    fn reset(&mut self) -> Result<()> {
        self.cursor.reset()
    }

    fn remaining(&self) -> Option<usize> {
        self.cursor.remaining()
    }
}

impl<K, V> fmt::Debug for Sequence<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("remaining", &self.cursor.remaining())
            .finish_non_exhaustive()
    }
}

/// Owned `(key, value)` iterator returned by [`Sequence::entries`]
pub struct Entries<'a, K, V> {
    seq: Sequence<'a, K, V>,
    failed: bool,
}

impl<'a, K: Clone + 'a, V: Clone + 'a> Entries<'a, K, V> {
    fn pull(&mut self) -> Result<Option<(K, V)>> {
        if !self.seq.valid()? {
            return Ok(None);
        }
        let (k, v) = self.seq.current()?;
        let entry = (k.clone(), v.clone());
        self.seq.advance()?;
        Ok(Some(entry))
    }
}

impl<'a, K: Clone + 'a, V: Clone + 'a> Iterator for Entries<'a, K, V> {
    type Item = Result<(K, V)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.pull() {
            Ok(entry) => entry.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            },
        }
    }
}

use crate::{
    cursor::{Cursor, exact_size_hint},
    util::{Result, Status},
};

/// Key-preserving cursor over a borrowed key/value map
///
/// Wraps any cloneable iterator of `(&K, &V)` pairs, which covers the `iter()`
/// of `Dictionary`, `HashMap`, `BTreeMap` and friends. Nothing is copied:
/// the current key and value are the map's own entries, visited in the map's
/// iteration order.
///
/// A pristine clone of the iterator is kept so `reset()` always succeeds.
pub struct KeyedCursor<'a, K, V, I> {
    origin: I,
    iter: I,
    current: Option<(&'a K, &'a V)>,
    started: bool,
}

impl<'a, K, V, I> KeyedCursor<'a, K, V, I>
where
    I: Iterator<Item = (&'a K, &'a V)> + Clone,
{
    pub fn new(iter: I) -> Self {
        KeyedCursor {
            origin: iter.clone(),
            iter,
            current: None,
            started: false,
        }
    }
}

impl<'a, K, V, I> Cursor for KeyedCursor<'a, K, V, I>
where
    I: Iterator<Item = (&'a K, &'a V)> + Clone,
{
    type Key = K;
    type Value = V;

    fn valid(&mut self) -> Result<bool> {
        if !self.started {
            self.started = true;
            self.current = self.iter.next();
        }
        Ok(self.current.is_some())
    }

    fn key(&self) -> Result<&K> {
        self.current.map(|(k, _)| k).ok_or_else(Status::not_positioned)
    }

    fn value(&self) -> Result<&V> {
        self.current.map(|(_, v)| v).ok_or_else(Status::not_positioned)
    }

    fn advance(&mut self) -> Result<bool> {
        if !self.valid()? {
            return Ok(false);
        }
        self.current = self.iter.next();
        Ok(self.current.is_some())
    }

    fn reset(&mut self) -> Result<()> {
        self.iter = self.origin.clone();
        self.current = None;
        self.started = false;
        Ok(())
    }

    fn remaining(&self) -> Option<usize> {
        let rest = exact_size_hint(&self.iter)?;
        Some(rest + usize::from(self.current.is_some()))
    }
}

/// Cursor over owned `(key, value)` pairs
///
/// Used when a sequence has to own its entries, e.g. a dictionary or lookup
/// turned into a sequence by value. Restartable.
pub struct EntriesCursor<K, V> {
    entries: Vec<(K, V)>,
    pos: usize,
}

impl<K, V> EntriesCursor<K, V> {
    pub fn new(entries: Vec<(K, V)>) -> Self {
        EntriesCursor { entries, pos: 0 }
    }

    fn entry(&self) -> Result<&(K, V)> {
        self.entries.get(self.pos).ok_or_else(Status::not_positioned)
    }
}

impl<K, V> Cursor for EntriesCursor<K, V> {
    type Key = K;
    type Value = V;

    fn valid(&mut self) -> Result<bool> {
        Ok(self.pos < self.entries.len())
    }

    fn key(&self) -> Result<&K> {
        self.entry().map(|(k, _)| k)
    }

    fn value(&self) -> Result<&V> {
        self.entry().map(|(_, v)| v)
    }

    fn advance(&mut self) -> Result<bool> {
        let len = self.entries.len();
        if self.pos < len {
            self.pos += 1;
        }
        Ok(self.pos < len)
    }

    fn reset(&mut self) -> Result<()> {
        self.pos = 0;
        Ok(())
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.entries.len() - self.pos)
    }
}

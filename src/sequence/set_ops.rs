//! Hash-based set operators.
//!
//! Elements are compared by value (`Hash + Eq`); the first occurrence wins
//! and keeps its key. The right-hand side of `intersect`/`except` is drained
//! into a hash set on the first pull, not when the operator is created.

use std::{collections::HashSet, hash::Hash};

use crate::{
    cursor::Cursor,
    util::{Result, Status},
};

/// Drops values that were already yielded.
pub struct Distinct<C: Cursor> {
    parent: C,
    seen: HashSet<C::Value>,
    started: bool,
    positioned: bool,
}

impl<C> Distinct<C>
where
    C: Cursor,
    C::Value: Hash + Eq + Clone,
{
    pub fn new(parent: C) -> Self {
        Distinct {
            parent,
            seen: HashSet::new(),
            started: false,
            positioned: false,
        }
    }

    fn seek(&mut self) -> Result<bool> {
        while self.parent.valid()? {
            let value = self.parent.value()?;
            if !self.seen.contains(value) {
                self.seen.insert(value.clone());
                self.positioned = true;
                return Ok(true);
            }
            self.parent.advance()?;
        }
        self.positioned = false;
        Ok(false)
    }
}

impl<C> Cursor for Distinct<C>
where
    C: Cursor,
    C::Value: Hash + Eq + Clone,
{
    type Key = C::Key;
    type Value = C::Value;

    fn valid(&mut self) -> Result<bool> {
        if !self.started {
            self.started = true;
            return self.seek();
        }
        Ok(self.positioned)
    }

    fn key(&self) -> Result<&C::Key> {
        if !self.positioned {
            return Err(Status::not_positioned());
        }
        self.parent.key()
    }

    fn value(&self) -> Result<&C::Value> {
        if !self.positioned {
            return Err(Status::not_positioned());
        }
        self.parent.value()
    }

    fn advance(&mut self) -> Result<bool> {
        if !self.valid()? {
            return Ok(false);
        }
        self.parent.advance()?;
        self.seek()
    }

    fn reset(&mut self) -> Result<()> {
        self.parent.reset()?;
        self.seen.clear();
        self.started = false;
        self.positioned = false;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMode {
    /// Values present in both sides, each yielded once
    Intersect,
    /// Values of the left side absent from the right side, each yielded once
    Except,
}

/// Filters the left side against a lazily materialized right side.
pub struct SetFilter<C: Cursor, O> {
    parent: C,
    other: O,
    mode: SetMode,
    set: Option<HashSet<C::Value>>,
    positioned: bool,
}

impl<C, O> SetFilter<C, O>
where
    C: Cursor,
    C::Value: Hash + Eq + Clone,
    O: Cursor<Value = C::Value>,
{
    pub fn new(parent: C, other: O, mode: SetMode) -> Self {
        SetFilter {
            parent,
            other,
            mode,
            set: None,
            positioned: false,
        }
    }

    fn materialize_other(&mut self) -> Result<HashSet<C::Value>> {
        let mut set = HashSet::new();
        while self.other.valid()? {
            set.insert(self.other.value()?.clone());
            self.other.advance()?;
        }
        Ok(set)
    }

    fn seek(&mut self) -> Result<bool> {
        let Some(set) = self.set.as_mut() else {
            return Err(Status::not_positioned());
        };
        while self.parent.valid()? {
            let value = self.parent.value()?;
            let keep = match self.mode {
                SetMode::Intersect => set.remove(value),
                SetMode::Except => set.insert(value.clone()),
            };
            if keep {
                self.positioned = true;
                return Ok(true);
            }
            self.parent.advance()?;
        }
        self.positioned = false;
        Ok(false)
    }
}

impl<C, O> Cursor for SetFilter<C, O>
where
    C: Cursor,
    C::Value: Hash + Eq + Clone,
    O: Cursor<Value = C::Value>,
{
    type Key = C::Key;
    type Value = C::Value;

    fn valid(&mut self) -> Result<bool> {
        if self.set.is_none() {
            let set = self.materialize_other()?;
            self.set = Some(set);
            return self.seek();
        }
        Ok(self.positioned)
    }

    fn key(&self) -> Result<&C::Key> {
        if !self.positioned {
            return Err(Status::not_positioned());
        }
        self.parent.key()
    }

    fn value(&self) -> Result<&C::Value> {
        if !self.positioned {
            return Err(Status::not_positioned());
        }
        self.parent.value()
    }

    fn advance(&mut self) -> Result<bool> {
        if !self.valid()? {
            return Ok(false);
        }
        self.parent.advance()?;
        self.seek()
    }

    fn reset(&mut self) -> Result<()> {
        self.parent.reset()?;
        self.other.reset()?;
        self.set = None;
        self.positioned = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::ArrayCursor;

    fn drain<C: Cursor>(mut cursor: C) -> Vec<(C::Key, C::Value)>
    where
        C::Key: Clone,
        C::Value: Clone,
    {
        let mut out = Vec::new();
        while cursor.valid().unwrap() {
            let (k, v) = cursor.current().unwrap();
            out.push((k.clone(), v.clone()));
            cursor.advance().unwrap();
        }
        out
    }

    #[test]
    fn test_distinct_keeps_first_key() {
        let distinct = Distinct::new(ArrayCursor::new(vec!["a", "b", "a", "c", "b"]));
        assert_eq!(drain(distinct), vec![(0, "a"), (1, "b"), (3, "c")]);
    }

    #[test]
    fn test_intersect() {
        let left = ArrayCursor::new(vec![1, 2, 3, 4, 5, 2]);
        let right = ArrayCursor::new(vec![3, 2]);
        let values: Vec<_> = drain(SetFilter::new(left, right, SetMode::Intersect))
            .into_iter()
            .map(|(_, v)| v)
            .collect();
        assert_eq!(values, vec![2, 3]);
    }

    #[test]
    fn test_intersect_with_empty() {
        let left = ArrayCursor::new(vec![1, 2, 3]);
        let right = ArrayCursor::new(Vec::<i32>::new());
        assert!(drain(SetFilter::new(left, right, SetMode::Intersect)).is_empty());
    }

    #[test]
    fn test_except() {
        let left = ArrayCursor::new(vec![1, 2, 3, 1, 4]);
        let right = ArrayCursor::new(vec![2, 4]);
        assert_eq!(drain(SetFilter::new(left, right, SetMode::Except)), vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_set_filter_reset_rebuilds() {
        let left = ArrayCursor::new(vec![1, 2, 3]);
        let right = ArrayCursor::new(vec![2, 3]);
        let mut op = SetFilter::new(left, right, SetMode::Intersect);
        while op.valid().unwrap() {
            op.advance().unwrap();
        }
        op.reset().unwrap();
        assert_eq!(drain(op), vec![(1, 2), (2, 3)]);
    }
}

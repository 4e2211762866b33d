//! Deferred operators.
//!
//! Each operator is a small state struct owning its parent cursor. Nothing is
//! pulled from the parent until the operator itself is first asked whether
//! it is `valid()`. Resetting an operator resets its parent(s) and its own
//! state, so a chain is restartable exactly when its sources are.

use crate::{
    cursor::Cursor,
    util::{Result, Status},
};

/// 1:1 value transform; keys pass through.
pub struct Select<C, F, U> {
    parent: C,
    selector: F,
    current: Option<U>,
    started: bool,
}

impl<C, F, U> Select<C, F, U>
where
    C: Cursor,
    F: FnMut(&C::Value) -> Result<U>,
{
    pub fn new(parent: C, selector: F) -> Self {
        Select {
            parent,
            selector,
            current: None,
            started: false,
        }
    }

    fn load(&mut self) -> Result<bool> {
        self.current = None;
        if self.parent.valid()? {
            self.current = Some((self.selector)(self.parent.value()?)?);
        }
        Ok(self.current.is_some())
    }
}

impl<C, F, U> Cursor for Select<C, F, U>
where
    C: Cursor,
    F: FnMut(&C::Value) -> Result<U>,
{
    type Key = C::Key;
    type Value = U;

    fn valid(&mut self) -> Result<bool> {
        if !self.started {
            self.started = true;
            return self.load();
        }
        Ok(self.current.is_some())
    }

    fn key(&self) -> Result<&C::Key> {
        if self.current.is_none() {
            return Err(Status::not_positioned());
        }
        self.parent.key()
    }

    fn value(&self) -> Result<&U> {
        self.current.as_ref().ok_or_else(Status::not_positioned)
    }

    fn advance(&mut self) -> Result<bool> {
        if !self.valid()? {
            return Ok(false);
        }
        self.parent.advance()?;
        self.load()
    }

    fn reset(&mut self) -> Result<()> {
        self.parent.reset()?;
        self.current = None;
        self.started = false;
        Ok(())
    }

    fn remaining(&self) -> Option<usize> {
        // a failed selector ends the sequence where it failed
        if self.started && self.current.is_none() {
            return Some(0);
        }
        self.parent.remaining()
    }
}

/// Keeps the elements matching a predicate; keys pass through.
pub struct Filter<C, P> {
    parent: C,
    predicate: P,
    started: bool,
    positioned: bool,
}

impl<C, P> Filter<C, P>
where
    C: Cursor,
    P: FnMut(&C::Value) -> bool,
{
    pub fn new(parent: C, predicate: P) -> Self {
        Filter {
            parent,
            predicate,
            started: false,
            positioned: false,
        }
    }

    fn seek(&mut self) -> Result<bool> {
        while self.parent.valid()? {
            if (self.predicate)(self.parent.value()?) {
                self.positioned = true;
                return Ok(true);
            }
            self.parent.advance()?;
        }
        self.positioned = false;
        Ok(false)
    }
}

impl<C, P> Cursor for Filter<C, P>
where
    C: Cursor,
    P: FnMut(&C::Value) -> bool,
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
        self.started = false;
        self.positioned = false;
        Ok(())
    }
}

/// Expands every value into a sub-sequence and flattens the result.
///
/// Keys are fresh positions (0, 1, 2, ...) in the flattened output.
pub struct SelectMany<C, F, I: IntoIterator> {
    parent: C,
    selector: F,
    inner: Option<I::IntoIter>,
    current: Option<I::Item>,
    position: usize,
    started: bool,
}

impl<C, F, I> SelectMany<C, F, I>
where
    C: Cursor,
    F: FnMut(&C::Value) -> I,
    I: IntoIterator,
{
    pub fn new(parent: C, selector: F) -> Self {
        SelectMany {
            parent,
            selector,
            inner: None,
            current: None,
            position: 0,
            started: false,
        }
    }

    fn seek(&mut self) -> Result<bool> {
        loop {
            if let Some(inner) = self.inner.as_mut() {
                if let Some(item) = inner.next() {
                    self.current = Some(item);
                    return Ok(true);
                }
                self.inner = None;
                if !self.parent.advance()? {
                    break;
                }
            } else if !self.parent.valid()? {
                break;
            }
            let expanded = (self.selector)(self.parent.value()?);
            self.inner = Some(expanded.into_iter());
        }
        self.current = None;
        Ok(false)
    }
}

impl<C, F, I> Cursor for SelectMany<C, F, I>
where
    C: Cursor,
    F: FnMut(&C::Value) -> I,
    I: IntoIterator,
{
    type Key = usize;
    type Value = I::Item;

    fn valid(&mut self) -> Result<bool> {
        if !self.started {
            self.started = true;
            return self.seek();
        }
        Ok(self.current.is_some())
    }

    fn key(&self) -> Result<&usize> {
        match self.current {
            Some(_) => Ok(&self.position),
            None => Err(Status::not_positioned()),
        }
    }

    fn value(&self) -> Result<&I::Item> {
        self.current.as_ref().ok_or_else(Status::not_positioned)
    }

    fn advance(&mut self) -> Result<bool> {
        if !self.valid()? {
            return Ok(false);
        }
        self.position += 1;
        self.seek()
    }

    fn reset(&mut self) -> Result<()> {
        self.parent.reset()?;
        self.inner = None;
        self.current = None;
        self.position = 0;
        self.started = false;
        Ok(())
    }
}

/// Drops the first `count` elements.
pub struct Skip<C> {
    parent: C,
    count: usize,
    left: usize,
}

impl<C: Cursor> Skip<C> {
    pub fn new(parent: C, count: usize) -> Self {
        Skip {
            parent,
            count,
            left: count,
        }
    }
}

impl<C: Cursor> Cursor for Skip<C> {
    type Key = C::Key;
    type Value = C::Value;

    fn valid(&mut self) -> Result<bool> {
        while self.left > 0 && self.parent.valid()? {
            self.parent.advance()?;
            self.left -= 1;
        }
        self.left = 0;
        self.parent.valid()
    }

    fn key(&self) -> Result<&C::Key> {
        if self.left > 0 {
            return Err(Status::not_positioned());
        }
        self.parent.key()
    }

    fn value(&self) -> Result<&C::Value> {
        if self.left > 0 {
            return Err(Status::not_positioned());
        }
        self.parent.value()
    }

    fn advance(&mut self) -> Result<bool> {
        if !self.valid()? {
            return Ok(false);
        }
        self.parent.advance()
    }

    fn reset(&mut self) -> Result<()> {
        self.parent.reset()?;
        self.left = self.count;
        Ok(())
    }

    fn remaining(&self) -> Option<usize> {
        let rest = self.parent.remaining()?;
        Some(rest.saturating_sub(self.left))
    }
}

/// Yields at most `count` elements.
///
/// The parent is advanced once per consumed element, so after a full pass
/// it sits right behind the last element taken.
pub struct Take<C> {
    parent: C,
    count: usize,
    left: usize,
}

impl<C: Cursor> Take<C> {
    pub fn new(parent: C, count: usize) -> Self {
        Take {
            parent,
            count,
            left: count,
        }
    }
}

impl<C: Cursor> Cursor for Take<C> {
    type Key = C::Key;
    type Value = C::Value;

    fn valid(&mut self) -> Result<bool> {
        Ok(self.left > 0 && self.parent.valid()?)
    }

    fn key(&self) -> Result<&C::Key> {
        if self.left == 0 {
            return Err(Status::not_positioned());
        }
        self.parent.key()
    }

    fn value(&self) -> Result<&C::Value> {
        if self.left == 0 {
            return Err(Status::not_positioned());
        }
        self.parent.value()
    }

    fn advance(&mut self) -> Result<bool> {
        if !self.valid()? {
            return Ok(false);
        }
        self.parent.advance()?;
        self.left -= 1;
        self.valid()
    }

    fn reset(&mut self) -> Result<()> {
        self.parent.reset()?;
        self.left = self.count;
        Ok(())
    }

    fn remaining(&self) -> Option<usize> {
        let rest = self.parent.remaining()?;
        Some(rest.min(self.left))
    }
}

/// Drops elements while the predicate holds, then yields the rest.
pub struct SkipWhile<C, P> {
    parent: C,
    predicate: P,
    skipped: bool,
}

impl<C, P> SkipWhile<C, P>
where
    C: Cursor,
    P: FnMut(&C::Value) -> bool,
{
    pub fn new(parent: C, predicate: P) -> Self {
        SkipWhile {
            parent,
            predicate,
            skipped: false,
        }
    }
}

impl<C, P> Cursor for SkipWhile<C, P>
where
    C: Cursor,
    P: FnMut(&C::Value) -> bool,
{
    type Key = C::Key;
    type Value = C::Value;

    fn valid(&mut self) -> Result<bool> {
        if !self.skipped {
            while self.parent.valid()? && (self.predicate)(self.parent.value()?) {
                self.parent.advance()?;
            }
            self.skipped = true;
        }
        self.parent.valid()
    }

    fn key(&self) -> Result<&C::Key> {
        if !self.skipped {
            return Err(Status::not_positioned());
        }
        self.parent.key()
    }

    fn value(&self) -> Result<&C::Value> {
        if !self.skipped {
            return Err(Status::not_positioned());
        }
        self.parent.value()
    }

    fn advance(&mut self) -> Result<bool> {
        if !self.valid()? {
            return Ok(false);
        }
        self.parent.advance()
    }

    fn reset(&mut self) -> Result<()> {
        self.parent.reset()?;
        self.skipped = false;
        Ok(())
    }
}

/// Yields elements while the predicate holds, then stops for good.
pub struct TakeWhile<C, P> {
    parent: C,
    predicate: P,
    started: bool,
    positioned: bool,
}

impl<C, P> TakeWhile<C, P>
where
    C: Cursor,
    P: FnMut(&C::Value) -> bool,
{
    pub fn new(parent: C, predicate: P) -> Self {
        TakeWhile {
            parent,
            predicate,
            started: false,
            positioned: false,
        }
    }

    fn check(&mut self) -> Result<bool> {
        self.positioned = self.parent.valid()? && (self.predicate)(self.parent.value()?);
        Ok(self.positioned)
    }
}

impl<C, P> Cursor for TakeWhile<C, P>
where
    C: Cursor,
    P: FnMut(&C::Value) -> bool,
{
    type Key = C::Key;
    type Value = C::Value;

    fn valid(&mut self) -> Result<bool> {
        if !self.started {
            self.started = true;
            return self.check();
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
        self.check()
    }

    fn reset(&mut self) -> Result<()> {
        self.parent.reset()?;
        self.started = false;
        self.positioned = false;
        Ok(())
    }
}

/// All remaining elements of `first`, then all remaining elements of `second`.
pub struct Concat<A, B> {
    first: A,
    second: B,
    on_second: bool,
}

impl<A, B> Concat<A, B>
where
    A: Cursor,
    B: Cursor<Key = A::Key, Value = A::Value>,
{
    pub fn new(first: A, second: B) -> Self {
        Concat {
            first,
            second,
            on_second: false,
        }
    }
}

impl<A, B> Cursor for Concat<A, B>
where
    A: Cursor,
    B: Cursor<Key = A::Key, Value = A::Value>,
{
    type Key = A::Key;
    type Value = A::Value;

    fn valid(&mut self) -> Result<bool> {
        if !self.on_second {
            if self.first.valid()? {
                return Ok(true);
            }
            self.on_second = true;
        }
        self.second.valid()
    }

    fn key(&self) -> Result<&A::Key> {
        if self.on_second {
            self.second.key()
        } else {
            self.first.key()
        }
    }

    fn value(&self) -> Result<&A::Value> {
        if self.on_second {
            self.second.value()
        } else {
            self.first.value()
        }
    }

    fn advance(&mut self) -> Result<bool> {
        if !self.valid()? {
            return Ok(false);
        }
        if self.on_second {
            return self.second.advance();
        }
        self.first.advance()?;
        self.valid()
    }

    fn reset(&mut self) -> Result<()> {
        self.first.reset()?;
        self.second.reset()?;
        self.on_second = false;
        Ok(())
    }

    /// Unknown when the combined length doesn't fit in `usize`
    fn remaining(&self) -> Option<usize> {
        self.first.remaining()?.checked_add(self.second.remaining()?)
    }
}

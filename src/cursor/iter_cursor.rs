use crate::{
    cursor::{Cursor, exact_size_hint, refuse_reset},
    util::{Result, Status},
};

/// Cursor over a Rust iterator, used as a generator
///
/// Keys are the zero-based positions of the produced items. The iterator is
/// not touched until the cursor is first pulled.
///
/// # Restartability
///
/// - Built with [`IterCursor::once`]: one-shot. `reset()` is accepted only
///   while nothing has been pulled yet, afterwards it fails with
///   `NotSupported`.
/// - Built with [`IterCursor::restartable`]: keeps a pristine clone of the
///   iterator and replays it on `reset()`.
pub struct IterCursor<I: Iterator> {
    iter: I,
    origin: Option<Origin<I>>,
    current: Option<I::Item>,
    index: usize,
    started: bool,
}

impl<I: Iterator> IterCursor<I> {
    pub fn once(iter: I) -> Self {
        IterCursor {
            iter,
            origin: None,
            current: None,
            index: 0,
            started: false,
        }
    }

    pub fn restartable(iter: I) -> Self
    where
        I: Clone,
    {
        IterCursor {
            origin: Some(Origin {
                pristine: iter.clone(),
                replay: I::clone,
            }),
            iter,
            current: None,
            index: 0,
            started: false,
        }
    }

    pub fn is_restartable(&self) -> bool {
        self.origin.is_some()
    }
}

/// Pristine copy of a restartable iterator plus the way to duplicate it
struct Origin<I> {
    pristine: I,
    replay: fn(&I) -> I,
}

impl<I: Iterator> Cursor for IterCursor<I> {
    type Key = usize;
    type Value = I::Item;

    fn valid(&mut self) -> Result<bool> {
        if !self.started {
            self.started = true;
            self.current = self.iter.next();
        }
        Ok(self.current.is_some())
    }

    fn key(&self) -> Result<&usize> {
        match self.current {
            Some(_) => Ok(&self.index),
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
        self.current = self.iter.next();
        self.index += 1;
        Ok(self.current.is_some())
    }

    fn reset(&mut self) -> Result<()> {
        if !self.started {
            return Ok(());
        }
        match &self.origin {
            Some(origin) => self.iter = (origin.replay)(&origin.pristine),
            None => return Err(refuse_reset("iterator source")),
        }
        self.current = None;
        self.index = 0;
        self.started = false;
        Ok(())
    }

    fn remaining(&self) -> Option<usize> {
        let rest = exact_size_hint(&self.iter)?;
        rest.checked_add(usize::from(self.current.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_cursor_is_lazy() {
        let mut pulled = 0;
        let iter = std::iter::from_fn(|| {
            pulled += 1;
            Some(pulled)
        });
        let mut cursor = IterCursor::once(iter);
        assert!(cursor.key().is_err());

        assert!(cursor.valid().unwrap());
        assert_eq!(cursor.current().unwrap(), (&0, &1));
        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.current().unwrap(), (&1, &2));
    }

    #[test]
    fn test_iter_cursor_one_shot_reset() {
        let mut cursor = IterCursor::once(vec![1, 2].into_iter());

        // nothing pulled yet: reset is a no-op
        cursor.reset().unwrap();

        assert!(cursor.valid().unwrap());
        let err = cursor.reset().unwrap_err();
        assert!(err.is_not_supported());
    }

    #[test]
    fn test_iter_cursor_restartable_reset() {
        let mut cursor = IterCursor::restartable(1..4);
        assert_eq!(cursor.remaining(), Some(3));

        let mut seen = Vec::new();
        while cursor.valid().unwrap() {
            seen.push(*cursor.value().unwrap());
            cursor.advance().unwrap();
        }
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(cursor.remaining(), Some(0));

        cursor.reset().unwrap();
        assert!(cursor.valid().unwrap());
        assert_eq!(cursor.current().unwrap(), (&0, &1));
        assert_eq!(cursor.remaining(), Some(3));
    }
}

use std::ops::Deref;

use crate::{
    cursor::Cursor,
    util::{Result, Status},
};

/// Cursor over any contiguous storage: `Vec<T>`, `&[T]`, `Box<[T]>`, ...
///
/// Keys are the zero-based positions. The cursor is positioned on the first
/// element as soon as it is created, always restartable, and reports its
/// remaining length exactly.
pub struct ArrayCursor<S> {
    items: S,
    pos: usize,
}

impl<S> ArrayCursor<S> {
    pub fn new(items: S) -> Self {
        ArrayCursor { items, pos: 0 }
    }

    /// Give back the underlying storage
    pub fn into_inner(self) -> S {
        self.items
    }
}

impl<S, T> Cursor for ArrayCursor<S>
where
    S: Deref<Target = [T]>,
{
    type Key = usize;
    type Value = T;

    fn valid(&mut self) -> Result<bool> {
        Ok(self.pos < self.items.len())
    }

    fn key(&self) -> Result<&usize> {
        if self.pos < self.items.len() {
            Ok(&self.pos)
        } else {
            Err(Status::not_positioned())
        }
    }

    fn value(&self) -> Result<&T> {
        self.items.get(self.pos).ok_or_else(Status::not_positioned)
    }

    fn advance(&mut self) -> Result<bool> {
        let len = self.items.len();
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
        Some(self.items.len() - self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_cursor_basic() {
        let mut cursor = ArrayCursor::new(vec!["a", "b", "c"]);
        assert!(cursor.valid().unwrap());
        assert_eq!(cursor.current().unwrap(), (&0, &"a"));

        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.current().unwrap(), (&1, &"b"));
        assert_eq!(cursor.remaining(), Some(2));

        assert!(cursor.advance().unwrap());
        assert!(!cursor.advance().unwrap());
        assert!(!cursor.valid().unwrap());
        assert!(cursor.value().unwrap_err().is_index_out_of_range());

        // advancing an exhausted cursor stays exhausted
        assert!(!cursor.advance().unwrap());
        assert_eq!(cursor.remaining(), Some(0));
    }

    #[test]
    fn test_array_cursor_reset_over_slice() {
        let data = [10, 20];
        let mut cursor = ArrayCursor::new(&data[..]);
        while cursor.valid().unwrap() {
            cursor.advance().unwrap();
        }

        cursor.reset().unwrap();
        assert_eq!(cursor.value().unwrap(), &10);
    }

    #[test]
    fn test_array_cursor_positioned_before_first_pull() {
        let cursor = ArrayCursor::new(vec![7, 8]);
        assert_eq!(cursor.current().unwrap(), (&0, &7));
        assert_eq!(cursor.remaining(), Some(2));
    }

    #[test]
    fn test_array_cursor_empty() {
        let mut cursor = ArrayCursor::new(Vec::<u8>::new());
        assert!(!cursor.valid().unwrap());
        assert!(cursor.key().is_err());
        assert_eq!(cursor.remaining(), Some(0));
    }
}

use crate::{
    cursor::{Cursor, refuse_reset},
    util::{Result, Status},
};

/// Keys that can be derived from an element's position
///
/// Used by [`BuildCursor`] when the callback doesn't set a custom key.
/// Returns `None` when the position doesn't fit the key type; the builder
/// then fails with `InvalidArgument` instead of emitting a wrapped key.
pub trait IndexKey: Sized {
    fn from_index(index: usize) -> Option<Self>;
}

macro_rules! index_key_from_int {
    ($($t:ty),*) => {
        $(
            impl IndexKey for $t {
                fn from_index(index: usize) -> Option<Self> {
                    <$t>::try_from(index).ok()
                }
            }
        )*
    };
}

index_key_from_int!(usize, u64, u32, u16, u8, i64, i32);

impl IndexKey for String {
    fn from_index(index: usize) -> Option<Self> {
        Some(index.to_string())
    }
}

/// Per-call state handed to a [`BuildCursor`] callback
///
/// A fresh context is created for every invocation; only `next_value` (as
/// the following call's `prev_value`) and `count` carry over.
#[derive(Debug)]
pub struct BuildContext<K, V> {
    /// Zero-based invocation number
    pub index: usize,
    pub is_first: bool,
    /// Value stored in `next_value` by the previous invocation
    pub prev_value: Option<V>,
    /// Value handed to the next invocation as `prev_value`
    pub next_value: Option<V>,
    /// Custom key for the produced item
    pub new_key: Option<K>,
    /// Set to false to skip the produced item and keep building
    pub add_item: bool,
    /// Set to true to stop; the item produced by this call is discarded
    pub cancel: bool,
    /// Maximum number of items to emit, may be changed by the callback
    pub count: Option<usize>,
}

/// Open-ended builder source
///
/// Each pull invokes the callback until it produces an item that is added,
/// cancels, declines (returns `None`) or the `count` limit is reached.
/// Generation is unbounded otherwise. The callback may hold arbitrary state
/// so the cursor is one-shot: `reset()` only succeeds before the first pull.
pub struct BuildCursor<K, V, F> {
    callback: F,
    index: usize,
    emitted: usize,
    count: Option<usize>,
    carry: Option<V>,
    current: Option<(K, V)>,
    started: bool,
    done: bool,
}

impl<K, V, F> BuildCursor<K, V, F>
where
    K: IndexKey,
    F: FnMut(&mut BuildContext<K, V>) -> Option<V>,
{
    pub fn new(callback: F) -> Self {
        BuildCursor {
            callback,
            index: 0,
            emitted: 0,
            count: None,
            carry: None,
            current: None,
            started: false,
            done: false,
        }
    }

    fn step(&mut self) -> Result<()> {
        self.current = None;
        while !self.done {
            if self.count.is_some_and(|limit| self.emitted >= limit) {
                self.finish("count reached");
                break;
            }

            let mut ctx = BuildContext {
                index: self.index,
                is_first: self.index == 0,
                prev_value: self.carry.take(),
                next_value: None,
                new_key: None,
                add_item: true,
                cancel: false,
                count: self.count,
            };
            let produced = (self.callback)(&mut ctx);
            self.index += 1;
            self.count = ctx.count;
            self.carry = ctx.next_value;

            if ctx.cancel {
                self.finish("cancelled");
                break;
            }
            match produced {
                None => self.finish("declined"),
                Some(value) if ctx.add_item => {
                    let key = match ctx.new_key {
                        Some(key) => key,
                        None => self.index_key()?,
                    };
                    self.emitted += 1;
                    self.current = Some((key, value));
                    break;
                },
                Some(_) => {},
            }
        }
        Ok(())
    }

    fn index_key(&mut self) -> Result<K> {
        match K::from_index(self.emitted) {
            Some(key) => Ok(key),
            None => {
                self.finish("key overflow");
                Err(Status::invalid_argument(format!(
                    "position {} does not fit the key type",
                    self.emitted
                )))
            },
        }
    }

    fn finish(&mut self, reason: &'static str) {
        tracing::trace!(reason, invocations = self.index, emitted = self.emitted, "builder stopped");
        self.done = true;
    }
}

impl<K, V, F> Cursor for BuildCursor<K, V, F>
where
    K: IndexKey,
    F: FnMut(&mut BuildContext<K, V>) -> Option<V>,
{
    type Key = K;
    type Value = V;

    fn valid(&mut self) -> Result<bool> {
        if !self.started {
            self.started = true;
            self.step()?;
        }
        Ok(self.current.is_some())
    }

    fn key(&self) -> Result<&K> {
        self.current
            .as_ref()
            .map(|(k, _)| k)
            .ok_or_else(Status::not_positioned)
    }

    fn value(&self) -> Result<&V> {
        self.current
            .as_ref()
            .map(|(_, v)| v)
            .ok_or_else(Status::not_positioned)
    }

    fn advance(&mut self) -> Result<bool> {
        if !self.valid()? {
            return Ok(false);
        }
        self.step()?;
        Ok(self.current.is_some())
    }

    fn reset(&mut self) -> Result<()> {
        if self.started {
            return Err(refuse_reset("builder source"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<C: Cursor>(cursor: &mut C) -> Vec<(C::Key, C::Value)>
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
    fn test_build_until_cancel() {
        let mut cursor = BuildCursor::new(|ctx: &mut BuildContext<String, usize>| {
            ctx.cancel = ctx.index > 2;
            ctx.new_key = Some(format!("KEY::{}", ctx.index));
            Some(ctx.index * 10)
        });

        assert_eq!(
            drain(&mut cursor),
            vec![
                ("KEY::0".to_string(), 0),
                ("KEY::1".to_string(), 10),
                ("KEY::2".to_string(), 20),
            ]
        );
    }

    #[test]
    fn test_build_carries_values() {
        // fibonacci: prev_value carries the previous pair's second member
        let mut cursor = BuildCursor::new(|ctx: &mut BuildContext<usize, (u64, u64)>| {
            let (a, b) = ctx.prev_value.unwrap_or((0, 1));
            ctx.next_value = Some((b, a + b));
            Some((a, b))
        });

        let mut fib = Vec::new();
        while fib.len() < 7 && cursor.valid().unwrap() {
            fib.push(cursor.value().unwrap().0);
            cursor.advance().unwrap();
        }
        assert_eq!(fib, vec![0, 1, 1, 2, 3, 5, 8]);
    }

    #[test]
    fn test_build_skips_and_declines() {
        let mut cursor = BuildCursor::new(|ctx: &mut BuildContext<usize, usize>| {
            if ctx.index >= 6 {
                return None;
            }
            ctx.add_item = ctx.index % 2 == 0;
            Some(ctx.index)
        });

        assert_eq!(drain(&mut cursor), vec![(0, 0), (1, 2), (2, 4)]);
    }

    #[test]
    fn test_build_count_limit() {
        let mut cursor = BuildCursor::new(|ctx: &mut BuildContext<i64, &str>| {
            if ctx.is_first {
                ctx.count = Some(2);
            }
            Some("x")
        });

        assert_eq!(drain(&mut cursor), vec![(0, "x"), (1, "x")]);
    }

    #[test]
    fn test_index_key_conversion() {
        assert_eq!(u32::from_index(7), Some(7));
        assert_eq!(u32::from_index(u32::MAX as usize), Some(u32::MAX));
        assert_eq!(i32::from_index(i32::MAX as usize + 1), None);
        assert_eq!(u8::from_index(256), None);
        assert_eq!(String::from_index(12), Some("12".to_string()));
    }

    #[test]
    fn test_build_fails_when_position_overflows_key() {
        let mut cursor = BuildCursor::new(|_: &mut BuildContext<u8, ()>| Some(()));
        let mut last = 0;
        while cursor.valid().unwrap() {
            last = *cursor.key().unwrap();
            if last == u8::MAX {
                break;
            }
            cursor.advance().unwrap();
        }
        assert_eq!(last, u8::MAX);

        assert!(cursor.advance().unwrap_err().is_invalid_argument());
        assert!(!cursor.valid().unwrap());
        assert!(!cursor.advance().unwrap());
    }

    #[test]
    fn test_build_reset_after_start_fails() {
        let mut cursor = BuildCursor::new(|_: &mut BuildContext<usize, u8>| Some(1));
        cursor.reset().unwrap();
        assert!(cursor.valid().unwrap());
        assert!(cursor.reset().unwrap_err().is_not_supported());
    }
}

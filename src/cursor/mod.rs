/// Cursor module for lazyseq
///
/// Provides the protocol every sequence source speaks, plus the concrete
/// sources the crate ships with:
/// - ArrayCursor (vectors, slices, any `Deref<Target = [T]>`)
/// - IterCursor (Rust iterators used as generators)
/// - KeyedCursor / EntriesCursor (key/value maps, key preserving)
/// - BuildCursor (open-ended builder callbacks)
///
/// # Architecture
///
/// Deferred operators in [`crate::sequence`] are themselves cursors that
/// own their parent cursor, so a query is a chain of cursors pulled from
/// the outermost end:
///
/// ```text
/// Sequence::to_vec()
///     ↓
/// Take
///     └─→ Select
///             └─→ Filter
///                     └─→ ArrayCursor (source)
/// ```
///
/// ## Key Design Principles
///
/// 1. **Pull Based**: nothing is computed until `valid()` or `advance()` is called
/// 2. **Explicit Steps**: every pull returns `Result<bool>`, `Ok(false)` meaning exhausted
/// 3. **Key Preserving**: operators that don't reshape elements pass keys through
/// 4. **Restartable On Demand**: `reset()` replays the source when it can
use crate::util::{Result, Status};

/// Cursor trait for traversing (key, value) pairs in source order
///
/// # Lifecycle
///
/// A freshly created cursor has not pulled anything yet. The first call to
/// `valid()` (or `advance()`) positions it on the first element. Sources over
/// materialized storage ([`ArrayCursor`], [`EntriesCursor`]) have nothing to
/// pull and are positioned from the start; every other cursor, deferred
/// operators included, fails `key()` and `value()` with `IndexOutOfRange`
/// until then. Call `valid()` before reading:
///
/// ```ignore
/// let mut cursor = ArrayCursor::new(vec![1, 2, 3]);
/// while cursor.valid()? {
///     println!("{:?}: {:?}", cursor.key()?, cursor.value()?);
///     cursor.advance()?;
/// }
/// ```
///
/// # Error Handling
///
/// Pulling returns `Result` because deferred operators run user code
/// (fallible selectors) and replay sources (reset). Reading the current
/// element while the cursor is not valid fails with `IndexOutOfRange`.
pub trait Cursor {
    type Key;
    type Value;

    /// Check if the cursor is positioned on an element
    ///
    /// Deferred cursors perform their first pull on the first call.
    /// Returns Ok(false) once the source is exhausted.
    fn valid(&mut self) -> Result<bool>;

    /// Get current key
    ///
    /// Prerequisite: valid() == true
    fn key(&self) -> Result<&Self::Key>;

    /// Get current value
    ///
    /// Prerequisite: valid() == true
    fn value(&self) -> Result<&Self::Value>;

    /// Get current key and value
    fn current(&self) -> Result<(&Self::Key, &Self::Value)> {
        Ok((self.key()?, self.value()?))
    }

    /// Move to the next element
    ///
    /// Returns Ok(true) if positioned on an element afterwards, Ok(false)
    /// if the end was reached. Calling it on an exhausted cursor is a
    /// no-op returning Ok(false).
    fn advance(&mut self) -> Result<bool>;

    /// Return to the initial position
    ///
    /// Fails with `NotSupported` if the source cannot be replayed.
    fn reset(&mut self) -> Result<()>;

    /// Exact number of elements left from the current position, if the
    /// cursor can tell without pulling
    fn remaining(&self) -> Option<usize> {
        None
    }
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    type Key = C::Key;
    type Value = C::Value;

    fn valid(&mut self) -> Result<bool> {
        (**self).valid()
    }

    fn key(&self) -> Result<&C::Key> {
        (**self).key()
    }

    fn value(&self) -> Result<&C::Value> {
        (**self).value()
    }

    fn advance(&mut self) -> Result<bool> {
        (**self).advance()
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }

    fn remaining(&self) -> Option<usize> {
        (**self).remaining()
    }
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    type Key = C::Key;
    type Value = C::Value;

    fn valid(&mut self) -> Result<bool> {
        (**self).valid()
    }

    fn key(&self) -> Result<&C::Key> {
        (**self).key()
    }

    fn value(&self) -> Result<&C::Value> {
        (**self).value()
    }

    fn advance(&mut self) -> Result<bool> {
        (**self).advance()
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }

    fn remaining(&self) -> Option<usize> {
        (**self).remaining()
    }
}

/// Exact length reported by an iterator's size hint, if any
pub(crate) fn exact_size_hint<I: Iterator>(iter: &I) -> Option<usize> {
    match iter.size_hint() {
        (lower, Some(upper)) if lower == upper => Some(lower),
        _ => None,
    }
}

pub(crate) fn refuse_reset(source: &'static str) -> Status {
    tracing::debug!(source, "reset refused on a one-shot source");
    Status::not_supported(format!("{source} cannot be reset once consumption has started"))
}

mod array_cursor;
mod build_cursor;
mod iter_cursor;
mod keyed_cursor;

pub use array_cursor::ArrayCursor;
pub use build_cursor::{BuildContext, BuildCursor, IndexKey};
pub use iter_cursor::IterCursor;
pub use keyed_cursor::{EntriesCursor, KeyedCursor};

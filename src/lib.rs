//! Lazy sequences with composable deferred operators.
//!
//! Sources (vectors, slices, iterators, maps, builder callbacks) are wrapped
//! into a [`Sequence`]; deferred operators such as `filter`, `select` or
//! `take` build a chain of cursors without pulling anything, and terminal
//! operators such as `to_vec`, `count` or `to_dictionary` drive it.

pub mod callable;
pub mod collections;
pub mod cursor;
pub mod sequence;
pub mod util;

pub use callable::Callable;
pub use collections::{Dictionary, Grouping, Lookup};
pub use cursor::{BuildContext, Cursor, IndexKey};
pub use sequence::{DuplicateKeyPolicy, EachContext, Sequence, ToDictionaryOptions};
pub use util::{Code, Result, Status};

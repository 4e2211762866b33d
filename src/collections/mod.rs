//! Materialized shapes produced by terminal operators.

pub mod dictionary;
pub mod lookup;

pub use dictionary::Dictionary;
pub use lookup::{GroupBy, Grouping, Lookup};

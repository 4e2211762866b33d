pub mod status;

pub use status::{Code, Result, Status};
pub(crate) use status::checked_count;

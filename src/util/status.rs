use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    InvalidArgument,
    InvalidCallable,
    NotSupported,
    NotFound,
    IndexOutOfRange,
}

#[derive(Debug, Clone)]
pub struct Status {
    code: Code,
    message: Option<String>,
}

impl Status {
    pub fn new(code: Code) -> Self {
        Status {
            code,
            message: None,
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Status {
            code: Code::InvalidArgument,
            message: Some(msg.into()),
        }
    }

    pub fn invalid_callable(msg: impl Into<String>) -> Self {
        Status {
            code: Code::InvalidCallable,
            message: Some(msg.into()),
        }
    }

    pub fn not_supported(msg: impl Into<String>) -> Self {
        Status {
            code: Code::NotSupported,
            message: Some(msg.into()),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Status {
            code: Code::NotFound,
            message: Some(msg.into()),
        }
    }

    pub fn index_out_of_range(msg: impl Into<String>) -> Self {
        Status {
            code: Code::IndexOutOfRange,
            message: Some(msg.into()),
        }
    }

    /// Error returned when a cursor's current element is read while the
    /// cursor is not valid.
    pub fn not_positioned() -> Self {
        Status::index_out_of_range("cursor is not positioned on an element")
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.code == Code::InvalidArgument
    }

    pub fn is_invalid_callable(&self) -> bool {
        self.code == Code::InvalidCallable
    }

    pub fn is_not_supported(&self) -> bool {
        self.code == Code::NotSupported
    }

    pub fn is_not_found(&self) -> bool {
        self.code == Code::NotFound
    }

    pub fn is_index_out_of_range(&self) -> bool {
        self.code == Code::IndexOutOfRange
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{:?}: {}", self.code, msg),
            None => write!(f, "{:?}", self.code),
        }
    }
}

impl std::error::Error for Status {}

pub type Result<T> = std::result::Result<T, Status>;

/// Converts a caller-supplied count into `usize`, rejecting negatives.
pub(crate) fn checked_count(count: i64, what: &str) -> Result<usize> {
    usize::try_from(count)
        .map_err(|_| Status::invalid_argument(format!("{what} must not be negative, got {count}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_not_found() {
        let status = Status::not_found("key not found");
        assert!(status.is_not_found());
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), Some("key not found"));
    }

    #[test]
    fn test_status_display() {
        let status = Status::invalid_argument("count value is invalid");
        assert_eq!(status.to_string(), "InvalidArgument: count value is invalid");
        assert_eq!(Status::new(Code::NotSupported).to_string(), "NotSupported");
    }

    #[test]
    fn test_checked_count() {
        assert_eq!(checked_count(3, "count").unwrap(), 3);
        let err = checked_count(-1, "count").unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.message(), Some("count must not be negative, got -1"));
    }

    #[test]
    fn test_not_positioned() {
        assert!(Status::not_positioned().is_index_out_of_range());
    }
}

use thiserror::Error;

/// undermine error types
#[derive(Error, Debug)]
pub enum UndermineError {
    /// Failed to parse a backend response or stored JSON
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Checkbox store operation failed
    #[error("store error: {0}")]
    Store(String),

    /// Quote fetch failed
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for undermine
pub type Result<T> = std::result::Result<T, UndermineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UndermineError::Parse("invalid json".into());
        assert_eq!(err.to_string(), "parse error: invalid json");
    }

    #[test]
    fn test_fetch_error_display() {
        let err = UndermineError::Fetch("connection refused".into());
        assert_eq!(err.to_string(), "fetch error: connection refused");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: UndermineError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }
}

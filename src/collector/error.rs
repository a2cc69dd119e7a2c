//! Error type shared by the collectors.
//!
//! Collectors never hand this error to their callers: each public operation
//! logs it and falls back to a default value.

/// Why a single source could not be read.
#[derive(Debug)]
pub enum CollectError {
    /// File or socket could not be opened, read or written.
    Io(std::io::Error),
    /// Content was present but did not have the expected shape.
    Parse(String),
    /// TLS setup or handshake with the proxy failed.
    Tls(String),
    /// The proxy closed the connection without sending anything.
    EmptyResponse,
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Io(e) => write!(f, "I/O error: {}", e),
            CollectError::Parse(msg) => write!(f, "parse error: {}", msg),
            CollectError::Tls(msg) => write!(f, "TLS error: {}", msg),
            CollectError::EmptyResponse => write!(f, "empty response"),
        }
    }
}

impl std::error::Error for CollectError {}

impl From<std::io::Error> for CollectError {
    fn from(e: std::io::Error) -> Self {
        CollectError::Io(e)
    }
}

impl CollectError {
    pub fn parse(msg: impl Into<String>) -> Self {
        CollectError::Parse(msg.into())
    }
}

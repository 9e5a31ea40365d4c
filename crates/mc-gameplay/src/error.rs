use std::fmt;

/// error taxonomy per the engine's failure-handling contract: argument and
/// state errors are ordinary, recoverable `Result`s; `NumericError` signals a
/// bug and should be treated as fatal by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument(String),
    IllegalState(String),
    InvalidMove(String),
    NumericError(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            ErrorKind::IllegalState(msg) => write!(f, "illegal state: {msg}"),
            ErrorKind::InvalidMove(msg) => write!(f, "invalid move: {msg}"),
            ErrorKind::NumericError(msg) => write!(f, "numeric error: {msg}"),
        }
    }
}

impl std::error::Error for ErrorKind {}

pub type Result<T> = std::result::Result<T, ErrorKind>;

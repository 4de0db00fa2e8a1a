use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecErrorCode {
    /// `encode` was given an empty string.
    EmptyInput,
    /// `encode` was given a character outside the Latin-1 range.
    UnsupportedSymbol,
    /// The encoded stream produced no codes.
    EmptyStream,
    MalformedToken,
    /// The first code of a stream was a dictionary code rather than a literal.
    InvalidFirstCode,
    UnknownBackReference,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecError {
    pub code: CodecErrorCode,
    pub message: String,
}

impl CodecError {
    pub fn new(code: CodecErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for CodecError {}

use std::io;
use std::str::Utf8Error;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Coarse classification of parse failures.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    MissingCommand,
    MalformedTags,
    Internal,
}

/// Errors returned while parsing a line.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ParseError {
    /// The line holds no command token.
    #[error("missing command")]
    MissingCommand,

    /// The tag section does not follow the key/value grammar.
    #[error("malformed tags: {0}")]
    MalformedTags(String),

    /// The command token is rejected by strict parsing.
    #[error("invalid command: {0:?}")]
    InvalidCommand(String),

    /// The line is longer than the configured limit.
    #[error("line too long: {len} bytes (max {max})")]
    LineTooLong { len: usize, max: usize },

    #[error("line is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    /// NUL outside the tag section.
    #[error("NUL byte at offset {0}")]
    NulByte(usize),

    /// Unexpected parser state.
    #[error("internal parser error: {0}")]
    Internal(String),
}

impl ParseError {
    /// Maps the error onto the three-way taxonomy.
    ///
    /// `InvalidCommand` counts as a missing command since no usable command
    /// was found; length, encoding and NUL failures count as internal.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::MissingCommand | ParseError::InvalidCommand(_) => ErrorKind::MissingCommand,
            ParseError::MalformedTags(_) => ErrorKind::MalformedTags,
            ParseError::LineTooLong { .. }
            | ParseError::InvalidUtf8(_)
            | ParseError::NulByte(_)
            | ParseError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Errors returned while rendering a message.
#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("message has no command")]
    MissingCommand,

    #[error("command {0:?} cannot be written on the wire")]
    InvalidCommand(String),

    #[error("prefix {0:?} cannot be written on the wire")]
    InvalidPrefix(String),

    #[error("tag key {0:?} cannot be written on the wire")]
    InvalidTagKey(String),

    /// Tag values may hold anything but NUL.
    #[error("value of tag {0:?} contains NUL")]
    InvalidTagValue(String),

    /// Only the last argument may be empty, contain spaces or start with `:`.
    #[error("argument {index} ({value:?}) cannot be written on the wire")]
    InvalidArgument { index: usize, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("rendered line is not UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

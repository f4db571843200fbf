//! Error handling for the codec.
//!
//! Every failure is a return-style [`Error`] carrying a human-readable
//! message; callers that need to branch on the failure class use
//! [`Error::kind`]. There is no recovery or resynchronization: the first
//! malformed token or transition aborts the whole parse.

use std::fmt;

/// Result type used throughout the crate.
pub type JsonResult<T> = Result<T, Error>;

/// Broad failure classes, for callers that dispatch on outcome rather than
/// message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed token: bad number grammar, unterminated or invalid
    /// string, unknown keyword, illegal byte.
    Lexical,
    /// Invalid UTF-8 or an unpaired UTF-16 surrogate inside a string.
    /// A subtype of the lexical class (see [`Error::is_lexical`]).
    Encoding,
    /// Token was well-formed but illegal in the current parser state:
    /// mismatched brackets, stray comma or colon, trailing content,
    /// nesting or input-size bound exceeded.
    Structural,
    /// Well-formed document whose root does not satisfy the requested
    /// root-shape policy.
    Shape,
    /// Unserializable value: the absent value under a rejecting policy,
    /// or a non-finite double.
    Value,
    /// The requested parse backend is not compiled into this build.
    BackendUnavailable,
    /// An internal invariant was violated. This reflects an engine bug,
    /// never bad input.
    InternalInvariant,
    /// A file could not be read.
    File,
}

/// A codec failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed token.
    Lexical(String),
    /// Invalid UTF-8 byte sequence or unpaired surrogate inside a string.
    Encoding(String),
    /// Token valid but illegal in the current parser state.
    Structural(String),
    /// Container nesting exceeded the configured bound.
    DepthExceeded {
        /// Nesting depth that was reached.
        depth: usize,
        /// Configured maximum depth.
        max_depth: usize,
    },
    /// Input exceeded the configured size bound.
    InputTooLarge {
        /// Input size in bytes.
        size: u64,
        /// Configured maximum size in bytes.
        max_size: u64,
    },
    /// Root-shape policy violated by an otherwise valid document.
    Shape(String),
    /// Value cannot be serialized.
    Value(String),
    /// Requested backend not present in this build.
    BackendUnavailable(String),
    /// Engine bug: a state the validated input can never reach.
    InternalInvariant(String),
    /// File I/O failure in a convenience loader.
    File(String),
}

impl Error {
    /// The broad class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Lexical(_) => ErrorKind::Lexical,
            Error::Encoding(_) => ErrorKind::Encoding,
            Error::Structural(_)
            | Error::DepthExceeded { .. }
            | Error::InputTooLarge { .. } => ErrorKind::Structural,
            Error::Shape(_) => ErrorKind::Shape,
            Error::Value(_) => ErrorKind::Value,
            Error::BackendUnavailable(_) => ErrorKind::BackendUnavailable,
            Error::InternalInvariant(_) => ErrorKind::InternalInvariant,
            Error::File(_) => ErrorKind::File,
        }
    }

    /// True for the lexical class, including its encoding subtype.
    pub fn is_lexical(&self) -> bool {
        matches!(self.kind(), ErrorKind::Lexical | ErrorKind::Encoding)
    }

    /// True for the structural class, including the resource bounds.
    pub fn is_structural(&self) -> bool {
        self.kind() == ErrorKind::Structural
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lexical(msg) => write!(f, "lexical error: {msg}"),
            Error::Encoding(msg) => write!(f, "encoding error: {msg}"),
            Error::Structural(msg) => write!(f, "structural error: {msg}"),
            Error::DepthExceeded { depth, max_depth } => {
                write!(f, "nesting depth {depth} exceeds the maximum of {max_depth}")
            }
            Error::InputTooLarge { size, max_size } => {
                write!(f, "input of {size} bytes exceeds the maximum of {max_size}")
            }
            Error::Shape(msg) => write!(f, "root shape error: {msg}"),
            Error::Value(msg) => write!(f, "value error: {msg}"),
            Error::BackendUnavailable(msg) => write!(f, "backend unavailable: {msg}"),
            Error::InternalInvariant(msg) => write!(f, "internal invariant violated: {msg}"),
            Error::File(msg) => write!(f, "file error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(Error::Lexical("x".into()).kind(), ErrorKind::Lexical);
        assert_eq!(Error::Encoding("x".into()).kind(), ErrorKind::Encoding);
        assert_eq!(Error::Structural("x".into()).kind(), ErrorKind::Structural);
        assert_eq!(
            Error::DepthExceeded { depth: 513, max_depth: 512 }.kind(),
            ErrorKind::Structural
        );
        assert_eq!(
            Error::InputTooLarge { size: 2, max_size: 1 }.kind(),
            ErrorKind::Structural
        );
        assert_eq!(Error::Shape("x".into()).kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_encoding_is_lexical_subtype() {
        assert!(Error::Encoding("bad utf-8".into()).is_lexical());
        assert!(Error::Lexical("bad token".into()).is_lexical());
        assert!(!Error::Structural("stray comma".into()).is_lexical());
    }

    #[test]
    fn test_display_carries_message() {
        let err = Error::DepthExceeded { depth: 513, max_depth: 512 };
        assert_eq!(
            err.to_string(),
            "nesting depth 513 exceeds the maximum of 512"
        );
        let err = Error::Lexical("unexpected byte 0x2b".into());
        assert!(err.to_string().contains("unexpected byte"));
    }
}

//! stablejson - deterministic JSON parsing and serialization.
//!
//! A self-contained JSON text codec: UTF-8 bytes in, a typed value tree
//! out, and back again. It exists for environments where the platform's
//! JSON support varies in size limits, memory behavior, or output format
//! between versions; this engine behaves the same everywhere.
//!
//! # Architecture
//!
//! - [`lexer`] - tokenizer over raw bytes
//! - [`utf8`] - string-body UTF-8/escape decoder with surrogate collation
//! - [`parser`] - depth-bounded, non-recursive parse state machine
//! - [`value`] - the value tree
//! - [`serializer`] - compact/indented writer with canonical key order
//! - [`backend`] - engine selection and alternative-backend introspection
//! - [`locale`] - numeric decimal-separator guard
//! - [`limits`] - parse resource bounds
//! - [`error`] - failure classes
//!
//! Three properties are load-bearing. Nesting depth is bounded by
//! configuration, not by the host call stack, so adversarially nested
//! input cannot overflow it. Integer literals keep 64-bit precision
//! instead of being routed through a double. Object keys serialize in
//! ascending byte-wise order with later duplicates overwriting earlier
//! ones, so output is deterministic regardless of source ordering.
//!
//! # Example
//!
//! ```
//! use stablejson::{parse, to_text, Backend, NullPolicy, RootShape};
//!
//! let value = parse(b"{\"b\": 2, \"a\": 1}", RootShape::RequireObject, Backend::Default)?;
//! let text = to_text(Some(&value), true, NullPolicy::AllowBareNull)?;
//! assert_eq!(text, b"{\"a\":1,\"b\":2}");
//! # Ok::<(), stablejson::Error>(())
//! ```

// Library code must avoid unwrap/expect/panic; failures are returned.
// Tests are checked separately with `cargo test`.
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod backend;
#[cfg(feature = "serde-backend")]
pub mod conformance;
pub mod error;
pub mod lexer;
pub mod limits;
pub mod locale;
mod number;
pub mod parser;
pub mod serializer;
pub mod utf8;
pub mod value;

// Re-export commonly used types
pub use backend::{alternative_info, is_backend_available, Backend, BackendImpl, BackendInfo};
pub use error::{Error, ErrorKind, JsonResult};
pub use limits::Limits;
pub use locale::{auto_check_locale, check_locale, set_auto_check_locale};
pub use parser::RootShape;
pub use serializer::NullPolicy;
pub use value::Value;

use std::path::Path;

/// Parse one JSON document with standard limits.
///
/// The root of the completed tree is checked against `shape`; the request
/// is served by `backend`, failing with
/// [`Error::BackendUnavailable`] if that engine is not compiled in.
pub fn parse(bytes: &[u8], shape: RootShape, backend: Backend) -> JsonResult<Value> {
    parse_with_limits(bytes, shape, backend, Limits::standard())
}

/// Parse one JSON document with explicit limits.
pub fn parse_with_limits(
    bytes: &[u8],
    shape: RootShape,
    backend: Backend,
    limits: Limits,
) -> JsonResult<Value> {
    locale::ensure_numeric_locale()?;
    let value = backend::parse_with(bytes, limits, backend)?;
    parser::check_root_shape(&value, shape)?;
    Ok(value)
}

/// Load a whole file and parse its contents.
pub fn parse_file<P: AsRef<Path>>(
    path: P,
    shape: RootShape,
    backend: Backend,
) -> JsonResult<Value> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| Error::File(format!("could not read {}: {e}", path.display())))?;
    parse(&bytes, shape, backend)
}

/// Serialize a value tree, or the absent value (`None`), to JSON text.
///
/// `pretty_indent` of 0 produces compact output with no whitespace; any
/// other value indents children by that many spaces per nesting level,
/// starting at `indent_level`. The absent value serializes as `null`
/// here; [`to_text`] applies a policy to it first.
pub fn serialize(
    value: Option<&Value>,
    pretty_indent: u32,
    indent_level: u32,
) -> JsonResult<Vec<u8>> {
    locale::ensure_numeric_locale()?;
    serializer::serialize(value, pretty_indent, indent_level)
}

/// Convenience serializer: compact or 4-space indented output, with a
/// policy for the absent value.
pub fn to_text(value: Option<&Value>, compact: bool, policy: NullPolicy) -> JsonResult<Vec<u8>> {
    if policy == NullPolicy::RejectBareNull && value.is_none() {
        return Err(Error::Value(
            "refusing to serialize the absent value".to_string(),
        ));
    }
    serialize(value, if compact { 0 } else { 4 }, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_checks_root_shape() {
        assert!(parse(b"\"hello\"", RootShape::AcceptAnyValue, Backend::Default).is_ok());
        let err = parse(b"\"hello\"", RootShape::RequireObject, Backend::Default).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        let err = parse(b"{}", RootShape::RequireArray, Backend::Default).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_to_text_absent_value_policies() {
        let err = to_text(None, true, NullPolicy::RejectBareNull).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        let text = to_text(None, true, NullPolicy::AllowBareNull).unwrap();
        assert_eq!(text, b"null");
        // A parsed JSON null is not the absent value.
        let null = Value::Null;
        let text = to_text(Some(&null), true, NullPolicy::RejectBareNull).unwrap();
        assert_eq!(text, b"null");
    }

    #[test]
    fn test_to_text_indent_defaults() {
        let value = parse(b"[1]", RootShape::RequireArray, Backend::Default).unwrap();
        assert_eq!(to_text(Some(&value), true, NullPolicy::AllowBareNull).unwrap(), b"[1]");
        assert_eq!(
            to_text(Some(&value), false, NullPolicy::AllowBareNull).unwrap(),
            b"[\n    1\n]"
        );
    }

    #[test]
    fn test_parse_file_missing_is_a_file_error() {
        let err = parse_file(
            "/nonexistent/stablejson-test.json",
            RootShape::AcceptAnyValue,
            Backend::Default,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::File);
    }
}

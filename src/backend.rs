//! Parse-backend selection and introspection.
//!
//! The engine in this crate is always available. An alternative engine —
//! `serde_json`, adapted to the native value tree — can be compiled in
//! behind the `serde-backend` feature and selected per call. It is treated
//! as a black box: it either returns an equivalent tree or fails; nothing
//! about its internals leaks past this module.

use crate::error::JsonResult;
use crate::limits::Limits;
use crate::parser;
use crate::value::Value;

#[cfg(not(feature = "serde-backend"))]
use crate::error::Error;

/// Selectable parse engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// The engine implemented in this crate. Always available.
    Default,
    /// The `serde_json` engine. Available when the `serde-backend`
    /// feature is compiled in.
    Serde,
    /// The alternative engine when available, the default one otherwise.
    FastestAvailable,
}

/// One concrete implementation inside the alternative backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendImpl {
    /// Implementation name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Whether this build/processor supports it.
    pub supported: bool,
}

/// Introspection data for the alternative backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendInfo {
    /// All implementations the backend ships.
    pub implementations: Vec<BackendImpl>,
    /// The implementation that would run.
    pub active: BackendImpl,
}

/// Whether the given backend can serve a parse request in this build.
pub fn is_backend_available(backend: Backend) -> bool {
    match backend {
        Backend::Default | Backend::FastestAvailable => true,
        Backend::Serde => cfg!(feature = "serde-backend"),
    }
}

/// Implementation metadata for the alternative backend, or `None` when it
/// is not compiled in.
pub fn alternative_info() -> Option<BackendInfo> {
    #[cfg(feature = "serde-backend")]
    {
        Some(serde_backend::info())
    }
    #[cfg(not(feature = "serde-backend"))]
    {
        None
    }
}

/// Route a parse request to the selected backend.
pub(crate) fn parse_with(bytes: &[u8], limits: Limits, backend: Backend) -> JsonResult<Value> {
    match backend {
        Backend::Default => parser::parse_slice(bytes, limits),
        #[cfg(feature = "serde-backend")]
        Backend::Serde | Backend::FastestAvailable => serde_backend::parse(bytes, limits),
        #[cfg(not(feature = "serde-backend"))]
        Backend::Serde => Err(Error::BackendUnavailable(
            "the serde_json backend is not compiled into this build".to_string(),
        )),
        #[cfg(not(feature = "serde-backend"))]
        Backend::FastestAvailable => parser::parse_slice(bytes, limits),
    }
}

#[cfg(feature = "serde-backend")]
mod serde_backend {
    //! Adapter around `serde_json`.

    use crate::error::{Error, JsonResult};
    use crate::limits::Limits;
    use crate::value::Value;
    use std::collections::BTreeMap;

    pub(super) fn info() -> super::BackendInfo {
        let implementation = super::BackendImpl {
            name: "serde_json".to_string(),
            description: "serde_json value engine adapted to the native tree".to_string(),
            supported: true,
        };
        super::BackendInfo {
            implementations: vec![implementation.clone()],
            active: implementation,
        }
    }

    pub(super) fn parse(bytes: &[u8], limits: Limits) -> JsonResult<Value> {
        if let Some(max_size) = limits.max_input_size {
            if bytes.len() as u64 > max_size {
                return Err(Error::InputTooLarge {
                    size: bytes.len() as u64,
                    max_size,
                });
            }
        }
        let parsed: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| Error::Structural(format!("alternative backend: {e}")))?;
        adapt(parsed, 0, limits.max_depth)
    }

    /// Convert a `serde_json` tree into a native one, re-applying the
    /// depth bound the black-box engine knows nothing about.
    fn adapt(value: serde_json::Value, depth: usize, max_depth: usize) -> JsonResult<Value> {
        match value {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Ok(Value::UInt(u))
                } else if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(d) = n.as_f64() {
                    Ok(Value::Double(d))
                } else {
                    Err(Error::InternalInvariant(
                        "alternative backend produced an unrepresentable number".to_string(),
                    ))
                }
            }
            serde_json::Value::String(s) => Ok(Value::String(s)),
            serde_json::Value::Array(items) => {
                let depth = depth + 1;
                if depth > max_depth {
                    return Err(Error::DepthExceeded { depth, max_depth });
                }
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(adapt(item, depth, max_depth)?);
                }
                Ok(Value::Array(values))
            }
            serde_json::Value::Object(entries) => {
                let depth = depth + 1;
                if depth > max_depth {
                    return Err(Error::DepthExceeded { depth, max_depth });
                }
                let mut map = BTreeMap::new();
                for (key, item) in entries {
                    map.insert(key, adapt(item, depth, max_depth)?);
                }
                Ok(Value::Object(map))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backend_always_available() {
        assert!(is_backend_available(Backend::Default));
        assert!(is_backend_available(Backend::FastestAvailable));
    }

    #[test]
    fn test_alternative_availability_matches_info() {
        assert_eq!(
            is_backend_available(Backend::Serde),
            alternative_info().is_some()
        );
    }

    #[cfg(feature = "serde-backend")]
    mod with_alternative {
        use super::*;

        #[test]
        fn test_info_lists_active_implementation() {
            let info = alternative_info().unwrap();
            assert!(!info.implementations.is_empty());
            assert!(info.implementations.contains(&info.active));
            assert!(info.active.supported);
        }

        #[test]
        fn test_alternative_parses_equivalent_tree() {
            let input = br#"{"b": [1, -2, 0.5], "a": "text"}"#;
            let ours = parse_with(input, Limits::standard(), Backend::Default).unwrap();
            let alt = parse_with(input, Limits::standard(), Backend::Serde).unwrap();
            assert_eq!(ours, alt);
        }

        #[test]
        fn test_alternative_preserves_integer_width() {
            let alt =
                parse_with(b"18446744073709551615", Limits::standard(), Backend::Serde).unwrap();
            assert_eq!(alt, Value::UInt(u64::MAX));
            let alt =
                parse_with(b"-9223372036854775808", Limits::standard(), Backend::Serde).unwrap();
            assert_eq!(alt, Value::Int(i64::MIN));
        }

        #[test]
        fn test_alternative_enforces_depth_bound() {
            let limits = Limits::standard().with_max_depth(2);
            assert!(parse_with(b"[[1]]", limits, Backend::Serde).is_ok());
            let err = parse_with(b"[[[1]]]", limits, Backend::Serde).unwrap_err();
            assert!(err.is_structural());
        }

        #[test]
        fn test_alternative_enforces_input_size_bound() {
            let limits = Limits::standard().with_max_input_size(Some(4));
            assert!(parse_with(b"[1,2,3]", limits, Backend::Serde).is_err());
        }

        #[test]
        fn test_alternative_failure_is_structural() {
            let err = parse_with(b"[1,", Limits::standard(), Backend::Serde).unwrap_err();
            assert!(err.is_structural());
        }

        #[test]
        fn test_fastest_available_routes_to_alternative() {
            let value =
                parse_with(b"[true]", Limits::standard(), Backend::FastestAvailable).unwrap();
            assert_eq!(value, Value::Array(vec![Value::Bool(true)]));
        }
    }

    #[cfg(not(feature = "serde-backend"))]
    mod without_alternative {
        use super::*;

        #[test]
        fn test_serde_backend_reports_unavailable() {
            assert!(!is_backend_available(Backend::Serde));
            assert!(alternative_info().is_none());
            let err = parse_with(b"{}", Limits::standard(), Backend::Serde).unwrap_err();
            assert_eq!(
                err.kind(),
                crate::error::ErrorKind::BackendUnavailable
            );
        }

        #[test]
        fn test_fastest_available_falls_back_to_default() {
            let value =
                parse_with(b"[true]", Limits::standard(), Backend::FastestAvailable).unwrap();
            assert_eq!(value, Value::Array(vec![Value::Bool(true)]));
        }
    }
}

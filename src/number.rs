//! Numeric-literal classification and conversion.
//!
//! A number lexeme is converted exactly once, after the lexer has fully
//! matched it. The representation is chosen from the lexeme alone: a
//! fraction or exponent marker means a 64-bit double, a leading minus
//! means a signed 64-bit integer, anything else an unsigned 64-bit
//! integer. Integer literals therefore keep their full precision instead
//! of being squeezed through a double.

use crate::error::{Error, JsonResult};
use crate::value::Value;

/// Convert a lexically valid number lexeme into its value.
pub(crate) fn convert(lexeme: &str) -> JsonResult<Value> {
    if lexeme.is_empty() {
        // The lexer never emits an empty number token.
        return Err(Error::InternalInvariant(
            "empty number lexeme".to_string(),
        ));
    }

    if lexeme.contains(['.', 'e', 'E']) {
        let d: f64 = lexeme
            .parse()
            .map_err(|_| Error::InternalInvariant(format!("unparsable double lexeme '{lexeme}'")))?;
        // An overflowing exponent parses to infinity; the literal was
        // well-formed but is not representable as a finite double.
        if !d.is_finite() {
            return Err(Error::Lexical(format!(
                "number '{lexeme}' is out of double range"
            )));
        }
        Ok(Value::Double(d))
    } else if lexeme.starts_with('-') {
        lexeme
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| Error::Lexical(format!("number '{lexeme}' is out of signed 64-bit range")))
    } else {
        lexeme
            .parse::<u64>()
            .map(Value::UInt)
            .map_err(|_| {
                Error::Lexical(format!("number '{lexeme}' is out of unsigned 64-bit range"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned_classification() {
        assert_eq!(convert("0").unwrap(), Value::UInt(0));
        assert_eq!(convert("42").unwrap(), Value::UInt(42));
        assert_eq!(
            convert("18446744073709551615").unwrap(),
            Value::UInt(u64::MAX)
        );
    }

    #[test]
    fn test_signed_classification() {
        assert_eq!(convert("-0").unwrap(), Value::Int(0));
        assert_eq!(convert("-123").unwrap(), Value::Int(-123));
        assert_eq!(
            convert("-9223372036854775808").unwrap(),
            Value::Int(i64::MIN)
        );
    }

    #[test]
    fn test_double_classification() {
        assert_eq!(convert("0.0").unwrap(), Value::Double(0.0));
        assert_eq!(convert("1e10").unwrap(), Value::Double(1e10));
        assert_eq!(convert("-1.5e-3").unwrap(), Value::Double(-1.5e-3));
        // An exponent marker alone forces the double representation, even
        // for an integral value.
        assert_eq!(convert("1E2").unwrap(), Value::Double(100.0));
    }

    #[test]
    fn test_out_of_range_integers_are_lexical_errors() {
        let err = convert("18446744073709551616").unwrap_err();
        assert!(err.is_lexical());
        let err = convert("-9223372036854775809").unwrap_err();
        assert!(err.is_lexical());
    }

    #[test]
    fn test_overflowing_exponent_is_a_lexical_error() {
        let err = convert("1e999").unwrap_err();
        assert!(err.is_lexical());
        let err = convert("-1e999").unwrap_err();
        assert!(err.is_lexical());
    }
}

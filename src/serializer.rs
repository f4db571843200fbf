//! Value-tree serialization to UTF-8 JSON text.
//!
//! The writer walks a [`Value`] tree and appends to a byte buffer, either
//! compact (no whitespace at all) or indented (newline-separated children,
//! a configurable number of spaces per nesting level). Object members are
//! emitted in the map's ascending byte-wise key order, so output depends
//! only on tree content, never on source ordering.
//!
//! Doubles are written with the shortest digit run that reparses to the
//! identical 64-bit value, using fixed notation for moderate magnitudes
//! and `printf %g`-style scientific notation (signed, two-digit-minimum
//! exponent) outside of that range. NaN and the infinities have no JSON
//! representation and fail.

use std::collections::BTreeMap;

use crate::error::{Error, JsonResult};
use crate::value::Value;

/// Policy for serializing the absent value (`None`) at the entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullPolicy {
    /// Serializing the absent value is an error.
    RejectBareNull,
    /// The absent value serializes as the literal `null`.
    AllowBareNull,
}

/// Serialize a value tree, or the absent value, to JSON text.
///
/// `pretty_indent` of 0 selects compact output; any other value is the
/// number of spaces added per nesting level. `indent_level` is the
/// starting level, for embedding output inside an already indented
/// document.
pub(crate) fn serialize(
    value: Option<&Value>,
    pretty_indent: u32,
    indent_level: u32,
) -> JsonResult<Vec<u8>> {
    let mut writer = Writer::new();
    writer.write_value(value, pretty_indent, indent_level)?;
    Ok(writer.into_bytes())
}

struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn new() -> Self {
        Self {
            buf: Vec::with_capacity(1024),
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn put(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    fn write(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    fn indent(&mut self, pretty_indent: u32, level: u32) {
        let n = (pretty_indent * level) as usize;
        self.buf.resize(self.buf.len() + n, b' ');
    }

    fn write_value(
        &mut self,
        value: Option<&Value>,
        pretty_indent: u32,
        level: u32,
    ) -> JsonResult<()> {
        let value = match value {
            None => {
                self.write(b"null");
                return Ok(());
            }
            Some(v) => v,
        };
        match value {
            Value::Null => {
                self.write(b"null");
                Ok(())
            }
            Value::Bool(true) => {
                self.write(b"true");
                Ok(())
            }
            Value::Bool(false) => {
                self.write(b"false");
                Ok(())
            }
            Value::Int(n) => {
                self.write(n.to_string().as_bytes());
                Ok(())
            }
            Value::UInt(n) => {
                self.write(n.to_string().as_bytes());
                Ok(())
            }
            Value::Double(d) => self.write_double(*d),
            Value::String(s) => {
                self.write_string(s);
                Ok(())
            }
            Value::Array(items) => {
                self.write_array(items, pretty_indent, level.max(1))
            }
            Value::Object(map) => {
                self.write_object(map, pretty_indent, level.max(1))
            }
        }
    }

    fn write_array(
        &mut self,
        items: &[Value],
        pretty_indent: u32,
        level: u32,
    ) -> JsonResult<()> {
        self.put(b'[');
        if items.is_empty() {
            // Empty containers stay compact even in indented mode.
            self.put(b']');
            return Ok(());
        }
        if pretty_indent > 0 {
            self.put(b'\n');
        }
        let last = items.len() - 1;
        for (i, item) in items.iter().enumerate() {
            if pretty_indent > 0 {
                self.indent(pretty_indent, level);
            }
            self.write_value(Some(item), pretty_indent, level + 1)?;
            if i != last {
                self.put(b',');
            }
            if pretty_indent > 0 {
                self.put(b'\n');
            }
        }
        if pretty_indent > 0 {
            self.indent(pretty_indent, level - 1);
        }
        self.put(b']');
        Ok(())
    }

    fn write_object(
        &mut self,
        map: &BTreeMap<String, Value>,
        pretty_indent: u32,
        level: u32,
    ) -> JsonResult<()> {
        self.put(b'{');
        if map.is_empty() {
            self.put(b'}');
            return Ok(());
        }
        if pretty_indent > 0 {
            self.put(b'\n');
        }
        let last = map.len() - 1;
        for (i, (key, value)) in map.iter().enumerate() {
            if pretty_indent > 0 {
                self.indent(pretty_indent, level);
            }
            self.write_string(key);
            self.put(b':');
            if pretty_indent > 0 {
                self.put(b' ');
            }
            self.write_value(Some(value), pretty_indent, level + 1)?;
            if i != last {
                self.put(b',');
            }
            if pretty_indent > 0 {
                self.put(b'\n');
            }
        }
        if pretty_indent > 0 {
            self.indent(pretty_indent, level - 1);
        }
        self.put(b'}');
        Ok(())
    }

    fn write_string(&mut self, s: &str) {
        self.put(b'"');
        for &b in s.as_bytes() {
            match b {
                b'"' => self.write(b"\\\""),
                b'\\' => self.write(b"\\\\"),
                0x08 => self.write(b"\\b"),
                b'\t' => self.write(b"\\t"),
                b'\n' => self.write(b"\\n"),
                0x0C => self.write(b"\\f"),
                b'\r' => self.write(b"\\r"),
                b if b < 0x20 => {
                    self.write(b"\\u00");
                    self.put(HEX_DIGITS[usize::from(b >> 4)]);
                    self.put(HEX_DIGITS[usize::from(b & 0x0F)]);
                }
                // Everything else, multi-byte UTF-8 included, passes
                // through untouched.
                b => self.put(b),
            }
        }
        self.put(b'"');
    }

    fn write_double(&mut self, d: f64) -> JsonResult<()> {
        if !d.is_finite() {
            return Err(Error::Value(
                "NaN and infinity have no JSON representation".to_string(),
            ));
        }
        let formatted = format_double(d)?;
        self.write(formatted.as_bytes());
        Ok(())
    }
}

const HEX_DIGITS: [u8; 16] = *b"0123456789abcdef";

/// Notation thresholds: fixed for decimal exponents in `-4..16`,
/// scientific outside, matching the classic `%g` selection.
const SCI_LOW: i32 = -4;
const SCI_HIGH: i32 = 16;

/// Format a finite double with shortest round-trip digits.
fn format_double(d: f64) -> JsonResult<String> {
    // The standard exponential formatter already produces the shortest
    // digit run that reparses exactly; reshape it into %g-style output.
    let exp_form = format!("{d:e}");
    let (mantissa, exponent) = exp_form
        .split_once('e')
        .ok_or_else(|| Error::InternalInvariant("exponential format without 'e'".to_string()))?;
    let exponent: i32 = exponent
        .parse()
        .map_err(|_| Error::InternalInvariant("unparsable exponent".to_string()))?;

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    // Digits without the decimal point; no trailing zeros by construction.
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let mut out = String::with_capacity(digits.len() + 8);
    out.push_str(sign);

    if exponent < SCI_LOW || exponent >= SCI_HIGH {
        // Scientific: d[.ddd]e±XX
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('e');
        if exponent < 0 {
            out.push('-');
        } else {
            out.push('+');
        }
        let abs = exponent.unsigned_abs();
        if abs < 10 {
            out.push('0');
        }
        out.push_str(&abs.to_string());
    } else if exponent >= 0 {
        let point = exponent as usize + 1;
        if point >= digits.len() {
            // Integral value: pad with zeros, no decimal point.
            out.push_str(&digits);
            for _ in digits.len()..point {
                out.push('0');
            }
        } else {
            out.push_str(&digits[..point]);
            out.push('.');
            out.push_str(&digits[point..]);
        }
    } else {
        // 0.000ddd
        out.push_str("0.");
        for _ in 0..(-exponent - 1) {
            out.push('0');
        }
        out.push_str(&digits);
    }

    Ok(out)
}

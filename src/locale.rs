//! Numeric-locale guard.
//!
//! JSON requires `.` as the decimal separator. Number formatting in this
//! engine goes through the standard library's locale-independent float
//! formatter, so process-wide locale settings cannot corrupt the output;
//! the guard exists to make that guarantee observable. [`check_locale`]
//! probes the exact emission path the serializer uses for doubles and
//! reports whether it produced a `.` separator. A process-wide toggle
//! selects whether the probe runs automatically before every parse and
//! serialize call (the default) or is left entirely to the caller.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, JsonResult};
use crate::serializer;
use crate::value::Value;

/// Whether parse/serialize entry points probe the locale automatically.
static AUTO_CHECK: AtomicBool = AtomicBool::new(true);

/// Enable or disable the automatic pre-call probe. Defaults to enabled;
/// callers that manage locale policy themselves can turn it off to save
/// the (tiny) per-call cost.
pub fn set_auto_check_locale(enabled: bool) {
    AUTO_CHECK.store(enabled, Ordering::Relaxed);
}

/// Current state of the automatic pre-call probe toggle.
pub fn auto_check_locale() -> bool {
    AUTO_CHECK.load(Ordering::Relaxed)
}

/// Verify that numeric formatting uses `.` as the decimal separator.
///
/// Returns true if the separator was already correct. The `auto_fix`
/// parameter is accepted for callers that treat this as a
/// check-and-repair operation; since the formatter never consults
/// process-wide locale state there is nothing to reset, and the probe
/// outcome stands either way.
pub fn check_locale(_auto_fix: bool) -> bool {
    decimal_separator_is_dot()
}

/// Pre-call hook used by the parse/serialize entry points.
pub(crate) fn ensure_numeric_locale() -> JsonResult<()> {
    if auto_check_locale() && !decimal_separator_is_dot() {
        return Err(Error::InternalInvariant(
            "numeric formatting does not use '.' as the decimal separator".to_string(),
        ));
    }
    Ok(())
}

/// Render a probe value through the serializer's double path.
fn decimal_separator_is_dot() -> bool {
    match serializer::serialize(Some(&Value::Double(0.5)), 0, 0) {
        Ok(bytes) => bytes == b"0.5",
        Err(_) => false,
    }
}

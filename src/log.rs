//! Syslog severities and message interpolation for [`Inspector::log`].
//!
//! [`Inspector::log`]: crate::Inspector::log

use alloc::string::String;
use core::fmt;

use crate::value::{Number, Value};

/// The eight syslog severities defined in RFC 5424, with the numeric codes
/// used by common logging protocols.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum Level {
    /// Detailed debug information.
    Debug = 100,
    /// Interesting events.
    Info = 200,
    /// Normal but significant events.
    Notice = 250,
    /// Exceptional occurrences that are not errors.
    Warning = 300,
    /// Runtime errors that do not require immediate action.
    Error = 400,
    /// Critical conditions.
    Critical = 500,
    /// Action must be taken immediately.
    Alert = 550,
    /// The system is unusable.
    Emergency = 600,
}

impl Level {
    /// All levels, from least to most severe.
    pub const ALL: [Level; 8] = [
        Level::Debug,
        Level::Info,
        Level::Notice,
        Level::Warning,
        Level::Error,
        Level::Critical,
        Level::Alert,
        Level::Emergency,
    ];

    /// The numeric severity code.
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// The upper-case level name, e.g. `WARNING`.
    pub const fn name(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Notice => "NOTICE",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
            Level::Alert => "ALERT",
            Level::Emergency => "EMERGENCY",
        }
    }

    /// Looks a level up by its numeric code.
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.code() == code)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Replaces `{key}` placeholders in `message` with the matching context
/// values.
///
/// Replacement happens in a single pass, so text substituted for one
/// placeholder is never itself scanned for placeholders. Placeholders without
/// a matching key are left as they are.
///
/// ```
/// use webconsole::{log::interpolate, value::Value};
///
/// let out = interpolate("user {name} has {n} items", &[
///     ("name", Value::from("ana")),
///     ("n", Value::from(3)),
/// ]);
/// assert_eq!(out, "user ana has 3 items");
/// ```
pub fn interpolate(message: &str, context: &[(&str, Value<'_>)]) -> String {
    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let key = &after[..close];
            context
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (close, value))
        });
        match replacement {
            Some((close, value)) => {
                push_plain(&mut out, value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn push_plain(out: &mut String, value: &Value<'_>) {
    use core::fmt::Write;

    match value {
        Value::Null => {}
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Str(s) | Value::Raw(s) => out.push_str(s),
        Value::Callable(name) => {
            let _ = write!(out, "[callable {name}]");
        }
        Value::Composite(c) => {
            let _ = write!(out, "[{}]", c.kind_label());
        }
    }
}

impl From<Level> for Value<'_> {
    fn from(level: Level) -> Self {
        Value::Number(Number::UInt(u64::from(level.code())))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn test_level_codes() {
        assert_eq!(Level::Debug.code(), 100);
        assert_eq!(Level::Notice.code(), 250);
        assert_eq!(Level::Alert.code(), 550);
        assert_eq!(Level::Emergency.code(), 600);
        assert_eq!(Level::from_code(300), Some(Level::Warning));
        assert_eq!(Level::from_code(301), None);
        assert!(Level::Error > Level::Warning);
    }

    #[test]
    fn test_interpolate_single_pass() {
        let context = vec![("a", Value::from("{b}")), ("b", Value::from("x"))];
        assert_eq!(interpolate("{a} {b}", &context), "{b} x");
    }

    #[test]
    fn test_interpolate_unknown_and_unclosed() {
        let context = vec![("a", Value::from(true))];
        assert_eq!(interpolate("{zz} {a} {", &context), "{zz} true {");
        assert_eq!(interpolate("no braces", &context), "no braces");
        assert_eq!(interpolate("{{a}}", &context), "{true}");
    }
}

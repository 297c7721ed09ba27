//! Inspection of `serde_json` 1.x documents.
//!
//! JSON arrays become lists and objects become maps, keeping the order of
//! the document's keys as `serde_json` stores them.
//!
//! ```
//! use webconsole::value::{Inspect, Kind};
//!
//! let document = serde_json::json!({ "id": 7, "tags": ["a", "b"] });
//! assert_eq!(document.inspect().kind(), Kind::Map);
//! ```

use alloc::borrow::Cow;

use crate::value::{Composite, Inspect, Number, Value};

impl Inspect for serde_json::Value {
    fn inspect(&self) -> Value<'_> {
        match self {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(number(n)),
            serde_json::Value::String(s) => Value::Str(Cow::Borrowed(s)),
            serde_json::Value::Array(items) => Value::Composite(Composite::list(items)),
            serde_json::Value::Object(map) => map.inspect(),
        }
    }
}

impl Inspect for serde_json::Map<alloc::string::String, serde_json::Value> {
    fn inspect(&self) -> Value<'_> {
        let mut map = Composite::new();
        for (key, value) in self {
            map.insert(key.as_str(), value);
        }
        Value::Composite(map)
    }
}

fn number(n: &serde_json::Number) -> Number {
    if let Some(i) = n.as_i64() {
        Number::Int(i)
    } else if let Some(u) = n.as_u64() {
        Number::UInt(u)
    } else {
        Number::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Settings,
        formatter::{RenderContext, render},
        value::Kind,
    };

    #[test]
    fn test_json_kinds() {
        let document = serde_json::json!({
            "name": "ada",
            "age": 36,
            "big": u64::MAX,
            "ratio": 0.5,
            "admin": false,
            "manager": null,
            "tags": ["x"],
        });
        let value = document.inspect();
        let map = value.as_composite().unwrap();
        assert_eq!(value.kind(), Kind::Map);
        let kinds: alloc::vec::Vec<Kind> = map.iter().map(|(_, entry)| entry.resolve().kind()).collect();
        assert!(kinds.contains(&Kind::String));
        assert!(kinds.contains(&Kind::Number));
        assert!(kinds.contains(&Kind::Boolean));
        assert!(kinds.contains(&Kind::Null));
        assert!(kinds.contains(&Kind::List));
    }

    #[test]
    fn test_json_render() {
        let document = serde_json::json!(["a<b", 1]);
        let html = render(&document.inspect(), RenderContext::new(&Settings::default()));
        assert!(html.contains("<th>Index</th>"));
        assert!(html.contains("&ldquo;a&lt;b&rdquo;"));
        assert!(html.contains("<td class=\"v\">1</td>"));
    }
}

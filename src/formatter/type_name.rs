use alloc::string::String;
use core::fmt::Write;

use crate::{
    util::{push_escaped, short_type_name},
    value::{Kind, ObjectIds, Value},
};

/// Writes the type column label of `value`.
///
/// Objects show their short type name, with the full name as a tooltip and
/// their identity number as a superscript when `ids` is given. Lists and maps
/// show their size. Callables show their short signature. Pre-rendered HTML
/// has an empty label.
pub fn type_label(out: &mut String, value: &Value<'_>, ids: Option<&ObjectIds>) {
    let composite = match value {
        Value::Composite(composite) => composite,
        Value::Callable(signature) => return push_type_span(out, signature),
        scalar => return push_escaped(out, scalar.base_type_name()),
    };
    match composite.object_info() {
        Some(info) => {
            push_type_span(out, info.type_name);
            if let (Some(ids), Some(identity)) = (ids, info.identity) {
                let _ = write!(out, "<sup><i>{}</i></sup>", ids.id_of(identity));
            }
        }
        None if composite.kind() == Kind::List => {
            let _ = write!(out, "list({})", composite.len());
        }
        None => {
            let _ = write!(out, "map({})", composite.len());
        }
    }
}

/// Writes `<span title='full'>Short</span>` for a fully qualified type name.
pub(crate) fn push_type_span(out: &mut String, full: &str) {
    out.push_str("<span title='");
    push_escaped(out, full);
    out.push_str("'>");
    push_escaped(out, &short_type_name(full));
    out.push_str("</span>");
}

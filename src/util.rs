use alloc::{borrow::Cow, string::String};

/// Escapes the HTML-significant characters `&`, `<`, `>`, `"` and `'`.
///
/// Returns the input unchanged (and unallocated) when nothing needs escaping.
///
/// ```
/// assert_eq!(webconsole::escape_html("a < b"), "a &lt; b");
/// assert_eq!(webconsole::escape_html("plain"), "plain");
/// ```
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    push_escaped(&mut out, text);
    Cow::Owned(out)
}

pub(crate) fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

/// Escapes `text` for a single-quoted JavaScript string inside an HTML
/// attribute.
pub(crate) fn escape_js_attribute(text: &str) -> String {
    let mut js = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '\'' | '"' => {
                js.push('\\');
                js.push(c);
            }
            '\n' => js.push_str("\\n"),
            '\r' => js.push_str("\\r"),
            c => js.push(c),
        }
    }
    escape_html(&js).into_owned()
}

/// Removes the module path from every path segment of a type name.
///
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
pub(crate) fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                out.truncate(segment_start);
            }
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';' | '*' => {
                out.push(c);
                segment_start = out.len();
            }
            c => out.push(c),
        }
    }
    out
}

/// Reduces an HTML fragment to its text content.
///
/// Used when console output goes to a log sink instead of a page. Block
/// level closing tags become line breaks and the common entities are decoded.
pub(crate) fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let Some(end) = rest[start..].find('>') else {
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let tag = &rest[start + 1..start + end];
        if tag.starts_with("/div") || tag.starts_with("/tr") || tag.starts_with("br") {
            if !out.ends_with('\n') {
                out.push('\n');
            }
        } else if (tag.starts_with("/td") || tag.starts_with("/th")) && !out.ends_with(' ') {
            out.push(' ');
        }
        rest = &rest[start + end + 1..];
    }
    out.push_str(rest);

    let out = out
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&nbsp;", " ");
    decode_entities(&out).into_owned()
}

/// Undoes [`escape_html`].
pub(crate) fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&"),
    )
}

/// Wraps `message` in a span of class `base_class`, marking every whole-word
/// occurrence of one of `keywords` with the class `keyword`.
///
/// The message is inserted as is; escape it first if it is plain text.
///
/// ```
/// assert_eq!(
///     webconsole::highlight("SELECT id FROM users", &["SELECT", "FROM"], "sql"),
///     "<span class=sql><span class=keyword>SELECT</span> id \
///      <span class=keyword>FROM</span> users</span>"
/// );
/// ```
pub fn highlight(message: &str, keywords: &[&str], base_class: &str) -> String {
    fn is_word(c: char) -> bool {
        c.is_alphanumeric() || c == '_'
    }

    let mut out = String::with_capacity(message.len() + 32);
    out.push_str("<span class=");
    out.push_str(base_class);
    out.push('>');

    let mut rest = message;
    let mut previous: Option<char> = None;
    'outer: while let Some(c) = rest.chars().next() {
        if !previous.is_some_and(is_word) {
            for keyword in keywords.iter().filter(|k| !k.is_empty()) {
                if let Some(after) = rest.strip_prefix(keyword)
                    && !after.chars().next().is_some_and(is_word)
                {
                    out.push_str("<span class=keyword>");
                    out.push_str(keyword);
                    out.push_str("</span>");
                    previous = keyword.chars().next_back();
                    rest = after;
                    continue 'outer;
                }
            }
        }
        out.push(c);
        previous = Some(c);
        rest = &rest[c.len_utf8()..];
    }

    out.push_str("</span>");
    out
}

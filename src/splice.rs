//! Inserting the console into a response body.

use alloc::{borrow::Cow, string::String};

/// The parts of an HTTP request/response pair that decide whether the
/// console can be injected into the body.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Exchange<'a> {
    /// The request's `Accept` header.
    pub accept: Option<&'a str>,
    /// The response's `Content-Type` header. A missing content type is
    /// treated as HTML.
    pub content_type: Option<&'a str>,
}

impl<'a> Exchange<'a> {
    /// Creates an exchange from the two headers.
    pub fn new(accept: Option<&'a str>, content_type: Option<&'a str>) -> Self {
        Self {
            accept,
            content_type,
        }
    }

    /// Whether the client accepts HTML.
    pub fn accepts_html(&self) -> bool {
        self.accept.is_some_and(|accept| contains_ignore_case(accept, "text/html"))
    }

    /// Whether the response body is HTML.
    pub fn is_html_response(&self) -> bool {
        self.content_type.is_none_or(|content_type| {
            content_type
                .trim_start()
                .get(..9)
                .is_some_and(|mime| mime.eq_ignore_ascii_case("text/html"))
        })
    }

    /// Whether the response is an HTML page going to a browser.
    pub fn is_interactive_html(&self) -> bool {
        self.accepts_html() && self.is_html_response()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

fn strip_suffix_ignore_case<'s>(text: &'s str, suffix: &str) -> Option<&'s str> {
    let at = text.len().checked_sub(suffix.len())?;
    (text.is_char_boundary(at) && text[at..].eq_ignore_ascii_case(suffix)).then(|| &text[..at])
}

/// Byte offset of the `</body>` of a body ending in `</body></html>`,
/// allowing whitespace between and after the two tags.
fn closing_tags_offset(body: &str) -> Option<usize> {
    let rest = strip_suffix_ignore_case(body.trim_end(), "</html>")?;
    let rest = strip_suffix_ignore_case(rest.trim_end(), "</body>")?;
    Some(rest.len())
}

/// Inserts `console_html` into `body` just before its closing
/// `</body></html>`.
///
/// When the body does not end with those tags it is returned unchanged,
/// unless `force_append` is set, in which case the console is appended.
///
/// ```
/// use webconsole::splice::splice;
///
/// let page = "<html><body>X</body></html>";
/// assert_eq!(splice(page, "C", false), "<html><body>XC</body></html>");
/// assert_eq!(splice("{}", "C", false), "{}");
/// assert_eq!(splice("{}", "C", true), "{}C");
/// ```
pub fn splice<'b>(body: &'b str, console_html: &str, force_append: bool) -> Cow<'b, str> {
    match closing_tags_offset(body) {
        Some(at) => {
            let mut out = String::with_capacity(body.len() + console_html.len());
            out.push_str(&body[..at]);
            out.push_str(console_html);
            out.push_str(&body[at..]);
            Cow::Owned(out)
        }
        None if force_append => {
            let mut out = String::with_capacity(body.len() + console_html.len());
            out.push_str(body);
            out.push_str(console_html);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(body),
    }
}

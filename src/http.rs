//! Request and response panels built from plain HTTP data.
//!
//! The console does not depend on any HTTP library. Frameworks copy what
//! they have into a [`RequestInfo`] or [`ResponseInfo`] and hand it to
//! [`Inspector::request`] or [`Console::register_request_panel`]:
//!
//! ```
//! use webconsole::{Console, Settings, http::RequestInfo};
//!
//! let console = Console::new(Settings::default());
//! let request = RequestInfo::new("GET", "/users?page=2")
//!     .header("Accept", "text/html")
//!     .query_param("page", "2");
//! console.register_request_panel(&request);
//!
//! let html = console.inspector_for("request").unwrap().panel().render().unwrap();
//! assert!(html.contains("/users?page=2"));
//! ```

use alloc::{borrow::Cow, format, vec::Vec};

use crate::{
    Console, Inspector, Panel,
    value::{Composite, Entry, Inspect, Key, ObjectBuilder, Value},
};

/// Name-value pairs in the order they were received. A name may repeat.
pub type Pairs<'a> = Vec<(Cow<'a, str>, Cow<'a, str>)>;

/// The parts of an incoming request shown in the request panel.
#[derive(Clone, Debug, Default)]
pub struct RequestInfo<'a> {
    /// The request method, such as `GET`.
    pub method: Cow<'a, str>,
    /// The request target as sent: path and query string.
    pub target: Cow<'a, str>,
    /// The HTTP version without the `HTTP/` prefix.
    pub protocol_version: Cow<'a, str>,
    /// Request headers. Repeated names are shown as one comma-joined row.
    pub headers: Pairs<'a>,
    /// Cookies sent with the request.
    pub cookies: Pairs<'a>,
    /// Decoded query string parameters.
    pub query: Pairs<'a>,
    /// Decoded body parameters of a form submission.
    pub params: Pairs<'a>,
    /// Values attached to the request by the application, such as route
    /// parameters.
    pub attributes: Pairs<'a>,
    /// Server and environment variables.
    pub server: Pairs<'a>,
    /// The raw body, when it is text.
    pub body: Option<Cow<'a, str>>,
}

impl<'a> RequestInfo<'a> {
    /// A request with the given method and target over HTTP/1.1.
    pub fn new(method: impl Into<Cow<'a, str>>, target: impl Into<Cow<'a, str>>) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
            protocol_version: Cow::Borrowed("1.1"),
            ..Self::default()
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds a cookie.
    #[must_use]
    pub fn cookie(mut self, name: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// Adds a query string parameter.
    #[must_use]
    pub fn query_param(mut self, name: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Adds a body parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Adds a request attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Adds a server variable.
    #[must_use]
    pub fn server_param(mut self, name: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        self.server.push((name.into(), value.into()));
        self
    }

    /// Sets the raw body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Cow<'a, str>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl Inspect for RequestInfo<'_> {
    fn inspect(&self) -> Value<'_> {
        ObjectBuilder::anonymous(core::any::type_name::<RequestInfo<'static>>())
            .field_value("target", &*self.target)
            .field_value("method", &*self.method)
            .field_value("protocol_version", &*self.protocol_version)
            .field_value("headers", pairs(&self.headers))
            .field_value("cookies", pairs(&self.cookies))
            .field_value("query", pairs(&self.query))
            .field_value("params", pairs(&self.params))
            .field_value("attributes", pairs(&self.attributes))
            .field_value("server", pairs(&self.server))
            .field_value("body", self.body.as_deref())
            .finish()
    }

    fn type_name(&self) -> &'static str {
        core::any::type_name::<RequestInfo<'static>>()
    }
}

/// The parts of an outgoing response shown in the response panel.
#[derive(Clone, Debug)]
pub struct ResponseInfo<'a> {
    /// The status code.
    pub status: u16,
    /// The reason phrase. When absent, the standard phrase for the status
    /// is shown.
    pub reason: Option<Cow<'a, str>>,
    /// The HTTP version without the `HTTP/` prefix.
    pub protocol_version: Cow<'a, str>,
    /// Response headers. Repeated names are shown as one comma-joined row.
    pub headers: Pairs<'a>,
}

impl<'a> ResponseInfo<'a> {
    /// A response with the given status over HTTP/1.1.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            reason: None,
            protocol_version: Cow::Borrowed("1.1"),
            headers: Vec::new(),
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets a custom reason phrase.
    #[must_use]
    pub fn reason(mut self, reason: impl Into<Cow<'a, str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// The reason phrase shown for the response.
    pub fn reason_phrase(&self) -> &str {
        self.reason
            .as_deref()
            .unwrap_or_else(|| standard_reason(self.status))
    }
}

impl Inspect for ResponseInfo<'_> {
    fn inspect(&self) -> Value<'_> {
        ObjectBuilder::anonymous(core::any::type_name::<ResponseInfo<'static>>())
            .field_value("status", u32::from(self.status))
            .field_value("reason", self.reason_phrase())
            .field_value("protocol_version", &*self.protocol_version)
            .field_value("headers", pairs(&self.headers))
            .finish()
    }

    fn type_name(&self) -> &'static str {
        core::any::type_name::<ResponseInfo<'static>>()
    }
}

fn standard_reason(status: u16) -> &'static str {
    match status {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        206 => "Partial Content",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        410 => "Gone",
        413 => "Content Too Large",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Content",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}

/// A map of `pairs`, joining the values of repeated names with `, `.
fn pairs<'v>(pairs: &'v [(Cow<'_, str>, Cow<'_, str>)]) -> Value<'v> {
    let mut map = Composite::new();
    for (name, value) in pairs {
        let key = Key::from(&**name);
        let joined = match map.get(&key) {
            Some(Entry::Value(Value::Str(previous))) => Cow::Owned(format!("{previous}, {value}")),
            _ => Cow::Borrowed(&**value),
        };
        map.insert(key, Value::Str(joined));
    }
    Value::Composite(map)
}

impl Inspector<'_> {
    /// Writes a table of the request.
    pub fn request(&self, request: &RequestInfo<'_>) -> &Self {
        self.table(request, self.context())
    }

    /// Writes a table of the response.
    pub fn response(&self, response: &ResponseInfo<'_>) -> &Self {
        self.table(response, self.context())
    }
}

impl Console {
    /// Registers a `request` panel titled "Request" holding a table of
    /// `request`, replacing any earlier one.
    pub fn register_request_panel(&self, request: &RequestInfo<'_>) -> Inspector<'_> {
        let inspector = self.register_panel("request", Panel::new("Request", ""));
        inspector.request(request);
        inspector
    }

    /// Registers a `response` panel titled "Response" holding a table of
    /// `response`, replacing any earlier one.
    pub fn register_response_panel(&self, response: &ResponseInfo<'_>) -> Inspector<'_> {
        let inspector = self.register_panel("response", Panel::new("Response", ""));
        inspector.response(response);
        inspector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;

    fn rendered(console: &Console, name: &str) -> alloc::string::String {
        console
            .inspector_for(name)
            .unwrap()
            .panel()
            .render()
            .unwrap()
    }

    #[test]
    fn test_request_panel() {
        let console = Console::new(Settings::default());
        let request = RequestInfo::new("POST", "/login?next=/home")
            .header("Accept", "text/html")
            .header("Accept", "application/xhtml+xml")
            .cookie("session", "abc123")
            .query_param("next", "/home")
            .param("user", "<admin>")
            .attribute("route", "login")
            .body("user=%3Cadmin%3E");
        console.register_request_panel(&request);

        let panels = console.registry().visible_panels();
        assert_eq!(panels.last().map(|(name, panel)| (name.as_str(), panel.title())), Some(("request", "Request")));

        let html = rendered(&console, "request");
        assert!(html.contains("<td class=\"v\">&ldquo;/login?next=/home&rdquo;</td>"));
        assert!(html.contains("<td class=\"v\">&ldquo;POST&rdquo;</td>"));
        assert!(html.contains("<td class=\"v\">&ldquo;1.1&rdquo;</td>"));
        assert!(html.contains("&ldquo;text/html, application/xhtml+xml&rdquo;"));
        assert!(html.contains("&ldquo;abc123&rdquo;"));
        assert!(html.contains("&ldquo;&lt;admin&gt;&rdquo;"));
        assert!(!html.contains("<admin>"));
        for field in ["target", "method", "headers", "cookies", "query", "params", "attributes", "server", "body"] {
            assert!(html.contains(&format!(">{field}</th>")), "{field}");
        }
    }

    #[test]
    fn test_request_without_body() {
        let console = Console::new(Settings::default());
        console.inspector().request(&RequestInfo::new("GET", "/"));
        let html = console.inspector().panel().render().unwrap();
        assert!(html.contains("<td class=\"v\">null</td>"));
        assert!(html.contains("<td class=\"v\"><i>[]</i></td>"));
    }

    #[test]
    fn test_response_panel() {
        let console = Console::new(Settings::default());
        let response = ResponseInfo::new(404)
            .header("Content-Type", "text/html")
            .header("Set-Cookie", "a=1")
            .header("Set-Cookie", "b=2");
        console.register_response_panel(&response);

        let html = rendered(&console, "response");
        assert!(html.contains("<td class=\"v\">404</td>"));
        assert!(html.contains("&ldquo;Not Found&rdquo;"));
        assert!(html.contains("&ldquo;a=1, b=2&rdquo;"));
    }

    #[test]
    fn test_reason_phrase() {
        assert_eq!(ResponseInfo::new(200).reason_phrase(), "OK");
        assert_eq!(ResponseInfo::new(299).reason_phrase(), "");
        assert_eq!(ResponseInfo::new(200).reason("Fine").reason_phrase(), "Fine");
    }

    #[test]
    fn test_repeated_names_join() {
        let headers: Pairs<'_> = alloc::vec![
            ("X".into(), "1".into()),
            ("Y".into(), "2".into()),
            ("X".into(), "3".into()),
        ];
        let value = pairs(&headers);
        let map = value.as_composite().unwrap();
        assert_eq!(map.len(), 2);
        assert!(matches!(
            map.get(&Key::from("X")),
            Some(Entry::Value(Value::Str(joined))) if joined == "1, 3"
        ));
    }
}

//! The error popup shown in place of a page when a request fails.
//!
//! An [`ErrorInfo`] describes the failure: its type, message, source chain
//! and the stack frames that led to it. [`display`] turns it into a
//! response, either the popup document for browsers in debug mode or a
//! plain-text message for everything else.
//!
//! Stack frames are supplied by the caller, typically through the
//! `webconsole-backtrace` crate. Frames whose path starts with one of
//! [`Settings::library_crates`] are left out of both renderings.

pub mod paths;

use alloc::{
    borrow::Cow,
    format,
    string::{String, ToString},
    vec::Vec,
};
use core::{
    fmt::{self, Write},
    panic::Location,
};

use self::paths::{process_message, shorten_path};
use crate::{
    ConsoleError, Settings, assets, markup,
    splice::Exchange,
    util::{escape_html, push_escaped, short_type_name},
    value::{Composite, Key, Kind, Value},
};

/// Strings in frame arguments are cut to this many characters.
const TRIM_WIDTH: usize = 50;

/// What a stack frame was executing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallDescription {
    /// A constructor (`Type::new`).
    Constructor {
        /// Path of the constructed type.
        type_path: String,
    },
    /// A method or associated function of a type.
    Method {
        /// Path of the type.
        type_path: String,
        /// Name of the method.
        method: String,
    },
    /// A free function.
    Function {
        /// Path of the function.
        path: String,
    },
    /// A closure, with the path of the item defining it when known.
    Closure {
        /// Path of the enclosing item.
        owner: Option<String>,
    },
    /// Code outside any function.
    GlobalScope,
}

/// Splits a symbol path at `::` separators that are not inside `<...>`.
fn split_path(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&path[start..]);
    segments
}

fn is_type_segment(segment: &str) -> bool {
    segment.starts_with('<') || segment.starts_with(|c: char| c.is_ascii_uppercase())
}

impl CallDescription {
    /// Classifies a demangled symbol path without its hash suffix, such as
    /// `my_app::model::User::new` or `my_app::main::{{closure}}`.
    pub fn from_symbol(path: &str) -> Self {
        let path = path.trim();
        if path.is_empty() {
            return Self::GlobalScope;
        }
        let segments = split_path(path);
        if let Some(closure) = segments.iter().position(|s| s.starts_with("{{closure")) {
            let owner = segments[..closure].join("::");
            return Self::Closure {
                owner: (!owner.is_empty()).then_some(owner),
            };
        }
        match segments.as_slice() {
            [types @ .., owner, name] if is_type_segment(owner) => {
                let type_path = if types.is_empty() {
                    (*owner).to_string()
                } else {
                    format!("{}::{owner}", types.join("::"))
                };
                if *name == "new" {
                    Self::Constructor { type_path }
                } else {
                    Self::Method {
                        type_path,
                        method: (*name).to_string(),
                    }
                }
            }
            _ => Self::Function { path: path.into() },
        }
    }

    /// The path the description refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Constructor { type_path } | Self::Method { type_path, .. } => Some(type_path),
            Self::Function { path } => Some(path),
            Self::Closure { owner } => owner.as_deref(),
            Self::GlobalScope => None,
        }
    }

    /// The crate the described code belongs to.
    pub fn crate_name(&self) -> Option<&str> {
        let path = self.path()?.trim_start_matches('<').trim_start_matches('&');
        let name = path.split("::").next()?;
        (!name.is_empty()).then_some(name)
    }

    fn write_html(&self, out: &mut String) {
        fn type_span(out: &mut String, type_path: &str) {
            let (namespace, _) = type_path.rsplit_once("::").unwrap_or(("", type_path));
            out.push_str("<span class='class' title='");
            push_escaped(out, namespace);
            out.push_str("'>");
            push_escaped(out, &short_type_name(type_path));
            out.push_str("</span>");
        }

        match self {
            Self::Constructor { type_path } => {
                out.push_str("new ");
                type_span(out, type_path);
            }
            Self::Method { type_path, method } => {
                type_span(out, type_path);
                out.push_str("::<span class='fn'>");
                push_escaped(out, method);
                out.push_str("</span>");
            }
            Self::Function { path } => {
                let (namespace, name) = path.rsplit_once("::").unwrap_or(("", path));
                out.push_str("<span class='fn' title='");
                push_escaped(out, namespace);
                out.push_str("'>");
                push_escaped(out, name);
                out.push_str("</span>");
            }
            Self::Closure { owner: Some(owner) } => {
                out.push_str("<span class='info' title='In ");
                push_escaped(out, owner);
                out.push_str("'>Closure</span>");
            }
            Self::Closure { owner: None } => out.push_str("<span class='type'>Closure</span>"),
            Self::GlobalScope => out.push_str("global scope"),
        }
    }
}

impl fmt::Display for CallDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructor { type_path } => write!(f, "new {type_path}"),
            Self::Method { type_path, method } => write!(f, "{type_path}::{method}"),
            Self::Function { path } => f.write_str(path),
            Self::Closure { owner: Some(owner) } => write!(f, "{owner}::{{closure}}"),
            Self::Closure { owner: None } => f.write_str("{closure}"),
            Self::GlobalScope => f.write_str("global scope"),
        }
    }
}

/// One frame of a stack trace.
#[derive(Clone, Debug)]
pub struct StackFrame {
    /// Source file, if known.
    pub file: Option<String>,
    /// Line in [`file`](Self::file), if known.
    pub line: Option<u32>,
    /// What the frame was executing.
    pub call: CallDescription,
    /// Argument values, when the caller could capture them.
    pub args: Vec<Value<'static>>,
}

impl StackFrame {
    /// A frame for `call` without location or arguments.
    pub fn new(call: CallDescription) -> Self {
        Self {
            file: None,
            line: None,
            call,
            args: Vec::new(),
        }
    }

    /// Sets the source location.
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Adds an argument value.
    pub fn arg(mut self, value: impl Into<Value<'static>>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Whether the frame's path lies under one of the path `prefixes`.
    ///
    /// A prefix matches whole path segments: `webconsole` matches
    /// `webconsole::panel::Inspector` but not `webconsole_backtrace::capture`.
    pub fn belongs_to(&self, prefixes: &[&str]) -> bool {
        let Some(path) = self.call.path() else {
            return false;
        };
        let path = path.trim_start_matches('<').trim_start_matches('&');
        prefixes.iter().any(|prefix| {
            !prefix.is_empty()
                && path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
        })
    }
}

/// The source location an error was raised at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source file.
    pub file: String,
    /// Line in the file.
    pub line: u32,
}

impl From<&Location<'_>> for SourceLocation {
    fn from(location: &Location<'_>) -> Self {
        Self {
            file: location.file().into(),
            line: location.line(),
        }
    }
}

/// Everything the popup shows about one failure.
#[derive(Clone, Debug)]
pub struct ErrorInfo {
    /// Fully qualified name of the error type.
    pub title: String,
    /// The error message. `<path>...</path>` spans are shown as shortened
    /// paths.
    pub message: String,
    /// Where the error was raised.
    pub location: Option<SourceLocation>,
    /// Messages of the error's sources, outermost first.
    pub causes: Vec<String>,
    /// The stack, innermost frame first.
    pub frames: Vec<StackFrame>,
    /// Number of frames removed by [`filter_frames`](Self::filter_frames).
    pub omitted_frames: usize,
    /// Extra console markup shown under the message, expanded like panel
    /// content.
    pub info: Option<String>,
}

fn display_text(value: &dyn fmt::Display) -> String {
    let mut text = String::new();
    if write!(text, "{value}").is_err() {
        text = String::from("<unprintable error message>");
    }
    text
}

impl ErrorInfo {
    /// Creates an error description without location, causes or frames.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            location: None,
            causes: Vec::new(),
            frames: Vec::new(),
            omitted_frames: 0,
            info: None,
        }
    }

    /// Describes `error`, located at the caller.
    ///
    /// The message and the messages of the source chain are captured now,
    /// so `error` can be dropped afterwards.
    #[track_caller]
    pub fn from_error<E: core::error::Error + ?Sized>(error: &E) -> Self {
        let mut info = Self::new(core::any::type_name::<E>(), display_text(&error));
        info.location = Some(Location::caller().into());
        let mut source = error.source();
        while let Some(cause) = source {
            info.causes.push(display_text(&cause));
            source = cause.source();
        }
        info
    }

    /// Sets the location.
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.location = Some(SourceLocation {
            file: file.into(),
            line,
        });
        self
    }

    /// Sets the stack frames.
    pub fn with_frames(mut self, frames: Vec<StackFrame>) -> Self {
        self.frames = frames;
        self
    }

    /// Sets extra console markup shown under the message.
    pub fn with_info(mut self, markup: impl Into<String>) -> Self {
        self.info = Some(markup.into());
        self
    }

    /// Removes the frames under the path prefixes in `library_crates`.
    pub fn filter_frames(&mut self, library_crates: &[&str]) {
        let before = self.frames.len();
        self.frames.retain(|frame| !frame.belongs_to(library_crates));
        self.omitted_frames += before - self.frames.len();
    }
}

/// `error` without the frames of [`Settings::library_crates`].
fn application_frames<'e>(error: &'e ErrorInfo, settings: &Settings) -> Cow<'e, ErrorInfo> {
    if error
        .frames
        .iter()
        .any(|frame| frame.belongs_to(settings.library_crates))
    {
        let mut error = error.clone();
        error.filter_frames(settings.library_crates);
        Cow::Owned(error)
    } else {
        Cow::Borrowed(error)
    }
}

/// Why the popup document could not be rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PopupError {
    /// The writer refused output.
    Write,
    /// The extra information of the error is malformed markup.
    Markup(ConsoleError),
}

impl fmt::Display for PopupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write => f.write_str("the popup writer failed"),
            Self::Markup(error) => write!(f, "invalid popup information: {error}"),
        }
    }
}

impl core::error::Error for PopupError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Write => None,
            Self::Markup(error) => Some(error),
        }
    }
}

impl From<fmt::Error> for PopupError {
    fn from(_: fmt::Error) -> Self {
        Self::Write
    }
}

impl From<ConsoleError> for PopupError {
    fn from(error: ConsoleError) -> Self {
        Self::Markup(error)
    }
}

/// A finished error response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Content-Type` header.
    pub content_type: &'static str,
    /// The body.
    pub body: String,
}

/// `ParseIntError` becomes `Parse Int Error`.
fn friendly_name(type_name: &str) -> String {
    let short = short_type_name(type_name);
    let mut out = String::with_capacity(short.len() + 4);
    let mut previous: Option<char> = None;
    for c in short.chars() {
        if c.is_ascii_uppercase() && previous.is_some_and(|p| p.is_ascii_lowercase()) {
            out.push(' ');
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

fn truncate(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(TRIM_WIDTH - 3) {
        Some((cut, _)) if text.chars().count() > TRIM_WIDTH => {
            Cow::Owned(format!("{}...", &text[..cut]))
        }
        _ => Cow::Borrowed(text),
    }
}

/// Plain summary of a value, for the tooltip of a composite argument.
fn summary(value: &Value<'_>, null_marker: &str) -> String {
    match value {
        Value::Null => null_marker.into(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Str(s) => format!("'{}'", truncate(s)),
        Value::Callable(_) => "Callable".into(),
        Value::Raw(_) => "Html".into(),
        Value::Composite(composite) => composite_label(composite),
    }
}

fn composite_label(composite: &Composite<'_>) -> String {
    match (composite.object_info(), composite.kind()) {
        (Some(info), _) => short_type_name(info.type_name),
        (None, Kind::List) => "list".into(),
        (None, _) => "map".into(),
    }
}

fn write_argument(out: &mut String, value: &Value<'_>, settings: &Settings) {
    match value {
        Value::Str(s) => {
            let short = truncate(s);
            if short.len() < s.len() {
                out.push_str("'<span class='string' title='");
                push_escaped(out, s);
                out.push_str("'>");
            } else {
                out.push_str("'<span class='string'>");
            }
            push_escaped(out, &short);
            out.push_str("</span>'");
        }
        Value::Composite(composite) => {
            let mut tooltip = String::new();
            if composite.is_empty() {
                tooltip.push_str("Empty ");
                tooltip.push_str(&composite_label(composite));
            } else {
                tooltip.push_str("[\n  ");
                let entries: Vec<String> = composite
                    .iter()
                    .map(|(key, entry)| {
                        let key = match key {
                            Key::Index(i) => i.to_string(),
                            Key::Name(name) => name.to_string(),
                        };
                        format!("{key} => {}", summary(&entry.resolve(), settings.null_marker()))
                    })
                    .collect();
                tooltip.push_str(&entries.join(",\n  "));
                tooltip.push_str("\n]");
            }
            out.push_str("<span class=\"info\" title=\"");
            push_escaped(out, &tooltip);
            out.push_str("\">");
            push_escaped(out, &composite_label(composite));
            out.push_str("</span>");
        }
        scalar => push_escaped(out, &summary(scalar, settings.null_marker())),
    }
}

/// Renders the frames as the stack trace section of the popup.
pub fn render_stack_trace(frames: &[StackFrame], settings: &Settings) -> String {
    let mut out = String::new();
    for (index, frame) in frames.iter().enumerate() {
        let file = frame.file.as_deref().unwrap_or("");
        let file_name = file.rsplit(['/', '\\']).next().unwrap_or(file);

        let _ = write!(
            out,
            "<div class=\"stack-frame\"><div class=\"code\"><div><span class=\"rowHeader\">{}</span>",
            index + 1
        );
        out.push_str("<span class=\"file\">");
        push_escaped(&mut out, file_name);
        out.push_str("</span>");
        if let Some(line) = frame.line {
            let _ = write!(out, "<span class='line'>{line}</span>");
        }

        out.push_str("<div class=\"__call\">Call ");
        frame.call.write_html(&mut out);
        if frame.call != CallDescription::GlobalScope {
            out.push_str(" (");
            for (i, arg) in frame.args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_argument(&mut out, arg, settings);
            }
            out.push(')');
        }
        out.push_str("<div class='__location'>At ");
        if file.is_empty() {
            out.push_str("&lt;unknown location&gt;");
        } else {
            push_escaped(&mut out, &shorten_path(file, settings));
        }
        out.push_str("</div></div></div></div></div>");
    }
    out
}

fn capitalize(text: &str) -> Cow<'_, str> {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => Cow::Owned(first.to_uppercase().chain(chars).collect()),
        _ => Cow::Borrowed(text),
    }
}

/// Writes the popup document for `error`.
///
/// Generic over the writer so that a failing writer aborts rendering; see
/// [`display`] for the fallback.
///
/// # Errors
///
/// Fails when the writer fails or when [`ErrorInfo::info`] is not valid
/// console markup. Nothing useful has been written in either case.
pub fn render_popup<W: Write>(out: &mut W, error: &ErrorInfo, settings: &Settings) -> Result<(), PopupError> {
    let info = error.info.as_deref().map(markup::expand).transpose()?;
    let error = application_frames(error, settings);
    let app = escape_html(&settings.app_name);
    write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><title>{app}</title>{}</head>",
        assets::POPUP_STYLE
    )?;
    write!(
        out,
        "<body id=\"__error\"><div id=\"__panel\"><div class=\"__title-bar\">{app}</div>\
         <div class=\"__panel-body\"><div class=\"__message\">"
    )?;
    write!(
        out,
        "<h3><span class='info' title='{}'>{}</span></h3>",
        escape_html(&error.title),
        escape_html(&friendly_name(&error.title))
    )?;
    let message = process_message(&error.message, settings);
    write!(out, "<div>{}</div>", capitalize(&message))?;
    if let Some(info) = info {
        write!(out, "<div class='__info'>{info}</div>")?;
    }
    if !error.causes.is_empty() {
        out.write_str("<div class=\"__causes\"><b>Caused by:</b><ul>")?;
        for cause in &error.causes {
            write!(out, "<li>{}</li>", process_message(cause, settings))?;
        }
        out.write_str("</ul></div>")?;
    }
    out.write_str("</div></div><div id=\"__error-location\">")?;
    if let Some(location) = &error.location {
        write!(
            out,
            "Thrown from <b>{}</b>, line <b>{}</b>",
            escape_html(&shorten_path(&location.file, settings)),
            location.line
        )?;
    }
    out.write_str(
        "<div class=\"__more\"><a id=\"__more\" class=\"__btn\" \
         href=\"javascript:void(document.getElementById('__panel').className='__show')\" \
         onclick=\"this.style.display='none'\">Stack trace \
         <span style=\"font-size:16px\">&blacktriangledown;</span></a></div></div>",
    )?;
    write!(
        out,
        "<div id=\"__trace\">{}",
        render_stack_trace(&error.frames, settings)
    )?;
    if error.omitted_frames > 0 {
        write!(
            out,
            "<div class=\"__omitted\">{} library frames omitted</div>",
            error.omitted_frames
        )?;
    }
    out.write_str("</div></div></body></html>")?;
    Ok(())
}

/// The plain-text form of `error`. The stack trace is included when
/// `with_trace` is set.
pub fn render_text(error: &ErrorInfo, settings: &Settings, with_trace: bool) -> String {
    let error = application_frames(error, settings);
    let mut out = crate::util::html_to_text(&process_message(&error.message, settings));
    for cause in &error.causes {
        let _ = write!(out, "\nCaused by: {cause}");
    }
    if with_trace {
        out.push_str("\n\nStack trace:\n");
        for (index, frame) in error.frames.iter().enumerate() {
            let _ = write!(out, "#{index} {}", frame.call);
            if let Some(file) = &frame.file {
                let _ = write!(out, " at {}", shorten_path(file, settings));
                if let Some(line) = frame.line {
                    let _ = write!(out, ":{line}");
                }
            }
            out.push('\n');
        }
    }
    out
}

/// Builds the response for a failed request.
///
/// Browsers get the popup document in debug mode. Everything else gets the
/// message as plain text, followed by the stack trace in debug mode.
pub fn display(error: &ErrorInfo, exchange: &Exchange<'_>, settings: &Settings) -> ErrorResponse {
    if settings.debug_mode && exchange.accepts_html() {
        let mut body = String::new();
        match render_popup(&mut body, error, settings) {
            Ok(()) => {
                return ErrorResponse {
                    status: 500,
                    content_type: "text/html; charset=utf-8",
                    body,
                };
            }
            Err(err) => {
                tracing::warn!(
                    title = %error.title,
                    error = %err,
                    "error popup rendering failed, falling back to plain text"
                );
            }
        }
    }
    ErrorResponse {
        status: 500,
        content_type: "text/plain; charset=utf-8",
        body: render_text(error, settings, settings.debug_mode),
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::value::{Inspect, ObjectBuilder};

    #[derive(Debug)]
    struct Outer(Inner);

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "cannot read <path>/srv/app/config/../data/x.toml</path>")
        }
    }

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("permission denied")
        }
    }

    impl core::error::Error for Outer {
        fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    impl core::error::Error for Inner {}

    fn settings() -> Settings {
        Settings {
            project_root: Some("/srv/app".into()),
            ..Settings::DEFAULT
        }
    }

    #[test]
    fn test_call_description_from_symbol() {
        assert_eq!(
            CallDescription::from_symbol("my_app::model::User::new"),
            CallDescription::Constructor {
                type_path: "my_app::model::User".into()
            }
        );
        assert_eq!(
            CallDescription::from_symbol("my_app::model::User::save"),
            CallDescription::Method {
                type_path: "my_app::model::User".into(),
                method: "save".into()
            }
        );
        assert_eq!(
            CallDescription::from_symbol("<my_app::Db as my_app::Store>::get"),
            CallDescription::Method {
                type_path: "<my_app::Db as my_app::Store>".into(),
                method: "get".into()
            }
        );
        assert_eq!(
            CallDescription::from_symbol("my_app::routes::index"),
            CallDescription::Function {
                path: "my_app::routes::index".into()
            }
        );
        assert_eq!(
            CallDescription::from_symbol("my_app::main::{{closure}}"),
            CallDescription::Closure {
                owner: Some("my_app::main".into())
            }
        );
        assert_eq!(CallDescription::from_symbol(""), CallDescription::GlobalScope);
    }

    #[test]
    fn test_crate_name() {
        let call = CallDescription::from_symbol("<webconsole::Console as core::fmt::Debug>::fmt");
        assert_eq!(call.crate_name(), Some("webconsole"));
        assert_eq!(CallDescription::GlobalScope.crate_name(), None);
    }

    #[test]
    fn test_from_error() {
        let error = Outer(Inner);
        let info = ErrorInfo::from_error(&error);
        assert!(info.title.ends_with("Outer"));
        assert_eq!(info.causes, ["permission denied"]);
        let location = info.location.unwrap();
        assert!(location.file.ends_with("mod.rs"));
    }

    #[test]
    fn test_filter_frames() {
        let mut info = ErrorInfo::new("E", "m").with_frames(vec![
            StackFrame::new(CallDescription::from_symbol("webconsole::panel::Inspector::inspect")),
            StackFrame::new(CallDescription::from_symbol("my_app::main")),
            StackFrame::new(CallDescription::from_symbol("webconsole_backtrace::capture_frames")),
        ]);
        info.filter_frames(&["webconsole", "webconsole_backtrace"]);
        assert_eq!(info.frames.len(), 1);
        assert_eq!(info.omitted_frames, 2);
        assert_eq!(info.frames[0].call.to_string(), "my_app::main");
    }

    #[test]
    fn test_stack_frame_rendering() {
        struct Point;
        impl Inspect for Point {
            fn inspect(&self) -> Value<'_> {
                ObjectBuilder::new(self).field_value("x", 1).finish()
            }
        }

        let long = "x".repeat(60);
        let list = vec![1, 2].inspect().into_static();
        let frame = StackFrame::new(CallDescription::from_symbol("my_app::model::User::new"))
            .at("/srv/app/src/model.rs", 12)
            .arg(true)
            .arg(long.clone())
            .arg(list)
            .arg(Point.inspect().into_static());
        let html = render_stack_trace(&[frame], &settings());

        assert!(html.contains("<span class=\"file\">model.rs</span><span class='line'>12</span>"));
        assert!(html.contains("Call new <span class='class' title='my_app::model'>User</span> (true, "));
        assert!(html.contains(&format!("title='{long}'>{}...</span>'", "x".repeat(47))));
        assert!(html.contains("<span class=\"info\" title=\"[\n  0 =&gt; 1,\n  1 =&gt; 2\n]\">list</span>"));
        assert!(html.contains("title=\"[\n  x =&gt; 1\n]\">Point</span>"));
        assert!(html.contains("<div class='__location'>At src/model.rs</div>"));
    }

    #[test]
    fn test_global_scope_has_no_arguments() {
        let frame = StackFrame::new(CallDescription::GlobalScope);
        let html = render_stack_trace(&[frame], &settings());
        assert!(html.contains("Call global scope<div class='__location'>At &lt;unknown location&gt;"));
    }

    #[test]
    fn test_popup_document() {
        let info = ErrorInfo::from_error(&Outer(Inner)).with_info("<i>retry later</i>");
        let mut html = String::new();
        render_popup(&mut html, &info, &settings()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html><html><head>"));
        assert!(html.contains("<body id=\"__error\"><div id=\"__panel\"><div class=\"__title-bar\">Web Console</div>"));
        assert!(html.contains("<h3><span class='info' title='"));
        assert!(html.contains("'>Outer</span></h3>"));
        assert!(html.contains("<div>Cannot read <b>data/x.toml</b></div>"));
        assert!(html.contains("<div class='__info'><i>retry later</i></div>"));
        assert!(html.contains("<li>permission denied</li>"));
        assert!(html.contains("<div id=\"__error-location\">Thrown from <b>"));
        assert!(html.contains("id=\"__more\""));
        assert!(html.ends_with("<div id=\"__trace\"></div></div></body></html>"));
    }

    #[test]
    fn test_display_policy() {
        let info = ErrorInfo::new("app::NotFound", "no such user")
            .with_frames(vec![StackFrame::new(CallDescription::from_symbol("app::main")).at("/srv/app/src/main.rs", 3)]);
        let browser = Exchange::new(Some("text/html"), None);
        let api = Exchange::new(Some("application/json"), None);

        let popup = display(&info, &browser, &settings());
        assert_eq!(popup.status, 500);
        assert!(popup.content_type.starts_with("text/html"));

        let text = display(&info, &api, &settings());
        assert_eq!(text.content_type, "text/plain; charset=utf-8");
        assert_eq!(
            text.body,
            "no such user\n\nStack trace:\n#0 app::main at src/main.rs:3\n"
        );

        let production = Settings {
            debug_mode: false,
            ..settings()
        };
        let text = display(&info, &browser, &production);
        assert_eq!(text.status, 500);
        assert_eq!(text.body, "no such user");
    }

    #[test]
    fn test_writer_failure_falls_back() {
        struct Failing;
        impl Write for Failing {
            fn write_str(&mut self, _: &str) -> fmt::Result {
                Err(fmt::Error)
            }
        }
        let info = ErrorInfo::new("E", "m");
        assert_eq!(
            render_popup(&mut Failing, &info, &settings()),
            Err(PopupError::Write)
        );
    }

    #[test]
    fn test_invalid_info_falls_back_to_text() {
        let info = ErrorInfo::new("app::Broken", "the handler failed").with_info("<#bogus>x</#bogus>");
        let mut html = String::new();
        assert_eq!(
            render_popup(&mut html, &info, &settings()),
            Err(PopupError::Markup(ConsoleError::InvalidMarkupTag { tag: "bogus".into() }))
        );

        let browser = Exchange::new(Some("text/html"), None);
        let response = display(&info, &browser, &settings());
        assert_eq!(response.status, 500);
        assert_eq!(response.content_type, "text/plain; charset=utf-8");
        assert!(response.body.starts_with("the handler failed"));
        assert!(!response.body.contains('<'));
    }

    #[test]
    fn test_info_markup_is_expanded() {
        let info = ErrorInfo::new("E", "m").with_info("<#alert>retry later</#alert>");
        let mut html = String::new();
        render_popup(&mut html, &info, &settings()).unwrap();
        assert!(html.contains("<div class='__info'><div class='__alert'>retry later</div></div>"));
    }

    #[test]
    fn test_library_frames_are_hidden() {
        let info = ErrorInfo::new("E", "m").with_frames(vec![
            StackFrame::new(CallDescription::from_symbol("webconsole::panel::Inspector::inspect"))
                .at("/work/webconsole/src/panel.rs", 170),
            StackFrame::new(CallDescription::from_symbol("my_app::routes::index"))
                .at("/srv/app/src/routes.rs", 9),
        ]);
        let browser = Exchange::new(Some("text/html"), None);

        let popup = display(&info, &browser, &settings());
        assert!(!popup.body.contains("panel.rs"));
        assert!(popup.body.contains("routes.rs"));
        assert!(popup.body.contains("1 library frames omitted"));

        let text = render_text(&info, &settings(), true);
        assert_eq!(text, "m\n\nStack trace:\n#0 my_app::routes::index at src/routes.rs:9\n");

        let everything = Settings {
            library_crates: &[],
            ..settings()
        };
        assert!(display(&info, &browser, &everything).body.contains("panel.rs"));
    }

    #[test]
    fn test_library_prefix_matches_whole_segments() {
        let frame = |symbol| StackFrame::new(CallDescription::from_symbol(symbol));
        assert!(frame("webconsole::Console::render").belongs_to(&["webconsole"]));
        assert!(frame("<webconsole::Console as core::fmt::Debug>::fmt").belongs_to(&["webconsole"]));
        assert!(frame("my_app::db::Pool::get").belongs_to(&["my_app::db"]));
        assert!(!frame("webconsole_backtrace::capture").belongs_to(&["webconsole"]));
        assert!(!frame("my_app::main").belongs_to(&["webconsole", ""]));
        assert!(!StackFrame::new(CallDescription::GlobalScope).belongs_to(&["webconsole"]));
    }

    #[test]
    fn test_friendly_name() {
        assert_eq!(friendly_name("core::num::error::ParseIntError"), "Parse Int Error");
        assert_eq!(friendly_name("std::io::Error"), "Error");
    }
}

//! Panel buffers and the inspection surface that writes into them.

use alloc::{borrow::Cow, format, string::String};
use core::{fmt, panic::Location};

use triomphe::Arc;

use crate::{
    Console, ConsoleError,
    formatter::{Filter, RenderContext, render, type_label},
    lock::Lock,
    log::{Level, interpolate},
    markup::{self, Tag},
    popup::paths::shorten_path,
    util::{escape_html, highlight},
    value::{Identity, Inspect, Value},
};

/// A named region of the console holding accumulated markup.
///
/// Content is appended with [`write`](Self::write) and turned into HTML by
/// [`render`](Self::render), which can be called any number of times.
pub struct Panel {
    title: Cow<'static, str>,
    icon: Cow<'static, str>,
    visible: bool,
    content: Lock<String>,
}

impl Panel {
    /// Creates an empty panel with a tab.
    pub fn new(title: impl Into<Cow<'static, str>>, icon: impl Into<Cow<'static, str>>) -> Self {
        Self {
            title: title.into(),
            icon: icon.into(),
            visible: true,
            content: Lock::new(String::new()),
        }
    }

    /// Creates an empty panel without a tab. Its content only reaches the
    /// page if the caller writes it somewhere itself.
    pub fn hidden(title: impl Into<Cow<'static, str>>) -> Self {
        Self {
            visible: false,
            ..Self::new(title, "")
        }
    }

    /// The tab title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The CSS classes of the tab icon.
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Whether the panel gets a tab.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Appends `html` verbatim.
    pub fn write(&self, html: &str) {
        self.content.write().push_str(html);
    }

    /// Appends formatted text verbatim.
    pub fn writef(&self, args: fmt::Arguments<'_>) {
        use core::fmt::Write;
        let _ = self.content.write().write_fmt(args);
    }

    /// The content as written, before markup expansion.
    pub fn raw_content(&self) -> String {
        self.content.read().clone()
    }

    /// Whether anything was written since creation or the last
    /// [`clear`](Self::clear).
    pub fn has_content(&self) -> bool {
        !self.content.read().is_empty()
    }

    /// The content with markup expanded. The buffer is left unchanged.
    ///
    /// # Errors
    ///
    /// Fails with [`ConsoleError::InvalidMarkupTag`] when the content uses an
    /// unknown markup tag.
    pub fn render(&self) -> Result<String, ConsoleError> {
        markup::expand(&self.content.read())
    }

    /// Discards the content.
    pub fn clear(&self) {
        self.content.write().clear();
    }
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("title", &self.title)
            .field("icon", &self.icon)
            .field("visible", &self.visible)
            .field("content_len", &self.content.read().len())
            .finish()
    }
}

/// Writes inspections of values into one panel of a [`Console`].
///
/// Obtained from [`Console::inspector`] or [`Console::inspector_for`]. All
/// methods return `&Self` so calls can be chained.
///
/// ```
/// use webconsole::{Console, Settings};
///
/// let console = Console::new(Settings::default());
/// console.inspector().inspect(&42).inspect(&vec!["a", "b"]);
/// let html = console.inspector().panel().render().unwrap();
/// assert!(html.contains("__console-table"));
/// ```
#[derive(Clone)]
pub struct Inspector<'c> {
    console: &'c Console,
    panel: Arc<Panel>,
}

impl<'c> Inspector<'c> {
    pub(crate) fn new(console: &'c Console, panel: Arc<Panel>) -> Self {
        Self { console, panel }
    }

    /// The panel written to.
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    /// A render context with the console's settings and identity table.
    pub fn context(&self) -> RenderContext<'c> {
        RenderContext::new(self.console.settings()).with_ids(self.console.ids())
    }

    /// Appends `html` verbatim.
    pub fn write(&self, html: &str) -> &Self {
        self.panel.write(html);
        self
    }

    /// Appends formatted text verbatim.
    pub fn writef(&self, args: fmt::Arguments<'_>) -> &Self {
        self.panel.writef(args);
        self
    }

    /// Writes an inspection of `value`.
    ///
    /// Scalars are shown with their type, composites as a table under a
    /// `Type:` header. Values with custom HTML are written as they are.
    pub fn inspect(&self, value: &dyn Inspect) -> &Self {
        self.inspect_in(value, self.context());
        self
    }

    /// Writes an inspection of each of `values`, in order.
    pub fn inspect_all(&self, values: &[&dyn Inspect]) -> &Self {
        let ctx = self.context();
        for value in values {
            self.inspect_in(*value, ctx);
        }
        self
    }

    /// Like [`inspect_all`](Self::inspect_all), with `filter` deciding which
    /// entries of composite values are shown.
    pub fn with_filter(&self, filter: &Filter<'_>, values: &[&dyn Inspect]) -> &Self {
        let ctx = self.context().with_filter(filter);
        for value in values {
            self.inspect_in(*value, ctx);
        }
        self
    }

    /// Like [`inspect_all`](Self::inspect_all), with `caption` as the title
    /// of the first table written.
    pub fn with_caption(&self, caption: &str, values: &[&dyn Inspect]) -> &Self {
        let mut ctx = self.context().with_caption(caption);
        for value in values {
            self.inspect_in(*value, ctx);
            ctx.caption = None;
        }
        self
    }

    fn inspect_in(&self, value: &dyn Inspect, ctx: RenderContext<'_>) {
        if let Some(html) = value.custom_html() {
            self.panel.write(&html);
            self.panel.write(" ");
            return;
        }

        let inspected = value.inspect();
        let mut out = String::new();
        match &inspected {
            Value::Composite(_) => {
                out.push_str("<#header>Type: <span class='__type'>");
                type_label(&mut out, &inspected, ctx.ids);
                out.push_str("</span></#header>");
                out.push_str(&render(&inspected, ctx));
            }
            Value::Raw(html) => out.push_str(html),
            scalar => {
                out.push_str("<#data><i>(");
                type_label(&mut out, scalar, None);
                out.push_str(")</i> ");
                out.push_str(&render(scalar, ctx));
                out.push_str("</#data>");
            }
        }
        out.push(' ');
        self.panel.write(&out);
    }

    /// Writes a table of `value` rendered with `ctx`, without a type header.
    ///
    /// Use [`context`](Self::context) as the starting point to lower the
    /// depth limit or hide columns for this table only.
    pub fn table(&self, value: &dyn Inspect, ctx: RenderContext<'_>) -> &Self {
        self.panel.write(&render(&value.inspect(), ctx));
        self
    }

    /// Writes a table of `value` with neither a type column nor column
    /// headers.
    pub fn simple_table(&self, value: &dyn Inspect, caption: Option<&str>) -> &Self {
        let mut ctx = self.context().simple();
        ctx.caption = caption;
        self.table(value, ctx)
    }

    /// Writes a log line with the given severity.
    ///
    /// `{key}` placeholders in `message` are replaced by the matching
    /// `context` values; the result is escaped.
    pub fn log(&self, level: Level, message: &str, context: &[(&str, Value<'_>)]) -> &Self {
        let message = interpolate(message, context);
        let item = format!(
            "<span class=__alert>{}</span> {}",
            level.name(),
            escape_html(&message)
        );
        let line = Tag::Log.wrap(None, &Tag::Item.wrap(None, &item));
        self.panel.write(&line);
        self
    }

    /// Writes the type label of `value`.
    pub fn type_name(&self, value: &dyn Inspect) -> &Self {
        let mut out = String::from("<span class='__type'>");
        type_label(&mut out, &value.inspect(), Some(self.console.ids()));
        out.push_str("</span>");
        self.panel.write(&out);
        self
    }

    /// Writes the identity number of `object`.
    pub fn object_id<T: ?Sized + 'static>(&self, object: &T) -> &Self {
        let id = self.console.ids().id_of(Identity::of(object));
        self.writef(format_args!("{id}"))
    }

    /// Writes a titled section; whatever `body` writes goes inside it.
    pub fn section(&self, title: &str, body: impl FnOnce(&Self)) -> &Self {
        let title = escape_html(title).replace('|', "&#124;");
        self.panel.write(&format!("<#section|{title}>"));
        body(self);
        self.panel.write("</#section>");
        self
    }

    /// Writes the source location this method was called from.
    #[track_caller]
    pub fn location(&self) -> &Self {
        let location = Location::caller();
        let file = shorten_path(location.file(), self.console.settings());
        self.panel.write(&format!(
            "<div class=\"__debug-location\">At {} (<b>{}</b>)</div>",
            escape_html(&file),
            location.line()
        ));
        self
    }

    /// Writes `message`, escaped, with whole-word `keywords` highlighted.
    pub fn highlight(&self, message: &str, keywords: &[&str], base_class: &str) -> &Self {
        self.panel
            .write(&highlight(&escape_html(message), keywords, base_class));
        self
    }
}

impl fmt::Debug for Inspector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inspector")
            .field("panel", &self.panel)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{vec, vec::Vec};

    use indexmap::IndexMap;

    use super::*;
    use crate::{
        Settings,
        formatter::{FilterResult, exclude_keys},
        value::{Composite, Entry, Key, ObjectBuilder},
    };

    fn console() -> Console {
        Console::new(Settings::default())
    }

    #[test]
    fn test_panel_send_sync() {
        static_assertions::assert_impl_all!(Panel: Send, Sync);
        static_assertions::assert_impl_all!(Inspector<'static>: Send, Sync);
    }

    #[test]
    fn test_render_is_not_destructive() {
        let panel = Panel::new("P", "");
        assert!(!panel.has_content());
        panel.write("<#i>x</#i>");
        assert!(panel.has_content());
        let first = panel.render().unwrap();
        assert_eq!(first, "<div class='__log-item'>x</div>");
        assert_eq!(panel.render().unwrap(), first);
        assert_eq!(panel.raw_content(), "<#i>x</#i>");
        panel.clear();
        assert!(!panel.has_content());
    }

    #[test]
    fn test_render_unknown_tag() {
        let panel = Panel::hidden("P");
        assert!(!panel.is_visible());
        panel.write("<#nope>x</#nope>");
        assert!(matches!(
            panel.render(),
            Err(ConsoleError::InvalidMarkupTag { .. })
        ));
    }

    #[test]
    fn test_inspect_null() {
        let console = console();
        let inspector = console.inspector();
        inspector.inspect(&Value::Null);
        let html = inspector.panel().render().unwrap();
        assert!(html.contains("null"));
        assert!(!html.contains("<table"));
        assert!(html.starts_with("<div class='__log-data'><i>(null)</i> null</div>"));
    }

    #[test]
    fn test_callable_type_is_escaped() {
        fn first(x: u8) -> Option<u8> {
            Some(x)
        }
        let console = console();
        let inspector = console.inspector();
        let f: fn(u8) -> Option<u8> = first;
        let callbacks = vec![f];
        inspector.inspect(&f).inspect(&callbacks);
        let html = inspector.panel().render().unwrap();
        assert_eq!(html.matches("fn(u8) -&gt; Option&lt;u8&gt;").count(), 2);
        assert!(!html.contains("->"));
        assert!(!html.contains("<u8>"));
    }

    #[test]
    fn test_inspect_map() {
        let console = console();
        let inspector = console.inspector();
        let map: IndexMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        inspector.inspect(&map);
        let html = inspector.panel().render().unwrap();
        assert!(html.starts_with("<div class='__header'>Type: "));
        assert!(html.contains("<th>Key</th>"));
        assert_eq!(html.matches("<td class=\"v\">").count(), 2);
        assert!(html.contains("<td class=\"v\">1</td>"));
        assert!(html.contains("<td class=\"v\">2</td>"));
    }

    #[test]
    fn test_with_filter_hides_entry() {
        let console = console();
        let inspector = console.inspector();
        let map: IndexMap<&str, &str> = [("secret", "x"), ("ok", "y")].into_iter().collect();
        let filter = |key: &Key<'_>, _: &Entry<'_>, _: &Composite<'_>| {
            FilterResult::from(key.as_name() != Some("secret"))
        };
        inspector.with_filter(&filter, &[&map]);
        let html = inspector.panel().render().unwrap();
        assert_eq!(html.matches("<td class=\"v\">").count(), 1);
        assert!(html.contains(">ok</th>"));
        assert!(!html.contains("secret"));
    }

    #[test]
    fn test_with_caption_applies_once() {
        let console = console();
        let inspector = console.inspector();
        inspector.with_caption("Users", &[&vec![1], &vec![2]]);
        let html = inspector.panel().render().unwrap();
        assert_eq!(html.matches("<caption>Users</caption>").count(), 1);
    }

    #[test]
    fn test_simple_table_and_exclude_keys() {
        let console = console();
        let inspector = console.inspector();
        let map: IndexMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        let exclude = exclude_keys(&["b"]);
        inspector.simple_table(&map, None);
        inspector.table(&map, inspector.context().with_filter(&exclude));
        let html = inspector.panel().raw_content();
        let tables: Vec<&str> = html.split("</table>").collect();
        assert!(!tables[0].contains("<thead>"));
        assert!(tables[1].contains("<thead>"));
        assert!(!tables[1].contains(">b</th>"));
    }

    #[test]
    fn test_log_line() {
        let console = console();
        let inspector = console.inspector();
        inspector.log(Level::Warning, "user {name} <failed>", &[("name", "bob".into())]);
        assert_eq!(
            inspector.panel().render().unwrap(),
            "<div class='__log-stripe'><div class='__log-item'><span class=__alert>WARNING</span> \
             user bob &lt;failed&gt;</div></div>"
        );
    }

    #[test]
    fn test_object_ids_are_stable() {
        struct Thing(#[allow(dead_code)] u8);
        impl Inspect for Thing {
            fn inspect(&self) -> Value<'_> {
                ObjectBuilder::new(self).field_value("n", 1).finish()
            }
        }

        let console = console();
        let inspector = console.inspector();
        let (a, b) = (Thing(1), Thing(2));
        inspector.object_id(&a).write(",").object_id(&b).write(",").object_id(&a);
        assert_eq!(inspector.panel().raw_content(), "1,2,1");
    }

    #[test]
    fn test_section_and_location() {
        let console = console();
        let inspector = console.inspector();
        inspector.section("A|B", |inner| {
            inner.location();
        });
        let html = inspector.panel().render().unwrap();
        assert!(html.starts_with("<div class='__log-section'><div class='__log-title'>A&#124;B</div>"));
        assert!(html.contains("<div class=\"__debug-location\">At "));
        assert!(html.contains("panel.rs"));
    }

    #[test]
    fn test_custom_html_passthrough() {
        struct Badge;
        impl Inspect for Badge {
            fn inspect(&self) -> Value<'_> {
                Value::Null
            }

            fn custom_html(&self) -> Option<String> {
                Some("<b>badge</b>".into())
            }
        }

        let console = console();
        let inspector = console.inspector();
        inspector.inspect_all(&[&Badge, &vec![true]]);
        let raw = inspector.panel().raw_content();
        assert!(raw.starts_with("<b>badge</b> "));
        assert!(raw.contains("__console-table"));
    }

    #[test]
    fn test_type_name_and_highlight() {
        let console = console();
        let inspector = console.inspector();
        inspector.type_name(&vec![1, 2]).highlight("a < b", &["a"], "expr");
        assert_eq!(
            inspector.panel().raw_content(),
            "<span class='__type'>list(2)</span>\
             <span class=expr><span class=keyword>a</span> &lt; b</span>"
        );
    }
}

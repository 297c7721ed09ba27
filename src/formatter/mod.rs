//! The inspection formatter: renders one [`Value`] as an HTML fragment.
//!
//! Scalars become short tokens. Composites become a key/type/value table,
//! recursively, bounded by the limits carried in a [`RenderContext`]:
//!
//! - at `max_depth` nested tables, a composite renders as `(...)` without its
//!   entries being looked at;
//! - from `collapse_depth` on, tables are wrapped in a click-to-expand box;
//! - lists stop after `max_list_items` rows, followed by a single `(...)` row;
//! - a [filter](RenderContext::filter) decides per entry whether to show it,
//!   hide it, or show its key with an `omitted` marker.
//!
//! The context is passed by value. Each nested table gets its own copy with
//! the depth incremented, so no render can affect another.
//!
//! ```
//! use webconsole::{formatter::{render, RenderContext}, Settings, value::Inspect};
//!
//! let settings = Settings::default();
//! let html = render(&vec![1, 2].inspect(), RenderContext::new(&settings));
//! assert!(html.contains("<th>Index</th>"));
//! assert_eq!(html.matches("<td class=\"v\">").count(), 2);
//! ```

pub(crate) mod type_name;

use alloc::string::String;
use core::fmt::Write;

pub use self::type_name::type_label;
use crate::{
    Settings,
    util::push_escaped,
    value::{Composite, Entry, Key, Kind, ObjectIds, Value},
};

/// The outcome of a filter for one composite entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum FilterResult {
    /// Render the entry normally.
    #[default]
    Show,
    /// Leave the entry out entirely.
    Hide,
    /// Render the key, with an `omitted` marker in place of the value.
    Omit,
}

impl From<bool> for FilterResult {
    fn from(show: bool) -> Self {
        if show { Self::Show } else { Self::Hide }
    }
}

/// A per-entry filter: receives the key, the entry and the containing
/// composite.
pub type Filter<'f> = dyn Fn(&Key<'_>, &Entry<'_>, &Composite<'_>) -> FilterResult + 'f;

/// Returns a filter hiding the entries whose name is one of `keys`.
///
/// ```
/// use webconsole::formatter::{exclude_keys, FilterResult};
/// use webconsole::value::{Composite, Entry, Key, Value};
///
/// let filter = exclude_keys(&["password"]);
/// let parent = Composite::new();
/// let entry = Entry::Value(Value::Null);
/// assert_eq!(filter(&Key::from("password"), &entry, &parent), FilterResult::Hide);
/// assert_eq!(filter(&Key::from("user"), &entry, &parent), FilterResult::Show);
/// ```
pub fn exclude_keys<'k>(
    keys: &'k [&'k str],
) -> impl Fn(&Key<'_>, &Entry<'_>, &Composite<'_>) -> FilterResult + 'k {
    move |key, _, _| FilterResult::from(!key.as_name().is_some_and(|name| keys.contains(&name)))
}

/// Column widths of rendered tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TableLayout {
    /// Width of the key column for maps and objects.
    pub property_width: u32,
    /// Width of the key column for lists.
    pub index_width: u32,
    /// Width of the type column.
    pub type_width: u32,
    /// Whether to emit a `<colgroup>` at all.
    pub use_column_widths: bool,
}

/// The state of one top-level render, threaded through nested tables.
#[derive(Copy, Clone)]
pub struct RenderContext<'a> {
    /// Current nesting depth; `0` at the top level.
    pub depth: usize,
    /// Depth at which composites render as `(...)`.
    pub max_depth: usize,
    /// Depth from which tables are collapsible.
    pub collapse_depth: usize,
    /// Maximum number of list rows.
    pub max_list_items: usize,
    /// Optional per-entry filter; absent means show everything.
    pub filter: Option<&'a Filter<'a>>,
    /// Title of the next table rendered. Not passed on to nested tables.
    pub caption: Option<&'a str>,
    /// Whether tables have a type column.
    pub type_column: bool,
    /// Whether tables have a header row.
    pub column_headers: bool,
    /// Column widths.
    pub layout: TableLayout,
    /// Token used for null.
    pub null_marker: &'static str,
    /// Identity table used to number objects in the type column.
    pub ids: Option<&'a ObjectIds>,
}

impl<'a> RenderContext<'a> {
    /// A context at depth 0 with the limits from `settings`, no filter and
    /// no caption.
    pub fn new(settings: &Settings) -> Self {
        Self {
            depth: 0,
            max_depth: settings.table_max_depth,
            collapse_depth: settings.table_collapse_depth,
            max_list_items: settings.max_list_items,
            filter: None,
            caption: None,
            type_column: true,
            column_headers: true,
            layout: TableLayout {
                property_width: settings.table_property_column_width,
                index_width: settings.table_index_column_width,
                type_width: settings.table_type_column_width,
                use_column_widths: settings.table_use_column_widths,
            },
            null_marker: settings.null_marker(),
            ids: None,
        }
    }

    /// Sets the filter.
    pub fn with_filter(mut self, filter: &'a Filter<'a>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the one-shot caption.
    pub fn with_caption(mut self, caption: &'a str) -> Self {
        self.caption = Some(caption);
        self
    }

    /// Sets the identity table.
    pub fn with_ids(mut self, ids: &'a ObjectIds) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Lowers the depth limit for this render only. Limits can only shrink.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = self.max_depth.min(max_depth);
        self
    }

    /// Switches to a "simple table": no type column and no header row.
    pub fn simple(mut self) -> Self {
        self.type_column = false;
        self.column_headers = false;
        self
    }

    fn filter(&self, key: &Key<'_>, entry: &Entry<'_>, parent: &Composite<'_>) -> FilterResult {
        match self.filter {
            Some(filter) => filter(key, entry, parent),
            None => FilterResult::Show,
        }
    }

    fn child(self) -> Self {
        Self {
            depth: self.depth + 1,
            caption: None,
            ..self
        }
    }
}

impl core::fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RenderContext")
            .field("depth", &self.depth)
            .field("max_depth", &self.max_depth)
            .field("collapse_depth", &self.collapse_depth)
            .field("max_list_items", &self.max_list_items)
            .field("filter", &self.filter.is_some())
            .field("caption", &self.caption)
            .finish_non_exhaustive()
    }
}

const PLACEHOLDER: &str = "<i>(...)</i>";

/// Renders `value` as an HTML fragment.
///
/// Never fails: values that cannot be shown degrade to placeholders.
pub fn render(value: &Value<'_>, ctx: RenderContext<'_>) -> String {
    let mut out = String::new();
    render_into(&mut out, value, ctx);
    out
}

fn render_into(out: &mut String, value: &Value<'_>, ctx: RenderContext<'_>) {
    match value {
        Value::Null => out.push_str(ctx.null_marker),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Str(s) if s.is_empty() => out.push_str("<i>''</i>"),
        Value::Str(s) => {
            out.push_str("&ldquo;");
            push_escaped(out, s);
            out.push_str("&rdquo;");
        }
        Value::Callable(_) => out.push_str("<i>(callable)</i>"),
        Value::Raw(html) => out.push_str(html),
        Value::Composite(composite) => write_table(out, composite, ctx),
    }
}

/// Renders the table of `composite`, or its empty or depth placeholder.
pub fn render_table(composite: &Composite<'_>, ctx: RenderContext<'_>) -> String {
    let mut out = String::new();
    write_table(&mut out, composite, ctx);
    out
}

fn write_table(out: &mut String, composite: &Composite<'_>, ctx: RenderContext<'_>) {
    if composite.is_empty() {
        out.push_str(match composite.object_info() {
            Some(info) if info.projected => "<i>(empty)</i>",
            Some(_) => "<i>(not inspectable)</i>",
            None => "<i>[]</i>",
        });
        return;
    }
    if ctx.depth >= ctx.max_depth {
        out.push_str(PLACEHOLDER);
        return;
    }

    let child = ctx.child();
    let is_list = composite.kind() == Kind::List;
    let (label, key_width, key_class) = if is_list {
        ("Index", ctx.layout.index_width, "n")
    } else if composite.object_info().is_some() {
        ("Property", ctx.layout.property_width, "k")
    } else {
        ("Key", ctx.layout.property_width, "k")
    };
    let collapsed = child.depth >= ctx.collapse_depth;

    if collapsed {
        out.push_str(
            "<div class=\"__expand\"><a class=\"fa fa-plus-square\" href=\"javascript:void(0)\" \
             onclick=\"this.parentNode.className+=' show'\"></a>",
        );
    }

    out.push_str("<table class=\"__console-table");
    if ctx.caption.is_some() {
        out.push_str(" with-caption");
    }
    out.push_str("\">");
    if let Some(caption) = ctx.caption {
        out.push_str("<caption>");
        push_escaped(out, caption);
        out.push_str("</caption>");
    }
    if ctx.layout.use_column_widths {
        let _ = write!(out, "<colgroup><col width=\"{key_width}\">");
        if ctx.type_column {
            let _ = write!(out, "<col width=\"{}\">", ctx.layout.type_width);
        }
        out.push_str("<col width=\"100%\"></colgroup>");
    }
    if ctx.column_headers {
        let _ = write!(out, "<thead><tr><th>{label}</th>");
        if ctx.type_column {
            out.push_str("<th>Type</th>");
        }
        out.push_str("<th>Value</th></tr></thead>");
    }

    out.push_str("<tbody>");
    let mut rows = 0;
    for (key, entry) in composite.iter() {
        if is_list && rows == ctx.max_list_items {
            let columns = if ctx.type_column { 3 } else { 2 };
            let _ = write!(out, "<tr><td colspan=\"{columns}\">{PLACEHOLDER}</td></tr>");
            break;
        }
        let decision = ctx.filter(key, entry, composite);
        if decision == FilterResult::Hide {
            continue;
        }
        rows += 1;

        let _ = write!(out, "<tr><th class=\"{key_class}\">");
        match key {
            Key::Name(name) if name.is_empty() => out.push_str("<i>''</i>"),
            key => push_escaped(out, &alloc::format!("{key}")),
        }
        out.push_str("</th>");

        match decision {
            FilterResult::Omit => {
                if ctx.type_column {
                    out.push_str("<td>");
                    push_escaped(out, &crate::util::short_type_name(entry.type_name()));
                    out.push_str("</td>");
                }
                out.push_str("<td class=\"v\"><i>omitted</i></td>");
            }
            _ => {
                let value = entry.resolve();
                if ctx.type_column {
                    out.push_str("<td>");
                    type_label(out, &value, ctx.ids);
                    out.push_str("</td>");
                }
                out.push_str("<td class=\"v\">");
                render_into(out, &value, child);
                out.push_str("</td>");
            }
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");

    if collapsed {
        out.push_str("</div>");
    }
}

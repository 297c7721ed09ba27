//! The console markup language.
//!
//! Panel content is written as HTML interleaved with a small set of
//! structural tags of the form `<#name>` or `<#name|arg1|arg2>`, closed by
//! `</#name>`. [`expand`] turns them into the HTML the console stylesheet
//! expects:
//!
//! ```
//! use webconsole::markup::expand;
//!
//! let html = expand("<#section|Request><#i>GET /</#i></#section>").unwrap();
//! assert_eq!(
//!     html,
//!     "<div class='__log-section'><div class='__log-title'>Request</div>\
//!      <div class='__log-item'>GET /</div></div>"
//! );
//! ```
//!
//! Expanding already expanded HTML returns it unchanged, and tags that are
//! not balanced are left in the output as text.

mod parser;

use alloc::string::String;
use core::fmt::{self, Write};

use self::parser::Node;
use crate::{ConsoleError, formatter::type_name::push_type_span, util::decode_entities};

/// The structural tags understood by [`expand`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Tag {
    /// A log item. The optional argument is an extra CSS class.
    Item,
    /// A numbered log item. Numbering restarts in every section and log.
    Row,
    /// A titled section. The argument is the title.
    Section,
    /// A log stripe grouping consecutive items.
    Log,
    /// A data block.
    Data,
    /// A panel-level header.
    Header,
    /// A panel-level footer.
    Footer,
    /// An alert block.
    Alert,
    /// A type name, shortened with the full name as a tooltip. The content
    /// may be plain or HTML-escaped; it is escaped exactly once.
    Type,
    /// An indented block.
    Indent,
    /// Literal content, emitted without parsing.
    Text,
}

impl Tag {
    /// Every tag, in declaration order.
    pub const ALL: [Tag; 11] = [
        Tag::Item,
        Tag::Row,
        Tag::Section,
        Tag::Log,
        Tag::Data,
        Tag::Header,
        Tag::Footer,
        Tag::Alert,
        Tag::Type,
        Tag::Indent,
        Tag::Text,
    ];

    /// The name written between `<#` and `>`.
    pub const fn name(self) -> &'static str {
        match self {
            Tag::Item => "i",
            Tag::Row => "row",
            Tag::Section => "section",
            Tag::Log => "log",
            Tag::Data => "data",
            Tag::Header => "header",
            Tag::Footer => "footer",
            Tag::Alert => "alert",
            Tag::Type => "type",
            Tag::Indent => "indent",
            Tag::Text => "t",
        }
    }

    /// Looks a tag up by its name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.name() == name)
    }

    /// Wraps `content` in this tag.
    ///
    /// The argument is written as is, so it must not contain `|` or `>`
    /// unless those are meant as separators.
    pub fn wrap(self, arg: Option<&str>, content: &str) -> String {
        let mut out = String::with_capacity(content.len() + 24);
        out.push_str("<#");
        out.push_str(self.name());
        if let Some(arg) = arg {
            out.push('|');
            out.push_str(arg);
        }
        out.push('>');
        out.push_str(content);
        out.push_str("</#");
        out.push_str(self.name());
        out.push('>');
        out
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Expands console markup into HTML.
///
/// # Errors
///
/// Returns [`ConsoleError::InvalidMarkupTag`] when a balanced pair of tags
/// uses a name that is not a [`Tag`].
pub fn expand(markup: &str) -> Result<String, ConsoleError> {
    if !markup.contains("<#") {
        return Ok(markup.into());
    }
    let nodes = parser::parse(markup)?;
    let mut expander = Expander { row: 0 };
    let mut out = String::with_capacity(markup.len() * 2);
    expander.nodes(&mut out, &nodes);
    Ok(out)
}

struct Expander {
    row: usize,
}

impl Expander {
    fn nodes(&mut self, out: &mut String, nodes: &[Node<'_>]) {
        for node in nodes {
            match node {
                Node::Text(text) | Node::Raw(text) => out.push_str(text),
                Node::Element {
                    tag,
                    args,
                    children,
                } => self.element(out, *tag, args.first().copied(), children),
            }
        }
    }

    /// Expands `children` with row numbering restarted.
    fn scoped(&mut self, out: &mut String, children: &[Node<'_>]) {
        let saved = core::mem::replace(&mut self.row, 0);
        self.nodes(out, children);
        self.row = saved;
    }

    fn element(&mut self, out: &mut String, tag: Tag, arg: Option<&str>, children: &[Node<'_>]) {
        match tag {
            Tag::Item | Tag::Row => {
                out.push_str("<div class='__log-item");
                if tag == Tag::Row {
                    out.push_str(" __rowHeader");
                }
                if let Some(class) = arg {
                    out.push(' ');
                    out.push_str(class);
                }
                out.push_str("'>");
                if tag == Tag::Row {
                    self.row += 1;
                    out.push_str("<span class='__row-number'>");
                    let _ = write!(out, "{}", self.row);
                    out.push_str("</span>");
                }
                self.nodes(out, children);
                out.push_str("</div>");
            }
            Tag::Section => {
                out.push_str("<div class='__log-section'>");
                if let Some(title) = arg {
                    out.push_str("<div class='__log-title'>");
                    out.push_str(title);
                    out.push_str("</div>");
                }
                self.scoped(out, children);
                out.push_str("</div>");
            }
            Tag::Log => {
                out.push_str("<div class='__log-stripe'>");
                self.scoped(out, children);
                out.push_str("</div>");
            }
            Tag::Type => {
                let mut name = String::new();
                self.nodes(&mut name, children);
                out.push_str("<span class='__type'>");
                push_type_span(out, &decode_entities(name.trim()));
                out.push_str("</span>");
            }
            Tag::Text => self.nodes(out, children),
            Tag::Data | Tag::Header | Tag::Footer | Tag::Alert | Tag::Indent => {
                let class = match tag {
                    Tag::Data => "__log-data",
                    Tag::Header => "__header",
                    Tag::Footer => "__footer",
                    Tag::Alert => "__alert",
                    _ => "indent",
                };
                out.push_str("<div class='");
                out.push_str(class);
                out.push_str("'>");
                self.nodes(out, children);
                out.push_str("</div>");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names() {
        for tag in Tag::ALL {
            assert_eq!(Tag::from_name(tag.name()), Some(tag));
        }
        assert_eq!(Tag::from_name("bogus"), None);
        assert_eq!(Tag::Section.wrap(Some("A"), "x"), "<#section|A>x</#section>");
        assert_eq!(Tag::Item.wrap(None, ""), "<#i></#i>");
    }

    #[test]
    fn test_nested_sections() {
        let html = expand("<#section|A><#section|B>x</#section></#section>").unwrap();
        assert_eq!(
            html,
            "<div class='__log-section'><div class='__log-title'>A</div>\
             <div class='__log-section'><div class='__log-title'>B</div>x</div></div>"
        );
    }

    #[test]
    fn test_item_class() {
        assert_eq!(
            expand("<#i|warning>careful</#i>").unwrap(),
            "<div class='__log-item warning'>careful</div>"
        );
    }

    #[test]
    fn test_row_numbering() {
        let html = expand(
            "<#row>a</#row><#row>b</#row><#section|S><#row>c</#row></#section><#row>d</#row>",
        )
        .unwrap();
        let numbers: alloc::vec::Vec<&str> = html
            .split("<span class='__row-number'>")
            .skip(1)
            .map(|rest| &rest[..rest.find('<').unwrap()])
            .collect();
        assert_eq!(numbers, ["1", "2", "1", "3"]);
    }

    #[test]
    fn test_block_tags() {
        assert_eq!(
            expand("<#log><#data>1</#data></#log>").unwrap(),
            "<div class='__log-stripe'><div class='__log-data'>1</div></div>"
        );
        assert_eq!(
            expand("<#header>h</#header><#footer>f</#footer><#alert>!</#alert><#indent>.</#indent>")
                .unwrap(),
            "<div class='__header'>h</div><div class='__footer'>f</div>\
             <div class='__alert'>!</div><div class='indent'>.</div>"
        );
    }

    #[test]
    fn test_type_tag() {
        assert_eq!(
            expand("<#type>alloc::string::String</#type>").unwrap(),
            "<span class='__type'><span title='alloc::string::String'>String</span></span>"
        );
    }

    #[test]
    fn test_type_tag_escaped_once() {
        let expected = "<span class='__type'><span title='alloc::vec::Vec&lt;u8&gt;'>Vec&lt;u8&gt;</span></span>";
        assert_eq!(expand("<#type>alloc::vec::Vec&lt;u8&gt;</#type>").unwrap(), expected);
        assert_eq!(expand("<#type>alloc::vec::Vec<u8></#type>").unwrap(), expected);
    }

    #[test]
    fn test_text_passthrough() {
        assert_eq!(
            expand("<#t><#i>not a tag</#i></#t>").unwrap(),
            "<#i>not a tag</#i>"
        );
    }

    #[test]
    fn test_idempotent() {
        let once = expand("<#log><#row|x>a &amp; b</#row></#log>").unwrap();
        assert_eq!(expand(&once).unwrap(), once);
        assert_eq!(expand("plain <b>html</b>").unwrap(), "plain <b>html</b>");
    }

    #[test]
    fn test_unbalanced_tags_are_kept() {
        assert_eq!(expand("a <#i>b").unwrap(), "a <#i>b");
        assert_eq!(expand("a </#i> b").unwrap(), "a </#i> b");
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(
            expand("<#bogus>x</#bogus>"),
            Err(ConsoleError::InvalidMarkupTag {
                tag: "bogus".into()
            })
        );
    }
}

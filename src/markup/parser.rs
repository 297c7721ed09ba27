//! Tokenizer and tree builder for console markup.
//!
//! Tags pair with the nearest open tag of the same name, so a tag can nest
//! inside another of the same name. An opening tag that is never closed, or
//! that is cut off by the closing tag of an enclosing element, is kept as
//! literal text, and so is a closing tag with no opening tag. The whole
//! process is a single pass over the input.

use alloc::vec::Vec;

use super::Tag;
use crate::ConsoleError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TokenKind<'s> {
    Text,
    Open { name: &'s str, args: Option<&'s str> },
    Close { name: &'s str },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Token<'s> {
    kind: TokenKind<'s>,
    start: usize,
    end: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Node<'s> {
    Text(&'s str),
    Raw(&'s str),
    Element {
        tag: Tag,
        args: Vec<&'s str>,
        children: Vec<Node<'s>>,
    },
}

fn tag_name_len(s: &str) -> usize {
    s.bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count()
}

/// Recognizes a tag at the start of `s`, returning its kind and length.
fn scan_tag(s: &str) -> Option<(TokenKind<'_>, usize)> {
    if let Some(rest) = s.strip_prefix("</#") {
        let name_len = tag_name_len(rest);
        if name_len > 0 && rest[name_len..].starts_with('>') {
            let kind = TokenKind::Close {
                name: &rest[..name_len],
            };
            return Some((kind, 3 + name_len + 1));
        }
        return None;
    }

    let rest = s.strip_prefix("<#")?;
    let name_len = tag_name_len(rest);
    if name_len == 0 {
        return None;
    }
    let name = &rest[..name_len];
    let after_name = &rest[name_len..];
    let after_space = after_name.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let mut consumed = 2 + name_len + (after_name.len() - after_space.len());

    let args = if let Some(args_and_rest) = after_space.strip_prefix('|') {
        let args_len = args_and_rest.find('>')?;
        if args_len == 0 {
            return None;
        }
        consumed += 1 + args_len;
        Some(&args_and_rest[..args_len])
    } else {
        None
    };

    s[consumed..]
        .starts_with('>')
        .then_some((TokenKind::Open { name, args }, consumed + 1))
}

fn tokenize(src: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;
    while let Some(offset) = src[pos..].find('<') {
        let at = pos + offset;
        match scan_tag(&src[at..]) {
            Some((kind, len)) => {
                if text_start < at {
                    tokens.push(Token {
                        kind: TokenKind::Text,
                        start: text_start,
                        end: at,
                    });
                }
                tokens.push(Token {
                    kind,
                    start: at,
                    end: at + len,
                });
                pos = at + len;
                text_start = pos;
            }
            None => pos = at + 1,
        }
    }
    if text_start < src.len() {
        tokens.push(Token {
            kind: TokenKind::Text,
            start: text_start,
            end: src.len(),
        });
    }
    tokens
}

struct Frame<'s> {
    name: &'s str,
    args: Option<&'s str>,
    source: &'s str,
    children: Vec<Node<'s>>,
}

struct TreeBuilder<'s> {
    root: Vec<Node<'s>>,
    stack: Vec<Frame<'s>>,
}

impl<'s> TreeBuilder<'s> {
    fn current(&mut self) -> &mut Vec<Node<'s>> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root,
        }
    }

    /// Turns an unclosed element back into text.
    fn demote(&mut self, frame: Frame<'s>) {
        let current = self.current();
        current.push(Node::Text(frame.source));
        current.extend(frame.children);
    }

    fn close(&mut self, name: &'s str, source: &'s str) -> Result<(), ConsoleError> {
        let Some(position) = self.stack.iter().rposition(|frame| frame.name == name) else {
            self.current().push(Node::Text(source));
            return Ok(());
        };
        while self.stack.len() > position + 1 {
            if let Some(frame) = self.stack.pop() {
                self.demote(frame);
            }
        }
        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };
        let tag = Tag::from_name(name).ok_or_else(|| ConsoleError::InvalidMarkupTag {
            tag: name.into(),
        })?;
        let args = frame
            .args
            .map(|args| args.split('|').collect())
            .unwrap_or_default();
        self.current().push(Node::Element {
            tag,
            args,
            children: frame.children,
        });
        Ok(())
    }
}

/// Finds the token closing the raw `t` element opened at `open`.
fn find_raw_close(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open + 1) {
        match token.kind {
            TokenKind::Open { name: "t", .. } => depth += 1,
            TokenKind::Close { name: "t" } if depth == 0 => return Some(index),
            TokenKind::Close { name: "t" } => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Parses markup into a tree.
///
/// Fails with [`ConsoleError::InvalidMarkupTag`] when a complete element
/// uses a name outside the tag vocabulary.
pub(crate) fn parse(src: &str) -> Result<Vec<Node<'_>>, ConsoleError> {
    let tokens = tokenize(src);
    let mut builder = TreeBuilder {
        root: Vec::new(),
        stack: Vec::new(),
    };

    let mut index = 0;
    while let Some(token) = tokens.get(index) {
        let source = &src[token.start..token.end];
        match token.kind {
            TokenKind::Text => builder.current().push(Node::Text(source)),
            TokenKind::Open { name: "t", .. } => match find_raw_close(&tokens, index) {
                Some(close) => {
                    let raw = &src[token.end..tokens[close].start];
                    builder.current().push(Node::Raw(raw));
                    index = close;
                }
                None => builder.current().push(Node::Text(source)),
            },
            TokenKind::Open { name, args } => builder.stack.push(Frame {
                name,
                args,
                source,
                children: Vec::new(),
            }),
            TokenKind::Close { name } => builder.close(name, source)?,
        }
        index += 1;
    }

    while let Some(frame) = builder.stack.pop() {
        builder.demote(frame);
    }
    Ok(builder.root)
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn test_scan_tag() {
        assert_eq!(
            scan_tag("<#i>x"),
            Some((TokenKind::Open { name: "i", args: None }, 4))
        );
        assert_eq!(
            scan_tag("<#section |A|b>x"),
            Some((
                TokenKind::Open {
                    name: "section",
                    args: Some("A|b")
                },
                15
            ))
        );
        assert_eq!(scan_tag("</#log>"), Some((TokenKind::Close { name: "log" }, 7)));
        assert_eq!(scan_tag("<#>"), None);
        assert_eq!(scan_tag("<#i|>"), None);
        assert_eq!(scan_tag("<#i"), None);
        assert_eq!(scan_tag("<div>"), None);
        assert_eq!(scan_tag("</#i"), None);
    }

    #[test]
    fn test_same_tag_nesting() {
        let nodes = parse("<#section|A><#section|B>x</#section></#section>").expect("valid markup");
        assert_eq!(
            nodes,
            vec![Node::Element {
                tag: Tag::Section,
                args: vec!["A"],
                children: vec![Node::Element {
                    tag: Tag::Section,
                    args: vec!["B"],
                    children: vec![Node::Text("x")],
                }],
            }]
        );
    }

    #[test]
    fn test_unmatched_tags_are_text() {
        let nodes = parse("a </#i> <#i>b").expect("valid markup");
        assert_eq!(
            nodes,
            vec![
                Node::Text("a "),
                Node::Text("</#i>"),
                Node::Text(" "),
                Node::Text("<#i>"),
                Node::Text("b"),
            ]
        );
    }

    #[test]
    fn test_cut_off_tag_is_demoted() {
        let nodes = parse("<#log><#i>x</#log>").expect("valid markup");
        assert_eq!(
            nodes,
            vec![Node::Element {
                tag: Tag::Log,
                args: vec![],
                children: vec![Node::Text("<#i>"), Node::Text("x")],
            }]
        );
    }

    #[test]
    fn test_raw_content_is_not_parsed() {
        let nodes = parse("<#t><#i>x</#i><#t>y</#t></#t>z").expect("valid markup");
        assert_eq!(
            nodes,
            vec![Node::Raw("<#i>x</#i><#t>y</#t>"), Node::Text("z")]
        );
    }

    #[test]
    fn test_unknown_tag_fails() {
        let err = parse("<#bogus>x</#bogus>").expect_err("unknown tag");
        assert_eq!(
            err,
            ConsoleError::InvalidMarkupTag {
                tag: "bogus".into()
            }
        );
        // An unknown tag that never closes is only text.
        assert!(parse("<#bogus>x").is_ok());
    }
}

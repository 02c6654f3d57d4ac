//! Minimal owned XML element tree with depth-first lookups.
//!
//! PubMed nests some fields at varying depths (an author's affiliation sits
//! under `AffiliationInfo` in current records but directly under `Author` in
//! older ones), so lookups search the whole subtree instead of following a
//! fixed path.

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// Deepest element nesting accepted by [`parse_document`]
pub const MAX_DEPTH: usize = 256;

/// Errors raised while building the element tree
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    #[error("document has no root element")]
    Empty,

    #[error("unclosed element <{0}>")]
    Unclosed(String),

    #[error("elements nested deeper than {0} levels")]
    TooDeep(usize),
}

/// A node inside an element: either a child element or a run of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An XML element with its children in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    nodes: Vec<XmlNode>,
}

impl XmlElement {
    fn new(name: String) -> Self {
        Self {
            name,
            nodes: Vec::new(),
        }
    }

    /// Tag name, including any namespace prefix
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct child elements
    pub fn children(&self) -> impl Iterator<Item = &XmlElement> {
        self.nodes.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// First direct child with the given tag name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children().find(|el| el.name == name)
    }

    /// First descendant with the given tag name, in depth-first pre-order.
    /// The element itself is not considered.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        for child in self.children() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find(name) {
                return Some(found);
            }
        }
        None
    }

    /// Every descendant with the given tag name, in depth-first pre-order
    pub fn find_all<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut out = Vec::new();
        self.collect(name, &mut out);
        out
    }

    fn collect<'a>(&'a self, name: &str, out: &mut Vec<&'a XmlElement>) {
        for child in self.children() {
            if child.name == name {
                out.push(child);
            }
            child.collect(name, out);
        }
    }

    /// All text under this element concatenated, trimmed at both ends
    pub fn text(&self) -> String {
        let mut buf = String::new();
        self.append_text(&mut buf);
        buf.trim().to_string()
    }

    fn append_text(&self, buf: &mut String) {
        for node in &self.nodes {
            match node {
                XmlNode::Text(t) => buf.push_str(t),
                XmlNode::Element(el) => el.append_text(buf),
            }
        }
    }

    /// Text of the first descendant with the given tag name
    pub fn find_text(&self, name: &str) -> Option<String> {
        self.find(name).map(XmlElement::text)
    }

    /// Text of the first direct child with the given tag name
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(XmlElement::text)
    }
}

/// Parse a document into its root element.
///
/// Declarations, comments, processing instructions and DOCTYPE are skipped.
/// Nesting beyond [`MAX_DEPTH`] is rejected; lookups on the tree recurse.
pub fn parse_document(xml: &str) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let malformed = |message: String| XmlError::Malformed { position, message };

        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(XmlError::TooDeep(MAX_DEPTH));
                }
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                stack.push(XmlElement::new(name));
            }
            Ok(Event::Empty(e)) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(XmlError::TooDeep(MAX_DEPTH));
                }
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                attach(&mut stack, &mut root, XmlElement::new(name))
                    .map_err(|m| malformed(m.to_string()))?;
            }
            Ok(Event::End(_)) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| malformed("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, el).map_err(|m| malformed(m.to_string()))?;
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(|e| malformed(e.to_string()))?;
                push_text(&mut stack, &text).map_err(|m| malformed(m.to_string()))?;
            }
            Ok(Event::CData(c)) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                push_text(&mut stack, &text).map_err(|m| malformed(m.to_string()))?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(e.to_string())),
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }

    root.ok_or(XmlError::Empty)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    el: XmlElement,
) -> Result<(), &'static str> {
    match stack.last_mut() {
        Some(parent) => {
            parent.nodes.push(XmlNode::Element(el));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(el);
            Ok(())
        }
        None => Err("multiple root elements"),
    }
}

fn push_text(stack: &mut [XmlElement], text: &str) -> Result<(), &'static str> {
    match stack.last_mut() {
        Some(parent) => {
            if !text.is_empty() {
                parent.nodes.push(XmlNode::Text(text.to_string()));
            }
            Ok(())
        }
        // Whitespace between the prolog and the root is fine
        None if text.trim().is_empty() => Ok(()),
        None => Err("text outside the root element"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0"?>
<!DOCTYPE Root PUBLIC "-//X//DTD X//EN" "x.dtd">
<Root>
  <!-- comment -->
  <A><B>first</B></A>
  <B>second</B>
  <C>Effects of <i>E. coli</i> &amp; friends</C>
  <D/>
</Root>"#;

    #[test]
    fn test_parse_and_find() {
        let root = parse_document(DOC).unwrap();
        assert_eq!(root.name(), "Root");
        assert_eq!(root.children().count(), 4);

        // Pre-order: the nested B under A comes before the sibling B
        assert_eq!(root.find_text("B").as_deref(), Some("first"));
        assert_eq!(root.child_text("B").as_deref(), Some("second"));
        assert_eq!(root.find_all("B").len(), 2);
    }

    #[test]
    fn test_text_includes_inline_markup() {
        let root = parse_document(DOC).unwrap();
        assert_eq!(
            root.find_text("C").as_deref(),
            Some("Effects of E. coli & friends")
        );
    }

    #[test]
    fn test_empty_element_and_missing() {
        let root = parse_document(DOC).unwrap();
        assert_eq!(root.find_text("D").as_deref(), Some(""));
        assert!(root.find("Z").is_none());
    }

    #[test]
    fn test_find_skips_self() {
        let root = parse_document("<B><x/></B>").unwrap();
        assert!(root.find("B").is_none());
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(parse_document(""), Err(XmlError::Empty)));
        assert!(matches!(
            parse_document("<a><b></b>"),
            Err(XmlError::Unclosed(_))
        ));
        assert!(parse_document("<a></b>").is_err());
        assert!(parse_document("<a/><b/>").is_err());
        assert!(parse_document("not xml").is_err());
    }

    #[test]
    fn test_cdata() {
        let root = parse_document("<a><![CDATA[x < y]]></a>").unwrap();
        assert_eq!(root.text(), "x < y");
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}x{}", "<a>".repeat(depth), "</a>".repeat(depth));

        let root = parse_document(&nested(MAX_DEPTH)).unwrap();
        assert_eq!(root.text(), "x");

        assert!(matches!(
            parse_document(&nested(MAX_DEPTH + 1)),
            Err(XmlError::TooDeep(MAX_DEPTH))
        ));
        assert!(matches!(
            parse_document(&format!("{}<b/>{}", "<a>".repeat(MAX_DEPTH), "</a>".repeat(MAX_DEPTH))),
            Err(XmlError::TooDeep(_))
        ));
        assert!(parse_document(&nested(100_000)).is_err());
    }
}

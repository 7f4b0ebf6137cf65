//! Owned element tree shared by the sanitizer and the structural parser.
//!
//! `roxmltree` gives us a fast, borrow-based, read-only DOM. Stage records
//! must own their data (a `ParsedDocument` outlives the text it came from),
//! so we copy the parts we need into [`Element`]s: SVG-namespace (or
//! un-namespaced) elements, their attributes, and text content.
//!
//! Attribute names are stored as the author would write them: plain names for
//! un-namespaced attributes, `xlink:` / `xml:` prefixes for those namespaces.
//! Attributes and elements in any other namespace (editor metadata, embedded
//! HTML) are dropped while copying.

use std::fmt::Write as _;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Subtrees nested deeper than this are not copied.
pub const MAX_NESTING: usize = 128;

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// One element: local tag name, attributes in document order, children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Look up an attribute by its stored name (`"fill"`, `"xlink:href"`).
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// `href`, falling back to `xlink:href`.
    pub fn href(&self) -> Option<&str> {
        self.attr("href").or_else(|| self.attr("xlink:href"))
    }

    /// Child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Number of elements in this subtree, including `self`.
    pub fn element_count(&self) -> usize {
        1 + self
            .child_elements()
            .map(Element::element_count)
            .sum::<usize>()
    }

    /// Pre-order traversal of this subtree, including `self`.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(el) = stack.pop() {
            out.push(el);
            let children: Vec<&Element> = el.child_elements().collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Serialise this subtree as a standalone XML document fragment.
    ///
    /// The root gets `xmlns` and, when any `xlink:` attribute survives,
    /// `xmlns:xlink`.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        let needs_xlink = self
            .descendants()
            .iter()
            .any(|e| e.attributes.iter().any(|(k, _)| k.starts_with("xlink:")));
        self.write_xml(&mut out, true, needs_xlink);
        out
    }

    fn write_xml(&self, out: &mut String, is_root: bool, needs_xlink: bool) {
        out.push('<');
        out.push_str(&self.name);
        if is_root {
            let _ = write!(out, " xmlns=\"{SVG_NS}\"");
            if needs_xlink {
                let _ = write!(out, " xmlns:xlink=\"{XLINK_NS}\"");
            }
        }
        for (k, v) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", k, escape(v, true));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(e) => e.write_xml(out, false, needs_xlink),
                Node::Text(t) => out.push_str(&escape(t, false)),
            }
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

/// Parse XML text into an owned tree rooted at the document element.
///
/// DTDs are allowed (many exported SVGs carry a DOCTYPE); `roxmltree` bounds
/// entity expansion on its own.
pub fn parse_document(text: &str) -> Result<Element, roxmltree::Error> {
    parse_document_counting_pruned(text).map(|(root, _)| root)
}

/// Like [`parse_document`], also returning how many elements were dropped
/// for nesting deeper than [`MAX_NESTING`].
pub fn parse_document_counting_pruned(
    text: &str,
) -> Result<(Element, usize), roxmltree::Error> {
    let opts = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(text, opts)?;
    let mut pruned = 0;
    let root = copy_element(doc.root_element(), 0, &mut pruned).unwrap_or_else(|| {
        // A root outside the SVG namespace keeps its name so the parser can
        // report it, but nothing inside it is copied.
        Element::new(doc.root_element().tag_name().name())
    });
    Ok((root, pruned))
}

fn copy_element(
    node: roxmltree::Node<'_, '_>,
    depth: usize,
    pruned: &mut usize,
) -> Option<Element> {
    if !is_svg_namespace(node.tag_name().namespace()) {
        return None;
    }
    if depth > MAX_NESTING {
        *pruned += node.descendants().filter(|n| n.is_element()).count();
        return None;
    }
    let mut el = Element::new(node.tag_name().name());
    for attr in node.attributes() {
        let name = match attr.namespace() {
            None => attr.name().to_string(),
            Some(XLINK_NS) => format!("xlink:{}", attr.name()),
            Some(XML_NS) => format!("xml:{}", attr.name()),
            Some(_) => continue,
        };
        el.attributes.push((name, attr.value().to_string()));
    }
    for child in node.children() {
        if child.is_element() {
            if let Some(c) = copy_element(child, depth + 1, pruned) {
                el.children.push(Node::Element(c));
            }
        } else if child.is_text() {
            if let Some(t) = child.text() {
                el.children.push(Node::Text(t.to_string()));
            }
        }
    }
    Some(el)
}

fn is_svg_namespace(ns: Option<&str>) -> bool {
    matches!(ns, None | Some(SVG_NS))
}

fn escape(s: &str, in_attr: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attr => out.push_str("&quot;"),
            '\n' if in_attr => out.push_str("&#10;"),
            _ => out.push(c),
        }
    }
    out
}

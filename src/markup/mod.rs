//! HTML documents and path queries over them.
//!
//! Documents are parsed leniently with `scraper`, so anything a browser would
//! render can be queried. Queries use the XPath subset described in
//! [`xpath`].

mod eval;
pub mod xpath;

use std::fmt;
use std::path::Path;

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Node};

use crate::error::{Error, Result};
use eval::Item;

#[derive(Debug)]
pub struct Document {
    html: Html,
}

/// One result of a path query.
#[derive(Clone, Copy, Debug)]
pub enum Match<'a> {
    Document,
    Element(ElementRef<'a>),
    Text(&'a str),
    Attribute { name: &'a str, value: &'a str },
    Other,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        Self {
            html: Html::parse_document(text),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Filesystem {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    pub fn select(&self, expr: &str) -> Result<Vec<Match<'_>>> {
        self.select_at(self.html.tree.root().id(), expr)
    }

    /// Like [`Document::select`], but relative paths start at `element`,
    /// which must belong to this document.
    pub fn select_from(&self, element: ElementRef<'_>, expr: &str) -> Result<Vec<Match<'_>>> {
        self.select_at(element.id(), expr)
    }

    fn select_at(&self, start: NodeId, expr: &str) -> Result<Vec<Match<'_>>> {
        let path = xpath::parse(expr)?;
        let items = eval::evaluate(&self.html, start, &path);
        tracing::trace!("`{}` matched {} nodes", expr, items.len());
        Ok(items.into_iter().map(|item| self.resolve(item)).collect())
    }

    /// String values of every match, the form most callers print.
    pub fn select_text(&self, expr: &str) -> Result<Vec<String>> {
        Ok(self.select(expr)?.iter().map(Match::text).collect())
    }

    fn resolve(&self, item: Item) -> Match<'_> {
        match item {
            Item::Attr(owner, idx) => match eval::attribute(&self.html, owner, idx) {
                Some((name, value)) => Match::Attribute { name, value },
                None => Match::Other,
            },
            Item::Node(id) => {
                let Some(node) = self.html.tree.get(id) else {
                    return Match::Other;
                };
                match node.value() {
                    Node::Document => Match::Document,
                    Node::Text(text) => Match::Text(&**text),
                    Node::Element(_) => ElementRef::wrap(node).map_or(Match::Other, Match::Element),
                    _ => Match::Other,
                }
            }
        }
    }

    fn root_text(&self) -> String {
        eval::string_value(self.html.tree.root())
    }
}

impl<'a> Match<'a> {
    /// XPath string value: the text under an element, a text node itself, or
    /// an attribute's value.
    pub fn text(&self) -> String {
        match self {
            Match::Document | Match::Other => String::new(),
            Match::Element(element) => element.text().collect(),
            Match::Text(text) => text.to_string(),
            Match::Attribute { value, .. } => value.to_string(),
        }
    }

    pub fn element_name(&self) -> Option<&'a str> {
        match self {
            Match::Element(element) => Some(element.value().name()),
            _ => None,
        }
    }
}

impl fmt::Display for Match<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Match::Element(element) => f.write_str(&element.html()),
            other => f.write_str(&other.text()),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root_text())
    }
}

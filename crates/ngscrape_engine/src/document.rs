//! Parsed page representation.
//!
//! A [`Document`] is the html5ever tree produced by `scraper`, flattened into
//! document-ordered element records. Each element keeps the range of text
//! nodes below it, so `text()` needs no tree walk and the whole value is
//! `Send + Sync` and can be shared through `Arc`.

use std::ops::Range;

use ego_tree::iter::Edge;
use scraper::node::Node;
use scraper::Html;

use crate::config::ParserMode;
use crate::decode::{decode_html, DecodeError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("malformed markup ({count} parse errors, first: {first})")]
    Malformed { count: usize, first: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ElementData {
    name: String,
    attributes: Vec<(String, String)>,
    text: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    elements: Vec<ElementData>,
    texts: Vec<String>,
}

/// Borrowed view of one element of a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    document: &'a Document,
    data: &'a ElementData,
}

impl<'a> Element<'a> {
    pub fn name(&self) -> &'a str {
        &self.data.name
    }

    /// Value of attribute `name`, or `None` when the element does not carry it.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.data
            .attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of every text node below this element.
    pub fn text(&self) -> String {
        self.document.texts[self.data.text.clone()].concat()
    }
}

impl Document {
    /// Decode `bytes` (honouring a `charset=` in `content_type`) and parse them.
    pub fn parse(
        bytes: &[u8],
        content_type: Option<&str>,
        mode: ParserMode,
    ) -> Result<Self, ParseError> {
        let decoded = decode_html(bytes, content_type);
        let decoded = match mode {
            ParserMode::Strict => decoded.into_strict()?,
            ParserMode::Lenient => {
                if decoded.had_errors {
                    ngscrape_logging::scrape_warn!(
                        "Replaced invalid {} byte sequences while decoding page",
                        decoded.encoding_label
                    );
                }
                decoded
            }
        };
        Self::from_html(&decoded.html, mode)
    }

    pub fn from_html(html: &str, mode: ParserMode) -> Result<Self, ParseError> {
        let parsed = Html::parse_document(html);
        if mode == ParserMode::Strict {
            if let Some(first) = parsed.errors.first() {
                return Err(ParseError::Malformed {
                    count: parsed.errors.len(),
                    first: first.to_string(),
                });
            }
        }
        Ok(flatten(&parsed))
    }

    /// All elements named `tag`, in document order.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = Element<'a>> + 'a {
        self.elements
            .iter()
            .filter(move |data| data.name.eq_ignore_ascii_case(tag))
            .map(move |data| Element {
                document: self,
                data,
            })
    }

    /// All elements named `tag` that carry attribute `attr`, in document order.
    pub fn find_all_with_attr<'a>(
        &'a self,
        tag: &'a str,
        attr: &'a str,
    ) -> impl Iterator<Item = Element<'a>> + 'a {
        self.find_all(tag)
            .filter(move |element| element.attr(attr).is_some())
    }

    pub fn find<'a>(&'a self, tag: &'a str) -> Option<Element<'a>> {
        self.find_all(tag).next()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}

fn flatten(html: &Html) -> Document {
    let mut elements: Vec<ElementData> = Vec::new();
    let mut texts: Vec<String> = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    for edge in html.tree.root().traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(element) => {
                    open.push(elements.len());
                    elements.push(ElementData {
                        name: element.name().to_string(),
                        attributes: element
                            .attrs()
                            .map(|(key, value)| (key.to_string(), value.to_string()))
                            .collect(),
                        text: texts.len()..texts.len(),
                    });
                }
                Node::Text(text) => {
                    let text: &str = text;
                    texts.push(text.to_string());
                }
                _ => {}
            },
            Edge::Close(node) => {
                if node.value().is_element() {
                    if let Some(index) = open.pop() {
                        elements[index].text.end = texts.len();
                    }
                }
            }
        }
    }

    Document { elements, texts }
}

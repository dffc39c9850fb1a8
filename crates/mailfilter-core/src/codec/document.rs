//! A minimal element tree over an XML source string.
//!
//! Only what import needs is kept: element names, raw attribute values,
//! nesting, and the byte range of each element's inner markup in the
//! source. Text content is not retained.

use std::ops::Range;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::error::{CodecError, CodecResult};

/// One element of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    /// Qualified name as written, e.g. `apps:property`.
    pub name: String,
    /// Attributes in document order; values are still escaped.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Byte range of the markup between the start and end tags.
    inner: Range<usize>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>, position: usize) -> CodecResult<Self> {
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| CodecError::malformed(e.to_string(), position))?;
            attributes.push((
                String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                String::from_utf8_lossy(&attr.value).into_owned(),
            ));
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
            inner: position..position,
        })
    }

    /// Returns the name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Returns the raw (still escaped) value of an attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the markup between this element's tags, verbatim.
    pub fn inner_markup<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.inner.clone()).unwrap_or_default()
    }

    /// Iterates over all descendants in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }
}

/// Pre-order iterator over the descendants of an [`Element`].
pub(crate) struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// Parses `source` into its root element.
///
/// # Errors
///
/// Returns [`CodecError::MalformedDocument`] for anything that is not a
/// single well-formed element tree: syntax errors, mismatched or unclosed
/// tags, bad attributes, no root element or more than one.
pub(crate) fn parse_document(source: &str) -> CodecResult<Element> {
    let mut reader = Reader::from_str(source);
    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| CodecError::malformed(e.to_string(), reader.buffer_position()))?;
        let position = reader.buffer_position();

        match event {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(CodecError::malformed("content after the root element", position));
                }
                open.push(Element::from_start(&start, position)?);
            }
            Event::Empty(start) => {
                if root.is_some() {
                    return Err(CodecError::malformed("content after the root element", position));
                }
                let element = Element::from_start(&start, position)?;
                match open.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::End(_) => {
                let Some(mut element) = open.pop() else {
                    return Err(CodecError::malformed("unexpected closing tag", position));
                };
                element.inner.end = source[..position].rfind("</").unwrap_or(position);
                match open.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(CodecError::malformed(
            format!("unclosed element <{}>", unclosed.name),
            source.len(),
        ));
    }
    root.ok_or_else(|| CodecError::malformed("no root element", source.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree() {
        let source = r#"<feed><entry a="1"><title><!-- n --></title><x:p name="k" value="&amp;"/></entry></feed>"#;
        let root = parse_document(source).unwrap();

        assert_eq!(root.name, "feed");
        let entry = &root.children[0];
        assert_eq!(entry.attribute("a"), Some("1"));
        assert_eq!(entry.children.len(), 2);

        let title = &entry.children[0];
        assert_eq!(title.inner_markup(source), "<!-- n -->");

        let property = &entry.children[1];
        assert_eq!(property.name, "x:p");
        assert_eq!(property.local_name(), "p");
        assert_eq!(property.attribute("value"), Some("&amp;"));
        assert_eq!(property.inner_markup(source), "");
    }

    #[test]
    fn test_descendants_in_document_order() {
        let source = "<a><b><c/></b><d/></a>";
        let root = parse_document(source).unwrap();
        let names: Vec<&str> = root.descendants().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_mismatched_tags_are_malformed() {
        let err = parse_document("<a><b></a></b>").unwrap_err();
        assert!(matches!(err, CodecError::MalformedDocument { .. }));
    }

    #[test]
    fn test_unclosed_root_is_malformed() {
        let err = parse_document("<feed><entry></entry>").unwrap_err();
        assert!(err.to_string().contains("unclosed element <feed>"));
    }

    #[test]
    fn test_no_root_is_malformed() {
        assert!(parse_document("").is_err());
        assert!(parse_document("just some text").is_err());
    }

    #[test]
    fn test_second_root_is_malformed() {
        assert!(parse_document("<a/><b/>").is_err());
    }
}

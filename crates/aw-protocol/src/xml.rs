//! Thin token-level reader and writer over `quick-xml`
//!
//! The reader walks a document one child element at a time. Callers receive an
//! owned [`StartTag`] for each child and must consume it completely (with
//! [`XmlReader::read_text`], [`XmlReader::skip`] or by iterating its own
//! children) before asking for the next sibling.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use quick_xml::Writer;

use crate::error::CodecError;

/// XML-Schema-instance namespace carrying the `type` discriminator
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// A start (or empty) element with the parts the codec routes on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    name: String,
    discriminator: Option<String>,
    empty: bool,
}

impl StartTag {
    /// Local name of the element, without prefix
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the `xsi:type` attribute with any prefix removed
    pub fn discriminator(&self) -> Option<&str> {
        self.discriminator.as_deref()
    }

    /// True for self-closing elements, which have no content to consume
    pub fn is_empty(&self) -> bool {
        self.empty
    }
}

/// Pull reader over an in-memory document
pub struct XmlReader<'a> {
    inner: NsReader<&'a [u8]>,
}

impl<'a> XmlReader<'a> {
    /// Create a reader over raw document bytes
    pub fn new(xml: &'a [u8]) -> Self {
        Self {
            inner: NsReader::from_reader(xml),
        }
    }

    /// Advance to the document's root element
    pub fn root(&mut self) -> Result<StartTag, CodecError> {
        loop {
            match self.inner.read_event()? {
                Event::Start(e) => return self.start_tag(&e, false),
                Event::Empty(e) => return self.start_tag(&e, true),
                Event::Eof => return Err(CodecError::UnexpectedEof),
                _ => {}
            }
        }
    }

    /// Search forward, at any depth, for the next element with the given local name
    ///
    /// Returns `None` when the document ends first. Elements passed over are
    /// discarded, so this is only useful for locating a payload inside an envelope.
    pub fn descend_to(&mut self, local_name: &str) -> Result<Option<StartTag>, CodecError> {
        loop {
            match self.inner.read_event()? {
                Event::Start(e) if e.local_name().as_ref() == local_name.as_bytes() => {
                    return self.start_tag(&e, false).map(Some);
                }
                Event::Empty(e) if e.local_name().as_ref() == local_name.as_bytes() => {
                    return self.start_tag(&e, true).map(Some);
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    /// Next child element of the element currently open, or `None` at its end tag
    pub fn next_child(&mut self) -> Result<Option<StartTag>, CodecError> {
        loop {
            match self.inner.read_event()? {
                Event::Start(e) => return self.start_tag(&e, false).map(Some),
                Event::Empty(e) => return self.start_tag(&e, true).map(Some),
                Event::End(_) => return Ok(None),
                Event::Eof => return Err(CodecError::UnexpectedEof),
                _ => {}
            }
        }
    }

    /// Collect the text content of `start`, consuming its end tag
    ///
    /// Nested elements are rejected: scalar fields carry text only.
    pub fn read_text(&mut self, start: &StartTag) -> Result<String, CodecError> {
        let mut text = String::new();
        if start.empty {
            return Ok(text);
        }
        loop {
            match self.inner.read_event()? {
                Event::Text(t) => {
                    let unescaped = t
                        .unescape()
                        .map_err(|e| CodecError::malformed(&start.name, e.to_string()))?;
                    text.push_str(&unescaped);
                }
                Event::CData(c) => {
                    let raw = String::from_utf8(c.into_inner().into_owned())
                        .map_err(|e| CodecError::malformed(&start.name, e.to_string()))?;
                    text.push_str(&raw);
                }
                Event::Start(e) | Event::Empty(e) => {
                    return Err(CodecError::malformed(
                        &start.name,
                        format!(
                            "unexpected child element <{}>",
                            String::from_utf8_lossy(e.local_name().as_ref())
                        ),
                    ));
                }
                Event::End(_) => return Ok(text),
                Event::Eof => return Err(CodecError::UnexpectedEof),
                _ => {}
            }
        }
    }

    /// Discard `start` and everything inside it
    pub fn skip(&mut self, start: &StartTag) -> Result<(), CodecError> {
        if start.empty {
            return Ok(());
        }
        let mut depth = 1usize;
        loop {
            match self.inner.read_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Event::Eof => return Err(CodecError::UnexpectedEof),
                _ => {}
            }
        }
    }

    fn start_tag(&self, e: &BytesStart<'_>, empty: bool) -> Result<StartTag, CodecError> {
        let name = std::str::from_utf8(e.local_name().as_ref())
            .map_err(|err| CodecError::malformed("<element name>", err.to_string()))?
            .to_string();

        let mut discriminator = None;
        for attr in e.attributes() {
            let attr = attr?;
            if attr.key.local_name().as_ref() != b"type" {
                continue;
            }
            let (ns, _) = self.inner.resolve_attribute(attr.key);
            let is_xsi = match ns {
                ResolveResult::Bound(ns) => ns.as_ref() == XSI_NAMESPACE.as_bytes(),
                // Fragments cut from a larger envelope lose the xmlns:xsi declaration
                _ => attr.key.prefix().is_some_and(|p| p.as_ref() == b"xsi"),
            };
            if !is_xsi {
                continue;
            }
            let value = attr
                .unescape_value()
                .map_err(|err| CodecError::malformed(&name, err.to_string()))?;
            let tag = match value.rsplit_once(':') {
                Some((_, local)) => local,
                None => value.as_ref(),
            };
            discriminator = Some(tag.to_string());
        }

        Ok(StartTag {
            name,
            discriminator,
            empty,
        })
    }
}

/// Streaming writer producing unindented XML
pub struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self {
            inner: Writer::new(Vec::new()),
        }
    }

    /// Open an element
    pub fn start(&mut self, name: &str) -> Result<(), CodecError> {
        self.inner.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    /// Open an element carrying an `xsi:type` discriminator
    ///
    /// The XSI namespace is declared on the element itself so the output stays
    /// self-contained when written outside a SOAP envelope.
    pub fn start_discriminated(&mut self, name: &str, tag: &str) -> Result<(), CodecError> {
        let mut start = BytesStart::new(name);
        start.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
        start.push_attribute(("xsi:type", tag));
        self.inner.write_event(Event::Start(start))?;
        Ok(())
    }

    /// Close an element
    pub fn end(&mut self, name: &str) -> Result<(), CodecError> {
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Write `<name>text</name>` with the text escaped
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<(), CodecError> {
        self.start(name)?;
        self.inner.write_event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    /// Consume the writer and return the document bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

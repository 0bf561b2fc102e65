//! Result pages returned by `get` and `mutate` operations

use tracing::debug;

use crate::codec::PolymorphicCodec;
use crate::error::CodecError;
use crate::field::XmlField;
use crate::group::SharedGroup;
use crate::xml::{StartTag, XmlReader};

/// Element carrying the operation result inside a response body
pub const RESULT_ELEMENT: &str = "rval";

/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Total matching entries on the server, across all pages
    pub total_num_entries: i64,
    pub entries: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            total_num_entries: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    /// Locate `rval` anywhere in `xml` and decode it
    ///
    /// `decode_entry` is called for each `entries` (get) or `value` (mutate)
    /// element and must consume it. A response without `rval` is an empty page.
    pub fn decode_with<F>(xml: &[u8], mut decode_entry: F) -> Result<Self, CodecError>
    where
        F: FnMut(&mut XmlReader<'_>, &StartTag) -> Result<T, CodecError>,
    {
        let mut reader = XmlReader::new(xml);
        let mut page = Page::default();
        let Some(rval) = reader.descend_to(RESULT_ELEMENT)? else {
            debug!("Response has no <{}>", RESULT_ELEMENT);
            return Ok(page);
        };
        if rval.is_empty() {
            return Ok(page);
        }

        while let Some(child) = reader.next_child()? {
            match child.name() {
                "totalNumEntries" => page.total_num_entries.read_into(&mut reader, &child)?,
                "entries" | "value" => page.entries.push(decode_entry(&mut reader, &child)?),
                _ => reader.skip(&child)?,
            }
        }
        Ok(page)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether more pages follow one that started at `offset`
    pub fn has_more(&self, offset: i64) -> bool {
        offset.saturating_add(self.entries.len() as i64) < self.total_num_entries
    }
}

impl<G: SharedGroup> PolymorphicCodec<G> {
    /// Decode a response page whose entries are group elements
    pub fn decode_page(&self, xml: &[u8]) -> Result<Page<G>, CodecError> {
        Page::decode_with(xml, |reader, start| self.decode(reader, start))
    }
}

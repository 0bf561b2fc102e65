//! Discriminator → strategy table for one variant group
//!
//! A registry is built once from the group's strategy list, checked against
//! the group's known discriminators, and is read-only afterwards. Codecs hold
//! it behind an `Arc` so any number of concurrent decodes can share it.

use std::collections::HashMap;

use crate::error::CodecError;
use crate::field::{read_record, XmlRecord};
use crate::group::{Discriminated, Variant};
use crate::xml::{StartTag, XmlReader, XmlWriter};

/// Decode the body of a discriminated element into a group value
pub type DecodeFn<V> = fn(&mut XmlReader<'_>, &StartTag) -> Result<V, CodecError>;

/// Encode the body (children only) of a group value's discriminated element
pub type EncodeFn<V> = fn(&V, &mut XmlWriter) -> Result<(), CodecError>;

/// How one concrete variant is decoded and encoded
pub struct VariantStrategy<V> {
    tag: &'static str,
    decode: Option<DecodeFn<V>>,
    encode: Option<EncodeFn<V>>,
}

impl<V: Variant> VariantStrategy<V> {
    /// Variant supported in both directions
    pub fn full<R>() -> Self
    where
        R: XmlRecord + Discriminated + Default + Into<V>,
    {
        Self {
            tag: R::TAG,
            decode: Some(decode_record::<V, R>),
            encode: Some(encode_body::<V>),
        }
    }

    /// Variant that can be read but not yet written
    pub fn decode_only<R>() -> Self
    where
        R: XmlRecord + Discriminated + Default + Into<V>,
    {
        Self {
            tag: R::TAG,
            decode: Some(decode_record::<V, R>),
            encode: None,
        }
    }

    /// Strategy built from explicit functions
    pub fn custom(
        tag: &'static str,
        decode: Option<DecodeFn<V>>,
        encode: Option<EncodeFn<V>>,
    ) -> Self {
        Self {
            tag,
            decode,
            encode,
        }
    }

    /// Discriminator this strategy handles
    pub fn tag(&self) -> &'static str {
        self.tag
    }
}

impl<V> Clone for VariantStrategy<V> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag,
            decode: self.decode,
            encode: self.encode,
        }
    }
}

impl<V> std::fmt::Debug for VariantStrategy<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantStrategy")
            .field("tag", &self.tag)
            .field("decode", &self.decode.is_some())
            .field("encode", &self.encode.is_some())
            .finish()
    }
}

fn decode_record<V, R>(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<V, CodecError>
where
    R: XmlRecord + Default + Into<V>,
{
    let mut record = R::default();
    read_record(&mut record, reader, start)?;
    Ok(record.into())
}

fn encode_body<V: Variant>(value: &V, writer: &mut XmlWriter) -> Result<(), CodecError> {
    value.body().write_fields(writer)
}

/// Validated strategy table for the group `V`
#[derive(Debug, Clone)]
pub struct VariantRegistry<V> {
    strategies: HashMap<&'static str, VariantStrategy<V>>,
}

impl<V: Variant> VariantRegistry<V> {
    /// Build the registry from the group's own strategy list
    pub fn new() -> Result<Self, CodecError> {
        Self::from_strategies(V::strategies())
    }

    /// Build a registry from an explicit strategy list
    ///
    /// Every strategy must name a known discriminator, no discriminator may
    /// appear twice, and every variant the group enum can hold must be decodable.
    pub fn from_strategies(list: Vec<VariantStrategy<V>>) -> Result<Self, CodecError> {
        let mut strategies = HashMap::with_capacity(list.len());
        for strategy in list {
            if !V::KNOWN_TAGS.contains(&strategy.tag) {
                return Err(Self::inconsistent(format!(
                    "strategy for unknown type {}",
                    strategy.tag
                )));
            }
            if strategies.insert(strategy.tag, strategy.clone()).is_some() {
                return Err(Self::inconsistent(format!(
                    "duplicate strategy for {}",
                    strategy.tag
                )));
            }
        }

        for tag in V::TAGS {
            if !V::KNOWN_TAGS.contains(tag) {
                return Err(Self::inconsistent(format!("{tag} missing from known types")));
            }
            let decodable = strategies.get(tag).is_some_and(|s| s.decode.is_some());
            if !decodable {
                return Err(Self::inconsistent(format!("{tag} has no decoder")));
            }
        }

        Ok(Self { strategies })
    }

    fn inconsistent(reason: String) -> CodecError {
        CodecError::Registry {
            group: V::GROUP,
            reason,
        }
    }

    fn unsupported(tag: &str) -> CodecError {
        if V::KNOWN_TAGS.contains(&tag) {
            CodecError::NotImplemented {
                group: V::GROUP,
                tag: tag.to_string(),
            }
        } else {
            CodecError::UnknownVariant {
                group: V::GROUP,
                tag: tag.to_string(),
            }
        }
    }

    /// Decoder for `tag`
    pub fn decoder(&self, tag: &str) -> Result<DecodeFn<V>, CodecError> {
        self.strategies
            .get(tag)
            .and_then(|s| s.decode)
            .ok_or_else(|| Self::unsupported(tag))
    }

    /// Encoder for `tag`
    pub fn encoder(&self, tag: &str) -> Result<EncodeFn<V>, CodecError> {
        self.strategies
            .get(tag)
            .and_then(|s| s.encode)
            .ok_or_else(|| Self::unsupported(tag))
    }

    /// Whether `tag` can be decoded
    pub fn can_decode(&self, tag: &str) -> bool {
        self.decoder(tag).is_ok()
    }

    /// Whether `tag` can be encoded
    pub fn can_encode(&self, tag: &str) -> bool {
        self.encoder(tag).is_ok()
    }

    /// Registered discriminators, sorted
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.strategies.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Number of registered strategies
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// True when no strategy is registered
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

//! Polymorphic encode/decode engine
//!
//! Decoding a shared group is two-phase. Shared fields are collected into a
//! [`SharedBuilder`] as they stream past; when the discriminated element
//! arrives the registry materializes the concrete variant, which is seeded with
//! what has been collected so far. Whatever else arrives afterwards is applied
//! once the group element closes, so the result does not depend on where the
//! shared fields sit relative to the discriminated element.

use std::sync::Arc;

use tracing::debug;

use crate::error::CodecError;
use crate::group::{SharedGroup, Variant};
use crate::registry::VariantRegistry;
use crate::shared::{SharedBuilder, SharedFields};
use crate::xml::{StartTag, XmlReader, XmlWriter};

/// Stateless codec for one variant group
pub struct PolymorphicCodec<G> {
    registry: Arc<VariantRegistry<G>>,
}

impl<G> Clone for PolymorphicCodec<G> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<G: Variant + std::fmt::Debug> std::fmt::Debug for PolymorphicCodec<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolymorphicCodec")
            .field("group", &G::GROUP)
            .field("tags", &self.registry.tags())
            .finish()
    }
}

impl<G: Variant> PolymorphicCodec<G> {
    /// Codec over the group's default registry
    pub fn new() -> Result<Self, CodecError> {
        Ok(Self::with_registry(VariantRegistry::new()?))
    }

    /// Codec over a caller-built registry
    pub fn with_registry(registry: VariantRegistry<G>) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &VariantRegistry<G> {
        &self.registry
    }

    /// Decode one discriminated element into a variant
    ///
    /// On a routing error nothing past `start` has been consumed.
    pub fn decode_element(
        &self,
        reader: &mut XmlReader<'_>,
        start: &StartTag,
    ) -> Result<G, CodecError> {
        let tag = start
            .discriminator()
            .ok_or_else(|| CodecError::MissingDiscriminator {
                group: G::GROUP,
                element: start.name().to_string(),
            })?;
        let decode = self.registry.decoder(tag)?;
        debug!("Decoding {} as {}", G::GROUP, tag);
        decode(reader, start)
    }

    /// Encode `value` as a discriminated `element`
    ///
    /// The encoder is resolved before anything is written, so an unsupported
    /// variant leaves `writer` untouched.
    pub fn encode_element(
        &self,
        value: &G,
        element: &str,
        writer: &mut XmlWriter,
    ) -> Result<(), CodecError> {
        let encode = self.registry.encoder(value.tag())?;
        writer.start_discriminated(element, value.tag())?;
        encode(value, writer)?;
        writer.end(element)
    }
}

impl<G: SharedGroup> PolymorphicCodec<G> {
    /// Decode the group element `start`, merging shared fields onto the variant
    pub fn decode(&self, reader: &mut XmlReader<'_>, start: &StartTag) -> Result<G, CodecError> {
        let mut builder = SharedBuilder::<G::Shared>::new();
        let mut value: Option<G> = None;

        if !start.is_empty() {
            while let Some(child) = reader.next_child()? {
                if child.name() == G::ELEMENT {
                    if value.is_some() {
                        return Err(CodecError::malformed(
                            G::ELEMENT,
                            format!("repeated inside {}", G::GROUP),
                        ));
                    }
                    let mut decoded = self.decode_element(reader, &child)?;
                    builder.apply_onto(decoded.shared_mut());
                    value = Some(decoded);
                } else if !builder.accept(reader, &child)? {
                    return Err(CodecError::UnknownField {
                        group: G::GROUP,
                        field: child.name().to_string(),
                    });
                }
            }
        }

        let mut value = value.ok_or(CodecError::MissingVariant {
            group: G::GROUP,
            element: G::ELEMENT,
        })?;
        builder.apply_onto(value.shared_mut());
        Ok(value)
    }

    /// Decode a document whose root element is one group element
    pub fn decode_slice(&self, xml: &[u8]) -> Result<G, CodecError> {
        let mut reader = XmlReader::new(xml);
        let root = reader.root()?;
        self.decode(&mut reader, &root)
    }

    /// Encode `value` as the group element `element`
    ///
    /// Leading shared fields come first, then the discriminated element, then
    /// trailing shared fields in schema order.
    pub fn encode(&self, value: &G, element: &str, writer: &mut XmlWriter) -> Result<(), CodecError> {
        let encode = self.registry.encoder(value.tag())?;
        let shared = value.shared();

        writer.start(element)?;
        shared.write_leading(writer)?;
        writer.start_discriminated(G::ELEMENT, value.tag())?;
        encode(value, writer)?;
        writer.end(G::ELEMENT)?;
        shared.write_trailing(writer)?;
        writer.end(element)
    }

    /// Encode `value` as a standalone document
    pub fn encode_to_vec(&self, value: &G, element: &str) -> Result<Vec<u8>, CodecError> {
        let mut writer = XmlWriter::new();
        self.encode(value, element, &mut writer)?;
        Ok(writer.into_inner())
    }
}

//! Error types for XML decoding and encoding

use quick_xml::events::attributes::AttrError;
use thiserror::Error;

/// Errors raised while decoding or encoding discriminated XML
#[derive(Debug, Error)]
pub enum CodecError {
    /// Discriminator is not part of the group at all (protocol drift or corrupt input)
    #[error("unknown {group} type: {tag}")]
    UnknownVariant { group: &'static str, tag: String },

    /// Discriminator is known but deliberately unsupported
    #[error("{group} type {tag} is not yet implemented")]
    NotImplemented { group: &'static str, tag: String },

    /// A field could not be parsed into its expected shape
    #[error("malformed field <{field}>: {reason}")]
    MalformedField { field: String, reason: String },

    /// A group-level element that is neither shared nor the discriminated element
    #[error("unknown {group} field <{field}>")]
    UnknownField { group: &'static str, field: String },

    /// The group element ended without a discriminated child
    #[error("{group} has no <{element}> element")]
    MissingVariant {
        group: &'static str,
        element: &'static str,
    },

    /// The discriminated element has no `xsi:type` attribute
    #[error("<{element}> in {group} has no xsi:type attribute")]
    MissingDiscriminator { group: &'static str, element: String },

    /// Document ended while an element was still open
    #[error("unexpected end of document")]
    UnexpectedEof,

    /// Registry does not agree with its group's variant lists
    #[error("{group} registry is inconsistent: {reason}")]
    Registry { group: &'static str, reason: String },

    /// Tokenizer error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Attribute syntax error
    #[error("XML attribute error: {0}")]
    Attribute(#[from] AttrError),

    /// Writer I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Build a [`CodecError::MalformedField`]
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the error marks a known but unsupported variant
    ///
    /// Batch callers use this to skip an entry instead of failing the whole batch.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }

    /// Discriminator carried by variant routing errors
    pub fn variant_tag(&self) -> Option<&str> {
        match self {
            Self::UnknownVariant { tag, .. } | Self::NotImplemented { tag, .. } => Some(tag),
            _ => None,
        }
    }
}

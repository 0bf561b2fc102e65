//! Fields shared by every variant of a group
//!
//! The protocol places shared fields as siblings of the discriminated element,
//! some before it and some after. Decoding accumulates them in a
//! [`SharedBuilder`] that records which fields were actually present, then
//! applies exactly those onto the variant once it exists.

use crate::error::CodecError;
use crate::xml::{StartTag, XmlReader, XmlWriter};

/// Schema of a group's shared fields
pub trait SharedFields: Default + Clone + PartialEq + std::fmt::Debug {
    /// Wire names written before the discriminated element
    const LEADING: &'static [&'static str];
    /// Wire names written after the discriminated element
    const TRAILING: &'static [&'static str];

    /// Read `start` if it is a shared field, returning its wire name
    fn read_shared(
        &mut self,
        reader: &mut XmlReader<'_>,
        start: &StartTag,
    ) -> Result<Option<&'static str>, CodecError>;

    /// Copy the field named `name` from `self` onto `target`
    fn copy_field(&self, name: &str, target: &mut Self);

    /// Write the fields that precede the discriminated element
    fn write_leading(&self, writer: &mut XmlWriter) -> Result<(), CodecError>;

    /// Write the fields that follow the discriminated element
    fn write_trailing(&self, writer: &mut XmlWriter) -> Result<(), CodecError>;
}

/// Implemented by variant records that carry their group's shared fields
pub trait CarriesShared<S> {
    fn shared(&self) -> &S;
    fn shared_mut(&mut self) -> &mut S;
}

/// Accumulator for shared fields seen so far in one group element
#[derive(Debug, Clone, Default)]
pub struct SharedBuilder<S> {
    values: S,
    seen: Vec<&'static str>,
}

impl<S: SharedFields> SharedBuilder<S> {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            values: S::default(),
            seen: Vec::new(),
        }
    }

    /// Consume `start` if it is a shared field
    pub fn accept(
        &mut self,
        reader: &mut XmlReader<'_>,
        start: &StartTag,
    ) -> Result<bool, CodecError> {
        match self.values.read_shared(reader, start)? {
            Some(name) => {
                if !self.seen.contains(&name) {
                    self.seen.push(name);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Values accumulated so far
    pub fn values(&self) -> &S {
        &self.values
    }

    /// Wire names of the fields present so far, in first-seen order
    pub fn seen(&self) -> &[&'static str] {
        &self.seen
    }

    /// Apply every field present so far onto `target`, leaving the rest untouched
    pub fn apply_onto(&self, target: &mut S) {
        for name in &self.seen {
            self.values.copy_field(name, target);
        }
    }
}

/// Declare a group's shared-field schema
///
/// Fields listed under `leading` are written before the discriminated element
/// and those under `trailing` after it. Decoding accepts either section in any
/// position.
#[macro_export]
macro_rules! shared_fields {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            leading {
                $(
                    $(#[$lmeta:meta])*
                    $ltag:literal => $lfield:ident : $lty:ty
                ),* $(,)?
            }
            trailing {
                $(
                    $(#[$tmeta:meta])*
                    $ttag:literal => $tfield:ident : $tty:ty
                ),* $(,)?
            }
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[$lmeta])*
                pub $lfield: $lty,
            )*
            $(
                $(#[$tmeta])*
                pub $tfield: $tty,
            )*
        }

        impl $crate::shared::SharedFields for $name {
            const LEADING: &'static [&'static str] = &[$($ltag),*];
            const TRAILING: &'static [&'static str] = &[$($ttag),*];

            fn read_shared(
                &mut self,
                reader: &mut $crate::xml::XmlReader<'_>,
                start: &$crate::xml::StartTag,
            ) -> ::std::result::Result<Option<&'static str>, $crate::error::CodecError> {
                match start.name() {
                    $(
                        $ltag => {
                            $crate::field::XmlField::read_into(&mut self.$lfield, reader, start)?;
                            Ok(Some($ltag))
                        }
                    )*
                    $(
                        $ttag => {
                            $crate::field::XmlField::read_into(&mut self.$tfield, reader, start)?;
                            Ok(Some($ttag))
                        }
                    )*
                    _ => Ok(None),
                }
            }

            fn copy_field(&self, name: &str, target: &mut Self) {
                match name {
                    $($ltag => target.$lfield = self.$lfield.clone(),)*
                    $($ttag => target.$tfield = self.$tfield.clone(),)*
                    _ => {}
                }
            }

            fn write_leading(
                &self,
                writer: &mut $crate::xml::XmlWriter,
            ) -> ::std::result::Result<(), $crate::error::CodecError> {
                $(
                    if !$crate::field::XmlField::is_omitted(&self.$lfield) {
                        $crate::field::XmlField::write_as(&self.$lfield, writer, $ltag)?;
                    }
                )*
                Ok(())
            }

            fn write_trailing(
                &self,
                writer: &mut $crate::xml::XmlWriter,
            ) -> ::std::result::Result<(), $crate::error::CodecError> {
                $(
                    if !$crate::field::XmlField::is_omitted(&self.$tfield) {
                        $crate::field::XmlField::write_as(&self.$tfield, writer, $ttag)?;
                    }
                )*
                Ok(())
            }
        }
    };
}

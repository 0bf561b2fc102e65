//! Field-level decoding and encoding
//!
//! Every struct field that maps to a child element implements [`XmlField`].
//! Scalars replace their value, `Option` fills in, and `Vec` appends one item
//! per repeated element, which is how the protocol encodes sequences.
//!
//! Records (structs whose fields are child elements) are declared with
//! [`xml_record!`](crate::xml_record) and implement [`XmlRecord`].

use std::str::FromStr;

use tracing::debug;

use crate::error::CodecError;
use crate::xml::{StartTag, XmlReader, XmlWriter};

/// A value stored in one child element
pub trait XmlField {
    /// Merge the content of `start` into this value
    fn read_into(&mut self, reader: &mut XmlReader<'_>, start: &StartTag)
        -> Result<(), CodecError>;

    /// Write this value as one or more `name` elements
    fn write_as(&self, writer: &mut XmlWriter, name: &str) -> Result<(), CodecError>;

    /// Whether the field is left out of the output entirely
    fn is_omitted(&self) -> bool {
        false
    }
}

/// A struct whose fields are child elements
pub trait XmlRecord {
    /// Consume one child element if it names a field of this record
    ///
    /// Returns `Ok(false)` without reading anything when `start` is not a field.
    fn read_field(
        &mut self,
        reader: &mut XmlReader<'_>,
        start: &StartTag,
    ) -> Result<bool, CodecError>;

    /// Write every non-omitted field in declaration order
    fn write_fields(&self, writer: &mut XmlWriter) -> Result<(), CodecError>;
}

/// Read all children of `start` into `record`, skipping elements it does not declare
pub fn read_record<R: XmlRecord + ?Sized>(
    record: &mut R,
    reader: &mut XmlReader<'_>,
    start: &StartTag,
) -> Result<(), CodecError> {
    if start.is_empty() {
        return Ok(());
    }
    while let Some(child) = reader.next_child()? {
        if !record.read_field(reader, &child)? {
            debug!("Skipping unknown element <{}> in <{}>", child.name(), start.name());
            reader.skip(&child)?;
        }
    }
    Ok(())
}

fn parse_text<T>(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<T, CodecError>
where
    T: FromStr + Default,
    T::Err: std::fmt::Display,
{
    let text = reader.read_text(start)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(T::default());
    }
    trimmed
        .parse::<T>()
        .map_err(|e| CodecError::malformed(start.name(), format!("{trimmed:?}: {e}")))
}

macro_rules! impl_numeric_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl XmlField for $ty {
                fn read_into(
                    &mut self,
                    reader: &mut XmlReader<'_>,
                    start: &StartTag,
                ) -> Result<(), CodecError> {
                    *self = parse_text(reader, start)?;
                    Ok(())
                }

                fn write_as(&self, writer: &mut XmlWriter, name: &str) -> Result<(), CodecError> {
                    writer.text_element(name, &self.to_string())
                }

                fn is_omitted(&self) -> bool {
                    *self == <$ty>::default()
                }
            }
        )+
    };
}

impl_numeric_field!(i32, i64, u32, u64, f64);

impl XmlField for bool {
    fn read_into(&mut self, reader: &mut XmlReader<'_>, start: &StartTag) -> Result<(), CodecError> {
        let text = reader.read_text(start)?;
        *self = match text.trim() {
            "true" | "1" => true,
            "false" | "0" | "" => false,
            other => {
                return Err(CodecError::malformed(
                    start.name(),
                    format!("{other:?} is not a boolean"),
                ))
            }
        };
        Ok(())
    }

    fn write_as(&self, writer: &mut XmlWriter, name: &str) -> Result<(), CodecError> {
        writer.text_element(name, if *self { "true" } else { "false" })
    }

    fn is_omitted(&self) -> bool {
        !*self
    }
}

impl XmlField for String {
    fn read_into(&mut self, reader: &mut XmlReader<'_>, start: &StartTag) -> Result<(), CodecError> {
        *self = reader.read_text(start)?;
        Ok(())
    }

    fn write_as(&self, writer: &mut XmlWriter, name: &str) -> Result<(), CodecError> {
        writer.text_element(name, self)
    }

    fn is_omitted(&self) -> bool {
        self.is_empty()
    }
}

impl<T: XmlField + Default> XmlField for Option<T> {
    fn read_into(&mut self, reader: &mut XmlReader<'_>, start: &StartTag) -> Result<(), CodecError> {
        let mut value = T::default();
        value.read_into(reader, start)?;
        *self = Some(value);
        Ok(())
    }

    fn write_as(&self, writer: &mut XmlWriter, name: &str) -> Result<(), CodecError> {
        match self {
            Some(value) => value.write_as(writer, name),
            None => Ok(()),
        }
    }

    fn is_omitted(&self) -> bool {
        self.is_none()
    }
}

impl<T: XmlField + Default> XmlField for Vec<T> {
    fn read_into(&mut self, reader: &mut XmlReader<'_>, start: &StartTag) -> Result<(), CodecError> {
        let mut item = T::default();
        item.read_into(reader, start)?;
        self.push(item);
        Ok(())
    }

    fn write_as(&self, writer: &mut XmlWriter, name: &str) -> Result<(), CodecError> {
        for item in self {
            item.write_as(writer, name)?;
        }
        Ok(())
    }

    fn is_omitted(&self) -> bool {
        self.is_empty()
    }
}

/// Declare a struct whose fields are child elements
///
/// Each field names the wire element it maps to. An optional leading
/// `@shared name: Type;` line adds a field that does not appear inside the
/// record's own element; groups use it to carry the fields shared by all of
/// their variants. An optional `@flatten name: Type;` line embeds another
/// record whose fields sit directly inside this one, written first.
///
/// ```rust
/// use aw_protocol::xml_record;
///
/// xml_record! {
///     /// A label attached to an entity
///     pub struct Tag {
///         "id" => id: i64,
///         "name" => name: String,
///     }
/// }
/// ```
#[macro_export]
macro_rules! xml_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(@shared $shared:ident : $shared_ty:ty;)?
            $(@flatten $base:ident : $base_ty:ty;)?
            $(
                $(#[$fmeta:meta])*
                $tag:literal => $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(
                /// Fields shared with every other variant of the group
                pub $shared: $shared_ty,
            )?
            $(
                pub $base: $base_ty,
            )?
            $(
                $(#[$fmeta])*
                pub $field: $fty,
            )*
        }

        impl $crate::field::XmlRecord for $name {
            #[allow(unused_variables)]
            fn read_field(
                &mut self,
                reader: &mut $crate::xml::XmlReader<'_>,
                start: &$crate::xml::StartTag,
            ) -> ::std::result::Result<bool, $crate::error::CodecError> {
                $(
                    if $crate::field::XmlRecord::read_field(&mut self.$base, reader, start)? {
                        return Ok(true);
                    }
                )?
                match start.name() {
                    $(
                        $tag => {
                            $crate::field::XmlField::read_into(&mut self.$field, reader, start)?;
                            Ok(true)
                        }
                    )*
                    _ => Ok(false),
                }
            }

            #[allow(unused_variables)]
            fn write_fields(
                &self,
                writer: &mut $crate::xml::XmlWriter,
            ) -> ::std::result::Result<(), $crate::error::CodecError> {
                $(
                    $crate::field::XmlRecord::write_fields(&self.$base, writer)?;
                )?
                $(
                    if !$crate::field::XmlField::is_omitted(&self.$field) {
                        $crate::field::XmlField::write_as(&self.$field, writer, $tag)?;
                    }
                )*
                Ok(())
            }
        }

        impl $crate::field::XmlField for $name {
            fn read_into(
                &mut self,
                reader: &mut $crate::xml::XmlReader<'_>,
                start: &$crate::xml::StartTag,
            ) -> ::std::result::Result<(), $crate::error::CodecError> {
                $crate::field::read_record(self, reader, start)
            }

            fn write_as(
                &self,
                writer: &mut $crate::xml::XmlWriter,
                name: &str,
            ) -> ::std::result::Result<(), $crate::error::CodecError> {
                writer.start(name)?;
                $crate::field::XmlRecord::write_fields(self, writer)?;
                writer.end(name)
            }
        }

        $(
            impl $crate::shared::CarriesShared<$shared_ty> for $name {
                fn shared(&self) -> &$shared_ty {
                    &self.$shared
                }

                fn shared_mut(&mut self) -> &mut $shared_ty {
                    &mut self.$shared
                }
            }
        )?
    };
}

//! AdWords SOAP polymorphic XML codec
//!
//! Many protocol entities share one abstract element name and are told apart
//! on the wire by an `xsi:type` attribute. This crate maps such elements to
//! closed Rust enums and back.
//!
//! # Architecture
//!
//! - [`xml`]: token-level reader and writer over `quick-xml`
//! - [`field`]: per-field decode/encode and the [`xml_record!`] macro
//! - [`shared`]: fields shared by all variants of a group, and the out-of-order builder
//! - [`group`]: the [`Variant`] traits and the [`variant_group!`] macro
//! - [`registry`]: discriminator → strategy table, validated at construction
//! - [`codec`]: [`PolymorphicCodec`], the decode/encode engine
//! - [`page`]: `rval` result pages
//! - [`ads`], [`extensions`]: the concrete groups
//! - [`sync`]: customer sync change data
//!
//! # Example
//!
//! ```rust
//! use aw_protocol::ads::{ad_codec, AdGroupAd};
//!
//! let xml = br#"<operand xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
//!     <adGroupId>42</adGroupId>
//!     <ad xsi:type="TextAd"><headline>Hello</headline></ad>
//!     <status>ENABLED</status>
//! </operand>"#;
//!
//! let codec = ad_codec().unwrap();
//! let ad = codec.decode_slice(xml).unwrap();
//! assert_eq!(ad.ad_group_id(), 42);
//! assert!(matches!(ad, AdGroupAd::TextAd(_)));
//! ```

pub mod ads;
pub mod codec;
pub mod error;
pub mod extensions;
pub mod field;
pub mod group;
pub mod page;
pub mod registry;
pub mod shared;
pub mod sync;
pub mod xml;

pub use ads::{ad_codec, AdGroupAd, AdGroupAdShared, AD_TYPES};
pub use codec::PolymorphicCodec;
pub use error::CodecError;
pub use extensions::{extension_codec, ExtensionFeedItem, ExtensionSetting};
pub use field::{XmlField, XmlRecord};
pub use group::{Discriminated, SharedGroup, Variant};
pub use page::Page;
pub use registry::{VariantRegistry, VariantStrategy};
pub use shared::{SharedBuilder, SharedFields};
pub use sync::{decode_change_data, CustomerChangeData};
pub use xml::{StartTag, XmlReader, XmlWriter, XSI_NAMESPACE};

//! Variant groups: closed sets of concrete types behind one discriminator
//!
//! A group is a Rust enum with one case per concrete variant. Each case wraps
//! a record declared with [`xml_record!`](crate::xml_record), and the record's
//! type name doubles as its `xsi:type` value. Groups are declared with
//! [`variant_group!`](crate::variant_group), which also builds the default
//! strategy list the registry is validated against.

use crate::field::XmlRecord;
use crate::registry::VariantStrategy;
use crate::shared::SharedFields;

/// A concrete variant record and its wire discriminator
pub trait Discriminated {
    const TAG: &'static str;
}

/// A closed set of variants sharing one discriminated element
pub trait Variant: Sized + Send + Sync + 'static {
    /// Group name used in error messages
    const GROUP: &'static str;
    /// Every discriminator the protocol defines for this group, supported or not
    const KNOWN_TAGS: &'static [&'static str];
    /// Discriminators this enum can represent
    const TAGS: &'static [&'static str];

    /// Discriminator of this value
    fn tag(&self) -> &'static str;

    /// The variant record, for encoding its fields
    fn body(&self) -> &dyn XmlRecord;

    /// Default strategies, one per representable variant
    fn strategies() -> Vec<VariantStrategy<Self>>;
}

/// A group whose variants carry shared fields outside the discriminated element
pub trait SharedGroup: Variant {
    type Shared: SharedFields;
    /// Local name of the discriminated element
    const ELEMENT: &'static str;

    fn shared(&self) -> &Self::Shared;
    fn shared_mut(&mut self) -> &mut Self::Shared;
}

/// Declare a variant group enum
///
/// ```rust
/// use aw_protocol::{variant_group, xml_record};
///
/// xml_record! {
///     pub struct Circle { "radius" => radius: f64 }
/// }
/// xml_record! {
///     pub struct Square { "side" => side: f64 }
/// }
///
/// variant_group! {
///     pub enum Shape {
///         group: "Shape",
///         known: &["Circle", "Square", "Triangle"],
///         variants { Circle, Square [decode_only] }
///     }
/// }
/// ```
///
/// Adding `shared: Type, element: "name",` after `known` makes the group a
/// [`SharedGroup`]; every variant record must then carry `@shared` of that type.
#[macro_export]
macro_rules! variant_group {
    (@strategy $name:ident, $variant:ident, decode_only) => {
        $crate::registry::VariantStrategy::<$name>::decode_only::<$variant>()
    };
    (@strategy $name:ident, $variant:ident, ) => {
        $crate::registry::VariantStrategy::<$name>::full::<$variant>()
    };
    (
        @base
        $(#[$meta:meta])*
        $vis:vis enum $name:ident,
        $group:literal,
        $known:expr,
        { $($variant:ident $([$mode:ident])?),+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $($variant($variant),)+
        }

        $(
            impl $crate::group::Discriminated for $variant {
                const TAG: &'static str = stringify!($variant);
            }

            impl From<$variant> for $name {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )+

        impl $crate::group::Variant for $name {
            const GROUP: &'static str = $group;
            const KNOWN_TAGS: &'static [&'static str] = $known;
            const TAGS: &'static [&'static str] = &[$(stringify!($variant)),+];

            fn tag(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => <$variant as $crate::group::Discriminated>::TAG,)+
                }
            }

            fn body(&self) -> &dyn $crate::field::XmlRecord {
                match self {
                    $(Self::$variant(v) => v as &dyn $crate::field::XmlRecord,)+
                }
            }

            fn strategies() -> Vec<$crate::registry::VariantStrategy<Self>> {
                vec![$($crate::variant_group!(@strategy $name, $variant, $($mode)?)),+]
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            group: $group:literal,
            known: $known:expr,
            shared: $shared_ty:ty,
            element: $element:literal,
            variants { $($variant:ident $([$mode:ident])?),+ $(,)? }
        }
    ) => {
        $crate::variant_group!(
            @base $(#[$meta])* $vis enum $name, $group, $known,
            { $($variant $([$mode])?),+ }
        );

        impl $crate::group::SharedGroup for $name {
            type Shared = $shared_ty;
            const ELEMENT: &'static str = $element;

            fn shared(&self) -> &$shared_ty {
                match self {
                    $(Self::$variant(v) => $crate::shared::CarriesShared::shared(v),)+
                }
            }

            fn shared_mut(&mut self) -> &mut $shared_ty {
                match self {
                    $(Self::$variant(v) => $crate::shared::CarriesShared::shared_mut(v),)+
                }
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            group: $group:literal,
            known: $known:expr,
            variants { $($variant:ident $([$mode:ident])?),+ $(,)? }
        }
    ) => {
        $crate::variant_group!(
            @base $(#[$meta])* $vis enum $name, $group, $known,
            { $($variant $([$mode])?),+ }
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::VariantRegistry;
    use crate::CodecError;

    fn routing_error<T>(result: Result<T, CodecError>) -> CodecError {
        match result {
            Ok(_) => panic!("expected a routing error"),
            Err(e) => e,
        }
    }

    crate::xml_record! {
        pub struct Circle {
            "radius" => radius: f64,
        }
    }

    crate::xml_record! {
        pub struct Square {
            "side" => side: f64,
        }
    }

    crate::variant_group! {
        pub enum Shape {
            group: "Shape",
            known: &["Circle", "Square", "Triangle"],
            variants { Circle, Square [decode_only] }
        }
    }

    #[test]
    fn test_tags_follow_type_names() {
        assert_eq!(Circle::TAG, "Circle");
        assert_eq!(Shape::TAGS, &["Circle", "Square"]);
        assert_eq!(Shape::from(Square { side: 1.0 }).tag(), "Square");
    }

    #[test]
    fn test_default_strategies_respect_modes() {
        let registry = VariantRegistry::<Shape>::new().unwrap();
        assert!(registry.can_decode("Circle"));
        assert!(registry.can_encode("Circle"));
        assert!(registry.can_decode("Square"));
        assert!(!registry.can_encode("Square"));
        assert_eq!(registry.tags(), vec!["Circle", "Square"]);
    }

    #[test]
    fn test_registry_routing_errors() {
        let registry = VariantRegistry::<Shape>::new().unwrap();
        let err = routing_error(registry.encoder("Square"));
        assert!(err.is_not_implemented());
        assert_eq!(err.variant_tag(), Some("Square"));

        assert!(routing_error(registry.decoder("Triangle")).is_not_implemented());

        let err = routing_error(registry.decoder("Hexagon"));
        assert!(matches!(err, CodecError::UnknownVariant { group: "Shape", .. }));
    }

    #[test]
    fn test_registry_rejects_incomplete_strategy_list() {
        let err = VariantRegistry::<Shape>::from_strategies(vec![
            VariantStrategy::full::<Circle>(),
        ])
        .unwrap_err();
        assert!(matches!(err, CodecError::Registry { .. }));
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let err = VariantRegistry::<Shape>::from_strategies(vec![
            VariantStrategy::full::<Circle>(),
            VariantStrategy::full::<Square>(),
            VariantStrategy::decode_only::<Circle>(),
        ])
        .unwrap_err();
        assert!(matches!(err, CodecError::Registry { .. }));
    }

    #[test]
    fn test_registry_rejects_unknown_tag() {
        let err = VariantRegistry::<Shape>::from_strategies(vec![
            VariantStrategy::full::<Circle>(),
            VariantStrategy::full::<Square>(),
            VariantStrategy::custom("Hexagon", None, None),
        ])
        .unwrap_err();
        assert!(matches!(err, CodecError::Registry { ref reason, .. } if reason.contains("Hexagon")));
    }
}

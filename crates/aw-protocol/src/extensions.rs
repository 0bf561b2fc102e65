//! Extension settings and the `ExtensionFeedItem` group
//!
//! An extension setting holds any number of `extensions` elements, each one a
//! feed item discriminated by `xsi:type`. Unlike ad group ads there are no
//! shared sibling fields, so each item is decoded on its own.

use tracing::debug;

use crate::codec::PolymorphicCodec;
use crate::error::CodecError;
use crate::field::XmlField;
use crate::xml::{StartTag, XmlReader, XmlWriter};
use crate::{variant_group, xml_record};

pub use crate::ads::{CustomParameters, PolicyTopicEntry};

/// Every feed item type the protocol defines for extension settings
pub const EXTENSION_FEED_ITEM_TYPES: &[&str] = &[
    "AffiliateLocationFeedItem",
    "AppFeedItem",
    "CallFeedItem",
    "CalloutFeedItem",
    "LocationFeedItem",
    "MessageFeedItem",
    "PriceFeedItem",
    "PromotionFeedItem",
    "ReviewFeedItem",
    "SitelinkFeedItem",
    "StructuredSnippetFeedItem",
];

xml_record! {
    pub struct FeedItemDevicePreference {
        "devicePreference" => device_preference: i64,
    }
}

xml_record! {
    pub struct FeedItemSchedule {
        "dayOfWeek" => day_of_week: String,
        "startHour" => start_hour: i32,
        "startMinute" => start_minute: String,
        "endHour" => end_hour: i32,
        "endMinute" => end_minute: String,
    }
}

xml_record! {
    pub struct FeedItemScheduling {
        "feedItemSchedules" => schedules: Vec<FeedItemSchedule>,
    }
}

xml_record! {
    pub struct FeedItemCampaignTargeting {
        "TargetingCampaignId" => campaign_id: i64,
    }
}

xml_record! {
    pub struct FeedItemAdGroupTargeting {
        "TargetingAdGroupId" => ad_group_id: i64,
    }
}

xml_record! {
    pub struct Keyword {
        "id" => id: i64,
        "type" => criterion_type: String,
        "text" => text: String,
        "matchType" => match_type: String,
        "Criterion.Type" => criterion_subtype: String,
    }
}

xml_record! {
    pub struct Location {
        "id" => id: i64,
        "type" => criterion_type: String,
        "locationName" => location_name: String,
        "displayType" => display_type: String,
        "targetingStatus" => targeting_status: String,
        "Criterion.Type" => criterion_subtype: String,
    }
}

xml_record! {
    pub struct FeedItemGeoRestriction {
        "geoRestriction" => geo_restriction: String,
    }
}

xml_record! {
    /// Review outcome for one feed item under one feed mapping
    pub struct FeedItemPolicySummary {
        "policyTopicEntries" => policy_topic_entries: Vec<PolicyTopicEntry>,
        "reviewState" => review_state: String,
        "denormalizedStatus" => denormalized_status: String,
        "combinedApprovalStatus" => combined_approval_status: String,
        "feedMappingId" => feed_mapping_id: i64,
        "validationStatus" => validation_status: String,
        "qualityApprovalStatus" => quality_approval_status: String,
    }
}

xml_record! {
    pub struct UrlList {
        "urls" => urls: Vec<String>,
    }
}

xml_record! {
    /// Fields every extension feed item inherits
    pub struct ExtensionFeedItemBase {
        "feedId" => feed_id: i64,
        "feedItemId" => feed_item_id: i64,
        "status" => status: String,
        "feedType" => feed_type: String,
        "startTime" => start_time: String,
        "endTime" => end_time: String,
        "devicePreference" => device_preference: Option<FeedItemDevicePreference>,
        "scheduling" => scheduling: Option<FeedItemScheduling>,
        "campaignTargeting" => campaign_targeting: Option<FeedItemCampaignTargeting>,
        "adGroupTargeting" => ad_group_targeting: Option<FeedItemAdGroupTargeting>,
        "keywordTargeting" => keyword_targeting: Option<Keyword>,
        "geoTargeting" => geo_targeting: Option<Location>,
        "geoTargetingRestriction" => geo_targeting_restriction: Option<FeedItemGeoRestriction>,
        "policySummaries" => policy_summaries: Vec<FeedItemPolicySummary>,
        "ExtensionFeedItem.Type" => item_type: String,
    }
}

xml_record! {
    /// A call extension
    pub struct CallFeedItem {
        @flatten base: ExtensionFeedItemBase;
        "callPhoneNumber" => call_phone_number: String,
        "callCountryCode" => call_country_code: String,
        "callTracking" => call_tracking: bool,
        "callConversionType" => call_conversion_type: Option<CallConversionType>,
        "disableCallConversionTracking" => disable_call_conversion_tracking: bool,
    }
}

xml_record! {
    pub struct CallConversionType {
        "conversionTypeId" => conversion_type_id: i64,
    }
}

xml_record! {
    /// A sitelink extension
    pub struct SitelinkFeedItem {
        @flatten base: ExtensionFeedItemBase;
        "sitelinkText" => sitelink_text: String,
        "sitelinkUrl" => sitelink_url: String,
        "sitelinkLine2" => sitelink_line2: String,
        "sitelinkLine3" => sitelink_line3: String,
        "sitelinkFinalUrls" => sitelink_final_urls: Option<UrlList>,
        "sitelinkFinalMobileUrls" => sitelink_final_mobile_urls: Option<UrlList>,
        "sitelinkTrackingUrlTemplate" => sitelink_tracking_url_template: String,
        "sitelinkFinalUrlSuffix" => sitelink_final_url_suffix: String,
        "sitelinkUrlCustomParameters" => sitelink_url_custom_parameters: Option<CustomParameters>,
    }
}

variant_group! {
    /// One extension inside an extension setting
    pub enum ExtensionFeedItem {
        group: "ExtensionFeedItem",
        known: EXTENSION_FEED_ITEM_TYPES,
        variants { CallFeedItem, SitelinkFeedItem }
    }
}

impl ExtensionFeedItem {
    /// Fields inherited by every feed item type
    pub fn base(&self) -> &ExtensionFeedItemBase {
        match self {
            Self::CallFeedItem(item) => &item.base,
            Self::SitelinkFeedItem(item) => &item.base,
        }
    }
}

/// Codec over the supported feed item types
pub fn extension_codec() -> Result<PolymorphicCodec<ExtensionFeedItem>, CodecError> {
    PolymorphicCodec::new()
}

/// Which extensions serve at a customer, campaign or ad group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionSetting {
    /// `DESKTOP`, `MOBILE` or `NONE`
    pub platform_restrictions: String,
    pub extensions: Vec<ExtensionFeedItem>,
}

impl ExtensionSetting {
    /// Decode the extension setting element `start`
    pub fn decode(
        codec: &PolymorphicCodec<ExtensionFeedItem>,
        reader: &mut XmlReader<'_>,
        start: &StartTag,
    ) -> Result<Self, CodecError> {
        let mut setting = Self::default();
        if start.is_empty() {
            return Ok(setting);
        }
        while let Some(child) = reader.next_child()? {
            match child.name() {
                "platformRestrictions" => {
                    setting.platform_restrictions.read_into(reader, &child)?;
                }
                "extensions" => setting.extensions.push(codec.decode_element(reader, &child)?),
                other => {
                    debug!("Skipping unknown element <{}> in extension setting", other);
                    reader.skip(&child)?;
                }
            }
        }
        Ok(setting)
    }

    /// Decode a document whose root element is an extension setting
    pub fn decode_slice(
        codec: &PolymorphicCodec<ExtensionFeedItem>,
        xml: &[u8],
    ) -> Result<Self, CodecError> {
        let mut reader = XmlReader::new(xml);
        let root = reader.root()?;
        Self::decode(codec, &mut reader, &root)
    }

    /// Encode as `element`, one discriminated `extensions` child per item
    pub fn encode(
        &self,
        codec: &PolymorphicCodec<ExtensionFeedItem>,
        element: &str,
        writer: &mut XmlWriter,
    ) -> Result<(), CodecError> {
        writer.start(element)?;
        if !self.platform_restrictions.is_omitted() {
            self.platform_restrictions
                .write_as(writer, "platformRestrictions")?;
        }
        for item in &self.extensions {
            codec.encode_element(item, "extensions", writer)?;
        }
        writer.end(element)
    }
}

/// Extension setting attached to one campaign
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignExtensionSetting {
    pub campaign_id: i64,
    /// `SITELINK`, `CALL`, ...
    pub extension_type: String,
    pub extension_setting: ExtensionSetting,
}

impl CampaignExtensionSetting {
    /// Decode one `entries` element of a campaign extension setting page
    pub fn decode(
        codec: &PolymorphicCodec<ExtensionFeedItem>,
        reader: &mut XmlReader<'_>,
        start: &StartTag,
    ) -> Result<Self, CodecError> {
        let mut entry = Self::default();
        if start.is_empty() {
            return Ok(entry);
        }
        while let Some(child) = reader.next_child()? {
            match child.name() {
                "campaignId" => entry.campaign_id.read_into(reader, &child)?,
                "extensionType" => entry.extension_type.read_into(reader, &child)?,
                "extensionSetting" => {
                    entry.extension_setting = ExtensionSetting::decode(codec, reader, &child)?;
                }
                _ => reader.skip(&child)?,
            }
        }
        Ok(entry)
    }
}

//! The `AdGroupAd` group
//!
//! An ad group ad wraps one concrete ad in an `ad` element discriminated by
//! `xsi:type`. The owning ad group id precedes it; status, policy, labels,
//! base ids and ad strength follow it.
//!
//! ```text
//! <operand>
//!   <adGroupId>123</adGroupId>
//!   <ad xsi:type="ExpandedTextAd">...</ad>
//!   <status>ENABLED</status>
//!   <labels>...</labels>
//! </operand>
//! ```

use crate::codec::PolymorphicCodec;
use crate::error::CodecError;
use crate::{shared_fields, variant_group, xml_record};

/// Every ad type the protocol defines
pub const AD_TYPES: &[&str] = &[
    "Ad",
    "CallOnlyAd",
    "DeprecatedAd",
    "DynamicSearchAd",
    "ExpandedDynamicSearchAd",
    "ExpandedTextAd",
    "GmailAd",
    "GoalOptimizedShoppingAd",
    "ImageAd",
    "MultiAssetResponsiveDisplayAd",
    "ProductAd",
    "ResponsiveDisplayAd",
    "ResponsiveSearchAd",
    "RichMediaAd",
    "ShowcaseAd",
    "TemplateAd",
    "TextAd",
    "ThirdPartyRedirectAd",
    "UniversalAppAd",
];

// ============================================================================
// Supporting records
// ============================================================================

xml_record! {
    /// A label attached to an ad group ad
    pub struct Label {
        "id" => id: i64,
        "name" => name: String,
        "status" => status: String,
        "Label.Type" => label_type: String,
    }
}

xml_record! {
    pub struct PolicyTopicEntry {
        "policyTopicEntryType" => entry_type: String,
        "policyTopicId" => topic_id: String,
        "policyTopicName" => topic_name: String,
        "policyTopicHelpCenterUrl" => help_center_url: String,
    }
}

xml_record! {
    /// Review outcome for an ad
    pub struct AdGroupAdPolicySummary {
        "policyTopicEntries" => policy_topic_entries: Vec<PolicyTopicEntry>,
        "reviewState" => review_state: String,
        "denormalizedStatus" => denormalized_status: String,
        "combinedApprovalStatus" => combined_approval_status: String,
    }
}

xml_record! {
    pub struct AdStrengthInfo {
        "adStrength" => ad_strength: String,
    }
}

xml_record! {
    pub struct CustomParameter {
        "key" => key: String,
        "value" => value: String,
        "isRemove" => is_remove: bool,
    }
}

xml_record! {
    /// Values substituted into tracking URL templates
    pub struct CustomParameters {
        "parameters" => parameters: Vec<CustomParameter>,
        "doReplace" => do_replace: bool,
    }
}

xml_record! {
    pub struct Dimensions {
        "width" => width: i32,
        "height" => height: i32,
    }
}

xml_record! {
    pub struct DimensionsEntry {
        "key" => key: String,
        "value" => value: Option<Dimensions>,
    }
}

xml_record! {
    /// An image or other uploaded media object
    pub struct Media {
        "mediaId" => media_id: i64,
        "type" => media_type: String,
        "referenceId" => reference_id: String,
        "dimensions" => dimensions: Vec<DimensionsEntry>,
        "mimeType" => mime_type: String,
        "sourceUrl" => source_url: String,
        "name" => name: String,
        "fileSize" => file_size: i64,
        "creationTime" => creation_time: String,
        "Media.Type" => media_subtype: String,
    }
}

xml_record! {
    /// A reusable asset such as a headline text or an image
    pub struct Asset {
        "assetId" => asset_id: i64,
        "assetName" => asset_name: String,
        "assetSubtype" => asset_subtype: String,
        "assetStatus" => asset_status: String,
        "assetText" => asset_text: String,
        "youTubeVideoId" => youtube_video_id: String,
        "Asset.Type" => asset_type: String,
    }
}

xml_record! {
    pub struct AssetLink {
        "asset" => asset: Option<Asset>,
        "pinnedField" => pinned_field: String,
    }
}

xml_record! {
    pub struct GmailTeaser {
        "headline" => headline: String,
        "description" => description: String,
        "businessName" => business_name: String,
        "logoImage" => logo_image: Option<Media>,
    }
}

xml_record! {
    pub struct DisplayCallToAction {
        "text" => text: String,
        "textColor" => text_color: String,
        "urlId" => url_id: String,
    }
}

xml_record! {
    pub struct AdUnionId {
        "id" => id: i64,
        "AdUnionId.Type" => union_type: String,
    }
}

xml_record! {
    pub struct TemplateElementField {
        "name" => name: String,
        "type" => field_type: String,
        "fieldText" => field_text: String,
        "fieldMedia" => field_media: Option<Media>,
    }
}

xml_record! {
    pub struct TemplateElement {
        "uniqueName" => unique_name: String,
        "fields" => fields: Vec<TemplateElementField>,
    }
}

xml_record! {
    /// Fields every ad type inherits
    pub struct AdBase {
        "id" => id: i64,
        "url" => url: String,
        "displayUrl" => display_url: String,
        "finalUrls" => final_urls: Vec<String>,
        "finalMobileUrls" => final_mobile_urls: Vec<String>,
        "trackingUrlTemplate" => tracking_url_template: String,
        "finalUrlSuffix" => final_url_suffix: String,
        "urlCustomParameters" => url_custom_parameters: Option<CustomParameters>,
        "automated" => automated: bool,
        "devicePreference" => device_preference: i64,
        "systemManagedEntitySource" => system_managed_entity_source: String,
        "Ad.Type" => ad_type: String,
    }
}

shared_fields! {
    /// Fields of an ad group ad that sit outside the `ad` element
    pub struct AdGroupAdShared {
        leading {
            "adGroupId" => ad_group_id: i64,
        }
        trailing {
            "status" => status: String,
            "policySummary" => policy_summary: Option<AdGroupAdPolicySummary>,
            "labels" => labels: Vec<Label>,
            "baseCampaignId" => base_campaign_id: i64,
            "baseAdGroupId" => base_ad_group_id: i64,
            "adStrengthInfo" => ad_strength_info: Option<AdStrengthInfo>,
        }
    }
}

// ============================================================================
// Ad types
// ============================================================================

xml_record! {
    /// Generic ad carrying only the inherited fields
    pub struct Ad {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
    }
}

xml_record! {
    pub struct TextAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "headline" => headline: String,
        "description1" => description1: String,
        "description2" => description2: String,
    }
}

xml_record! {
    pub struct ExpandedTextAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "headlinePart1" => headline_part1: String,
        "headlinePart2" => headline_part2: String,
        "headlinePart3" => headline_part3: String,
        "description" => description: String,
        "description2" => description2: String,
        "path1" => path1: String,
        "path2" => path2: String,
    }
}

xml_record! {
    /// Display ad made of a single image; read-only
    pub struct ImageAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "image" => image: Option<Media>,
        "name" => name: String,
        "adToCopyImageFrom" => ad_to_copy_image_from: i64,
    }
}

xml_record! {
    /// Ad built from a gallery template; read-only
    pub struct TemplateAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "templateId" => template_id: i64,
        "adUnionId" => ad_union_id: Option<AdUnionId>,
        "templateElements" => template_elements: Vec<TemplateElement>,
        "dimensions" => dimensions: Option<Dimensions>,
        "name" => name: String,
        "duration" => duration: i32,
        "originAdId" => origin_ad_id: i64,
    }
}

xml_record! {
    pub struct DynamicSearchAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "description1" => description1: String,
        "description2" => description2: String,
    }
}

xml_record! {
    pub struct ExpandedDynamicSearchAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "description" => description: String,
        "description2" => description2: String,
    }
}

xml_record! {
    pub struct ResponsiveDisplayAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "marketingImage" => marketing_image: Option<Media>,
        "logoImage" => logo_image: Option<Media>,
        "squareMarketingImage" => square_marketing_image: Option<Media>,
        "shortHeadline" => short_headline: String,
        "longHeadline" => long_headline: String,
        "description" => description: String,
        "businessName" => business_name: String,
        "mainColor" => main_color: String,
        "accentColor" => accent_color: String,
        "allowFlexibleColor" => allow_flexible_color: bool,
        "callToActionText" => call_to_action_text: String,
        "formatSetting" => format_setting: String,
    }
}

xml_record! {
    pub struct MultiAssetResponsiveDisplayAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "marketingImages" => marketing_images: Vec<AssetLink>,
        "squareMarketingImages" => square_marketing_images: Vec<AssetLink>,
        "logoImages" => logo_images: Vec<AssetLink>,
        "landscapeLogoImages" => landscape_logo_images: Vec<AssetLink>,
        "headlines" => headlines: Vec<AssetLink>,
        "longHeadline" => long_headline: Option<AssetLink>,
        "descriptions" => descriptions: Vec<AssetLink>,
        "youTubeVideos" => youtube_videos: Vec<AssetLink>,
        "businessName" => business_name: String,
        "mainColor" => main_color: String,
        "accentColor" => accent_color: String,
        "allowFlexibleColor" => allow_flexible_color: bool,
        "callToActionText" => call_to_action_text: String,
        "formatSetting" => format_setting: String,
    }
}

xml_record! {
    pub struct ProductAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "promotionLine" => promotion_line: String,
    }
}

xml_record! {
    pub struct GoalOptimizedShoppingAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
    }
}

xml_record! {
    pub struct CallOnlyAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "countryCode" => country_code: String,
        "phoneNumber" => phone_number: String,
        "businessName" => business_name: String,
        "description1" => description1: String,
        "description2" => description2: String,
        "callTracked" => call_tracked: bool,
        "disableCallConversion" => disable_call_conversion: bool,
        "conversionTypeId" => conversion_type_id: i64,
        "phoneNumberVerificationUrl" => phone_number_verification_url: String,
    }
}

xml_record! {
    pub struct ResponsiveSearchAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "headlines" => headlines: Vec<AssetLink>,
        "descriptions" => descriptions: Vec<AssetLink>,
        "path1" => path1: String,
        "path2" => path2: String,
    }
}

xml_record! {
    pub struct UniversalAppAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "headlines" => headlines: Vec<AssetLink>,
        "descriptions" => descriptions: Vec<AssetLink>,
        "mandatoryAdText" => mandatory_ad_text: Option<AssetLink>,
        "images" => images: Vec<AssetLink>,
        "videos" => videos: Vec<AssetLink>,
        "html5MediaBundles" => html5_media_bundles: Vec<AssetLink>,
    }
}

xml_record! {
    pub struct ShowcaseAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "name" => name: String,
        "headline" => headline: String,
        "description" => description: String,
        "collapsedImage" => collapsed_image: Option<Media>,
        "expandedImage" => expanded_image: Option<Media>,
    }
}

xml_record! {
    pub struct RichMediaAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "name" => name: String,
        "dimensions" => dimensions: Option<Dimensions>,
        "snippet" => snippet: String,
        "impressionBeaconUrl" => impression_beacon_url: String,
        "adDuration" => ad_duration: i32,
        "certifiedVendorFormatId" => certified_vendor_format_id: i64,
        "sourceUrl" => source_url: String,
        "richMediaAdType" => rich_media_ad_type: String,
        "adAttributes" => ad_attributes: Vec<String>,
    }
}

xml_record! {
    /// Rich media ad served from a third-party ad server
    pub struct ThirdPartyRedirectAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "name" => name: String,
        "dimensions" => dimensions: Option<Dimensions>,
        "snippet" => snippet: String,
        "impressionBeaconUrl" => impression_beacon_url: String,
        "isCookieTargeted" => is_cookie_targeted: bool,
        "isUserInterestTargeted" => is_user_interest_targeted: bool,
        "isTagged" => is_tagged: bool,
        "videoTypes" => video_types: Vec<String>,
        "expandingDirections" => expanding_directions: Vec<String>,
    }
}

xml_record! {
    pub struct GmailAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "teaser" => teaser: Option<GmailTeaser>,
        "headerImage" => header_image: Option<Media>,
        "marketingImage" => marketing_image: Option<Media>,
        "marketingImageHeadline" => marketing_image_headline: String,
        "marketingImageDescription" => marketing_image_description: String,
        "marketingImageDisplayCallToAction" => marketing_image_display_call_to_action: Option<DisplayCallToAction>,
        "productVideoList" => product_video_list: Vec<Media>,
    }
}

xml_record! {
    /// Ad of a retired format, surfaced only so listings stay complete
    pub struct DeprecatedAd {
        @shared shared: AdGroupAdShared;
        @flatten base: AdBase;
        "name" => name: String,
        "type" => deprecated_type: String,
    }
}

variant_group! {
    /// An ad and the ad group membership data around it
    pub enum AdGroupAd {
        group: "AdGroupAd",
        known: AD_TYPES,
        shared: AdGroupAdShared,
        element: "ad",
        variants {
            TextAd,
            ExpandedTextAd,
            Ad,
            ImageAd [decode_only],
            TemplateAd [decode_only],
            DynamicSearchAd,
            ExpandedDynamicSearchAd,
            ResponsiveDisplayAd,
            MultiAssetResponsiveDisplayAd,
            ProductAd,
            GoalOptimizedShoppingAd,
            CallOnlyAd,
            ResponsiveSearchAd,
            UniversalAppAd,
            ShowcaseAd,
            RichMediaAd,
            ThirdPartyRedirectAd,
            GmailAd,
            DeprecatedAd,
        }
    }
}

impl AdGroupAd {
    /// Fields inherited by every ad type
    pub fn base(&self) -> &AdBase {
        match self {
            Self::TextAd(ad) => &ad.base,
            Self::ExpandedTextAd(ad) => &ad.base,
            Self::Ad(ad) => &ad.base,
            Self::ImageAd(ad) => &ad.base,
            Self::TemplateAd(ad) => &ad.base,
            Self::DynamicSearchAd(ad) => &ad.base,
            Self::ExpandedDynamicSearchAd(ad) => &ad.base,
            Self::ResponsiveDisplayAd(ad) => &ad.base,
            Self::MultiAssetResponsiveDisplayAd(ad) => &ad.base,
            Self::ProductAd(ad) => &ad.base,
            Self::GoalOptimizedShoppingAd(ad) => &ad.base,
            Self::CallOnlyAd(ad) => &ad.base,
            Self::ResponsiveSearchAd(ad) => &ad.base,
            Self::UniversalAppAd(ad) => &ad.base,
            Self::ShowcaseAd(ad) => &ad.base,
            Self::RichMediaAd(ad) => &ad.base,
            Self::ThirdPartyRedirectAd(ad) => &ad.base,
            Self::GmailAd(ad) => &ad.base,
            Self::DeprecatedAd(ad) => &ad.base,
        }
    }

    /// Id of the ad itself
    pub fn ad_id(&self) -> i64 {
        self.base().id
    }

    /// Id of the owning ad group
    pub fn ad_group_id(&self) -> i64 {
        crate::group::SharedGroup::shared(self).ad_group_id
    }
}

/// Codec over the full ad type table
pub fn ad_codec() -> Result<PolymorphicCodec<AdGroupAd>, CodecError> {
    PolymorphicCodec::new()
}

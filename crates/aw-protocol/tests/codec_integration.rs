//! Integration tests for the polymorphic codec
//!
//! These tests drive the public API with realistic SOAP fragments:
//! - Round-trips for every encodable ad type
//! - Shared fields placed before, after and around the `ad` element
//! - Routing failures for unknown and unsupported discriminators
//! - Result pages inside full response envelopes

use aw_protocol::ads::{
    Ad, AdBase, AdGroupAdPolicySummary, AssetLink, Asset, CallOnlyAd, CustomParameter,
    CustomParameters, DeprecatedAd, Dimensions, DynamicSearchAd, ExpandedDynamicSearchAd,
    ExpandedTextAd, GmailAd, GmailTeaser, GoalOptimizedShoppingAd, Label, Media,
    MultiAssetResponsiveDisplayAd, PolicyTopicEntry, ProductAd, ResponsiveDisplayAd,
    ResponsiveSearchAd, RichMediaAd, ShowcaseAd, TextAd, ThirdPartyRedirectAd, UniversalAppAd,
};
use aw_protocol::{ad_codec, AdGroupAd, AdGroupAdShared, CodecError, SharedGroup, Variant};

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use super::*;

    pub const XSI: &str = r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#;

    pub fn shared(ad_group_id: i64) -> AdGroupAdShared {
        AdGroupAdShared {
            ad_group_id,
            status: "ENABLED".into(),
            labels: vec![Label {
                id: 3,
                name: "q4".into(),
                ..Default::default()
            }],
            base_campaign_id: 900,
            ..Default::default()
        }
    }

    pub fn base(id: i64) -> AdBase {
        AdBase {
            id,
            final_urls: vec!["https://example.com/landing".into()],
            url_custom_parameters: Some(CustomParameters {
                parameters: vec![CustomParameter {
                    key: "season".into(),
                    value: "winter".into(),
                    is_remove: false,
                }],
                do_replace: true,
            }),
            ..Default::default()
        }
    }

    pub fn text_asset(text: &str) -> AssetLink {
        AssetLink {
            asset: Some(Asset {
                asset_text: text.into(),
                asset_type: "TextAsset".into(),
                ..Default::default()
            }),
            pinned_field: String::new(),
        }
    }

    pub fn image(media_id: i64) -> Media {
        Media {
            media_id,
            media_type: "IMAGE".into(),
            ..Default::default()
        }
    }

    /// One value for every ad type that can be encoded
    pub fn encodable_ads() -> Vec<AdGroupAd> {
        vec![
            TextAd {
                shared: shared(1),
                base: base(101),
                headline: "Fish & Chips".into(),
                description1: "Best in <town>".into(),
                description2: "Open late".into(),
            }
            .into(),
            ExpandedTextAd {
                shared: shared(2),
                base: base(102),
                headline_part1: "Part one".into(),
                headline_part2: "Part two".into(),
                description: "Details".into(),
                path1: "deals".into(),
                ..Default::default()
            }
            .into(),
            Ad {
                shared: shared(3),
                base: base(103),
            }
            .into(),
            DynamicSearchAd {
                shared: shared(4),
                base: base(104),
                description1: "Dynamic".into(),
                description2: "Search".into(),
            }
            .into(),
            ExpandedDynamicSearchAd {
                shared: shared(5),
                base: base(105),
                description: "Expanded".into(),
                description2: "Dynamic".into(),
            }
            .into(),
            ResponsiveDisplayAd {
                shared: shared(6),
                base: base(106),
                marketing_image: Some(image(61)),
                short_headline: "Short".into(),
                long_headline: "A longer headline".into(),
                business_name: "Acme".into(),
                allow_flexible_color: true,
                ..Default::default()
            }
            .into(),
            MultiAssetResponsiveDisplayAd {
                shared: shared(7),
                base: base(107),
                headlines: vec![text_asset("One"), text_asset("Two")],
                long_headline: Some(text_asset("Long")),
                descriptions: vec![text_asset("Desc")],
                business_name: "Acme".into(),
                ..Default::default()
            }
            .into(),
            ProductAd {
                shared: shared(8),
                base: base(108),
                promotion_line: "Free shipping".into(),
            }
            .into(),
            GoalOptimizedShoppingAd {
                shared: shared(9),
                base: base(109),
            }
            .into(),
            CallOnlyAd {
                shared: shared(10),
                base: base(110),
                country_code: "GB".into(),
                phone_number: "020 7946 0000".into(),
                call_tracked: true,
                conversion_type_id: 12,
                ..Default::default()
            }
            .into(),
            ResponsiveSearchAd {
                shared: shared(11),
                base: base(111),
                headlines: vec![text_asset("H1"), text_asset("H2"), text_asset("H3")],
                descriptions: vec![text_asset("D1")],
                path1: "shop".into(),
                path2: "now".into(),
            }
            .into(),
            UniversalAppAd {
                shared: shared(12),
                base: base(112),
                headlines: vec![text_asset("Install")],
                mandatory_ad_text: Some(text_asset("Play now")),
                ..Default::default()
            }
            .into(),
            ShowcaseAd {
                shared: shared(13),
                base: base(113),
                name: "Showcase".into(),
                collapsed_image: Some(image(131)),
                expanded_image: Some(image(132)),
                ..Default::default()
            }
            .into(),
            RichMediaAd {
                shared: shared(14),
                base: base(114),
                name: "Rich".into(),
                dimensions: Some(Dimensions {
                    width: 728,
                    height: 90,
                }),
                ad_attributes: vec!["ROLL_OVER_TO_EXPAND".into()],
                ..Default::default()
            }
            .into(),
            ThirdPartyRedirectAd {
                shared: shared(15),
                base: base(115),
                name: "Redirect".into(),
                is_tagged: true,
                video_types: vec!["FLASH".into(), "MP4".into()],
                ..Default::default()
            }
            .into(),
            GmailAd {
                shared: shared(16),
                base: base(116),
                teaser: Some(GmailTeaser {
                    headline: "Sale".into(),
                    business_name: "Acme".into(),
                    logo_image: Some(image(161)),
                    ..Default::default()
                }),
                marketing_image_headline: "Everything must go".into(),
                ..Default::default()
            }
            .into(),
            DeprecatedAd {
                shared: shared(17),
                base: base(117),
                name: "Legacy".into(),
                deprecated_type: "VIDEO_AD".into(),
            }
            .into(),
        ]
    }
}

// ============================================================================
// Round-Trip Tests
// ============================================================================

mod round_trip_tests {
    use super::*;

    #[test]
    fn every_encodable_ad_type_round_trips() {
        let codec = ad_codec().unwrap();
        let ads = helpers::encodable_ads();

        let encodable: Vec<_> = AdGroupAd::TAGS
            .iter()
            .filter(|tag| codec.registry().can_encode(tag))
            .collect();
        assert_eq!(ads.len(), encodable.len());

        for ad in ads {
            let bytes = codec.encode_to_vec(&ad, "operand").unwrap();
            let decoded = codec.decode_slice(&bytes).unwrap();
            assert_eq!(decoded, ad, "{} did not survive a round-trip", ad.tag());
        }
    }

    #[test]
    fn shared_fields_are_placed_around_the_ad() {
        let codec = ad_codec().unwrap();
        let ad = &helpers::encodable_ads()[0];
        let xml = String::from_utf8(codec.encode_to_vec(ad, "operand").unwrap()).unwrap();

        let group_id = xml.find("<adGroupId>").unwrap();
        let ad_start = xml.find("<ad ").unwrap();
        let ad_end = xml.find("</ad>").unwrap();
        let status = xml.find("<status>").unwrap();
        let labels = xml.find("<labels>").unwrap();
        let base_campaign = xml.find("<baseCampaignId>").unwrap();

        assert!(group_id < ad_start);
        assert!(ad_end < status);
        assert!(status < labels);
        assert!(labels < base_campaign);
    }

    #[test]
    fn escaped_text_survives() {
        let codec = ad_codec().unwrap();
        let ad = &helpers::encodable_ads()[0];
        let xml = String::from_utf8(codec.encode_to_vec(ad, "operand").unwrap()).unwrap();
        assert!(xml.contains("Fish &amp; Chips"));
        assert!(xml.contains("Best in &lt;town&gt;"));
    }

    #[test]
    fn group_is_decoded_under_any_root_name() {
        let codec = ad_codec().unwrap();
        let ad = &helpers::encodable_ads()[1];
        let bytes = codec.encode_to_vec(ad, "entries").unwrap();
        assert_eq!(&codec.decode_slice(&bytes).unwrap(), ad);
    }
}

// ============================================================================
// Decode Tests
// ============================================================================

mod decode_tests {
    use super::*;
    use super::helpers::XSI;

    #[test]
    fn shared_fields_after_the_ad_are_merged() {
        let xml = format!(
            r#"<entries {XSI}>
                <ad xsi:type="TextAd"><id>5</id><headline>Late</headline></ad>
                <adGroupId>77</adGroupId>
                <status>PAUSED</status>
            </entries>"#
        );
        let ad = ad_codec().unwrap().decode_slice(xml.as_bytes()).unwrap();
        assert_eq!(ad.ad_group_id(), 77);
        assert_eq!(ad.shared().status, "PAUSED");
        assert_eq!(ad.ad_id(), 5);
    }

    #[test]
    fn policy_summary_is_decoded() {
        let xml = format!(
            r#"<entries {XSI}>
                <adGroupId>1</adGroupId>
                <ad xsi:type="Ad"><id>2</id></ad>
                <policySummary>
                    <policyTopicEntries>
                        <policyTopicEntryType>PROHIBITED</policyTopicEntryType>
                        <policyTopicId>TRADEMARKS</policyTopicId>
                    </policyTopicEntries>
                    <reviewState>REVIEWED</reviewState>
                    <combinedApprovalStatus>DISAPPROVED</combinedApprovalStatus>
                </policySummary>
            </entries>"#
        );
        let ad = ad_codec().unwrap().decode_slice(xml.as_bytes()).unwrap();
        assert_eq!(
            ad.shared().policy_summary,
            Some(AdGroupAdPolicySummary {
                policy_topic_entries: vec![PolicyTopicEntry {
                    entry_type: "PROHIBITED".into(),
                    topic_id: "TRADEMARKS".into(),
                    ..Default::default()
                }],
                review_state: "REVIEWED".into(),
                combined_approval_status: "DISAPPROVED".into(),
                ..Default::default()
            })
        );
    }

    #[test]
    fn prefixed_discriminator_value() {
        let xml = r#"<entries xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:cm="https://adwords.google.com/api/adwords/cm/v201809">
                <cm:adGroupId>1</cm:adGroupId>
                <cm:ad xsi:type="cm:ProductAd"><cm:promotionLine>Sale</cm:promotionLine></cm:ad>
            </entries>"#;
        let ad = ad_codec().unwrap().decode_slice(xml.as_bytes()).unwrap();
        match ad {
            AdGroupAd::ProductAd(product) => assert_eq!(product.promotion_line, "Sale"),
            other => panic!("unexpected variant {other:?}"),
        }
    }

    #[test]
    fn unknown_body_elements_are_skipped() {
        let xml = format!(
            r#"<entries {XSI}>
                <ad xsi:type="TextAd"><futureField><nested>1</nested></futureField><headline>Kept</headline></ad>
            </entries>"#
        );
        let ad = ad_codec().unwrap().decode_slice(xml.as_bytes()).unwrap();
        let AdGroupAd::TextAd(text) = ad else {
            panic!("expected TextAd");
        };
        assert_eq!(text.headline, "Kept");
    }

    #[test]
    fn template_ad_is_readable() {
        let xml = format!(
            r#"<entries {XSI}>
                <ad xsi:type="TemplateAd">
                    <templateId>419</templateId>
                    <templateElements>
                        <uniqueName>adData</uniqueName>
                        <fields><name>headline</name><type>TEXT</type><fieldText>Hi</fieldText></fields>
                    </templateElements>
                    <dimensions><width>300</width><height>250</height></dimensions>
                </ad>
            </entries>"#
        );
        let codec = ad_codec().unwrap();
        let ad = codec.decode_slice(xml.as_bytes()).unwrap();
        let AdGroupAd::TemplateAd(template) = &ad else {
            panic!("expected TemplateAd");
        };
        assert_eq!(template.template_id, 419);
        assert_eq!(template.template_elements[0].fields[0].field_text, "Hi");
        assert!(codec.encode_to_vec(&ad, "operand").unwrap_err().is_not_implemented());
    }
}

// ============================================================================
// Error Tests
// ============================================================================

mod error_tests {
    use super::*;
    use super::helpers::XSI;

    #[test]
    fn unknown_discriminator_names_the_tag() {
        let xml = format!(r#"<entries {XSI}><adGroupId>1</adGroupId><ad xsi:type="HologramAd"/></entries>"#);
        let err = ad_codec().unwrap().decode_slice(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, CodecError::UnknownVariant { group: "AdGroupAd", ref tag } if tag == "HologramAd"));
        assert_eq!(err.to_string(), "unknown AdGroupAd type: HologramAd");
    }

    #[test]
    fn unknown_group_field_is_rejected() {
        let xml = format!(
            r#"<entries {XSI}><ad xsi:type="Ad"/><forwardCompatibilityMap/></entries>"#
        );
        let err = ad_codec().unwrap().decode_slice(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, CodecError::UnknownField { group: "AdGroupAd", .. }));
    }

    #[test]
    fn malformed_shared_field() {
        let xml = format!(
            r#"<entries {XSI}><adGroupId>abc</adGroupId><ad xsi:type="Ad"/></entries>"#
        );
        let err = ad_codec().unwrap().decode_slice(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, CodecError::MalformedField { ref field, .. } if field == "adGroupId"));
    }

    #[test]
    fn truncated_document() {
        let xml = format!(r#"<entries {XSI}><adGroupId>1</adGroupId><ad xsi:type="Ad">"#);
        assert!(ad_codec().unwrap().decode_slice(xml.as_bytes()).is_err());
    }
}

// ============================================================================
// Page Tests
// ============================================================================

mod page_tests {
    use super::*;

    #[test]
    fn page_of_ads_inside_envelope() {
        let codec = ad_codec().unwrap();
        let ads = helpers::encodable_ads();

        let mut body = String::new();
        for ad in &ads[..3] {
            body.push_str(&String::from_utf8(codec.encode_to_vec(ad, "entries").unwrap()).unwrap());
        }
        let envelope = format!(
            concat!(
                r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
                "<soap:Header><ResponseHeader><requestId>abc</requestId></ResponseHeader></soap:Header>",
                "<soap:Body><getResponse><rval><totalNumEntries>40</totalNumEntries>",
                "<Page.Type>AdGroupAdPage</Page.Type>{}</rval></getResponse></soap:Body></soap:Envelope>"
            ),
            body
        );

        let page = codec.decode_page(envelope.as_bytes()).unwrap();
        assert_eq!(page.total_num_entries, 40);
        assert_eq!(page.entries, ads[..3].to_vec());
        assert!(page.has_more(0));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn status() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("ENABLED".to_string()),
            Just("PAUSED".to_string()),
            Just("DISABLED".to_string()),
        ]
    }

    fn wire_text() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 &<>'\"]{0,30}"
    }

    proptest! {
        #[test]
        fn shared_field_order_does_not_matter(
            ad_group_id in 1i64..i64::MAX,
            base_campaign_id in 0i64..1_000_000,
            status in status(),
            label_ids in prop::collection::vec(1i64..10_000, 0..3),
            seed in any::<u64>(),
        ) {
            let mut fragments = vec![
                format!("<adGroupId>{ad_group_id}</adGroupId>"),
                r#"<ad xsi:type="TextAd"><headline>Shuffled</headline></ad>"#.to_string(),
                format!("<status>{status}</status>"),
                format!("<baseCampaignId>{base_campaign_id}</baseCampaignId>"),
            ];
            let labels: String = label_ids
                .iter()
                .map(|id| format!("<labels><id>{id}</id></labels>"))
                .collect();
            fragments.push(labels);

            // Deterministic Fisher-Yates driven by the seed
            let mut state = seed;
            for i in (1..fragments.len()).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state >> 33) as usize % (i + 1);
                fragments.swap(i, j);
            }

            let xml = format!("<entries {}>{}</entries>", helpers::XSI, fragments.concat());
            let ad = ad_codec().unwrap().decode_slice(xml.as_bytes()).unwrap();

            let shared = ad.shared();
            prop_assert_eq!(shared.ad_group_id, ad_group_id);
            prop_assert_eq!(shared.base_campaign_id, base_campaign_id);
            prop_assert_eq!(&shared.status, &status);
            let decoded_ids: Vec<i64> = shared.labels.iter().map(|l| l.id).collect();
            prop_assert_eq!(decoded_ids, label_ids);
            prop_assert_eq!(ad.tag(), "TextAd");
        }

        #[test]
        fn text_fields_round_trip(
            headline in wire_text(),
            description in wire_text(),
            ad_group_id in 0i64..i64::MAX,
        ) {
            let codec = ad_codec().unwrap();
            let ad: AdGroupAd = TextAd {
                shared: AdGroupAdShared { ad_group_id, ..Default::default() },
                headline,
                description1: description,
                ..Default::default()
            }
            .into();
            let bytes = codec.encode_to_vec(&ad, "operand").unwrap();
            prop_assert_eq!(codec.decode_slice(&bytes).unwrap(), ad);
        }
    }
}

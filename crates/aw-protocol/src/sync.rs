//! Account change data returned by the customer sync service
//!
//! A sync `get` answers with a single `rval` describing which campaigns,
//! ad groups and feeds changed in a time window. The records carry ids only;
//! callers fetch the changed entities through the other services.

use tracing::debug;

use crate::error::CodecError;
use crate::field::XmlField;
use crate::page::RESULT_ELEMENT;
use crate::xml::XmlReader;
use crate::xml_record;

xml_record! {
    /// Changes below one ad group
    pub struct AdGroupChangeData {
        "adGroupId" => ad_group_id: i64,
        /// `FIELDS_CHANGED`, `FIELDS_UNCHANGED` or `NEW`
        "adGroupChangeStatus" => change_status: String,
        "changedAds" => changed_ads: Vec<i64>,
        "changedCriteria" => changed_criteria: Vec<i64>,
        "removedCriteria" => removed_criteria: Vec<i64>,
        "changedFeeds" => changed_feeds: Vec<i64>,
        "removedFeeds" => removed_feeds: Vec<i64>,
        "changedAdGroupBidModifierCriteria" => changed_bid_modifier_criteria: Vec<i64>,
        "removedAdGroupBidModifierCriteria" => removed_bid_modifier_criteria: Vec<i64>,
    }
}

xml_record! {
    /// Changes below one campaign
    pub struct CampaignChangeData {
        "campaignId" => campaign_id: i64,
        "campaignChangeStatus" => change_status: String,
        "changedAdGroups" => changed_ad_groups: Vec<AdGroupChangeData>,
        "addedCampaignCriteria" => added_campaign_criteria: Vec<i64>,
        "removedCampaignCriteria" => removed_campaign_criteria: Vec<i64>,
        "changedFeeds" => changed_feeds: Vec<i64>,
        "removedFeeds" => removed_feeds: Vec<i64>,
    }
}

xml_record! {
    /// Changes to one feed's items
    pub struct FeedChangeData {
        "feedId" => feed_id: i64,
        "feedChangeStatus" => change_status: String,
        "changedFeedItems" => changed_feed_items: Vec<i64>,
        "removedFeedItems" => removed_feed_items: Vec<i64>,
    }
}

xml_record! {
    /// Everything that changed in an account since the requested time
    pub struct CustomerChangeData {
        "changedCampaigns" => changed_campaigns: Vec<CampaignChangeData>,
        "changedFeeds" => changed_feeds: Vec<FeedChangeData>,
        /// Server time of the newest change, to start the next sync from
        "lastChangeTimestamp" => last_change_timestamp: String,
    }
}

/// Decode the `rval` of a customer sync `get` response
///
/// A response without `rval` means nothing changed.
pub fn decode_change_data(xml: &[u8]) -> Result<CustomerChangeData, CodecError> {
    let mut reader = XmlReader::new(xml);
    let mut data = CustomerChangeData::default();
    match reader.descend_to(RESULT_ELEMENT)? {
        Some(rval) => data.read_into(&mut reader, &rval)?,
        None => debug!("Sync response has no <{}>", RESULT_ELEMENT),
    }
    Ok(data)
}

//! Extraction of canonical listing records from the provider's documents.
//!
//! The mobile API returns loosely structured JSON whose shape drifts between
//! app releases. Extraction is therefore total: both entry points accept any
//! `serde_json::Value` and degrade missing data to empty strings, empty
//! lists, or the placeholder image instead of failing.

mod detail;
mod summary;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use detail::extract_detail;
pub use summary::{extract_summaries, extract_summary};

pub const FALLBACK_IMAGE_URL: &str = "https://www.static-immobilienscout24.de/statpic/placeholder_house/496c95154de31a357afa978cdb7f15f0_placeholder_medium.png";

const EXPOSE_WEB_URL_PREFIX: &str = "https://www.immobilienscout24.de/expose/";

/// One search-result row from the mobile `search/list` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingSummary {
    pub id: u64,
    pub url: String,
    pub image: String,
    pub images: Vec<String>,
    pub title: String,
    pub address: String,
    /// Provider-formatted text such as `"860 €"`; kept verbatim.
    pub price: String,
    pub size: String,
    pub rooms: String,
    pub published: String,
    pub is_private: bool,
    pub listing_type: String,
    pub real_estate_type: String,
}

/// Full record extracted from a section-based expose document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingDetail {
    pub id: String,
    pub url: String,
    pub image: String,
    pub images: Vec<String>,
    pub title: String,
    pub address: String,
    pub price: String,
    pub size: String,
    pub rooms: String,
    /// The `Objektbeschreibung` free-text section, when present.
    pub description: String,
    /// All free-text sections keyed by their title.
    pub text_sections: BTreeMap<String, String>,
    /// Attribute-list sections: section title → label → value.
    pub attributes: BTreeMap<String, BTreeMap<String, String>>,
    pub built_in_kitchen: String,
    pub balcony: String,
    pub agent_info: AgentInfo,
    pub is_private: bool,
    pub listing_type: String,
    pub real_estate_type: String,
    /// The provider's dynamic contact-form schema for this listing.
    pub required_fields: RequiredFieldsMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub company: String,
    pub name: String,
    pub logo_url: String,
}

/// Requirement status of one contact-form field, as declared per listing.
/// The provider mixes string statuses and plain booleans in the same map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldRequirement {
    Flag(bool),
    Status(String),
}

impl FieldRequirement {
    /// Whether a field with this status may be submitted: `MANDATORY` or
    /// `OPTIONAL` (case-insensitive), or boolean `true`. Anything else,
    /// including unknown statuses, fails closed.
    pub fn allows_submission(&self) -> bool {
        match self {
            FieldRequirement::Flag(flag) => *flag,
            FieldRequirement::Status(status) => {
                status.eq_ignore_ascii_case("MANDATORY") || status.eq_ignore_ascii_case("OPTIONAL")
            }
        }
    }
}

/// Field name → requirement status, taken verbatim from `formFieldConfig`.
pub type RequiredFieldsMap = BTreeMap<String, FieldRequirement>;

pub(crate) fn expose_web_url(id: &str) -> String {
    if id.is_empty() {
        String::new()
    } else {
        format!("{EXPOSE_WEB_URL_PREFIX}{id}")
    }
}

/// Collapses runs of whitespace (including NBSP) into single spaces.
pub(crate) fn clean(value: &str) -> String {
    value
        .replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn clean_str(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).map(clean).unwrap_or_default()
}

/// Drops the provider's size-suffix marker to get the full-resolution URL.
pub(crate) fn strip_size_suffix(url: &str) -> String {
    match url.split_once("/ORIG") {
        Some((base, _)) => base.to_string(),
        None => url.to_string(),
    }
}

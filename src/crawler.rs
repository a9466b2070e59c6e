//! Search and detail fetching against the mobile API.
//!
//! Thin composition layer: translate the web search URL, issue the fetch,
//! hand the body to the extractor. Both endpoints are anonymous; only the
//! contact flow needs the authenticated client.

use serde_json::{json, Value};
use tracing::debug;

use crate::expose::{extract_detail, extract_summaries, ListingDetail, ListingSummary};
use crate::http::{HttpRequest, HttpTransport, TransportError};
use crate::search::{translate_search_url, TranslateError};

const MOBILE_API_BASE: &str = "https://api.mobile.immobilienscout24.de";
const MOBILE_USER_AGENT: &str = "ImmoScout24_1410_30_._";

/// Result-list feature flags the mobile app always requests. Opaque to the
/// translation logic but required for the response to include attribute
/// strings and contact details.
const SEARCH_FEATURES: &str = "adKeysAndStringValues,virtualTour,contactDetails,viareporting,nextgen,calculatedTotalRent,listingsInListFirstSummary,xxlListingType,quickfilters,grouping,projectsInAllRealestateTypes,fairPrice";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Translate(#[from] TranslateError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("mobile API returned status {status} for {url}")]
    Upstream {
        url: String,
        status: u16,
        body: String,
    },
    #[error("mobile API returned invalid JSON for {url}: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Anonymous mobile-API fetcher for search results and expose details.
pub struct MobileApi<T> {
    transport: T,
}

impl<T: HttpTransport> MobileApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Runs a search for a web search URL and extracts the result summaries.
    pub fn search(&self, web_url: &str) -> Result<Vec<ListingSummary>, ApiError> {
        let request = translate_search_url(web_url)?;
        let url = format!(
            "{}&sorting=-firstactivation&features={SEARCH_FEATURES}",
            request.to_url()
        );

        let body = self.fetch_json(
            HttpRequest::post(&url)
                .json(json!({"supportedResultListTypes": [], "userData": {}})),
        )?;

        let summaries = extract_summaries(&body);
        debug!(count = summaries.len(), "extracted search results");
        Ok(summaries)
    }

    /// Fetches and extracts the full detail record for one expose id.
    pub fn expose_details(&self, expose_id: &str) -> Result<ListingDetail, ApiError> {
        let url = format!("{MOBILE_API_BASE}/expose/{expose_id}");
        let body = self.fetch_json(HttpRequest::get(&url))?;
        Ok(extract_detail(&body))
    }

    fn fetch_json(&self, request: HttpRequest) -> Result<Value, ApiError> {
        let request = request
            .header("User-Agent", MOBILE_USER_AGENT)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");

        let response = self.transport.execute(&request)?;
        if !response.is_success() {
            return Err(ApiError::Upstream {
                url: request.url,
                status: response.status,
                body: response.body,
            });
        }

        response.json().map_err(|source| ApiError::InvalidJson {
            url: request.url,
            source,
        })
    }
}

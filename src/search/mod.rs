//! Translation of human-authored web search URLs into the mobile API's
//! query grammar.
//!
//! The web and mobile surfaces disagree on parameter names, equipment
//! vocabulary, and how a search area is expressed; the SEO landing pages
//! additionally smuggle filters into the path itself. This module folds all
//! of that into one [`MobileSearchRequest`].

mod tables;

use url::Url;

const WEB_HOST: &str = "www.immobilienscout24.de";
const SEARCH_PATH_MARKER: &str = "Suche";
const RADIUS_SEGMENT: &str = "radius";
const SHAPE_SEGMENT: &str = "shape";
const MOBILE_SEARCH_BASE: &str = "https://api.mobile.immobilienscout24.de/search/list";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Region,
    Radius,
}

impl SearchType {
    pub const fn as_str(self) -> &'static str {
        match self {
            SearchType::Region => "region",
            SearchType::Radius => "radius",
        }
    }
}

/// Fully translated search request for the mobile `search/list` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobileSearchRequest {
    pub search_type: SearchType,
    pub real_estate_type: &'static str,
    /// Hierarchical region identifier, only present in region mode.
    pub geocodes: Option<String>,
    /// Canonical equipment tokens, de-duplicated, first-seen order.
    pub equipment: Vec<&'static str>,
    /// Remaining translated parameters in source order, lists comma-joined.
    pub params: Vec<(String, String)>,
}

impl MobileSearchRequest {
    /// Renders the mobile API URL. Commas inside values stay literal: the
    /// provider parses list parameters as comma-joined text and rejects the
    /// percent-encoded form.
    pub fn to_url(&self) -> String {
        let mut pairs: Vec<(String, String)> = Vec::with_capacity(self.params.len() + 4);
        pairs.push(("searchType".to_string(), self.search_type.as_str().to_string()));
        pairs.push(("realestatetype".to_string(), self.real_estate_type.to_string()));
        if let Some(geocodes) = &self.geocodes {
            pairs.push(("geocodes".to_string(), geocodes.clone()));
        }
        if !self.equipment.is_empty() {
            pairs.push(("equipment".to_string(), self.equipment.join(",")));
        }
        pairs.extend(self.params.iter().cloned());

        let query = pairs
            .iter()
            .map(|(key, value)| format!("{key}={}", encode_keeping_commas(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{MOBILE_SEARCH_BASE}?{query}")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("could not parse search URL: {0}")]
    InvalidUrl(#[source] url::ParseError),
    #[error("search URL must point to https://www.immobilienscout24.de, got {0}")]
    InvalidHost(String),
    #[error("unexpected path format: {0} (expected /Suche/...)")]
    MalformedPath(String),
    #[error("shape searches are not supported on the mobile API")]
    ShapeSearchUnsupported,
    #[error("real estate type not found: {0}")]
    UnknownRealEstateType(String),
}

impl TranslateError {
    /// True for the one variant that means "feature gap" rather than
    /// "malformed input": callers may want to fall back to another search
    /// configuration instead of treating it as a bug.
    pub fn is_unsupported_mode(&self) -> bool {
        matches!(self, TranslateError::ShapeSearchUnsupported)
    }
}

/// Translates a web search URL into a [`MobileSearchRequest`].
pub fn translate_search_url(web_url: &str) -> Result<MobileSearchRequest, TranslateError> {
    let parsed = Url::parse(web_url).map_err(TranslateError::InvalidUrl)?;

    if parsed.scheme() != "https" || parsed.host_str() != Some(WEB_HOST) {
        return Err(TranslateError::InvalidHost(web_url.to_string()));
    }

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|split| split.filter(|segment| !segment.is_empty()).collect())
        .unwrap_or_default();

    if segments.len() < 2 || segments[0] != SEARCH_PATH_MARKER {
        return Err(TranslateError::MalformedPath(parsed.path().to_string()));
    }

    if segments.contains(&SHAPE_SEGMENT) {
        return Err(TranslateError::ShapeSearchUnsupported);
    }

    let type_slug = segments[segments.len() - 1];
    let (real_estate_type, seo) = match tables::real_estate_type(type_slug) {
        Some(real_estate_type) => (real_estate_type, None),
        None => match tables::seo_filter(type_slug) {
            Some(filter) => {
                let implied = tables::real_estate_type(tables::SEO_IMPLIED_TYPE_SLUG)
                    .unwrap_or("apartmentrent");
                (implied, Some(filter))
            }
            None => {
                return Err(TranslateError::UnknownRealEstateType(
                    type_slug.to_string(),
                ))
            }
        },
    };

    let search_type = if segments.contains(&RADIUS_SEGMENT) {
        SearchType::Radius
    } else {
        SearchType::Region
    };

    // Region searches scope by geocode: locale plus the two-level region
    // path directly after the marker segment.
    let geocodes = match search_type {
        SearchType::Region if segments.len() >= 4 => {
            Some(format!("/{}", segments[1..4].join("/")))
        }
        _ => None,
    };

    let mut equipment: Vec<&'static str> = Vec::new();
    let mut params: Vec<(String, String)> = Vec::new();

    if let Some(filter) = seo {
        for token in filter.equipment {
            push_unique(&mut equipment, token);
        }
        for (key, value) in filter.extra {
            params.push((key.to_string(), value.to_string()));
        }
    }

    for (key, values) in grouped_query_params(&parsed) {
        if key == "equipment" {
            for value in &values {
                for token in value.to_lowercase().split(',') {
                    if let Some(mapped) = tables::mobile_equipment_token(token.trim()) {
                        push_unique(&mut equipment, mapped);
                    }
                }
            }
        } else if let Some(mobile_key) = tables::mobile_param_name(&key) {
            let value = values.join(",");
            // An explicit query value overrides the same filter implied by
            // the SEO slug; the key keeps its original position.
            match params.iter_mut().find(|(existing, _)| existing.as_str() == mobile_key) {
                Some((_, slot)) => *slot = value,
                None => params.push((mobile_key.to_string(), value)),
            }
        }
    }

    Ok(MobileSearchRequest {
        search_type,
        real_estate_type,
        geocodes,
        equipment,
        params,
    })
}

/// Groups repeated query keys, preserving first-seen key order and per-key
/// value order. Blank values are dropped, unknown keys are filtered later.
fn grouped_query_params(url: &Url) -> Vec<(String, Vec<String>)> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in url.query_pairs() {
        if value.is_empty() {
            continue;
        }
        let key = key.into_owned();
        match grouped.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, values)) => values.push(value.into_owned()),
            None => grouped.push((key, vec![value.into_owned()])),
        }
    }
    grouped
}

fn push_unique(tokens: &mut Vec<&'static str>, token: &'static str) {
    if !tokens.contains(&token) {
        tokens.push(token);
    }
}

fn encode_keeping_commas(value: &str) -> String {
    value
        .split(',')
        .map(|piece| urlencoding::encode(piece).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

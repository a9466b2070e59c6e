//! Static translation tables for the provider's query grammar.
//!
//! These encode undocumented mobile-API vocabulary observed from the app's
//! traffic. Loaded once into immutable maps; nothing here mutates after
//! first access.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Web query parameters the mobile API understands. Anything not listed is
/// dropped during translation.
const PARAM_NAMES: &[(&str, &str)] = &[
    ("heatingtypes", "heatingtypes"),
    ("haspromotion", "haspromotion"),
    ("numberofrooms", "numberofrooms"),
    ("livingspace", "livingspace"),
    ("energyefficiencyclasses", "energyefficiencyclasses"),
    ("exclusioncriteria", "exclusioncriteria"),
    ("equipment", "equipment"),
    ("petsallowedtypes", "petsallowedtypes"),
    ("price", "price"),
    ("constructionyear", "constructionyear"),
    ("apartmenttypes", "apartmenttypes"),
    ("pricetype", "pricetype"),
    ("floor", "floor"),
    ("geocodes", "geocodes"),
    ("geocoordinates", "geocoordinates"),
    ("shape", "shape"),
    ("sorting", "sorting"),
    ("newbuilding", "newbuilding"),
];

/// Web equipment tokens → mobile equipment vocabulary.
const EQUIPMENT: &[(&str, &str)] = &[
    ("parking", "parking"),
    ("cellar", "cellar"),
    ("builtinkitchen", "builtInKitchen"),
    ("lift", "lift"),
    ("garden", "garden"),
    ("guesttoilet", "guestToilet"),
    ("balcony", "balcony"),
    ("handicappedaccessible", "handicappedAccessible"),
];

/// Trailing path slugs that name a real-estate type directly.
const REAL_ESTATE_TYPES: &[(&str, &str)] = &[
    ("haus-mieten", "houserent"),
    ("wohnung-mieten", "apartmentrent"),
    ("wohnung-kaufen", "apartmentbuy"),
    ("haus-kaufen", "housebuy"),
];

/// Filters implied by an SEO slug, on top of selecting apartment rental.
///
/// Equipment tokens are stored in the mobile vocabulary so they merge and
/// de-duplicate cleanly with equipment from the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SeoFilter {
    pub(crate) equipment: &'static [&'static str],
    pub(crate) extra: &'static [(&'static str, &'static str)],
}

const NO_EXTRA: &[(&str, &str)] = &[];

const fn equipment_filter(tokens: &'static [&'static str]) -> SeoFilter {
    SeoFilter {
        equipment: tokens,
        extra: NO_EXTRA,
    }
}

const fn extra_filter(extra: &'static [(&'static str, &'static str)]) -> SeoFilter {
    SeoFilter {
        equipment: &[],
        extra,
    }
}

const SEO_FILTERS: &[(&str, SeoFilter)] = &[
    // Balkon/Terrasse
    ("wohnung-mit-balkon-mieten", equipment_filter(&["balcony"])),
    ("wohnung-mit-garten-mieten", equipment_filter(&["garden"])),
    // Wohnungstyp
    (
        "souterrainwohnung-mieten",
        extra_filter(&[("apartmenttypes", "halfbasement")]),
    ),
    (
        "erdgeschosswohnung-mieten",
        extra_filter(&[("apartmenttypes", "groundfloor")]),
    ),
    (
        "hochparterrewohnung-mieten",
        extra_filter(&[("apartmenttypes", "raisedgroundfloor")]),
    ),
    (
        "etagenwohnung-mieten",
        extra_filter(&[("apartmenttypes", "apartment")]),
    ),
    ("loft-mieten", extra_filter(&[("apartmenttypes", "loft")])),
    (
        "maisonette-mieten",
        extra_filter(&[("apartmenttypes", "maisonette")]),
    ),
    (
        "terrassenwohnung-mieten",
        extra_filter(&[("apartmenttypes", "terracedflat")]),
    ),
    (
        "penthouse-mieten",
        extra_filter(&[("apartmenttypes", "penthouse")]),
    ),
    (
        "dachgeschosswohnung-mieten",
        extra_filter(&[("apartmenttypes", "roofstorey")]),
    ),
    // Ausstattung
    ("wohnung-mit-garage-mieten", equipment_filter(&["parking"])),
    (
        "wohnung-mit-einbaukueche-mieten",
        equipment_filter(&["builtInKitchen"]),
    ),
    ("wohnung-mit-keller-mieten", equipment_filter(&["cellar"])),
    // Merkmale
    ("neubauwohnung-mieten", extra_filter(&[("newbuilding", "true")])),
    (
        "barrierefreie-wohnung-mieten",
        equipment_filter(&["handicappedAccessible"]),
    ),
];

/// Canonical slug the SEO filters all resolve to.
pub(crate) const SEO_IMPLIED_TYPE_SLUG: &str = "wohnung-mieten";

pub(crate) fn mobile_param_name(web_key: &str) -> Option<&'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| PARAM_NAMES.iter().copied().collect())
        .get(web_key)
        .copied()
}

pub(crate) fn mobile_equipment_token(web_token: &str) -> Option<&'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| EQUIPMENT.iter().copied().collect())
        .get(web_token)
        .copied()
}

pub(crate) fn real_estate_type(slug: &str) -> Option<&'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| REAL_ESTATE_TYPES.iter().copied().collect())
        .get(slug)
        .copied()
}

pub(crate) fn seo_filter(slug: &str) -> Option<SeoFilter> {
    static MAP: OnceLock<HashMap<&'static str, SeoFilter>> = OnceLock::new();
    MAP.get_or_init(|| SEO_FILTERS.iter().copied().collect())
        .get(slug)
        .copied()
}

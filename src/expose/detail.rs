//! Detail extraction from the section-based expose document.
//!
//! The document is a flat list of typed sections in presentation order.
//! Extraction is keyword driven and tied to the provider's German labels;
//! the section taxonomy and label spellings are undocumented and have to be
//! tracked against app releases.

use std::collections::BTreeMap;

use serde_json::Value;

use super::{
    clean, clean_str, expose_web_url, strip_size_suffix, AgentInfo, FieldRequirement,
    ListingDetail, RequiredFieldsMap, FALLBACK_IMAGE_URL,
};

const SECTION_TITLE: &str = "TITLE";
const SECTION_MAP: &str = "MAP";
const SECTION_MEDIA: &str = "MEDIA";
const SECTION_TOP_ATTRIBUTES: &str = "TOP_ATTRIBUTES";
const SECTION_ATTRIBUTE_LIST: &str = "ATTRIBUTE_LIST";
const SECTION_TEXT_AREA: &str = "TEXT_AREA";
const SECTION_AGENTS_INFO: &str = "AGENTS_INFO";

const DESCRIPTION_SECTION_TITLE: &str = "Objektbeschreibung";
const MAIN_CRITERIA_SECTION_TITLE: &str = "Hauptkriterien";
const KITCHEN_LABEL: &str = "Einbauküche:";
const BALCONY_LABEL: &str = "Balkon/Terrasse:";

const ROOMS_KEYWORD: &str = "zimmer";
const SIZE_KEYWORD: &str = "wohnfläche";
const PRICE_KEYWORD: &str = "kaltmiete";

/// Extracts a [`ListingDetail`] from an expose document. Total: any missing
/// or malformed section degrades to that field's empty default.
pub fn extract_detail(doc: &Value) -> ListingDetail {
    let id = extract_id(doc);

    let images = extract_images(doc);
    let (rooms, size, price) = extract_top_attributes(doc);
    let attributes = extract_attribute_lists(doc);
    let text_sections = extract_text_areas(doc);

    let main_criteria = attributes.get(MAIN_CRITERIA_SECTION_TITLE);
    let amenity = |label: &str| {
        main_criteria
            .and_then(|section| section.get(label))
            .cloned()
            .unwrap_or_default()
    };

    ListingDetail {
        url: expose_web_url(&id),
        image: images
            .first()
            .cloned()
            .unwrap_or_else(|| FALLBACK_IMAGE_URL.to_string()),
        title: clean_str(section_of_type(doc, SECTION_TITLE).and_then(|s| s.get("title"))),
        address: extract_address(doc),
        description: text_sections
            .get(DESCRIPTION_SECTION_TITLE)
            .cloned()
            .unwrap_or_default(),
        built_in_kitchen: amenity(KITCHEN_LABEL),
        balcony: amenity(BALCONY_LABEL),
        agent_info: extract_agent_info(doc),
        is_private: is_private_offer(doc),
        listing_type: String::new(),
        real_estate_type: clean_str(
            doc.get("header").and_then(|header| header.get("realEstateType")),
        ),
        required_fields: extract_required_fields(doc),
        id,
        images,
        rooms,
        size,
        price,
        text_sections,
        attributes,
    }
}

fn sections(doc: &Value) -> impl Iterator<Item = &Value> {
    doc.get("sections")
        .and_then(Value::as_array)
        .map(|sections| sections.iter())
        .unwrap_or_default()
}

fn sections_of_type<'doc>(
    doc: &'doc Value,
    wanted: &'static str,
) -> impl Iterator<Item = &'doc Value> {
    sections(doc).filter(move |section| section.get("type").and_then(Value::as_str) == Some(wanted))
}

fn section_of_type<'doc>(doc: &'doc Value, wanted: &'static str) -> Option<&'doc Value> {
    sections_of_type(doc, wanted).next()
}

/// The numeric header id is authoritative; ad-targeting parameters carry a
/// string copy that older documents fall back to.
fn extract_id(doc: &Value) -> String {
    let header_id = doc.get("header").and_then(|header| header.get("id"));
    match header_id {
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        _ => clean_str(
            doc.get("adTargetingParameters")
                .and_then(|params| params.get("obj_scoutId")),
        ),
    }
}

fn extract_address(doc: &Value) -> String {
    let Some(map_section) = section_of_type(doc, SECTION_MAP) else {
        return String::new();
    };
    let lines: Vec<&str> = ["addressLine1", "addressLine2"]
        .iter()
        .filter_map(|key| map_section.get(*key).and_then(Value::as_str))
        .filter(|line| !line.is_empty())
        .collect();
    clean(&lines.join(" "))
}

fn extract_images(doc: &Value) -> Vec<String> {
    let mut images = Vec::new();
    for media_section in sections_of_type(doc, SECTION_MEDIA) {
        let Some(media) = media_section.get("media").and_then(Value::as_array) else {
            continue;
        };
        for entry in media {
            if entry.get("type").and_then(Value::as_str) != Some("PICTURE") {
                continue;
            }
            let url = ["fullImageUrl", "previewImageUrl", "imageUrlForWeb"]
                .iter()
                .filter_map(|key| entry.get(*key).and_then(Value::as_str))
                .find(|url| !url.is_empty());
            if let Some(url) = url {
                images.push(strip_size_suffix(url));
            }
        }
    }
    images
}

/// Scans the top-attributes section for the rooms/size/price labels. The
/// first attribute matching each keyword wins; later duplicates are ignored.
fn extract_top_attributes(doc: &Value) -> (String, String, String) {
    let mut rooms = String::new();
    let mut size = String::new();
    let mut price = String::new();

    if let Some(section) = section_of_type(doc, SECTION_TOP_ATTRIBUTES) {
        for attribute in section
            .get("attributes")
            .and_then(Value::as_array)
            .map(|attributes| attributes.iter())
            .unwrap_or_default()
        {
            let label = attribute
                .get("label")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_lowercase();
            let text = clean_str(attribute.get("text"));

            if rooms.is_empty() && label.contains(ROOMS_KEYWORD) {
                rooms = text;
            } else if size.is_empty() && label.contains(SIZE_KEYWORD) {
                size = text;
            } else if price.is_empty() && label.contains(PRICE_KEYWORD) {
                price = text;
            }
        }
    }

    (rooms, size, price)
}

fn extract_text_areas(doc: &Value) -> BTreeMap<String, String> {
    sections_of_type(doc, SECTION_TEXT_AREA)
        .map(|section| {
            (
                section
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                clean_str(section.get("text")),
            )
        })
        .collect()
}

fn extract_attribute_lists(doc: &Value) -> BTreeMap<String, BTreeMap<String, String>> {
    let mut lists = BTreeMap::new();
    for section in sections_of_type(doc, SECTION_ATTRIBUTE_LIST) {
        let mut entries = BTreeMap::new();
        for attribute in section
            .get("attributes")
            .and_then(Value::as_array)
            .map(|attributes| attributes.iter())
            .unwrap_or_default()
        {
            entries.insert(
                clean_str(attribute.get("label")),
                clean_str(attribute.get("text")),
            );
        }
        lists.insert(
            section
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            entries,
        );
    }
    lists
}

fn extract_agent_info(doc: &Value) -> AgentInfo {
    let Some(section) = section_of_type(doc, SECTION_AGENTS_INFO) else {
        return AgentInfo::default();
    };
    AgentInfo {
        company: clean_str(section.get("company")),
        name: clean_str(section.get("name")),
        logo_url: clean_str(section.get("logoUrl")),
    }
}

/// Only the exact string `"true"` (case-insensitive) marks a private offer.
fn is_private_offer(doc: &Value) -> bool {
    doc.get("adTargetingParameters")
        .and_then(|params| params.get("obj_privateOffer"))
        .and_then(Value::as_str)
        .is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

/// The contact section's `formFieldConfig` declares which form fields the
/// listing currently accepts. Returned verbatim; values that are neither
/// strings nor booleans are dropped.
fn extract_required_fields(doc: &Value) -> RequiredFieldsMap {
    let config = doc
        .get("contact")
        .and_then(|contact| contact.get("contactData"))
        .and_then(|data| data.get("formFieldConfig"))
        .and_then(Value::as_object);

    let Some(config) = config else {
        return RequiredFieldsMap::new();
    };

    config
        .iter()
        .filter_map(|(field, value)| match value {
            Value::Bool(flag) => Some((field.clone(), FieldRequirement::Flag(*flag))),
            Value::String(status) => {
                Some((field.clone(), FieldRequirement::Status(status.clone())))
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "header": {"id": 158374652, "realEstateType": "apartmentrent"},
            "adTargetingParameters": {
                "obj_scoutId": "158374652",
                "obj_privateOffer": "True"
            },
            "sections": [
                {"type": "TITLE", "title": "Helle 3-Zimmer-Wohnung mit Balkon"},
                {
                    "type": "MAP",
                    "addressLine1": "Musterstraße 1",
                    "addressLine2": "40210 Düsseldorf"
                },
                {
                    "type": "MEDIA",
                    "media": [
                        {"type": "PICTURE", "fullImageUrl": "https://pictures.is24.de/a.jpg/ORIG/resize"},
                        {"type": "PICTURE", "previewImageUrl": "https://pictures.is24.de/b.jpg"},
                        {"type": "VIDEO", "fullImageUrl": "https://pictures.is24.de/v.mp4"}
                    ]
                },
                {
                    "type": "TOP_ATTRIBUTES",
                    "attributes": [
                        {"label": "Zimmer", "text": "3"},
                        {"label": "Wohnfläche ca.", "text": "78\u{a0}m²"},
                        {"label": "Kaltmiete", "text": "860 €"}
                    ]
                },
                {
                    "type": "ATTRIBUTE_LIST",
                    "title": "Hauptkriterien",
                    "attributes": [
                        {"label": "Einbauküche:", "text": "Ja"},
                        {"label": "Balkon/Terrasse:", "text": "Ja"}
                    ]
                },
                {"type": "TEXT_AREA", "title": "Objektbeschreibung", "text": "Schöne  Wohnung."},
                {"type": "TEXT_AREA", "title": "Lage", "text": "Zentral."},
                {
                    "type": "AGENTS_INFO",
                    "company": "Muster Immobilien GmbH",
                    "name": "Erika Muster",
                    "logoUrl": "https://pictures.is24.de/logo.png"
                }
            ],
            "contact": {
                "contactData": {
                    "formFieldConfig": {
                        "firstnameField": "MANDATORY",
                        "lastnameField": "MANDATORY",
                        "addressField": "OPTIONAL",
                        "incomeField": "HIDDEN",
                        "messageField": true,
                        "petsInHouseholdField": false
                    }
                }
            }
        })
    }

    #[test]
    fn extracts_full_record() {
        let detail = extract_detail(&document());
        assert_eq!(detail.id, "158374652");
        assert_eq!(
            detail.url,
            "https://www.immobilienscout24.de/expose/158374652"
        );
        assert_eq!(detail.title, "Helle 3-Zimmer-Wohnung mit Balkon");
        assert_eq!(detail.address, "Musterstraße 1 40210 Düsseldorf");
        assert_eq!(detail.rooms, "3");
        assert_eq!(detail.size, "78 m²");
        assert_eq!(detail.price, "860 €");
        assert_eq!(detail.description, "Schöne Wohnung.");
        assert_eq!(detail.text_sections.get("Lage").unwrap(), "Zentral.");
        assert_eq!(detail.built_in_kitchen, "Ja");
        assert_eq!(detail.balcony, "Ja");
        assert_eq!(detail.agent_info.name, "Erika Muster");
        assert!(detail.is_private);
        assert_eq!(detail.real_estate_type, "apartmentrent");
    }

    #[test]
    fn pictures_prefer_full_url_and_skip_non_pictures() {
        let detail = extract_detail(&document());
        assert_eq!(
            detail.images,
            vec![
                "https://pictures.is24.de/a.jpg",
                "https://pictures.is24.de/b.jpg"
            ]
        );
        assert_eq!(detail.image, "https://pictures.is24.de/a.jpg");
    }

    #[test]
    fn missing_media_section_yields_placeholder_and_empty_list() {
        let mut doc = document();
        let sections = doc["sections"].as_array().unwrap().clone();
        doc["sections"] = Value::Array(
            sections
                .into_iter()
                .filter(|section| section["type"] != "MEDIA")
                .collect(),
        );

        let detail = extract_detail(&doc);
        assert_eq!(detail.image, FALLBACK_IMAGE_URL);
        assert!(detail.images.is_empty());
    }

    #[test]
    fn first_matching_top_attribute_wins_on_duplicates() {
        let doc = json!({
            "sections": [{
                "type": "TOP_ATTRIBUTES",
                "attributes": [
                    {"label": "Wohnfläche ca.", "text": "78 m²"},
                    {"label": "Wohnfläche gesamt", "text": "95 m²"}
                ]
            }]
        });
        assert_eq!(extract_detail(&doc).size, "78 m²");
    }

    #[test]
    fn required_fields_keep_string_and_bool_statuses() {
        let detail = extract_detail(&document());
        assert_eq!(
            detail.required_fields.get("firstnameField"),
            Some(&FieldRequirement::Status("MANDATORY".into()))
        );
        assert_eq!(
            detail.required_fields.get("messageField"),
            Some(&FieldRequirement::Flag(true))
        );
        assert_eq!(detail.required_fields.len(), 6);
    }

    #[test]
    fn empty_document_never_panics() {
        let detail = extract_detail(&json!({}));
        assert_eq!(detail.id, "");
        assert_eq!(detail.url, "");
        assert_eq!(detail.image, FALLBACK_IMAGE_URL);
        assert!(detail.required_fields.is_empty());
        assert!(!detail.is_private);
    }

    #[test]
    fn falls_back_to_ad_targeting_id() {
        let doc = json!({
            "adTargetingParameters": {"obj_scoutId": "987654"}
        });
        let detail = extract_detail(&doc);
        assert_eq!(detail.id, "987654");
        assert_eq!(detail.url, "https://www.immobilienscout24.de/expose/987654");
    }

    #[test]
    fn privacy_flag_requires_exact_true_string() {
        for (value, expected) in [
            (json!("true"), true),
            (json!("TRUE"), true),
            (json!("yes"), false),
            (json!(true), false),
        ] {
            let doc = json!({"adTargetingParameters": {"obj_privateOffer": value}});
            assert_eq!(extract_detail(&doc).is_private, expected);
        }
    }
}

//! Summary extraction from `search/list` result items.

use serde_json::Value;

use super::{clean, clean_str, expose_web_url, strip_size_suffix, ListingSummary, FALLBACK_IMAGE_URL};

const RESULT_ITEM_TYPE: &str = "EXPOSE_RESULT";

const PRICE_MARKER: &str = "€";
const SIZE_MARKER: &str = "m²";
const ROOMS_MARKER: &str = "Zi.";

/// Walks a full search response body and extracts one summary per expose
/// row, skipping ads and grouping rows.
pub fn extract_summaries(body: &Value) -> Vec<ListingSummary> {
    let Some(items) = body.get("resultListItems").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some(RESULT_ITEM_TYPE))
        .filter_map(|item| item.get("item"))
        .map(extract_summary)
        .collect()
}

/// Extracts a [`ListingSummary`] from one expose item. Total: every missing
/// field degrades to its empty default.
pub fn extract_summary(expose: &Value) -> ListingSummary {
    let id = expose
        .get("id")
        .map(|value| match value {
            Value::Number(number) => number.as_u64().unwrap_or_default(),
            Value::String(text) => text.parse().unwrap_or_default(),
            _ => 0,
        })
        .unwrap_or_default();

    let images = title_picture(expose).into_iter().collect::<Vec<_>>();

    ListingSummary {
        id,
        url: expose_web_url(&id.to_string()),
        image: images
            .first()
            .cloned()
            .unwrap_or_else(|| FALLBACK_IMAGE_URL.to_string()),
        images,
        title: clean_str(expose.get("title")),
        address: clean_str(expose.get("address").and_then(|address| address.get("line"))),
        price: pick_attribute(expose, PRICE_MARKER),
        size: pick_attribute(expose, SIZE_MARKER),
        rooms: pick_attribute(expose, ROOMS_MARKER),
        published: clean_str(expose.get("published")),
        is_private: expose
            .get("isPrivate")
            .and_then(Value::as_bool)
            .unwrap_or_default(),
        listing_type: clean_str(expose.get("listingType")),
        real_estate_type: clean_str(expose.get("realEstateType")),
    }
}

/// Resolves the title picture, preferring the full-size reference and
/// falling back to the preview. The size suffix is stripped either way.
fn title_picture(expose: &Value) -> Option<String> {
    let picture = expose.get("titlePicture")?;
    let url = picture
        .get("full")
        .or_else(|| picture.get("preview"))
        .and_then(Value::as_str)?;
    Some(strip_size_suffix(url))
}

/// The result attributes are label/value pairs whose values carry a unit
/// marker (`€`, `m²`, `Zi.`). The first value containing the marker wins.
fn pick_attribute(expose: &Value, marker: &str) -> String {
    let Some(attributes) = expose.get("attributes").and_then(Value::as_array) else {
        return String::new();
    };

    attributes
        .iter()
        .filter_map(|attribute| attribute.get("value").and_then(Value::as_str))
        .find(|value| value.contains(marker))
        .map(clean)
        .unwrap_or_default()
}

//! Contact-form assembly and the mobile contact/apply request.
//!
//! Each listing declares which form fields it currently accepts (the
//! required-fields map extracted from the expose document). The builder
//! filters the configured applicant profile against that schema: fields the
//! schema does not mention are never sent, because the provider rejects
//! payloads carrying unexpected fields.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::auth::{device_request_id, device_request_millis, AuthenticatedClient, AuthError};
use crate::config::ApplicantProfile;
use crate::expose::RequiredFieldsMap;
use crate::http::{HttpRequest, HttpTransport};

const CONTACT_URL_PREFIX: &str = "https://api.mobile.immobilienscout24.de/expose/";

/// Payload key → schema key. Slice order is the payload field order.
/// `hasPets` and `petsInHousehold` are distinct payload fields gated by the
/// same schema key.
const FIELD_MAP: &[(&str, &str)] = &[
    ("firstname", "firstnameField"),
    ("lastname", "lastnameField"),
    ("salutation", "salutationField"),
    ("emailAddress", "emailAddressField"),
    ("phoneNumber", "phoneNumberField"),
    ("address", "addressField"),
    ("employmentRelationship", "employmentRelationshipField"),
    ("income", "incomeField"),
    ("numberOfPersons", "numberOfPersonsField"),
    ("applicationPackageCompleted", "applicationPackageCompletedField"),
    ("petsInHousehold", "petsInHouseholdField"),
    ("hasPets", "petsInHouseholdField"),
    ("message", "messageField"),
];

#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("contact request for expose {expose_id} rejected with status {status}")]
    Upstream {
        expose_id: String,
        status: u16,
        body: String,
    },
}

/// Builds the outgoing contact form from `profile`, keeping only the fields
/// whose schema status permits submission. Fields absent from the schema are
/// omitted; `sendProfile` and `profileImageUrl` always pass through.
pub fn build_contact_form(
    profile: &ApplicantProfile,
    required_fields: &RequiredFieldsMap,
) -> Map<String, Value> {
    debug!(?required_fields, "building contact form");

    let allowed = |schema_key: &str| {
        required_fields
            .get(schema_key)
            .is_some_and(|requirement| requirement.allows_submission())
    };

    let mut form = Map::new();
    for (payload_key, schema_key) in FIELD_MAP.iter().copied() {
        if allowed(schema_key) {
            form.insert(payload_key.to_string(), profile_value(profile, payload_key));
        }
    }

    form.insert("sendProfile".to_string(), json!(profile.send_profile));
    if let Some(image_url) = &profile.profile_image_url {
        form.insert("profileImageUrl".to_string(), json!(image_url));
    }

    debug!(fields = form.len(), "contact form assembled");
    form
}

fn profile_value(profile: &ApplicantProfile, payload_key: &str) -> Value {
    match payload_key {
        "firstname" => json!(profile.firstname),
        "lastname" => json!(profile.lastname),
        "salutation" => json!(profile.salutation),
        "emailAddress" => json!(profile.email_address),
        "phoneNumber" => json!(profile.phone_number),
        // The address is gated and sent as one nested object.
        "address" => json!(profile.address.clone().unwrap_or_default()),
        "employmentRelationship" => json!(profile.employment_relationship),
        "income" => json!(profile.income),
        "numberOfPersons" => json!(profile.number_of_persons),
        "applicationPackageCompleted" => json!(profile.application_package_completed),
        "petsInHousehold" => json!(profile.pets_in_household),
        "hasPets" => json!(profile.has_pets),
        "message" => json!(profile.message),
        _ => Value::Null,
    }
}

/// The fixed scaffolding the mobile app wraps around the contact form.
fn contact_payload(form: Map<String, Value>, sso_id: &str) -> Value {
    json!({
        "realEstateType": "apartmentrent",
        "expose.contactForm": form,
        "ssoId": sso_id,
        "supportedScreens": ["profile", "registration", "relocation", "plus", "financing"],
        "entitlements": [],
        "requestCount": 179,
    })
}

/// Submits a contact/apply request for `expose_id` through the
/// authenticated client. Returns the provider's JSON response; a 2xx body
/// that is not JSON comes back as a plain string value.
pub fn send_contact_request<T: HttpTransport>(
    client: &AuthenticatedClient<T>,
    expose_id: &str,
    required_fields: &RequiredFieldsMap,
    profile: &ApplicantProfile,
) -> Result<Value, ApplyError> {
    let config = client.config();
    let form = build_contact_form(profile, required_fields);

    let request = HttpRequest::post(format!("{CONTACT_URL_PREFIX}{expose_id}/contact"))
        .header("Accept", "application/json")
        .header("Content-Type", "application/json")
        .header("X_IS24_CLIENT_ID", config.client_id.clone())
        .header("x-is24-device", "iphone")
        .header("Accept-Language", "en-en")
        .header("User-Agent", config.user_agent.clone())
        .header("x-emb-id", device_request_id())
        .header("x-emb-st", device_request_millis().to_string())
        .json(contact_payload(form, &config.sso_id));

    let response = client.send(&request)?;
    if !response.is_success() {
        return Err(ApplyError::Upstream {
            expose_id: expose_id.to_string(),
            status: response.status,
            body: response.body,
        });
    }

    Ok(response
        .json()
        .unwrap_or_else(|_| Value::String(response.body.clone())))
}

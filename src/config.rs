use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Provider-facing identifiers and paths for the mobile API.
///
/// Every field has a working default matching the identifiers the mobile app
/// ships with; deployments normally only override `token_file`. Collaborators
/// that keep their own configuration format can deserialize this directly
/// (all fields are optional in the serialized form).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Value for the `X_IS24_CLIENT_ID` header on contact requests.
    pub client_id: String,
    /// User agent presented to the mobile API endpoints.
    pub user_agent: String,
    /// SSO account id attached to contact request payloads.
    pub sso_id: String,
    /// Okta authorization server id in the refresh endpoint path.
    pub auth_server_id: String,
    /// OAuth client id for the refresh-token grant.
    pub oauth_client_id: String,
    /// User agent presented to the refresh endpoint.
    pub oauth_user_agent: String,
    /// Location of the persisted access/refresh token pair.
    pub token_file: PathBuf,
    /// Bound on every network call made through this crate.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            client_id: "8181AE4B705C440E80F86EDBE3854DE0".to_string(),
            user_agent: "ImmoScout_26.27_26.0_._".to_string(),
            sso_id: "124863683".to_string(),
            auth_server_id: "aus1227au6oBg6hGH417".to_string(),
            oauth_client_id: "is24-ios-de".to_string(),
            oauth_user_agent:
                "okta-oidc-ios/3.11.0 iOS/Version 26.0 Device/iPhone14,2/appVersion/26.27"
                    .to_string(),
            token_file: PathBuf::from("is24_tokens.json"),
            request_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::MissingField("client_id"));
        }
        if self.oauth_client_id.trim().is_empty() {
            return Err(ConfigError::MissingField("oauth_client_id"));
        }
        if self.auth_server_id.trim().is_empty() {
            return Err(ConfigError::MissingField("auth_server_id"));
        }
        if self.token_file.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("token_file"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Applicant data the contact form draws from.
///
/// The provider decides per listing which of these are accepted; the form
/// builder filters this profile against that schema, so it is fine to fill
/// in everything once and reuse the profile across listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicantProfile {
    pub firstname: String,
    pub lastname: String,
    pub salutation: String,
    pub email_address: String,
    pub phone_number: String,
    pub address: Option<ApplicantAddress>,
    pub employment_relationship: String,
    pub income: String,
    pub number_of_persons: String,
    pub application_package_completed: bool,
    pub has_pets: bool,
    pub pets_in_household: String,
    pub message: String,
    pub send_profile: bool,
    pub profile_image_url: Option<String>,
}

/// Postal address submitted as one nested object when the listing asks for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicantAddress {
    pub street: String,
    pub house_number: String,
    pub postcode: String,
    pub city: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required configuration field is empty: {0}")]
    MissingField(&'static str),
    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

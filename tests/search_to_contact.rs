//! Full workflow scenario: translate a web search URL, extract result
//! summaries, pull the expose detail with its form schema, and submit a
//! contact request filtered by that schema — all through transport doubles.

mod common {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use immoscout_mobile::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};

    pub struct ScriptedTransport {
        pub requests: RefCell<Vec<HttpRequest>>,
        responses: RefCell<VecDeque<HttpResponse>>,
    }

    impl ScriptedTransport {
        pub fn replying(responses: Vec<HttpResponse>) -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                responses: RefCell::new(responses.into()),
            }
        }
    }

    impl HttpTransport for ScriptedTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.borrow_mut().push(request.clone());
            Ok(self
                .responses
                .borrow_mut()
                .pop_front()
                .expect("transport called more often than scripted"))
        }
    }

    pub fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn search_response() -> String {
        serde_json::json!({
            "resultListItems": [
                {
                    "type": "EXPOSE_RESULT",
                    "item": {
                        "id": 158374652,
                        "title": "Helle 3-Zimmer-Wohnung",
                        "address": {"line": "Musterstraße 1, Düsseldorf"},
                        "attributes": [
                            {"label": "Kaltmiete", "value": "860 €"},
                            {"label": "Fläche", "value": "78 m²"},
                            {"label": "Zimmer", "value": "3 Zi."}
                        ]
                    }
                },
                {"type": "BANNER_AD", "item": {}}
            ]
        })
        .to_string()
    }

    pub fn detail_response() -> String {
        serde_json::json!({
            "header": {"id": 158374652, "realEstateType": "apartmentrent"},
            "sections": [
                {"type": "TITLE", "title": "Helle 3-Zimmer-Wohnung"},
                {"type": "TEXT_AREA", "title": "Objektbeschreibung", "text": "Schöne Wohnung."}
            ],
            "contact": {
                "contactData": {
                    "formFieldConfig": {
                        "firstnameField": "MANDATORY",
                        "lastnameField": "MANDATORY",
                        "emailAddressField": "MANDATORY",
                        "messageField": "OPTIONAL",
                        "incomeField": "HIDDEN",
                        "addressField": false
                    }
                }
            }
        })
        .to_string()
    }
}

use common::{detail_response, ok, search_response, ScriptedTransport};
use immoscout_mobile::config::ApplicantProfile;
use immoscout_mobile::contact::send_contact_request;
use immoscout_mobile::http::{Method, RequestBody};
use immoscout_mobile::{ApiConfig, AuthenticatedClient, MobileApi};

fn applicant() -> ApplicantProfile {
    ApplicantProfile {
        firstname: "Max".to_string(),
        lastname: "Muster".to_string(),
        email_address: "max@example.com".to_string(),
        income: "OVER_3000".to_string(),
        message: "Guten Tag, ich interessiere mich für die Wohnung.".to_string(),
        send_profile: true,
        ..ApplicantProfile::default()
    }
}

#[test]
fn search_detail_and_apply_flow() {
    // Search + detail go through the anonymous API.
    let api = MobileApi::new(ScriptedTransport::replying(vec![
        ok(&search_response()),
        ok(&detail_response()),
    ]));

    let summaries = api
        .search("https://www.immobilienscout24.de/Suche/de/nordrhein-westfalen/duesseldorf/wohnung-mit-balkon-mieten")
        .expect("search succeeds");
    assert_eq!(summaries.len(), 1);
    let listing = &summaries[0];
    assert_eq!(listing.id, 158374652);
    assert_eq!(listing.price, "860 €");

    let detail = api
        .expose_details(&listing.id.to_string())
        .expect("detail succeeds");
    assert_eq!(detail.description, "Schöne Wohnung.");
    assert_eq!(detail.required_fields.len(), 6);

    // The apply request runs through the authenticated client.
    let dir = tempfile::tempdir().expect("tempdir");
    let token_file = dir.path().join("tokens.json");
    std::fs::write(
        &token_file,
        r#"{"access_token": "access-1", "refresh_token": "refresh-1", "updated_at": 0}"#,
    )
    .expect("seed tokens");

    let config = ApiConfig {
        token_file,
        ..ApiConfig::default()
    };
    let client = AuthenticatedClient::new(
        ScriptedTransport::replying(vec![ok(r#"{"success": true}"#)]),
        config,
    );

    let reply = send_contact_request(
        &client,
        &detail.id,
        &detail.required_fields,
        &applicant(),
    )
    .expect("apply succeeds");
    assert_eq!(reply["success"], true);

    let requests = client.transport().requests.borrow();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(
        request.url,
        "https://api.mobile.immobilienscout24.de/expose/158374652/contact"
    );
    assert!(request
        .headers
        .iter()
        .any(|(name, value)| name == "x-is24-device" && value == "iphone"));
    assert!(request
        .headers
        .iter()
        .any(|(name, value)| name == "Authorization" && value == "Bearer access-1"));

    let Some(RequestBody::Json(payload)) = &request.body else {
        panic!("expected a JSON body");
    };
    assert_eq!(payload["realEstateType"], "apartmentrent");
    let form = &payload["expose.contactForm"];
    // Schema-gated: mandatory/optional fields in, hidden and false out,
    // fields the schema never mentions omitted entirely.
    assert_eq!(form["firstname"], "Max");
    assert_eq!(form["emailAddress"], "max@example.com");
    assert_eq!(
        form["message"],
        "Guten Tag, ich interessiere mich für die Wohnung."
    );
    assert!(form.get("income").is_none());
    assert!(form.get("address").is_none());
    assert!(form.get("phoneNumber").is_none());
    assert_eq!(form["sendProfile"], true);
}

#[test]
fn apply_rejection_reports_upstream_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let token_file = dir.path().join("tokens.json");
    std::fs::write(
        &token_file,
        r#"{"access_token": "access-1", "refresh_token": "refresh-1", "updated_at": 0}"#,
    )
    .expect("seed tokens");

    let client = AuthenticatedClient::new(
        ScriptedTransport::replying(vec![immoscout_mobile::http::HttpResponse {
            status: 409,
            body: r#"{"error": "already contacted"}"#.to_string(),
        }]),
        ApiConfig {
            token_file,
            ..ApiConfig::default()
        },
    );

    let error = send_contact_request(
        &client,
        "158374652",
        &Default::default(),
        &applicant(),
    )
    .expect_err("409 is surfaced");

    assert!(matches!(
        error,
        immoscout_mobile::contact::ApplyError::Upstream { status: 409, .. }
    ));
}

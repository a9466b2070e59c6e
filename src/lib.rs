//! Client library for the undocumented ImmobilienScout24 mobile API.
//!
//! Three concerns live here: translating human-authored web search URLs into
//! the mobile API's query grammar (`search`), turning the provider's nested
//! section documents into flat listing records (`expose`), and submitting
//! contact requests under a bearer token with automatic single-shot
//! credential refresh (`auth` + `contact`). `crawler` composes the first two
//! into the search/detail fetch pair; orchestration around it (scheduling,
//! filtering, notification) belongs to callers.

pub mod auth;
pub mod config;
pub mod contact;
pub mod crawler;
pub mod expose;
pub mod http;
pub mod search;

pub use auth::{AuthenticatedClient, TokenPair, TokenStore};
pub use config::{ApiConfig, ApplicantProfile};
pub use crawler::MobileApi;
pub use expose::{ListingDetail, ListingSummary, RequiredFieldsMap};
pub use search::{translate_search_url, MobileSearchRequest};

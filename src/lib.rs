//! Small client for the API-Football endpoints served through RapidAPI: fetch an endpoint,
//! show a preview of the payload, save it to disk.

mod config;
mod display;
mod error;
mod fetch;
mod persist;

pub use config::{ApiConfig, Scheme, DEFAULT_HOST, HOST_VAR, KEY_VAR};
pub use display::{preview, print_json, render, write_json, PREVIEW_LIMIT};
pub use error::{ConfigError, FetchError, FetchErrorKind, SaveError};
pub use fetch::{build_url, extract_response, fetch, ApiClient, RESPONSE_FIELD};
pub use persist::save_json;

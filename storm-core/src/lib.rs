//! Storm Core Library
//!
//! Shared types, parameter handling, and rendering utilities for the
//! Storm on Demand API client. This crate is used by the `stormctl`
//! client and any other tool that speaks the Storm API.

pub mod api;
pub mod display;
pub mod docs;
pub mod error;
pub mod params;

// Re-export commonly used types
pub use api::{ApiFault, RequestEnvelope, ResponseData};
pub use display::render_breadcrumbs;
pub use docs::{MethodCatalog, ParamRequirement};
pub use error::*;
pub use params::ParamBag;

/// Default base URL for the Storm on Demand API
pub const DEFAULT_BASE_URL: &str = "https://api.stormondemand.com";

/// Default documentation base URL (method catalog)
pub const DEFAULT_DOCS_URL: &str = "http://www.liquidweb.com/StormServers/api/docs";

/// Default API version
pub const DEFAULT_API_VERSION: &str = "v1";

/// Response format appended to every request URL
pub const API_FORMAT: &str = "json";

/// Build the full request URI for an API method.
///
/// The Storm API addresses methods as `{base}/{version}/{method}.{format}`,
/// e.g. `https://api.stormondemand.com/v1/storm/server/list.json`.
pub fn method_uri(base_url: &str, version: &str, method: &str) -> String {
    format!(
        "{}/{}/{}.{}",
        base_url.trim_end_matches('/'),
        version,
        method.trim_matches('/'),
        API_FORMAT
    )
}

/// Build the documentation URI for an API version.
pub fn docs_uri(docs_url: &str, version: &str) -> String {
    format!("{}/{}/docs.json", docs_url.trim_end_matches('/'), version)
}

//! CORS layer configuration.
//!
//! Only mounted outside production; the configured lists are for the
//! frontend dev server.

use std::str::FromStr;
use std::time::Duration;

use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use neoterik_core::config::CorsConfig;

/// Builds a CORS tower layer from configuration.
///
/// A `"*"` entry opens origins or headers to any value. Entries that do not
/// parse are skipped.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if is_wildcard(&config.allowed_origins) {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(parse_all(&config.allowed_origins))
    };

    let headers = if is_wildcard(&config.allowed_headers) {
        AllowHeaders::any()
    } else {
        AllowHeaders::list(parse_all(&config.allowed_headers))
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list(parse_all(&config.allowed_methods)))
        .allow_headers(headers)
        .max_age(Duration::from_secs(config.max_age_seconds))
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v == "*")
}

fn parse_all<T: FromStr>(values: &[String]) -> Vec<T> {
    values.iter().filter_map(|v| v.parse().ok()).collect()
}

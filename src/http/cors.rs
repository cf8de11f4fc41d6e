//! CORS header module
//!
//! Every response the service sends carries the same three headers so that
//! browser pages on the allowed origin can upload and download directly.

use hyper::http::response::Builder;

use crate::config::CorsConfig;

pub const ALLOW_HEADERS: &str = "authorization, content-type";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";

/// Attach the CORS header set to a response builder
pub fn with_cors(builder: Builder, cors: &CorsConfig) -> Builder {
    builder
        .header("Access-Control-Allow-Origin", cors.allowed_origin.as_str())
        .header("Access-Control-Allow-Headers", ALLOW_HEADERS)
        .header("Access-Control-Allow-Methods", ALLOW_METHODS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::Response;

    #[test]
    fn test_with_cors_headers() {
        let cors = CorsConfig {
            allowed_origin: "https://shop.example.com".to_string(),
        };
        let resp = with_cors(Response::builder(), &cors).body(()).unwrap();
        let headers = resp.headers();
        assert_eq!(
            headers["access-control-allow-origin"],
            "https://shop.example.com"
        );
        assert_eq!(
            headers["access-control-allow-headers"],
            "authorization, content-type"
        );
        assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
    }

    #[test]
    fn test_default_origin_is_wildcard() {
        let resp = with_cors(Response::builder(), &CorsConfig::default())
            .body(())
            .unwrap();
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }
}

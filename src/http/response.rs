//! HTTP response building module
//!
//! Provides builders for every response the service produces. All of them
//! carry the CORS header set.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::cors::with_cors;
use crate::config::CorsConfig;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const EXPORT_DISPOSITION: &str = "attachment; filename=\"grids_export.xlsx\"";

/// Build 204 preflight response (OPTIONS)
pub fn build_preflight_response(cors: &CorsConfig) -> Response<Full<Bytes>> {
    with_cors(Response::builder().status(StatusCode::NO_CONTENT), cors)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("204", &e);
            fallback_response(StatusCode::NO_CONTENT, Bytes::new())
        })
}

/// Build plain-text response (probes, 405, missing uploads, 401)
pub fn build_text_response(
    status: StatusCode,
    body: impl Into<Bytes>,
    cors: &CorsConfig,
) -> Response<Full<Bytes>> {
    let body = body.into();
    with_cors(Response::builder().status(status), cors)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(body.clone()))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback_response(status, body)
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(cors: &CorsConfig) -> Response<Full<Bytes>> {
    let mut resp = build_text_response(StatusCode::METHOD_NOT_ALLOWED, "Use POST", cors);
    resp.headers_mut().insert(
        hyper::header::ALLOW,
        hyper::header::HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    resp
}

/// Build 400 JSON error response: `{"error": "<message>"}`
pub fn build_json_error_response(message: &str, cors: &CorsConfig) -> Response<Full<Bytes>> {
    // Same layout as the clients already parse (space after the colon)
    let body = format!(
        "{{\"error\": {}}}",
        serde_json::Value::String(message.to_string())
    );
    with_cors(Response::builder().status(StatusCode::BAD_REQUEST), cors)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("400", &e);
            fallback_response(
                StatusCode::BAD_REQUEST,
                Bytes::from_static(br#"{"error": "Bad Request"}"#),
            )
        })
}

/// Build 200 spreadsheet download response
pub fn build_spreadsheet_response(data: Vec<u8>, cors: &CorsConfig) -> Response<Full<Bytes>> {
    let content_length = data.len();
    with_cors(Response::builder().status(StatusCode::OK), cors)
        .header("Content-Type", XLSX_CONTENT_TYPE)
        .header("Content-Disposition", EXPORT_DISPOSITION)
        .header("Content-Length", content_length)
        .body(Full::new(Bytes::from(data)))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            fallback_response(StatusCode::OK, Bytes::new())
        })
}

/// Bare response used when the builder rejects a header; keeps the status
fn fallback_response(status: StatusCode, body: Bytes) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(body));
    *resp.status_mut() = status;
    resp
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_preflight_response() {
        let resp = build_preflight_response(&CorsConfig::default());
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()["access-control-allow-methods"], "POST, OPTIONS");
        assert!(body_string(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_405_response() {
        let resp = build_405_response(&CorsConfig::default());
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["allow"], "GET, POST, OPTIONS");
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(body_string(resp).await, "Use POST");
    }

    #[tokio::test]
    async fn test_json_error_escapes_message() {
        let resp = build_json_error_response("bad \"layout\"", &CorsConfig::default());
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()["content-type"], "application/json");

        let body = body_string(resp).await;
        assert_eq!(body, r#"{"error": "bad \"layout\""}"#);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["error"], "bad \"layout\"");
    }

    #[tokio::test]
    async fn test_json_error_keeps_non_ascii() {
        let resp = build_json_error_response("plan für Raum 3", &CorsConfig::default());
        assert_eq!(body_string(resp).await, r#"{"error": "plan für Raum 3"}"#);
    }

    #[tokio::test]
    async fn test_invalid_origin_keeps_status() {
        let cors = CorsConfig {
            allowed_origin: "https://shop.example.com\n".to_string(),
        };

        assert_eq!(build_preflight_response(&cors).status(), StatusCode::NO_CONTENT);
        assert_eq!(
            build_405_response(&cors).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            build_text_response(StatusCode::UNAUTHORIZED, "Unauthorized", &cors).status(),
            StatusCode::UNAUTHORIZED
        );

        let resp = build_json_error_response("bad layout", &cors);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(resp).await, r#"{"error": "Bad Request"}"#);
    }

    #[tokio::test]
    async fn test_spreadsheet_response() {
        let resp = build_spreadsheet_response(b"PK\x03\x04".to_vec(), &CorsConfig::default());
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], XLSX_CONTENT_TYPE);
        assert_eq!(
            resp.headers()["content-disposition"],
            "attachment; filename=\"grids_export.xlsx\""
        );
        assert_eq!(resp.headers()["content-length"], "4");
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }
}

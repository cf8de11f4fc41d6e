//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: preflight, probes, method
//! validation, the optional bearer check and the processing endpoint.

use crate::config::{AppState, AuthConfig, CorsConfig};
use crate::error::ProcessError;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

pub const HEALTH_PATH: &str = "/health";
pub const WARMUP_PATH: &str = "/warmup";

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let access_entry = state
        .access_log()
        .then(|| AccessLogEntry::from_request(&req, remote_addr));

    let response = route_request(req, &state).await;

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on method and path
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let cors = &state.config.cors;

    // 1. Preflight (any path)
    if req.method() == Method::OPTIONS {
        return http::build_preflight_response(cors);
    }

    // 2. Probes
    match (req.method(), req.uri().path()) {
        (&Method::GET, HEALTH_PATH) => {
            return http::build_text_response(StatusCode::OK, "ok", cors);
        }
        (&Method::GET | &Method::POST, WARMUP_PATH) => return warmup(state).await,
        _ => {}
    }

    // 3. Everything else must be a POST
    if req.method() != Method::POST {
        logger::log_warning(&format!("Method not allowed: {}", req.method()));
        return http::build_405_response(cors);
    }

    // 4. Optional bearer token
    if let Some(resp) = check_bearer(&req, &state.config.auth, cors) {
        return resp;
    }

    // 5. Process uploads
    match super::process::process(req, state).await {
        Ok(xlsx) => http::build_spreadsheet_response(xlsx, cors),
        Err(err) => error_response(&err, cors),
    }
}

/// Force engine initialization ahead of the first real request
async fn warmup(state: &AppState) -> Response<Full<Bytes>> {
    let cors = &state.config.cors;
    match state.engine.get().await {
        Ok(_) => http::build_text_response(StatusCode::OK, "warmed", cors),
        Err(err) => error_response(&ProcessError::from(err), cors),
    }
}

/// Reject the request unless `Authorization` is `Bearer <token>`; no-op when the check is off
fn check_bearer<B>(
    req: &Request<B>,
    auth: &AuthConfig,
    cors: &CorsConfig,
) -> Option<Response<Full<Bytes>>> {
    let expected = auth.expected_token()?;
    let provided = req
        .headers()
        .get(hyper::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if provided == format!("Bearer {expected}") {
        None
    } else {
        logger::log_request_failed(401, "bearer token mismatch");
        Some(http::build_text_response(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            cors,
        ))
    }
}

fn error_response(err: &ProcessError, cors: &CorsConfig) -> Response<Full<Bytes>> {
    let message = err.to_string();
    logger::log_request_failed(400, &message);
    match err {
        ProcessError::MissingFiles => {
            http::build_text_response(StatusCode::BAD_REQUEST, message, cors)
        }
        _ => http::build_json_error_response(&message, cors),
    }
}

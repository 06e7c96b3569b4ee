//! Token generation and extraction from inbound requests.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;

use tana_core::error::AppError;

/// Cookie and query parameter carrying the token.
pub const TOKEN_PARAM: &str = "token";

const BEARER_PREFIX: &str = "bearer ";

/// Draw `len` bytes from the OS CSPRNG and encode them as URL-safe base64.
pub fn generate_token(len: usize) -> Result<String, AppError> {
    let mut bytes = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::internal(format!("OS random source failed: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Find the session token on a request.
///
/// Sources, highest priority first: the `token` cookie, the `token` query
/// parameter, the `Authorization` header. A header value starting with
/// `Bearer ` (any case) has that prefix removed. Empty values are skipped.
pub fn extract_token(parts: &Parts) -> Option<String> {
    from_cookie(parts)
        .or_else(|| from_query(parts))
        .or_else(|| from_header(parts))
}

fn from_cookie(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    jar.get(TOKEN_PARAM)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

fn from_query(parts: &Parts) -> Option<String> {
    let Query(mut params) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri).ok()?;
    params.remove(TOKEN_PARAM).filter(|v| !v.is_empty())
}

fn from_header(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = match value.get(..BEARER_PREFIX.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(BEARER_PREFIX) => &value[BEARER_PREFIX.len()..],
        _ => value,
    };
    (!token.is_empty()).then(|| token.to_string())
}

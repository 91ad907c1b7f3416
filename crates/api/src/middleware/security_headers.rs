//! Security headers middleware.
//!
//! Adds security-related HTTP headers to all responses.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Header values computed once from configuration.
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    content_security_policy: HeaderValue,
    hsts: Option<HeaderValue>,
}

impl SecurityHeaders {
    /// Builds the header set.
    ///
    /// The wishes widget is embedded by host pages, so framing is limited
    /// with `frame-ancestors` to the trusted bridge origins instead of a
    /// blanket `X-Frame-Options: DENY`. Origins that are not valid header
    /// text are skipped.
    pub fn new<'a>(frame_ancestors: impl IntoIterator<Item = &'a str>, hsts_enabled: bool) -> Self {
        let mut policy = String::from("frame-ancestors 'self'");
        for origin in frame_ancestors {
            if !origin.is_empty()
                && origin
                    .chars()
                    .all(|c| c.is_ascii_graphic() && c != ';' && c != ',')
            {
                policy.push(' ');
                policy.push_str(origin);
            }
        }

        Self {
            content_security_policy: HeaderValue::from_str(&policy)
                .unwrap_or_else(|_| HeaderValue::from_static("frame-ancestors 'self'")),
            hsts: hsts_enabled
                .then(|| HeaderValue::from_static("max-age=31536000; includeSubDomains")),
        }
    }
}

/// Middleware that adds security headers to all responses.
///
/// Headers added:
/// - `X-Content-Type-Options: nosniff`
/// - `Content-Security-Policy: frame-ancestors ...`
/// - `Referrer-Policy: strict-origin-when-cross-origin`
/// - `Strict-Transport-Security` when enabled in configuration
pub async fn security_headers_middleware(
    State(config): State<Arc<SecurityHeaders>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        config.content_security_policy.clone(),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    if let Some(hsts) = &config.hsts {
        headers.insert(header::STRICT_TRANSPORT_SECURITY, hsts.clone());
    }

    response
}

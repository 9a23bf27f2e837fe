//! Security headers middleware.
//!
//! Adds to all responses:
//! - Content-Security-Policy
//! - X-Content-Type-Options
//! - X-Frame-Options

use axum::http::HeaderValue;
use axum::http::header::HeaderName;
use tower_http::set_header::SetResponseHeaderLayer;

/// Content-Security-Policy header value.
///
/// Allows the CDN origins used by the page chrome. Compiled documents may
/// reference images from any origin, but their inline scripts do not run.
const CSP: &str = "default-src 'self'; \
                   script-src 'self' https://cdn.jsdelivr.net; \
                   style-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net https://cdnjs.cloudflare.com; \
                   font-src 'self' data: https://cdn.jsdelivr.net https://cdnjs.cloudflare.com; \
                   img-src 'self' data: http: https:; \
                   connect-src 'self' ws: wss:; \
                   frame-ancestors 'none'";

pub(crate) fn csp_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static("content-security-policy"),
        HeaderValue::from_static(CSP),
    )
}

pub(crate) fn content_type_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    )
}

pub(crate) fn frame_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    )
}

//! Security headers middleware.
//!
//! Adds restrictive headers to every response. Product images come from the
//! upstream API's host, so `img-src` admits any `https:` origin.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

/// Content security policy applied to every page.
///
/// ```text
/// default-src 'none';
/// style-src 'self';
/// img-src 'self' https:;
/// base-uri 'self';
/// form-action 'self';
/// frame-ancestors 'none'
/// ```
const CSP: &str = "default-src 'none'; \
                   style-src 'self'; \
                   img-src 'self' https:; \
                   base-uri 'self'; \
                   form-action 'self'; \
                   frame-ancestors 'none'";

/// Add security headers to all responses.
///
/// `Cache-Control: no-store` is applied only when the handler did not set a
/// cache policy of its own; generated pages carry their revalidation hint.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(CONTENT_SECURITY_POLICY, HeaderValue::from_static(CSP));
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("camera=(), geolocation=(), microphone=(), payment=()"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    if !headers.contains_key(CACHE_CONTROL) {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, middleware, routing::get};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route("/plain", get(|| async { "plain" }))
            .route(
                "/cached",
                get(|| async { ([(CACHE_CONTROL, "public, s-maxage=60")], "cached") }),
            )
            .layer(middleware::from_fn(security_headers_middleware))
    }

    async fn get_headers(uri: &str) -> axum::http::HeaderMap {
        app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .headers()
            .clone()
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let headers = get_headers("/plain").await;
        assert_eq!(headers.get(X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(headers.get(X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        let csp = headers.get(CONTENT_SECURITY_POLICY).unwrap().to_str().unwrap();
        assert!(csp.contains("img-src 'self' https:"));
    }

    #[tokio::test]
    async fn test_default_cache_control_only_when_absent() {
        assert_eq!(
            get_headers("/plain").await.get(CACHE_CONTROL).unwrap(),
            "no-store, max-age=0"
        );
        assert_eq!(
            get_headers("/cached").await.get(CACHE_CONTROL).unwrap(),
            "public, s-maxage=60"
        );
    }
}

//! HTTP middleware stack for the catalog.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Request ID (correlate logs, Sentry events and responses)
//! 4. Security headers (CSP, framing, sniffing, default cache policy)

pub mod request_id;
pub mod security_headers;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;

//! HTTP layer
//!
//! Request building, the transport boundary, and the backoff executor that
//! sits between them.

pub use backoff::{ACCEPTED_STATUS, BackoffExecutor, BackoffPolicy, is_accepted_status};
pub use request::{MediaType, PreparedRequest, RequestBuilder, RequestKind};
pub use response::{Expect, Response};
pub use transport::{ReqwestTransport, Transport, TransportResponse};

mod backoff;
pub mod request;
mod response;
mod transport;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};

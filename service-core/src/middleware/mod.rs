pub mod security_headers;
pub mod timeout;
pub mod tracing;

pub use security_headers::security_headers_middleware;
pub use timeout::request_timeout_middleware;
pub use self::tracing::{request_id_middleware, REQUEST_ID_HEADER};

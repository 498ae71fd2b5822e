pub mod access_log;
pub mod auth;
pub mod security_headers;
pub mod tracing;

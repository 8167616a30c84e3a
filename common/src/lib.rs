//! Shared primitives for the Fizzy CLI workspace.
//!
//! This crate carries the small, dependency-light types used by both the
//! request core and the binary:
//!
//! - [`ErrorLocation`]: file/line/column captured at the point an error is built
//! - [`HttpStatusCode`]: status classification without pulling in an HTTP stack
//! - [`RedactedToken`]: the bearer token, kept out of logs and serialized output

pub mod error;
pub mod http_status;
pub mod redacted_token;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::{HttpStatusCode, StatusClass};
pub use redacted_token::RedactedToken;

#[cfg(test)]
mod tests;

//! Error taxonomy shared by every command: kind, exit code and envelope code.

use crate::error::config::ConfigError;
use crate::fizzy_client::ApiResponse;

use common::{ErrorLocation, HttpStatusCode, StatusClass};

use std::fmt::{Display, Formatter, Result as FormatResult};

use serde_json::Value;
use thiserror::Error as ThisError;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_INVALID_ARGS: i32 = 2;
pub const EXIT_AUTH_FAILURE: i32 = 3;
pub const EXIT_FORBIDDEN: i32 = 4;
pub const EXIT_NOT_FOUND: i32 = 5;
pub const EXIT_VALIDATION: i32 = 6;
pub const EXIT_NETWORK: i32 = 7;

/// Closed set of failure categories.
///
/// Each kind maps to exactly one exit code and one envelope `code` string.
/// Scripts depend on both, so neither table may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    General,
    Authentication,
    Forbidden,
    NotFound,
    Validation,
    Network,
    InvalidArgs,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 7] = [
        ErrorKind::General,
        ErrorKind::Authentication,
        ErrorKind::Forbidden,
        ErrorKind::NotFound,
        ErrorKind::Validation,
        ErrorKind::Network,
        ErrorKind::InvalidArgs,
    ];

    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::General => EXIT_ERROR,
            ErrorKind::Authentication => EXIT_AUTH_FAILURE,
            ErrorKind::Forbidden => EXIT_FORBIDDEN,
            ErrorKind::NotFound => EXIT_NOT_FOUND,
            ErrorKind::Validation => EXIT_VALIDATION,
            ErrorKind::Network => EXIT_NETWORK,
            ErrorKind::InvalidArgs => EXIT_INVALID_ARGS,
        }
    }

    /// Envelope `error.code` string.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::General => "ERROR",
            ErrorKind::Authentication => "AUTH_ERROR",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Network => "NETWORK_ERROR",
            ErrorKind::InvalidArgs => "INVALID_ARGS",
        }
    }

    pub fn from_code(code: &str) -> Option<ErrorKind> {
        ErrorKind::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// 401, 403, 404 and 422 have dedicated kinds; every other status is general.
    pub fn from_http_status(status: u16) -> ErrorKind {
        match HttpStatusCode(status).class() {
            StatusClass::Unauthorized => ErrorKind::Authentication,
            StatusClass::Forbidden => ErrorKind::Forbidden,
            StatusClass::NotFound => ErrorKind::NotFound,
            StatusClass::Unprocessable => ErrorKind::Validation,
            StatusClass::Ok | StatusClass::Failure => ErrorKind::General,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        let label = match self {
            ErrorKind::General => "General",
            ErrorKind::Authentication => "Authentication",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Validation => "Validation",
            ErrorKind::Network => "Network",
            ErrorKind::InvalidArgs => "Invalid Arguments",
        };
        formatter.write_str(label)
    }
}

/// A classified failure on its way to the response envelope.
///
/// `message` is the human text shown in the envelope; `Display` adds the kind
/// prefix and the creation site for logs. `status` is only set when the error
/// came from an HTTP response.
#[derive(Debug, ThisError)]
#[error("{kind} Error: {message} {location}")]
pub struct FizzyError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub details: Option<Value>,
    pub location: ErrorLocation,
    response: Option<Box<ApiResponse>>,
}

impl FizzyError {
    #[track_caller]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            details: None,
            location: ErrorLocation::caller(),
            response: None,
        }
    }

    #[track_caller]
    pub fn general(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::General, message)
    }

    #[track_caller]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    #[track_caller]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    #[track_caller]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    #[track_caller]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    #[track_caller]
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgs, message)
    }

    /// Missing mandatory command flag.
    #[track_caller]
    pub fn required_flag(flag: &str) -> Self {
        Self::invalid_args(format!("required flag --{flag} not provided"))
    }

    /// Classify an API error status.
    ///
    /// Dedicated kinds keep the server message verbatim; the general kind
    /// prefixes it with the status so the number survives in the envelope.
    #[track_caller]
    pub fn from_http_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = ErrorKind::from_http_status(status);
        let message = match kind {
            ErrorKind::General => format!("Request failed: {status} {message}"),
            _ => message,
        };

        let mut error = Self::new(kind, message);
        error.status = Some(status);
        error
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach whatever was already read from the server before the failure.
    pub fn with_response(mut self, response: ApiResponse) -> Self {
        self.response = Some(Box::new(response));
        self
    }

    pub fn exit_code(&self) -> i32 {
        self.kind.exit_code()
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// The response read before this error was raised, if any.
    pub fn response(&self) -> Option<&ApiResponse> {
        self.response.as_deref()
    }
}

impl From<reqwest::Error> for FizzyError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        FizzyError::network(format!("Request failed: {error}"))
    }
}

impl From<serde_json::Error> for FizzyError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        FizzyError::general(format!("JSON error: {error}"))
    }
}

impl From<url::ParseError> for FizzyError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        FizzyError::general(format!("Invalid URL: {error}"))
    }
}

impl From<std::io::Error> for FizzyError {
    #[track_caller]
    fn from(error: std::io::Error) -> Self {
        FizzyError::general(error.to_string())
    }
}

impl From<ConfigError> for FizzyError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        FizzyError::general(error.reason())
    }
}

//! The response envelope: the only thing the CLI writes to stdout.
//!
//! Every command outcome, success or failure, is turned into an [`Envelope`]
//! here, and the process exit code is derived from it. Nothing else decides
//! exit codes.

use crate::error::fizzy::{EXIT_ERROR, EXIT_SUCCESS};
use crate::error::{ErrorKind, FizzyError};

use std::collections::BTreeMap;
use std::time::SystemTime;

use humantime::format_rfc3339_seconds;
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const META_TIMESTAMP_KEY: &str = "timestamp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub has_next: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_url: Option<String>,
}

/// Uniform JSON shape for every outcome.
///
/// Success envelopes always carry `data` (possibly `null`); failure envelopes
/// always carry `error`. Never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub meta: BTreeMap<String, Value>,
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            pagination: None,
            location: None,
            meta: create_meta(),
        }
    }

    /// Create result. `data` is `None` when the created resource could not
    /// be fetched back; the envelope then reports `data: null`.
    pub fn success_with_location(data: Option<Value>, location: impl Into<String>) -> Self {
        let location = location.into();
        Self {
            location: (!location.is_empty()).then_some(location),
            ..Self::success(data.unwrap_or(Value::Null))
        }
    }

    /// List result. Pagination info is only attached when there is a next
    /// page or a next URL to report.
    pub fn success_with_pagination(data: Value, has_next: bool, next_url: Option<String>) -> Self {
        let next_url = next_url.filter(|url| !url.is_empty());
        let pagination = (has_next || next_url.is_some()).then(|| Pagination { has_next, next_url });

        Self {
            pagination,
            ..Self::success(data)
        }
    }

    pub fn error(error: &FizzyError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorDetail {
                code: error.code().to_string(),
                message: error.message.clone(),
                status: error.status,
                details: error.details.clone(),
            }),
            pagination: None,
            location: None,
            meta: create_meta(),
        }
    }

    /// Fold a command result into an envelope.
    pub fn from_result(result: Result<Envelope, FizzyError>) -> Self {
        result.unwrap_or_else(|error| Envelope::error(&error))
    }

    /// 0 on success; otherwise the exit code of the error's kind, falling
    /// back to the general code for unknown kinds.
    pub fn exit_code(&self) -> i32 {
        if self.success {
            return EXIT_SUCCESS;
        }
        self.error
            .as_ref()
            .and_then(|detail| ErrorKind::from_code(&detail.code))
            .map(ErrorKind::exit_code)
            .unwrap_or(EXIT_ERROR)
    }

    /// Pretty JSON with HTML left unescaped.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Bytes for stdout (newline-terminated) and the process exit code.
    pub fn render(&self) -> (Vec<u8>, i32) {
        match self.to_json() {
            Ok(mut json) => {
                json.push('\n');
                (json.into_bytes(), self.exit_code())
            }
            Err(e) => {
                error!("Error marshaling response: {e}");
                let fallback = json!({
                    "success": false,
                    "error": {
                        "code": ErrorKind::General.code(),
                        "message": format!("Error marshaling response: {e}"),
                    },
                    "meta": create_meta(),
                });
                (format!("{fallback:#}\n").into_bytes(), EXIT_ERROR)
            }
        }
    }
}

fn create_meta() -> BTreeMap<String, Value> {
    let timestamp = format_rfc3339_seconds(SystemTime::now()).to_string();
    BTreeMap::from([(META_TIMESTAMP_KEY.to_string(), Value::String(timestamp))])
}

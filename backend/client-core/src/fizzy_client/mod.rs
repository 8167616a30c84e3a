//! HTTP transport for the Fizzy API.
//!
//! Every call goes through [`FizzyClient::request`], which resolves the path
//! against the account scope, attaches authentication, and turns the outcome
//! into either an [`ApiResponse`] or a classified [`FizzyError`].

mod api;
mod download;
mod pagination;
mod upload;

pub use api::Api;
pub use pagination::MAX_FOLLOW_PAGES;
pub use upload::{DIRECT_UPLOADS_PATH, UploadDescriptor, compute_checksum, detect_content_type};

use crate::FIZZY_USER_AGENT;
use crate::error::FizzyError;
use crate::json_fields::get_str;

use common::{HttpStatusCode, RedactedToken};

use std::sync::OnceLock;
use std::time::Duration;

use log::info;
use regex::Regex;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, LINK, LOCATION, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;

const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);
const JSON_CONTENT_TYPE: &str = "application/json";
const LINK_NEXT_PATTERN: &str = r#"<([^>]+)>;\s*rel="next""#;

static LINK_NEXT_REGEX: OnceLock<Regex> = OnceLock::new();

fn link_next_regex() -> &'static Regex {
    LINK_NEXT_REGEX.get_or_init(|| Regex::new(LINK_NEXT_PATTERN).expect("valid regex pattern"))
}

/// Result of a single API call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
    /// Parsed body; `None` when the body was empty.
    pub data: Option<Value>,
    /// `Location` header, set by create endpoints.
    pub location: Option<String>,
    /// `rel="next"` target from the `Link` header.
    pub link_next: Option<String>,
}

impl ApiResponse {
    /// Parsed body, or JSON `null` when there was none.
    pub fn data_or_null(&self) -> Value {
        self.data.clone().unwrap_or(Value::Null)
    }

    pub fn has_next(&self) -> bool {
        self.link_next.is_some()
    }
}

#[derive(Clone)]
pub struct FizzyClient {
    base_url: String,
    token: RedactedToken,
    account: String,
    client: Client,
}

impl FizzyClient {
    pub fn new(base_url: &str, token: RedactedToken, account: &str) -> Result<Self, FizzyError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT_DURATION)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            account: account.to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    /// Resolve `path` to a full URL.
    ///
    /// Absolute URLs pass through untouched. Relative paths get a leading
    /// slash and the `/{account}` segment unless they already start with it.
    pub fn build_url(&self, path: &str) -> String {
        if is_absolute_url(path) {
            return path.to_string();
        }

        let mut path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        if !self.account.is_empty() {
            let account_segment = format!("/{}", self.account);
            let account_prefix = format!("{account_segment}/");
            if !path.starts_with(&account_prefix) && path != account_segment {
                path = format!("{account_segment}{path}");
            }
        }

        format!("{}{}", self.base_url, path)
    }

    fn prepare_request(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, self.token.bearer())
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .header(USER_AGENT, FIZZY_USER_AGENT)
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, FizzyError> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse, FizzyError> {
        self.request(Method::POST, path, body).await
    }

    pub async fn patch(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse, FizzyError> {
        self.request(Method::PATCH, path, body).await
    }

    pub async fn put(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse, FizzyError> {
        self.request(Method::PUT, path, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, FizzyError> {
        self.request(Method::DELETE, path, None).await
    }

    /// Fetch the resource a create call pointed at.
    ///
    /// An empty location is not an error: some create endpoints answer
    /// without one, and the caller just has nothing to echo.
    pub async fn follow_location(&self, location: &str) -> Result<Option<ApiResponse>, FizzyError> {
        if location.is_empty() {
            return Ok(None);
        }
        self.get(location).await.map(Some)
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, FizzyError> {
        let request_url = self.build_url(path);

        let mut request = self.prepare_request(self.client.request(method.clone(), &request_url));
        if let Some(body) = body {
            let json_body = serde_json::to_vec(body).map_err(|e| {
                FizzyError::general(format!("Failed to marshal request body: {e}"))
            })?;
            request = request.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(json_body);
        }

        info!("> {method} {request_url}");

        let response = request
            .send()
            .await
            .map_err(|e| FizzyError::network(format!("Request failed: {e}")))?;

        self.finish(response).await
    }

    /// Read the body, parse it, and classify the status.
    async fn finish(&self, response: Response) -> Result<ApiResponse, FizzyError> {
        let status = response.status();
        let location = header_value(&response, LOCATION);
        let link_next = header_value(&response, LINK).and_then(|link| parse_link_next(&link));

        let body = response
            .bytes()
            .await
            .map_err(|e| FizzyError::network(format!("Failed to read response: {e}")))?
            .to_vec();

        info!("< {} {}", status.as_u16(), status_text(status));

        let mut api_response = ApiResponse {
            status: status.as_u16(),
            body,
            data: None,
            location,
            link_next,
        };

        let parse_error = if api_response.body.is_empty() {
            None
        } else {
            match serde_json::from_slice::<Value>(&api_response.body) {
                Ok(data) => {
                    api_response.data = Some(data);
                    None
                }
                Err(e) => Some(e),
            }
        };

        if HttpStatusCode(api_response.status).is_error() {
            let error = error_from_response(status, api_response.data.as_ref());
            return Err(error.with_response(api_response));
        }

        if let Some(e) = parse_error {
            let error = FizzyError::general(format!("Failed to parse JSON response: {e}"));
            return Err(error.with_response(api_response));
        }

        Ok(api_response)
    }
}

fn is_absolute_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

fn header_value(response: &Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub(crate) fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}

/// Build the classified error for a status of 400 or above.
///
/// The message comes from `{"error": "..."}` when the server sent one,
/// otherwise from the status reason phrase. Any other fields in the body are
/// kept as details.
fn error_from_response(status: StatusCode, data: Option<&Value>) -> FizzyError {
    let server_message = data
        .and_then(|data| get_str(data, "error"))
        .filter(|message| !message.is_empty());

    let message = server_message.unwrap_or_else(|| status_text(status));
    let error = FizzyError::from_http_status(status.as_u16(), message);

    match data {
        Some(Value::Object(fields)) if fields.keys().any(|key| key != "error") => {
            error.with_details(Value::Object(fields.clone()))
        }
        _ => error,
    }
}

/// Extract the `rel="next"` URL from a `Link` header.
pub fn parse_link_next(link_header: &str) -> Option<String> {
    if link_header.is_empty() {
        return None;
    }
    link_next_regex()
        .captures(link_header)
        .and_then(|captures| captures.get(1))
        .map(|target| target.as_str().to_string())
}

//! Status code classification for API responses.

/// How an API response status is treated by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Below 400; the body is the result.
    Ok,
    /// 401: the token is missing, expired or revoked.
    Unauthorized,
    /// 403: the token is valid but lacks access.
    Forbidden,
    /// 404
    NotFound,
    /// 422: the server rejected the submitted fields.
    Unprocessable,
    /// Any other status of 400 or above.
    Failure,
}

/// Raw status as received, before it becomes an error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// The API reports every failure with a status of 400 or above.
    pub fn is_error(&self) -> bool {
        self.0 >= 400
    }

    pub fn class(&self) -> StatusClass {
        match self.0 {
            401 => StatusClass::Unauthorized,
            403 => StatusClass::Forbidden,
            404 => StatusClass::NotFound,
            422 => StatusClass::Unprocessable,
            _ if self.is_error() => StatusClass::Failure,
            _ => StatusClass::Ok,
        }
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

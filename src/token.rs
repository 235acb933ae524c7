use crate::error::{CargusError, Result};
use reqwest::header::HeaderValue;
use serde::Serialize;
use std::fmt;

/// Endpoint issuing access tokens
pub const LOGIN_ENDPOINT: &str = "LoginUser";

/// Credentials posted to the login endpoint.
#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
    #[serde(rename = "UserName")]
    pub username: &'a str,

    #[serde(rename = "Password")]
    pub password: &'a str,
}

impl<'a> LoginRequest<'a> {
    pub fn new(username: &'a str, password: &'a str) -> Self {
        LoginRequest { username, password }
    }
}

impl fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authorization header value for a bearer token
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Authorization header for a bearer token, marked sensitive
pub fn bearer_header(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&bearer(token)).map_err(|_| CargusError::InvalidToken)?;
    value.set_sensitive(true);
    Ok(value)
}

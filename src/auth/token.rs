use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of `POST /auth/login/`
#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token pair issued on login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Body of `POST /auth/refresh/`
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Refresh answer; `refresh` is only present when the server rotates it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl RefreshResponse {
    /// The token pair to persist, keeping `previous` when nothing was rotated
    pub fn into_pair(self, previous: &str) -> TokenPair {
        TokenPair {
            refresh: self.refresh.unwrap_or_else(|| previous.to_string()),
            access: self.access,
        }
    }
}

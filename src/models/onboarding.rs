use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of `POST /owners/accept-invite/`
#[derive(Clone, PartialEq, Serialize)]
pub struct AcceptInvite {
    pub token: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl fmt::Debug for AcceptInvite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcceptInvite")
            .field("token", &self.token)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AcceptInviteResponse {
    #[serde(default)]
    pub message: String,
    pub email: String,
}

use std::fmt;

use serde::{Deserialize, Serialize};

use super::tenant::TenantSummary;

/// Account role as sent by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Superadmin,
    Owner,
    Coach,
    Client,
    /// Any role this client does not know about
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self {
            Role::Superadmin => "SUPERADMIN",
            Role::Owner => "OWNER",
            Role::Coach => "COACH",
            Role::Client => "CLIENT",
            Role::Unknown => "UNKNOWN",
        };
        write!(f, "{}", role)
    }
}

/// A tenant reference that is either embedded or given by id only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TenantRef {
    Summary(TenantSummary),
    Id(i64),
}

impl TenantRef {
    pub fn id(&self) -> i64 {
        match self {
            TenantRef::Summary(summary) => summary.id,
            TenantRef::Id(id) => *id,
        }
    }

    pub fn summary(&self) -> Option<&TenantSummary> {
        match self {
            TenantRef::Summary(summary) => Some(summary),
            TenantRef::Id(_) => None,
        }
    }
}

/// Account record of the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    #[serde(default)]
    pub tenant: Option<TenantRef>,
}

impl UserProfile {
    /// "First Last", falling back to the e-mail when no name is set
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

/// The authenticated user as held by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub role: Role,
    #[serde(default)]
    pub tenant: Option<TenantSummary>,
    pub profile: UserProfile,
}

/// Body of `GET /me/`.
///
/// Accepts the nested `{role, tenant, profile}` envelope as well as the flat
/// account record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MeResponse {
    Envelope(CurrentUser),
    Flat(UserProfile),
}

impl From<MeResponse> for CurrentUser {
    fn from(response: MeResponse) -> Self {
        match response {
            MeResponse::Envelope(user) => user,
            MeResponse::Flat(profile) => CurrentUser {
                role: profile.role,
                tenant: profile
                    .tenant
                    .as_ref()
                    .and_then(TenantRef::summary)
                    .cloned(),
                profile,
            },
        }
    }
}

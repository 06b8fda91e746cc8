/// REST endpoint locations derived from the configured base URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    auth_base: String,
    api_base: String,
}

impl Endpoints {
    pub fn new(auth_base: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            auth_base: auth_base.into().trim_end_matches('/').to_string(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn login(&self) -> String {
        format!("{}/login/", self.auth_base)
    }

    pub fn refresh(&self) -> String {
        format!("{}/refresh/", self.auth_base)
    }

    pub fn me(&self) -> String {
        format!("{}/me/", self.api_base)
    }

    pub fn tenants(&self) -> String {
        format!("{}/tenants/", self.api_base)
    }

    pub fn tenant(&self, id: i64) -> String {
        format!("{}/tenants/{}/", self.api_base, id)
    }

    pub fn invite_owner(&self, tenant_id: i64) -> String {
        format!("{}/tenants/{}/invite-owner/", self.api_base, tenant_id)
    }

    pub fn assign_owner(&self, tenant_id: i64) -> String {
        format!("{}/tenants/{}/assign-owner/", self.api_base, tenant_id)
    }

    pub fn accept_invite(&self) -> String {
        format!("{}/owners/accept-invite/", self.api_base)
    }
}

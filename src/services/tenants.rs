use std::sync::Arc;

use tracing::{debug, info};

use crate::error::ConsoleResult;
use crate::http::{Endpoints, HttpClient, HttpRequest};
use crate::models::{AssignOwnerRequest, CreateTenant, InviteOwnerRequest, OwnerInvitation, TenantDetail};

/// Tenant administration endpoints. One call, one request.
#[derive(Debug, Clone)]
pub struct TenantService {
    http: Arc<dyn HttpClient>,
    endpoints: Endpoints,
}

impl TenantService {
    pub fn new(http: Arc<dyn HttpClient>, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    pub async fn list_tenants(&self) -> ConsoleResult<Vec<TenantDetail>> {
        let tenants: Vec<TenantDetail> = self
            .http
            .execute(HttpRequest::get(self.endpoints.tenants()))
            .await?
            .error_for_status()?
            .json()?;
        debug!(count = tenants.len(), "Tenants listed");
        Ok(tenants)
    }

    pub async fn create_tenant(&self, payload: &CreateTenant) -> ConsoleResult<TenantDetail> {
        let request = HttpRequest::post(self.endpoints.tenants()).json(payload)?;
        let tenant: TenantDetail = self
            .http
            .execute(request)
            .await?
            .error_for_status()?
            .json()?;
        info!(id = tenant.id(), slug = %tenant.summary.slug, "Tenant created");
        Ok(tenant)
    }

    pub async fn get_tenant(&self, id: i64) -> ConsoleResult<TenantDetail> {
        self.http
            .execute(HttpRequest::get(self.endpoints.tenant(id)))
            .await?
            .error_for_status()?
            .json()
    }

    /// Create an owner invitation; the returned token completes onboarding
    pub async fn invite_owner(&self, id: i64, email: &str) -> ConsoleResult<OwnerInvitation> {
        let request =
            HttpRequest::post(self.endpoints.invite_owner(id)).json(&InviteOwnerRequest { email })?;
        let invitation: OwnerInvitation = self
            .http
            .execute(request)
            .await?
            .error_for_status()?
            .json()?;
        info!(tenant = id, email = %email, "Owner invited");
        Ok(invitation)
    }

    /// Attach an existing user as owner. The server answers 204.
    pub async fn assign_owner(&self, id: i64, user_id: i64) -> ConsoleResult<()> {
        let request = HttpRequest::post(self.endpoints.assign_owner(id))
            .json(&AssignOwnerRequest { user_id })?;
        self.http.execute(request).await?.error_for_status()?;
        info!(tenant = id, user_id, "Owner assigned");
        Ok(())
    }
}

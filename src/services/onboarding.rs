use std::sync::Arc;

use tracing::info;

use crate::error::ConsoleResult;
use crate::http::{Endpoints, HttpClient, HttpRequest};
use crate::models::{AcceptInvite, AcceptInviteResponse};

#[derive(Debug, Clone)]
pub struct OwnerOnboardingService {
    http: Arc<dyn HttpClient>,
    endpoints: Endpoints,
}

impl OwnerOnboardingService {
    pub fn new(http: Arc<dyn HttpClient>, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    /// Redeem an invitation token, creating the owner account
    pub async fn accept_invite(&self, payload: &AcceptInvite) -> ConsoleResult<AcceptInviteResponse> {
        let request = HttpRequest::post(self.endpoints.accept_invite()).json(payload)?;
        let response: AcceptInviteResponse = self
            .http
            .execute(request)
            .await?
            .error_for_status()?
            .json()?;
        info!(email = %response.email, "Invitation accepted");
        Ok(response)
    }
}

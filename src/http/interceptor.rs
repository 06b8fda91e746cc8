//! Bearer injection and refresh-and-retry.
//!
//! At most one refresh exchange runs at a time. A request that gets a 401
//! while an exchange is running waits for its outcome on a watch channel
//! instead of starting another one; a request whose token was already
//! replaced by a finished exchange simply retries with the stored token.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::auth::AuthService;
use crate::error::{ConsoleError, ConsoleResult};
use crate::http::client::{HttpClient, HttpRequest, SimpleHttpResponse};

/// `None` until the refresher publishes its result
type RefreshOutcome = Option<ConsoleResult<String>>;

#[derive(Debug)]
enum RefreshSlot {
    Idle,
    InFlight(watch::Receiver<RefreshOutcome>),
}

enum Recovery {
    /// This request performs the exchange
    Refresh(watch::Sender<RefreshOutcome>),
    /// Another request is performing it
    Wait(watch::Receiver<RefreshOutcome>),
    /// An exchange already completed since this request was sent
    Reuse(String),
}

/// Resets the slot when the refresher finishes or is dropped
struct SlotRelease<'a> {
    slot: &'a Mutex<RefreshSlot>,
}

impl Drop for SlotRelease<'_> {
    fn drop(&mut self) {
        *self.slot.lock() = RefreshSlot::Idle;
    }
}

#[derive(Debug)]
pub struct RequestAuthenticator {
    transport: Arc<dyn HttpClient>,
    slot: Mutex<RefreshSlot>,
}

impl RequestAuthenticator {
    pub fn new(transport: Arc<dyn HttpClient>) -> Self {
        Self {
            transport,
            slot: Mutex::new(RefreshSlot::Idle),
        }
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(*self.slot.lock(), RefreshSlot::InFlight(_))
    }

    /// Send `request` with the stored bearer token.
    ///
    /// On a 401 the request is retried exactly once with a refreshed token.
    /// Any response other than 401 is returned untouched, whatever its status.
    pub async fn execute(
        &self,
        auth: &AuthService,
        request: HttpRequest,
    ) -> ConsoleResult<SimpleHttpResponse> {
        let sent_token = auth.access_token();
        let first = match &sent_token {
            Some(token) => request.clone().with_bearer(token),
            None => request.clone(),
        };

        let response = self.transport.execute(first).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }

        if auth.refresh_token().is_none() {
            warn!(url = %request.url, "Unauthorized and no refresh token available");
            return Err(ConsoleError::SessionExpired);
        }

        let token = self.recover(auth, sent_token.as_deref()).await?;
        debug!(url = %request.url, "Retrying request with refreshed token");

        let retried = self.transport.execute(request.with_bearer(&token)).await?;
        if retried.is_unauthorized() {
            return Err(ConsoleError::Unauthorized {
                detail: retried.detail(),
            });
        }
        Ok(retried)
    }

    /// Obtain a token to retry with, refreshing only when nobody else has
    async fn recover(&self, auth: &AuthService, sent_token: Option<&str>) -> ConsoleResult<String> {
        let recovery = {
            let mut slot = self.slot.lock();
            match &*slot {
                RefreshSlot::InFlight(receiver) => Recovery::Wait(receiver.clone()),
                RefreshSlot::Idle => match auth.access_token() {
                    Some(current) if Some(current.as_str()) != sent_token => {
                        Recovery::Reuse(current)
                    }
                    _ => {
                        let (sender, receiver) = watch::channel(None);
                        *slot = RefreshSlot::InFlight(receiver);
                        Recovery::Refresh(sender)
                    }
                },
            }
        };

        match recovery {
            Recovery::Reuse(token) => Ok(token),
            Recovery::Wait(receiver) => Self::wait_for_refresh(receiver).await,
            Recovery::Refresh(sender) => self.refresh(auth, sender).await,
        }
    }

    async fn refresh(
        &self,
        auth: &AuthService,
        sender: watch::Sender<RefreshOutcome>,
    ) -> ConsoleResult<String> {
        let _release = SlotRelease { slot: &self.slot };
        info!("Access token rejected, refreshing");

        let outcome = match auth.refresh_tokens().await {
            Ok(Some(token)) => Ok(token),
            Ok(None) => Err(ConsoleError::SessionExpired),
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            warn!(error = %e, "Refresh failed, ending session");
            auth.logout();
        }

        sender.send_replace(Some(outcome.clone()));
        outcome
    }

    async fn wait_for_refresh(
        mut receiver: watch::Receiver<RefreshOutcome>,
    ) -> ConsoleResult<String> {
        debug!("Waiting for in-flight refresh");
        let outcome = match receiver.wait_for(Option::is_some).await {
            Ok(value) => value.clone(),
            Err(_) => None,
        };
        outcome.unwrap_or_else(|| {
            Err(ConsoleError::RefreshFailed {
                reason: "refresh abandoned".to_string(),
            })
        })
    }
}

/// [`HttpClient`] that authenticates every request through the session
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    auth: Arc<AuthService>,
}

impl AuthenticatedClient {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }
}

#[async_trait]
impl HttpClient for AuthenticatedClient {
    async fn execute(&self, request: HttpRequest) -> ConsoleResult<SimpleHttpResponse> {
        self.auth.authorized(request).await
    }
}

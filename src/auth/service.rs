use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::auth::session::SessionPublisher;
use crate::auth::storage::{SessionStore, StorageKey};
use crate::auth::token::{LoginRequest, RefreshRequest, RefreshResponse, TokenPair};
use crate::error::{ConsoleError, ConsoleResult};
use crate::http::{Endpoints, HttpClient, HttpRequest, RequestAuthenticator, SimpleHttpResponse};
use crate::models::{CurrentUser, MeResponse, Role};
use crate::routing::navigator::Navigator;
use crate::routing::routes::{LOGIN_ROUTE, OWNER_HOME, SUPERADMIN_HOME};

/// Session coordinator.
///
/// Sole writer of the session store and the session publisher. Login and
/// refresh calls go straight to the transport; every other call is routed
/// through the [`RequestAuthenticator`] so it carries the bearer token and
/// gets one refresh-and-retry on a 401.
#[derive(Debug)]
pub struct AuthService {
    transport: Arc<dyn HttpClient>,
    endpoints: Endpoints,
    store: Arc<dyn SessionStore>,
    publisher: SessionPublisher,
    navigator: Arc<dyn Navigator>,
    authenticator: RequestAuthenticator,
}

impl AuthService {
    /// Create the coordinator, seeding the published user from storage.
    ///
    /// A cached profile is only trusted while an access token is present.
    pub fn new(
        transport: Arc<dyn HttpClient>,
        endpoints: Endpoints,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let has_token = read_key(store.as_ref(), StorageKey::AccessToken).is_some();
        let initial = if has_token {
            read_stored_user(store.as_ref())
        } else {
            None
        };

        Self {
            authenticator: RequestAuthenticator::new(Arc::clone(&transport)),
            transport,
            endpoints,
            store,
            publisher: SessionPublisher::new(initial),
            navigator,
        }
    }

    /// Load the profile when a token survived from an earlier run but the
    /// cached user did not. A failure ends the session.
    pub async fn restore(&self) {
        if !self.is_authenticated() || self.publisher.current().is_some() {
            return;
        }
        debug!("Access token found without cached profile, loading profile");
        match self.load_profile().await {
            Ok(user) => self.set_current_user(user),
            Err(e) => {
                warn!(error = %e, "Failed to restore session");
                self.clear_session();
            }
        }
    }

    /// Authenticate with e-mail and password.
    ///
    /// On success the tokens are stored, the profile is fetched and
    /// published, and the navigator is sent to the role's landing page. On
    /// failure any partial session is cleared and the server error returned.
    pub async fn login(&self, email: &str, password: &str) -> ConsoleResult<CurrentUser> {
        info!(email = %email, "Logging in");
        match self.try_login(email, password).await {
            Ok(user) => {
                info!(email = %email, role = %user.role, "Login succeeded");
                self.navigator
                    .navigate(Self::default_route_for_role(Some(user.role)));
                Ok(user)
            }
            Err(e) => {
                warn!(email = %email, error = %e, "Login failed");
                self.clear_session();
                Err(e)
            }
        }
    }

    async fn try_login(&self, email: &str, password: &str) -> ConsoleResult<CurrentUser> {
        let request =
            HttpRequest::post(self.endpoints.login()).json(&LoginRequest { email, password })?;
        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            return Err(ConsoleError::Authentication {
                status: response.status.as_u16(),
                detail: response.detail(),
            });
        }

        let tokens: TokenPair = response.json()?;
        self.store_tokens(&tokens)?;

        let user = self.load_profile().await?;
        self.set_current_user(user.clone());
        Ok(user)
    }

    /// End the session and return to the login page
    pub fn logout(&self) {
        info!("Logging out");
        self.clear_session();
        self.navigator.navigate(LOGIN_ROUTE);
    }

    /// True iff an access token is stored. No network call.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Make sure a profile is published.
    ///
    /// Returns immediately when one is cached. Never errors: a failed fetch
    /// clears the session and reports `false`.
    pub async fn ensure_profile_loaded(&self) -> bool {
        if !self.is_authenticated() {
            self.clear_session();
            return false;
        }

        if self.publisher.current().is_some() {
            return true;
        }

        match self.load_profile().await {
            Ok(user) => {
                self.set_current_user(user);
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to load profile");
                self.clear_session();
                false
            }
        }
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Returns `Ok(None)` without any request when no refresh token is
    /// stored. A rotated refresh token is persisted together with the access
    /// token. A rejected exchange clears the session.
    pub async fn refresh_tokens(&self) -> ConsoleResult<Option<String>> {
        let Some(refresh) = self.refresh_token() else {
            debug!("No refresh token stored, skipping refresh");
            return Ok(None);
        };

        match self.exchange_refresh_token(&refresh).await {
            Ok(response) => {
                let rotated = response.refresh.is_some();
                let tokens = response.into_pair(&refresh);
                if let Err(e) = self.store_tokens(&tokens) {
                    error!(error = %e, "Failed to persist refreshed tokens");
                    self.clear_session();
                    return Err(e);
                }
                info!(rotated, "Access token refreshed");
                Ok(Some(tokens.access))
            }
            Err(e) => {
                warn!(error = %e, "Token refresh rejected");
                self.clear_session();
                Err(e)
            }
        }
    }

    async fn exchange_refresh_token(&self, refresh: &str) -> ConsoleResult<RefreshResponse> {
        let request =
            HttpRequest::post(self.endpoints.refresh()).json(&RefreshRequest { refresh })?;
        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            let reason = response
                .detail()
                .unwrap_or_else(|| format!("refresh endpoint answered {}", response.status));
            return Err(ConsoleError::RefreshFailed { reason });
        }
        response.json()
    }

    /// Landing page for a role; unknown or missing roles go to login
    pub fn default_route_for_role(role: Option<Role>) -> &'static str {
        match role {
            Some(Role::Superadmin) => SUPERADMIN_HOME,
            Some(Role::Owner) => OWNER_HOME,
            _ => LOGIN_ROUTE,
        }
    }

    pub fn access_token(&self) -> Option<String> {
        read_key(self.store.as_ref(), StorageKey::AccessToken)
    }

    pub fn refresh_token(&self) -> Option<String> {
        read_key(self.store.as_ref(), StorageKey::RefreshToken)
    }

    /// The published user, or `None` whenever no access token is stored
    pub fn current_user(&self) -> Option<CurrentUser> {
        if !self.is_authenticated() {
            return None;
        }
        self.publisher.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<CurrentUser>> {
        self.publisher.subscribe()
    }

    /// Whether a refresh exchange is currently in flight
    pub fn is_refreshing(&self) -> bool {
        self.authenticator.is_refreshing()
    }

    /// Send a request with the bearer token and refresh-and-retry on 401
    pub async fn authorized(&self, request: HttpRequest) -> ConsoleResult<SimpleHttpResponse> {
        self.authenticator.execute(self, request).await
    }

    async fn load_profile(&self) -> ConsoleResult<CurrentUser> {
        let response = self
            .authorized(HttpRequest::get(self.endpoints.me()))
            .await?
            .error_for_status()?;
        let me: MeResponse = response.json()?;
        let user = CurrentUser::from(me);
        debug!(email = %user.profile.email, role = %user.role, "Profile loaded");
        Ok(user)
    }

    fn store_tokens(&self, tokens: &TokenPair) -> ConsoleResult<()> {
        self.store.set_many(&[
            (StorageKey::AccessToken, tokens.access.clone()),
            (StorageKey::RefreshToken, tokens.refresh.clone()),
        ])
    }

    fn set_current_user(&self, user: CurrentUser) {
        match serde_json::to_string(&user) {
            Ok(raw) => {
                if let Err(e) = self.store.set(StorageKey::CurrentUser, raw) {
                    warn!(error = %e, "Failed to cache current user");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize current user"),
        }
        self.publisher.publish(Some(user));
    }

    fn clear_session(&self) {
        if let Err(e) = self.store.clear() {
            error!(error = %e, "Failed to clear session storage");
        }
        self.publisher.publish(None);
    }
}

fn read_key(store: &dyn SessionStore, key: StorageKey) -> Option<String> {
    match store.get(key) {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(e) => {
            warn!(key = key.as_str(), error = %e, "Failed to read session storage");
            None
        }
    }
}

/// Read the cached user, dropping it when it no longer parses
fn read_stored_user(store: &dyn SessionStore) -> Option<CurrentUser> {
    let raw = read_key(store, StorageKey::CurrentUser)?;
    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!(error = %e, "Cached user is unreadable, discarding");
            if let Err(e) = store.remove(StorageKey::CurrentUser) {
                warn!(error = %e, "Failed to discard cached user");
            }
            None
        }
    }
}

//! Composition root.
//!
//! [`Console`] builds the session coordinator once and hands it to every
//! component that needs it.

use std::sync::Arc;

use tracing::debug;

use crate::auth::{AuthService, FileSessionStore, SessionStore};
use crate::config::Config;
use crate::error::ConsoleResult;
use crate::http::{AuthenticatedClient, Endpoints, HttpClient, ReqwestHttpClient};
use crate::routing::{GuardChain, NavigationHistory, Router, RouteTable};
use crate::services::{OwnerOnboardingService, TenantService};
use crate::views::{
    AcceptInviteView, LoginView, OwnerDashboardView, OwnerSettingsView, TenantCreateView,
    TenantDetailView, TenantListView,
};

#[derive(Debug)]
pub struct Console {
    config: Config,
    navigator: Arc<NavigationHistory>,
    auth: Arc<AuthService>,
    router: Arc<Router>,
    tenants: TenantService,
    onboarding: OwnerOnboardingService,
}

impl Console {
    /// Wire the console against the real network and the session file
    pub fn new(config: Config) -> ConsoleResult<Self> {
        let transport = ReqwestHttpClient::with_timeout(config.http.timeout())?;
        let store = FileSessionStore::open(config.storage.session_path.clone())?;
        Ok(Self::with_parts(config, Arc::new(transport), Arc::new(store)))
    }

    pub fn with_parts(
        config: Config,
        transport: Arc<dyn HttpClient>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let endpoints = Endpoints::new(&config.api.auth_url, &config.api.base_url);
        let navigator = Arc::new(NavigationHistory::new());

        let auth = Arc::new(AuthService::new(
            transport,
            endpoints.clone(),
            store,
            navigator.clone(),
        ));
        let router = Arc::new(Router::new(
            RouteTable::standard(),
            GuardChain::standard(auth.clone()),
            navigator.clone(),
        ));

        let authenticated: Arc<dyn HttpClient> = Arc::new(AuthenticatedClient::new(auth.clone()));
        debug!(auth = %config.api.auth_url, api = %config.api.base_url, "Console wired");

        Self {
            tenants: TenantService::new(authenticated.clone(), endpoints.clone()),
            onboarding: OwnerOnboardingService::new(authenticated, endpoints),
            config,
            navigator,
            auth,
            router,
        }
    }

    /// Bring a session left by a previous run back to life
    pub async fn restore(&self) {
        self.auth.restore().await;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn auth(&self) -> &Arc<AuthService> {
        &self.auth
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn navigator(&self) -> &Arc<NavigationHistory> {
        &self.navigator
    }

    pub fn tenants(&self) -> &TenantService {
        &self.tenants
    }

    pub fn onboarding(&self) -> &OwnerOnboardingService {
        &self.onboarding
    }

    pub fn login_view(&self) -> LoginView {
        LoginView::new(self.auth.clone())
    }

    pub fn tenant_list_view(&self) -> TenantListView {
        TenantListView::new(self.tenants.clone(), self.router.clone())
    }

    pub fn tenant_create_view(&self) -> TenantCreateView {
        TenantCreateView::new(self.tenants.clone(), self.router.clone())
    }

    pub fn tenant_detail_view(&self) -> TenantDetailView {
        TenantDetailView::new(self.tenants.clone())
    }

    pub fn owner_dashboard_view(&self) -> OwnerDashboardView {
        OwnerDashboardView::new(self.auth.subscribe())
    }

    pub fn owner_settings_view(&self) -> OwnerSettingsView {
        OwnerSettingsView::new(self.auth.subscribe())
    }

    pub fn accept_invite_view(&self, token: &str) -> AcceptInviteView {
        AcceptInviteView::new(self.onboarding.clone(), self.auth.clone(), token)
    }
}

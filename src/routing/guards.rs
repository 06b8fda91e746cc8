//! Navigation guards.
//!
//! A guard inspects the resolved route and either lets navigation proceed
//! or names another location. Guards never touch the session beyond what
//! [`AuthService::ensure_profile_loaded`] does.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::auth::AuthService;
use crate::routing::routes::{RouteMatch, LOGIN_ROUTE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

impl GuardDecision {
    pub fn redirect(path: impl Into<String>) -> Self {
        Self::Redirect(path.into())
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

#[async_trait]
pub trait RouteGuard: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    async fn check(&self, route: &RouteMatch) -> GuardDecision;
}

/// Requires a stored token and a loadable profile
#[derive(Debug, Clone)]
pub struct AuthGuard {
    auth: Arc<AuthService>,
}

impl AuthGuard {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }
}

async fn require_session(auth: &AuthService) -> GuardDecision {
    if !auth.is_authenticated() {
        return GuardDecision::redirect(LOGIN_ROUTE);
    }
    if !auth.ensure_profile_loaded().await {
        return GuardDecision::redirect(LOGIN_ROUTE);
    }
    GuardDecision::Allow
}

#[async_trait]
impl RouteGuard for AuthGuard {
    fn name(&self) -> &'static str {
        "auth"
    }

    async fn check(&self, _route: &RouteMatch) -> GuardDecision {
        require_session(&self.auth).await
    }
}

/// Requires the user's role to be one of the route's required roles.
///
/// A user with the wrong role is sent to their own landing page.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    auth: Arc<AuthService>,
}

impl RoleGuard {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }
}

#[async_trait]
impl RouteGuard for RoleGuard {
    fn name(&self) -> &'static str {
        "role"
    }

    async fn check(&self, route: &RouteMatch) -> GuardDecision {
        if route.required_roles.is_empty() {
            return require_session(&self.auth).await;
        }

        if !self.auth.ensure_profile_loaded().await {
            return GuardDecision::redirect(LOGIN_ROUTE);
        }

        match self.auth.current_user() {
            None => GuardDecision::redirect(LOGIN_ROUTE),
            Some(user) if route.required_roles.contains(&user.role) => GuardDecision::Allow,
            Some(user) => {
                debug!(role = %user.role, path = %route.path, "Role not allowed on route");
                GuardDecision::redirect(AuthService::default_route_for_role(Some(user.role)))
            }
        }
    }
}

/// Ordered guards; the first one that does not allow decides
#[derive(Debug, Clone, Default)]
pub struct GuardChain {
    guards: Vec<Arc<dyn RouteGuard>>,
}

impl GuardChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// The chain applied to every guarded route
    pub fn standard(auth: Arc<AuthService>) -> Self {
        Self::new()
            .with(AuthGuard::new(auth.clone()))
            .with(RoleGuard::new(auth))
    }

    pub fn with(mut self, guard: impl RouteGuard + 'static) -> Self {
        self.guards.push(Arc::new(guard));
        self
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    pub async fn evaluate(&self, route: &RouteMatch) -> GuardDecision {
        for guard in &self.guards {
            let decision = guard.check(route).await;
            if !decision.is_allowed() {
                debug!(guard = guard.name(), path = %route.path, ?decision, "Navigation blocked");
                return decision;
            }
        }
        GuardDecision::Allow
    }
}

use tokio::sync::watch;

use crate::models::{CurrentUser, TenantSummary, UserProfile};

/// Owner landing page; reads the published session
#[derive(Debug, Clone)]
pub struct OwnerDashboardView {
    session: watch::Receiver<Option<CurrentUser>>,
}

impl OwnerDashboardView {
    pub fn new(session: watch::Receiver<Option<CurrentUser>>) -> Self {
        Self { session }
    }

    pub fn user(&self) -> Option<CurrentUser> {
        self.session.borrow().clone()
    }
}

#[derive(Debug, Clone)]
pub struct OwnerSettingsView {
    session: watch::Receiver<Option<CurrentUser>>,
}

impl OwnerSettingsView {
    pub fn new(session: watch::Receiver<Option<CurrentUser>>) -> Self {
        Self { session }
    }

    pub fn tenant(&self) -> Option<TenantSummary> {
        self.session.borrow().as_ref().and_then(|u| u.tenant.clone())
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.session.borrow().as_ref().map(|u| u.profile.clone())
    }
}

use std::sync::Arc;

use tracing::warn;

use crate::error::{ConsoleError, ConsoleResult};
use crate::models::{CreateTenant, OwnerInvitation, TenantDetail};
use crate::routing::{Location, Router};
use crate::services::TenantService;

use super::{detail_or, require, require_email};

const LIST_FAILED: &str = "Impossible de charger les tenants.";
const CREATE_FAILED: &str = "Impossible de créer le tenant.";
const LOAD_FAILED: &str = "Impossible de charger le tenant.";
const INVITE_FAILED: &str = "Impossible d'envoyer l'invitation.";

/// Superadmin tenant list
#[derive(Debug)]
pub struct TenantListView {
    service: TenantService,
    router: Arc<Router>,
    tenants: Vec<TenantDetail>,
    error: Option<String>,
}

impl TenantListView {
    pub fn new(service: TenantService, router: Arc<Router>) -> Self {
        Self {
            service,
            router,
            tenants: Vec::new(),
            error: None,
        }
    }

    pub fn tenants(&self) -> &[TenantDetail] {
        &self.tenants
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn fetch(&mut self) {
        self.error = None;
        match self.service.list_tenants().await {
            Ok(tenants) => self.tenants = tenants,
            Err(e) => {
                warn!(error = %e, "Failed to list tenants");
                self.error = Some(LIST_FAILED.to_string());
            }
        }
    }

    pub async fn open_tenant(&self, id: i64) -> ConsoleResult<Location> {
        self.router
            .navigate(&format!("/superadmin/tenants/{id}"))
            .await
    }

    pub async fn create_tenant(&self) -> ConsoleResult<Location> {
        self.router.navigate("/superadmin/tenants/new").await
    }
}

/// Input of the tenant creation form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantForm {
    pub name: String,
    pub slug: String,
    pub contact_email: String,
    pub logo_url: String,
    pub theme_primary: String,
    pub theme_secondary: String,
    pub address: String,
    pub is_active: bool,
}

impl Default for TenantForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: String::new(),
            contact_email: String::new(),
            logo_url: String::new(),
            theme_primary: String::new(),
            theme_secondary: String::new(),
            address: String::new(),
            is_active: true,
        }
    }
}

fn optional(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl TenantForm {
    pub fn validate(&self) -> Vec<ConsoleError> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "slug", &self.slug);
        require_email(&mut errors, "contact_email", &self.contact_email);
        errors
    }

    pub fn to_payload(&self) -> CreateTenant {
        CreateTenant {
            name: self.name.clone(),
            slug: self.slug.clone(),
            logo_url: optional(&self.logo_url),
            theme_primary: optional(&self.theme_primary),
            theme_secondary: optional(&self.theme_secondary),
            address: optional(&self.address),
            contact_email: optional(&self.contact_email),
            is_active: Some(self.is_active),
        }
    }
}

#[derive(Debug)]
pub struct TenantCreateView {
    service: TenantService,
    router: Arc<Router>,
    error: Option<String>,
    invalid: Vec<ConsoleError>,
}

impl TenantCreateView {
    pub fn new(service: TenantService, router: Arc<Router>) -> Self {
        Self {
            service,
            router,
            error: None,
            invalid: Vec::new(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn invalid_fields(&self) -> &[ConsoleError] {
        &self.invalid
    }

    /// Create the tenant and move to its detail page
    pub async fn submit(&mut self, form: &TenantForm) -> Option<TenantDetail> {
        self.invalid = form.validate();
        if !self.invalid.is_empty() {
            return None;
        }

        self.error = None;
        match self.service.create_tenant(&form.to_payload()).await {
            Ok(tenant) => {
                let path = format!("/superadmin/tenants/{}", tenant.id());
                if let Err(e) = self.router.navigate(&path).await {
                    warn!(error = %e, path = %path, "Failed to open created tenant");
                }
                Some(tenant)
            }
            Err(e) => {
                self.error = Some(detail_or(&e, CREATE_FAILED));
                None
            }
        }
    }
}

#[derive(Debug)]
pub struct TenantDetailView {
    service: TenantService,
    tenant: Option<TenantDetail>,
    error: Option<String>,
    info: Option<String>,
}

impl TenantDetailView {
    pub fn new(service: TenantService) -> Self {
        Self {
            service,
            tenant: None,
            error: None,
            info: None,
        }
    }

    pub fn tenant(&self) -> Option<&TenantDetail> {
        self.tenant.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    pub async fn load(&mut self, id: i64) {
        self.error = None;
        self.info = None;
        match self.service.get_tenant(id).await {
            Ok(tenant) => self.tenant = Some(tenant),
            Err(e) => {
                warn!(tenant = id, error = %e, "Failed to load tenant");
                self.error = Some(LOAD_FAILED.to_string());
            }
        }
    }

    /// Invite an owner for the loaded tenant. Does nothing before a tenant
    /// is loaded or when `email` is empty.
    pub async fn invite_owner(&mut self, email: &str) -> Option<OwnerInvitation> {
        let id = self.tenant.as_ref()?.id();
        if email.is_empty() {
            return None;
        }

        match self.service.invite_owner(id, email).await {
            Ok(invitation) => {
                self.info = Some(format!("Invitation envoyée ! Token: {}", invitation.token));
                Some(invitation)
            }
            Err(e) => {
                warn!(tenant = id, error = %e, "Failed to invite owner");
                self.error = Some(INVITE_FAILED.to_string());
                None
            }
        }
    }
}

use std::sync::Arc;

use tracing::warn;

use crate::auth::AuthService;
use crate::error::ConsoleError;
use crate::models::{AcceptInvite, CurrentUser};
use crate::services::OwnerOnboardingService;

use super::{detail_or, require};

const INVALID_LINK: &str = "Le lien d'invitation est invalide.";
const LOGIN_AFTER_SIGNUP_FAILED: &str = "Compte créé mais connexion impossible.";
const SIGNUP_FAILED: &str = "Impossible de finaliser votre inscription.";
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptInviteForm {
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl AcceptInviteForm {
    pub fn validate(&self) -> Vec<ConsoleError> {
        let mut errors = Vec::new();
        if self.password.is_empty() {
            errors.push(ConsoleError::validation("password", "required"));
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(ConsoleError::validation(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        require(&mut errors, "first_name", &self.first_name);
        require(&mut errors, "last_name", &self.last_name);
        errors
    }
}

/// Owner onboarding from an invitation link
#[derive(Debug)]
pub struct AcceptInviteView {
    onboarding: OwnerOnboardingService,
    auth: Arc<AuthService>,
    token: String,
    error: Option<String>,
    invalid: Vec<ConsoleError>,
}

impl AcceptInviteView {
    pub fn new(onboarding: OwnerOnboardingService, auth: Arc<AuthService>, token: &str) -> Self {
        let error = token.is_empty().then(|| INVALID_LINK.to_string());
        Self {
            onboarding,
            auth,
            token: token.to_string(),
            error,
            invalid: Vec::new(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn invalid_fields(&self) -> &[ConsoleError] {
        &self.invalid
    }

    /// Create the account, then sign in with the e-mail the server returns
    /// and the password just chosen.
    pub async fn submit(&mut self, form: &AcceptInviteForm) -> Option<CurrentUser> {
        if self.token.is_empty() {
            return None;
        }
        self.invalid = form.validate();
        if !self.invalid.is_empty() {
            return None;
        }

        self.error = None;
        let payload = AcceptInvite {
            token: self.token.clone(),
            password: form.password.clone(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
        };

        let response = match self.onboarding.accept_invite(&payload).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Failed to accept invitation");
                let message = e
                    .server_field("token")
                    .unwrap_or_else(|| detail_or(&e, SIGNUP_FAILED));
                self.error = Some(message);
                return None;
            }
        };

        match self.auth.login(&response.email, &payload.password).await {
            Ok(user) => Some(user),
            Err(e) => {
                self.error = Some(detail_or(&e, LOGIN_AFTER_SIGNUP_FAILED));
                None
            }
        }
    }
}

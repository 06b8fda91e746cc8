use std::sync::Arc;

use crate::auth::AuthService;
use crate::error::ConsoleError;
use crate::models::CurrentUser;

use super::{detail_or, require, require_email};

const LOGIN_FAILED: &str = "Une erreur est survenue pendant la connexion.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Vec<ConsoleError> {
        let mut errors = Vec::new();
        require_email(&mut errors, "email", &self.email);
        require(&mut errors, "password", &self.password);
        errors
    }
}

#[derive(Debug)]
pub struct LoginView {
    auth: Arc<AuthService>,
    error: Option<String>,
    invalid: Vec<ConsoleError>,
}

impl LoginView {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self {
            auth,
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

    /// Validate and log in. Navigation to the landing page is done by the
    /// coordinator.
    pub async fn submit(&mut self, form: &LoginForm) -> Option<CurrentUser> {
        self.invalid = form.validate();
        if !self.invalid.is_empty() {
            return None;
        }

        self.error = None;
        match self.auth.login(&form.email, &form.password).await {
            Ok(user) => Some(user),
            Err(e) => {
                self.error = Some(detail_or(&e, LOGIN_FAILED));
                None
            }
        }
    }
}

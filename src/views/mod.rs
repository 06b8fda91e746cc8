//! Headless screen state.
//!
//! Each view keeps the same state a rendered screen would (field errors, the
//! banner message, loaded records) and turns service failures into the
//! messages shown to the user. Form validation happens here, so invalid
//! input never reaches the network.

pub mod accept_invite;
pub mod login;
pub mod owner;
pub mod tenants;

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ConsoleError;

pub use accept_invite::{AcceptInviteForm, AcceptInviteView};
pub use login::{LoginForm, LoginView};
pub use owner::{OwnerDashboardView, OwnerSettingsView};
pub use tenants::{TenantCreateView, TenantDetailView, TenantForm, TenantListView};

const EMAIL_MAX_LEN: usize = 254;
const EMAIL_LOCAL_MAX_LEN: usize = 64;

fn email_pattern() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(
                r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
            )
            .ok()
        })
        .as_ref()
}

/// Same acceptance rules as a browser form's e-mail validator
pub fn is_valid_email(value: &str) -> bool {
    if value.is_empty() || value.len() > EMAIL_MAX_LEN {
        return false;
    }
    match value.split_once('@') {
        Some((local, _)) if local.len() <= EMAIL_LOCAL_MAX_LEN => {}
        _ => return false,
    }
    email_pattern().is_some_and(|re| re.is_match(value))
}

pub(crate) fn require(errors: &mut Vec<ConsoleError>, field: &str, value: &str) {
    if value.is_empty() {
        errors.push(ConsoleError::validation(field, "required"));
    }
}

pub(crate) fn require_email(errors: &mut Vec<ConsoleError>, field: &str, value: &str) {
    if value.is_empty() {
        errors.push(ConsoleError::validation(field, "required"));
    } else if !is_valid_email(value) {
        errors.push(ConsoleError::validation(field, "invalid e-mail address"));
    }
}

/// The server's `detail`, or `fallback` when it sent none
pub(crate) fn detail_or(err: &ConsoleError, fallback: &str) -> String {
    err.server_detail().unwrap_or(fallback).to_string()
}

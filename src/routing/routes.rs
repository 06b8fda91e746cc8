//! Application route configuration

use std::collections::HashMap;

use crate::models::Role;

pub const LOGIN_ROUTE: &str = "/auth/login";
pub const SUPERADMIN_HOME: &str = "/superadmin/tenants";
pub const OWNER_HOME: &str = "/owner/dashboard";

/// Screens the application can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    TenantList,
    TenantCreate,
    TenantDetail,
    OwnerDashboard,
    OwnerSettings,
    AcceptInvite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    Page(Page),
    Redirect(&'static str),
}

/// One entry of the route table.
///
/// Patterns are absolute paths whose segments are either literals or
/// `:name` parameters.
#[derive(Debug, Clone)]
pub struct RouteDefinition {
    pattern: &'static str,
    target: RouteTarget,
    required_roles: Vec<Role>,
    guarded: bool,
}

impl RouteDefinition {
    pub fn page(pattern: &'static str, page: Page) -> Self {
        Self {
            pattern,
            target: RouteTarget::Page(page),
            required_roles: Vec::new(),
            guarded: false,
        }
    }

    pub fn redirect(pattern: &'static str, to: &'static str) -> Self {
        Self {
            pattern,
            target: RouteTarget::Redirect(to),
            required_roles: Vec::new(),
            guarded: false,
        }
    }

    /// Require a session, and one of `roles` when non-empty
    pub fn guarded(mut self, roles: &[Role]) -> Self {
        self.guarded = true;
        self.required_roles = roles.to_vec();
        self
    }

    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let pattern: Vec<&str> = segments(self.pattern).collect();
        let actual: Vec<&str> = segments(path).collect();
        if pattern.len() != actual.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (expected, given) in pattern.iter().zip(actual) {
            match expected.strip_prefix(':') {
                Some(name) => {
                    params.insert(name.to_string(), given.to_string());
                }
                None if *expected == given => {}
                None => return None,
            }
        }
        Some(params)
    }
}

/// The outcome of resolving a path against the table
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    /// Normalized path that was resolved
    pub path: String,
    pub target: RouteTarget,
    pub params: HashMap<String, String>,
    pub required_roles: Vec<Role>,
    pub guarded: bool,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDefinition>,
    fallback: &'static str,
}

impl RouteTable {
    /// Routes are tried in order; unmatched paths redirect to `fallback`
    pub fn new(routes: Vec<RouteDefinition>, fallback: &'static str) -> Self {
        Self { routes, fallback }
    }

    pub fn standard() -> Self {
        let superadmin = [Role::Superadmin];
        let owner = [Role::Owner];
        Self::new(
            vec![
                RouteDefinition::page(LOGIN_ROUTE, Page::Login),
                RouteDefinition::redirect("/superadmin", SUPERADMIN_HOME),
                RouteDefinition::page(SUPERADMIN_HOME, Page::TenantList).guarded(&superadmin),
                RouteDefinition::page("/superadmin/tenants/new", Page::TenantCreate)
                    .guarded(&superadmin),
                RouteDefinition::page("/superadmin/tenants/:id", Page::TenantDetail)
                    .guarded(&superadmin),
                RouteDefinition::redirect("/owner", OWNER_HOME),
                RouteDefinition::page(OWNER_HOME, Page::OwnerDashboard).guarded(&owner),
                RouteDefinition::page("/owner/settings", Page::OwnerSettings).guarded(&owner),
                RouteDefinition::page("/accept-invite/:token", Page::AcceptInvite),
                RouteDefinition::redirect("/", LOGIN_ROUTE),
            ],
            LOGIN_ROUTE,
        )
    }

    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    pub fn resolve(&self, path: &str) -> RouteMatch {
        let path = normalize(path);
        for route in &self.routes {
            if let Some(params) = route.matches(&path) {
                return RouteMatch {
                    path,
                    target: route.target.clone(),
                    params,
                    required_roles: route.required_roles.clone(),
                    guarded: route.guarded,
                };
            }
        }

        RouteMatch {
            path,
            target: RouteTarget::Redirect(self.fallback),
            params: HashMap::new(),
            required_roles: Vec::new(),
            guarded: false,
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Drop query and fragment, collapse slashes, and strip the trailing one
fn normalize(path: &str) -> String {
    let end = path.find(|c| c == '?' || c == '#').unwrap_or(path.len());
    let parts: Vec<&str> = segments(&path[..end]).collect();
    format!("/{}", parts.join("/"))
}

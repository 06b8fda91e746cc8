use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{ConsoleError, ConsoleResult};
use crate::routing::guards::{GuardChain, GuardDecision};
use crate::routing::navigator::Navigator;
use crate::routing::routes::{Page, RouteTable, RouteTarget};

/// Redirect hops allowed for a single navigation
pub const MAX_REDIRECTS: usize = 8;

/// Where a navigation ended up
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub path: String,
    pub page: Page,
    pub params: HashMap<String, String>,
}

impl Location {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Guard-aware navigation over a [`RouteTable`]
#[derive(Debug)]
pub struct Router {
    table: RouteTable,
    guards: GuardChain,
    navigator: Arc<dyn Navigator>,
}

impl Router {
    pub fn new(table: RouteTable, guards: GuardChain, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            table,
            guards,
            navigator,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn current(&self) -> String {
        self.navigator.current()
    }

    /// Resolve `path`, following static and guard redirects, and commit the
    /// final location to the navigator.
    pub async fn navigate(&self, path: &str) -> ConsoleResult<Location> {
        let mut target = path.to_string();

        for _ in 0..=MAX_REDIRECTS {
            let route = self.table.resolve(&target);
            let next = match &route.target {
                RouteTarget::Redirect(to) => to.to_string(),
                RouteTarget::Page(page) => {
                    let decision = if route.guarded {
                        self.guards.evaluate(&route).await
                    } else {
                        GuardDecision::Allow
                    };
                    match decision {
                        GuardDecision::Allow => {
                            info!(path = %route.path, ?page, "Navigation committed");
                            self.navigator.navigate(&route.path);
                            return Ok(Location {
                                path: route.path,
                                page: *page,
                                params: route.params,
                            });
                        }
                        GuardDecision::Redirect(to) => to,
                    }
                }
            };
            debug!(from = %route.path, to = %next, "Redirecting");
            target = next;
        }

        Err(ConsoleError::Navigation(format!(
            "Too many redirects while navigating to {path}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::guards::RouteGuard;
    use crate::routing::navigator::NavigationHistory;
    use crate::routing::routes::{RouteDefinition, RouteMatch, LOGIN_ROUTE};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct AlwaysTo(&'static str);

    #[async_trait]
    impl RouteGuard for AlwaysTo {
        fn name(&self) -> &'static str {
            "always"
        }

        async fn check(&self, _route: &RouteMatch) -> GuardDecision {
            GuardDecision::redirect(self.0)
        }
    }

    #[tokio::test]
    async fn test_public_route_commits() {
        let nav = Arc::new(NavigationHistory::new());
        let router = Router::new(RouteTable::standard(), GuardChain::new(), nav.clone());

        let location = router.navigate("/accept-invite/tok").await.unwrap();

        assert_eq!(location.page, Page::AcceptInvite);
        assert_eq!(location.param("token"), Some("tok"));
        assert_eq!(nav.current(), "/accept-invite/tok");
    }

    #[tokio::test]
    async fn test_static_redirects_are_followed() {
        let nav = Arc::new(NavigationHistory::new());
        let router = Router::new(RouteTable::standard(), GuardChain::new(), nav);

        let location = router.navigate("/").await.unwrap();

        assert_eq!(location.page, Page::Login);
        assert_eq!(location.path, LOGIN_ROUTE);
    }

    #[tokio::test]
    async fn test_guard_redirect_loop_is_an_error() {
        let table = RouteTable::new(
            vec![RouteDefinition::page("/a", Page::OwnerDashboard).guarded(&[])],
            "/a",
        );
        let nav = Arc::new(NavigationHistory::starting_at("/start"));
        let router = Router::new(table, GuardChain::new().with(AlwaysTo("/a")), nav.clone());

        let err = router.navigate("/a").await.unwrap_err();

        assert!(matches!(err, ConsoleError::Navigation(_)));
        assert_eq!(nav.current(), "/start");
    }
}

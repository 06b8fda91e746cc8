pub mod guards;
pub mod navigator;
pub mod router;
pub mod routes;

pub use guards::{AuthGuard, GuardChain, GuardDecision, RoleGuard, RouteGuard};
pub use navigator::{NavigationHistory, Navigator};
pub use router::{Location, Router, MAX_REDIRECTS};
pub use routes::{
    Page, RouteDefinition, RouteMatch, RouteTable, RouteTarget, LOGIN_ROUTE, OWNER_HOME,
    SUPERADMIN_HOME,
};

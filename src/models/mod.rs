pub mod onboarding;
pub mod tenant;
pub mod user;

pub use onboarding::{AcceptInvite, AcceptInviteResponse};
pub use tenant::{
    AssignOwnerRequest, CreateTenant, InviteOwnerRequest, OwnerInvitation, OwnerSummary,
    TenantDetail, TenantSummary,
};
pub use user::{CurrentUser, MeResponse, Role, TenantRef, UserProfile};

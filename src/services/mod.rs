pub mod onboarding;
pub mod tenants;

pub use onboarding::OwnerOnboardingService;
pub use tenants::TenantService;

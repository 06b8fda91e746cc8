// Import the test harness
pub mod test_harness;

// Import individual test modules
pub mod auth_flow_test;
pub mod router_test;
pub mod single_flight_test;
pub mod tenant_service_test;

pub mod client;
pub mod endpoints;
pub mod interceptor;

pub use client::{HttpClient, HttpRequest, MockHttpClient, ReqwestHttpClient, SimpleHttpResponse};
pub use endpoints::Endpoints;
pub use interceptor::{AuthenticatedClient, RequestAuthenticator};

pub mod service;
pub mod session;
pub mod storage;
pub mod token;

pub use service::AuthService;
pub use session::SessionPublisher;
pub use storage::{FileSessionStore, MemorySessionStore, SessionStore, StorageKey};
pub use token::{LoginRequest, RefreshRequest, RefreshResponse, TokenPair};

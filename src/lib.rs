pub mod auth;
pub mod config;
pub mod console;
pub mod error;
pub mod http;
pub mod models;
pub mod routing;
pub mod services;
pub mod views;

// Re-export core components
pub use crate::auth::AuthService;
pub use crate::config::{Config, ConfigManager};
pub use crate::console::Console;
pub use crate::error::{ConsoleError, ConsoleResult, ErrorCategory, ErrorCode};
pub use crate::routing::{Location, Page, Router};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

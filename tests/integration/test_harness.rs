//! Integration test harness.
//! Provides a mock backend and a console wired to it through real HTTP and
//! a session file in a temporary directory.

use std::path::PathBuf;

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};
use tempfile::TempDir;

use tenant_console::config::{ApiConfig, HttpConfig, StorageConfig};
use tenant_console::{Config, Console};

/// Test environment for integration tests
pub struct TestEnvironment {
    /// Mock backend serving both `/auth` and `/api/v1`
    pub server: ServerGuard,
    /// Holds the session file
    pub dir: TempDir,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        Self {
            server: Server::new_async().await,
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.dir.path().join("session.json")
    }

    pub fn config(&self) -> Config {
        let url = self.server.url();
        Config {
            api: ApiConfig {
                auth_url: format!("{url}/auth"),
                base_url: format!("{url}/api/v1"),
            },
            storage: StorageConfig {
                session_path: self.session_path(),
            },
            http: HttpConfig { timeout_seconds: 5 },
        }
    }

    /// A fresh console, as a new process would build it
    pub fn console(&self) -> Console {
        Console::new(self.config()).expect("Failed to build console")
    }

    /// Raw contents of the session file, empty when it does not exist
    pub fn session_file(&self) -> String {
        std::fs::read_to_string(self.session_path()).unwrap_or_default()
    }

    pub async fn mock_login(&mut self, access: &str, refresh: &str) -> Mock {
        self.server
            .mock("POST", "/auth/login/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"access": access, "refresh": refresh}).to_string())
            .create_async()
            .await
    }

    pub async fn mock_me(&mut self, access: &str, body: Value) -> Mock {
        self.server
            .mock("GET", "/api/v1/me/")
            .match_header("authorization", format!("Bearer {access}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// JSON answer to `method path` for requests carrying `access`
    pub async fn mock_authorized(
        &mut self,
        method: &str,
        path: &str,
        access: &str,
        status: usize,
        body: Value,
    ) -> Mock {
        self.server
            .mock(method, path)
            .match_header("authorization", format!("Bearer {access}").as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// Sign in through the console with a stubbed backend
    pub async fn sign_in(&mut self, console: &Console, role: &str) {
        self.mock_login("access-1", "refresh-1").await;
        self.mock_me("access-1", me_body(role)).await;
        console
            .auth()
            .login("user@club.test", "secret-password")
            .await
            .expect("Login should succeed");
    }
}

/// Flat `/me/` record as the backend serializes it
pub fn me_body(role: &str) -> Value {
    json!({
        "id": 9,
        "email": "user@club.test",
        "first_name": "Camille",
        "last_name": "Martin",
        "role": role,
        "tenant": null
    })
}

/// Matches a JSON body containing at least `value`
pub fn partial_json(value: Value) -> Matcher {
    Matcher::PartialJson(value)
}

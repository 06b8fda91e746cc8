use std::fmt::Debug;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::info;

use super::routes::LOGIN_ROUTE;

/// Something that can move the application to another location
pub trait Navigator: Send + Sync + Debug {
    fn navigate(&self, path: &str);

    fn current(&self) -> String;
}

/// Navigator that records the visited locations
#[derive(Debug)]
pub struct NavigationHistory {
    location: watch::Sender<String>,
    visited: Mutex<Vec<String>>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::starting_at(LOGIN_ROUTE)
    }

    pub fn starting_at(path: &str) -> Self {
        let (location, _) = watch::channel(path.to_string());
        Self {
            location,
            visited: Mutex::new(vec![path.to_string()]),
        }
    }

    /// Every location committed so far, oldest first
    pub fn history(&self) -> Vec<String> {
        self.visited.lock().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.location.subscribe()
    }
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for NavigationHistory {
    fn navigate(&self, path: &str) {
        info!(to = %path, "Navigating");
        self.visited.lock().push(path.to_string());
        self.location.send_replace(path.to_string());
    }

    fn current(&self) -> String {
        self.location.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_records_each_navigation() {
        let nav = NavigationHistory::new();
        nav.navigate("/owner/dashboard");
        nav.navigate("/owner/settings");
        assert_eq!(nav.current(), "/owner/settings");
        assert_eq!(
            nav.history(),
            vec!["/auth/login", "/owner/dashboard", "/owner/settings"]
        );
    }
}

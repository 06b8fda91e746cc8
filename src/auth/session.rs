use tokio::sync::watch;
use tracing::debug;

use crate::models::CurrentUser;

/// Holds the current user and broadcasts every change.
///
/// Subscribers always observe the latest value; intermediate values may be
/// skipped but never reordered.
#[derive(Debug)]
pub struct SessionPublisher {
    sender: watch::Sender<Option<CurrentUser>>,
}

impl SessionPublisher {
    pub fn new(initial: Option<CurrentUser>) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<CurrentUser>> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> Option<CurrentUser> {
        self.sender.borrow().clone()
    }

    /// Replace the published user. Only the auth service writes here.
    pub(crate) fn publish(&self, user: Option<CurrentUser>) {
        debug!(
            authenticated = user.is_some(),
            subscribers = self.sender.receiver_count(),
            "Publishing session change"
        );
        self.sender.send_replace(user);
    }
}

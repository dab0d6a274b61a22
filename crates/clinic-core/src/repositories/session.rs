//! Session store (port) and an in-process implementation

use tokio::sync::watch;
use tracing::info;

use crate::domain::Identity;

/// Point-in-time view of the authentication provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    pub is_loading: bool,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

pub trait SessionStore: Send + Sync {
    fn snapshot(&self) -> SessionSnapshot;

    /// Receives a new snapshot on every login, logout or loading change.
    fn subscribe(&self) -> watch::Receiver<SessionSnapshot>;
}

/// Session store fed by whatever performs the actual sign-in.
pub struct InMemorySessionStore {
    tx: watch::Sender<SessionSnapshot>,
}

impl InMemorySessionStore {
    /// Starts in the provider's initial "still checking" state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SessionSnapshot {
            identity: None,
            is_loading: true,
        });
        Self { tx }
    }

    pub fn signed_in(identity: Identity) -> Self {
        let (tx, _) = watch::channel(SessionSnapshot {
            identity: Some(identity),
            is_loading: false,
        });
        Self { tx }
    }

    pub fn signed_out() -> Self {
        let (tx, _) = watch::channel(SessionSnapshot::default());
        Self { tx }
    }

    pub fn login(&self, identity: Identity) {
        info!("Session established for user {}", identity.user_id);
        self.tx.send_replace(SessionSnapshot {
            identity: Some(identity),
            is_loading: false,
        });
    }

    pub fn logout(&self) {
        info!("Session cleared");
        self.tx.send_replace(SessionSnapshot::default());
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }
}

//! One-shot post-login welcome notice

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clinic_shared::constants::WELCOME_TOAST_KEY;
use tracing::{debug, warn};

use crate::domain::Identity;
use crate::repositories::ClientStorage;

/// Shows the welcome notice at most once per guard instance, and only when
/// the login flow left the marker in session storage.
pub struct WelcomeNotice {
    session_storage: Arc<dyn ClientStorage>,
    shown: AtomicBool,
}

impl WelcomeNotice {
    pub fn new(session_storage: Arc<dyn ClientStorage>) -> Self {
        Self {
            session_storage,
            shown: AtomicBool::new(false),
        }
    }

    /// Called by the login flow right after a successful sign-in.
    pub fn arm(session_storage: &dyn ClientStorage) {
        if let Err(e) = session_storage.set_item(WELCOME_TOAST_KEY, "1") {
            warn!("Failed to set welcome marker: {}", e);
        }
    }

    /// Called on each entry into the authorized state; yields the message once.
    pub fn on_authorized(&self, identity: Option<&Identity>) -> Option<String> {
        if self.shown.load(Ordering::Acquire) {
            return None;
        }

        // read and clear in one step
        let armed = match self.session_storage.take_item(WELCOME_TOAST_KEY) {
            Ok(marker) => marker.is_some(),
            Err(e) => {
                warn!("Failed to consume welcome marker: {}", e);
                false
            }
        };
        if !armed {
            return None;
        }

        if self.shown.swap(true, Ordering::AcqRel) {
            return None;
        }

        debug!("Showing post-login welcome notice");
        Some(match identity {
            Some(identity) if !identity.email.is_empty() => {
                format!("Welcome back, {}!", identity.email)
            }
            _ => "Welcome back!".to_string(),
        })
    }
}

//! Session store - authentication lifecycle
//!
//! Owns the bearer token and the authenticated user. The two are set and
//! cleared together: both are write-through persisted to the credential
//! store on every change, and durable storage is the sole source used to
//! rehydrate state on startup.
//!
//! No error escapes this store. Operations resolve to a success
//! indicator and surface failures through the Notifier port.

use std::path::Path;
use std::sync::Arc;

use crate::domain::result::Error;
use crate::domain::User;
use crate::ports::{Backend, CredentialStore, Notifier, SessionEventSink};

/// Session store - owns the authenticated identity and bearer token
pub struct SessionStore {
    backend: Arc<dyn Backend>,
    storage: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    events: Arc<dyn SessionEventSink>,
    token: Option<String>,
    user: Option<User>,
}

impl SessionStore {
    /// Create a session store, rehydrating any persisted session.
    ///
    /// A lone token or lone user record (a half-written pair) is treated
    /// as logged out and the stale entry is removed.
    pub fn new(
        backend: Arc<dyn Backend>,
        storage: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
        events: Arc<dyn SessionEventSink>,
    ) -> Self {
        let token = storage.load_token().ok().flatten();
        let user = storage.load_user().ok().flatten();

        let (token, user) = match (token, user) {
            (Some(t), Some(u)) => (Some(t), Some(u)),
            (None, None) => (None, None),
            _ => {
                let _ = storage.clear();
                (None, None)
            }
        };

        Self {
            backend,
            storage,
            notifier,
            events,
            token,
            user,
        }
    }

    /// The current bearer token, if logged in
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The authenticated user, if logged in
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Register new credentials. Does not establish a session.
    pub fn signup(&mut self, email: &str, password: &str) -> bool {
        match self.backend.signup(email, password) {
            Ok(()) => {
                self.notifier
                    .success("Signup successful! You can now log in.");
                true
            }
            Err(e) => {
                self.surface(&e, "Signup failed.");
                false
            }
        }
    }

    /// Authenticate. On success the token and user are replaced together
    /// and persisted; on failure prior state is left untouched.
    pub fn login(&mut self, email: &str, password: &str) -> bool {
        match self.backend.login(email, password) {
            Ok(session) => {
                self.token = Some(session.token);
                self.user = Some(session.user);
                self.persist();
                self.notifier.success("Login successful!");
                true
            }
            Err(e) => {
                self.surface(&e, "Login failed.");
                false
            }
        }
    }

    /// End the session after interactive confirmation.
    ///
    /// Returns true when the user confirmed and the session was cleared.
    pub fn logout(&mut self) -> bool {
        if !self.notifier.confirm("Are you sure you want to sign out?") {
            return false;
        }
        self.token = None;
        self.user = None;
        if let Err(e) = self.storage.clear() {
            self.notifier
                .error(&format!("Failed to clear saved session: {}", e));
        }
        self.notifier.success("Logged out successfully!");
        true
    }

    /// Update the profile (multipart: name plus optional avatar file).
    /// On success the user record is replaced with the server's
    /// representation and re-persisted; on failure it is unchanged.
    pub fn update_profile(&mut self, name: &str, avatar: Option<&Path>) -> bool {
        let Some(token) = self.token.clone() else {
            self.notifier.error("Please log in to update your profile.");
            return false;
        };

        match self.backend.update_profile(&token, name, avatar) {
            Ok(user) => {
                if let Err(e) = self.storage.store_user(&user) {
                    self.notifier
                        .error(&format!("Failed to persist session: {}", e));
                }
                self.user = Some(user);
                self.notifier.success("Profile updated successfully!");
                true
            }
            Err(e) if e.is_unauthorized() => {
                self.expire();
                false
            }
            Err(e) => {
                self.surface(&e, "Failed to update profile. Please try again.");
                false
            }
        }
    }

    /// Tear the session down after an authorization failure.
    ///
    /// Clears memory and durable storage, then emits a session-expired
    /// event for the composition root instead of navigating anywhere.
    pub fn expire(&mut self) {
        self.token = None;
        self.user = None;
        let _ = self.storage.clear();
        self.notifier.error("Session expired. Please log in again.");
        self.events.session_expired();
    }

    /// Write-through persistence of the token/user pair
    fn persist(&self) {
        let result = match (&self.token, &self.user) {
            (Some(token), Some(user)) => self
                .storage
                .store_token(token)
                .and_then(|_| self.storage.store_user(user)),
            _ => self.storage.clear(),
        };
        if let Err(e) = result {
            self.notifier
                .error(&format!("Failed to persist session: {}", e));
        }
    }

    /// Surface the server-provided message verbatim when present,
    /// otherwise a generic fallback
    fn surface(&self, error: &Error, fallback: &str) {
        match error.server_message() {
            Some(msg) => self.notifier.error(msg),
            None => self.notifier.error(fallback),
        }
    }
}

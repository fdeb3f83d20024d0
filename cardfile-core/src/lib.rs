//! Cardfile Core - client logic for contact management
//!
//! This crate implements the client core following hexagonal architecture:
//!
//! - **domain**: Core entities (Contact, User, errors)
//! - **ports**: Trait definitions for external collaborators (Backend,
//!   CredentialStore, Notifier, SessionEventSink)
//! - **services**: The two stores - SessionStore (credential lifecycle)
//!   and ContactStore (server-backed contact cache)
//! - **adapters**: Concrete implementations (reqwest API client, file
//!   credential store, in-memory test doubles, mock HTTP server)
//!
//! State is never ambient: a [`CardfileContext`] owns explicit store
//! instances wired to injected ports.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::{ApiClient, FileCredentialStore};
use config::Config;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{Category, Contact, ContactDraft, SearchFilters, User};
pub use ports::{Backend, CredentialStore, Notifier, SessionEventSink};
pub use services::{ContactStore, SessionStore};

/// Main context for Cardfile operations
///
/// The composition root: holds the configuration and the two stores,
/// wired to a shared backend and credential storage. Construction
/// rehydrates any persisted session and, when a token is present,
/// performs the initial contact fetch.
pub struct CardfileContext {
    pub config: Config,
    pub session: SessionStore,
    pub contacts: ContactStore,
}

impl CardfileContext {
    /// Create a context backed by the real HTTP API and the data
    /// directory's credential files
    pub fn new(
        data_dir: &Path,
        notifier: Arc<dyn Notifier>,
        events: Arc<dyn SessionEventSink>,
    ) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let backend = Arc::new(ApiClient::new(&config.api_url)?);
        let storage = Arc::new(FileCredentialStore::new(data_dir));
        Ok(Self::with_backend(config, backend, storage, notifier, events))
    }

    /// Create a context with injected port implementations
    pub fn with_backend(
        config: Config,
        backend: Arc<dyn Backend>,
        storage: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
        events: Arc<dyn SessionEventSink>,
    ) -> Self {
        let mut session = SessionStore::new(
            backend.clone(),
            storage.clone(),
            notifier.clone(),
            events.clone(),
        );
        let mut contacts = ContactStore::new(backend, notifier);

        // A rehydrated token means the token "first became available"
        // now; fetch once automatically
        if session.is_authenticated() {
            contacts.fetch_all(&mut session);
        }

        Self {
            config,
            session,
            contacts,
        }
    }

    /// Log in and, on success, run the initial contact fetch
    pub fn login(&mut self, email: &str, password: &str) -> bool {
        if !self.session.login(email, password) {
            return false;
        }
        self.contacts.fetch_all(&mut self.session);
        true
    }

    /// Log out (after confirmation) and discard the cached contacts
    pub fn logout(&mut self) -> bool {
        if !self.session.logout() {
            return false;
        }
        self.contacts.clear();
        true
    }
}

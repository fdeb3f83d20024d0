//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core
//! stores depend only on these traits, not on concrete implementations.

mod backend;
mod notify;
mod storage;

pub use backend::{Backend, LoginSession};
pub use notify::{Notifier, NullEventSink, SessionEventSink};
pub use storage::CredentialStore;

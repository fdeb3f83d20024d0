//! Credential storage port - durable client state
//!
//! Two key/value entries survive restarts: the serialized session token
//! (opaque string) and the serialized user record. Both absent means
//! "logged out"; the SessionStore keeps them present/absent together.

use crate::domain::result::Result;
use crate::domain::User;

/// Durable storage for the session credential pair
///
/// Written by the SessionStore only (write-through on every change);
/// sole source used to rehydrate session state on startup.
pub trait CredentialStore: Send + Sync {
    fn load_token(&self) -> Result<Option<String>>;

    fn load_user(&self) -> Result<Option<User>>;

    fn store_token(&self, token: &str) -> Result<()>;

    fn store_user(&self, user: &User) -> Result<()>;

    /// Remove both entries
    fn clear(&self) -> Result<()>;
}

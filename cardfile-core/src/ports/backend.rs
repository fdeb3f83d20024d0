//! Backend port - the REST surface the client consumes
//!
//! The backend is an external collaborator reached over HTTP/JSON with
//! bearer-token auth. The core depends only on this trait; the reqwest
//! adapter and the in-memory test backend implement it.

use std::path::Path;

use crate::domain::result::Result;
use crate::domain::{Contact, ContactDraft, User};

/// Successful login response: credential plus the authenticated principal
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub token: String,
    pub user: User,
}

/// Backend REST surface
///
/// Every method maps to one endpoint. Methods taking `token` attach it as
/// `Authorization: Bearer <token>`; signup/login are unauthenticated.
/// Update endpoints perform full-record replace, not partial patch -
/// callers must send all fields or risk the server dropping unspecified
/// ones.
pub trait Backend: Send + Sync {
    /// POST /api/users/signup - registers credentials, establishes no session
    fn signup(&self, email: &str, password: &str) -> Result<()>;

    /// POST /api/users/login
    fn login(&self, email: &str, password: &str) -> Result<LoginSession>;

    /// PUT /api/users/profile - multipart {name, avatar?}
    fn update_profile(&self, token: &str, name: &str, avatar: Option<&Path>) -> Result<User>;

    /// GET /api/contacts - the user's full contact list
    fn fetch_contacts(&self, token: &str) -> Result<Vec<Contact>>;

    /// POST /api/contacts - draft plus the owning user's id
    fn create_contact(&self, token: &str, draft: &ContactDraft, user_id: &str) -> Result<Contact>;

    /// PUT /api/contacts/{id} - full-record replace
    fn update_contact(&self, token: &str, id: &str, contact: &Contact) -> Result<Contact>;

    /// DELETE /api/contacts/{id}
    fn delete_contact(&self, token: &str, id: &str) -> Result<()>;
}

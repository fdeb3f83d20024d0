//! The two client stores
//!
//! The session store owns the credential lifecycle; the contact store
//! owns the cached contact collection and mediates every CRUD call.

mod contacts;
mod session;

pub use contacts::ContactStore;
pub use session::SessionStore;

//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with serde wire mappings - no I/O or external dependencies.

mod contact;
mod user;
pub mod result;

pub use contact::{Category, Contact, ContactDraft, SearchFilters};
pub use user::User;

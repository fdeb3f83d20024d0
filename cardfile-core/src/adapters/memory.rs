//! In-memory adapters for tests and demos
//!
//! [`MemoryBackend`] implements the full Backend port against process
//! memory, counts requests, captures the last update payload, and
//! supports failure injection - enough to verify every store contract
//! without a network. [`MemoryCredentialStore`], [`RecordingNotifier`]
//! and [`RecordingEventSink`] are the matching doubles for the other
//! ports.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Contact, ContactDraft, User};
use crate::ports::{Backend, CredentialStore, LoginSession, Notifier, SessionEventSink};

const EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

struct Registered {
    email: String,
    password: String,
    user: User,
}

#[derive(Default)]
struct State {
    users: Vec<Registered>,
    /// token -> user id
    sessions: HashMap<String, String>,
    contacts: Vec<Contact>,
    last_update_payload: Option<Contact>,
    /// Failure injected for the next request, if any
    fail_next: Option<Error>,
}

/// In-memory backend double
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
    requests: AtomicU64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user without going through signup
    pub fn with_user(self, email: &str, password: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let user = User::new(Uuid::new_v4().to_string(), email);
            state.users.push(Registered {
                email: email.to_string(),
                password: password.to_string(),
                user,
            });
        }
        self
    }

    /// Seed the server-side contact collection directly
    pub fn seed_contacts(&self, contacts: Vec<Contact>) {
        self.state.lock().unwrap().contacts = contacts;
    }

    /// The server-side collection, for asserting end state
    pub fn server_contacts(&self) -> Vec<Contact> {
        self.state.lock().unwrap().contacts.clone()
    }

    /// Number of requests the backend has observed
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    /// The exact payload of the most recent contact update, if any
    pub fn last_update_payload(&self) -> Option<Contact> {
        self.state.lock().unwrap().last_update_payload.clone()
    }

    /// Fail the next request with the given error
    pub fn fail_next(&self, error: Error) {
        self.state.lock().unwrap().fail_next = Some(error);
    }

    /// Invalidate every issued token; subsequent authorized requests
    /// come back 401-shaped
    pub fn revoke_tokens(&self) {
        self.state.lock().unwrap().sessions.clear();
    }

    fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    fn take_injected_failure(&self) -> Option<Error> {
        self.state.lock().unwrap().fail_next.take()
    }

    fn authorize(&self, token: &str) -> Result<String> {
        let state = self.state.lock().unwrap();
        state
            .sessions
            .get(token)
            .cloned()
            .ok_or_else(|| Error::unauthorized(EXPIRED_MESSAGE))
    }
}

impl State {
    fn find_contact_mut(&mut self, id: &str) -> Result<&mut Contact> {
        self.contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::api_with_message(404, "Contact not found"))
    }
}

impl Backend for MemoryBackend {
    fn signup(&self, email: &str, password: &str) -> Result<()> {
        self.record_request();
        if let Some(err) = self.take_injected_failure() {
            return Err(err);
        }

        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.email == email) {
            return Err(Error::api_with_message(409, "Email already registered"));
        }
        let user = User::new(Uuid::new_v4().to_string(), email);
        state.users.push(Registered {
            email: email.to_string(),
            password: password.to_string(),
            user,
        });
        Ok(())
    }

    fn login(&self, email: &str, password: &str) -> Result<LoginSession> {
        self.record_request();
        if let Some(err) = self.take_injected_failure() {
            return Err(err);
        }

        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .map(|u| u.user.clone())
            .ok_or_else(|| Error::api_with_message(400, "Invalid email or password"))?;

        let token = Uuid::new_v4().to_string();
        state.sessions.insert(token.clone(), user.id.clone());
        Ok(LoginSession { token, user })
    }

    fn update_profile(&self, token: &str, name: &str, avatar: Option<&Path>) -> Result<User> {
        self.record_request();
        if let Some(err) = self.take_injected_failure() {
            return Err(err);
        }
        let user_id = self.authorize(token)?;

        let mut state = self.state.lock().unwrap();
        let registered = state
            .users
            .iter_mut()
            .find(|u| u.user.id == user_id)
            .ok_or_else(|| Error::api_with_message(404, "User not found"))?;

        registered.user.name = name.to_string();
        if let Some(path) = avatar {
            registered.user.avatar_url = Some(format!("/uploads/{}", path.display()));
        }
        Ok(registered.user.clone())
    }

    fn fetch_contacts(&self, token: &str) -> Result<Vec<Contact>> {
        self.record_request();
        if let Some(err) = self.take_injected_failure() {
            return Err(err);
        }
        self.authorize(token)?;
        Ok(self.state.lock().unwrap().contacts.clone())
    }

    fn create_contact(&self, token: &str, draft: &ContactDraft, _user_id: &str) -> Result<Contact> {
        self.record_request();
        if let Some(err) = self.take_injected_failure() {
            return Err(err);
        }
        self.authorize(token)?;

        let contact = Contact {
            id: Uuid::new_v4().to_string(),
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            address: draft.address.clone(),
            category: draft.category,
            notes: draft.notes.clone(),
            is_favorite: draft.is_favorite,
            last_contacted: draft.last_contacted,
        };
        self.state.lock().unwrap().contacts.push(contact.clone());
        Ok(contact)
    }

    fn update_contact(&self, token: &str, id: &str, contact: &Contact) -> Result<Contact> {
        self.record_request();
        self.state.lock().unwrap().last_update_payload = Some(contact.clone());
        if let Some(err) = self.take_injected_failure() {
            return Err(err);
        }
        self.authorize(token)?;

        let mut state = self.state.lock().unwrap();
        let entry = state.find_contact_mut(id)?;
        // Full-record replace; the id itself is immutable
        *entry = Contact {
            id: id.to_string(),
            ..contact.clone()
        };
        Ok(entry.clone())
    }

    fn delete_contact(&self, token: &str, id: &str) -> Result<()> {
        self.record_request();
        if let Some(err) = self.take_injected_failure() {
            return Err(err);
        }
        self.authorize(token)?;

        let mut state = self.state.lock().unwrap();
        let before = state.contacts.len();
        state.contacts.retain(|c| c.id != id);
        if state.contacts.len() == before {
            return Err(Error::api_with_message(404, "Contact not found"));
        }
        Ok(())
    }
}

/// In-memory credential store double
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
    user: Mutex<Option<User>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate both entries (a previously persisted session)
    pub fn with_session(self, token: &str, user: User) -> Self {
        *self.token.lock().unwrap() = Some(token.to_string());
        *self.user.lock().unwrap() = Some(user);
        self
    }

    /// Pre-populate only the token entry (a half-written pair)
    pub fn with_token_only(self, token: &str) -> Self {
        *self.token.lock().unwrap() = Some(token.to_string());
        self
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load_token(&self) -> Result<Option<String>> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn load_user(&self) -> Result<Option<User>> {
        Ok(self.user.lock().unwrap().clone())
    }

    fn store_token(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn store_user(&self, user: &User) -> Result<()> {
        *self.user.lock().unwrap() = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap() = None;
        *self.user.lock().unwrap() = None;
        Ok(())
    }
}

/// Notifier double recording everything it is told
#[derive(Default)]
pub struct RecordingNotifier {
    successes: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
    confirm_answer: AtomicBool,
}

impl RecordingNotifier {
    /// A notifier that answers `yes` to confirmation prompts
    pub fn confirming() -> Self {
        let notifier = Self::default();
        notifier.confirm_answer.store(true, Ordering::SeqCst);
        notifier
    }

    /// A notifier that answers `no` to confirmation prompts
    pub fn declining() -> Self {
        Self::default()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn confirm(&self, _prompt: &str) -> bool {
        self.confirm_answer.load(Ordering::SeqCst)
    }
}

/// Event sink double counting session expiries
#[derive(Default)]
pub struct RecordingEventSink {
    expired: AtomicU64,
}

impl RecordingEventSink {
    pub fn expired_count(&self) -> u64 {
        self.expired.load(Ordering::SeqCst)
    }
}

impl SessionEventSink for RecordingEventSink {
    fn session_expired(&self) {
        self.expired.fetch_add(1, Ordering::SeqCst);
    }
}

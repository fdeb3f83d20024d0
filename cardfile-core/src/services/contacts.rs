//! Contact store - server-backed contact cache
//!
//! Owns the authenticated user's contact list in memory. The collection
//! is a cached copy of server state, never authoritative: every mutation
//! round-trips through the backend before the local copy changes, so a
//! failed request leaves the cache exactly as it was.
//!
//! An authorization failure from any remote operation tears the session
//! down (via [`SessionStore::expire`]) and discards the cache.

use std::sync::Arc;

use crate::domain::result::Error;
use crate::domain::{Contact, ContactDraft, SearchFilters};
use crate::ports::{Backend, Notifier};
use crate::services::SessionStore;

/// Contact store - cached contacts plus CRUD mediation
pub struct ContactStore {
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    contacts: Vec<Contact>,
}

impl ContactStore {
    pub fn new(backend: Arc<dyn Backend>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            contacts: Vec::new(),
        }
    }

    /// The cached collection, in insertion order
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Look up a cached contact by id
    pub fn get(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    /// Discard the cached collection (logout or session teardown)
    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    /// Replace the collection with the server's current list.
    ///
    /// Requires a token; with none present this performs zero network
    /// calls and leaves the collection unchanged.
    pub fn fetch_all(&mut self, session: &mut SessionStore) -> bool {
        let Some(token) = session.token().map(str::to_owned) else {
            self.notifier.error("Please log in to access contacts.");
            return false;
        };

        match self.backend.fetch_contacts(&token) {
            Ok(contacts) => {
                self.contacts = contacts;
                true
            }
            Err(e) => {
                self.handle_remote_error(session, e, "Failed to load contacts.");
                false
            }
        }
    }

    /// Create a contact. On success the server-returned record (carrying
    /// its assigned id) is appended to the collection.
    pub fn create(&mut self, session: &mut SessionStore, draft: &ContactDraft) -> Option<Contact> {
        let (token, user_id) = self.require_session(session)?;

        match self.backend.create_contact(&token, draft, &user_id) {
            Ok(contact) => {
                self.contacts.push(contact.clone());
                self.notifier.success("Contact added successfully!");
                Some(contact)
            }
            Err(e) => {
                self.handle_remote_error(session, e, "Failed to add contact.");
                None
            }
        }
    }

    /// Update a contact. Replace semantics: `contact` must be the
    /// complete record - the backend overwrites the whole document and
    /// drops unspecified fields. The local entry matching `id` is
    /// replaced by the server's returned record.
    pub fn update(
        &mut self,
        session: &mut SessionStore,
        id: &str,
        contact: &Contact,
    ) -> Option<Contact> {
        let Some(token) = session.token().map(str::to_owned) else {
            self.notifier.error("Please log in to access contacts.");
            return None;
        };

        match self.backend.update_contact(&token, id, contact) {
            Ok(updated) => {
                self.replace_entry(id, updated.clone());
                self.notifier.success("Contact updated successfully!");
                Some(updated)
            }
            Err(e) => {
                self.handle_remote_error(session, e, "Failed to update contact.");
                None
            }
        }
    }

    /// Delete a contact. On success the matching entry is removed.
    pub fn delete(&mut self, session: &mut SessionStore, id: &str) -> bool {
        let Some(token) = session.token().map(str::to_owned) else {
            self.notifier.error("Please log in to access contacts.");
            return false;
        };

        match self.backend.delete_contact(&token, id) {
            Ok(()) => {
                self.contacts.retain(|c| c.id != id);
                self.notifier.success("Contact deleted successfully!");
                true
            }
            Err(e) => {
                self.handle_remote_error(session, e, "Failed to delete contact.");
                false
            }
        }
    }

    /// Invert a contact's favorite flag.
    ///
    /// Reads the cached entry, sends the entire record back with only
    /// `is_favorite` flipped (full-record replace), and applies the
    /// server's response. A missing id is a local cache-consistency
    /// failure: no request is sent.
    pub fn toggle_favorite(&mut self, session: &mut SessionStore, id: &str) -> bool {
        let Some(current) = self.get(id).cloned() else {
            self.notifier.error("Contact not found!");
            return false;
        };

        let mut flipped = current;
        flipped.is_favorite = !flipped.is_favorite;

        let Some(token) = session.token().map(str::to_owned) else {
            self.notifier.error("Please log in to access contacts.");
            return false;
        };

        match self.backend.update_contact(&token, id, &flipped) {
            Ok(updated) => {
                self.replace_entry(id, updated);
                self.notifier.success("Favorite status updated successfully!");
                true
            }
            Err(e) => {
                self.handle_remote_error(session, e, "Failed to toggle favorite.");
                false
            }
        }
    }

    /// Replace a contact's notes, keeping every other field as cached.
    /// Same full-record replace contract as [`Self::update`].
    pub fn update_notes(&mut self, session: &mut SessionStore, id: &str, notes: &str) -> bool {
        let Some(current) = self.get(id).cloned() else {
            self.notifier.error("Contact not found!");
            return false;
        };

        let mut edited = current;
        edited.notes = notes.to_string();

        self.update(session, id, &edited).is_some()
    }

    /// Pure, synchronous search over the cached collection.
    ///
    /// Case-insensitive substring match of `query` against name and
    /// email, plain substring match against phone, exact category match
    /// when the filter names one, and a favorites restriction. Returns a
    /// new sequence each call in the collection's insertion order.
    pub fn search(&self, query: &str, filters: &SearchFilters) -> Vec<Contact> {
        let needle = query.to_lowercase();

        self.contacts
            .iter()
            .filter(|contact| {
                let matches_query = contact.name.to_lowercase().contains(&needle)
                    || contact.email.to_lowercase().contains(&needle)
                    || contact.phone.contains(query);

                let matches_category = match filters.category {
                    Some(category) => contact.category == category,
                    None => true,
                };

                let matches_favorite = !filters.favorites_only || contact.is_favorite;

                matches_query && matches_category && matches_favorite
            })
            .cloned()
            .collect()
    }

    fn replace_entry(&mut self, id: &str, updated: Contact) {
        if let Some(entry) = self.contacts.iter_mut().find(|c| c.id == id) {
            *entry = updated;
        }
    }

    /// Token plus the authenticated user's id, or a notification
    fn require_session(&self, session: &SessionStore) -> Option<(String, String)> {
        match (session.token(), session.user()) {
            (Some(token), Some(user)) => Some((token.to_owned(), user.id.clone())),
            _ => {
                self.notifier.error("Please log in to access contacts.");
                None
            }
        }
    }

    /// Shared failure path: authorization failures tear the session down
    /// and discard the cache; everything else is surfaced and leaves the
    /// cache unchanged.
    fn handle_remote_error(&mut self, session: &mut SessionStore, error: Error, fallback: &str) {
        if error.is_unauthorized() {
            self.contacts.clear();
            session.expire();
        } else {
            match error.server_message() {
                Some(msg) => self.notifier.error(msg),
                None => self.notifier.error(fallback),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        MemoryBackend, MemoryCredentialStore, RecordingEventSink, RecordingNotifier,
    };
    use crate::domain::Category;

    fn contact(id: &str, name: &str, category: Category, favorite: bool) -> Contact {
        Contact {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: format!("555-010{}", id.len()),
            address: String::new(),
            category,
            notes: String::new(),
            is_favorite: favorite,
            last_contacted: None,
        }
    }

    struct Fixture {
        backend: Arc<MemoryBackend>,
        notifier: Arc<RecordingNotifier>,
        session: SessionStore,
        store: ContactStore,
    }

    /// Logged-in session plus a contact store over the same backend
    fn logged_in(backend: MemoryBackend) -> Fixture {
        let backend = Arc::new(backend.with_user("a@example.com", "pw"));
        let notifier = Arc::new(RecordingNotifier::default());
        let mut session = SessionStore::new(
            backend.clone(),
            Arc::new(MemoryCredentialStore::new()),
            notifier.clone(),
            Arc::new(RecordingEventSink::default()),
        );
        assert!(session.login("a@example.com", "pw"));
        let store = ContactStore::new(backend.clone(), notifier.clone());
        Fixture {
            backend,
            notifier,
            session,
            store,
        }
    }

    fn logged_out() -> Fixture {
        let backend = Arc::new(MemoryBackend::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let session = SessionStore::new(
            backend.clone(),
            Arc::new(MemoryCredentialStore::new()),
            notifier.clone(),
            Arc::new(RecordingEventSink::default()),
        );
        let store = ContactStore::new(backend.clone(), notifier.clone());
        Fixture {
            backend,
            notifier,
            session,
            store,
        }
    }

    #[test]
    fn test_fetch_without_token_performs_zero_network_calls() {
        let mut f = logged_out();

        assert!(!f.store.fetch_all(&mut f.session));
        assert_eq!(f.backend.request_count(), 0);
        assert!(f.store.contacts().is_empty());
        assert_eq!(f.notifier.errors(), vec!["Please log in to access contacts."]);
    }

    #[test]
    fn test_fetch_replaces_collection_wholesale() {
        let mut f = logged_in(MemoryBackend::new());
        f.backend.seed_contacts(vec![
            contact("1", "Alice", Category::Work, false),
            contact("2", "Bob", Category::Family, true),
        ]);

        assert!(f.store.fetch_all(&mut f.session));
        assert_eq!(f.store.contacts().len(), 2);

        f.backend.seed_contacts(vec![contact("3", "Cara", Category::Friend, false)]);
        assert!(f.store.fetch_all(&mut f.session));
        let ids: Vec<&str> = f.store.contacts().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["3"]);
    }

    #[test]
    fn test_crud_replay_matches_id_set() {
        let mut f = logged_in(MemoryBackend::new());
        assert!(f.store.fetch_all(&mut f.session));

        let a = f
            .store
            .create(&mut f.session, &ContactDraft { name: "A".into(), ..Default::default() })
            .unwrap();
        let b = f
            .store
            .create(&mut f.session, &ContactDraft { name: "B".into(), ..Default::default() })
            .unwrap();
        let c = f
            .store
            .create(&mut f.session, &ContactDraft { name: "C".into(), ..Default::default() })
            .unwrap();

        let mut b_edit = b.clone();
        b_edit.name = "B2".to_string();
        assert!(f.store.update(&mut f.session, &b.id, &b_edit).is_some());
        assert!(f.store.delete(&mut f.session, &a.id));

        let ids: Vec<&str> = f.store.contacts().iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, vec![b.id.as_str(), c.id.as_str()]);
        assert_eq!(f.store.get(&b.id).unwrap().name, "B2");

        // Local cache agrees with server state after the replay
        let server_ids: Vec<String> = f.backend.server_contacts().iter().map(|x| x.id.clone()).collect();
        assert_eq!(ids, server_ids.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_failed_mutation_leaves_cache_unchanged() {
        let mut f = logged_in(MemoryBackend::new());
        f.backend.seed_contacts(vec![contact("1", "Alice", Category::Work, false)]);
        assert!(f.store.fetch_all(&mut f.session));
        let before = f.store.contacts().to_vec();

        f.backend.fail_next(Error::api_with_message(500, "Database on fire"));
        let mut edit = before[0].clone();
        edit.name = "Changed".to_string();
        assert!(f.store.update(&mut f.session, "1", &edit).is_none());

        assert_eq!(f.store.contacts(), before.as_slice());
        assert!(f.notifier.errors().contains(&"Database on fire".to_string()));
    }

    #[test]
    fn test_toggle_favorite_flips_exactly_one_field_in_payload() {
        let mut f = logged_in(MemoryBackend::new());
        f.backend.seed_contacts(vec![
            contact("1", "Alice", Category::Work, false),
            contact("2", "Bob", Category::Family, true),
        ]);
        assert!(f.store.fetch_all(&mut f.session));
        let original = f.store.get("1").unwrap().clone();

        assert!(f.store.toggle_favorite(&mut f.session, "1"));

        let payload = f.backend.last_update_payload().unwrap();
        let mut expected = original;
        expected.is_favorite = true;
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::to_value(&expected).unwrap()
        );

        // Other entries untouched
        assert_eq!(f.store.get("2").unwrap(), &contact("2", "Bob", Category::Family, true));
        assert!(f.store.get("1").unwrap().is_favorite);
    }

    #[test]
    fn test_toggle_favorite_missing_id_sends_no_request() {
        let mut f = logged_in(MemoryBackend::new());
        assert!(f.store.fetch_all(&mut f.session));
        let requests_before = f.backend.request_count();

        assert!(!f.store.toggle_favorite(&mut f.session, "ghost"));
        assert_eq!(f.backend.request_count(), requests_before);
        assert_eq!(f.notifier.errors(), vec!["Contact not found!"]);
    }

    #[test]
    fn test_update_notes_keeps_other_fields() {
        let mut f = logged_in(MemoryBackend::new());
        f.backend.seed_contacts(vec![contact("1", "Alice", Category::Work, true)]);
        assert!(f.store.fetch_all(&mut f.session));

        assert!(f.store.update_notes(&mut f.session, "1", "met at conference"));

        let updated = f.store.get("1").unwrap();
        assert_eq!(updated.notes, "met at conference");
        assert_eq!(updated.name, "Alice");
        assert!(updated.is_favorite);
    }

    #[test]
    fn test_unauthorized_discards_cache_and_expires_session() {
        let mut f = logged_in(MemoryBackend::new());
        f.backend.seed_contacts(vec![contact("1", "Alice", Category::Work, false)]);
        assert!(f.store.fetch_all(&mut f.session));
        assert_eq!(f.store.contacts().len(), 1);

        f.backend.revoke_tokens();
        assert!(!f.store.fetch_all(&mut f.session));

        assert!(f.store.contacts().is_empty());
        assert!(!f.session.is_authenticated());
        assert!(f.notifier
            .errors()
            .contains(&"Session expired. Please log in again.".to_string()));
    }

    // === search ===

    fn searchable() -> ContactStore {
        let backend = Arc::new(MemoryBackend::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let mut store = ContactStore::new(backend, notifier);
        store.contacts = vec![
            contact("1", "Alice", Category::Work, false),
            contact("2", "Bob", Category::Family, true),
        ];
        store
    }

    #[test]
    fn test_empty_search_returns_full_collection_in_order() {
        let store = searchable();
        let results = store.search("", &SearchFilters::default());
        assert_eq!(results.as_slice(), store.contacts());
    }

    #[test]
    fn test_search_is_case_insensitive_on_name_and_email() {
        let store = searchable();

        let results = store.search("al", &SearchFilters::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "1");

        let results = store.search("BOB@EXAMPLE", &SearchFilters::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "2");
    }

    #[test]
    fn test_search_matches_phone_digits() {
        let store = searchable();
        let results = store.search("555-", &SearchFilters::default());
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_search_filters_category_and_favorites() {
        let store = searchable();

        let results = store.search(
            "",
            &SearchFilters {
                category: Some(Category::Work),
                favorites_only: false,
            },
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "1");

        let results = store.search(
            "",
            &SearchFilters {
                category: None,
                favorites_only: true,
            },
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "2");
    }

    #[test]
    fn test_search_is_pure() {
        let store = searchable();
        let filters = SearchFilters {
            category: Some(Category::Family),
            favorites_only: true,
        };
        let first = store.search("bob", &filters);
        let second = store.search("bob", &filters);
        assert_eq!(first, second);
        assert_eq!(store.contacts().len(), 2);
    }
}

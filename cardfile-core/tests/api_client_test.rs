//! Integration tests for the HTTP API client
//!
//! These exercise the real reqwest client against the in-process mock
//! backend: wire formats, bearer auth, status mapping, and error-message
//! passthrough.

use cardfile_core::adapters::mock_server::{MockApiServer, MockConfig, SEED_EMAIL, SEED_PASSWORD};
use cardfile_core::adapters::ApiClient;
use cardfile_core::domain::result::Error;
use cardfile_core::{Backend, Category, Contact, ContactDraft};

fn seeded_contact(id: &str, name: &str, favorite: bool) -> Contact {
    Contact {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "555-0100".to_string(),
        address: "1 Main St".to_string(),
        category: Category::Friend,
        notes: String::new(),
        is_favorite: favorite,
        last_contacted: None,
    }
}

fn login(client: &ApiClient) -> String {
    client.login(SEED_EMAIL, SEED_PASSWORD).unwrap().token
}

#[test]
fn test_login_returns_token_and_user() {
    let server = MockApiServer::start(MockConfig::default()).unwrap();
    let client = ApiClient::new(&server.base_url()).unwrap();

    let session = client.login(SEED_EMAIL, SEED_PASSWORD).unwrap();
    assert!(!session.token.is_empty());
    assert_eq!(session.user.email, SEED_EMAIL);
}

#[test]
fn test_login_rejection_carries_server_message() {
    let server = MockApiServer::start(MockConfig::default()).unwrap();
    let client = ApiClient::new(&server.base_url()).unwrap();

    let err = client.login(SEED_EMAIL, "wrong").unwrap_err();
    assert_eq!(err.server_message(), Some("Invalid email or password"));
    assert!(!err.is_unauthorized());
}

#[test]
fn test_signup_then_login() {
    let server = MockApiServer::start(MockConfig::default()).unwrap();
    let client = ApiClient::new(&server.base_url()).unwrap();

    client.signup("new@example.com", "hunter2").unwrap();
    let session = client.login("new@example.com", "hunter2").unwrap();
    assert_eq!(session.user.email, "new@example.com");

    // Re-registering the same email is rejected with the server's wording
    let err = client.signup("new@example.com", "hunter2").unwrap_err();
    assert_eq!(err.server_message(), Some("Email already registered"));
}

#[test]
fn test_contact_crud_round_trip() {
    let server = MockApiServer::start(MockConfig {
        seed_contacts: vec![seeded_contact("c1", "Alice", false)],
        ..Default::default()
    })
    .unwrap();
    let client = ApiClient::new(&server.base_url()).unwrap();
    let token = login(&client);

    let contacts = client.fetch_contacts(&token).unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Alice");

    let draft = ContactDraft {
        name: "Bob".to_string(),
        email: "bob@example.com".to_string(),
        category: Category::Work,
        ..Default::default()
    };
    let created = client.create_contact(&token, &draft, "u-seed").unwrap();
    assert!(!created.id.is_empty());
    assert_eq!(created.category, Category::Work);

    let mut edited = created.clone();
    edited.is_favorite = true;
    let updated = client.update_contact(&token, &created.id, &edited).unwrap();
    assert!(updated.is_favorite);

    client.delete_contact(&token, &contacts[0].id).unwrap();
    let remaining = client.fetch_contacts(&token).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, created.id);
}

#[test]
fn test_update_missing_contact_is_api_error() {
    let server = MockApiServer::start(MockConfig::default()).unwrap();
    let client = ApiClient::new(&server.base_url()).unwrap();
    let token = login(&client);

    let ghost = seeded_contact("ghost", "Ghost", false);
    let err = client.update_contact(&token, "ghost", &ghost).unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message.as_deref(), Some("Contact not found"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[test]
fn test_invalid_token_maps_to_unauthorized() {
    let server = MockApiServer::start(MockConfig::default()).unwrap();
    let client = ApiClient::new(&server.base_url()).unwrap();

    let err = client.fetch_contacts("not-a-real-token").unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.server_message(), Some("Session expired. Please log in again."));
}

#[test]
fn test_auth_failure_mode_rejects_valid_token() {
    let server = MockApiServer::start(MockConfig {
        fail_auth: true,
        ..Default::default()
    })
    .unwrap();
    let client = ApiClient::new(&server.base_url()).unwrap();
    let token = login(&client);

    let err = client.fetch_contacts(&token).unwrap_err();
    assert!(err.is_unauthorized());
}

#[test]
fn test_profile_update_multipart() {
    let server = MockApiServer::start(MockConfig::default()).unwrap();
    let client = ApiClient::new(&server.base_url()).unwrap();
    let token = login(&client);

    let user = client.update_profile(&token, "Renamed User", None).unwrap();
    assert_eq!(user.name, "Renamed User");
    assert_eq!(user.email, SEED_EMAIL);
}

#[test]
fn test_profile_update_with_avatar_file() {
    let server = MockApiServer::start(MockConfig::default()).unwrap();
    let client = ApiClient::new(&server.base_url()).unwrap();
    let token = login(&client);

    let dir = tempfile::tempdir().unwrap();
    let avatar = dir.path().join("avatar.png");
    std::fs::write(&avatar, b"\x89PNG fake image bytes").unwrap();

    let user = client
        .update_profile(&token, "With Avatar", Some(&avatar))
        .unwrap();
    assert_eq!(user.name, "With Avatar");
    assert!(user.avatar_url.is_some());
}

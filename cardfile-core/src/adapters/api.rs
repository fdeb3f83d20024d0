//! Cardfile backend API client
//!
//! Talks JSON over HTTP to the contact backend. All endpoints except
//! signup/login carry `Authorization: Bearer <token>`. Non-2xx bodies
//! are probed for a `{message}` field so the server's wording can be
//! surfaced verbatim.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::multipart::Form;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::domain::{Contact, ContactDraft, User};
use crate::ports::{Backend, LoginSession};

/// Default backend URL for local development
const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Environment variable to override the backend base URL.
/// Takes precedence over the configured URL.
pub const API_URL_ENV: &str = "CARDFILE_API_URL";

/// Get the backend base URL, checking the environment variable first
pub fn get_base_url(configured: Option<&str>) -> String {
    std::env::var(API_URL_ENV)
        .ok()
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

// =============================================================================
// Wire models
// =============================================================================

#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    token: String,
    user: User,
}

/// Wrapper for the contact list response
#[derive(Debug, Deserialize)]
struct ContactsBody {
    contacts: Vec<Contact>,
}

/// Create payload: the draft plus the owning user's id
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateContactBody<'a> {
    #[serde(flatten)]
    draft: &'a ContactDraft,
    user_id: &'a str,
}

/// Error bodies are `{ "message": "..." }` when the backend has
/// something to say
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// =============================================================================
// HTTP client
// =============================================================================

/// Cardfile backend API client
#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against the given base URL
    pub fn new(base_url: &str) -> Result<Self> {
        if base_url.is_empty() {
            return Err(Error::Config("API base URL cannot be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header("Authorization", format!("Bearer {}", token))
    }

    fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().map_err(map_request_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .ok()
            .and_then(|body| body.message);

        match status.as_u16() {
            401 | 403 => Err(Error::unauthorized(
                message.unwrap_or_else(|| "Session expired. Please log in again.".to_string()),
            )),
            code => Err(Error::Api {
                status: code,
                message,
            }),
        }
    }
}

impl Backend for ApiClient {
    fn signup(&self, email: &str, password: &str) -> Result<()> {
        let body = CredentialsBody { email, password };
        self.send(self.client.post(self.url("/api/users/signup")).json(&body))?;
        Ok(())
    }

    fn login(&self, email: &str, password: &str) -> Result<LoginSession> {
        let body = CredentialsBody { email, password };
        let response = self.send(self.client.post(self.url("/api/users/login")).json(&body))?;

        let login: LoginBody = response
            .json()
            .map_err(|e| Error::network(format!("Failed to parse login response: {}", e)))?;

        Ok(LoginSession {
            token: login.token,
            user: login.user,
        })
    }

    fn update_profile(&self, token: &str, name: &str, avatar: Option<&Path>) -> Result<User> {
        let mut form = Form::new().text("name", name.to_string());
        if let Some(path) = avatar {
            form = form.file("avatar", path)?;
        }

        let builder = self.client.put(self.url("/api/users/profile")).multipart(form);
        let response = self.send(self.bearer(builder, token))?;

        response
            .json()
            .map_err(|e| Error::network(format!("Failed to parse profile response: {}", e)))
    }

    fn fetch_contacts(&self, token: &str) -> Result<Vec<Contact>> {
        let builder = self.client.get(self.url("/api/contacts"));
        let response = self.send(self.bearer(builder, token))?;

        let body: ContactsBody = response
            .json()
            .map_err(|e| Error::network(format!("Failed to parse contacts response: {}", e)))?;

        Ok(body.contacts)
    }

    fn create_contact(&self, token: &str, draft: &ContactDraft, user_id: &str) -> Result<Contact> {
        let body = CreateContactBody { draft, user_id };
        let builder = self.client.post(self.url("/api/contacts")).json(&body);
        let response = self.send(self.bearer(builder, token))?;

        response
            .json()
            .map_err(|e| Error::network(format!("Failed to parse contact response: {}", e)))
    }

    fn update_contact(&self, token: &str, id: &str, contact: &Contact) -> Result<Contact> {
        let builder = self
            .client
            .put(self.url(&format!("/api/contacts/{}", id)))
            .json(contact);
        let response = self.send(self.bearer(builder, token))?;

        response
            .json()
            .map_err(|e| Error::network(format!("Failed to parse contact response: {}", e)))
    }

    fn delete_contact(&self, token: &str, id: &str) -> Result<()> {
        let builder = self.client.delete(self.url(&format!("/api/contacts/{}", id)));
        self.send(self.bearer(builder, token))?;
        Ok(())
    }
}

/// Map transport errors to user-friendly messages
fn map_request_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::network("Connection timed out after 30 seconds")
    } else if error.is_connect() {
        Error::network("Unable to reach the Cardfile server")
    } else {
        Error::network(format!("Request failed: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_empty_base_url() {
        assert!(ApiClient::new("").is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:5000");
        assert_eq!(client.url("/api/contacts"), "http://localhost:5000/api/contacts");
    }

    #[test]
    fn test_base_url_falls_back_to_default() {
        std::env::remove_var(API_URL_ENV);
        assert_eq!(get_base_url(None), DEFAULT_API_URL);
        assert_eq!(get_base_url(Some("http://api.example.com")), "http://api.example.com");
    }

    #[test]
    fn test_create_payload_carries_user_id() {
        let draft = ContactDraft {
            name: "Alice".to_string(),
            ..Default::default()
        };
        let body = CreateContactBody {
            draft: &draft,
            user_id: "u1",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["name"], serde_json::json!("Alice"));
        assert_eq!(value["userId"], serde_json::json!("u1"));
        assert_eq!(value["category"], serde_json::json!("Other"));
    }
}

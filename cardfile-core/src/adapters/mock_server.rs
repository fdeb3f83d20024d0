//! Mock Cardfile backend for testing
//!
//! A small in-process HTTP server that simulates the real REST backend,
//! allowing the reqwest client to be exercised end to end without a
//! deployed server. It implements the full surface:
//!
//! - POST /api/users/signup and /api/users/login
//! - PUT /api/users/profile (multipart)
//! - GET/POST /api/contacts, PUT/DELETE /api/contacts/{id}
//!
//! State is held in memory and shared across connections; bearer tokens
//! are issued at login and checked on every contact route.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Contact, User};

/// Email of the user the mock is seeded with
pub const SEED_EMAIL: &str = "test@example.com";
/// Password of the seeded user
pub const SEED_PASSWORD: &str = "password123";

/// Configuration for mock behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Reject every authorized request with 401
    pub fail_auth: bool,
    /// Contacts present before any request is made
    pub seed_contacts: Vec<Contact>,
}

struct ServerState {
    config: MockConfig,
    /// email -> (password, user)
    users: HashMap<String, (String, User)>,
    /// issued bearer tokens -> user email
    sessions: HashMap<String, String>,
    contacts: Vec<Contact>,
}

impl ServerState {
    fn new(config: MockConfig) -> Self {
        let seed_user = User {
            id: "u-seed".to_string(),
            email: SEED_EMAIL.to_string(),
            name: "Test User".to_string(),
            avatar_url: None,
        };
        let mut users = HashMap::new();
        users.insert(
            SEED_EMAIL.to_string(),
            (SEED_PASSWORD.to_string(), seed_user),
        );

        Self {
            contacts: config.seed_contacts.clone(),
            config,
            users,
            sessions: HashMap::new(),
        }
    }
}

/// Mock backend server for testing
pub struct MockApiServer {
    port: u16,
    running: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockApiServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let state = Arc::new(Mutex::new(ServerState::new(config)));

        // Non-blocking accept so the server can shut down cleanly
        listener.set_nonblocking(true)?;

        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let state = state.clone();
                        thread::spawn(move || {
                            handle_connection(stream, &state);
                        });
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            thread_handle: Some(thread_handle),
        })
    }

    /// Base URL for pointing an ApiClient at this server
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

// =============================================================================
// Request handling
// =============================================================================

struct Request {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
    }

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body).ok()?;
    }

    Some(Request {
        method,
        path,
        headers,
        body,
    })
}

fn send_response(stream: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn message_body(message: &str) -> String {
    json!({ "message": message }).to_string()
}

/// Resolve the bearer token to the authenticated user's email
fn authorize(request: &Request, state: &ServerState) -> Option<String> {
    if state.config.fail_auth {
        return None;
    }
    let header = request.headers.get("authorization")?;
    let token = header.strip_prefix("Bearer ")?;
    state.sessions.get(token).cloned()
}

#[derive(Deserialize)]
struct CredentialsBody {
    email: String,
    password: String,
}

fn handle_connection(mut stream: TcpStream, state: &Arc<Mutex<ServerState>>) {
    let Some(request) = read_request(&mut stream) else {
        send_response(&mut stream, 400, "Bad Request", &message_body("Invalid request"));
        return;
    };

    let path = request.path.split('?').next().unwrap_or(&request.path);
    let mut state = state.lock().unwrap();

    match (request.method.as_str(), path) {
        ("POST", "/api/users/signup") => {
            let Ok(body) = serde_json::from_slice::<CredentialsBody>(&request.body) else {
                send_response(&mut stream, 400, "Bad Request", &message_body("Invalid body"));
                return;
            };
            if state.users.contains_key(&body.email) {
                send_response(
                    &mut stream,
                    409,
                    "Conflict",
                    &message_body("Email already registered"),
                );
                return;
            }
            let user = User::new(Uuid::new_v4().to_string(), &body.email);
            state.users.insert(body.email, (body.password, user));
            send_response(&mut stream, 201, "Created", &message_body("User created"));
        }

        ("POST", "/api/users/login") => {
            let Ok(body) = serde_json::from_slice::<CredentialsBody>(&request.body) else {
                send_response(&mut stream, 400, "Bad Request", &message_body("Invalid body"));
                return;
            };
            let user = state
                .users
                .get(&body.email)
                .filter(|(password, _)| *password == body.password)
                .map(|(_, user)| user.clone());
            match user {
                Some(user) => {
                    let token = format!("tok-{}", Uuid::new_v4());
                    state.sessions.insert(token.clone(), body.email);
                    let response = json!({ "token": token, "user": user });
                    send_response(&mut stream, 200, "OK", &response.to_string());
                }
                None => send_response(
                    &mut stream,
                    400,
                    "Bad Request",
                    &message_body("Invalid email or password"),
                ),
            }
        }

        ("PUT", "/api/users/profile") => {
            let Some(email) = authorize(&request, &state) else {
                send_response(
                    &mut stream,
                    401,
                    "Unauthorized",
                    &message_body("Session expired. Please log in again."),
                );
                return;
            };
            let name = extract_multipart_field(&request.body, "name").unwrap_or_default();
            let has_avatar = find_multipart_part(&request.body, "avatar");
            let Some((_, user)) = state.users.get_mut(&email) else {
                send_response(&mut stream, 404, "Not Found", &message_body("User not found"));
                return;
            };
            user.name = name;
            if has_avatar {
                user.avatar_url = Some(format!("/uploads/{}.png", user.id));
            }
            let body = serde_json::to_string(user).unwrap();
            send_response(&mut stream, 200, "OK", &body);
        }

        ("GET", "/api/contacts") => {
            if authorize(&request, &state).is_none() {
                send_response(
                    &mut stream,
                    401,
                    "Unauthorized",
                    &message_body("Session expired. Please log in again."),
                );
                return;
            }
            let body = json!({ "contacts": state.contacts }).to_string();
            send_response(&mut stream, 200, "OK", &body);
        }

        ("POST", "/api/contacts") => {
            if authorize(&request, &state).is_none() {
                send_response(
                    &mut stream,
                    401,
                    "Unauthorized",
                    &message_body("Session expired. Please log in again."),
                );
                return;
            }
            // The create payload is a draft plus userId; reuse the Contact
            // shape by injecting a fresh id before deserializing
            let Ok(mut value) = serde_json::from_slice::<serde_json::Value>(&request.body) else {
                send_response(&mut stream, 400, "Bad Request", &message_body("Invalid body"));
                return;
            };
            value["id"] = json!(Uuid::new_v4().to_string());
            let Ok(contact) = serde_json::from_value::<Contact>(value) else {
                send_response(&mut stream, 400, "Bad Request", &message_body("Invalid contact"));
                return;
            };
            state.contacts.push(contact.clone());
            let body = serde_json::to_string(&contact).unwrap();
            send_response(&mut stream, 201, "Created", &body);
        }

        ("PUT", p) if p.starts_with("/api/contacts/") => {
            if authorize(&request, &state).is_none() {
                send_response(
                    &mut stream,
                    401,
                    "Unauthorized",
                    &message_body("Session expired. Please log in again."),
                );
                return;
            }
            let id = p.trim_start_matches("/api/contacts/").to_string();
            let Ok(mut updated) = serde_json::from_slice::<Contact>(&request.body) else {
                send_response(&mut stream, 400, "Bad Request", &message_body("Invalid contact"));
                return;
            };
            updated.id = id.clone();
            match state.contacts.iter_mut().find(|c| c.id == id) {
                Some(entry) => {
                    *entry = updated.clone();
                    let body = serde_json::to_string(&updated).unwrap();
                    send_response(&mut stream, 200, "OK", &body);
                }
                None => send_response(
                    &mut stream,
                    404,
                    "Not Found",
                    &message_body("Contact not found"),
                ),
            }
        }

        ("DELETE", p) if p.starts_with("/api/contacts/") => {
            if authorize(&request, &state).is_none() {
                send_response(
                    &mut stream,
                    401,
                    "Unauthorized",
                    &message_body("Session expired. Please log in again."),
                );
                return;
            }
            let id = p.trim_start_matches("/api/contacts/");
            let before = state.contacts.len();
            state.contacts.retain(|c| c.id != id);
            if state.contacts.len() == before {
                send_response(
                    &mut stream,
                    404,
                    "Not Found",
                    &message_body("Contact not found"),
                );
            } else {
                send_response(&mut stream, 200, "OK", &message_body("Contact deleted"));
            }
        }

        _ => send_response(
            &mut stream,
            404,
            "Not Found",
            &message_body("Endpoint not found"),
        ),
    }
}

// =============================================================================
// Minimal multipart parsing (enough for the profile form)
// =============================================================================

fn find_multipart_part(body: &[u8], field: &str) -> bool {
    let text = String::from_utf8_lossy(body);
    text.contains(&format!("name=\"{}\"", field))
}

fn extract_multipart_field(body: &[u8], field: &str) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let marker = format!("name=\"{}\"", field);
    let start = text.find(&marker)?;
    let rest = &text[start..];
    let value_start = rest.find("\r\n\r\n")? + 4;
    let rest = &rest[value_start..];
    let value_end = rest.find("\r\n")?;
    Some(rest[..value_end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_server_starts() {
        let server = MockApiServer::start(MockConfig::default()).unwrap();
        assert!(server.port() > 0);
    }

    #[test]
    fn test_multipart_field_extraction() {
        let body = b"--boundary\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nNew Name\r\n--boundary--\r\n";
        assert_eq!(
            extract_multipart_field(body, "name").as_deref(),
            Some("New Name")
        );
        assert!(extract_multipart_field(body, "avatar").is_none());
        assert!(find_multipart_part(body, "name"));
        assert!(!find_multipart_part(body, "avatar"));
    }
}

//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest HTTP client for the Backend port
//! - data-directory files for the CredentialStore port
//! - in-memory doubles of every port for tests and demos
//! - a mock HTTP server simulating the real backend

pub mod api;
pub mod file_store;
pub mod memory;
pub mod mock_server;

pub use api::ApiClient;
pub use file_store::FileCredentialStore;
pub use memory::{MemoryBackend, MemoryCredentialStore, RecordingEventSink, RecordingNotifier};
pub use mock_server::{MockApiServer, MockConfig};

//! User interaction ports
//!
//! No error escapes a store: every failure is surfaced to the user
//! through the Notifier as a side effect. Confirmation prompts live
//! here too, so the stores stay free of terminal/browser specifics.

/// User-visible notification surface (the toast/confirm analog)
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);

    fn error(&self, message: &str);

    /// Ask the user a yes/no question; used by logout
    fn confirm(&self, prompt: &str) -> bool;
}

/// Session lifecycle events for the composition root
///
/// Emitted instead of navigating directly, so the stores stay decoupled
/// from routing. The subscriber decides what "go log in again" means.
pub trait SessionEventSink: Send + Sync {
    /// The credential was rejected or cleared; the user must log in again
    fn session_expired(&self);
}

/// Event sink that ignores everything; useful when no subscriber exists
#[derive(Debug, Default)]
pub struct NullEventSink;

impl SessionEventSink for NullEventSink {
    fn session_expired(&self) {}
}

//! Session credential plumbing.
//!
//! The host application owns authentication; this module is the client's
//! view of it: a credential that appears on login and disappears on logout.
//! Components subscribe to transitions to open or close the push channel.

use tokio::sync::watch;

/// An opaque bearer credential for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Return the raw token for header construction.
    pub fn token(&self) -> &str {
        &self.0
    }
}

/// Shared handle to the session's authentication state.
///
/// Cheap to clone; all clones observe the same state.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: watch::Sender<Option<Credential>>,
}

impl SessionHandle {
    /// Create an unauthenticated session handle.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Record a successful login.
    pub fn login(&self, credential: Credential) {
        self.tx.send_replace(Some(credential));
    }

    /// Record a logout.
    pub fn logout(&self) {
        self.tx.send_replace(None);
    }

    /// The current credential, if authenticated.
    pub fn credential(&self) -> Option<Credential> {
        self.tx.borrow().clone()
    }

    /// Whether the session is currently authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Subscribe to authentication transitions.
    pub fn subscribe(&self) -> watch::Receiver<Option<Credential>> {
        self.tx.subscribe()
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

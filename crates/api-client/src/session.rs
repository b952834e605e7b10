//! Session token plumbing
//!
//! The client never stores a token of its own. It owns one [`TokenSlot`]
//! holding the currently registered [`TokenProvider`] and asks it for a token
//! right before each protected request, so rotation and logout take effect on
//! the next call.
//!
//! [`AuthSession`] is the stock provider: it keeps the token and user
//! returned by login/signup and can be persisted with a [`SessionStore`].

use crate::payload::AuthResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Supplies the current bearer token, if any
pub trait TokenProvider: Send + Sync {
    /// Current token; `None` when signed out
    fn token(&self) -> Option<String>;
}

impl<F> TokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

/// Single registration point for the token provider.
///
/// Clones share the slot. Registering a provider replaces the previous one.
#[derive(Clone, Default)]
pub struct TokenSlot {
    provider: Arc<RwLock<Option<Arc<dyn TokenProvider>>>>,
}

impl TokenSlot {
    /// Create an empty slot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the provider; last registration wins
    pub fn set_token_provider<P: TokenProvider + 'static>(&self, provider: P) {
        let provider: Arc<dyn TokenProvider> = Arc::new(provider);
        let mut slot = self
            .provider
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = Some(provider);
    }

    /// Remove the registered provider
    pub fn clear(&self) {
        let mut slot = self
            .provider
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = None;
    }

    /// Ask the registered provider for a token; blank tokens count as none
    #[must_use]
    pub fn current_token(&self) -> Option<String> {
        let provider = self
            .provider
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()?;
        provider.token().filter(|t| !t.is_empty())
    }
}

impl fmt::Debug for TokenSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered = self
            .provider
            .read()
            .map(|p| p.is_some())
            .unwrap_or(false);
        f.debug_struct("TokenSlot")
            .field("registered", &registered)
            .finish()
    }
}

/// Persisted form of a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Bearer token
    #[serde(default)]
    pub token: Option<String>,
    /// Opaque user record
    #[serde(default)]
    pub user: Option<Value>,
}

/// Shared authentication state for one signed-in user
#[derive(Clone, Default)]
pub struct AuthSession {
    state: Arc<RwLock<SessionState>>,
}

impl AuthSession {
    /// Create a signed-out session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from previously persisted state
    #[must_use]
    pub fn from_state(state: SessionState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.read().clone()
    }

    /// Current user record
    #[must_use]
    pub fn user(&self) -> Option<Value> {
        self.read().user.clone()
    }

    /// Check whether a token is held
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Adopt the result of a login; a missing token signs the session out
    pub fn apply_login(&self, response: &AuthResponse) {
        let mut state = self.write();
        state.token.clone_from(&response.access_token);
        state.user.clone_from(&response.user);
    }

    /// Adopt the result of a signup, only if the backend issued a token
    pub fn apply_signup(&self, response: &AuthResponse) {
        if response.access_token.is_some() {
            self.apply_login(response);
        }
    }

    /// Forget token and user
    pub fn logout(&self) {
        *self.write() = SessionState::default();
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TokenProvider for AuthSession {
    fn token(&self) -> Option<String> {
        self.read().token.clone()
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// JSON file persistence for [`SessionState`]
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved state.
    ///
    /// A missing or unreadable file yields a signed-out state.
    #[must_use]
    pub fn load(&self) -> SessionState {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(path = %self.path.display(), error = %e, "Failed to read session file");
                }
                return SessionState::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Ignoring corrupt session file");
            SessionState::default()
        })
    }

    /// Write the state, creating parent directories as needed
    pub fn save(&self, state: &SessionState) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// Load into a live session
    #[must_use]
    pub fn load_session(&self) -> AuthSession {
        AuthSession::from_state(self.load())
    }
}

//! Per-invocation context: client, session, and where the session lives
//!
//! Base URL resolution is handled by `recipe-api-client`; `--api-base` is
//! placed in front of its standard chain.

use crate::output::OutputFormat;
use anyhow::{Context as _, Result};
use recipe_api_client::{AuthSession, ClientConfig, RecipeClient, SessionStore};
use std::path::PathBuf;
use tracing::debug;

/// Session file name inside the config directory
const SESSION_FILE: &str = "session.json";

/// Everything a command needs
pub struct Context {
    pub client: RecipeClient,
    pub session: AuthSession,
    pub store: SessionStore,
    pub format: OutputFormat,
}

impl Context {
    /// Build the client and load the stored session into it
    pub fn new(
        api_base: Option<String>,
        session_file: Option<PathBuf>,
        format: OutputFormat,
    ) -> Result<Self> {
        let config = match api_base {
            Some(url) => ClientConfig::from_env().with_base_url_override(url),
            None => ClientConfig::from_env(),
        };
        let client = RecipeClient::with_config(config).context("Invalid client configuration")?;

        let store = SessionStore::new(session_file.unwrap_or_else(default_session_path));
        let session = store.load_session();
        client.set_token_provider(session.clone());
        debug!(
            api_base = %client.base_url(),
            session_file = %store.path().display(),
            authenticated = session.is_authenticated(),
            "Context ready"
        );

        Ok(Self {
            client,
            session,
            store,
            format,
        })
    }

    /// Persist the current session state
    pub fn persist_session(&self) -> Result<()> {
        self.store
            .save(&self.session.state())
            .with_context(|| format!("Failed to write {}", self.store.path().display()))
    }
}

/// `<config dir>/recipe-cli/session.json`, or the working directory when
/// there is no config directory
#[must_use]
pub fn default_session_path() -> PathBuf {
    dirs::config_dir().map_or_else(
        || PathBuf::from(".recipe-session.json"),
        |dir| dir.join("recipe-cli").join(SESSION_FILE),
    )
}

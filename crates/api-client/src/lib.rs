//! API access layer for the Recipe backend
//!
//! This crate is the single component through which a Recipe UI talks to its
//! backend. It resolves the backend origin, attaches bearer authentication only
//! where it belongs, decodes JSON or text payloads, and turns failures into
//! classified errors carrying one human-readable message.
//!
//! # Features
//!
//! - **Layered base URL**: runtime override, build-time value, then a default origin
//! - **Selective auth**: a declarative route table keeps tokens off public endpoints
//! - **Pluggable session**: the current bearer token is read fresh on every call
//! - **Classified failures**: network / CORS / unknown transport errors with hints
//! - **Connectivity probe**: a diagnostic health check that never fails
//!
//! # Example
//!
//! ```rust,no_run
//! use recipe_api_client::{AuthSession, ClientConfig, RecipeClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RecipeClient::with_config(ClientConfig::from_env())?;
//!
//!     let probe = client.health().check().await;
//!     println!("backend reachable: {} ({})", probe.ok, probe.url);
//!
//!     let results = client.recipes().search("pasta").await?;
//!     println!("found {} recipes", results.recipe_list().len());
//!
//!     let session = AuthSession::new();
//!     client.set_token_provider(session.clone());
//!     client.auth().login_into(&session, "a@b.com", "secret").await?;
//!     let saved = client.saved().list().await?;
//!     println!("{} saved", saved.recipe_list().len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod payload;
pub mod request;
pub mod routes;
pub mod session;

pub use client::RecipeClient;
pub use config::{BaseUrlResolver, ClientConfig, ConfigSource, DEFAULT_API_BASE};
pub use error::{classify_transport_error, ApiError, ApiResult, TransportFailureKind};
pub use payload::{AuthResponse, Payload, RecipeSummary};
pub use request::Request;
pub use reqwest::Method;
pub use routes::{RoutePattern, RouteTable, Visibility};
pub use session::{AuthSession, SessionState, SessionStore, TokenProvider, TokenSlot};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::RecipeClient;
    pub use crate::config::{BaseUrlResolver, ClientConfig, ConfigSource};
    pub use crate::endpoints::{AuthApi, HealthApi, ProbeResult, RecipesApi, SavedApi};
    pub use crate::error::{ApiError, ApiResult, TransportFailureKind};
    pub use crate::payload::{AuthResponse, Payload, RecipeSummary};
    pub use crate::request::Request;
    pub use crate::session::{AuthSession, SessionStore, TokenProvider, TokenSlot};
}

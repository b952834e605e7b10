//! Login and signup
//!
//! These routes issue the token, so they never require one.

use crate::client::RecipeClient;
use crate::error::ApiResult;
use crate::payload::{AuthResponse, Payload};
use crate::request::Request;
use crate::session::AuthSession;
use serde::Serialize;
use tracing::info;

/// Credentials body for login and signup
#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Auth API interface
#[derive(Clone)]
pub struct AuthApi {
    client: RecipeClient,
}

impl AuthApi {
    /// Create a new auth API interface
    pub(crate) fn new(client: RecipeClient) -> Self {
        Self { client }
    }

    /// Log in
    ///
    /// POST /auth/login `{ email, password }` -> `{ access_token, user }`
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Payload> {
        self.client
            .send(credentials_request("/auth/login", email, password)?)
            .await
    }

    /// Sign up
    ///
    /// POST /auth/signup `{ email, password }` -> `{ access_token?, user? }`
    pub async fn signup(&self, email: &str, password: &str) -> ApiResult<Payload> {
        self.client
            .send(credentials_request("/auth/signup", email, password)?)
            .await
    }

    /// Log in and store the issued token and user in `session`
    pub async fn login_into(
        &self,
        session: &AuthSession,
        email: &str,
        password: &str,
    ) -> ApiResult<AuthResponse> {
        let response: AuthResponse = self.login(email, password).await?.into_typed()?;
        session.apply_login(&response);
        info!(authenticated = session.is_authenticated(), "Logged in");
        Ok(response)
    }

    /// Sign up and, when the backend issued a token, store it in `session`
    pub async fn signup_into(
        &self,
        session: &AuthSession,
        email: &str,
        password: &str,
    ) -> ApiResult<AuthResponse> {
        let payload = self.signup(email, password).await?;
        let response: AuthResponse = if payload.is_null() {
            AuthResponse::default()
        } else {
            payload.into_typed()?
        };
        session.apply_signup(&response);
        info!(authenticated = session.is_authenticated(), "Signed up");
        Ok(response)
    }
}

fn credentials_request(path: &str, email: &str, password: &str) -> ApiResult<Request> {
    Request::post(path).json(&Credentials { email, password })
}

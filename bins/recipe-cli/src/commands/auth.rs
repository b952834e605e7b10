//! Login, signup, logout, whoami

use crate::config::Context;
use crate::output::{print_json, OutputFormat, Status};
use anyhow::Result;
use serde_json::{json, Value};

/// Log in and persist the session
pub async fn login(ctx: &Context, email: &str, password: &str) -> Result<()> {
    let response = ctx.client.auth().login_into(&ctx.session, email, password).await?;
    ctx.persist_session()?;

    if ctx.format == OutputFormat::Json {
        return print_json(&json!({
            "authenticated": ctx.session.is_authenticated(),
            "user": response.user,
        }));
    }
    if ctx.session.is_authenticated() {
        Status::success(&format!("Logged in as {}", user_label(response.user.as_ref(), email)));
    } else {
        Status::warning("Login succeeded but no token was issued");
    }
    Ok(())
}

/// Create an account; signs in when the backend issues a token
pub async fn signup(ctx: &Context, email: &str, password: &str) -> Result<()> {
    let response = ctx.client.auth().signup_into(&ctx.session, email, password).await?;
    if response.access_token.is_some() {
        ctx.persist_session()?;
    }

    if ctx.format == OutputFormat::Json {
        return print_json(&json!({
            "authenticated": ctx.session.is_authenticated(),
            "user": response.user,
        }));
    }
    if response.access_token.is_some() {
        Status::success(&format!("Account created, logged in as {email}"));
    } else {
        Status::success(&format!("Account created for {email}. Log in with `recipe login`."));
    }
    Ok(())
}

/// Clear the stored session
pub fn logout(ctx: &Context) -> Result<()> {
    ctx.session.logout();
    ctx.persist_session()?;
    if ctx.format == OutputFormat::Json {
        return print_json(&json!({ "authenticated": false }));
    }
    Status::success("Logged out");
    Ok(())
}

/// Show the stored user
pub fn whoami(ctx: &Context) -> Result<()> {
    let user = ctx.session.user();
    if ctx.format == OutputFormat::Json {
        return print_json(&json!({
            "authenticated": ctx.session.is_authenticated(),
            "user": user,
        }));
    }
    if ctx.session.is_authenticated() {
        Status::info(&format!("Signed in as {}", user_label(user.as_ref(), "unknown user")));
    } else {
        Status::info("Not signed in");
    }
    Ok(())
}

/// The user's email when the record has one
fn user_label(user: Option<&Value>, fallback: &str) -> String {
    user.and_then(|u| u.get("email"))
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

//! Saved collection commands

use crate::config::Context;
use crate::output::{print_json, recipe_line, OutputFormat, Status};
use anyhow::Result;
use serde_json::json;

/// List saved recipes
pub async fn list(ctx: &Context) -> Result<()> {
    if !ctx.session.is_authenticated() {
        Status::warning("Not signed in; the backend will likely reject this request");
    }
    let recipes = ctx.client.saved().list().await?.recipe_list();

    if ctx.format == OutputFormat::Json {
        return print_json(&recipes);
    }

    Status::header("Saved recipes");
    if recipes.is_empty() {
        Status::info("No saved recipes yet. Find recipes to save with `recipe search`.");
        return Ok(());
    }
    for recipe in &recipes {
        println!("  {}", recipe_line(recipe));
    }
    Ok(())
}

/// Save a recipe
pub async fn save(ctx: &Context, id: &str) -> Result<()> {
    let payload = ctx.client.saved().save(id).await?;
    if ctx.format == OutputFormat::Json {
        return print_json(&json!({ "saved": id, "response": payload }));
    }
    Status::success(&format!("Saved recipe {id}"));
    Ok(())
}

/// Remove a saved recipe
pub async fn unsave(ctx: &Context, id: &str) -> Result<()> {
    let payload = ctx.client.saved().unsave(id).await?;
    if ctx.format == OutputFormat::Json {
        return print_json(&json!({ "removed": id, "response": payload }));
    }
    Status::success(&format!("Removed recipe {id}"));
    Ok(())
}

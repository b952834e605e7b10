//! Search and show commands

use crate::config::Context;
use crate::output::{format_count, print_json, recipe_details, recipe_line, OutputFormat, Status};
use anyhow::Result;
use owo_colors::OwoColorize;
use recipe_api_client::{Payload, RecipeSummary};

/// Search recipes and list the matches
pub async fn search(ctx: &Context, query: &str) -> Result<()> {
    let payload = ctx.client.recipes().search(query).await?;
    let recipes = payload.recipe_list();

    if ctx.format == OutputFormat::Json {
        return print_json(&recipes);
    }

    if query.is_empty() {
        Status::header("Popular recipes");
    } else {
        Status::header(&format!("Recipes matching \"{query}\""));
    }
    if recipes.is_empty() {
        Status::info("No recipes found");
        return Ok(());
    }
    for recipe in &recipes {
        println!("  {}", recipe_line(recipe));
    }
    println!();
    println!("  {}", format_count(recipes.len(), "recipe", "recipes").dimmed());
    Ok(())
}

/// Show one recipe in detail
pub async fn show(ctx: &Context, id: &str) -> Result<()> {
    let payload = ctx.client.recipes().get_by_id(id).await?;

    if ctx.format == OutputFormat::Json {
        return print_json(&payload);
    }

    let recipe: RecipeSummary = match payload {
        Payload::Text(text) => {
            println!("{text}");
            return Ok(());
        }
        other => other.into_typed()?,
    };

    Status::header(recipe.display_title());
    let details = recipe_details(&recipe);
    if !details.is_empty() {
        println!("  {details}");
    }
    if let Some(image) = recipe.image.as_deref() {
        println!("  {}", image.dimmed());
    }
    if let Some(summary) = recipe.summary.as_deref() {
        println!();
        println!("  {summary}");
    }
    Ok(())
}

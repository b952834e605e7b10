//! Terminal output utilities

use clap::ValueEnum;
use owo_colors::OwoColorize;
use recipe_api_client::RecipeSummary;
use serde::Serialize;

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line description of a recipe
pub fn recipe_line(recipe: &RecipeSummary) -> String {
    let mut line = format!(
        "{} {}",
        recipe.id.as_deref().unwrap_or("?").dimmed(),
        recipe.display_title().bold()
    );
    let details = recipe_details(recipe);
    if !details.is_empty() {
        line.push_str(&format!("  {}", details.dimmed()));
    }
    line
}

/// "25 mins · 2 servings", omitting missing parts
pub fn recipe_details(recipe: &RecipeSummary) -> String {
    let mut parts = Vec::new();
    if let Some(minutes) = recipe.ready_in_minutes.filter(|m| *m > 0) {
        parts.push(format!("{minutes} mins"));
    }
    if let Some(servings) = recipe.servings.filter(|s| *s > 0) {
        parts.push(format_count(servings as usize, "serving", "servings"));
    }
    parts.join(" · ")
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

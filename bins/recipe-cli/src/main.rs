//! Recipe CLI - search, view, and save recipes from the terminal
//!
//! A thin UI over `recipe-api-client`. The session token is kept in a JSON
//! file so a login survives between invocations.

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod config;
mod output;

use commands::{auth, health, recipes, saved};
use config::Context;
use output::OutputFormat;

/// Search, view, and save recipes
#[derive(Parser)]
#[command(name = "recipe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Backend base URL (overrides RECIPE_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Session file (defaults to the user config directory)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is reachable
    Health,

    /// Search recipes
    Search {
        /// Search text (empty lists popular recipes)
        #[arg(default_value = "")]
        query: String,
    },

    /// Show one recipe
    Show {
        /// Recipe ID
        id: String,
    },

    /// List saved recipes
    Saved,

    /// Save a recipe
    Save {
        /// Recipe ID
        id: String,
    },

    /// Remove a saved recipe
    Unsave {
        /// Recipe ID
        id: String,
    },

    /// Log in and remember the session
    Login {
        /// Account email
        email: String,

        /// Account password
        #[arg(short, long, env = "RECIPE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Signup {
        /// Account email
        email: String,

        /// Account password
        #[arg(short, long, env = "RECIPE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("recipe=debug,recipe_api_client=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match Context::new(cli.api_base, cli.session_file, cli.format) {
        Ok(ctx) => match cli.command {
            Commands::Health => health::run(&ctx).await,
            Commands::Search { query } => recipes::search(&ctx, &query).await,
            Commands::Show { id } => recipes::show(&ctx, &id).await,
            Commands::Saved => saved::list(&ctx).await,
            Commands::Save { id } => saved::save(&ctx, &id).await,
            Commands::Unsave { id } => saved::unsave(&ctx, &id).await,
            Commands::Login { email, password } => auth::login(&ctx, &email, &password).await,
            Commands::Signup { email, password } => auth::signup(&ctx, &email, &password).await,
            Commands::Logout => auth::logout(&ctx),
            Commands::Whoami => auth::whoami(&ctx),
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

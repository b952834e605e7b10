//! Health command - connectivity diagnostic

use crate::config::Context;
use crate::output::{print_json, OutputFormat, Status};
use anyhow::Result;
use owo_colors::OwoColorize;
use serde_json::json;

/// Probe the backend; reports reachability without failing
pub async fn run(ctx: &Context) -> Result<()> {
    let base = ctx.client.base_url();
    let result = ctx.client.health().check().await;

    if ctx.format == OutputFormat::Json {
        return print_json(&json!({ "api_base": base, "probe": result }));
    }

    Status::header("Backend Health");
    println!("  API base: {base}");
    if result.ok {
        println!(
            "  Health:   {} ({}) at {}",
            "✓ OK".green(),
            result.status,
            result.url
        );
    } else if result.status == 0 {
        println!("  Health:   {} at {}", "✗ unreachable".red(), result.url);
    } else {
        println!(
            "  Health:   {} (HTTP {}) at {}",
            "✗ unhealthy".red(),
            result.status,
            result.url
        );
    }
    Ok(())
}

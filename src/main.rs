// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and load the configuration
// 3. Build one repository source with one session cache for this run
// 4. Dispatch to the appropriate subcommand handler
// 5. Exit with proper code (0 = success, 1 = data retrieval failed, 2 = error)
//
// A failed fetch is not swallowed: it is reported and the process exits
// non-zero, so a wrong user name or base URL shows up immediately.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cache; // src/cache/ - session-scoped storage
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - runtime settings
mod github; // src/github/ - repository data source
mod logging; // src/logging.rs - tracing setup
mod page; // src/page/ - HTML mount points
mod template; // src/template/ - {{ key }} rendering

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;

use cache::{MemorySessionStore, SessionStore};
use cli::{Cli, Commands};
use config::Config;
use github::{FetchError, Repository, RepositorySource};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    };

    std::process::exit(exit_code);
}

// 1 when fetching repositories failed, 2 for everything else
fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<FetchError>() {
        Some(err) if err.is_network() || err.is_parse() => 1,
        Some(FetchError::InvalidUser(_)) => 1,
        _ => 2,
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config = load_config(&cli)?;

    // One cache per process run: the "session"
    let cache = Arc::new(MemorySessionStore::new());
    let source = RepositorySource::new(&config, cache.clone())
        .context("Failed to set up the repository source")?;

    let outcome = match cli.command {
        Commands::List { user, json } => handle_list(&source, &user, json).await,
        Commands::Render {
            user,
            template,
            template_file,
        } => {
            let template = match (template, template_file) {
                (Some(text), _) => text,
                (None, Some(path)) => read_file(&path)?,
                // clap requires one of the two
                (None, None) => String::new(),
            };
            handle_render(&source, &user, &template).await
        }
        Commands::Page { html_file, json } => {
            handle_page(&source, &html_file, json, config.max_concurrent_mounts).await
        }
    };

    if !cache.is_empty() {
        tracing::debug!(users = cache.len(), "Ending session, clearing cache");
        cache.clear();
    }

    outcome
}

// Defaults -> config file -> GITHUB_TOKEN -> command-line flags
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    config.excluded.extend(cli.exclude.iter().cloned());

    config.validate()?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

// Handles the 'list' subcommand
async fn handle_list(source: &RepositorySource, user: &str, json: bool) -> Result<i32> {
    let repositories = source.get_repositories(user).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&repositories)?);
    } else {
        print_table(user, &repositories);
    }

    Ok(0)
}

// Handles the 'render' subcommand
async fn handle_render(source: &RepositorySource, user: &str, template: &str) -> Result<i32> {
    let repositories = source.get_repositories(user).await?;
    println!("{}", page::render_repositories(template, &repositories));
    Ok(0)
}

// Handles the 'page' subcommand
async fn handle_page(
    source: &RepositorySource,
    html_file: &Path,
    json: bool,
    limit: usize,
) -> Result<i32> {
    let html = read_file(html_file)?;
    let mounts = page::find_mounts(&html)
        .with_context(|| format!("Invalid page {}", html_file.display()))?;

    if mounts.is_empty() {
        eprintln!("⚠️  No [{}] containers found in {}", page::USER_ATTRIBUTE, html_file.display());
        return Ok(0);
    }

    let reports = page::render_mounts(source, mounts, limit).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in reports.iter().filter(|r| r.is_ok()) {
            println!("<!-- {}=\"{}\" -->", page::USER_ATTRIBUTE, report.user);
            println!("{}", report.html.as_deref().unwrap_or_default());
        }
    }

    let failed: Vec<_> = reports.iter().filter(|r| !r.is_ok()).collect();
    for report in &failed {
        eprintln!(
            "❌ {}: {}",
            report.user,
            report.error.as_deref().unwrap_or_default()
        );
    }

    if failed.is_empty() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Prints repositories as a human-readable table in the terminal
fn print_table(user: &str, repositories: &[Repository]) {
    println!("{:<40} {:<22} {:<50}", "NAME", "UPDATED", "URL");
    println!("{}", "=".repeat(112));

    for repo in repositories {
        let url = repo
            .extra
            .get("html_url")
            .and_then(|value| value.as_str())
            .unwrap_or("");

        println!(
            "{:<40} {:<22} {:<50}",
            truncate(&repo.name, 40),
            truncate(&repo.updated_at, 22),
            url
        );
    }

    println!();
    println!("📊 {} Pages repositories for {}", repositories.len(), user);
}

// Shortens text for display, keeping char boundaries intact
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Commands:
// - list:   print a user's Pages repositories
// - render: render a template once per repository
// - page:   render every mount point found in an HTML file
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "repo-pages",
    version,
    about = "List a GitHub user's Pages repositories and render them through a template",
    long_about = "repo-pages fetches a user's repositories from the GitHub API, keeps the ones \
                  that publish a GitHub Pages site, sorts them newest first and renders them \
                  with a {{ key }} template."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a JSON config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API root (default: https://api.github.com)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Repository name to hide, on top of the configured ones
    ///
    /// Can be given several times: --exclude dotfiles --exclude notes
    #[arg(long = "exclude", global = true, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a user's Pages repositories, newest first
    ///
    /// Example: repo-pages list octocat
    List {
        /// GitHub user name
        user: String,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Render a template once per repository and print the markup
    ///
    /// Example: repo-pages render octocat --template '<li>{{name}}</li>'
    Render {
        /// GitHub user name
        user: String,

        /// Template text with {{ key }} placeholders
        #[arg(long, conflicts_with = "template_file", required_unless_present = "template_file")]
        template: Option<String>,

        /// Read the template from a file instead
        #[arg(long)]
        template_file: Option<PathBuf>,
    },

    /// Render every [data-github-user] container in an HTML file
    ///
    /// The template is the element right after each container.
    /// Example: repo-pages page index.html
    Page {
        /// HTML file to scan
        html_file: PathBuf,

        /// Output a JSON report instead of markup
        #[arg(long)]
        json: bool,
    },
}

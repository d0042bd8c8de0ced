//! Command-line interface for anhourtec-site.
//!
//! This module provides the CLI structure for the `anhourtec` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    BlogsCommand, ConfigCommand, ServeCommand, SitemapCommand, ThemeCommand, ThemeModeArg,
};

/// anhourtec - The AnHourTec website server
///
/// Serves the blog and sitemap endpoints backed by the headless CMS, and
/// inspects content and local preferences from the command line.
#[derive(Debug, Parser)]
#[command(name = "anhourtec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Fetch blogs from the CMS
    #[command(subcommand)]
    Blogs(BlogsCommand),

    /// Show sitemap entries
    #[command(subcommand)]
    Sitemap(SitemapCommand),

    /// View or change the persisted theme
    #[command(subcommand)]
    Theme(ThemeCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::ui::theme::ThemeMode;

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to listen on (overrides `server.bind`)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,
}

/// Blog commands.
#[derive(Debug, Subcommand)]
pub enum BlogsCommand {
    /// List all blogs, newest first
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the blog with the given slug
    Get {
        /// The blog slug
        slug: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Sitemap commands.
#[derive(Debug, Subcommand)]
pub enum SitemapCommand {
    /// Print sitemap URL entries
    Urls {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print the rendered sitemap.xml
    Xml,
}

/// Theme preference commands.
#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Show the persisted theme mode
    Show,

    /// Persist a theme mode
    Set {
        /// The mode to use
        #[arg(value_enum)]
        mode: ThemeModeArg,
    },

    /// Flip between light and dark
    Toggle,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Theme mode argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeModeArg {
    /// Light mode
    Light,
    /// Dark mode
    Dark,
}

impl From<ThemeModeArg> for ThemeMode {
    fn from(arg: ThemeModeArg) -> Self {
        match arg {
            ThemeModeArg::Light => Self::Light,
            ThemeModeArg::Dark => Self::Dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_mode_arg_conversion() {
        assert_eq!(ThemeMode::from(ThemeModeArg::Light), ThemeMode::Light);
        assert_eq!(ThemeMode::from(ThemeModeArg::Dark), ThemeMode::Dark);
    }

    #[test]
    fn test_blogs_command_debug() {
        let cmd = BlogsCommand::Get {
            slug: "example".to_string(),
            json: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Get"));
        assert!(debug_str.contains("example"));
    }

    #[test]
    fn test_serve_command_debug() {
        let cmd = ServeCommand {
            bind: Some("0.0.0.0:8080".to_string()),
        };
        assert!(format!("{cmd:?}").contains("0.0.0.0:8080"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Validate {
            file: Some(PathBuf::from("/tmp/config.toml")),
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Validate"));
        assert!(debug_str.contains("config.toml"));
    }
}

//! `anhourtec` - CLI for the AnHourTec website
//!
//! This binary runs the HTTP server and provides commands for inspecting CMS
//! content, the sitemap, the persisted theme and the configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;

use anhourtec_site::cli::{
    BlogsCommand, Cli, Command, ConfigCommand, ServeCommand, SitemapCommand, ThemeCommand,
};
use anhourtec_site::ui::theme::{HeadlessDocument, Theme};
use anhourtec_site::{blog, server, sitemap};
use anhourtec_site::{init_logging, CmsClient, Config, SqlitePreferences, TransformedBlog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Config commands must work with a broken config file
    if let Command::Config(config_cmd) = cli.command {
        return handle_config(cli.config, config_cmd);
    }

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(config, serve_cmd).await,
        Command::Blogs(blogs_cmd) => handle_blogs(&config, blogs_cmd).await,
        Command::Sitemap(sitemap_cmd) => handle_sitemap(&config, &sitemap_cmd).await,
        Command::Theme(theme_cmd) => handle_theme(&config, &theme_cmd),
        Command::Config(_) => Ok(()),
    }
}

async fn handle_serve(mut config: Config, cmd: ServeCommand) -> anyhow::Result<()> {
    if let Some(bind) = cmd.bind {
        config.server.bind = bind;
        config.validate()?;
    }
    server::run(config).await?;
    Ok(())
}

async fn handle_blogs(config: &Config, cmd: BlogsCommand) -> anyhow::Result<()> {
    let client = CmsClient::new(&config.cms)?;

    match cmd {
        BlogsCommand::List { json } => {
            let blogs = blog::list_blogs(&client).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&blogs)?);
            } else if blogs.is_empty() {
                println!("No blogs found.");
            } else {
                for entry in &blogs {
                    println!(
                        "{:<24}  {:<40}  {}",
                        entry.published_at, entry.slug, entry.title
                    );
                }
            }
        }
        BlogsCommand::Get { slug, json } => {
            let blogs = blog::find_blog(&client, &slug)
                .await
                .with_context(|| format!("failed to fetch blog '{slug}'"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&blogs)?);
            } else {
                for entry in &blogs {
                    print_blog(entry);
                }
            }
        }
    }
    Ok(())
}

fn print_blog(entry: &TransformedBlog) {
    println!("{}", entry.title);
    println!("{}", "=".repeat(entry.title.chars().count()));
    println!();
    println!("Path:        {}", entry.path);
    println!("Published:   {}", entry.published_at);
    if let Some(author) = &entry.author {
        println!("Author:      {}", author.name);
    }
    if let Some(image) = &entry.image {
        println!("Image:       {} ({})", image.src, image.alt);
    }
    println!("Featured:    {}", entry.featured);
    println!();
    if !entry.description.is_empty() {
        println!("{}", entry.description);
        println!();
    }
    println!("{}", entry.body);
}

async fn handle_sitemap(config: &Config, cmd: &SitemapCommand) -> anyhow::Result<()> {
    let client = CmsClient::new(&config.cms)?;
    let urls = sitemap::sitemap_urls(&client, Utc::now()).await;

    match cmd {
        SitemapCommand::Urls { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(&urls)?);
            } else {
                for url in &urls {
                    println!(
                        "{:<40}  {:>3}  {:<8}  {}",
                        url.loc,
                        url.priority.map(|p| format!("{p:.1}")).unwrap_or_default(),
                        url.changefreq.map(|c| c.to_string()).unwrap_or_default(),
                        url.lastmod.as_deref().unwrap_or("")
                    );
                }
            }
        }
        SitemapCommand::Xml => {
            print!("{}", sitemap::render_xml(&urls, &config.site.url));
        }
    }
    Ok(())
}

fn handle_theme(config: &Config, cmd: &ThemeCommand) -> anyhow::Result<()> {
    let store = SqlitePreferences::open(config.database_path())?;
    let mut theme = Theme::new(HeadlessDocument::new(), store);

    match cmd {
        ThemeCommand::Show => {}
        ThemeCommand::Set { mode } => theme.set((*mode).into()),
        ThemeCommand::Toggle => {
            theme.toggle();
        }
    }

    println!("{}", theme.mode());
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path).context("failed to load configuration")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print_config(&config);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path)).context("configuration is invalid")?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}

fn print_config(config: &Config) {
    println!("Current Configuration");
    println!("=====================");
    println!();
    println!("[Server]");
    println!("  Bind:               {}", config.server.bind);
    println!();
    println!("[CMS]");
    println!("  Base URL:           {}", config.cms.base_url);
    println!("  Blogs path:         {}", config.cms.blogs_path);
    println!("  Timeout (secs):     {}", config.cms.timeout_secs);
    println!();
    println!("[Site]");
    println!("  URL:                {}", config.site.url);
    println!("  Name:               {}", config.site.name);
    println!("  Locale:             {}", config.site.default_locale);
    println!();
    println!("[Sitemap]");
    println!("  Enabled:            {}", config.sitemap.enabled);
    println!("  Robots allow:       {}", config.robots.allow.join(", "));
    println!("  Robots disallow:    {}", config.robots.disallow.join(", "));
    println!();
    println!("[Storage]");
    println!("  Database path:      {}", config.database_path().display());
    println!();
    println!("[Scroll]");
    println!("  Duration (ms):      {}", config.scroll.duration_ms);
    println!("  Easing:             {}", config.scroll.easing);
    println!("  Offset:             {}", config.scroll.offset);
}

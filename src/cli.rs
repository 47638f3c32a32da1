use std::{net::Ipv4Addr, path::PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::{
    core::{
        data::ContentSource,
        posts::{load_post, load_post_index},
        settings::{Settings, SETTINGS_PATH},
    },
    error::Result,
    prefs::Language,
};

#[derive(Debug, Parser)]
#[command(name = "folio-site")]
#[command(about = "Portfolio and blog server for statically hosted content")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the site
    Serve(SiteArgs),
    /// Load every post of every language and report the ones that fail
    Check(SiteArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SiteArgs {
    #[arg(long, default_value = SETTINGS_PATH)]
    pub settings: PathBuf,

    #[arg(long)]
    pub host: Option<Ipv4Addr>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Content directory or base URL
    #[arg(long)]
    pub content: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Command {
    pub fn args(&self) -> &SiteArgs {
        match self {
            Command::Serve(args) | Command::Check(args) => args,
        }
    }
}

impl SiteArgs {
    /// Settings file values with command line overrides applied.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(&self.settings)?;
        if let Some(host) = self.host {
            settings.ipv4_addr.value = host;
        }
        if let Some(port) = self.port {
            settings.port.value = port;
        }
        if let Some(content) = &self.content {
            settings.content_root.value = content.clone();
        }
        Ok(settings)
    }
}

#[derive(Debug, Default)]
pub struct CheckReport {
    pub checked: usize,
    pub failures: Vec<String>,
}

/// Loads and renders every listed post.
pub async fn check_content(settings: &Settings) -> CheckReport {
    let source = ContentSource::from_root(&settings.content_root.value);
    let mut report = CheckReport::default();
    for lang in Language::all() {
        for slug in load_post_index(&source, lang).await {
            report.checked += 1;
            match load_post(&source, lang, &slug).await {
                Ok(post) => {
                    if post.meta.title().is_none() {
                        tracing::warn!("{}/{} has no title", lang.code(), slug);
                    }
                    tracing::info!("{}/{}: {} min", lang.code(), slug, post.minutes);
                }
                Err(error) => {
                    tracing::error!("{}/{}: {}", lang.code(), slug, error);
                    report.failures.push(format!("{}/{}: {}", lang.code(), slug, error));
                }
            }
        }
    }
    report
}
